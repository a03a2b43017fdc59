use anyhow::Result;
use contracts::domain::a006_problem::aggregate::{
    EntityKind, Page, Problem, ProblemDto, ProblemFilter, ProblemStats,
};
use contracts::domain::a007_solution::aggregate::{Solution, SolutionFilter};
use contracts::enums::ProblemStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repository;
use crate::domain::{a007_solution, a010_history};
use crate::shared::error::{not_found, validation};

pub(crate) const TABLE: &str = "a006_problem";

/// Проблема вместе с предложенными решениями
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemWithSolutions {
    #[serde(flatten)]
    pub problem: Problem,
    pub solutions: Vec<Solution>,
}

pub async fn list(filter: &ProblemFilter) -> Result<Page<Problem>> {
    let (page, page_size) = filter.paging();
    let (items, total) = repository::list_paginated(filter).await?;
    Ok(Page {
        items,
        total,
        page,
        page_size,
    })
}

pub async fn get_with_solutions(id: Uuid) -> Result<ProblemWithSolutions> {
    let problem = get_required(id).await?;
    let solutions = a007_solution::repository::list(&SolutionFilter {
        problem_id: Some(id.to_string()),
        ..Default::default()
    })
    .await?;
    Ok(ProblemWithSolutions { problem, solutions })
}

pub async fn create(dto: ProblemDto, reported_by: &str) -> Result<Uuid> {
    let problem = Problem::new_for_insert(&dto, reported_by).map_err(validation)?;
    problem.validate().map_err(validation)?;
    let id = repository::insert(&problem).await?;
    tracing::info!(
        "Problem reported: {} ({}) by {}",
        problem.title,
        problem.severity,
        reported_by
    );
    Ok(id)
}

/// Обновление; смена статуса пишется в журнал
pub async fn update(id: Uuid, dto: ProblemDto, by: &str) -> Result<Problem> {
    let mut problem = get_required(id).await?;
    let incoming = Problem::new_for_insert(&dto, by).map_err(validation)?;

    problem.project_id = incoming.project_id;
    problem.phase_id = incoming.phase_id;
    problem.operation_id = incoming.operation_id;
    problem.report_id = incoming.report_id;
    problem.title = incoming.title;
    problem.description = incoming.description;
    if let Some(severity) = dto.severity {
        problem.severity = severity;
    }
    problem.validate().map_err(validation)?;
    problem.metadata.touch();

    match dto.status {
        Some(status) if status != problem.status => change_status(problem, status, by, None).await,
        _ => {
            repository::update(&problem).await?;
            Ok(problem)
        }
    }
}

pub async fn set_status(id: Uuid, status: ProblemStatus, by: &str) -> Result<Problem> {
    let problem = get_required(id).await?;
    change_status(problem, status, by, None).await
}

pub(crate) async fn change_status(
    mut problem: Problem,
    status: ProblemStatus,
    by: &str,
    comment: Option<&str>,
) -> Result<Problem> {
    let old = problem.status;
    problem.set_status(status, by);
    repository::update(&problem).await?;
    if old != status {
        a010_history::service::record(
            TABLE,
            &problem.id.to_string(),
            "statut",
            Some(old.code().to_string()),
            Some(status.code().to_string()),
            Some(by),
            comment,
        )
        .await;
    }
    Ok(problem)
}

pub async fn delete(id: Uuid) -> Result<()> {
    if !repository::delete(id).await? {
        return Err(not_found(format!("Problème {}", id)));
    }
    Ok(())
}

pub async fn get_required(id: Uuid) -> Result<Problem> {
    repository::get_by_id(id)
        .await?
        .ok_or_else(|| not_found(format!("Problème {}", id)))
}

pub async fn list_by_entity(kind: &str, id: Uuid) -> Result<Vec<Problem>> {
    let kind = EntityKind::from_code(kind)
        .ok_or_else(|| validation(format!("Type d'entité inconnu: {}", kind)))?;
    repository::list_by_entity(kind, id).await
}

pub async fn statistics(filter: &ProblemFilter) -> Result<ProblemStats> {
    let problems = repository::list_all(filter).await?;
    Ok(ProblemStats::compute(&problems))
}
