use anyhow::Result;
use contracts::domain::a006_problem::aggregate::{ProblemFilter, ProblemId};
use contracts::domain::a007_solution::aggregate::{
    Solution, SolutionDto, SolutionFilter, SolutionStats,
};
use contracts::enums::{ProblemStatus, SolutionStatus};
use std::collections::HashSet;
use uuid::Uuid;

use super::repository;
use crate::domain::{a006_problem, a010_history};
use crate::shared::error::{not_found, validation};

const TABLE: &str = "a007_solution";

pub async fn list(filter: &SolutionFilter) -> Result<Vec<Solution>> {
    repository::list(filter).await
}

pub async fn create(dto: SolutionDto, proposed_by: &str) -> Result<Uuid> {
    let problem_id = Uuid::parse_str(&dto.problem_id)
        .map_err(|_| validation("Problème invalide"))?;
    a006_problem::service::get_required(problem_id).await?;

    let solution = Solution::new_for_insert(ProblemId(problem_id), &dto, proposed_by);
    solution.validate().map_err(validation)?;
    let id = repository::insert(&solution).await?;
    tracing::info!("Solution proposed for problem {} by {}", problem_id, proposed_by);
    Ok(id)
}

pub async fn update(id: Uuid, dto: SolutionDto, by: &str) -> Result<Solution> {
    let mut solution = get_required(id).await?;
    solution.description = dto.description.trim().to_string();
    solution.solution_type = dto.solution_type.trim().to_string();
    solution.estimated_cost = dto.estimated_cost;
    solution.estimated_delay_days = dto.estimated_delay_days;
    solution.validate().map_err(validation)?;

    let old = solution.status;
    match dto.status {
        Some(status) if status != old => solution.set_status(status, by),
        _ => solution.metadata.touch(),
    }
    repository::update(&solution).await?;

    if old != solution.status {
        record_status(&solution, old, by, None).await;
        if solution.status == SolutionStatus::Implemented {
            start_problem(&solution, by).await?;
        }
    }
    Ok(solution)
}

/// Внедрить решение: только VALIDEE → MISE_EN_OEUVRE.
/// Проблема переходит в EN_COURS, если она ещё не решена или закрыта.
pub async fn implement(id: Uuid, by: &str) -> Result<Solution> {
    let mut solution = get_required(id).await?;
    let old = solution.status;
    solution.implement().map_err(validation)?;
    repository::update(&solution).await?;
    record_status(&solution, old, by, Some("Mise en œuvre de la solution")).await;
    start_problem(&solution, by).await?;
    Ok(solution)
}

/// Проблема внедряемого решения переходит в EN_COURS, если она не решена и не закрыта
fn problem_needs_start(problem: ProblemStatus) -> bool {
    !problem.is_settled() && problem != ProblemStatus::InProgress
}

async fn start_problem(solution: &Solution, by: &str) -> Result<()> {
    let problem = a006_problem::service::get_required(solution.problem_id.value()).await?;
    if problem_needs_start(problem.status) {
        a006_problem::service::change_status(
            problem,
            ProblemStatus::InProgress,
            by,
            Some("Solution mise en œuvre"),
        )
        .await?;
    }
    Ok(())
}

async fn record_status(solution: &Solution, old: SolutionStatus, by: &str, comment: Option<&str>) {
    a010_history::service::record(
        TABLE,
        &solution.id.to_string(),
        "statut",
        Some(old.code().to_string()),
        Some(solution.status.code().to_string()),
        Some(by),
        comment,
    )
    .await;
}

pub async fn delete(id: Uuid) -> Result<()> {
    if !repository::delete(id).await? {
        return Err(not_found(format!("Solution {}", id)));
    }
    Ok(())
}

pub async fn get_required(id: Uuid) -> Result<Solution> {
    repository::get_by_id(id)
        .await?
        .ok_or_else(|| not_found(format!("Solution {}", id)))
}

pub async fn statistics(filter: &SolutionFilter) -> Result<SolutionStats> {
    let solutions = repository::list(filter).await?;
    Ok(SolutionStats::compute(&solutions))
}

/// Валидированные решения, ожидающие внедрения
pub async fn to_implement() -> Result<Vec<Solution>> {
    repository::list(&SolutionFilter {
        status: Some(SolutionStatus::Validated),
        ..Default::default()
    })
    .await
}

/// Решения для проблем проекта
pub async fn list_by_project(project_id: Uuid) -> Result<Vec<Solution>> {
    let problems = a006_problem::repository::list_all(&ProblemFilter {
        project_id: Some(project_id.to_string()),
        ..Default::default()
    })
    .await?;
    let ids: HashSet<Uuid> = problems.iter().map(|p| p.id.value()).collect();
    let solutions = repository::list(&SolutionFilter::default()).await?;
    Ok(solutions
        .into_iter()
        .filter(|s| ids.contains(&s.problem_id.value()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_needs_start() {
        assert!(problem_needs_start(ProblemStatus::Open));
        assert!(!problem_needs_start(ProblemStatus::InProgress));
        assert!(!problem_needs_start(ProblemStatus::Resolved));
        assert!(!problem_needs_start(ProblemStatus::Closed));
    }
}
