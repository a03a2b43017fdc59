use anyhow::Result;
use contracts::domain::a001_project::aggregate::{Project, ProjectDto, ProjectFilter};
use contracts::enums::WorkStatus;
use uuid::Uuid;

use super::repository;
use crate::domain::{a002_phase, a008_team_member, a009_alert, a010_history};
use crate::shared::error::{not_found, validation};

const TABLE: &str = "a001_project";

/// Создание нового проекта
pub async fn create(dto: ProjectDto) -> Result<Uuid> {
    let project = Project::new_for_insert(&dto);
    project.validate().map_err(validation)?;

    let id = repository::insert(&project).await?;
    tracing::info!("Project created: {} ({})", project.name, id);
    Ok(id)
}

/// Обновление проекта; расчётные поля (затраты, прогресс) не меняются
pub async fn update(id: Uuid, dto: ProjectDto, by: &str) -> Result<Project> {
    let mut project = get_required(id).await?;
    let old_status = project.status;

    project.update(&dto);
    project.validate().map_err(validation)?;
    project.metadata.touch();
    repository::update(&project).await?;

    if old_status != project.status {
        record_status_change(&project, old_status, by).await;
    }
    Ok(project)
}

pub async fn set_status(id: Uuid, status: WorkStatus, by: &str) -> Result<Project> {
    let mut project = get_required(id).await?;
    let old_status = project.status;
    if old_status == status {
        return Ok(project);
    }
    project.status = status;
    if status == WorkStatus::Finished && project.actual_end_date.is_none() {
        project.actual_end_date = Some(chrono::Local::now().date_naive());
    }
    project.metadata.touch();
    repository::update(&project).await?;
    record_status_change(&project, old_status, by).await;
    Ok(project)
}

pub async fn set_responsible(
    id: Uuid,
    responsible_id: Option<String>,
    by: &str,
) -> Result<Project> {
    let mut project = get_required(id).await?;
    let old = project.responsible_id.clone();
    project.responsible_id = responsible_id.filter(|s| !s.trim().is_empty());
    project.metadata.touch();
    repository::update(&project).await?;

    a010_history::service::record(
        TABLE,
        &id.to_string(),
        "responsable",
        old,
        project.responsible_id.clone(),
        Some(by),
        None,
    )
    .await;
    Ok(project)
}

async fn record_status_change(project: &Project, old: WorkStatus, by: &str) {
    a010_history::service::record(
        TABLE,
        &project.id.to_string(),
        "statut",
        Some(old.code().to_string()),
        Some(project.status.code().to_string()),
        Some(by),
        None,
    )
    .await;
}

/// Удаление проекта вместе с фазами, операциями, командой и тревогами
pub async fn delete(id: Uuid) -> Result<()> {
    get_required(id).await?;
    for phase in a002_phase::repository::list_by_project(id).await? {
        a002_phase::service::delete_cascade(phase.id.value()).await?;
    }
    a008_team_member::repository::delete_by_project(id).await?;
    a009_alert::repository::delete_by_project(id).await?;
    repository::delete(id).await?;
    tracing::info!("Project deleted: {}", id);
    Ok(())
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Project>> {
    repository::get_by_id(id).await
}

pub async fn get_required(id: Uuid) -> Result<Project> {
    repository::get_by_id(id)
        .await?
        .ok_or_else(|| not_found(format!("Projet {}", id)))
}

pub async fn list(filter: &ProjectFilter) -> Result<Vec<Project>> {
    repository::list(filter).await
}

/// Пересчитать затраты и прогресс проекта по его фазам
pub async fn recalculate(id: Uuid) -> Result<()> {
    let phases = a002_phase::repository::list_by_project(id).await?;
    let cost: f64 = phases.iter().map(|p| p.current_cost).sum();
    let progress = mean(phases.iter().map(|p| p.progress));
    repository::update_rollup(id, cost, progress).await
}

/// Среднее значение с округлением до сотых (0 для пустого набора)
pub fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        return 0.0;
    }
    (sum / f64::from(count) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_rounds_to_two_decimals() {
        assert_eq!(mean([10.0, 20.0, 40.0].into_iter()), 23.33);
        assert_eq!(mean([50.0].into_iter()), 50.0);
        assert_eq!(mean(std::iter::empty()), 0.0);
    }
}
