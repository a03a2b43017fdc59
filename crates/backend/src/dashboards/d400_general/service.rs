use anyhow::Result;
use contracts::dashboards::d400_general::dto::GeneralDashboard;
use contracts::domain::a001_project::aggregate::ProjectFilter;

use super::repository;
use crate::domain::a001_project;

/// Общая сводка по всем проектам на сегодня
pub async fn get_general_dashboard() -> Result<GeneralDashboard> {
    let projects = a001_project::service::list(&ProjectFilter::default()).await?;
    let with_phases = repository::project_ids_with_phases().await?;
    let today = chrono::Local::now().date_naive();

    Ok(GeneralDashboard::compute(&projects, today, |p| {
        with_phases.contains(&p.id.to_string())
    }))
}
