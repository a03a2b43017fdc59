use contracts::dashboards::d400_general::dto::GeneralDashboard;
use contracts::dashboards::d401_project::dto::ProjectDashboard;

use crate::shared::api_utils::get_json;

/// Сводка по всем проектам
pub async fn fetch_general() -> Result<GeneralDashboard, String> {
    get_json("/api/dashboard/general").await
}

pub async fn fetch_project_dashboard(project_id: &str) -> Result<ProjectDashboard, String> {
    get_json(&format!("/api/dashboard/projects/{}", project_id)).await
}
