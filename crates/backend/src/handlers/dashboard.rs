use axum::{extract::Path, http::StatusCode, Json};
use contracts::dashboards::d400_general::dto::GeneralDashboard;
use contracts::dashboards::d401_project::dto::ProjectDashboard;

use crate::dashboards::{d400_general, d401_project};
use crate::shared::error::{parse_uuid, to_status};

/// GET /api/dashboard/general
pub async fn general() -> Result<Json<GeneralDashboard>, StatusCode> {
    let dashboard = d400_general::service::get_general_dashboard()
        .await
        .map_err(to_status)?;
    Ok(Json(dashboard))
}

/// GET /api/dashboard/projects/:id
pub async fn project(Path(id): Path<String>) -> Result<Json<ProjectDashboard>, StatusCode> {
    let id = parse_uuid(&id)?;
    let dashboard = d401_project::service::get_project_dashboard(id)
        .await
        .map_err(to_status)?;
    Ok(Json(dashboard))
}
