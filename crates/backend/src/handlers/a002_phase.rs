use axum::{extract::Path, http::StatusCode, Json};
use contracts::dashboards::d401_project::dto::PhaseDetail;
use contracts::domain::a002_phase::aggregate::{Phase, PhaseDto, ReorderRequest};
use serde_json::json;

use crate::dashboards::d401_project;
use crate::domain::a002_phase;
use crate::shared::error::{parse_uuid, to_status};

/// GET /api/projects/:id/phases
pub async fn list_by_project(
    Path(project_id): Path<String>,
) -> Result<Json<Vec<Phase>>, StatusCode> {
    let project_id = parse_uuid(&project_id)?;
    let items = a002_phase::service::list_by_project(project_id)
        .await
        .map_err(to_status)?;
    Ok(Json(items))
}

/// GET /api/phases/:id (с операциями и индикаторами)
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<PhaseDetail>, StatusCode> {
    let id = parse_uuid(&id)?;
    let detail = d401_project::service::get_phase_detail(id)
        .await
        .map_err(to_status)?;
    Ok(Json(detail))
}

/// POST /api/projects/:id/phases
pub async fn create(
    Path(project_id): Path<String>,
    Json(dto): Json<PhaseDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let project_id = parse_uuid(&project_id)?;
    let id = a002_phase::service::create(project_id, dto)
        .await
        .map_err(to_status)?;
    Ok(Json(json!({ "id": id.to_string() })))
}

/// PUT /api/phases/:id
pub async fn update(
    Path(id): Path<String>,
    Json(dto): Json<PhaseDto>,
) -> Result<Json<Phase>, StatusCode> {
    let id = parse_uuid(&id)?;
    let phase = a002_phase::service::update(id, dto).await.map_err(to_status)?;
    Ok(Json(phase))
}

/// DELETE /api/phases/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    let id = parse_uuid(&id)?;
    a002_phase::service::delete(id).await.map_err(to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/projects/:id/phases/order
pub async fn reorder(
    Path(project_id): Path<String>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<Vec<Phase>>, StatusCode> {
    let project_id = parse_uuid(&project_id)?;
    let phases = a002_phase::service::reorder(project_id, &req.ids)
        .await
        .map_err(to_status)?;
    Ok(Json(phases))
}
