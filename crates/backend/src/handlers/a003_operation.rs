use axum::{extract::Path, http::StatusCode, Json};
use contracts::dashboards::d401_project::dto::OperationDetail;
use contracts::domain::a002_phase::aggregate::ReorderRequest;
use contracts::domain::a003_operation::aggregate::{Operation, OperationDto, ProgressUpdate};
use serde_json::json;

use crate::dashboards::d401_project;
use crate::domain::a003_operation;
use crate::shared::error::{parse_uuid, to_status};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/phases/:id/operations
pub async fn list_by_phase(
    Path(phase_id): Path<String>,
) -> Result<Json<Vec<Operation>>, StatusCode> {
    let phase_id = parse_uuid(&phase_id)?;
    let items = a003_operation::service::list_by_phase(phase_id)
        .await
        .map_err(to_status)?;
    Ok(Json(items))
}

/// GET /api/operations/:id (с порогами и индикаторами)
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<OperationDetail>, StatusCode> {
    let id = parse_uuid(&id)?;
    let detail = d401_project::service::get_operation_detail(id)
        .await
        .map_err(to_status)?;
    Ok(Json(detail))
}

/// POST /api/phases/:id/operations
pub async fn create(
    Path(phase_id): Path<String>,
    Json(dto): Json<OperationDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let phase_id = parse_uuid(&phase_id)?;
    let id = a003_operation::service::create(phase_id, dto)
        .await
        .map_err(to_status)?;
    Ok(Json(json!({ "id": id.to_string() })))
}

/// PUT /api/operations/:id
pub async fn update(
    Path(id): Path<String>,
    Json(dto): Json<OperationDto>,
) -> Result<Json<Operation>, StatusCode> {
    let id = parse_uuid(&id)?;
    let op = a003_operation::service::update(id, dto)
        .await
        .map_err(to_status)?;
    Ok(Json(op))
}

/// PATCH /api/operations/:id/progress
pub async fn set_progress(
    current: CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ProgressUpdate>,
) -> Result<Json<Operation>, StatusCode> {
    let id = parse_uuid(&id)?;
    let op = a003_operation::service::set_progress(id, body.progress, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(op))
}

/// DELETE /api/operations/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    let id = parse_uuid(&id)?;
    a003_operation::service::delete(id).await.map_err(to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/phases/:id/operations/order
pub async fn reorder(
    Path(phase_id): Path<String>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<Vec<Operation>>, StatusCode> {
    let phase_id = parse_uuid(&phase_id)?;
    let ops = a003_operation::service::reorder(phase_id, &req.ids)
        .await
        .map_err(to_status)?;
    Ok(Json(ops))
}
