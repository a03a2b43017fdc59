use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a004_threshold::aggregate::{Threshold, ThresholdDto};

use crate::domain::a004_threshold;
use crate::shared::error::{parse_uuid, to_status};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/operations/:id/thresholds
pub async fn list_by_operation(
    Path(operation_id): Path<String>,
) -> Result<Json<Vec<Threshold>>, StatusCode> {
    let operation_id = parse_uuid(&operation_id)?;
    let items = a004_threshold::service::list_by_operation(operation_id)
        .await
        .map_err(to_status)?;
    Ok(Json(items))
}

/// POST /api/operations/:id/thresholds
pub async fn create(
    current: CurrentUser,
    Path(operation_id): Path<String>,
    Json(dto): Json<ThresholdDto>,
) -> Result<Json<Threshold>, StatusCode> {
    let operation_id = parse_uuid(&operation_id)?;
    let threshold = a004_threshold::service::create(operation_id, dto, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(threshold))
}

/// PUT /api/thresholds/:id
pub async fn update(
    current: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<ThresholdDto>,
) -> Result<Json<Threshold>, StatusCode> {
    let id = parse_uuid(&id)?;
    let threshold = a004_threshold::service::update(id, dto, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(threshold))
}

/// DELETE /api/thresholds/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    let id = parse_uuid(&id)?;
    a004_threshold::service::delete(id).await.map_err(to_status)?;
    Ok(StatusCode::NO_CONTENT)
}
