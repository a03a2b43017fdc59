use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a005_report::aggregate::{Report, ReportDto, ReportFilter, ReportReview};
use serde_json::json;

use crate::domain::a005_report;
use crate::shared::error::{parse_uuid, to_status};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/reports
pub async fn list(Query(filter): Query<ReportFilter>) -> Result<Json<Vec<Report>>, StatusCode> {
    let items = a005_report::service::list(&filter).await.map_err(to_status)?;
    Ok(Json(items))
}

/// GET /api/reports/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Report>, StatusCode> {
    let id = parse_uuid(&id)?;
    let report = a005_report::service::get_required(id)
        .await
        .map_err(to_status)?;
    Ok(Json(report))
}

/// POST /api/reports (любая роль)
pub async fn create(
    current: CurrentUser,
    Json(dto): Json<ReportDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let id = a005_report::service::create(dto, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(json!({ "id": id.to_string() })))
}

/// PUT /api/reports/:id/review
pub async fn review(
    current: CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ReportReview>,
) -> Result<Json<Report>, StatusCode> {
    let id = parse_uuid(&id)?;
    let report = a005_report::service::review(id, body, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(report))
}

/// DELETE /api/reports/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    let id = parse_uuid(&id)?;
    a005_report::service::delete(id).await.map_err(to_status)?;
    Ok(StatusCode::NO_CONTENT)
}
