use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a009_alert::aggregate::{Alert, AlertFilter, AlertStats};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a009_alert::{self, notifier::LogNotifier};
use crate::shared::error::{parse_uuid, to_status};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/alerts
pub async fn list(Query(filter): Query<AlertFilter>) -> Result<Json<Vec<Alert>>, StatusCode> {
    let items = a009_alert::service::list(&filter).await.map_err(to_status)?;
    Ok(Json(items))
}

/// GET /api/alerts/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Alert>, StatusCode> {
    let id = parse_uuid(&id)?;
    let alert = a009_alert::service::get_required(id)
        .await
        .map_err(to_status)?;
    Ok(Json(alert))
}

/// POST /api/alerts/:id/read
pub async fn mark_read(
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Alert>, StatusCode> {
    let id = parse_uuid(&id)?;
    let alert = a009_alert::service::mark_read(id, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(alert))
}

/// POST /api/alerts/:id/treat
pub async fn mark_treated(
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Alert>, StatusCode> {
    let id = parse_uuid(&id)?;
    let alert = a009_alert::service::mark_treated(id, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(alert))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReadAllQuery {
    pub project_id: Option<String>,
}

/// POST /api/alerts/read-all
pub async fn mark_all_read(
    current: CurrentUser,
    Query(query): Query<ReadAllQuery>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let project_id = match query.project_id.as_deref().filter(|s| !s.is_empty()) {
        Some(id) => Some(parse_uuid(id)?),
        None => None,
    };
    let count = a009_alert::service::mark_all_read(project_id, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(json!({ "updated": count })))
}

/// GET /api/alerts/statistics
pub async fn statistics(Query(filter): Query<AlertFilter>) -> Result<Json<AlertStats>, StatusCode> {
    let stats = a009_alert::service::statistics(&filter)
        .await
        .map_err(to_status)?;
    Ok(Json(stats))
}

/// POST /api/alerts/detect
pub async fn detect() -> Result<Json<Vec<Alert>>, StatusCode> {
    let today = chrono::Local::now().date_naive();
    let created = a009_alert::service::detect(&LogNotifier, today)
        .await
        .map_err(to_status)?;
    Ok(Json(created))
}
