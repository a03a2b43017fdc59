use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a006_problem::aggregate::{
    Page, Problem, ProblemDto, ProblemFilter, ProblemStats,
};
use contracts::enums::ProblemStatus;
use serde::Deserialize;
use serde_json::json;

use crate::domain::a006_problem::{self, service::ProblemWithSolutions};
use crate::shared::error::{parse_uuid, to_status};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/problems?project_id=&severity=&status=&page=&page_size=
pub async fn list(Query(filter): Query<ProblemFilter>) -> Result<Json<Page<Problem>>, StatusCode> {
    let page = a006_problem::service::list(&filter).await.map_err(to_status)?;
    Ok(Json(page))
}

/// GET /api/problems/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<ProblemWithSolutions>, StatusCode> {
    let id = parse_uuid(&id)?;
    let problem = a006_problem::service::get_with_solutions(id)
        .await
        .map_err(to_status)?;
    Ok(Json(problem))
}

/// POST /api/problems
pub async fn create(
    current: CurrentUser,
    Json(dto): Json<ProblemDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let id = a006_problem::service::create(dto, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(json!({ "id": id.to_string() })))
}

/// PUT /api/problems/:id
pub async fn update(
    current: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<ProblemDto>,
) -> Result<Json<Problem>, StatusCode> {
    let id = parse_uuid(&id)?;
    let problem = a006_problem::service::update(id, dto, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(problem))
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: ProblemStatus,
}

/// PATCH /api/problems/:id/status
pub async fn set_status(
    current: CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<StatusChange>,
) -> Result<Json<Problem>, StatusCode> {
    let id = parse_uuid(&id)?;
    let problem = a006_problem::service::set_status(id, body.status, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(problem))
}

/// DELETE /api/problems/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    let id = parse_uuid(&id)?;
    a006_problem::service::delete(id).await.map_err(to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/problems/entity/:kind/:id
pub async fn list_by_entity(
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<Vec<Problem>>, StatusCode> {
    let id = parse_uuid(&id)?;
    let items = a006_problem::service::list_by_entity(&kind, id)
        .await
        .map_err(to_status)?;
    Ok(Json(items))
}

/// GET /api/problems/statistics
pub async fn statistics(
    Query(filter): Query<ProblemFilter>,
) -> Result<Json<ProblemStats>, StatusCode> {
    let stats = a006_problem::service::statistics(&filter)
        .await
        .map_err(to_status)?;
    Ok(Json(stats))
}
