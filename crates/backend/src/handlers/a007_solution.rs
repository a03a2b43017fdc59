use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a007_solution::aggregate::{
    Solution, SolutionDto, SolutionFilter, SolutionStats,
};
use serde_json::json;

use crate::domain::a007_solution;
use crate::shared::error::{parse_uuid, to_status};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/solutions
pub async fn list(Query(filter): Query<SolutionFilter>) -> Result<Json<Vec<Solution>>, StatusCode> {
    let items = a007_solution::service::list(&filter).await.map_err(to_status)?;
    Ok(Json(items))
}

/// GET /api/solutions/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Solution>, StatusCode> {
    let id = parse_uuid(&id)?;
    let solution = a007_solution::service::get_required(id)
        .await
        .map_err(to_status)?;
    Ok(Json(solution))
}

/// POST /api/solutions
pub async fn create(
    current: CurrentUser,
    Json(dto): Json<SolutionDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let id = a007_solution::service::create(dto, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(json!({ "id": id.to_string() })))
}

/// PUT /api/solutions/:id
pub async fn update(
    current: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<SolutionDto>,
) -> Result<Json<Solution>, StatusCode> {
    let id = parse_uuid(&id)?;
    let solution = a007_solution::service::update(id, dto, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(solution))
}

/// PATCH /api/solutions/:id/implement
pub async fn implement(
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Solution>, StatusCode> {
    let id = parse_uuid(&id)?;
    let solution = a007_solution::service::implement(id, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(solution))
}

/// DELETE /api/solutions/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    let id = parse_uuid(&id)?;
    a007_solution::service::delete(id).await.map_err(to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/solutions/statistics
pub async fn statistics(
    Query(filter): Query<SolutionFilter>,
) -> Result<Json<SolutionStats>, StatusCode> {
    let stats = a007_solution::service::statistics(&filter)
        .await
        .map_err(to_status)?;
    Ok(Json(stats))
}

/// GET /api/solutions/to-implement
pub async fn to_implement() -> Result<Json<Vec<Solution>>, StatusCode> {
    let items = a007_solution::service::to_implement().await.map_err(to_status)?;
    Ok(Json(items))
}

/// GET /api/projects/:id/solutions
pub async fn list_by_project(
    Path(project_id): Path<String>,
) -> Result<Json<Vec<Solution>>, StatusCode> {
    let project_id = parse_uuid(&project_id)?;
    let items = a007_solution::service::list_by_project(project_id)
        .await
        .map_err(to_status)?;
    Ok(Json(items))
}
