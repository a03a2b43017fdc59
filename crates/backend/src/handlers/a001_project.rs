use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_project::aggregate::{Project, ProjectDto, ProjectFilter};
use contracts::enums::WorkStatus;
use serde::Deserialize;
use serde_json::json;

use crate::domain::a001_project;
use crate::shared::error::{parse_uuid, to_status};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/projects
pub async fn list(Query(filter): Query<ProjectFilter>) -> Result<Json<Vec<Project>>, StatusCode> {
    let items = a001_project::service::list(&filter).await.map_err(to_status)?;
    Ok(Json(items))
}

/// GET /api/projects/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Project>, StatusCode> {
    let id = parse_uuid(&id)?;
    a001_project::service::get_by_id(id)
        .await
        .map_err(to_status)?
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// POST /api/projects
pub async fn create(Json(dto): Json<ProjectDto>) -> Result<Json<serde_json::Value>, StatusCode> {
    let id = a001_project::service::create(dto).await.map_err(to_status)?;
    Ok(Json(json!({ "id": id.to_string() })))
}

/// PUT /api/projects/:id
pub async fn update(
    current: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<ProjectDto>,
) -> Result<Json<Project>, StatusCode> {
    let id = parse_uuid(&id)?;
    let project = a001_project::service::update(id, dto, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(project))
}

/// DELETE /api/projects/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    let id = parse_uuid(&id)?;
    a001_project::service::delete(id).await.map_err(to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: WorkStatus,
}

/// PATCH /api/projects/:id/status
pub async fn set_status(
    current: CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<StatusChange>,
) -> Result<Json<Project>, StatusCode> {
    let id = parse_uuid(&id)?;
    let project = a001_project::service::set_status(id, body.status, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(project))
}

#[derive(Debug, Deserialize)]
pub struct ResponsibleChange {
    pub responsible_id: Option<String>,
}

/// PATCH /api/projects/:id/responsible
pub async fn set_responsible(
    current: CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ResponsibleChange>,
) -> Result<Json<Project>, StatusCode> {
    let id = parse_uuid(&id)?;
    let project = a001_project::service::set_responsible(id, body.responsible_id, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(project))
}
