use axum::{
    extract::{Json, Path},
    http::StatusCode,
};
use contracts::system::auth::{Role, UserInfo};
use contracts::system::users::{CreateUserDto, UpdateUserDto};
use serde_json::json;

use crate::shared::error::to_status;
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

/// GET /api/users (top management)
pub async fn list_users() -> Result<Json<Vec<UserInfo>>, StatusCode> {
    let users = service::list_all().await.map_err(to_status)?;
    Ok(Json(users.into_iter().map(UserInfo::from).collect()))
}

/// GET /api/users/:id (self or top management)
pub async fn get_user(
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<UserInfo>, StatusCode> {
    if !current.can_access_user(&id) {
        return Err(StatusCode::FORBIDDEN);
    }
    let user = service::get_by_id(&id)
        .await
        .map_err(to_status)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(user.into()))
}

/// POST /api/users (top management)
pub async fn create_user(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<CreateUserDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let id = service::create(dto, Some(claims.sub))
        .await
        .map_err(to_status)?;
    Ok(Json(json!({ "id": id })))
}

/// PUT /api/users/:id (self or top management)
pub async fn update_user(
    current: CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<UpdateUserDto>,
) -> Result<Json<UserInfo>, StatusCode> {
    if !current.can_access_user(&id) {
        return Err(StatusCode::FORBIDDEN);
    }
    dto.id = id;
    let privileged = current.role() == Role::TopManagement;
    let user = service::update(dto, privileged).await.map_err(to_status)?;
    Ok(Json(user.into()))
}

/// DELETE /api/users/:id (top management)
pub async fn delete_user(
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    if current.role() != Role::TopManagement {
        return Err(StatusCode::FORBIDDEN);
    }
    service::delete(&id, current.id()).await.map_err(to_status)?;
    Ok(StatusCode::NO_CONTENT)
}
