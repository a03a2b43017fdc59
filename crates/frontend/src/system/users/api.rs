use contracts::system::auth::UserInfo;
use contracts::system::users::UpdateUserDto;
use gloo_net::http::Method;

use crate::shared::api_utils::{get_json, send_json};

/// All accounts; the server only answers TOP_MANAGEMENT
pub async fn fetch_users() -> Result<Vec<UserInfo>, String> {
    get_json("/api/users").await
}

pub async fn get_user(id: &str) -> Result<UserInfo, String> {
    get_json(&format!("/api/users/{}", id)).await
}

pub async fn update_user(dto: &UpdateUserDto) -> Result<UserInfo, String> {
    send_json(Method::PUT, &format!("/api/users/{}", dto.id), dto).await
}
