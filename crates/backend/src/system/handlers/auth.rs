use axum::{extract::Json, http::StatusCode};
use contracts::system::auth::{
    AccountStatus, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo,
};
use contracts::system::users::ChangePasswordDto;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::shared::data::db::get_connection;
use crate::shared::error::to_status;
use crate::system::auth::extractor::CurrentUser;
use crate::system::{auth::jwt, users::service as user_service};

/// Login handler
pub async fn login(Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, StatusCode> {
    if request.email.trim().is_empty() || request.mot_de_passe.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let user = user_service::verify_credentials(&request.email, &request.mot_de_passe)
        .await
        .map_err(to_status)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if user.statut != AccountStatus::Active {
        tracing::warn!("Login refused for {} account {}", user.statut.code(), user.email);
        return Err(StatusCode::UNAUTHORIZED);
    }

    let access_token = jwt::generate_access_token(&user.id, &user.email, user.role)
        .await
        .map_err(to_status)?;

    let refresh_token = jwt::generate_refresh_token();

    store_refresh_token(&user.id, &refresh_token)
        .await
        .map_err(to_status)?;

    tracing::info!("User {} signed in as {}", user.email, user.role);

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

/// Refresh token handler
pub async fn refresh(
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, StatusCode> {
    let user_id = validate_refresh_token(&request.refresh_token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = user_service::get_by_id(&user_id)
        .await
        .map_err(to_status)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if user.statut != AccountStatus::Active {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let access_token = jwt::generate_access_token(&user.id, &user.email, user.role)
        .await
        .map_err(to_status)?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Logout handler
pub async fn logout(Json(request): Json<RefreshRequest>) -> Result<StatusCode, StatusCode> {
    revoke_refresh_token(&request.refresh_token)
        .await
        .map_err(to_status)?;

    Ok(StatusCode::OK)
}

/// Current user profile (protected by middleware)
pub async fn current_user(CurrentUser(claims): CurrentUser) -> Result<Json<UserInfo>, StatusCode> {
    let user = user_service::get_by_id(&claims.sub)
        .await
        .map_err(to_status)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(user.into()))
}

pub async fn change_password(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<ChangePasswordDto>,
) -> Result<StatusCode, StatusCode> {
    user_service::change_password(&claims.sub, dto)
        .await
        .map_err(to_status)?;
    Ok(StatusCode::OK)
}

// Helper functions for refresh tokens

async fn store_refresh_token(user_id: &str, token: &str) -> anyhow::Result<()> {
    let token_id = uuid::Uuid::new_v4().to_string();
    let token_hash = hash_token(token);
    let expires_at = jwt::calculate_refresh_token_expiration();
    let created_at = chrono::Utc::now().to_rfc3339();

    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_refresh_tokens (id, user_id, token_hash, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?)",
            [
                token_id.into(),
                user_id.to_string().into(),
                token_hash.into(),
                expires_at.into(),
                created_at.into(),
            ],
        ))
        .await?;

    Ok(())
}

async fn validate_refresh_token(token: &str) -> anyhow::Result<String> {
    let token_hash = hash_token(token);
    let now = chrono::Utc::now().to_rfc3339();

    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT user_id FROM sys_refresh_tokens
             WHERE token_hash = ? AND expires_at > ? AND revoked_at IS NULL",
            [token_hash.into(), now.into()],
        ))
        .await?;

    match row {
        Some(row) => Ok(row.try_get("", "user_id")?),
        None => Err(anyhow::anyhow!("Invalid or expired refresh token")),
    }
}

async fn revoke_refresh_token(token: &str) -> anyhow::Result<()> {
    let token_hash = hash_token(token);
    let revoked_at = chrono::Utc::now().to_rfc3339();

    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_refresh_tokens SET revoked_at = ? WHERE token_hash = ?",
            [revoked_at.into(), token_hash.into()],
        ))
        .await?;

    Ok(())
}

fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_stable_hex() {
        let h = hash_token("abc");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_token("abc"));
        assert_ne!(h, hash_token("abd"));
    }
}
