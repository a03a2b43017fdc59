use anyhow::{Context, Result};
use contracts::system::auth::{AccountStatus, Role};
use contracts::system::users::User;
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};

use crate::shared::data::db::get_connection;

const USER_COLUMNS: &str =
    "id, nom, prenom, email, role, statut, date_creation, updated_at, last_login_at, created_by";

fn row_to_user(row: &QueryResult) -> Result<User> {
    let role: String = row.try_get("", "role")?;
    let statut: String = row.try_get("", "statut")?;
    Ok(User {
        id: row.try_get("", "id")?,
        nom: row.try_get("", "nom")?,
        prenom: row.try_get("", "prenom")?,
        email: row.try_get("", "email")?,
        // Unknown codes degrade to the least privileged role / an inactive account
        role: Role::from_code(&role).unwrap_or(Role::IngenieurTerrain),
        statut: AccountStatus::from_code(&statut).unwrap_or(AccountStatus::Inactive),
        date_creation: row.try_get("", "date_creation")?,
        updated_at: row.try_get("", "updated_at")?,
        last_login_at: row.try_get("", "last_login_at")?,
        created_by: row.try_get("", "created_by")?,
    })
}

/// Create user with password hash
pub async fn create_with_password(user: &User, password_hash: &str) -> Result<()> {
    let conn = get_connection();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_users (id, nom, prenom, email, password_hash, role, statut, date_creation, updated_at, last_login_at, created_by)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        [
            user.id.clone().into(),
            user.nom.clone().into(),
            user.prenom.clone().into(),
            user.email.clone().into(),
            password_hash.to_string().into(),
            user.role.code().into(),
            user.statut.code().into(),
            user.date_creation.clone().into(),
            user.updated_at.clone().into(),
            user.last_login_at.clone().into(),
            user.created_by.clone().into(),
        ],
    ))
    .await
    .context("Failed to insert user")?;

    Ok(())
}

/// Get user by ID
pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    let conn = get_connection();
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            format!("SELECT {} FROM sys_users WHERE id = ?", USER_COLUMNS),
            [id.into()],
        ))
        .await?;

    row.as_ref().map(row_to_user).transpose()
}

/// Get user by email (case-insensitive)
pub async fn get_by_email(email: &str) -> Result<Option<User>> {
    let conn = get_connection();
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            format!(
                "SELECT {} FROM sys_users WHERE lower(email) = lower(?)",
                USER_COLUMNS
            ),
            [email.trim().into()],
        ))
        .await?;

    row.as_ref().map(row_to_user).transpose()
}

/// Get password hash for user
pub async fn get_password_hash(user_id: &str) -> Result<Option<String>> {
    let conn = get_connection();
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM sys_users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;

    match row {
        Some(row) => Ok(Some(row.try_get("", "password_hash")?)),
        None => Ok(None),
    }
}

/// List all users
pub async fn list_all() -> Result<Vec<User>> {
    let conn = get_connection();
    let rows = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("SELECT {} FROM sys_users ORDER BY nom, prenom", USER_COLUMNS),
        ))
        .await?;

    rows.iter().map(row_to_user).collect()
}

/// Update profile fields, role and status
pub async fn update(user: &User) -> Result<()> {
    let conn = get_connection();
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET nom = ?, prenom = ?, email = ?, role = ?, statut = ?, updated_at = ? WHERE id = ?",
        [
            user.nom.clone().into(),
            user.prenom.clone().into(),
            user.email.clone().into(),
            user.role.code().into(),
            user.statut.code().into(),
            user.updated_at.clone().into(),
            user.id.clone().into(),
        ],
    ))
    .await
    .context("Failed to update user")?;

    Ok(())
}

/// Update password hash
pub async fn update_password(user_id: &str, password_hash: &str) -> Result<()> {
    let conn = get_connection();
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET password_hash = ?, updated_at = ? WHERE id = ?",
        [password_hash.into(), now.into(), user_id.into()],
    ))
    .await?;

    Ok(())
}

/// Update last login timestamp
pub async fn update_last_login(user_id: &str) -> Result<()> {
    let conn = get_connection();
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET last_login_at = ? WHERE id = ?",
        [now.into(), user_id.into()],
    ))
    .await?;

    Ok(())
}

/// Delete user and their refresh tokens
pub async fn delete(user_id: &str) -> Result<bool> {
    let conn = get_connection();
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "DELETE FROM sys_refresh_tokens WHERE user_id = ?",
        [user_id.into()],
    ))
    .await?;
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM sys_users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Count users
pub async fn count_users() -> Result<i64> {
    let conn = get_connection();
    let row = conn
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) as count FROM sys_users".to_string(),
        ))
        .await?;

    match row {
        Some(row) => Ok(row.try_get("", "count")?),
        None => Ok(0),
    }
}
