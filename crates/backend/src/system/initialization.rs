use anyhow::Result;
use contracts::system::auth::Role;
use contracts::system::users::CreateUserDto;

use crate::system::users::{repository, service};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@petromonitor.local";

/// Ensure a top management account exists (create if table is empty)
pub async fn ensure_default_user_exists() -> Result<()> {
    let count = repository::count_users().await?;
    if count > 0 {
        return Ok(());
    }

    tracing::info!("No users found. Creating default top management account...");

    let dto = CreateUserDto {
        nom: "Administrateur".to_string(),
        prenom: "PetroMonitor".to_string(),
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        password: "admin".to_string(),
        role: Role::TopManagement,
    };

    let admin_id = service::create(dto, None).await?;

    tracing::warn!("Default top management account created");
    tracing::warn!("  Email: {}", DEFAULT_ADMIN_EMAIL);
    tracing::warn!("  Password: admin");
    tracing::warn!("  User ID: {}", admin_id);
    tracing::warn!("  Change the password immediately");

    Ok(())
}
