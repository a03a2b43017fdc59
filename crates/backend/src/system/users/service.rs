use anyhow::Result;
use chrono::Utc;
use contracts::system::auth::AccountStatus;
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};

use super::repository;
use crate::shared::error::{conflict, forbidden, not_found, validation};
use crate::system::auth::password;

fn validate_identity(nom: &str, prenom: &str, email: &str) -> Result<()> {
    if nom.trim().is_empty() || prenom.trim().is_empty() {
        return Err(validation("Le nom et le prénom sont obligatoires"));
    }
    if !is_valid_email(email) {
        return Err(validation("Adresse email invalide"));
    }
    Ok(())
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

/// Create a new user
pub async fn create(dto: CreateUserDto, created_by: Option<String>) -> Result<String> {
    validate_identity(&dto.nom, &dto.prenom, &dto.email)?;

    if repository::get_by_email(&dto.email).await?.is_some() {
        return Err(conflict("Un utilisateur avec cet email existe déjà"));
    }

    password::validate_password_strength(&dto.password)?;
    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        nom: dto.nom.trim().to_string(),
        prenom: dto.prenom.trim().to_string(),
        email: dto.email.trim().to_lowercase(),
        role: dto.role,
        statut: AccountStatus::Active,
        date_creation: now.clone(),
        updated_at: now,
        last_login_at: None,
        created_by,
    };

    repository::create_with_password(&user, &password_hash).await?;
    tracing::info!("User {} created with role {}", user.email, user.role);

    Ok(user_id)
}

/// Update user. Role and status only change when `privileged` is set.
pub async fn update(dto: UpdateUserDto, privileged: bool) -> Result<User> {
    let mut user = repository::get_by_id(&dto.id)
        .await?
        .ok_or_else(|| not_found("Utilisateur"))?;

    validate_identity(&dto.nom, &dto.prenom, &dto.email)?;

    if let Some(existing) = repository::get_by_email(&dto.email).await? {
        if existing.id != user.id {
            return Err(conflict("Un utilisateur avec cet email existe déjà"));
        }
    }

    user.nom = dto.nom.trim().to_string();
    user.prenom = dto.prenom.trim().to_string();
    user.email = dto.email.trim().to_lowercase();
    if privileged {
        if let Some(role) = dto.role {
            user.role = role;
        }
        if let Some(statut) = dto.statut {
            user.statut = statut;
        }
    }
    user.updated_at = Utc::now().to_rfc3339();

    repository::update(&user).await?;
    Ok(user)
}

/// Delete user; an account cannot delete itself
pub async fn delete(id: &str, requested_by: &str) -> Result<()> {
    if id == requested_by {
        return Err(forbidden("Impossible de supprimer son propre compte"));
    }
    if !repository::delete(id).await? {
        return Err(not_found("Utilisateur"));
    }
    Ok(())
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> Result<Vec<User>> {
    repository::list_all().await
}

/// Verify credentials. Returns the user only for a matching password.
pub async fn verify_credentials(email: &str, password_plain: &str) -> Result<Option<User>> {
    let Some(user) = repository::get_by_email(email).await? else {
        return Ok(None);
    };

    let Some(hash) = repository::get_password_hash(&user.id).await? else {
        return Ok(None);
    };

    if !password::verify_password(password_plain, &hash)? {
        return Ok(None);
    }

    repository::update_last_login(&user.id).await?;
    Ok(Some(user))
}

/// Change own password
pub async fn change_password(user_id: &str, dto: ChangePasswordDto) -> Result<()> {
    let hash = repository::get_password_hash(user_id)
        .await?
        .ok_or_else(|| not_found("Utilisateur"))?;

    if !password::verify_password(&dto.old_password, &hash)? {
        return Err(validation("Ancien mot de passe incorrect"));
    }

    password::validate_password_strength(&dto.new_password)?;
    let new_hash = password::hash_password(&dto.new_password)?;
    repository::update_password(user_id, &new_hash).await?;

    tracing::info!("Password changed for user {}", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("chef@petro.dz"));
        assert!(is_valid_email("  a.b@site.example.com "));
        assert!(!is_valid_email("chef"));
        assert!(!is_valid_email("@petro.dz"));
        assert!(!is_valid_email("chef@localhost"));
    }

    #[test]
    fn test_identity_requires_names() {
        assert!(validate_identity("", "Amel", "a@b.dz").is_err());
        assert!(validate_identity("Haddad", " ", "a@b.dz").is_err());
        assert!(validate_identity("Haddad", "Amel", "a@b.dz").is_ok());
    }
}
