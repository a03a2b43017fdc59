use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::{Role, TokenClaims};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

const ACCESS_TOKEN_LIFETIME_HOURS: i64 = 24;
const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 90;

/// Build claims for a user, valid for `ACCESS_TOKEN_LIFETIME_HOURS`
pub fn build_claims(user_id: &str, email: &str, role: Role) -> TokenClaims {
    let now = Utc::now();
    TokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp: (now + chrono::Duration::hours(ACCESS_TOKEN_LIFETIME_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    }
}

pub fn encode_claims(claims: &TokenClaims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

pub fn decode_claims(token: &str, secret: &str) -> Result<TokenClaims> {
    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;
    Ok(data.claims)
}

/// Generate JWT access token carrying the user's role
pub async fn generate_access_token(user_id: &str, email: &str, role: Role) -> Result<String> {
    let secret = get_jwt_secret().await?;
    encode_claims(&build_claims(user_id, email, role), &secret)
}

/// Validate JWT token and extract claims
pub async fn validate_token(token: &str) -> Result<TokenClaims> {
    let secret = get_jwt_secret().await?;
    decode_claims(token, &secret)
}

/// Generate refresh token (UUID-based)
pub fn generate_refresh_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn calculate_refresh_token_expiration() -> String {
    (Utc::now() + chrono::Duration::days(REFRESH_TOKEN_LIFETIME_DAYS)).to_rfc3339()
}

/// Get or create the JWT secret stored in sys_settings
pub async fn get_jwt_secret() -> Result<String> {
    match get_jwt_secret_from_db().await {
        Ok(Some(secret)) => Ok(secret),
        Ok(None) | Err(_) => {
            let secret = generate_jwt_secret();
            if let Err(e) = save_jwt_secret_to_db(&secret).await {
                tracing::warn!("Failed to persist JWT secret: {}", e);
            }
            Ok(secret)
        }
    }
}

/// 256-bit random secret, base64
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let bytes: [u8; 32] = rand::thread_rng().gen();
    general_purpose::STANDARD.encode(bytes)
}

async fn get_jwt_secret_from_db() -> Result<Option<String>> {
    use crate::shared::data::db::get_connection;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            ["jwt_secret".into()],
        ))
        .await?;

    match row {
        Some(row) => Ok(Some(row.try_get("", "value")?)),
        None => Ok(None),
    }
}

async fn save_jwt_secret_to_db(secret: &str) -> Result<()> {
    use crate::shared::data::db::get_connection;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let now = Utc::now().to_rfc3339();
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR IGNORE INTO sys_settings (key, value, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            [
                "jwt_secret".into(),
                secret.to_string().into(),
                "Auto-generated JWT secret".into(),
                now.clone().into(),
                now.into(),
            ],
        ))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_roundtrip_keeps_role() {
        let secret = generate_jwt_secret();
        let claims = build_claims("u-1", "expert@petro.dz", Role::Expert);
        let token = encode_claims(&claims, &secret).unwrap();
        let decoded = decode_claims(&token, &secret).unwrap();
        assert_eq!(decoded.sub, "u-1");
        assert_eq!(decoded.role, Role::Expert);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let claims = build_claims("u-1", "a@b.c", Role::TopManagement);
        let token = encode_claims(&claims, "one").unwrap();
        assert!(decode_claims(&token, "two").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut claims = build_claims("u-1", "a@b.c", Role::IngenieurTerrain);
        claims.exp = (Utc::now() - chrono::Duration::hours(2)).timestamp() as usize;
        let token = encode_claims(&claims, "s").unwrap();
        assert!(decode_claims(&token, "s").is_err());
    }

    #[test]
    fn test_secret_is_random() {
        assert_ne!(generate_jwt_secret(), generate_jwt_secret());
    }
}
