use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo,
};
use contracts::system::users::ChangePasswordDto;
use gloo_net::http::Request;
use std::fmt;

use crate::shared::api_utils::{api_base, send_json_no_content, status_message};

/// Failure of a token check against the server
#[derive(Debug, Clone, PartialEq)]
pub enum AuthFailure {
    /// The server answered with this status
    Rejected(u16),
    /// No usable answer: network error or unreadable body
    Unavailable(String),
}

impl AuthFailure {
    /// Only a definitive refusal ends the local session
    pub fn drops_session(&self) -> bool {
        matches!(self, AuthFailure::Rejected(401 | 403))
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailure::Rejected(status) => write!(f, "{}", status_message(*status)),
            AuthFailure::Unavailable(reason) => write!(f, "Serveur injoignable: {}", reason),
        }
    }
}

/// Sign in with e-mail and password
pub async fn login(email: String, mot_de_passe: String) -> Result<LoginResponse, String> {
    let request = LoginRequest { email, mot_de_passe };

    let response = Request::post(&format!("{}/api/auth/login", api_base()))
        .json(&request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if response.status() == 401 {
        return Err("Email ou mot de passe incorrect".to_string());
    }
    if !response.ok() {
        return Err(format!("Échec de la connexion: {}", response.status()));
    }

    response
        .json::<LoginResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Exchange a refresh token for a new access token
pub async fn refresh_token(refresh_token: String) -> Result<RefreshResponse, AuthFailure> {
    let request = RefreshRequest { refresh_token };

    let response = Request::post(&format!("{}/api/auth/refresh", api_base()))
        .json(&request)
        .map_err(|e| AuthFailure::Unavailable(e.to_string()))?
        .send()
        .await
        .map_err(|e| AuthFailure::Unavailable(e.to_string()))?;

    if !response.ok() {
        return Err(AuthFailure::Rejected(response.status()));
    }

    response
        .json::<RefreshResponse>()
        .await
        .map_err(|e| AuthFailure::Unavailable(e.to_string()))
}

/// Revoke the refresh token on the server
pub async fn logout(refresh_token: String) -> Result<(), String> {
    let request = RefreshRequest { refresh_token };

    let response = Request::post(&format!("{}/api/auth/logout", api_base()))
        .json(&request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Logout failed: {}", response.status()));
    }

    Ok(())
}

/// Profile of the token owner
pub async fn get_current_user(access_token: &str) -> Result<UserInfo, AuthFailure> {
    let response = Request::get(&format!("{}/api/auth/profile", api_base()))
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| AuthFailure::Unavailable(e.to_string()))?;

    if !response.ok() {
        return Err(AuthFailure::Rejected(response.status()));
    }

    response
        .json::<UserInfo>()
        .await
        .map_err(|e| AuthFailure::Unavailable(e.to_string()))
}

pub async fn change_password(dto: &ChangePasswordDto) -> Result<(), String> {
    send_json_no_content(gloo_net::http::Method::POST, "/api/auth/change-password", dto).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_refusals_drop_the_session() {
        assert!(AuthFailure::Rejected(401).drops_session());
        assert!(AuthFailure::Rejected(403).drops_session());
        assert!(!AuthFailure::Rejected(500).drops_session());
        assert!(!AuthFailure::Rejected(503).drops_session());
        assert!(!AuthFailure::Unavailable("Failed to fetch".into()).drops_session());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            AuthFailure::Rejected(401).to_string(),
            "Session expirée, veuillez vous reconnecter"
        );
        assert!(AuthFailure::Unavailable("timeout".into())
            .to_string()
            .ends_with("timeout"));
    }
}
