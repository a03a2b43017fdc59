//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs and making
//! authenticated JSON requests with the bearer token from session storage.

use gloo_net::http::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::system::auth::storage::{self, BrowserStorage};

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Appends the serialized filter as a query string; `None` fields are skipped
pub fn with_query<Q: Serialize>(path: &str, query: &Q) -> String {
    match serde_qs::to_string(query) {
        Ok(qs) if !qs.is_empty() => format!("{}?{}", path, qs),
        Ok(_) => path.to_string(),
        Err(e) => {
            log::warn!("Failed to encode query for {}: {}", path, e);
            path.to_string()
        }
    }
}

fn request(method: Method, path: &str) -> RequestBuilder {
    let builder = RequestBuilder::new(&api_url(path)).method(method);
    match storage::access_token(&BrowserStorage) {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

/// Human readable message for a failed response
pub fn status_message(status: u16) -> String {
    match status {
        400 => "Données invalides".to_string(),
        401 => "Session expirée, veuillez vous reconnecter".to_string(),
        403 => "Accès refusé".to_string(),
        404 => "Élément introuvable".to_string(),
        409 => "Conflit: l'élément existe déjà".to_string(),
        s => format!("Erreur serveur ({})", s),
    }
}

async fn check(response: Response) -> Result<Response, String> {
    if response.ok() {
        Ok(response)
    } else {
        Err(status_message(response.status()))
    }
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let response = request(Method::GET, path)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    check(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn send_json<B: Serialize, T: DeserializeOwned>(
    method: Method,
    path: &str,
    body: &B,
) -> Result<T, String> {
    let response = request(method, path)
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    check(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn send_json_no_content<B: Serialize>(
    method: Method,
    path: &str,
    body: &B,
) -> Result<(), String> {
    let response = request(method, path)
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    check(response).await.map(|_| ())
}

/// Request without a body; the JSON reply is decoded into `T`
pub async fn send_empty<T: DeserializeOwned>(method: Method, path: &str) -> Result<T, String> {
    let response = request(method, path)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    check(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn delete(path: &str) -> Result<(), String> {
    let response = request(Method::DELETE, path)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    check(response).await.map(|_| ())
}

/// Reads the `id` field of a creation reply
pub fn created_id(value: &serde_json::Value) -> String {
    value["id"].as_str().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a006_problem::aggregate::ProblemFilter;
    use contracts::enums::{ProblemStatus, Severity};

    #[test]
    fn test_with_query_skips_empty_filter() {
        assert_eq!(with_query("/api/problems", &ProblemFilter::default()), "/api/problems");
    }

    #[test]
    fn test_with_query_encodes_codes() {
        let filter = ProblemFilter {
            status: Some(ProblemStatus::Open),
            severity: Some(Severity::Critical),
            ..Default::default()
        };
        let url = with_query("/api/problems", &filter);
        assert!(url.starts_with("/api/problems?"));
        assert!(url.contains("status=OUVERT"));
        assert!(url.contains("severity=CRITIQUE"));
    }

    #[test]
    fn test_status_message() {
        assert_eq!(status_message(403), "Accès refusé");
        assert_eq!(status_message(502), "Erreur serveur (502)");
    }

    #[test]
    fn test_created_id() {
        assert_eq!(created_id(&serde_json::json!({"id": "abc"})), "abc");
        assert_eq!(created_id(&serde_json::json!({})), "");
    }
}
