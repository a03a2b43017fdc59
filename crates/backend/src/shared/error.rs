use axum::http::StatusCode;
use thiserror::Error;

/// Ошибки бизнес-логики, которые должны превращаться в конкретный HTTP-статус
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

pub fn not_found(what: impl Into<String>) -> anyhow::Error {
    ServiceError::NotFound(what.into()).into()
}

pub fn validation(msg: impl Into<String>) -> anyhow::Error {
    ServiceError::Validation(msg.into()).into()
}

pub fn forbidden(msg: impl Into<String>) -> anyhow::Error {
    ServiceError::Forbidden(msg.into()).into()
}

pub fn conflict(msg: impl Into<String>) -> anyhow::Error {
    ServiceError::Conflict(msg.into()).into()
}

/// Сопоставить ошибку сервиса статусу ответа; всё, что не `ServiceError`, это 500
pub fn to_status(e: anyhow::Error) -> StatusCode {
    match e.downcast_ref::<ServiceError>() {
        Some(err) => {
            tracing::debug!("{}", err);
            err.status()
        }
        None => {
            tracing::error!("Internal error: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Разобрать UUID из пути запроса
pub fn parse_uuid(id: &str) -> Result<uuid::Uuid, StatusCode> {
    uuid::Uuid::parse_str(id).map_err(|_| StatusCode::BAD_REQUEST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status() {
        assert_eq!(to_status(not_found("project")), StatusCode::NOT_FOUND);
        assert_eq!(to_status(validation("bad")), StatusCode::BAD_REQUEST);
        assert_eq!(to_status(forbidden("no")), StatusCode::FORBIDDEN);
        assert_eq!(to_status(conflict("dup")), StatusCode::CONFLICT);
        assert_eq!(
            to_status(anyhow::anyhow!("db down")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_context_keeps_service_error_visible() {
        use anyhow::Context;
        let e: anyhow::Result<()> = Err(validation("bad")).context("while saving");
        assert_eq!(to_status(e.unwrap_err()), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_uuid() {
        assert!(parse_uuid("nope").is_err());
        assert!(parse_uuid(&uuid::Uuid::new_v4().to_string()).is_ok());
    }
}
