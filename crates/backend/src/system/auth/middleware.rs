use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use contracts::system::auth::{Role, TokenClaims};

/// Bearer token of a request, copied out so the request is not held across awaits
fn bearer_token(req: &Request<Body>) -> Result<String, StatusCode> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned)
        .ok_or(StatusCode::UNAUTHORIZED)
}

async fn validate(token: String) -> Result<TokenClaims, StatusCode> {
    super::jwt::validate_token(&token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

async fn require_roles(
    mut req: Request<Body>,
    next: Next,
    allowed: &[Role],
) -> Result<Response, StatusCode> {
    let claims = validate(bearer_token(&req)?).await?;
    if !allowed.is_empty() && !allowed.contains(&claims.role) {
        tracing::debug!(
            "Role {} denied for {} {}",
            claims.role,
            req.method(),
            req.uri().path()
        );
        return Err(StatusCode::FORBIDDEN);
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Any signed-in user
pub async fn require_auth(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    require_roles(req, next, &[]).await
}

/// Top management only (user administration)
pub async fn require_top_management(
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    require_roles(req, next, &[Role::TopManagement]).await
}

/// Reads are open to every signed-in role, writes only to project editors
pub async fn require_editor_for_writes(
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let claims = validate(bearer_token(&req)?).await?;
    if !may_call(claims.role, req.method(), req.uri().path()) {
        tracing::debug!(
            "Write denied for role {}: {} {}",
            claims.role,
            req.method(),
            req.uri().path()
        );
        return Err(StatusCode::FORBIDDEN);
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Writes any signed-in role may perform inside the editor-guarded group
const OPEN_WRITES: &[(&str, &str)] = &[("POST", "/api/problems")];

fn may_call(role: Role, method: &Method, path: &str) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
        || role.can_edit_projects()
        || OPEN_WRITES
            .iter()
            .any(|(m, p)| *m == method.as_str() && *p == path.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_engineer_is_read_only() {
        assert!(may_call(Role::IngenieurTerrain, &Method::GET, "/api/projects"));
        assert!(!may_call(Role::IngenieurTerrain, &Method::POST, "/api/projects"));
        assert!(!may_call(Role::IngenieurTerrain, &Method::DELETE, "/api/phases/1"));
        assert!(may_call(Role::Expert, &Method::PUT, "/api/phases/1"));
        assert!(may_call(Role::TopManagement, &Method::PATCH, "/api/projects/1/status"));
    }

    #[test]
    fn test_field_engineer_may_report_problems() {
        assert!(may_call(Role::IngenieurTerrain, &Method::POST, "/api/problems"));
        assert!(may_call(Role::IngenieurTerrain, &Method::POST, "/api/problems/"));
        assert!(!may_call(Role::IngenieurTerrain, &Method::PUT, "/api/problems/p1"));
        assert!(!may_call(Role::IngenieurTerrain, &Method::PATCH, "/api/problems/p1/status"));
        assert!(!may_call(Role::IngenieurTerrain, &Method::DELETE, "/api/problems/p1"));
    }

    #[test]
    fn test_bearer_token_is_required() {
        let req = Request::builder()
            .uri("/api/projects")
            .header("Authorization", "Bearer abc.def")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req).unwrap(), "abc.def");

        let req = Request::builder()
            .uri("/api/projects")
            .header("Authorization", "Basic abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req), Err(StatusCode::UNAUTHORIZED));
    }
}
