use contracts::domain::a001_project::aggregate::{Project, ProjectDto, ProjectFilter};
use contracts::enums::WorkStatus;
use gloo_net::http::Method;
use serde_json::json;

use crate::shared::api_utils::{created_id, get_json, send_json, with_query};

pub async fn fetch_projects(filter: &ProjectFilter) -> Result<Vec<Project>, String> {
    get_json(&with_query("/api/projects", filter)).await
}

pub async fn fetch_project(id: &str) -> Result<Project, String> {
    get_json(&format!("/api/projects/{}", id)).await
}

pub async fn create_project(dto: &ProjectDto) -> Result<String, String> {
    let value: serde_json::Value = send_json(Method::POST, "/api/projects", dto).await?;
    Ok(created_id(&value))
}

pub async fn set_status(id: &str, status: WorkStatus) -> Result<Project, String> {
    send_json(
        Method::PATCH,
        &format!("/api/projects/{}/status", id),
        &json!({ "status": status }),
    )
    .await
}

pub async fn set_responsible(id: &str, responsible_id: Option<String>) -> Result<Project, String> {
    send_json(
        Method::PATCH,
        &format!("/api/projects/{}/responsible", id),
        &json!({ "responsible_id": responsible_id }),
    )
    .await
}
