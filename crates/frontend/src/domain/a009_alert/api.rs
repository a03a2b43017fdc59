use contracts::domain::a009_alert::aggregate::{Alert, AlertFilter, AlertStats};
use contracts::enums::AlertStatus;

use gloo_net::http::Method;

use crate::shared::api_utils::{get_json, send_empty, with_query};

pub async fn fetch_alerts(filter: &AlertFilter) -> Result<Vec<Alert>, String> {
    get_json(&with_query("/api/alerts", filter)).await
}

pub async fn fetch_unread(project_id: &str) -> Result<Vec<Alert>, String> {
    fetch_alerts(&AlertFilter {
        project_id: Some(project_id.to_string()),
        status: Some(AlertStatus::Unread),
        ..Default::default()
    })
    .await
}

pub async fn statistics(project_id: Option<&str>) -> Result<AlertStats, String> {
    let filter = AlertFilter {
        project_id: project_id.map(str::to_string),
        ..Default::default()
    };
    get_json(&with_query("/api/alerts/statistics", &filter)).await
}

pub async fn mark_read(id: &str) -> Result<Alert, String> {
    send_empty(Method::POST, &format!("/api/alerts/{}/read", id)).await
}

pub async fn mark_all_read(project_id: &str) -> Result<serde_json::Value, String> {
    send_empty(
        Method::POST,
        &format!("/api/alerts/read-all?project_id={}", project_id),
    )
    .await
}
