use contracts::domain::a005_report::aggregate::{Report, ReportDto, ReportFilter, ReportReview};
use gloo_net::http::Method;

use crate::shared::api_utils::{created_id, get_json, send_json, with_query};

pub async fn fetch_reports(filter: &ReportFilter) -> Result<Vec<Report>, String> {
    get_json(&with_query("/api/reports", filter)).await
}

pub async fn review(id: &str, review: &ReportReview) -> Result<Report, String> {
    send_json(Method::PUT, &format!("/api/reports/{}/review", id), review).await
}

/// Регистрация загруженного отчёта; передаётся только имя файла, без содержимого
pub async fn create_report(dto: &ReportDto) -> Result<String, String> {
    let value: serde_json::Value = send_json(Method::POST, "/api/reports", dto).await?;
    Ok(created_id(&value))
}
