use contracts::dashboards::d401_project::dto::OperationDetail;
use contracts::domain::a003_operation::aggregate::{Operation, ProgressUpdate};
use gloo_net::http::Method;

use crate::shared::api_utils::{get_json, send_json};

/// Операция с порогами и показателями светофора
pub async fn fetch_operation_detail(id: &str) -> Result<OperationDetail, String> {
    get_json(&format!("/api/operations/{}", id)).await
}

pub async fn set_progress(id: &str, progress: f64) -> Result<Operation, String> {
    send_json(
        Method::PATCH,
        &format!("/api/operations/{}/progress", id),
        &ProgressUpdate { progress },
    )
    .await
}
