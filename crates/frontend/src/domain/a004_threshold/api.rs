use contracts::domain::a004_threshold::aggregate::{Threshold, ThresholdDto};
use gloo_net::http::Method;

use crate::shared::api_utils::{created_id, send_json};

pub async fn create_threshold(operation_id: &str, dto: &ThresholdDto) -> Result<String, String> {
    let value: serde_json::Value = send_json(
        Method::POST,
        &format!("/api/operations/{}/thresholds", operation_id),
        dto,
    )
    .await?;
    Ok(created_id(&value))
}

pub async fn update_threshold(id: &str, dto: &ThresholdDto) -> Result<Threshold, String> {
    send_json(Method::PUT, &format!("/api/thresholds/{}", id), dto).await
}
