use contracts::dashboards::d401_project::dto::PhaseDetail;
use contracts::domain::a002_phase::aggregate::{Phase, ReorderRequest};
use gloo_net::http::Method;

use crate::shared::api_utils::{delete, get_json, send_json};

pub async fn fetch_phases(project_id: &str) -> Result<Vec<Phase>, String> {
    get_json(&format!("/api/projects/{}/phases", project_id)).await
}

/// Фаза с операциями и показателями светофора
pub async fn fetch_phase_detail(id: &str) -> Result<PhaseDetail, String> {
    get_json(&format!("/api/phases/{}", id)).await
}

pub async fn reorder(project_id: &str, ids: Vec<String>) -> Result<Vec<Phase>, String> {
    send_json(
        Method::POST,
        &format!("/api/projects/{}/phases/order", project_id),
        &ReorderRequest { ids },
    )
    .await
}

pub async fn delete_phase(id: &str) -> Result<(), String> {
    delete(&format!("/api/phases/{}", id)).await
}
