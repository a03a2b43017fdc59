use contracts::domain::a006_problem::aggregate::{
    EntityKind, Page, Problem, ProblemDto, ProblemFilter, ProblemStats,
};
use contracts::enums::ProblemStatus;
use gloo_net::http::Method;
use serde_json::json;

use crate::shared::api_utils::{created_id, get_json, send_json, with_query};

pub async fn fetch_problems(filter: &ProblemFilter) -> Result<Page<Problem>, String> {
    get_json(&with_query("/api/problems", filter)).await
}

pub fn entity_code(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Project => "project",
        EntityKind::Phase => "phase",
        EntityKind::Operation => "operation",
    }
}

pub async fn fetch_for_entity(kind: EntityKind, id: &str) -> Result<Vec<Problem>, String> {
    get_json(&format!("/api/problems/entity/{}/{}", entity_code(kind), id)).await
}

pub async fn create_problem(dto: &ProblemDto) -> Result<String, String> {
    let value: serde_json::Value = send_json(Method::POST, "/api/problems", dto).await?;
    Ok(created_id(&value))
}

pub async fn fetch_statistics(filter: &ProblemFilter) -> Result<ProblemStats, String> {
    get_json(&with_query("/api/problems/statistics", filter)).await
}

pub async fn set_status(id: &str, status: ProblemStatus) -> Result<Problem, String> {
    send_json(
        Method::PATCH,
        &format!("/api/problems/{}/status", id),
        &json!({ "status": status }),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_code_matches_server_codes() {
        for kind in [EntityKind::Project, EntityKind::Phase, EntityKind::Operation] {
            assert_eq!(EntityKind::from_code(entity_code(kind)), Some(kind));
        }
    }
}
