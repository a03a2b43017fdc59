use contracts::domain::a008_team_member::aggregate::{
    AssignMemberDto, TeamMember, TeamMemberView, UpdateMemberDto,
};
use gloo_net::http::Method;

use crate::shared::api_utils::{delete, get_json, send_json};

pub async fn fetch_team(project_id: &str) -> Result<Vec<TeamMemberView>, String> {
    get_json(&format!("/api/projects/{}/team", project_id)).await
}

pub async fn assign(project_id: &str, dto: &AssignMemberDto) -> Result<serde_json::Value, String> {
    send_json(Method::POST, &format!("/api/projects/{}/team", project_id), dto).await
}

pub async fn unassign(project_id: &str, user_id: &str) -> Result<(), String> {
    delete(&format!("/api/projects/{}/team/{}", project_id, user_id)).await
}

pub async fn update_role(project_id: &str, user_id: &str, dto: &UpdateMemberDto) -> Result<TeamMember, String> {
    send_json(
        Method::PUT,
        &format!("/api/projects/{}/team/{}", project_id, user_id),
        dto,
    )
    .await
}
