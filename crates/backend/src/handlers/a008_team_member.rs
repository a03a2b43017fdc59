use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a008_team_member::aggregate::{
    AssignMemberDto, TeamMember, TeamMemberView, UpdateMemberDto,
};

use crate::domain::a008_team_member;
use crate::shared::error::{parse_uuid, to_status};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/projects/:id/team
pub async fn list(Path(project_id): Path<String>) -> Result<Json<Vec<TeamMemberView>>, StatusCode> {
    let project_id = parse_uuid(&project_id)?;
    let items = a008_team_member::service::list(project_id)
        .await
        .map_err(to_status)?;
    Ok(Json(items))
}

/// POST /api/projects/:id/team
pub async fn assign(
    current: CurrentUser,
    Path(project_id): Path<String>,
    Json(dto): Json<AssignMemberDto>,
) -> Result<Json<TeamMember>, StatusCode> {
    let project_id = parse_uuid(&project_id)?;
    let member = a008_team_member::service::assign(project_id, dto, current.id())
        .await
        .map_err(to_status)?;
    Ok(Json(member))
}

/// PUT /api/projects/:id/team/:user_id
pub async fn update_role(
    Path((project_id, user_id)): Path<(String, String)>,
    Json(dto): Json<UpdateMemberDto>,
) -> Result<Json<TeamMember>, StatusCode> {
    let project_id = parse_uuid(&project_id)?;
    let member = a008_team_member::service::update_role(project_id, &user_id, dto)
        .await
        .map_err(to_status)?;
    Ok(Json(member))
}

/// DELETE /api/projects/:id/team/:user_id
pub async fn unassign(
    Path((project_id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, StatusCode> {
    let project_id = parse_uuid(&project_id)?;
    a008_team_member::service::unassign(project_id, &user_id)
        .await
        .map_err(to_status)?;
    Ok(StatusCode::NO_CONTENT)
}
