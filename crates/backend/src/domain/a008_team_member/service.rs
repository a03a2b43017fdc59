use anyhow::Result;
use contracts::domain::a001_project::aggregate::ProjectId;
use contracts::domain::a008_team_member::aggregate::{
    AssignMemberDto, TeamMember, TeamMemberView, UpdateMemberDto,
};
use uuid::Uuid;

use super::repository;
use crate::domain::a001_project;
use crate::shared::error::{conflict, not_found, validation};
use crate::system::users;

pub async fn list(project_id: Uuid) -> Result<Vec<TeamMemberView>> {
    repository::list_views_by_project(project_id).await
}

/// Назначить пользователя в команду проекта (пара проект/пользователь уникальна)
pub async fn assign(project_id: Uuid, dto: AssignMemberDto, by: &str) -> Result<TeamMember> {
    a001_project::service::get_required(project_id).await?;

    let member = TeamMember::new_for_insert(ProjectId(project_id), &dto, by);
    member.validate().map_err(validation)?;

    if users::service::get_by_id(&member.user_id).await?.is_none() {
        return Err(not_found(format!("Utilisateur {}", member.user_id)));
    }
    if repository::find(project_id, &member.user_id).await?.is_some() {
        return Err(conflict("Cet utilisateur fait déjà partie de l'équipe"));
    }

    repository::insert(&member).await?;
    tracing::info!("User {} assigned to project {}", member.user_id, project_id);
    Ok(member)
}

pub async fn update_role(
    project_id: Uuid,
    user_id: &str,
    dto: UpdateMemberDto,
) -> Result<TeamMember> {
    let mut member = repository::find(project_id, user_id)
        .await?
        .ok_or_else(|| not_found("Membre de l'équipe"))?;
    member.project_role = dto.project_role.trim().to_string();
    member.validate().map_err(validation)?;
    member.metadata.touch();
    repository::update_role(&member).await?;
    Ok(member)
}

pub async fn unassign(project_id: Uuid, user_id: &str) -> Result<()> {
    if !repository::delete(project_id, user_id).await? {
        return Err(not_found("Membre de l'équipe"));
    }
    Ok(())
}
