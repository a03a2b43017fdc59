use serde::{Deserialize, Serialize};

use crate::domain::a001_project::aggregate::ProjectId;
use crate::domain::common::{uuid_id, EntityMetadata};

uuid_id!(TeamMemberId);

/// Участник команды проекта; пара (проект, пользователь) уникальна
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub project_id: ProjectId,
    pub user_id: String,
    pub project_role: String,
    pub assigned_by: Option<String>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

/// Участник вместе с данными пользователя (для экранов команды)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberView {
    #[serde(flatten)]
    pub member: TeamMember,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub role: crate::system::auth::Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignMemberDto {
    pub user_id: String,
    pub project_role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMemberDto {
    pub project_role: String,
}

impl TeamMember {
    pub fn new_for_insert(project_id: ProjectId, dto: &AssignMemberDto, assigned_by: &str) -> Self {
        Self {
            id: TeamMemberId::new_v4(),
            project_id,
            user_id: dto.user_id.clone(),
            project_role: dto.project_role.trim().to_string(),
            assigned_by: Some(assigned_by.to_string()),
            metadata: EntityMetadata::new(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("L'utilisateur est obligatoire".into());
        }
        if self.project_role.is_empty() {
            return Err("Le rôle dans le projet est obligatoire".into());
        }
        Ok(())
    }
}
