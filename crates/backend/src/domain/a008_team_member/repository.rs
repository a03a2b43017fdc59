use chrono::Utc;
use contracts::domain::a001_project::aggregate::ProjectId;
use contracts::domain::a008_team_member::aggregate::{TeamMember, TeamMemberId, TeamMemberView};
use contracts::domain::common::EntityMetadata;
use contracts::system::auth::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseBackend, EntityTrait, QueryFilter, Set, Statement};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a008_team_member")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub project_role: String,
    pub assigned_by: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TeamMember {
    fn from(m: Model) -> Self {
        TeamMember {
            id: TeamMemberId(Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4())),
            project_id: ProjectId(Uuid::parse_str(&m.project_id).unwrap_or_default()),
            user_id: m.user_id,
            project_role: m.project_role,
            assigned_by: m.assigned_by,
            metadata: EntityMetadata {
                created_at: m.created_at.unwrap_or_else(Utc::now),
                updated_at: m.updated_at.unwrap_or_else(Utc::now),
                version: m.version,
            },
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Участники проекта вместе с данными пользователей
pub async fn list_views_by_project(project_id: Uuid) -> anyhow::Result<Vec<TeamMemberView>> {
    let rows = conn()
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT t.id, t.project_id, t.user_id, t.project_role, t.assigned_by,
                    t.created_at, t.updated_at, t.version,
                    u.nom, u.prenom, u.email, u.role
             FROM a008_team_member t
             JOIN sys_users u ON u.id = t.user_id
             WHERE t.project_id = ?
             ORDER BY u.nom, u.prenom",
            [project_id.to_string().into()],
        ))
        .await?;

    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        let model = Model {
            id: row.try_get("", "id")?,
            project_id: row.try_get("", "project_id")?,
            user_id: row.try_get("", "user_id")?,
            project_role: row.try_get("", "project_role")?,
            assigned_by: row.try_get("", "assigned_by")?,
            created_at: row.try_get("", "created_at")?,
            updated_at: row.try_get("", "updated_at")?,
            version: row.try_get("", "version")?,
        };
        let role: String = row.try_get("", "role")?;
        views.push(TeamMemberView {
            member: model.into(),
            nom: row.try_get("", "nom")?,
            prenom: row.try_get("", "prenom")?,
            email: row.try_get("", "email")?,
            role: Role::from_code(&role).unwrap_or(Role::IngenieurTerrain),
        });
    }
    Ok(views)
}

pub async fn find(project_id: Uuid, user_id: &str) -> anyhow::Result<Option<TeamMember>> {
    let result = Entity::find()
        .filter(Column::ProjectId.eq(project_id.to_string()))
        .filter(Column::UserId.eq(user_id))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(member: &TeamMember) -> anyhow::Result<Uuid> {
    let active = ActiveModel {
        id: Set(member.id.value().to_string()),
        project_id: Set(member.project_id.value().to_string()),
        user_id: Set(member.user_id.clone()),
        project_role: Set(member.project_role.clone()),
        assigned_by: Set(member.assigned_by.clone()),
        created_at: Set(Some(member.metadata.created_at)),
        updated_at: Set(Some(member.metadata.updated_at)),
        version: Set(member.metadata.version),
    };
    active.insert(conn()).await?;
    Ok(member.id.value())
}

pub async fn update_role(member: &TeamMember) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(member.id.value().to_string()),
        project_role: Set(member.project_role.clone()),
        updated_at: Set(Some(member.metadata.updated_at)),
        version: Set(member.metadata.version),
        ..Default::default()
    };
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(project_id: Uuid, user_id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_many()
        .filter(Column::ProjectId.eq(project_id.to_string()))
        .filter(Column::UserId.eq(user_id))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete_by_project(project_id: Uuid) -> anyhow::Result<u64> {
    let result = Entity::delete_many()
        .filter(Column::ProjectId.eq(project_id.to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}
