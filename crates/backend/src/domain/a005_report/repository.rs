use chrono::Utc;
use contracts::domain::a001_project::aggregate::ProjectId;
use contracts::domain::a002_phase::aggregate::PhaseId;
use contracts::domain::a003_operation::aggregate::OperationId;
use contracts::domain::a005_report::aggregate::{Report, ReportFilter, ReportId};
use contracts::domain::common::EntityMetadata;
use contracts::enums::ReportStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: String,
    pub phase_id: Option<String>,
    pub operation_id: Option<String>,
    pub report_type: String,
    pub file_name: String,
    pub file_path: Option<String>,
    pub imported_by: String,
    pub status: String,
    pub comments: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn parse_opt(s: Option<String>) -> Option<Uuid> {
    s.and_then(|v| Uuid::parse_str(&v).ok())
}

impl From<Model> for Report {
    fn from(m: Model) -> Self {
        Report {
            id: ReportId(Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4())),
            project_id: ProjectId(Uuid::parse_str(&m.project_id).unwrap_or_default()),
            phase_id: parse_opt(m.phase_id).map(PhaseId),
            operation_id: parse_opt(m.operation_id).map(OperationId),
            report_type: m.report_type,
            file_name: m.file_name,
            file_path: m.file_path,
            imported_by: m.imported_by,
            status: ReportStatus::from_code(&m.status).unwrap_or_default(),
            comments: m.comments,
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

fn to_active(r: &Report) -> ActiveModel {
    ActiveModel {
        id: Set(r.id.value().to_string()),
        project_id: Set(r.project_id.value().to_string()),
        phase_id: Set(r.phase_id.map(|id| id.value().to_string())),
        operation_id: Set(r.operation_id.map(|id| id.value().to_string())),
        report_type: Set(r.report_type.clone()),
        file_name: Set(r.file_name.clone()),
        file_path: Set(r.file_path.clone()),
        imported_by: Set(r.imported_by.clone()),
        status: Set(r.status.code().to_string()),
        comments: Set(r.comments.clone()),
        created_at: Set(Some(r.metadata.created_at)),
        updated_at: Set(Some(r.metadata.updated_at)),
        version: Set(r.metadata.version),
    }
}

pub async fn list(filter: &ReportFilter) -> anyhow::Result<Vec<Report>> {
    let mut query = Entity::find();
    if let Some(project_id) = filter.project_id.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(Column::ProjectId.eq(project_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status.code()));
    }
    if let Some(by) = filter.imported_by.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(Column::ImportedBy.eq(by));
    }
    let items = query
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Report>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(r: &Report) -> anyhow::Result<Uuid> {
    to_active(r).insert(conn()).await?;
    Ok(r.id.value())
}

pub async fn update(r: &Report) -> anyhow::Result<()> {
    let mut active = to_active(r);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
