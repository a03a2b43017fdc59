use chrono::{DateTime, Utc};
use contracts::domain::a001_project::aggregate::ProjectId;
use contracts::domain::a002_phase::aggregate::PhaseId;
use contracts::domain::a003_operation::aggregate::OperationId;
use contracts::domain::a009_alert::aggregate::{Alert, AlertFilter, AlertId};
use contracts::domain::common::EntityMetadata;
use contracts::enums::{AlertKind, AlertLevel, AlertStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a009_alert")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: Option<String>,
    pub phase_id: Option<String>,
    pub operation_id: Option<String>,
    pub kind: String,
    pub level: String,
    pub message: String,
    pub status: String,
    pub read_by: Option<String>,
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
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

impl From<Model> for Alert {
    fn from(m: Model) -> Self {
        Alert {
            id: AlertId(Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4())),
            project_id: parse_opt(m.project_id).map(ProjectId),
            phase_id: parse_opt(m.phase_id).map(PhaseId),
            operation_id: parse_opt(m.operation_id).map(OperationId),
            kind: AlertKind::from_code(&m.kind).unwrap_or(AlertKind::ThresholdExceeded),
            level: AlertLevel::from_code(&m.level).unwrap_or(AlertLevel::Info),
            message: m.message,
            status: AlertStatus::from_code(&m.status).unwrap_or_default(),
            read_by: m.read_by,
            read_at: m.read_at,
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

fn to_active(a: &Alert) -> ActiveModel {
    ActiveModel {
        id: Set(a.id.value().to_string()),
        project_id: Set(a.project_id.map(|id| id.value().to_string())),
        phase_id: Set(a.phase_id.map(|id| id.value().to_string())),
        operation_id: Set(a.operation_id.map(|id| id.value().to_string())),
        kind: Set(a.kind.code().to_string()),
        level: Set(a.level.code().to_string()),
        message: Set(a.message.clone()),
        status: Set(a.status.code().to_string()),
        read_by: Set(a.read_by.clone()),
        read_at: Set(a.read_at),
        created_at: Set(Some(a.metadata.created_at)),
        updated_at: Set(Some(a.metadata.updated_at)),
        version: Set(a.metadata.version),
    }
}

pub async fn list(filter: &AlertFilter) -> anyhow::Result<Vec<Alert>> {
    let mut query = Entity::find();
    if let Some(project_id) = filter.project_id.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(Column::ProjectId.eq(project_id));
    }
    if let Some(level) = filter.level {
        query = query.filter(Column::Level.eq(level.code()));
    }
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status.code()));
    }
    if let Some(kind) = filter.kind {
        query = query.filter(Column::Kind.eq(kind.code()));
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

/// Есть ли открытая (NON_LU или LU) тревога того же вида по той же цели
pub async fn exists_open(
    kind: AlertKind,
    project_id: Option<Uuid>,
    phase_id: Option<Uuid>,
    operation_id: Option<Uuid>,
) -> anyhow::Result<bool> {
    let target = |col: Column, id: Option<Uuid>| match id {
        Some(id) => col.eq(id.to_string()),
        None => col.is_null(),
    };
    let count = Entity::find()
        .filter(Column::Kind.eq(kind.code()))
        .filter(Column::Status.is_in([AlertStatus::Unread.code(), AlertStatus::Read.code()]))
        .filter(target(Column::ProjectId, project_id))
        .filter(target(Column::PhaseId, phase_id))
        .filter(target(Column::OperationId, operation_id))
        .count(conn())
        .await?;
    Ok(count > 0)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Alert>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(a: &Alert) -> anyhow::Result<Uuid> {
    to_active(a).insert(conn()).await?;
    Ok(a.id.value())
}

pub async fn update(a: &Alert) -> anyhow::Result<()> {
    let mut active = to_active(a);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

/// Отметить все непрочитанные как прочитанные (опционально в пределах проекта)
pub async fn mark_all_read(project_id: Option<Uuid>, by: &str) -> anyhow::Result<u64> {
    use sea_orm::sea_query::Expr;
    let now = Utc::now();
    let mut update = Entity::update_many()
        .col_expr(Column::Status, Expr::value(AlertStatus::Read.code()))
        .col_expr(Column::ReadBy, Expr::value(by.to_string()))
        .col_expr(Column::ReadAt, Expr::value(now))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Status.eq(AlertStatus::Unread.code()));
    if let Some(project_id) = project_id {
        update = update.filter(Column::ProjectId.eq(project_id.to_string()));
    }
    let result = update.exec(conn()).await?;
    Ok(result.rows_affected)
}

/// Удалить обработанные тревоги старше `before`
pub async fn purge_treated_before(before: DateTime<Utc>) -> anyhow::Result<u64> {
    let result = Entity::delete_many()
        .filter(Column::Status.eq(AlertStatus::Treated.code()))
        .filter(Column::UpdatedAt.lt(before))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_by_project(project_id: Uuid) -> anyhow::Result<u64> {
    let result = Entity::delete_many()
        .filter(Column::ProjectId.eq(project_id.to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}
