use chrono::Utc;
use contracts::domain::a001_project::aggregate::ProjectId;
use contracts::domain::a002_phase::aggregate::PhaseId;
use contracts::domain::a003_operation::aggregate::OperationId;
use contracts::domain::a005_report::aggregate::ReportId;
use contracts::domain::a006_problem::aggregate::{EntityKind, Problem, ProblemFilter, ProblemId};
use contracts::domain::common::EntityMetadata;
use contracts::enums::{ProblemStatus, Severity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a006_problem")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: Option<String>,
    pub phase_id: Option<String>,
    pub operation_id: Option<String>,
    pub report_id: Option<String>,
    pub title: String,
    pub description: String,
    pub severity: String,
    pub status: String,
    pub reported_by: String,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<chrono::DateTime<chrono::Utc>>,
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

impl From<Model> for Problem {
    fn from(m: Model) -> Self {
        Problem {
            id: ProblemId(Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4())),
            project_id: parse_opt(m.project_id).map(ProjectId),
            phase_id: parse_opt(m.phase_id).map(PhaseId),
            operation_id: parse_opt(m.operation_id).map(OperationId),
            report_id: parse_opt(m.report_id).map(ReportId),
            title: m.title,
            description: m.description,
            severity: Severity::from_code(&m.severity).unwrap_or_default(),
            status: ProblemStatus::from_code(&m.status).unwrap_or_default(),
            reported_by: m.reported_by,
            resolved_by: m.resolved_by,
            resolved_at: m.resolved_at,
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

fn to_active(p: &Problem) -> ActiveModel {
    ActiveModel {
        id: Set(p.id.value().to_string()),
        project_id: Set(p.project_id.map(|id| id.value().to_string())),
        phase_id: Set(p.phase_id.map(|id| id.value().to_string())),
        operation_id: Set(p.operation_id.map(|id| id.value().to_string())),
        report_id: Set(p.report_id.map(|id| id.value().to_string())),
        title: Set(p.title.clone()),
        description: Set(p.description.clone()),
        severity: Set(p.severity.code().to_string()),
        status: Set(p.status.code().to_string()),
        reported_by: Set(p.reported_by.clone()),
        resolved_by: Set(p.resolved_by.clone()),
        resolved_at: Set(p.resolved_at),
        created_at: Set(Some(p.metadata.created_at)),
        updated_at: Set(Some(p.metadata.updated_at)),
        version: Set(p.metadata.version),
    }
}

fn filtered(filter: &ProblemFilter) -> Select<Entity> {
    let non_empty = |s: &Option<String>| s.clone().filter(|v| !v.is_empty());
    let mut query = Entity::find();
    if let Some(id) = non_empty(&filter.project_id) {
        query = query.filter(Column::ProjectId.eq(id));
    }
    if let Some(id) = non_empty(&filter.phase_id) {
        query = query.filter(Column::PhaseId.eq(id));
    }
    if let Some(id) = non_empty(&filter.operation_id) {
        query = query.filter(Column::OperationId.eq(id));
    }
    if let Some(severity) = filter.severity {
        query = query.filter(Column::Severity.eq(severity.code()));
    }
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status.code()));
    }
    query
}

/// Страница проблем, новые сверху
pub async fn list_paginated(filter: &ProblemFilter) -> anyhow::Result<(Vec<Problem>, u64)> {
    let (page, size) = filter.paging();
    let total = filtered(filter).count(conn()).await?;
    let items = filtered(filter)
        .order_by_desc(Column::CreatedAt)
        .limit(size)
        .offset((page - 1) * size)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok((items, total))
}

/// Все проблемы по фильтру (без пагинации; для статистики)
pub async fn list_all(filter: &ProblemFilter) -> anyhow::Result<Vec<Problem>> {
    let items = filtered(filter)
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn list_by_entity(kind: EntityKind, id: Uuid) -> anyhow::Result<Vec<Problem>> {
    let column = match kind {
        EntityKind::Project => Column::ProjectId,
        EntityKind::Phase => Column::PhaseId,
        EntityKind::Operation => Column::OperationId,
    };
    let items = Entity::find()
        .filter(column.eq(id.to_string()))
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Problem>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(p: &Problem) -> anyhow::Result<Uuid> {
    to_active(p).insert(conn()).await?;
    Ok(p.id.value())
}

pub async fn update(p: &Problem) -> anyhow::Result<()> {
    let mut active = to_active(p);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
