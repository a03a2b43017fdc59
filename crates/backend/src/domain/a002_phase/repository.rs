use chrono::{NaiveDate, Utc};
use contracts::domain::a001_project::aggregate::ProjectId;
use contracts::domain::a002_phase::aggregate::{Phase, PhaseId};
use contracts::domain::common::EntityMetadata;
use contracts::enums::WorkStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_phase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub planned_start: NaiveDate,
    pub planned_end: NaiveDate,
    pub actual_start: Option<NaiveDate>,
    pub actual_end: Option<NaiveDate>,
    pub allocated_budget: f64,
    pub current_cost: f64,
    pub progress: f64,
    pub status: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Phase {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            version: m.version,
        };
        Phase {
            id: PhaseId(Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4())),
            project_id: ProjectId(Uuid::parse_str(&m.project_id).unwrap_or_default()),
            name: m.name,
            description: m.description,
            order: m.sort_order,
            planned_start: m.planned_start,
            planned_end: m.planned_end,
            actual_start: m.actual_start,
            actual_end: m.actual_end,
            allocated_budget: m.allocated_budget,
            current_cost: m.current_cost,
            progress: m.progress,
            status: WorkStatus::from_code(&m.status).unwrap_or_default(),
            metadata,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(p: &Phase) -> ActiveModel {
    ActiveModel {
        id: Set(p.id.value().to_string()),
        project_id: Set(p.project_id.value().to_string()),
        name: Set(p.name.clone()),
        description: Set(p.description.clone()),
        sort_order: Set(p.order),
        planned_start: Set(p.planned_start),
        planned_end: Set(p.planned_end),
        actual_start: Set(p.actual_start),
        actual_end: Set(p.actual_end),
        allocated_budget: Set(p.allocated_budget),
        current_cost: Set(p.current_cost),
        progress: Set(p.progress),
        status: Set(p.status.code().to_string()),
        created_at: Set(Some(p.metadata.created_at)),
        updated_at: Set(Some(p.metadata.updated_at)),
        version: Set(p.metadata.version),
    }
}

/// Фазы проекта в порядке `sort_order`
pub async fn list_by_project(project_id: Uuid) -> anyhow::Result<Vec<Phase>> {
    let items = Entity::find()
        .filter(Column::ProjectId.eq(project_id.to_string()))
        .order_by_asc(Column::SortOrder)
        .order_by_asc(Column::PlannedStart)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn list_all() -> anyhow::Result<Vec<Phase>> {
    let items = Entity::find()
        .order_by_asc(Column::ProjectId)
        .order_by_asc(Column::SortOrder)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn count_by_project(project_id: Uuid) -> anyhow::Result<u64> {
    let count = Entity::find()
        .filter(Column::ProjectId.eq(project_id.to_string()))
        .count(conn())
        .await?;
    Ok(count)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Phase>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(phase: &Phase) -> anyhow::Result<Uuid> {
    to_active(phase).insert(conn()).await?;
    Ok(phase.id.value())
}

pub async fn update(phase: &Phase) -> anyhow::Result<()> {
    let mut active = to_active(phase);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn set_order(id: Uuid, order: i32) -> anyhow::Result<()> {
    use sea_orm::sea_query::Expr;
    Entity::update_many()
        .col_expr(Column::SortOrder, Expr::value(order))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(())
}

pub async fn update_rollup(id: Uuid, current_cost: f64, progress: f64) -> anyhow::Result<()> {
    use sea_orm::sea_query::Expr;
    Entity::update_many()
        .col_expr(Column::CurrentCost, Expr::value(current_cost))
        .col_expr(Column::Progress, Expr::value(progress))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
