use chrono::{NaiveDate, Utc};
use contracts::domain::a002_phase::aggregate::PhaseId;
use contracts::domain::a003_operation::aggregate::{Operation, OperationId};
use contracts::domain::common::EntityMetadata;
use contracts::enums::WorkStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_operation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub phase_id: String,
    pub name: String,
    pub description: Option<String>,
    pub operation_type: String,
    pub sort_order: i32,
    pub planned_start: NaiveDate,
    pub planned_end: NaiveDate,
    pub actual_start: Option<NaiveDate>,
    pub actual_end: Option<NaiveDate>,
    pub planned_cost: f64,
    pub actual_cost: f64,
    pub progress: f64,
    pub status: String,
    pub responsible_id: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Operation {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            version: m.version,
        };
        Operation {
            id: OperationId(Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4())),
            phase_id: PhaseId(Uuid::parse_str(&m.phase_id).unwrap_or_default()),
            name: m.name,
            description: m.description,
            operation_type: m.operation_type,
            order: m.sort_order,
            planned_start: m.planned_start,
            planned_end: m.planned_end,
            actual_start: m.actual_start,
            actual_end: m.actual_end,
            planned_cost: m.planned_cost,
            actual_cost: m.actual_cost,
            progress: m.progress,
            status: WorkStatus::from_code(&m.status).unwrap_or_default(),
            responsible_id: m.responsible_id,
            metadata,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(o: &Operation) -> ActiveModel {
    ActiveModel {
        id: Set(o.id.value().to_string()),
        phase_id: Set(o.phase_id.value().to_string()),
        name: Set(o.name.clone()),
        description: Set(o.description.clone()),
        operation_type: Set(o.operation_type.clone()),
        sort_order: Set(o.order),
        planned_start: Set(o.planned_start),
        planned_end: Set(o.planned_end),
        actual_start: Set(o.actual_start),
        actual_end: Set(o.actual_end),
        planned_cost: Set(o.planned_cost),
        actual_cost: Set(o.actual_cost),
        progress: Set(o.progress),
        status: Set(o.status.code().to_string()),
        responsible_id: Set(o.responsible_id.clone()),
        created_at: Set(Some(o.metadata.created_at)),
        updated_at: Set(Some(o.metadata.updated_at)),
        version: Set(o.metadata.version),
    }
}

pub async fn list_by_phase(phase_id: Uuid) -> anyhow::Result<Vec<Operation>> {
    let items = Entity::find()
        .filter(Column::PhaseId.eq(phase_id.to_string()))
        .order_by_asc(Column::SortOrder)
        .order_by_asc(Column::PlannedStart)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn list_by_phases(phase_ids: &[Uuid]) -> anyhow::Result<Vec<Operation>> {
    if phase_ids.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = phase_ids.iter().map(|id| id.to_string()).collect();
    let items = Entity::find()
        .filter(Column::PhaseId.is_in(ids))
        .order_by_asc(Column::SortOrder)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn count_by_phase(phase_id: Uuid) -> anyhow::Result<u64> {
    let count = Entity::find()
        .filter(Column::PhaseId.eq(phase_id.to_string()))
        .count(conn())
        .await?;
    Ok(count)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Operation>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(op: &Operation) -> anyhow::Result<Uuid> {
    to_active(op).insert(conn()).await?;
    Ok(op.id.value())
}

pub async fn update(op: &Operation) -> anyhow::Result<()> {
    let mut active = to_active(op);
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

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
