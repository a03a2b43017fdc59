use chrono::Utc;
use contracts::domain::a003_operation::aggregate::OperationId;
use contracts::domain::a004_threshold::aggregate::{Threshold, ThresholdId};
use contracts::domain::common::EntityMetadata;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_threshold")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub operation_id: String,
    pub green: f64,
    pub yellow: f64,
    pub red: f64,
    pub defined_by: Option<String>,
    pub modified_by: Option<String>,
    pub modified_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Threshold {
    fn from(m: Model) -> Self {
        Threshold {
            id: ThresholdId(Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4())),
            operation_id: OperationId(Uuid::parse_str(&m.operation_id).unwrap_or_default()),
            green: m.green,
            yellow: m.yellow,
            red: m.red,
            defined_by: m.defined_by,
            modified_by: m.modified_by,
            modified_at: m.modified_at,
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

fn to_active(t: &Threshold) -> ActiveModel {
    ActiveModel {
        id: Set(t.id.value().to_string()),
        operation_id: Set(t.operation_id.value().to_string()),
        green: Set(t.green),
        yellow: Set(t.yellow),
        red: Set(t.red),
        defined_by: Set(t.defined_by.clone()),
        modified_by: Set(t.modified_by.clone()),
        modified_at: Set(t.modified_at),
        created_at: Set(Some(t.metadata.created_at)),
        updated_at: Set(Some(t.metadata.updated_at)),
        version: Set(t.metadata.version),
    }
}

pub async fn list_by_operation(operation_id: Uuid) -> anyhow::Result<Vec<Threshold>> {
    let items = Entity::find()
        .filter(Column::OperationId.eq(operation_id.to_string()))
        .order_by_asc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn list_by_operations(operation_ids: &[Uuid]) -> anyhow::Result<Vec<Threshold>> {
    if operation_ids.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = operation_ids.iter().map(|id| id.to_string()).collect();
    let items = Entity::find()
        .filter(Column::OperationId.is_in(ids))
        .order_by_asc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Threshold>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(t: &Threshold) -> anyhow::Result<Uuid> {
    to_active(t).insert(conn()).await?;
    Ok(t.id.value())
}

pub async fn update(t: &Threshold) -> anyhow::Result<()> {
    let mut active = to_active(t);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete_by_operation(operation_id: Uuid) -> anyhow::Result<u64> {
    let result = Entity::delete_many()
        .filter(Column::OperationId.eq(operation_id.to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}
