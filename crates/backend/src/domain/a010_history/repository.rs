use contracts::domain::a010_history::aggregate::ModificationRecord;
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a010_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub table_name: String,
    pub record_id: String,
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub modified_by: Option<String>,
    pub comment: Option<String>,
    pub modified_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ModificationRecord {
    fn from(m: Model) -> Self {
        ModificationRecord {
            id: m.id,
            table_name: m.table_name,
            record_id: m.record_id,
            field: m.field,
            old_value: m.old_value,
            new_value: m.new_value,
            modified_by: m.modified_by,
            comment: m.comment,
            modified_at: m.modified_at,
        }
    }
}

pub async fn insert(record: &ModificationRecord) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(record.id.clone()),
        table_name: Set(record.table_name.clone()),
        record_id: Set(record.record_id.clone()),
        field: Set(record.field.clone()),
        old_value: Set(record.old_value.clone()),
        new_value: Set(record.new_value.clone()),
        modified_by: Set(record.modified_by.clone()),
        comment: Set(record.comment.clone()),
        modified_at: Set(record.modified_at),
    };
    active.insert(get_connection()).await?;
    Ok(())
}

/// История изменений записи, новые сверху
pub async fn list_for_record(
    table_name: &str,
    record_id: &str,
) -> anyhow::Result<Vec<ModificationRecord>> {
    let items = Entity::find()
        .filter(Column::TableName.eq(table_name))
        .filter(Column::RecordId.eq(record_id))
        .order_by_desc(Column::ModifiedAt)
        .all(get_connection())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}
