use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Запись журнала изменений (кто, что и когда поменял)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModificationRecord {
    pub id: String,
    pub table_name: String,
    pub record_id: String,
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub modified_by: Option<String>,
    pub comment: Option<String>,
    pub modified_at: DateTime<Utc>,
}

impl ModificationRecord {
    pub fn new(
        table_name: &str,
        record_id: &str,
        field: &str,
        old_value: Option<String>,
        new_value: Option<String>,
        modified_by: Option<&str>,
        comment: Option<&str>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            table_name: table_name.to_string(),
            record_id: record_id.to_string(),
            field: field.to_string(),
            old_value,
            new_value,
            modified_by: modified_by.map(str::to_string),
            comment: comment.map(str::to_string),
            modified_at: Utc::now(),
        }
    }
}
