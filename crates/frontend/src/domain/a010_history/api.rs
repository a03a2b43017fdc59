use contracts::domain::a010_history::aggregate::ModificationRecord;

use crate::shared::api_utils::get_json;

/// `table`: имя таблицы сущности, например `a001_project`
pub async fn fetch_history(table: &str, record_id: &str) -> Result<Vec<ModificationRecord>, String> {
    get_json(&format!("/api/history/{}/{}", table, record_id)).await
}
