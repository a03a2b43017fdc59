use contracts::domain::a010_history::aggregate::ModificationRecord;

use super::repository;

/// Записать изменение поля. Ошибка журнала не должна ломать основную операцию.
pub async fn record(
    table_name: &str,
    record_id: &str,
    field: &str,
    old_value: Option<String>,
    new_value: Option<String>,
    modified_by: Option<&str>,
    comment: Option<&str>,
) {
    let entry = ModificationRecord::new(
        table_name,
        record_id,
        field,
        old_value,
        new_value,
        modified_by,
        comment,
    );
    if let Err(e) = repository::insert(&entry).await {
        tracing::warn!(
            "Failed to write history for {}.{} ({}): {}",
            table_name,
            field,
            record_id,
            e
        );
    }
}

pub async fn list_for_record(
    table_name: &str,
    record_id: &str,
) -> anyhow::Result<Vec<ModificationRecord>> {
    repository::list_for_record(table_name, record_id).await
}
