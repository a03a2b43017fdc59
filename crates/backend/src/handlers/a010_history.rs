use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a010_history::aggregate::ModificationRecord;

use crate::domain::a010_history;
use crate::shared::error::to_status;

/// GET /api/history/:table/:id
pub async fn list_for_record(
    Path((table, id)): Path<(String, String)>,
) -> Result<Json<Vec<ModificationRecord>>, StatusCode> {
    let items = a010_history::service::list_for_record(&table, &id)
        .await
        .map_err(to_status)?;
    Ok(Json(items))
}
