use anyhow::Result;
use sea_orm::{ConnectionTrait, FromQueryResult, Statement};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::shared::data::db::get_connection;

#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult)]
struct ProjectWithPhases {
    project_id: String,
}

/// Идентификаторы проектов, у которых есть хотя бы одна фаза
pub async fn project_ids_with_phases() -> Result<HashSet<String>> {
    let db = get_connection();
    let rows = ProjectWithPhases::find_by_statement(Statement::from_string(
        db.get_database_backend(),
        "SELECT DISTINCT project_id FROM a002_phase".to_string(),
    ))
    .all(db)
    .await?;
    Ok(rows.into_iter().map(|r| r.project_id).collect())
}
