use anyhow::Result;
use contracts::domain::a004_threshold::aggregate::{Threshold, ThresholdDto};
use contracts::domain::a003_operation::aggregate::OperationId;
use uuid::Uuid;

use super::repository;
use crate::domain::{a003_operation, a010_history};
use crate::shared::error::{not_found, validation};

const TABLE: &str = "a004_threshold";

pub async fn list_by_operation(operation_id: Uuid) -> Result<Vec<Threshold>> {
    repository::list_by_operation(operation_id).await
}

pub async fn create(operation_id: Uuid, dto: ThresholdDto, by: &str) -> Result<Threshold> {
    a003_operation::service::get_required(operation_id).await?;
    let threshold = Threshold::new_for_insert(OperationId(operation_id), &dto, by);
    threshold.validate().map_err(validation)?;
    repository::insert(&threshold).await?;
    Ok(threshold)
}

/// Обновить пороги; каждое изменённое значение попадает в журнал
pub async fn update(id: Uuid, dto: ThresholdDto, by: &str) -> Result<Threshold> {
    let mut threshold = repository::get_by_id(id)
        .await?
        .ok_or_else(|| not_found(format!("Seuil {}", id)))?;

    contracts::domain::a004_threshold::aggregate::validate_ordering(dto.green, dto.yellow, dto.red)
        .map_err(validation)?;

    let changes = threshold.apply(&dto, by);
    if changes.is_empty() {
        return Ok(threshold);
    }
    repository::update(&threshold).await?;

    for (field, old, new) in changes {
        a010_history::service::record(
            TABLE,
            &id.to_string(),
            field,
            Some(old.to_string()),
            Some(new.to_string()),
            Some(by),
            None,
        )
        .await;
    }
    Ok(threshold)
}

pub async fn delete(id: Uuid) -> Result<()> {
    if !repository::delete(id).await? {
        return Err(not_found(format!("Seuil {}", id)));
    }
    Ok(())
}
