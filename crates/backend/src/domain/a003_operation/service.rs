use anyhow::Result;
use contracts::domain::a002_phase::aggregate::PhaseId;
use contracts::domain::a003_operation::aggregate::{Operation, OperationDto};
use uuid::Uuid;

use super::repository;
use crate::domain::{a002_phase, a004_threshold, a010_history};
use crate::shared::error::{not_found, validation};

const TABLE: &str = "a003_operation";

pub async fn create(phase_id: Uuid, dto: OperationDto) -> Result<Uuid> {
    a002_phase::service::get_required(phase_id).await?;

    let order = match dto.order {
        Some(order) => order,
        None => repository::count_by_phase(phase_id).await? as i32 + 1,
    };
    let op = Operation::new_for_insert(PhaseId(phase_id), order, &dto);
    op.validate().map_err(validation)?;

    let id = repository::insert(&op).await?;
    a002_phase::service::recalculate(phase_id).await?;
    tracing::info!("Operation created: {} in phase {}", op.name, phase_id);
    Ok(id)
}

pub async fn update(id: Uuid, dto: OperationDto) -> Result<Operation> {
    let mut op = get_required(id).await?;
    op.update(&dto);
    op.validate().map_err(validation)?;
    op.metadata.touch();
    repository::update(&op).await?;
    a002_phase::service::recalculate(op.phase_id.value()).await?;
    Ok(op)
}

/// Обновить прогресс операции и пересчитать фазу и проект
pub async fn set_progress(id: Uuid, progress: f64, by: &str) -> Result<Operation> {
    let mut op = get_required(id).await?;
    let old = op.progress;
    op.set_progress(progress).map_err(validation)?;
    op.metadata.touch();
    repository::update(&op).await?;

    a010_history::service::record(
        TABLE,
        &id.to_string(),
        "progression",
        Some(old.to_string()),
        Some(progress.to_string()),
        Some(by),
        None,
    )
    .await;

    a002_phase::service::recalculate(op.phase_id.value()).await?;
    Ok(op)
}

pub async fn delete(id: Uuid) -> Result<()> {
    let op = get_required(id).await?;
    delete_cascade(id).await?;
    a002_phase::service::recalculate(op.phase_id.value()).await
}

pub(crate) async fn delete_cascade(id: Uuid) -> Result<()> {
    a004_threshold::repository::delete_by_operation(id).await?;
    repository::delete(id).await?;
    Ok(())
}

pub async fn get_required(id: Uuid) -> Result<Operation> {
    repository::get_by_id(id)
        .await?
        .ok_or_else(|| not_found(format!("Opération {}", id)))
}

pub async fn list_by_phase(phase_id: Uuid) -> Result<Vec<Operation>> {
    repository::list_by_phase(phase_id).await
}

pub async fn reorder(phase_id: Uuid, ids: &[String]) -> Result<Vec<Operation>> {
    let ops = repository::list_by_phase(phase_id).await?;
    let current: Vec<Uuid> = ops.iter().map(|o| o.id.value()).collect();
    let order = a002_phase::service::check_permutation(&current, ids)?;
    for (index, id) in order.iter().enumerate() {
        repository::set_order(*id, index as i32 + 1).await?;
    }
    repository::list_by_phase(phase_id).await
}
