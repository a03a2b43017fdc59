use anyhow::Result;
use contracts::domain::a002_phase::aggregate::{Phase, PhaseDto};
use contracts::domain::a001_project::aggregate::ProjectId;
use uuid::Uuid;

use super::repository;
use crate::domain::{a001_project, a003_operation};
use crate::shared::error::{not_found, validation};

pub async fn create(project_id: Uuid, dto: PhaseDto) -> Result<Uuid> {
    a001_project::service::get_required(project_id).await?;

    // Новая фаза встаёт в конец, если порядок не задан
    let order = match dto.order {
        Some(order) => order,
        None => repository::count_by_project(project_id).await? as i32 + 1,
    };
    let phase = Phase::new_for_insert(ProjectId(project_id), order, &dto);
    phase.validate().map_err(validation)?;

    let id = repository::insert(&phase).await?;
    tracing::info!("Phase created: {} in project {}", phase.name, project_id);
    Ok(id)
}

pub async fn update(id: Uuid, dto: PhaseDto) -> Result<Phase> {
    let mut phase = get_required(id).await?;
    phase.update(&dto);
    phase.validate().map_err(validation)?;
    phase.metadata.touch();
    repository::update(&phase).await?;
    Ok(phase)
}

pub async fn delete(id: Uuid) -> Result<()> {
    let phase = get_required(id).await?;
    delete_cascade(id).await?;
    a001_project::service::recalculate(phase.project_id.value()).await
}

/// Удалить фазу с операциями и их порогами (без пересчёта проекта)
pub(crate) async fn delete_cascade(id: Uuid) -> Result<()> {
    for op in a003_operation::repository::list_by_phase(id).await? {
        a003_operation::service::delete_cascade(op.id.value()).await?;
    }
    repository::delete(id).await?;
    Ok(())
}

pub async fn get_required(id: Uuid) -> Result<Phase> {
    repository::get_by_id(id)
        .await?
        .ok_or_else(|| not_found(format!("Phase {}", id)))
}

pub async fn list_by_project(project_id: Uuid) -> Result<Vec<Phase>> {
    repository::list_by_project(project_id).await
}

/// Переупорядочить фазы проекта: `ids` должен быть перестановкой его фаз
pub async fn reorder(project_id: Uuid, ids: &[String]) -> Result<Vec<Phase>> {
    let phases = repository::list_by_project(project_id).await?;
    let current: Vec<Uuid> = phases.iter().map(|p| p.id.value()).collect();
    let order = check_permutation(&current, ids)?;
    for (index, id) in order.iter().enumerate() {
        repository::set_order(*id, index as i32 + 1).await?;
    }
    repository::list_by_project(project_id).await
}

/// Проверить, что `ids` ровно перестановка `current`
pub(crate) fn check_permutation(current: &[Uuid], ids: &[String]) -> Result<Vec<Uuid>> {
    let parsed = ids
        .iter()
        .map(|s| Uuid::parse_str(s).map_err(|_| validation(format!("Identifiant invalide: {}", s))))
        .collect::<Result<Vec<_>>>()?;

    let mut expected = current.to_vec();
    let mut given = parsed.clone();
    expected.sort();
    given.sort();
    if expected != given {
        return Err(validation(
            "La liste doit contenir exactement les éléments existants",
        ));
    }
    Ok(parsed)
}

/// Пересчитать фазу по операциям, затем проект
pub async fn recalculate(id: Uuid) -> Result<()> {
    let phase = get_required(id).await?;
    let ops = a003_operation::repository::list_by_phase(id).await?;
    let cost: f64 = ops.iter().map(|o| o.actual_cost).sum();
    let progress = a001_project::service::mean(ops.iter().map(|o| o.progress));
    repository::update_rollup(id, cost, progress).await?;
    a001_project::service::recalculate(phase.project_id.value()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_permutation() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let current = vec![a, b];

        let order = check_permutation(&current, &[b.to_string(), a.to_string()]).unwrap();
        assert_eq!(order, vec![b, a]);

        assert!(check_permutation(&current, &[a.to_string()]).is_err());
        assert!(check_permutation(&current, &[a.to_string(), a.to_string()]).is_err());
        assert!(check_permutation(&current, &["x".into(), a.to_string()]).is_err());
    }
}
