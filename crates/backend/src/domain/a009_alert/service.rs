use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use contracts::domain::a001_project::aggregate::Project;
use contracts::domain::a009_alert::aggregate::{Alert, AlertFilter, AlertStats};
use contracts::enums::WorkStatus;
use std::future::Future;
use uuid::Uuid;

use super::notifier::AlertNotifier;
use super::{repository, rules};
use crate::domain::{a001_project, a002_phase, a003_operation, a004_threshold};
use crate::shared::error::not_found;

pub async fn list(filter: &AlertFilter) -> Result<Vec<Alert>> {
    repository::list(filter).await
}

pub async fn get_required(id: Uuid) -> Result<Alert> {
    repository::get_by_id(id)
        .await?
        .ok_or_else(|| not_found(format!("Alerte {}", id)))
}

pub async fn mark_read(id: Uuid, by: &str) -> Result<Alert> {
    let mut alert = get_required(id).await?;
    alert.mark_read(by);
    repository::update(&alert).await?;
    Ok(alert)
}

pub async fn mark_treated(id: Uuid, by: &str) -> Result<Alert> {
    let mut alert = get_required(id).await?;
    alert.mark_treated(by);
    repository::update(&alert).await?;
    Ok(alert)
}

pub async fn mark_all_read(project_id: Option<Uuid>, by: &str) -> Result<u64> {
    repository::mark_all_read(project_id, by).await
}

pub async fn statistics(filter: &AlertFilter) -> Result<AlertStats> {
    let alerts = repository::list(filter).await?;
    Ok(AlertStats::compute(&alerts))
}

/// Прогнать правила по активным проектам и сохранить новые тревоги.
/// Тревога не создаётся, если такая же по той же цели ещё открыта.
/// Ошибка по одному проекту не прерывает проверку остальных.
pub async fn detect(notifier: &dyn AlertNotifier, today: NaiveDate) -> Result<Vec<Alert>> {
    let projects = a001_project::repository::list_by_statuses(&[
        WorkStatus::InProgress,
        WorkStatus::Planned,
    ])
    .await?;

    let created = collect_per_project(
        projects,
        |project| project.name.clone(),
        |project| detect_for_project(project, notifier, today),
    )
    .await;

    tracing::info!("Alert detection finished: {} alert(s) created", created.len());
    Ok(created)
}

async fn collect_per_project<P, F, Fut>(
    projects: Vec<P>,
    name: impl Fn(&P) -> String,
    mut run: F,
) -> Vec<Alert>
where
    F: FnMut(P) -> Fut,
    Fut: Future<Output = Result<Vec<Alert>>>,
{
    let mut created = Vec::new();
    for project in projects {
        let label = name(&project);
        match run(project).await {
            Ok(mut alerts) => created.append(&mut alerts),
            Err(e) => tracing::error!("Alert detection failed for project {}: {}", label, e),
        }
    }
    created
}

async fn detect_for_project(
    project: Project,
    notifier: &dyn AlertNotifier,
    today: NaiveDate,
) -> Result<Vec<Alert>> {
    let project_id = project.id.value();
    let phases = a002_phase::repository::list_by_project(project_id).await?;
    let phase_ids: Vec<Uuid> = phases.iter().map(|p| p.id.value()).collect();
    let operations = a003_operation::repository::list_by_phases(&phase_ids).await?;
    let op_ids: Vec<Uuid> = operations.iter().map(|o| o.id.value()).collect();
    let thresholds = a004_threshold::repository::list_by_operations(&op_ids).await?;

    // Для стоимости берётся первый набор порогов операции
    let with_thresholds: Vec<_> = operations
        .into_iter()
        .map(|op| {
            let threshold = thresholds
                .iter()
                .find(|t| t.operation_id == op.id)
                .cloned();
            (op, threshold)
        })
        .collect();

    let mut created = Vec::new();
    for alert in rules::evaluate_project(&project, &phases, &with_thresholds, today) {
        let exists = repository::exists_open(
            alert.kind,
            alert.project_id.map(|id| id.value()),
            alert.phase_id.map(|id| id.value()),
            alert.operation_id.map(|id| id.value()),
        )
        .await?;
        if exists {
            continue;
        }
        repository::insert(&alert).await?;
        if let Err(e) = notifier.notify(&alert).await {
            tracing::warn!("Alert notification failed for {}: {}", alert.id, e);
        }
        created.push(alert);
    }
    Ok(created)
}

/// Удалить обработанные тревоги старше `retention_days`
pub async fn purge_treated(retention_days: i64) -> Result<u64> {
    let before = Utc::now() - Duration::days(retention_days);
    let count = repository::purge_treated_before(before).await?;
    if count > 0 {
        tracing::info!("Purged {} treated alert(s) older than {} days", count, retention_days);
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::{AlertKind, AlertLevel};

    fn alert(message: &str) -> Alert {
        Alert::new(
            AlertKind::BudgetOverrun,
            AlertLevel::Warning,
            message.to_string(),
            None,
            None,
            None,
        )
    }

    #[tokio::test]
    async fn test_failing_project_does_not_stop_the_others() {
        let created = collect_per_project(
            vec!["Forage Nord", "Pipeline Sud", "Raffinerie"],
            |name| name.to_string(),
            |name| async move {
                if name == "Pipeline Sud" {
                    anyhow::bail!("database is locked");
                }
                Ok(vec![alert(name)])
            },
        )
        .await;

        let messages: Vec<_> = created.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, vec!["Forage Nord", "Raffinerie"]);
    }
}
