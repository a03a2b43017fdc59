use anyhow::Result;
use chrono::NaiveDate;
use contracts::dashboards::d401_project::dto::{OperationDetail, PhaseDetail, ProjectDashboard};
use contracts::domain::a002_phase::aggregate::Phase;
use contracts::domain::a003_operation::aggregate::Operation;
use contracts::domain::a004_threshold::aggregate::Threshold;
use contracts::domain::a006_problem::aggregate::ProblemFilter;
use contracts::domain::a009_alert::aggregate::AlertFilter;
use contracts::enums::{AlertLevel, AlertStatus};
use contracts::shared::status_color::{operation_cost_color, StatusMetrics, ThresholdSet};
use uuid::Uuid;

use crate::domain::{
    a001_project, a002_phase, a003_operation, a004_threshold, a006_problem, a009_alert,
};

pub fn operation_detail(
    operation: Operation,
    thresholds: Vec<Threshold>,
    today: NaiveDate,
) -> OperationDetail {
    let metrics = StatusMetrics::compute(
        operation.progress,
        operation.planned_days(),
        operation.elapsed_days(today),
        operation.planned_cost,
        operation.actual_cost,
        ThresholdSet::default(),
    );
    let threshold_color = thresholds
        .first()
        .map(|t| operation_cost_color(operation.actual_cost, t));
    OperationDetail {
        operation,
        metrics,
        thresholds,
        threshold_color,
    }
}

pub fn phase_detail(
    phase: Phase,
    operations: Vec<OperationDetail>,
    today: NaiveDate,
) -> PhaseDetail {
    let planned_cost: f64 = operations.iter().map(|o| o.operation.planned_cost).sum();
    let metrics = StatusMetrics::compute(
        phase.progress,
        phase.planned_days(),
        phase.elapsed_days(today),
        if planned_cost > 0.0 { planned_cost } else { phase.allocated_budget },
        phase.current_cost,
        ThresholdSet::default(),
    );
    PhaseDetail {
        phase,
        metrics,
        operations,
    }
}

/// Операция с порогами и индикаторами
pub async fn get_operation_detail(id: Uuid) -> Result<OperationDetail> {
    let operation = a003_operation::service::get_required(id).await?;
    let thresholds = a004_threshold::repository::list_by_operation(id).await?;
    Ok(operation_detail(operation, thresholds, chrono::Local::now().date_naive()))
}

/// Фаза с операциями и индикаторами
pub async fn get_phase_detail(id: Uuid) -> Result<PhaseDetail> {
    let phase = a002_phase::service::get_required(id).await?;
    let today = chrono::Local::now().date_naive();
    let details = load_operation_details(&[id], today).await?;
    Ok(phase_detail(phase, details, today))
}

async fn load_operation_details(
    phase_ids: &[Uuid],
    today: NaiveDate,
) -> Result<Vec<OperationDetail>> {
    let operations = a003_operation::repository::list_by_phases(phase_ids).await?;
    let op_ids: Vec<Uuid> = operations.iter().map(|o| o.id.value()).collect();
    let thresholds = a004_threshold::repository::list_by_operations(&op_ids).await?;
    Ok(operations
        .into_iter()
        .map(|op| {
            let own: Vec<Threshold> = thresholds
                .iter()
                .filter(|t| t.operation_id == op.id)
                .cloned()
                .collect();
            operation_detail(op, own, today)
        })
        .collect())
}

pub async fn get_project_dashboard(project_id: Uuid) -> Result<ProjectDashboard> {
    let project = a001_project::service::get_required(project_id).await?;
    let today = chrono::Local::now().date_naive();

    let phases = a002_phase::repository::list_by_project(project_id).await?;
    let phase_ids: Vec<Uuid> = phases.iter().map(|p| p.id.value()).collect();
    let mut details = load_operation_details(&phase_ids, today).await?;

    let phases = phases
        .into_iter()
        .map(|phase| {
            let (own, rest): (Vec<_>, Vec<_>) = details
                .drain(..)
                .partition(|d| d.operation.phase_id == phase.id);
            details = rest;
            phase_detail(phase, own, today)
        })
        .collect();

    let open_problems = a006_problem::repository::list_all(&ProblemFilter {
        project_id: Some(project_id.to_string()),
        ..Default::default()
    })
    .await?
    .into_iter()
    .filter(|p| !p.status.is_settled())
    .collect();

    let alerts = a009_alert::repository::list(&AlertFilter {
        project_id: Some(project_id.to_string()),
        ..Default::default()
    })
    .await?;
    let critical_alerts = alerts
        .iter()
        .filter(|a| a.level == AlertLevel::Critical && a.status.is_open())
        .count() as u64;
    let unread_alerts = alerts
        .into_iter()
        .filter(|a| a.status == AlertStatus::Unread)
        .collect();

    let days_late = project.days_late(today);
    let duration = project.planned_duration_days();
    let delay_percent = if duration > 0 {
        days_late as f64 / duration as f64 * 100.0
    } else {
        0.0
    };

    Ok(ProjectDashboard {
        budget_used_percent: project.budget_used_percent(),
        days_late,
        delay_percent,
        project,
        phases,
        open_problems,
        unread_alerts,
        critical_alerts,
    })
}
