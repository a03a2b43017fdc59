//! Правила обнаружения тревог. Чистые функции: на вход агрегаты и дата,
//! на выход кандидаты в тревоги (без учёта уже открытых).

use chrono::NaiveDate;
use contracts::domain::a001_project::aggregate::Project;
use contracts::domain::a002_phase::aggregate::Phase;
use contracts::domain::a003_operation::aggregate::Operation;
use contracts::domain::a004_threshold::aggregate::Threshold;
use contracts::domain::a009_alert::aggregate::Alert;
use contracts::enums::{AlertKind, AlertLevel, WorkStatus};

/// За сколько дней до плановой даты предупреждать
pub const DEADLINE_WARNING_DAYS: i64 = 7;

/// Допустимое отставание фактического прогресса от ожидаемого, п.п.
pub const PROGRESS_TOLERANCE: f64 = 20.0;

fn project_alert(project: &Project, kind: AlertKind, level: AlertLevel, message: String) -> Alert {
    Alert::new(kind, level, message, Some(project.id), None, None)
}

/// Перерасход бюджета проекта относительно его порога
pub fn check_project_budget(project: &Project) -> Option<Alert> {
    if project.initial_budget <= 0.0 {
        return None;
    }
    let used = project.budget_used_percent();
    if used < project.cost_alert_threshold {
        return None;
    }
    let level = if used >= 100.0 {
        AlertLevel::Critical
    } else {
        AlertLevel::Warning
    };
    Some(project_alert(
        project,
        AlertKind::BudgetOverrun,
        level,
        format!(
            "Budget utilisé à {:.1}% ({:.2} / {:.2})",
            used, project.current_cost, project.initial_budget
        ),
    ))
}

/// Просрочка или приближение плановой даты окончания проекта
pub fn check_project_deadline(project: &Project, today: NaiveDate) -> Option<Alert> {
    if !matches!(project.status, WorkStatus::Planned | WorkStatus::InProgress) {
        return None;
    }
    let days_left = (project.planned_end_date - today).num_days();
    if days_left <= 0 {
        Some(project_alert(
            project,
            AlertKind::DeadlineOverrun,
            AlertLevel::Critical,
            format!("Projet en retard de {} jour(s)", days_left.abs()),
        ))
    } else if days_left <= DEADLINE_WARNING_DAYS {
        Some(project_alert(
            project,
            AlertKind::DeadlineApproaching,
            AlertLevel::Warning,
            format!("Échéance dans {} jour(s)", days_left),
        ))
    } else {
        None
    }
}

/// Фактический прогресс (среднее по фазам) сильно отстаёт от прошедшего времени
pub fn check_project_progress(
    project: &Project,
    phases: &[Phase],
    today: NaiveDate,
) -> Option<Alert> {
    let total = project.planned_duration_days();
    if total <= 0 || phases.is_empty() {
        return None;
    }
    let elapsed = (today - project.start_date).num_days();
    let expected = elapsed as f64 / total as f64 * 100.0;
    let actual = phases.iter().map(|p| p.progress).sum::<f64>() / phases.len() as f64;

    if actual < expected - PROGRESS_TOLERANCE {
        Some(project_alert(
            project,
            AlertKind::SlowProgress,
            AlertLevel::Warning,
            format!(
                "Progression faible: {:.1}% (attendu: {:.1}%)",
                actual, expected
            ),
        ))
    } else {
        None
    }
}

/// Фактическая стоимость операции относительно её порогов
pub fn check_operation_cost(
    project: &Project,
    op: &Operation,
    threshold: Option<&Threshold>,
) -> Option<Alert> {
    let threshold = threshold?;
    if op.actual_cost <= 0.0 {
        return None;
    }
    let (level, colour, limit) = if op.actual_cost >= threshold.red {
        (AlertLevel::Critical, "ROUGE", threshold.red)
    } else if op.actual_cost >= threshold.yellow {
        (AlertLevel::Warning, "JAUNE", threshold.yellow)
    } else {
        return None;
    };
    Some(Alert::new(
        AlertKind::ThresholdExceeded,
        level,
        format!(
            "Seuil {} dépassé: {:.2} (Seuil: {:.2})",
            colour, op.actual_cost, limit
        ),
        Some(project.id),
        Some(op.phase_id),
        Some(op.id),
    ))
}

/// Незавершённая операция, плановая дата которой прошла
pub fn check_operation_deadline(
    project: &Project,
    op: &Operation,
    today: NaiveDate,
) -> Option<Alert> {
    if !op.status.is_active() {
        return None;
    }
    let days_left = op.days_left(today);
    if days_left > 0 {
        return None;
    }
    Some(Alert::new(
        AlertKind::OperationLate,
        AlertLevel::Critical,
        format!("Opération en retard de {} jour(s)", days_left.abs()),
        Some(project.id),
        Some(op.phase_id),
        Some(op.id),
    ))
}

/// Все правила для одного проекта
pub fn evaluate_project(
    project: &Project,
    phases: &[Phase],
    operations: &[(Operation, Option<Threshold>)],
    today: NaiveDate,
) -> Vec<Alert> {
    let mut alerts = Vec::new();
    alerts.extend(check_project_budget(project));
    alerts.extend(check_project_deadline(project, today));
    alerts.extend(check_project_progress(project, phases, today));
    for (op, threshold) in operations {
        alerts.extend(check_operation_cost(project, op, threshold.as_ref()));
        alerts.extend(check_operation_deadline(project, op, today));
    }
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_project::aggregate::ProjectDto;
    use contracts::domain::a002_phase::aggregate::PhaseDto;
    use contracts::domain::a003_operation::aggregate::OperationDto;
    use contracts::domain::a004_threshold::aggregate::ThresholdDto;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn project(budget: f64, cost: f64, start: NaiveDate, end: NaiveDate) -> Project {
        let mut p = Project::new_for_insert(&ProjectDto {
            id: None,
            name: "Forage Hassi".into(),
            description: None,
            location: None,
            initial_budget: budget,
            start_date: start,
            planned_end_date: end,
            actual_end_date: None,
            status: Some(WorkStatus::InProgress),
            responsible_id: None,
            cost_alert_threshold: None,
            delay_alert_threshold: None,
        });
        p.current_cost = cost;
        p
    }

    fn phase(p: &Project, progress: f64) -> Phase {
        let mut ph = Phase::new_for_insert(
            p.id,
            1,
            &PhaseDto {
                id: None,
                project_id: p.id.to_string(),
                name: "Forage".into(),
                description: None,
                order: None,
                planned_start: p.start_date,
                planned_end: p.planned_end_date,
                actual_start: None,
                actual_end: None,
                allocated_budget: 0.0,
                status: None,
            },
        );
        ph.progress = progress;
        ph
    }

    fn operation(ph: &Phase, cost: f64, end: NaiveDate, status: WorkStatus) -> Operation {
        Operation::new_for_insert(
            ph.id,
            1,
            &OperationDto {
                id: None,
                phase_id: ph.id.to_string(),
                name: "Cimentation".into(),
                description: None,
                operation_type: "CIMENTATION".into(),
                order: None,
                planned_start: ph.planned_start,
                planned_end: end,
                actual_start: None,
                actual_end: None,
                planned_cost: 1000.0,
                actual_cost: cost,
                progress: 0.0,
                status: Some(status),
                responsible_id: None,
            },
        )
    }

    #[test]
    fn test_budget_levels() {
        let start = d(2026, 1, 1);
        let end = d(2026, 12, 31);
        assert!(check_project_budget(&project(1000.0, 500.0, start, end)).is_none());

        let warn = check_project_budget(&project(1000.0, 850.0, start, end)).unwrap();
        assert_eq!(warn.kind, AlertKind::BudgetOverrun);
        assert_eq!(warn.level, AlertLevel::Warning);

        let crit = check_project_budget(&project(1000.0, 1000.0, start, end)).unwrap();
        assert_eq!(crit.level, AlertLevel::Critical);

        assert!(check_project_budget(&project(0.0, 10.0, start, end)).is_none());
    }

    #[test]
    fn test_deadline_rules() {
        let p = project(1000.0, 0.0, d(2026, 1, 1), d(2026, 3, 10));

        let late = check_project_deadline(&p, d(2026, 3, 12)).unwrap();
        assert_eq!(late.kind, AlertKind::DeadlineOverrun);
        assert_eq!(late.level, AlertLevel::Critical);
        assert_eq!(late.message, "Projet en retard de 2 jour(s)");

        let due_today = check_project_deadline(&p, d(2026, 3, 10)).unwrap();
        assert_eq!(due_today.kind, AlertKind::DeadlineOverrun);

        let soon = check_project_deadline(&p, d(2026, 3, 5)).unwrap();
        assert_eq!(soon.kind, AlertKind::DeadlineApproaching);
        assert_eq!(soon.message, "Échéance dans 5 jour(s)");

        assert!(check_project_deadline(&p, d(2026, 2, 1)).is_none());

        let mut finished = p.clone();
        finished.status = WorkStatus::Finished;
        assert!(check_project_deadline(&finished, d(2026, 4, 1)).is_none());
    }

    #[test]
    fn test_slow_progress() {
        // 100 дней, прошло 50: ожидается 50%
        let p = project(1000.0, 0.0, d(2026, 1, 1), d(2026, 4, 11));
        let today = d(2026, 2, 20);

        let slow = check_project_progress(&p, &[phase(&p, 20.0), phase(&p, 30.0)], today).unwrap();
        assert_eq!(slow.kind, AlertKind::SlowProgress);
        assert_eq!(slow.message, "Progression faible: 25.0% (attendu: 50.0%)");

        assert!(check_project_progress(&p, &[phase(&p, 35.0)], today).is_none());
        assert!(check_project_progress(&p, &[], today).is_none());
    }

    #[test]
    fn test_operation_cost_against_threshold() {
        let p = project(10_000.0, 0.0, d(2026, 1, 1), d(2026, 12, 31));
        let ph = phase(&p, 0.0);
        let dto = ThresholdDto { green: 100.0, yellow: 200.0, red: 300.0 };
        let op = operation(&ph, 0.0, d(2026, 6, 1), WorkStatus::InProgress);
        let th = Threshold::new_for_insert(op.id, &dto, "u1");

        let at = |cost: f64| {
            let mut o = op.clone();
            o.actual_cost = cost;
            check_operation_cost(&p, &o, Some(&th)).map(|a| a.level)
        };
        assert_eq!(at(150.0), None);
        assert_eq!(at(200.0), Some(AlertLevel::Warning));
        assert_eq!(at(300.0), Some(AlertLevel::Critical));
        assert!(check_operation_cost(&p, &op, None).is_none());
    }

    #[test]
    fn test_operation_deadline_only_for_active() {
        let p = project(10_000.0, 0.0, d(2026, 1, 1), d(2026, 12, 31));
        let ph = phase(&p, 0.0);
        let today = d(2026, 6, 5);

        let late = operation(&ph, 0.0, d(2026, 6, 1), WorkStatus::InProgress);
        let alert = check_operation_deadline(&p, &late, today).unwrap();
        assert_eq!(alert.kind, AlertKind::OperationLate);
        assert_eq!(alert.operation_id, Some(late.id));
        assert_eq!(alert.message, "Opération en retard de 4 jour(s)");

        let done = operation(&ph, 0.0, d(2026, 6, 1), WorkStatus::Finished);
        assert!(check_operation_deadline(&p, &done, today).is_none());

        let ahead = operation(&ph, 0.0, d(2026, 7, 1), WorkStatus::InProgress);
        assert!(check_operation_deadline(&p, &ahead, today).is_none());
    }
}
