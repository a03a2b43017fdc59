use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::a001_project::aggregate::Project;
use crate::enums::WorkStatus;

/// Общая сводка по портфелю проектов
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralDashboard {
    pub total_projects: u64,
    pub planned: u64,
    pub in_progress: u64,
    pub finished: u64,
    pub suspended: u64,
    pub initial_budget_total: f64,
    pub current_cost_total: f64,
    /// Затраты минус бюджет (положительное значение = перерасход)
    pub budget_gap: f64,
    /// В работе, плановая дата прошла, фактической нет
    pub late_projects: u64,
    /// Средняя просрочка завершённых с опозданием проектов, дней
    pub average_delay_days: i64,
    /// Средний прогресс проектов, у которых есть фазы
    pub average_progress: f64,
    /// Завершённые в срок и в бюджете / все завершённые, %
    pub success_rate: f64,
}

impl GeneralDashboard {
    /// `has_phases` сообщает, есть ли у проекта хотя бы одна фаза
    pub fn compute(
        projects: &[Project],
        today: NaiveDate,
        has_phases: impl Fn(&Project) -> bool,
    ) -> Self {
        let mut d = GeneralDashboard {
            total_projects: projects.len() as u64,
            ..Default::default()
        };

        let mut late_finished_days = Vec::new();
        let mut finished_ok = 0u64;
        let mut progress_sum = 0.0;
        let mut progress_count = 0u64;

        for p in projects {
            match p.status {
                WorkStatus::Planned => d.planned += 1,
                WorkStatus::InProgress => d.in_progress += 1,
                WorkStatus::Finished => d.finished += 1,
                WorkStatus::Suspended => d.suspended += 1,
            }
            d.initial_budget_total += p.initial_budget;
            d.current_cost_total += p.current_cost;

            if p.is_late(today) {
                d.late_projects += 1;
            }

            if p.status == WorkStatus::Finished {
                if let Some(actual) = p.actual_end_date {
                    if actual > p.planned_end_date {
                        late_finished_days.push((actual - p.planned_end_date).num_days());
                    } else if p.current_cost <= p.initial_budget {
                        finished_ok += 1;
                    }
                }
            }

            if has_phases(p) {
                progress_sum += p.progress;
                progress_count += 1;
            }
        }

        d.budget_gap = d.current_cost_total - d.initial_budget_total;
        if !late_finished_days.is_empty() {
            d.average_delay_days =
                late_finished_days.iter().sum::<i64>() / late_finished_days.len() as i64;
        }
        if progress_count > 0 {
            d.average_progress = progress_sum / progress_count as f64;
        }
        if d.finished > 0 {
            d.success_rate = finished_ok as f64 / d.finished as f64 * 100.0;
        }
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_project::aggregate::ProjectDto;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(
        status: WorkStatus,
        budget: f64,
        cost: f64,
        end: NaiveDate,
        actual: Option<NaiveDate>,
    ) -> Project {
        let mut p = Project::new_for_insert(&ProjectDto {
            id: None,
            name: "P".into(),
            description: None,
            location: None,
            initial_budget: budget,
            start_date: date(2024, 1, 1),
            planned_end_date: end,
            actual_end_date: actual,
            status: Some(status),
            responsible_id: None,
            cost_alert_threshold: None,
            delay_alert_threshold: None,
        });
        p.current_cost = cost;
        p
    }

    #[test]
    fn test_general_dashboard() {
        let today = date(2024, 7, 1);
        let mut with_progress = project(WorkStatus::InProgress, 100.0, 50.0, date(2024, 6, 1), None);
        with_progress.progress = 40.0;
        let projects = vec![
            with_progress,
            project(WorkStatus::Planned, 200.0, 0.0, date(2024, 12, 1), None),
            project(WorkStatus::Finished, 100.0, 90.0, date(2024, 5, 1), Some(date(2024, 4, 20))),
            project(WorkStatus::Finished, 100.0, 80.0, date(2024, 5, 1), Some(date(2024, 5, 11))),
        ];
        let d = GeneralDashboard::compute(&projects, today, |p| p.progress > 0.0);
        assert_eq!(d.total_projects, 4);
        assert_eq!(d.in_progress, 1);
        assert_eq!(d.finished, 2);
        assert_eq!(d.late_projects, 1);
        assert_eq!(d.average_delay_days, 10);
        assert_eq!(d.initial_budget_total, 500.0);
        assert_eq!(d.budget_gap, 220.0 - 500.0);
        assert_eq!(d.average_progress, 40.0);
        assert_eq!(d.success_rate, 50.0);
    }

    #[test]
    fn test_empty_portfolio() {
        let d = GeneralDashboard::compute(&[], date(2024, 1, 1), |_| true);
        assert_eq!(d, GeneralDashboard::default());
    }
}
