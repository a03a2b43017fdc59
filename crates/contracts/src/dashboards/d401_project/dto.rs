use serde::{Deserialize, Serialize};

use crate::domain::a001_project::aggregate::Project;
use crate::domain::a002_phase::aggregate::Phase;
use crate::domain::a003_operation::aggregate::Operation;
use crate::domain::a004_threshold::aggregate::Threshold;
use crate::domain::a006_problem::aggregate::Problem;
use crate::domain::a009_alert::aggregate::Alert;
use crate::shared::status_color::{StatusColor, StatusMetrics};

/// Операция с индикаторами
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDetail {
    pub operation: Operation,
    pub metrics: StatusMetrics,
    pub thresholds: Vec<Threshold>,
    /// Цвет фактической стоимости относительно первого набора порогов
    pub threshold_color: Option<StatusColor>,
}

/// Фаза с индикаторами и операциями
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseDetail {
    pub phase: Phase,
    pub metrics: StatusMetrics,
    pub operations: Vec<OperationDetail>,
}

/// Дашборд одного проекта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDashboard {
    pub project: Project,
    pub budget_used_percent: f64,
    pub days_late: i64,
    /// Просрочка относительно плановой длительности, %
    pub delay_percent: f64,
    pub phases: Vec<PhaseDetail>,
    pub open_problems: Vec<Problem>,
    pub unread_alerts: Vec<Alert>,
    pub critical_alerts: u64,
}
