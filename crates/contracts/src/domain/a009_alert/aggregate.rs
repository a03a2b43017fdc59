use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::a001_project::aggregate::ProjectId;
use crate::domain::a002_phase::aggregate::PhaseId;
use crate::domain::a003_operation::aggregate::OperationId;
use crate::domain::common::{uuid_id, EntityMetadata};
use crate::enums::{AlertKind, AlertLevel, AlertStatus};

uuid_id!(AlertId);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub project_id: Option<ProjectId>,
    pub phase_id: Option<PhaseId>,
    pub operation_id: Option<OperationId>,
    pub kind: AlertKind,
    pub level: AlertLevel,
    pub message: String,
    pub status: AlertStatus,
    pub read_by: Option<String>,
    pub read_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertFilter {
    pub project_id: Option<String>,
    pub level: Option<AlertLevel>,
    pub status: Option<AlertStatus>,
    pub kind: Option<AlertKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertStats {
    pub total: u64,
    pub unread: u64,
    pub critical_open: u64,
    pub by_level: BTreeMap<String, u64>,
    pub by_kind: BTreeMap<String, u64>,
}

impl AlertStats {
    pub fn compute(alerts: &[Alert]) -> Self {
        let mut stats = AlertStats {
            total: alerts.len() as u64,
            ..Default::default()
        };
        for a in alerts {
            if a.status == AlertStatus::Unread {
                stats.unread += 1;
            }
            if a.level == AlertLevel::Critical && a.status.is_open() {
                stats.critical_open += 1;
            }
            *stats.by_level.entry(a.level.code().to_string()).or_default() += 1;
            *stats.by_kind.entry(a.kind.code().to_string()).or_default() += 1;
        }
        stats
    }
}

impl Alert {
    pub fn new(
        kind: AlertKind,
        level: AlertLevel,
        message: String,
        project_id: Option<ProjectId>,
        phase_id: Option<PhaseId>,
        operation_id: Option<OperationId>,
    ) -> Self {
        Self {
            id: AlertId::new_v4(),
            project_id,
            phase_id,
            operation_id,
            kind,
            level,
            message,
            status: AlertStatus::Unread,
            read_by: None,
            read_at: None,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn mark_read(&mut self, by: &str) {
        if self.status == AlertStatus::Unread {
            self.status = AlertStatus::Read;
            self.read_by = Some(by.to_string());
            self.read_at = Some(Utc::now());
            self.metadata.touch();
        }
    }

    pub fn mark_treated(&mut self, by: &str) {
        if self.read_by.is_none() {
            self.read_by = Some(by.to_string());
            self.read_at = Some(Utc::now());
        }
        self.status = AlertStatus::Treated;
        self.metadata.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_then_treat() {
        let mut a = Alert::new(
            AlertKind::BudgetOverrun,
            AlertLevel::Warning,
            "Budget".into(),
            Some(ProjectId::new_v4()),
            None,
            None,
        );
        a.mark_read("u1");
        assert_eq!(a.status, AlertStatus::Read);
        a.mark_read("u2");
        assert_eq!(a.read_by.as_deref(), Some("u1"));
        a.mark_treated("u2");
        assert_eq!(a.status, AlertStatus::Treated);
        assert_eq!(a.read_by.as_deref(), Some("u1"));
    }

    #[test]
    fn test_stats() {
        let mut treated = Alert::new(AlertKind::OperationLate, AlertLevel::Critical, String::new(), None, None, None);
        treated.mark_treated("u");
        let alerts = vec![
            Alert::new(AlertKind::BudgetOverrun, AlertLevel::Critical, String::new(), None, None, None),
            Alert::new(AlertKind::BudgetOverrun, AlertLevel::Warning, String::new(), None, None, None),
            treated,
        ];
        let stats = AlertStats::compute(&alerts);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.unread, 2);
        assert_eq!(stats.critical_open, 1);
        assert_eq!(stats.by_kind["DEPASSEMENT_BUDGET"], 2);
    }
}
