use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::a001_project::aggregate::ProjectId;
use crate::domain::a002_phase::aggregate::PhaseId;
use crate::domain::a003_operation::aggregate::OperationId;
use crate::domain::a005_report::aggregate::ReportId;
use crate::domain::common::{uuid_id, EntityMetadata};
use crate::enums::{ProblemStatus, Severity};

uuid_id!(
    /// Уникальный идентификатор проблемы
    ProblemId
);

/// Проблема, привязанная к проекту, фазе или операции
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    pub project_id: Option<ProjectId>,
    pub phase_id: Option<PhaseId>,
    pub operation_id: Option<OperationId>,
    pub report_id: Option<ReportId>,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: ProblemStatus,
    pub reported_by: String,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDto {
    pub project_id: Option<String>,
    pub phase_id: Option<String>,
    pub operation_id: Option<String>,
    pub report_id: Option<String>,
    pub title: String,
    pub description: String,
    pub severity: Option<Severity>,
    pub status: Option<ProblemStatus>,
}

/// Фильтр и пагинация списка проблем
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemFilter {
    pub project_id: Option<String>,
    pub phase_id: Option<String>,
    pub operation_id: Option<String>,
    pub severity: Option<Severity>,
    pub status: Option<ProblemStatus>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

impl ProblemFilter {
    /// Номер страницы (с 1) и размер страницы, нормализованные
    pub fn paging(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, size)
    }
}

/// Страница результатов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Вид сущности для выборки проблем по привязке
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Project,
    Phase,
    Operation,
}

impl EntityKind {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "project" => Some(EntityKind::Project),
            "phase" => Some(EntityKind::Phase),
            "operation" => Some(EntityKind::Operation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemStats {
    pub total: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_severity: BTreeMap<String, u64>,
    /// (RESOLU + FERME) / total, %
    pub resolution_rate: f64,
}

impl ProblemStats {
    pub fn compute(problems: &[Problem]) -> Self {
        let mut stats = ProblemStats {
            total: problems.len() as u64,
            ..Default::default()
        };
        for status in ProblemStatus::all() {
            stats.by_status.insert(status.code().to_string(), 0);
        }
        for severity in Severity::all() {
            stats.by_severity.insert(severity.code().to_string(), 0);
        }
        let mut settled = 0u64;
        for p in problems {
            *stats.by_status.entry(p.status.code().to_string()).or_default() += 1;
            *stats.by_severity.entry(p.severity.code().to_string()).or_default() += 1;
            if p.status.is_settled() {
                settled += 1;
            }
        }
        if stats.total > 0 {
            stats.resolution_rate = settled as f64 / stats.total as f64 * 100.0;
        }
        stats
    }
}

impl Problem {
    pub fn new_for_insert(dto: &ProblemDto, reported_by: &str) -> Result<Self, String> {
        let parse = |s: &Option<String>| -> Result<Option<uuid::Uuid>, String> {
            s.as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| uuid::Uuid::parse_str(v).map_err(|e| format!("Invalid UUID: {}", e)))
                .transpose()
        };
        let problem = Self {
            id: ProblemId::new_v4(),
            project_id: parse(&dto.project_id)?.map(ProjectId),
            phase_id: parse(&dto.phase_id)?.map(PhaseId),
            operation_id: parse(&dto.operation_id)?.map(OperationId),
            report_id: parse(&dto.report_id)?.map(ReportId),
            title: dto.title.trim().to_string(),
            description: dto.description.clone(),
            severity: dto.severity.unwrap_or_default(),
            status: dto.status.unwrap_or_default(),
            reported_by: reported_by.to_string(),
            resolved_by: None,
            resolved_at: None,
            metadata: EntityMetadata::new(),
        };
        Ok(problem)
    }

    /// Сменить статус; при переходе в RESOLU фиксирует, кто и когда решил
    pub fn set_status(&mut self, status: ProblemStatus, by: &str) {
        if self.status == status {
            return;
        }
        if status == ProblemStatus::Resolved {
            self.resolved_by = Some(by.to_string());
            self.resolved_at = Some(Utc::now());
        }
        self.status = status;
        self.metadata.touch();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.is_empty() {
            return Err("Le titre du problème est obligatoire".into());
        }
        if self.project_id.is_none() && self.phase_id.is_none() && self.operation_id.is_none() {
            return Err("Le problème doit être rattaché à un projet, une phase ou une opération".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(status: ProblemStatus, severity: Severity) -> Problem {
        let mut p = Problem::new_for_insert(
            &ProblemDto {
                project_id: Some(uuid::Uuid::new_v4().to_string()),
                phase_id: None,
                operation_id: None,
                report_id: None,
                title: "Fuite".into(),
                description: String::new(),
                severity: Some(severity),
                status: None,
            },
            "u1",
        )
        .unwrap();
        p.status = status;
        p
    }

    #[test]
    fn test_stats() {
        let problems = vec![
            problem(ProblemStatus::Open, Severity::High),
            problem(ProblemStatus::Resolved, Severity::High),
            problem(ProblemStatus::Closed, Severity::Low),
            problem(ProblemStatus::InProgress, Severity::Critical),
        ];
        let stats = ProblemStats::compute(&problems);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_status["RESOLU"], 1);
        assert_eq!(stats.by_status["OUVERT"], 1);
        assert_eq!(stats.by_severity["ELEVEE"], 2);
        assert_eq!(stats.by_severity["MOYENNE"], 0);
        assert!((stats.resolution_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats() {
        let stats = ProblemStats::compute(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.resolution_rate, 0.0);
    }

    #[test]
    fn test_resolution_is_stamped() {
        let mut p = problem(ProblemStatus::Open, Severity::Low);
        p.set_status(ProblemStatus::Resolved, "u9");
        assert_eq!(p.resolved_by.as_deref(), Some("u9"));
        assert!(p.resolved_at.is_some());
    }

    #[test]
    fn test_problem_needs_an_anchor() {
        let mut p = problem(ProblemStatus::Open, Severity::Low);
        p.project_id = None;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_paging_is_clamped() {
        let f = ProblemFilter { page: Some(0), page_size: Some(1000), ..Default::default() };
        assert_eq!(f.paging(), (1, MAX_PAGE_SIZE));
        assert_eq!(ProblemFilter::default().paging(), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_entity_kind() {
        assert_eq!(EntityKind::from_code("phase"), Some(EntityKind::Phase));
        assert_eq!(EntityKind::from_code("site"), None);
    }
}
