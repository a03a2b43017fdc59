use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::a006_problem::aggregate::ProblemId;
use crate::domain::common::{uuid_id, EntityMetadata};
use crate::enums::SolutionStatus;

uuid_id!(SolutionId);

/// Решение, предложенное для проблемы
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub id: SolutionId,
    pub problem_id: ProblemId,
    pub description: String,
    pub solution_type: String,
    pub estimated_cost: Option<f64>,
    pub estimated_delay_days: Option<i32>,
    pub proposed_by: String,
    pub status: SolutionStatus,
    pub validated_by: Option<String>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionDto {
    pub problem_id: String,
    pub description: String,
    pub solution_type: String,
    pub estimated_cost: Option<f64>,
    pub estimated_delay_days: Option<i32>,
    pub status: Option<SolutionStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolutionFilter {
    pub problem_id: Option<String>,
    pub status: Option<SolutionStatus>,
    /// Подстрока типа решения (без учёта регистра)
    pub solution_type: Option<String>,
    pub min_cost: Option<f64>,
    pub max_cost: Option<f64>,
    pub min_delay: Option<i32>,
    pub max_delay: Option<i32>,
    /// Поиск по описанию
    pub search: Option<String>,
}

impl SolutionFilter {
    pub fn matches(&self, s: &Solution) -> bool {
        if let Some(status) = self.status {
            if s.status != status {
                return false;
            }
        }
        if let Some(kind) = self.solution_type.as_deref().filter(|k| !k.is_empty()) {
            if !s.solution_type.to_lowercase().contains(&kind.to_lowercase()) {
                return false;
            }
        }
        if let Some(text) = self.search.as_deref().filter(|t| !t.is_empty()) {
            let text = text.to_lowercase();
            if !s.description.to_lowercase().contains(&text)
                && !s.solution_type.to_lowercase().contains(&text)
            {
                return false;
            }
        }
        let cost = s.estimated_cost;
        if self.min_cost.is_some_and(|min| cost.map_or(true, |c| c < min)) {
            return false;
        }
        if self.max_cost.is_some_and(|max| cost.map_or(true, |c| c > max)) {
            return false;
        }
        let delay = s.estimated_delay_days;
        if self.min_delay.is_some_and(|min| delay.map_or(true, |d| d < min)) {
            return false;
        }
        if self.max_delay.is_some_and(|max| delay.map_or(true, |d| d > max)) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeStats {
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeStats {
    fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let values: Vec<f64> = values.collect();
        if values.is_empty() {
            return Self::default();
        }
        let sum: f64 = values.iter().sum();
        Self {
            avg: Some(sum / values.len() as f64),
            min: values.iter().copied().reduce(f64::min),
            max: values.iter().copied().reduce(f64::max),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionStats {
    pub total: u64,
    pub by_status: BTreeMap<String, u64>,
    pub cost: RangeStats,
    pub delay_days: RangeStats,
    /// (VALIDEE + MISE_EN_OEUVRE) / total, %
    pub validation_rate: f64,
    /// MISE_EN_OEUVRE / (VALIDEE + MISE_EN_OEUVRE), %
    pub implementation_rate: f64,
}

impl SolutionStats {
    pub fn compute(solutions: &[Solution]) -> Self {
        let mut stats = SolutionStats {
            total: solutions.len() as u64,
            cost: RangeStats::from_values(solutions.iter().filter_map(|s| s.estimated_cost)),
            delay_days: RangeStats::from_values(
                solutions
                    .iter()
                    .filter_map(|s| s.estimated_delay_days.map(f64::from)),
            ),
            ..Default::default()
        };
        for status in SolutionStatus::all() {
            stats.by_status.insert(status.code().to_string(), 0);
        }
        for s in solutions {
            *stats.by_status.entry(s.status.code().to_string()).or_default() += 1;
        }
        if stats.total > 0 {
            let count = |st: SolutionStatus| stats.by_status[st.code()] as f64;
            let implemented = count(SolutionStatus::Implemented);
            let validated = count(SolutionStatus::Validated) + implemented;
            stats.validation_rate = percent(validated, stats.total as f64);
            if validated > 0.0 {
                stats.implementation_rate = percent(implemented, validated);
            }
        }
        stats
    }
}

/// Процент с округлением до сотых
fn percent(part: f64, whole: f64) -> f64 {
    (part / whole * 10_000.0).round() / 100.0
}

impl Solution {
    pub fn new_for_insert(problem_id: ProblemId, dto: &SolutionDto, proposed_by: &str) -> Self {
        Self {
            id: SolutionId::new_v4(),
            problem_id,
            description: dto.description.trim().to_string(),
            solution_type: dto.solution_type.trim().to_string(),
            estimated_cost: dto.estimated_cost,
            estimated_delay_days: dto.estimated_delay_days,
            proposed_by: proposed_by.to_string(),
            status: dto.status.unwrap_or_default(),
            validated_by: None,
            metadata: EntityMetadata::new(),
        }
    }

    /// Сменить статус; при валидации запоминает, кто валидировал
    pub fn set_status(&mut self, status: SolutionStatus, by: &str) {
        if status == SolutionStatus::Validated && self.status != status {
            self.validated_by = Some(by.to_string());
        }
        self.status = status;
        self.metadata.touch();
    }

    /// Внедрение допустимо только для валидированного решения
    pub fn implement(&mut self) -> Result<(), String> {
        if self.status != SolutionStatus::Validated {
            return Err(format!(
                "Seule une solution validée peut être mise en œuvre (statut actuel: {})",
                self.status.code()
            ));
        }
        self.status = SolutionStatus::Implemented;
        self.metadata.touch();
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.description.is_empty() {
            return Err("La description de la solution est obligatoire".into());
        }
        if self.estimated_cost.is_some_and(|c| c < 0.0) {
            return Err("Le coût estimé ne peut pas être négatif".into());
        }
        if self.estimated_delay_days.is_some_and(|d| d < 0) {
            return Err("Le délai estimé ne peut pas être négatif".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(status: SolutionStatus, cost: Option<f64>, delay: Option<i32>) -> Solution {
        let mut s = Solution::new_for_insert(
            ProblemId::new_v4(),
            &SolutionDto {
                problem_id: String::new(),
                description: "Remplacer la vanne".into(),
                solution_type: "Technique".into(),
                estimated_cost: cost,
                estimated_delay_days: delay,
                status: None,
            },
            "u1",
        );
        s.status = status;
        s
    }

    #[test]
    fn test_implement_requires_validation() {
        let mut s = solution(SolutionStatus::Proposed, None, None);
        assert!(s.implement().is_err());
        assert_eq!(s.status, SolutionStatus::Proposed);
        s.set_status(SolutionStatus::Validated, "boss");
        assert_eq!(s.validated_by.as_deref(), Some("boss"));
        assert!(s.implement().is_ok());
        assert_eq!(s.status, SolutionStatus::Implemented);
        assert!(s.implement().is_err());
    }

    #[test]
    fn test_stats_rates() {
        let list = vec![
            solution(SolutionStatus::Proposed, Some(100.0), Some(2)),
            solution(SolutionStatus::Validated, Some(300.0), None),
            solution(SolutionStatus::Implemented, None, Some(6)),
            solution(SolutionStatus::Rejected, Some(200.0), Some(1)),
        ];
        let stats = SolutionStats::compute(&list);
        assert_eq!(stats.total, 4);
        assert!((stats.validation_rate - 50.0).abs() < 1e-9);
        assert!((stats.implementation_rate - 50.0).abs() < 1e-9);
        assert_eq!(stats.cost.min, Some(100.0));
        assert_eq!(stats.cost.max, Some(300.0));
        assert_eq!(stats.cost.avg, Some(200.0));
        assert_eq!(stats.delay_days.avg, Some(3.0));
    }

    #[test]
    fn test_implementation_rate_over_validated() {
        let list = vec![
            solution(SolutionStatus::Proposed, None, None),
            solution(SolutionStatus::Rejected, None, None),
            solution(SolutionStatus::Validated, None, None),
            solution(SolutionStatus::Validated, None, None),
            solution(SolutionStatus::Implemented, None, None),
        ];
        let stats = SolutionStats::compute(&list);
        assert_eq!(stats.validation_rate, 60.0);
        assert_eq!(stats.implementation_rate, 33.33);

        let none_validated = SolutionStats::compute(&[solution(SolutionStatus::Proposed, None, None)]);
        assert_eq!(none_validated.validation_rate, 0.0);
        assert_eq!(none_validated.implementation_rate, 0.0);
    }

    #[test]
    fn test_filter() {
        let s = solution(SolutionStatus::Validated, Some(150.0), Some(3));
        assert!(SolutionFilter::default().matches(&s));
        let f = SolutionFilter { solution_type: Some("techn".into()), ..Default::default() };
        assert!(f.matches(&s));
        let f = SolutionFilter { min_cost: Some(200.0), ..Default::default() };
        assert!(!f.matches(&s));
        let f = SolutionFilter { max_delay: Some(3), search: Some("VANNE".into()), ..Default::default() };
        assert!(f.matches(&s));
        let no_cost = solution(SolutionStatus::Validated, None, None);
        let f = SolutionFilter { max_cost: Some(1000.0), ..Default::default() };
        assert!(!f.matches(&no_cost));
    }
}
