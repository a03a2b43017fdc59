use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::a001_project::aggregate::ProjectId;
use crate::domain::common::{uuid_id, EntityMetadata};
use crate::enums::WorkStatus;

uuid_id!(
    /// Уникальный идентификатор фазы
    PhaseId
);

/// Фаза проекта (упорядочена внутри проекта по `order`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub project_id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub order: i32,
    pub planned_start: NaiveDate,
    pub planned_end: NaiveDate,
    pub actual_start: Option<NaiveDate>,
    pub actual_end: Option<NaiveDate>,
    pub allocated_budget: f64,
    /// Сумма фактических затрат операций
    pub current_cost: f64,
    /// Средний прогресс операций
    pub progress: f64,
    pub status: WorkStatus,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseDto {
    pub id: Option<String>,
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub order: Option<i32>,
    pub planned_start: NaiveDate,
    pub planned_end: NaiveDate,
    pub actual_start: Option<NaiveDate>,
    pub actual_end: Option<NaiveDate>,
    pub allocated_budget: f64,
    pub status: Option<WorkStatus>,
}

/// Новый порядок фаз / операций: идентификаторы в нужной последовательности
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<String>,
}

impl Phase {
    pub fn new_for_insert(project_id: ProjectId, order: i32, dto: &PhaseDto) -> Self {
        let mut phase = Self {
            id: PhaseId::new_v4(),
            project_id,
            name: String::new(),
            description: None,
            order,
            planned_start: dto.planned_start,
            planned_end: dto.planned_end,
            actual_start: None,
            actual_end: None,
            allocated_budget: 0.0,
            current_cost: 0.0,
            progress: 0.0,
            status: WorkStatus::Planned,
            metadata: EntityMetadata::new(),
        };
        phase.update(dto);
        phase
    }

    pub fn update(&mut self, dto: &PhaseDto) {
        self.name = dto.name.trim().to_string();
        self.description = dto.description.clone();
        if let Some(order) = dto.order {
            self.order = order;
        }
        self.planned_start = dto.planned_start;
        self.planned_end = dto.planned_end;
        self.actual_start = dto.actual_start;
        self.actual_end = dto.actual_end;
        self.allocated_budget = dto.allocated_budget;
        if let Some(status) = dto.status {
            self.status = status;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Le nom de la phase est obligatoire".into());
        }
        if self.order < 0 {
            return Err("L'ordre de la phase doit être positif".into());
        }
        if self.planned_end < self.planned_start {
            return Err("La date de fin prévue précède la date de début".into());
        }
        if let (Some(start), Some(end)) = (self.actual_start, self.actual_end) {
            if end < start {
                return Err("La date de fin réelle précède la date de début réelle".into());
            }
        }
        if self.allocated_budget < 0.0 {
            return Err("Le budget alloué ne peut pas être négatif".into());
        }
        validate_progress(self.progress)
    }

    pub fn planned_days(&self) -> i64 {
        (self.planned_end - self.planned_start).num_days()
    }

    /// Дней с фактического (или планового) старта до `today`
    pub fn elapsed_days(&self, today: NaiveDate) -> i64 {
        let start = self.actual_start.unwrap_or(self.planned_start);
        let end = self.actual_end.unwrap_or(today);
        (end - start).num_days().max(0)
    }
}

/// Прогресс в процентах 0..=100
pub fn validate_progress(progress: f64) -> Result<(), String> {
    if progress.is_nan() || !(0.0..=100.0).contains(&progress) {
        return Err("La progression doit être comprise entre 0 et 100".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn phase() -> Phase {
        Phase::new_for_insert(
            ProjectId::new_v4(),
            1,
            &PhaseDto {
                id: None,
                project_id: String::new(),
                name: "Forage".into(),
                description: None,
                order: None,
                planned_start: date(2024, 3, 1),
                planned_end: date(2024, 3, 31),
                actual_start: None,
                actual_end: None,
                allocated_budget: 50_000.0,
                status: None,
            },
        )
    }

    #[test]
    fn test_progress_bounds() {
        assert!(validate_progress(0.0).is_ok());
        assert!(validate_progress(100.0).is_ok());
        assert!(validate_progress(-0.1).is_err());
        assert!(validate_progress(100.5).is_err());
        assert!(validate_progress(f64::NAN).is_err());
    }

    #[test]
    fn test_elapsed_days_uses_actual_dates_when_known() {
        let mut p = phase();
        assert_eq!(p.planned_days(), 30);
        assert_eq!(p.elapsed_days(date(2024, 3, 11)), 10);
        assert_eq!(p.elapsed_days(date(2024, 2, 1)), 0);
        p.actual_start = Some(date(2024, 3, 5));
        p.actual_end = Some(date(2024, 3, 25));
        assert_eq!(p.elapsed_days(date(2030, 1, 1)), 20);
    }

    #[test]
    fn test_validate() {
        let mut p = phase();
        assert!(p.validate().is_ok());
        p.progress = 140.0;
        assert!(p.validate().is_err());
    }
}
