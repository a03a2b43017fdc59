use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::{uuid_id, EntityMetadata};
use crate::enums::WorkStatus;

uuid_id!(
    /// Уникальный идентификатор проекта
    ProjectId
);

/// Порог алерта по умолчанию, % (бюджет и сроки)
pub const DEFAULT_ALERT_THRESHOLD: f64 = 80.0;

/// Нефтяной проект
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub initial_budget: f64,
    /// Сумма текущих затрат по фазам (пересчитывается)
    pub current_cost: f64,
    pub start_date: NaiveDate,
    pub planned_end_date: NaiveDate,
    pub actual_end_date: Option<NaiveDate>,
    pub status: WorkStatus,
    pub responsible_id: Option<String>,
    pub cost_alert_threshold: f64,
    pub delay_alert_threshold: f64,
    /// Средний прогресс по фазам, 0..=100 (пересчитывается)
    pub progress: f64,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDto {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub initial_budget: f64,
    pub start_date: NaiveDate,
    pub planned_end_date: NaiveDate,
    pub actual_end_date: Option<NaiveDate>,
    pub status: Option<WorkStatus>,
    pub responsible_id: Option<String>,
    pub cost_alert_threshold: Option<f64>,
    pub delay_alert_threshold: Option<f64>,
}

/// Фильтр списка проектов
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<WorkStatus>,
    /// Поиск по названию или месту
    pub search: Option<String>,
    pub responsible_id: Option<String>,
}

impl Project {
    pub fn new_for_insert(dto: &ProjectDto) -> Self {
        let mut project = Self {
            id: ProjectId::new_v4(),
            name: String::new(),
            description: None,
            location: None,
            initial_budget: 0.0,
            current_cost: 0.0,
            start_date: dto.start_date,
            planned_end_date: dto.planned_end_date,
            actual_end_date: None,
            status: WorkStatus::Planned,
            responsible_id: None,
            cost_alert_threshold: DEFAULT_ALERT_THRESHOLD,
            delay_alert_threshold: DEFAULT_ALERT_THRESHOLD,
            progress: 0.0,
            metadata: EntityMetadata::new(),
        };
        project.update(dto);
        project
    }

    /// Обновить данные из DTO (расчётные поля не трогаем)
    pub fn update(&mut self, dto: &ProjectDto) {
        self.name = dto.name.trim().to_string();
        self.description = dto.description.clone();
        self.location = dto.location.clone();
        self.initial_budget = dto.initial_budget;
        self.start_date = dto.start_date;
        self.planned_end_date = dto.planned_end_date;
        self.actual_end_date = dto.actual_end_date;
        if let Some(status) = dto.status {
            self.status = status;
        }
        self.responsible_id = dto.responsible_id.clone();
        self.cost_alert_threshold = dto
            .cost_alert_threshold
            .unwrap_or(self.cost_alert_threshold);
        self.delay_alert_threshold = dto
            .delay_alert_threshold
            .unwrap_or(self.delay_alert_threshold);
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Le nom du projet est obligatoire".into());
        }
        if self.initial_budget < 0.0 {
            return Err("Le budget initial ne peut pas être négatif".into());
        }
        if self.planned_end_date < self.start_date {
            return Err("La date de fin prévue précède la date de début".into());
        }
        if let Some(actual) = self.actual_end_date {
            if actual < self.start_date {
                return Err("La date de fin réelle précède la date de début".into());
            }
        }
        for threshold in [self.cost_alert_threshold, self.delay_alert_threshold] {
            if !(0.0..=100.0).contains(&threshold) {
                return Err("Les seuils d'alerte doivent être entre 0 et 100".into());
            }
        }
        Ok(())
    }

    /// Доля израсходованного бюджета, %
    pub fn budget_used_percent(&self) -> f64 {
        if self.initial_budget > 0.0 {
            self.current_cost / self.initial_budget * 100.0
        } else {
            0.0
        }
    }

    /// Дней просрочки на дату `today` (0, если проект не опаздывает)
    pub fn days_late(&self, today: NaiveDate) -> i64 {
        match self.actual_end_date {
            Some(actual) => (actual - self.planned_end_date).num_days().max(0),
            None if today > self.planned_end_date => (today - self.planned_end_date).num_days(),
            None => 0,
        }
    }

    /// Проект в работе, а плановая дата уже прошла
    pub fn is_late(&self, today: NaiveDate) -> bool {
        self.status == WorkStatus::InProgress
            && self.actual_end_date.is_none()
            && self.planned_end_date < today
    }

    pub fn planned_duration_days(&self) -> i64 {
        (self.planned_end_date - self.start_date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dto() -> ProjectDto {
        ProjectDto {
            id: None,
            name: "  Forage Hassi Messaoud  ".into(),
            description: None,
            location: Some("Ouargla".into()),
            initial_budget: 1_000_000.0,
            start_date: date(2024, 1, 1),
            planned_end_date: date(2024, 12, 31),
            actual_end_date: None,
            status: None,
            responsible_id: None,
            cost_alert_threshold: None,
            delay_alert_threshold: None,
        }
    }

    #[test]
    fn test_new_project_uses_defaults() {
        let p = Project::new_for_insert(&dto());
        assert_eq!(p.name, "Forage Hassi Messaoud");
        assert_eq!(p.status, WorkStatus::Planned);
        assert_eq!(p.cost_alert_threshold, DEFAULT_ALERT_THRESHOLD);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_dates() {
        let mut d = dto();
        d.planned_end_date = date(2023, 6, 1);
        assert!(Project::new_for_insert(&d).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let mut d = dto();
        d.cost_alert_threshold = Some(120.0);
        assert!(Project::new_for_insert(&d).validate().is_err());
    }

    #[test]
    fn test_days_late() {
        let mut p = Project::new_for_insert(&dto());
        assert_eq!(p.days_late(date(2024, 6, 1)), 0);
        assert_eq!(p.days_late(date(2025, 1, 10)), 10);
        p.actual_end_date = Some(date(2025, 1, 5));
        assert_eq!(p.days_late(date(2026, 1, 1)), 5);
    }

    #[test]
    fn test_budget_used_percent() {
        let mut p = Project::new_for_insert(&dto());
        p.current_cost = 850_000.0;
        assert!((p.budget_used_percent() - 85.0).abs() < 1e-9);
        p.initial_budget = 0.0;
        assert_eq!(p.budget_used_percent(), 0.0);
    }
}
