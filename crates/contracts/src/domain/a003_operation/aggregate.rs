use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::a002_phase::aggregate::{validate_progress, PhaseId};
use crate::domain::common::{uuid_id, EntityMetadata};
use crate::enums::WorkStatus;

uuid_id!(
    /// Уникальный идентификатор операции
    OperationId
);

/// Операция внутри фазы
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub id: OperationId,
    pub phase_id: PhaseId,
    pub name: String,
    pub description: Option<String>,
    pub operation_type: String,
    pub order: i32,
    pub planned_start: NaiveDate,
    pub planned_end: NaiveDate,
    pub actual_start: Option<NaiveDate>,
    pub actual_end: Option<NaiveDate>,
    pub planned_cost: f64,
    pub actual_cost: f64,
    pub progress: f64,
    pub status: WorkStatus,
    pub responsible_id: Option<String>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDto {
    pub id: Option<String>,
    pub phase_id: String,
    pub name: String,
    pub description: Option<String>,
    pub operation_type: String,
    pub order: Option<i32>,
    pub planned_start: NaiveDate,
    pub planned_end: NaiveDate,
    pub actual_start: Option<NaiveDate>,
    pub actual_end: Option<NaiveDate>,
    pub planned_cost: f64,
    pub actual_cost: f64,
    pub progress: f64,
    pub status: Option<WorkStatus>,
    pub responsible_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub progress: f64,
}

impl Operation {
    pub fn new_for_insert(phase_id: PhaseId, order: i32, dto: &OperationDto) -> Self {
        let mut op = Self {
            id: OperationId::new_v4(),
            phase_id,
            name: String::new(),
            description: None,
            operation_type: String::new(),
            order,
            planned_start: dto.planned_start,
            planned_end: dto.planned_end,
            actual_start: None,
            actual_end: None,
            planned_cost: 0.0,
            actual_cost: 0.0,
            progress: 0.0,
            status: WorkStatus::Planned,
            responsible_id: None,
            metadata: EntityMetadata::new(),
        };
        op.update(dto);
        op
    }

    pub fn update(&mut self, dto: &OperationDto) {
        self.name = dto.name.trim().to_string();
        self.description = dto.description.clone();
        self.operation_type = dto.operation_type.trim().to_string();
        if let Some(order) = dto.order {
            self.order = order;
        }
        self.planned_start = dto.planned_start;
        self.planned_end = dto.planned_end;
        self.actual_start = dto.actual_start;
        self.actual_end = dto.actual_end;
        self.planned_cost = dto.planned_cost;
        self.actual_cost = dto.actual_cost;
        self.progress = dto.progress;
        if let Some(status) = dto.status {
            self.status = status;
        }
        self.responsible_id = dto.responsible_id.clone();
    }

    /// Установить прогресс; 100% закрывает операцию
    pub fn set_progress(&mut self, progress: f64) -> Result<(), String> {
        validate_progress(progress)?;
        self.progress = progress;
        if progress >= 100.0 {
            self.status = WorkStatus::Finished;
        } else if progress > 0.0 && self.status == WorkStatus::Planned {
            self.status = WorkStatus::InProgress;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Le nom de l'opération est obligatoire".into());
        }
        if self.planned_end < self.planned_start {
            return Err("La date de fin prévue précède la date de début".into());
        }
        if self.planned_cost < 0.0 || self.actual_cost < 0.0 {
            return Err("Les coûts ne peuvent pas être négatifs".into());
        }
        validate_progress(self.progress)
    }

    pub fn planned_days(&self) -> i64 {
        (self.planned_end - self.planned_start).num_days()
    }

    pub fn elapsed_days(&self, today: NaiveDate) -> i64 {
        let start = self.actual_start.unwrap_or(self.planned_start);
        let end = self.actual_end.unwrap_or(today);
        (end - start).num_days().max(0)
    }

    /// Дней до плановой даты окончания (отрицательное значение = просрочка)
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.planned_end - today).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op() -> Operation {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        Operation::new_for_insert(
            PhaseId::new_v4(),
            0,
            &OperationDto {
                id: None,
                phase_id: String::new(),
                name: "Cimentation".into(),
                description: None,
                operation_type: "FORAGE".into(),
                order: None,
                planned_start: d(4, 1),
                planned_end: d(4, 11),
                actual_start: None,
                actual_end: None,
                planned_cost: 10_000.0,
                actual_cost: 0.0,
                progress: 0.0,
                status: None,
                responsible_id: None,
            },
        )
    }

    #[test]
    fn test_set_progress_moves_status() {
        let mut o = op();
        o.set_progress(30.0).unwrap();
        assert_eq!(o.status, WorkStatus::InProgress);
        o.set_progress(100.0).unwrap();
        assert_eq!(o.status, WorkStatus::Finished);
        assert!(o.set_progress(101.0).is_err());
        assert_eq!(o.progress, 100.0);
    }

    #[test]
    fn test_days_left() {
        let o = op();
        let today = NaiveDate::from_ymd_opt(2024, 4, 14).unwrap();
        assert_eq!(o.days_left(today), -3);
        assert_eq!(o.planned_days(), 10);
    }
}
