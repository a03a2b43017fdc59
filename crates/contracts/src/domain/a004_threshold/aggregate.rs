use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::a003_operation::aggregate::OperationId;
use crate::domain::common::{uuid_id, EntityMetadata};

uuid_id!(ThresholdId);

/// Пороги стоимости операции (зелёный < жёлтый < красный)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Threshold {
    pub id: ThresholdId,
    pub operation_id: OperationId,
    pub green: f64,
    pub yellow: f64,
    pub red: f64,
    pub defined_by: Option<String>,
    pub modified_by: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdDto {
    pub green: f64,
    pub yellow: f64,
    pub red: f64,
}

impl Threshold {
    pub fn new_for_insert(operation_id: OperationId, dto: &ThresholdDto, defined_by: &str) -> Self {
        Self {
            id: ThresholdId::new_v4(),
            operation_id,
            green: dto.green,
            yellow: dto.yellow,
            red: dto.red,
            defined_by: Some(defined_by.to_string()),
            modified_by: None,
            modified_at: None,
            metadata: EntityMetadata::new(),
        }
    }

    /// Применить новые значения; возвращает список изменённых полей (поле, было, стало)
    pub fn apply(
        &mut self,
        dto: &ThresholdDto,
        modified_by: &str,
    ) -> Vec<(&'static str, f64, f64)> {
        let mut changes = Vec::new();
        for (field, current, new) in [
            ("valeur_verte", &mut self.green, dto.green),
            ("valeur_jaune", &mut self.yellow, dto.yellow),
            ("valeur_rouge", &mut self.red, dto.red),
        ] {
            if *current != new {
                changes.push((field, *current, new));
                *current = new;
            }
        }
        if !changes.is_empty() {
            self.modified_by = Some(modified_by.to_string());
            self.modified_at = Some(Utc::now());
            self.metadata.touch();
        }
        changes
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_ordering(self.green, self.yellow, self.red)
    }
}

/// Пороги неотрицательны и строго возрастают
pub fn validate_ordering(green: f64, yellow: f64, red: f64) -> Result<(), String> {
    if green < 0.0 || yellow < 0.0 || red < 0.0 {
        return Err("Les seuils ne peuvent pas être négatifs".into());
    }
    if green >= yellow {
        return Err("La valeur verte doit être inférieure à la valeur jaune".into());
    }
    if yellow >= red {
        return Err("La valeur jaune doit être inférieure à la valeur rouge".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(validate_ordering(10.0, 20.0, 30.0).is_ok());
        assert!(validate_ordering(20.0, 20.0, 30.0).is_err());
        assert!(validate_ordering(10.0, 40.0, 30.0).is_err());
        assert!(validate_ordering(-1.0, 20.0, 30.0).is_err());
    }

    #[test]
    fn test_apply_reports_only_changed_values() {
        let dto = ThresholdDto { green: 100.0, yellow: 200.0, red: 300.0 };
        let mut t = Threshold::new_for_insert(OperationId::new_v4(), &dto, "u1");
        let changes = t.apply(&ThresholdDto { green: 100.0, yellow: 250.0, red: 300.0 }, "u2");
        assert_eq!(changes, vec![("valeur_jaune", 200.0, 250.0)]);
        assert_eq!(t.modified_by.as_deref(), Some("u2"));
        assert!(t.apply(&ThresholdDto { green: 100.0, yellow: 250.0, red: 300.0 }, "u3").is_empty());
        assert_eq!(t.modified_by.as_deref(), Some("u2"));
    }
}
