coded_enum! {
    /// Статус проекта, фазы или операции
    WorkStatus {
        Planned => ("PLANIFIE", "Planifié"),
        InProgress => ("EN_COURS", "En cours"),
        Finished => ("TERMINE", "Terminé"),
        Suspended => ("SUSPENDU", "Suspendu"),
    }
}

impl WorkStatus {
    /// Работа ещё не закрыта (по ней имеет смысл считать сроки)
    pub fn is_active(&self) -> bool {
        matches!(self, WorkStatus::Planned | WorkStatus::InProgress)
    }
}

impl Default for WorkStatus {
    fn default() -> Self {
        WorkStatus::Planned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_storage_format() {
        assert_eq!(WorkStatus::InProgress.code(), "EN_COURS");
        assert_eq!(WorkStatus::from_code("TERMINE"), Some(WorkStatus::Finished));
        assert_eq!(WorkStatus::from_code("termine"), None);
        assert_eq!(
            serde_json::to_string(&WorkStatus::Suspended).unwrap(),
            "\"SUSPENDU\""
        );
    }

    #[test]
    fn test_active_statuses() {
        assert!(WorkStatus::Planned.is_active());
        assert!(WorkStatus::InProgress.is_active());
        assert!(!WorkStatus::Finished.is_active());
        assert!(!WorkStatus::Suspended.is_active());
    }
}
