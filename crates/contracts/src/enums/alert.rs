coded_enum! {
    AlertLevel {
        Info => ("INFO", "Information"),
        Warning => ("WARNING", "Avertissement"),
        Critical => ("CRITIQUE", "Critique"),
    }
}

coded_enum! {
    AlertStatus {
        Unread => ("NON_LU", "Non lu"),
        Read => ("LU", "Lu"),
        Treated => ("TRAITEE", "Traitée"),
    }
}

coded_enum! {
    /// Тип сработавшего правила
    AlertKind {
        BudgetOverrun => ("DEPASSEMENT_BUDGET", "Dépassement de budget"),
        DeadlineOverrun => ("DEPASSEMENT_DELAI", "Dépassement de délai"),
        DeadlineApproaching => ("ECHEANCE_PROCHE", "Échéance proche"),
        ThresholdExceeded => ("DEPASSEMENT_SEUIL", "Dépassement de seuil"),
        OperationLate => ("OPERATION_RETARD", "Opération en retard"),
        SlowProgress => ("PROGRESSION_FAIBLE", "Progression faible"),
    }
}

impl AlertStatus {
    /// Алерт ещё не обработан (блокирует создание дубликата)
    pub fn is_open(&self) -> bool {
        matches!(self, AlertStatus::Unread | AlertStatus::Read)
    }
}

impl Default for AlertStatus {
    fn default() -> Self {
        AlertStatus::Unread
    }
}
