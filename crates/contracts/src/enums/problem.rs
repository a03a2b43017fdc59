coded_enum! {
    /// Степень серьёзности проблемы
    Severity {
        Low => ("FAIBLE", "Faible"),
        Medium => ("MOYENNE", "Moyenne"),
        High => ("ELEVEE", "Élevée"),
        Critical => ("CRITIQUE", "Critique"),
    }
}

coded_enum! {
    ProblemStatus {
        Open => ("OUVERT", "Ouvert"),
        InProgress => ("EN_COURS", "En cours"),
        Resolved => ("RESOLU", "Résolu"),
        Closed => ("FERME", "Fermé"),
    }
}

coded_enum! {
    /// Жизненный цикл предложенного решения
    SolutionStatus {
        Proposed => ("PROPOSEE", "Proposée"),
        Validated => ("VALIDEE", "Validée"),
        Rejected => ("REJETEE", "Rejetée"),
        Implemented => ("MISE_EN_OEUVRE", "Mise en œuvre"),
    }
}

impl ProblemStatus {
    /// Проблема закрыта и больше не меняет статус от решений
    pub fn is_settled(&self) -> bool {
        matches!(self, ProblemStatus::Resolved | ProblemStatus::Closed)
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Medium
    }
}

impl Default for ProblemStatus {
    fn default() -> Self {
        ProblemStatus::Open
    }
}

impl Default for SolutionStatus {
    fn default() -> Self {
        SolutionStatus::Proposed
    }
}
