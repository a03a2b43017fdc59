coded_enum! {
    ReportStatus {
        Pending => ("A_TRAITER", "À traiter"),
        Processed => ("TRAITE", "Traité"),
        Rejected => ("REJETE", "Rejeté"),
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        ReportStatus::Pending
    }
}
