use serde::{Deserialize, Serialize};

use crate::domain::a001_project::aggregate::ProjectId;
use crate::domain::a002_phase::aggregate::PhaseId;
use crate::domain::a003_operation::aggregate::OperationId;
use crate::domain::common::{uuid_id, EntityMetadata};
use crate::enums::ReportStatus;

uuid_id!(ReportId);

/// Отчёт, импортированный с площадки
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub project_id: ProjectId,
    pub phase_id: Option<PhaseId>,
    pub operation_id: Option<OperationId>,
    pub report_type: String,
    pub file_name: String,
    pub file_path: Option<String>,
    pub imported_by: String,
    pub status: ReportStatus,
    pub comments: Option<String>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDto {
    pub project_id: String,
    pub phase_id: Option<String>,
    pub operation_id: Option<String>,
    pub report_type: String,
    pub file_name: String,
    pub file_path: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportReview {
    pub status: ReportStatus,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFilter {
    pub project_id: Option<String>,
    pub status: Option<ReportStatus>,
    pub imported_by: Option<String>,
}

impl Report {
    pub fn validate(&self) -> Result<(), String> {
        if self.file_name.trim().is_empty() {
            return Err("Le nom du fichier est obligatoire".into());
        }
        if self.report_type.trim().is_empty() {
            return Err("Le type de rapport est obligatoire".into());
        }
        Ok(())
    }
}
