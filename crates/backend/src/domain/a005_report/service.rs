use anyhow::Result;
use contracts::domain::a001_project::aggregate::ProjectId;
use contracts::domain::a002_phase::aggregate::PhaseId;
use contracts::domain::a003_operation::aggregate::OperationId;
use contracts::domain::a005_report::aggregate::{
    Report, ReportDto, ReportFilter, ReportId, ReportReview,
};
use contracts::domain::common::EntityMetadata;
use contracts::enums::ReportStatus;
use uuid::Uuid;

use super::repository;
use crate::domain::{a001_project, a010_history};
use crate::shared::error::{not_found, validation};

fn parse_optional(value: &Option<String>) -> Result<Option<Uuid>> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| Uuid::parse_str(v).map_err(|_| validation(format!("Identifiant invalide: {}", v))))
        .transpose()
}

/// Импорт отчёта (метаданные; содержимое файла не хранится)
pub async fn create(dto: ReportDto, imported_by: &str) -> Result<Uuid> {
    let project_id = Uuid::parse_str(&dto.project_id)
        .map_err(|_| validation("Projet invalide"))?;
    a001_project::service::get_required(project_id).await?;

    let report = Report {
        id: ReportId::new_v4(),
        project_id: ProjectId(project_id),
        phase_id: parse_optional(&dto.phase_id)?.map(PhaseId),
        operation_id: parse_optional(&dto.operation_id)?.map(OperationId),
        report_type: dto.report_type.trim().to_string(),
        file_name: dto.file_name.trim().to_string(),
        file_path: dto.file_path,
        imported_by: imported_by.to_string(),
        status: ReportStatus::Pending,
        comments: dto.comments,
        metadata: EntityMetadata::new(),
    };
    report.validate().map_err(validation)?;

    let id = repository::insert(&report).await?;
    tracing::info!("Report {} imported by {}", report.file_name, imported_by);
    Ok(id)
}

/// Рассмотрение отчёта: новый статус и комментарий
pub async fn review(id: Uuid, review: ReportReview, by: &str) -> Result<Report> {
    let mut report = get_required(id).await?;
    let old = report.status;
    report.status = review.status;
    if review.comments.is_some() {
        report.comments = review.comments;
    }
    report.metadata.touch();
    repository::update(&report).await?;

    if old != report.status {
        a010_history::service::record(
            "a005_report",
            &id.to_string(),
            "statut",
            Some(old.code().to_string()),
            Some(report.status.code().to_string()),
            Some(by),
            report.comments.as_deref(),
        )
        .await;
    }
    Ok(report)
}

pub async fn get_required(id: Uuid) -> Result<Report> {
    repository::get_by_id(id)
        .await?
        .ok_or_else(|| not_found(format!("Rapport {}", id)))
}

pub async fn list(filter: &ReportFilter) -> Result<Vec<Report>> {
    repository::list(filter).await
}

pub async fn delete(id: Uuid) -> Result<()> {
    if !repository::delete(id).await? {
        return Err(not_found(format!("Rapport {}", id)));
    }
    Ok(())
}
