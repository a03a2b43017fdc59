//! Форма загрузки отчёта инженером на площадке.
//!
//! С отчётом сохраняется только имя файла. Проблему, замеченную на площадке,
//! можно завести вместе с отчётом, она будет к нему привязана.

use contracts::domain::a002_phase::aggregate::Phase;
use contracts::domain::a005_report::aggregate::ReportDto;
use contracts::domain::a006_problem::aggregate::ProblemDto;
use contracts::domain::common::AggregateId;
use contracts::enums::Severity;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Button, ButtonAppearance, Flex, FlexGap, Input, Select, Textarea};
use wasm_bindgen::JsCast;

use crate::domain::a002_phase::api as phase_api;
use crate::domain::a005_report::api;
use crate::domain::a006_problem::api as problem_api;

pub fn build_report_dto(
    project_id: &str,
    phase_id: &str,
    file_name: Option<&str>,
    report_type: &str,
    comments: &str,
) -> Result<ReportDto, String> {
    let file_name = file_name.map(str::trim).unwrap_or_default();
    if file_name.is_empty() {
        return Err("Veuillez choisir un fichier".into());
    }
    let report_type = report_type.trim();
    if report_type.is_empty() {
        return Err("Le type de rapport est obligatoire".into());
    }
    let comments = comments.trim();
    Ok(ReportDto {
        project_id: project_id.to_string(),
        phase_id: Some(phase_id.to_string()).filter(|p| !p.is_empty()),
        operation_id: None,
        report_type: report_type.to_string(),
        file_name: file_name.to_string(),
        file_path: None,
        comments: Some(comments.to_string()).filter(|c| !c.is_empty()),
    })
}

/// Проблема, заведённая вместе с отчётом; `None`, если инженер её не заполнил
pub fn linked_problem(
    report: &ReportDto,
    report_id: &str,
    title: &str,
    description: &str,
    severity: &str,
) -> Option<ProblemDto> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    Some(ProblemDto {
        project_id: Some(report.project_id.clone()),
        phase_id: report.phase_id.clone(),
        operation_id: None,
        report_id: Some(report_id.to_string()),
        title: title.to_string(),
        description: description.trim().to_string(),
        severity: Severity::from_code(severity),
        status: None,
    })
}

#[component]
pub fn UploadReportForm(project_id: String, #[prop(into)] on_uploaded: Callback<()>) -> impl IntoView {
    let (phases, set_phases) = signal(Vec::<Phase>::new());
    let (file_name, set_file_name) = signal(None::<String>);
    let (error, set_error) = signal(None::<String>);
    let (saving, set_saving) = signal(false);
    let phase = RwSignal::new(String::new());
    let report_type = RwSignal::new(String::new());
    let comments = RwSignal::new(String::new());
    let problem_title = RwSignal::new(String::new());
    let problem_description = RwSignal::new(String::new());
    let problem_severity = RwSignal::new(Severity::Medium.code().to_string());
    let project_id = StoredValue::new(project_id);

    Effect::new(move |_| {
        let id = project_id.get_value();
        spawn_local(async move {
            match phase_api::fetch_phases(&id).await {
                Ok(list) => set_phases.set(list),
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    let handle_file_select = move |ev: web_sys::Event| {
        let input = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok());
        let name = input
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
            .map(|file| file.name());
        set_file_name.set(name);
    };

    let submit = move |_| {
        let dto = match build_report_dto(
            &project_id.get_value(),
            &phase.get_untracked(),
            file_name.get_untracked().as_deref(),
            &report_type.get_untracked(),
            &comments.get_untracked(),
        ) {
            Ok(dto) => dto,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        set_saving.set(true);
        spawn_local(async move {
            let report_id = match api::create_report(&dto).await {
                Ok(id) => id,
                Err(e) => {
                    set_error.set(Some(e));
                    set_saving.set(false);
                    return;
                }
            };
            log::info!("Report {} registered for project {}", dto.file_name, dto.project_id);

            let problem = linked_problem(
                &dto,
                &report_id,
                &problem_title.get_untracked(),
                &problem_description.get_untracked(),
                &problem_severity.get_untracked(),
            );
            if let Some(problem) = problem {
                if let Err(e) = problem_api::create_problem(&problem).await {
                    // сам отчёт уже сохранён
                    log::warn!("Problem linked to report {} not created: {}", report_id, e);
                }
            }
            set_saving.set(false);
            on_uploaded.run(());
        });
    };

    view! {
        <div class="form-card">
            <h3 class="section__title">"Nouveau rapport"</h3>

            {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}

            <div class="form-field">
                <label>"Fichier"</label>
                <input type="file" on:change=handle_file_select />
                {move || file_name.get().map(|name| view! { <span class="form-field__hint">{name}</span> })}
            </div>

            <div class="form-field">
                <label>"Type de rapport"</label>
                <Input value=report_type placeholder="Journalier, incident..." />
            </div>

            <div class="form-field">
                <label>"Phase"</label>
                <Select value=phase>
                    <option value="">"Aucune"</option>
                    {move || {
                        phases
                            .get()
                            .into_iter()
                            .map(|p| view! { <option value=p.id.as_string()>{p.name}</option> })
                            .collect_view()
                    }}
                </Select>
            </div>

            <div class="form-field">
                <label>"Commentaires"</label>
                <Textarea value=comments attr:rows=2 />
            </div>

            <h4 class="section__subtitle">"Problème constaté (facultatif)"</h4>
            <Input value=problem_title placeholder="Objet" />
            <Textarea value=problem_description placeholder="Description" attr:rows=3 />
            <Flex gap=FlexGap::Small>
                <Select value=problem_severity>
                    {Severity::all()
                        .into_iter()
                        .map(|s| view! { <option value=s.code()>{s.display_name()}</option> })
                        .collect_view()}
                </Select>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=submit
                    disabled=Signal::derive(move || saving.get())
                >
                    "Envoyer"
                </Button>
            </Flex>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_requires_file_and_type() {
        assert_eq!(
            build_report_dto("p", "", None, "Journalier", "").unwrap_err(),
            "Veuillez choisir un fichier"
        );
        assert_eq!(
            build_report_dto("p", "", Some("log.pdf"), "  ", "").unwrap_err(),
            "Le type de rapport est obligatoire"
        );
    }

    #[test]
    fn test_report_without_phase_or_comment() {
        let dto = build_report_dto("p1", "", Some("forage.xlsx"), " Journalier ", " ").unwrap();
        assert_eq!(dto.phase_id, None);
        assert_eq!(dto.comments, None);
        assert_eq!(dto.report_type, "Journalier");
        assert_eq!(dto.file_name, "forage.xlsx");
    }

    #[test]
    fn test_linked_problem_points_at_report_and_phase() {
        let dto = build_report_dto("p1", "ph2", Some("a.pdf"), "Incident", "").unwrap();
        let problem = linked_problem(&dto, "r9", "Fuite de boue", "", "CRITIQUE").unwrap();
        assert_eq!(problem.report_id.as_deref(), Some("r9"));
        assert_eq!(problem.phase_id.as_deref(), Some("ph2"));
        assert_eq!(problem.project_id.as_deref(), Some("p1"));
        assert_eq!(problem.severity, Some(Severity::Critical));
    }

    #[test]
    fn test_blank_problem_is_skipped() {
        let dto = build_report_dto("p1", "", Some("a.pdf"), "Incident", "").unwrap();
        assert!(linked_problem(&dto, "r9", "  ", "texte", "MOYENNE").is_none());
    }
}
