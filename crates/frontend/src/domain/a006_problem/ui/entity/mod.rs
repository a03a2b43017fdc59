use contracts::domain::a006_problem::aggregate::{EntityKind, Problem, ProblemDto};
use contracts::enums::Severity;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Button, ButtonAppearance, Flex, FlexGap, Input, Select, Textarea};

use crate::domain::a006_problem::api;
use crate::shared::format::format_timestamp;
use crate::shared::indicators::{problem_status_color, severity_color, StatusBadge};

/// Запрос на создание, привязанный к проекту, фазе или операции
pub fn problem_for(
    kind: EntityKind,
    entity_id: &str,
    project_id: Option<&str>,
    title: &str,
    description: &str,
    severity: &str,
) -> Result<ProblemDto, String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Le titre du problème est obligatoire".into());
    }
    let id = Some(entity_id.to_string());
    let (project, phase, operation) = match kind {
        EntityKind::Project => (id, None, None),
        EntityKind::Phase => (project_id.map(str::to_string), id, None),
        EntityKind::Operation => (project_id.map(str::to_string), None, id),
    };
    Ok(ProblemDto {
        project_id: project,
        phase_id: phase,
        operation_id: operation,
        report_id: None,
        title: title.to_string(),
        description: description.trim().to_string(),
        severity: Severity::from_code(severity),
        status: None,
    })
}

/// Проблемы по одной сущности и форма для новой
#[component]
pub fn EntityProblems(
    kind: EntityKind,
    entity_id: String,
    #[prop(optional)] project_id: Option<String>,
) -> impl IntoView {
    let (problems, set_problems) = signal(Vec::<Problem>::new());
    let (error, set_error) = signal(None::<String>);
    let show_form = RwSignal::new(false);
    let title = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let severity = RwSignal::new(Severity::Medium.code().to_string());
    let entity_id = StoredValue::new(entity_id);
    let project_id = StoredValue::new(project_id);

    let load = move || {
        let id = entity_id.get_value();
        spawn_local(async move {
            match api::fetch_for_entity(kind, &id).await {
                Ok(list) => set_problems.set(list),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    Effect::new(move |_| load());

    let submit = move |_| {
        let dto = match problem_for(
            kind,
            &entity_id.get_value(),
            project_id.get_value().as_deref(),
            &title.get_untracked(),
            &description.get_untracked(),
            &severity.get_untracked(),
        ) {
            Ok(dto) => dto,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        spawn_local(async move {
            match api::create_problem(&dto).await {
                Ok(_) => {
                    set_error.set(None);
                    title.set(String::new());
                    description.set(String::new());
                    show_form.set(false);
                    load();
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="section">
            <div class="section__header">
                <h3 class="section__title">"Problèmes"</h3>
                <Button on_click=move |_| show_form.update(|v| *v = !*v)>"Signaler un problème"</Button>
            </div>

            {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}

            <Show when=move || show_form.get()>
                <div class="form-card">
                    <Input value=title placeholder="Titre" />
                    <Textarea value=description placeholder="Description" attr:rows=3 />
                    <Flex gap=FlexGap::Small>
                        <Select value=severity>
                            {Severity::all()
                                .into_iter()
                                .map(|s| view! { <option value=s.code()>{s.display_name()}</option> })
                                .collect_view()}
                        </Select>
                        <Button appearance=ButtonAppearance::Primary on_click=submit>"Enregistrer"</Button>
                    </Flex>
                </div>
            </Show>

            <Show
                when=move || !problems.with(|p| p.is_empty())
                fallback=|| view! { <div class="page__empty">"Aucun problème signalé"</div> }
            >
                <ul class="problem-list">
                    {move || {
                        problems
                            .get()
                            .into_iter()
                            .map(|p| view! {
                                <li class="problem-list__item">
                                    <StatusBadge label=p.severity.display_name() color=severity_color(p.severity) />
                                    <span class="problem-list__title">{p.title}</span>
                                    <StatusBadge label=p.status.display_name() color=problem_status_color(p.status) />
                                    <span class="problem-list__date">{format_timestamp(&p.metadata.created_at)}</span>
                                </li>
                            })
                            .collect_view()
                    }}
                </ul>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_for_operation_keeps_project() {
        let dto = problem_for(EntityKind::Operation, "op-1", Some("p-1"), " Fuite ", "", "ELEVEE").unwrap();
        assert_eq!(dto.operation_id.as_deref(), Some("op-1"));
        assert_eq!(dto.project_id.as_deref(), Some("p-1"));
        assert_eq!(dto.phase_id, None);
        assert_eq!(dto.title, "Fuite");
        assert_eq!(dto.severity, Some(Severity::High));
    }

    #[test]
    fn test_problem_for_project() {
        let dto = problem_for(EntityKind::Project, "p-1", None, "Retard", "x", "").unwrap();
        assert_eq!(dto.project_id.as_deref(), Some("p-1"));
        assert_eq!(dto.severity, None);
    }

    #[test]
    fn test_problem_for_requires_title() {
        assert!(problem_for(EntityKind::Phase, "ph", None, "   ", "", "FAIBLE").is_err());
    }
}
