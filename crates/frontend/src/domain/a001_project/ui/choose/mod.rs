//! Выбор проекта сразу после входа.
//!
//! Руководство попадает на вариант `manager`, где можно также завести
//! новый проект.

mod form;

use std::collections::HashMap;

use contracts::domain::a001_project::aggregate::{Project, ProjectFilter};
use contracts::domain::common::AggregateId;
use contracts::shared::status_color::progress_color;
use contracts::system::auth::Role;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use thaw::{Button, ButtonAppearance, Input, Select, Spinner};

use self::form::NewProjectForm;
use crate::domain::a001_project::api;
use crate::layout::global_context::AppGlobalContext;
use crate::routes::table::AppRoute;
use crate::shared::format::format_day;
use crate::shared::icons::icon;
use crate::shared::indicators::{work_status_color, ProgressBar, StatusBadge};
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::system::auth::context::use_session;
use crate::system::users::api as users_api;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    All,
    Name,
    Responsible,
    Location,
}

impl SearchField {
    pub fn code(self) -> &'static str {
        match self {
            SearchField::All => "all",
            SearchField::Name => "name",
            SearchField::Responsible => "responsible",
            SearchField::Location => "location",
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "name" => SearchField::Name,
            "responsible" => SearchField::Responsible,
            "location" => SearchField::Location,
            _ => SearchField::All,
        }
    }
}

/// Поиск подстроки без учёта регистра по выбранному полю; пустая строка
/// оставляет все проекты
pub fn matches_search(project: &Project, responsible: &str, term: &str, field: SearchField) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    let name = project.name.to_lowercase().contains(&term);
    let location = project
        .location
        .as_deref()
        .map(|l| l.to_lowercase().contains(&term))
        .unwrap_or(false);
    let responsible = responsible.to_lowercase().contains(&term);

    match field {
        SearchField::All => name || location || responsible,
        SearchField::Name => name,
        SearchField::Responsible => responsible,
        SearchField::Location => location,
    }
}

/// Куда пользователь переходит после выбора проекта
pub fn after_selection(role: Role) -> &'static str {
    match role {
        Role::IngenieurTerrain => AppRoute::ReportsIngenieur.path(),
        Role::TopManagement | Role::Expert => AppRoute::Dashboard.path(),
    }
}

#[component]
pub fn ChooseProjectPage(manager: bool) -> impl IntoView {
    let session = use_session();
    let global = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let navigate = use_navigate();

    let (projects, set_projects) = signal(Vec::<Project>::new());
    let (responsibles, set_responsibles) = signal(HashMap::<String, String>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);
    let search = RwSignal::new(String::new());
    let field = RwSignal::new(SearchField::All.code().to_string());
    let show_form = RwSignal::new(false);

    let load = move || {
        spawn_local(async move {
            set_loading.set(true);
            set_error.set(None);
            match api::fetch_projects(&ProjectFilter::default()).await {
                Ok(list) => set_projects.set(list),
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        load();
        // имена пользователей доступны только руководству
        if session.role() == Some(Role::TopManagement) {
            spawn_local(async move {
                match users_api::fetch_users().await {
                    Ok(users) => set_responsibles.set(
                        users.into_iter().map(|u| (u.id.clone(), u.full_name())).collect(),
                    ),
                    Err(e) => log::warn!("Unable to load users: {}", e),
                }
            });
        }
    });

    let responsible_name = move |project: &Project| {
        project
            .responsible_id
            .as_ref()
            .and_then(|id| responsibles.with(|m| m.get(id).cloned()))
            .unwrap_or_default()
    };

    let filtered = Signal::derive(move || {
        let term = search.get();
        let field = SearchField::from_code(&field.get());
        projects.with(|list| {
            list.iter()
                .filter(|p| matches_search(p, &responsible_name(p), &term, field))
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    let choose = move |project: Project| {
        let Some(role) = session.role() else {
            return;
        };
        session.select_project(&project.id.as_string());
        global.project_title.set(Some(project.name.clone()));
        log::info!("Project selected: {}", project.name);
        navigate(after_selection(role), Default::default());
    };
    let choose = StoredValue::new_local(choose);

    view! {
        <PageFrame page_id="a001_project--choose" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"PetroMonitore"</h1>
                    <span class="page__subtitle">"Choisissez un projet"</span>
                </div>
                <div class="page__header-right">
                    <Select value=field>
                        <option value="all">"Tous"</option>
                        <option value="name">"Nom"</option>
                        <option value="responsible">"Responsable"</option>
                        <option value="location">"Localisation"</option>
                    </Select>
                    <div style="width: 320px;">
                        <Input value=search placeholder="Rechercher un projet..." />
                    </div>
                    <Show when=move || manager>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| show_form.update(|v| *v = !*v)
                        >
                            {icon("plus")}
                            " Nouveau projet"
                        </Button>
                    </Show>
                </div>
            </div>

            <div class="page__content">
                <Show when=move || show_form.get()>
                    <NewProjectForm
                        on_created=move || {
                            show_form.set(false);
                            load();
                        }
                        on_cancel=move || show_form.set(false)
                    />
                </Show>

                {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}

                <Show
                    when=move || !loading.get()
                    fallback=|| view! { <div class="page__loading"><Spinner /></div> }
                >
                    <Show
                        when=move || !filtered.with(|l| l.is_empty())
                        fallback=|| view! { <div class="page__empty">"Aucun projet trouvé"</div> }
                    >
                        <div class="project-grid">
                            <For
                                each=move || filtered.get()
                                key=|p| p.id.as_string()
                                children=move |project| {
                                    let responsible = responsible_name(&project);
                                    let selected = project.clone();
                                    view! {
                                        <div class="project-card" on:click=move |_| choose.with_value(|choose| choose(selected.clone()))>
                                            <div class="project-card__header">
                                                <span class="project-card__name">{project.name.clone()}</span>
                                                <StatusBadge
                                                    label=project.status.display_name()
                                                    color=work_status_color(project.status)
                                                />
                                            </div>
                                            <div class="project-card__row">
                                                "Responsable: "
                                                {if responsible.is_empty() { "-".to_string() } else { responsible }}
                                            </div>
                                            <div class="project-card__row">
                                                "Localisation: "
                                                {project.location.clone().unwrap_or_else(|| "-".to_string())}
                                            </div>
                                            <div class="project-card__row">
                                                {format!(
                                                    "{} → {}",
                                                    format_day(project.start_date),
                                                    format_day(project.planned_end_date),
                                                )}
                                            </div>
                                            <ProgressBar
                                                value=project.progress
                                                color=progress_color(project.progress)
                                            />
                                        </div>
                                    }
                                }
                            />
                        </div>
                    </Show>
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::domain::a001_project::aggregate::ProjectDto;

    fn project(name: &str, location: Option<&str>) -> Project {
        Project::new_for_insert(&ProjectDto {
            id: None,
            name: name.into(),
            description: None,
            location: location.map(str::to_string),
            initial_budget: 1000.0,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            planned_end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            actual_end_date: None,
            status: None,
            responsible_id: None,
            cost_alert_threshold: None,
            delay_alert_threshold: None,
        })
    }

    #[test]
    fn test_empty_term_keeps_everything() {
        let p = project("Forage Hassi", None);
        assert!(matches_search(&p, "", "  ", SearchField::Name));
    }

    #[test]
    fn test_search_by_field() {
        let p = project("Forage Hassi Messaoud", Some("Ouargla"));

        assert!(matches_search(&p, "Karim Benali", "hassi", SearchField::Name));
        assert!(!matches_search(&p, "Karim Benali", "hassi", SearchField::Location));
        assert!(matches_search(&p, "Karim Benali", "OUARG", SearchField::Location));
        assert!(matches_search(&p, "Karim Benali", "benali", SearchField::Responsible));
        assert!(!matches_search(&p, "Karim Benali", "benali", SearchField::Name));
        assert!(matches_search(&p, "Karim Benali", "benali", SearchField::All));
        assert!(!matches_search(&p, "Karim Benali", "adrar", SearchField::All));
    }

    #[test]
    fn test_missing_location_never_matches() {
        let p = project("Pipeline Est", None);
        assert!(!matches_search(&p, "", "est", SearchField::Location));
    }

    #[test]
    fn test_search_field_codes() {
        for f in [
            SearchField::All,
            SearchField::Name,
            SearchField::Responsible,
            SearchField::Location,
        ] {
            assert_eq!(SearchField::from_code(f.code()), f);
        }
        assert_eq!(SearchField::from_code("bogus"), SearchField::All);
    }

    #[test]
    fn test_after_selection() {
        assert_eq!(after_selection(Role::TopManagement), "/dashboard");
        assert_eq!(after_selection(Role::Expert), "/dashboard");
        assert_eq!(after_selection(Role::IngenieurTerrain), "/reports/ingenieur");
    }
}
