//! Карточка проекта: ключевые цифры, статус и ответственный, история изменений

use contracts::domain::a001_project::aggregate::Project;
use contracts::domain::common::AggregateId;
use contracts::enums::WorkStatus;
use contracts::system::auth::{Role, UserInfo};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Button, ButtonAppearance, Flex, FlexGap, Select, Spinner};

use crate::domain::a001_project::api;
use crate::domain::a010_history::ui::HistoryPanel;
use crate::shared::format::{format_day, format_money, format_optional_day, format_percent};
use crate::shared::indicators::{work_status_color, StatusBadge};
use crate::shared::page_frame::{PageFrame, PAGE_CAT_DETAIL};
use crate::shared::project_scope::WithProject;
use crate::system::auth::guard::RequireRole;
use crate::system::users::api as users_api;

#[component]
pub fn ProjectDetailsPage() -> impl IntoView {
    view! {
        <PageFrame page_id="a001_project--detail" category=PAGE_CAT_DETAIL>
            <WithProject render=|project_id| view! { <ProjectDetails project_id=project_id /> } />
        </PageFrame>
    }
}

#[component]
fn ProjectDetails(project_id: String) -> impl IntoView {
    let (project, set_project) = signal(None::<Project>);
    let (error, set_error) = signal(None::<String>);
    let (version, set_version) = signal(0u32);
    let status = RwSignal::new(String::new());
    let project_id = StoredValue::new(project_id);

    Effect::new(move |_| {
        let id = project_id.get_value();
        spawn_local(async move {
            match api::fetch_project(&id).await {
                Ok(p) => {
                    status.set(p.status.code().to_string());
                    set_project.set(Some(p));
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    let apply = move |updated: Result<Project, String>| match updated {
        Ok(p) => {
            set_error.set(None);
            set_project.set(Some(p));
            set_version.update(|v| *v += 1);
        }
        Err(e) => set_error.set(Some(e)),
    };

    let save_status = move |_| {
        let Some(new_status) = WorkStatus::from_code(&status.get_untracked()) else {
            return;
        };
        let id = project_id.get_value();
        spawn_local(async move {
            apply(api::set_status(&id, new_status).await);
        });
    };

    view! {
        {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}
        {move || match project.get() {
            None => view! { <div class="page__loading"><Spinner /></div> }.into_any(),
            Some(p) => {
                let record_id = p.id.as_string();
                let editor_id = record_id.clone();
                let responsible = p.responsible_id.clone();
                view! {
                    <div class="page__header">
                        <div class="page__header-left">
                            <h1 class="page__title">{p.name.clone()}</h1>
                            <StatusBadge label=p.status.display_name() color=work_status_color(p.status) />
                        </div>
                    </div>

                    <div class="page__content">
                        <div class="detail-grid">
                            <DetailRow label="Description" value=p.description.clone().unwrap_or_else(|| "-".into()) />
                            <DetailRow label="Localisation" value=p.location.clone().unwrap_or_else(|| "-".into()) />
                            <DetailRow label="Budget initial" value=format_money(p.initial_budget) />
                            <DetailRow label="Coût actuel" value=format_money(p.current_cost) />
                            <DetailRow label="Budget consommé" value=format_percent(p.budget_used_percent()) />
                            <DetailRow label="Avancement" value=format_percent(p.progress) />
                            <DetailRow label="Date de début" value=format_day(p.start_date) />
                            <DetailRow label="Fin prévue" value=format_day(p.planned_end_date) />
                            <DetailRow label="Fin réelle" value=format_optional_day(p.actual_end_date) />
                            <DetailRow label="Seuil d'alerte coût" value=format_percent(p.cost_alert_threshold) />
                            <DetailRow label="Seuil d'alerte délai" value=format_percent(p.delay_alert_threshold) />
                        </div>

                        <div class="section">
                            <h3 class="section__title">"Statut du projet"</h3>
                            <Flex gap=FlexGap::Small>
                                <Select value=status>
                                    {WorkStatus::all()
                                        .into_iter()
                                        .map(|s| view! { <option value=s.code()>{s.display_name()}</option> })
                                        .collect_view()}
                                </Select>
                                <Button appearance=ButtonAppearance::Primary on_click=save_status>
                                    "Enregistrer"
                                </Button>
                            </Flex>
                        </div>

                        <RequireRole roles=&[Role::TopManagement]>
                            <ResponsibleEditor
                                project_id=editor_id.clone()
                                current=responsible.clone()
                                on_saved=move |p| apply(Ok(p))
                            />
                        </RequireRole>

                        <HistoryPanel table="a001_project" record_id=record_id version=version />
                    </div>
                }
                .into_any()
            }
        }}
    }
}

#[component]
fn DetailRow(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="detail-grid__label">{label}</div>
        <div class="detail-grid__value">{value}</div>
    }
}

#[component]
fn ResponsibleEditor(
    project_id: String,
    current: Option<String>,
    #[prop(into)] on_saved: Callback<Project>,
) -> impl IntoView {
    let (users, set_users) = signal(Vec::<UserInfo>::new());
    let selected = RwSignal::new(current.unwrap_or_default());
    let project_id = StoredValue::new(project_id);

    Effect::new(move |_| {
        spawn_local(async move {
            match users_api::fetch_users().await {
                Ok(list) => set_users.set(list),
                Err(e) => log::warn!("Unable to load users: {}", e),
            }
        });
    });

    let save = move |_| {
        let responsible = Some(selected.get_untracked()).filter(|s| !s.is_empty());
        let id = project_id.get_value();
        spawn_local(async move {
            match api::set_responsible(&id, responsible).await {
                Ok(project) => on_saved.run(project),
                Err(e) => log::error!("Unable to change responsible: {}", e),
            }
        });
    };

    view! {
        <div class="section">
            <h3 class="section__title">"Responsable"</h3>
            <Flex gap=FlexGap::Small>
                <Select value=selected>
                    <option value="">"-- Aucun --"</option>
                    {move || {
                        users
                            .get()
                            .into_iter()
                            .map(|u| view! { <option value=u.id.clone()>{u.full_name()}</option> })
                            .collect_view()
                    }}
                </Select>
                <Button appearance=ButtonAppearance::Primary on_click=save>"Affecter"</Button>
            </Flex>
        </div>
    }
}
