//! Дашборд портфеля.
//!
//! Верхняя часть сводит все проекты, нижняя показывает проект, выбранный
//! в сессии: освоение бюджета, задержку, фазы, открытые проблемы и
//! непрочитанные алерты.

use contracts::dashboards::d400_general::dto::GeneralDashboard;
use contracts::dashboards::d401_project::dto::ProjectDashboard;
use contracts::domain::common::AggregateId;
use contracts::shared::status_color::StatusColor;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use thaw::Spinner;

use crate::dashboards::d400_general::api;
use crate::domain::a009_alert::ui::UnreadAlerts;
use crate::routes::table::phase_path;
use crate::shared::format::{format_day, format_money, format_number, format_percent};
use crate::shared::indicators::{
    severity_color, work_status_color, ProgressBar, StatusBadge, StatusDot,
};
use crate::shared::page_frame::{PageFrame, PAGE_CAT_DASHBOARD};
use crate::system::auth::context::use_session;

/// Те же пороги, что у алерта бюджета: предупреждение от порога проекта, критично после 100 %
pub fn budget_color(used_percent: f64, alert_threshold: f64) -> StatusColor {
    if used_percent >= 100.0 {
        StatusColor::Red
    } else if used_percent >= alert_threshold {
        StatusColor::Yellow
    } else {
        StatusColor::Green
    }
}

pub fn delay_label(days_late: i64) -> String {
    match days_late {
        d if d <= 0 => "Dans les délais".to_string(),
        1 => "1 jour de retard".to_string(),
        d => format!("{} jours de retard", d),
    }
}

#[component]
fn Kpi(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="kpi-card">
            <span class="kpi-card__label">{label}</span>
            <span class="kpi-card__value">{value}</span>
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();
    let (general, set_general) = signal(None::<GeneralDashboard>);
    let (project, set_project) = signal(None::<ProjectDashboard>);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);

    Effect::new(move |_| {
        spawn_local(async move {
            match api::fetch_general().await {
                Ok(data) => set_general.set(Some(data)),
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    Effect::new(move |_| {
        let Some(project_id) = session.selected_project.get() else {
            set_project.set(None);
            return;
        };
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_project_dashboard(&project_id).await {
                Ok(data) => set_project.set(Some(data)),
                Err(e) => {
                    log::error!("Failed to load dashboard of project {}: {}", project_id, e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    });

    view! {
        <PageFrame page_id="d400_general--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Tableau de bord"</h1>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}

                {move || general.get().map(|g| view! { <GeneralSummary data=g /> })}

                <Show
                    when=move || !loading.get()
                    fallback=|| view! { <div class="page__loading"><Spinner /></div> }
                >
                    {move || match project.get() {
                        Some(p) => view! { <ProjectSummary data=p /> }.into_any(),
                        None => view! {
                            <div class="page__empty">"Sélectionnez un projet pour voir son tableau de bord"</div>
                        }
                        .into_any(),
                    }}
                </Show>
            </div>
        </PageFrame>
    }
}

#[component]
fn GeneralSummary(data: GeneralDashboard) -> impl IntoView {
    view! {
        <div class="section">
            <h3 class="section__title">"Portefeuille"</h3>
            <div class="kpi-row">
                <Kpi label="Projets" value=data.total_projects.to_string() />
                <Kpi label="Planifiés" value=data.planned.to_string() />
                <Kpi label="En cours" value=data.in_progress.to_string() />
                <Kpi label="Terminés" value=data.finished.to_string() />
                <Kpi label="Suspendus" value=data.suspended.to_string() />
                <Kpi label="En retard" value=data.late_projects.to_string() />
            </div>
            <div class="kpi-row">
                <Kpi label="Budget initial" value=format_money(data.initial_budget_total) />
                <Kpi label="Coût actuel" value=format_money(data.current_cost_total) />
                <Kpi label="Écart budgétaire" value=format_money(data.budget_gap) />
                <Kpi label="Retard moyen" value=format!("{} j", data.average_delay_days) />
                <Kpi label="Avancement moyen" value=format_percent(data.average_progress) />
                <Kpi label="Taux de réussite" value=format_percent(data.success_rate) />
            </div>
        </div>
    }
}

#[component]
fn ProjectSummary(data: ProjectDashboard) -> impl IntoView {
    let navigate = use_navigate();
    let project = data.project;
    let budget = budget_color(data.budget_used_percent, project.cost_alert_threshold);
    let project_id = project.id.as_string();

    view! {
        <div class="section">
            <div class="section__header">
                <h3 class="section__title">{project.name.clone()}</h3>
                <StatusBadge label=project.status.display_name() color=work_status_color(project.status) />
            </div>
            <div class="kpi-row">
                <div class="kpi-card">
                    <span class="kpi-card__label">"Budget consommé"</span>
                    <ProgressBar value=data.budget_used_percent color=budget />
                    <span class="kpi-card__hint">
                        {format!("{} / {}", format_money(project.current_cost), format_money(project.initial_budget))}
                    </span>
                </div>
                <div class="kpi-card">
                    <span class="kpi-card__label">"Délai"</span>
                    <span class="kpi-card__value">{delay_label(data.days_late)}</span>
                    <span class="kpi-card__hint">
                        {format!("Fin prévue {}", format_day(project.planned_end_date))}
                    </span>
                </div>
                <Kpi label="Dépassement de délai" value=format_percent(data.delay_percent) />
                <Kpi label="Avancement" value=format_percent(project.progress) />
                <Kpi label="Alertes critiques" value=data.critical_alerts.to_string() />
            </div>
        </div>

        <div class="section">
            <h3 class="section__title">"Phases"</h3>
            <div class="phase-grid">
                {data
                    .phases
                    .into_iter()
                    .map(|detail| {
                        let navigate = navigate.clone();
                        let path = phase_path(&detail.phase.id.as_string());
                        let m = detail.metrics;
                        view! {
                            <div class="phase-card" on:click=move |_| navigate(&path, Default::default())>
                                <div class="phase-card__header">
                                    <span class="phase-card__title">{detail.phase.name}</span>
                                    <StatusBadge
                                        label=detail.phase.status.display_name()
                                        color=work_status_color(detail.phase.status)
                                    />
                                </div>
                                <ProgressBar value=m.progress color=m.progress_color />
                                <div class="phase-card__dots">
                                    <StatusDot color=m.time_color title="Délai" />
                                    <span>{format!("Délai {}", format_percent(m.time_ratio))}</span>
                                    <StatusDot color=m.cost_color title="Coût" />
                                    <span>{format!("Coût {}", format_percent(m.cost_ratio))}</span>
                                </div>
                                <span class="phase-card__hint">
                                    {format!("{} opération(s)", format_number(detail.operations.len() as f64, 0))}
                                </span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>

        <div class="section">
            <h3 class="section__title">{format!("Problèmes ouverts ({})", data.open_problems.len())}</h3>
            <ul class="problem-list">
                {data
                    .open_problems
                    .into_iter()
                    .map(|p| view! {
                        <li class="problem-list__item">
                            <StatusBadge label=p.severity.display_name() color=severity_color(p.severity) />
                            <span class="problem-list__title">{p.title}</span>
                        </li>
                    })
                    .collect_view()}
            </ul>
        </div>

        <UnreadAlerts project_id=project_id alerts=data.unread_alerts />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_color_bands() {
        assert_eq!(budget_color(10.0, 80.0), StatusColor::Green);
        assert_eq!(budget_color(80.0, 80.0), StatusColor::Yellow);
        assert_eq!(budget_color(99.9, 80.0), StatusColor::Yellow);
        assert_eq!(budget_color(100.0, 80.0), StatusColor::Red);
    }

    #[test]
    fn test_delay_label() {
        assert_eq!(delay_label(-3), "Dans les délais");
        assert_eq!(delay_label(0), "Dans les délais");
        assert_eq!(delay_label(1), "1 jour de retard");
        assert_eq!(delay_label(12), "12 jours de retard");
    }
}
