//! Проблемы выбранного проекта: фильтры, статистика, постраничный вывод

use contracts::domain::a006_problem::aggregate::{Problem, ProblemFilter, ProblemStats, DEFAULT_PAGE_SIZE};
use contracts::domain::common::AggregateId;
use contracts::enums::{ProblemStatus, Severity};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{
    Select, SelectSize, Spinner, Table, TableBody, TableCell, TableCellLayout, TableHeader,
    TableHeaderCell, TableRow,
};

use crate::domain::a006_problem::api;
use crate::shared::format::{format_percent, format_timestamp};
use crate::shared::indicators::{problem_status_color, severity_color, StatusBadge};
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::shared::pagination::PaginationControls;
use crate::shared::project_scope::WithProject;

/// Фильтр запроса из значений списков; пустое значение означает «любой»
pub fn build_filter(project_id: &str, status: &str, severity: &str, page: u64, page_size: u64) -> ProblemFilter {
    ProblemFilter {
        project_id: Some(project_id.to_string()),
        status: ProblemStatus::from_code(status),
        severity: Severity::from_code(severity),
        page: Some(page),
        page_size: Some(page_size),
        ..Default::default()
    }
}

#[component]
pub fn ProblemsPage() -> impl IntoView {
    view! {
        <PageFrame page_id="a006_problem--list" category=PAGE_CAT_LIST>
            <WithProject render=|project_id| view! { <ProblemList project_id=project_id /> } />
        </PageFrame>
    }
}

#[component]
fn ProblemList(project_id: String) -> impl IntoView {
    let (problems, set_problems) = signal(Vec::<Problem>::new());
    let (stats, set_stats) = signal(None::<ProblemStats>);
    let (total, set_total) = signal(0u64);
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);
    let page = RwSignal::new(1u64);
    let page_size = RwSignal::new(DEFAULT_PAGE_SIZE);
    let status = RwSignal::new(String::new());
    let severity = RwSignal::new(String::new());
    let project_id = StoredValue::new(project_id);

    let load = move || {
        let filter = build_filter(
            &project_id.get_value(),
            &status.get_untracked(),
            &severity.get_untracked(),
            page.get_untracked(),
            page_size.get_untracked(),
        );
        spawn_local(async move {
            set_loading.set(true);
            match api::fetch_problems(&filter).await {
                Ok(result) => {
                    set_error.set(None);
                    set_total.set(result.total);
                    set_problems.set(result.items);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);

            let stats_filter = ProblemFilter {
                project_id: filter.project_id.clone(),
                ..Default::default()
            };
            match api::fetch_statistics(&stats_filter).await {
                Ok(s) => set_stats.set(Some(s)),
                Err(e) => log::warn!("Unable to load problem statistics: {}", e),
            }
        });
    };

    // при смене фильтров возвращаемся на первую страницу
    Effect::new(move |_| {
        status.track();
        severity.track();
        page.set(1);
        load();
    });

    let change_status = move |id: String, new_status: ProblemStatus| {
        spawn_local(async move {
            match api::set_status(&id, new_status).await {
                Ok(updated) => {
                    set_problems.update(|list| {
                        if let Some(p) = list.iter_mut().find(|p| p.id == updated.id) {
                            *p = updated;
                        }
                    });
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page__header">
            <div class="page__header-left">
                <h1 class="page__title">"Problèmes"</h1>
            </div>
            <div class="page__header-right">
                <Select value=status size=SelectSize::Small>
                    <option value="">"Tous les statuts"</option>
                    {ProblemStatus::all()
                        .into_iter()
                        .map(|s| view! { <option value=s.code()>{s.display_name()}</option> })
                        .collect_view()}
                </Select>
                <Select value=severity size=SelectSize::Small>
                    <option value="">"Toutes les gravités"</option>
                    {Severity::all()
                        .into_iter()
                        .map(|s| view! { <option value=s.code()>{s.display_name()}</option> })
                        .collect_view()}
                </Select>
            </div>
        </div>

        <div class="page__content">
            {move || stats.get().map(|s| {
                let open = s.by_status.get(ProblemStatus::Open.code()).copied().unwrap_or(0);
                let critical = s.by_severity.get(Severity::Critical.code()).copied().unwrap_or(0);
                view! {
                    <div class="kpi-row">
                        <div class="kpi"><span class="kpi__value">{s.total}</span><span class="kpi__label">"Total"</span></div>
                        <div class="kpi"><span class="kpi__value">{open}</span><span class="kpi__label">"Ouverts"</span></div>
                        <div class="kpi"><span class="kpi__value">{critical}</span><span class="kpi__label">"Critiques"</span></div>
                        <div class="kpi">
                            <span class="kpi__value">{format_percent(s.resolution_rate)}</span>
                            <span class="kpi__label">"Taux de résolution"</span>
                        </div>
                    </div>
                }
            })}

            {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}

            <PaginationControls
                page=page
                total=total
                page_size=page_size
                on_page_change=Callback::new(move |p| {
                    page.set(p);
                    load();
                })
                on_page_size_change=Callback::new(move |size| {
                    page_size.set(size);
                    page.set(1);
                    load();
                })
            />

            <Show
                when=move || !loading.get()
                fallback=|| view! { <div class="page__loading"><Spinner /></div> }
            >
                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"Titre"</TableHeaderCell>
                            <TableHeaderCell>"Gravité"</TableHeaderCell>
                            <TableHeaderCell>"Statut"</TableHeaderCell>
                            <TableHeaderCell>"Signalé le"</TableHeaderCell>
                            <TableHeaderCell>"Changer le statut"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || {
                            problems
                                .get()
                                .into_iter()
                                .map(|p| view! { <ProblemRow problem=p on_status=change_status /> })
                                .collect_view()
                        }}
                    </TableBody>
                </Table>
            </Show>
        </div>
    }
}

#[component]
fn ProblemRow<F>(problem: Problem, on_status: F) -> impl IntoView
where
    F: Fn(String, ProblemStatus) + Copy + Send + Sync + 'static,
{
    let id = problem.id.as_string();
    let selected = RwSignal::new(problem.status.code().to_string());

    Effect::new(move |previous: Option<String>| {
        let current = selected.get();
        if let Some(previous) = previous {
            if previous != current {
                if let Some(status) = ProblemStatus::from_code(&current) {
                    on_status(id.clone(), status);
                }
            }
        }
        current
    });

    view! {
        <TableRow>
            <TableCell>
                <TableCellLayout truncate=true>
                    <span title=problem.description.clone()>{problem.title.clone()}</span>
                </TableCellLayout>
            </TableCell>
            <TableCell>
                <StatusBadge label=problem.severity.display_name() color=severity_color(problem.severity) />
            </TableCell>
            <TableCell>
                <StatusBadge label=problem.status.display_name() color=problem_status_color(problem.status) />
            </TableCell>
            <TableCell>
                <TableCellLayout>{format_timestamp(&problem.metadata.created_at)}</TableCellLayout>
            </TableCell>
            <TableCell>
                <Select value=selected size=SelectSize::Small>
                    {ProblemStatus::all()
                        .into_iter()
                        .map(|s| view! { <option value=s.code()>{s.display_name()}</option> })
                        .collect_view()}
                </Select>
            </TableCell>
        </TableRow>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_maps_codes() {
        let filter = build_filter("p1", "EN_COURS", "", 3, 20);
        assert_eq!(filter.project_id.as_deref(), Some("p1"));
        assert_eq!(filter.status, Some(ProblemStatus::InProgress));
        assert_eq!(filter.severity, None);
        assert_eq!(filter.paging(), (3, 20));
    }

    #[test]
    fn test_build_filter_ignores_unknown_codes() {
        let filter = build_filter("p1", "bogus", "CRITIQUE", 1, 10);
        assert_eq!(filter.status, None);
        assert_eq!(filter.severity, Some(Severity::Critical));
    }
}
