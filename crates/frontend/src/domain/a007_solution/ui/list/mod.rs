use contracts::domain::a007_solution::aggregate::{Solution, SolutionFilter, SolutionStats};
use contracts::domain::common::AggregateId;
use contracts::enums::SolutionStatus;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{
    Button, ButtonAppearance, ButtonSize, Flex, FlexGap, Input, Select, SelectSize, Spinner, Table,
    TableBody, TableCell, TableCellLayout, TableHeader, TableHeaderCell, TableRow,
};

use crate::domain::a007_solution::api;
use crate::shared::format::{format_money, format_number, format_percent};
use crate::shared::indicators::{solution_status_color, StatusBadge};
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::shared::project_scope::WithProject;

/// Действия руководителя над решением в данном статусе
pub fn available_actions(status: SolutionStatus) -> Vec<SolutionStatus> {
    match status {
        SolutionStatus::Proposed => vec![SolutionStatus::Validated, SolutionStatus::Rejected],
        SolutionStatus::Validated => vec![SolutionStatus::Implemented, SolutionStatus::Rejected],
        SolutionStatus::Rejected => vec![SolutionStatus::Proposed],
        SolutionStatus::Implemented => vec![],
    }
}

fn action_label(target: SolutionStatus) -> &'static str {
    match target {
        SolutionStatus::Validated => "Valider",
        SolutionStatus::Rejected => "Rejeter",
        SolutionStatus::Implemented => "Mettre en œuvre",
        SolutionStatus::Proposed => "Rouvrir",
    }
}

pub fn solution_filter(status: &str, search: &str) -> SolutionFilter {
    SolutionFilter {
        status: SolutionStatus::from_code(status),
        search: Some(search.trim().to_string()).filter(|s| !s.is_empty()),
        ..Default::default()
    }
}

#[component]
pub fn SolutionsPage(manager: bool) -> impl IntoView {
    view! {
        <PageFrame page_id="a007_solution--list" category=PAGE_CAT_LIST>
            <WithProject render=move |project_id| view! { <SolutionList project_id=project_id manager=manager /> } />
        </PageFrame>
    }
}

#[component]
fn SolutionList(project_id: String, manager: bool) -> impl IntoView {
    let (solutions, set_solutions) = signal(Vec::<Solution>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);
    let status = RwSignal::new(String::new());
    let search = RwSignal::new(String::new());
    let project_id = StoredValue::new(project_id);

    let load = move || {
        let id = project_id.get_value();
        spawn_local(async move {
            set_loading.set(true);
            match api::fetch_for_project(&id).await {
                Ok(list) => {
                    set_error.set(None);
                    set_solutions.set(list);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| load());

    let stats = Memo::new(move |_| solutions.with(|list| SolutionStats::compute(list)));

    let visible = move || {
        let filter = solution_filter(&status.get(), &search.get());
        solutions.with(|list| list.iter().filter(|s| filter.matches(s)).cloned().collect::<Vec<_>>())
    };

    let decide = move |solution: Solution, target: SolutionStatus| {
        spawn_local(async move {
            let result = if target == SolutionStatus::Implemented {
                api::implement(&solution.id.as_string()).await
            } else {
                api::set_status(&solution, target).await
            };
            match result {
                Ok(updated) => set_solutions.update(|list| {
                    if let Some(s) = list.iter_mut().find(|s| s.id == updated.id) {
                        *s = updated;
                    }
                }),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page__header">
            <div class="page__header-left">
                <h1 class="page__title">"Solutions"</h1>
            </div>
            <div class="page__header-right">
                <Input value=search placeholder="Rechercher..." />
                <Select value=status size=SelectSize::Small>
                    <option value="">"Tous les statuts"</option>
                    {SolutionStatus::all()
                        .into_iter()
                        .map(|s| view! { <option value=s.code()>{s.display_name()}</option> })
                        .collect_view()}
                </Select>
            </div>
        </div>

        <div class="page__content">
            {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}

            <div class="kpi-row">
                <div class="kpi-card">
                    <span class="kpi-card__label">"Solutions"</span>
                    <span class="kpi-card__value">{move || stats.get().total}</span>
                </div>
                <div class="kpi-card">
                    <span class="kpi-card__label">"Taux de validation"</span>
                    <span class="kpi-card__value">{move || format_percent(stats.get().validation_rate)}</span>
                </div>
                <div class="kpi-card">
                    <span class="kpi-card__label">"Taux de mise en œuvre"</span>
                    <span class="kpi-card__value">{move || format_percent(stats.get().implementation_rate)}</span>
                </div>
                <div class="kpi-card">
                    <span class="kpi-card__label">"Coût moyen"</span>
                    <span class="kpi-card__value">
                        {move || stats.get().cost.avg.map(format_money).unwrap_or_else(|| "-".to_string())}
                    </span>
                </div>
                <div class="kpi-card">
                    <span class="kpi-card__label">"Délai moyen"</span>
                    <span class="kpi-card__value">
                        {move || {
                            stats
                                .get()
                                .delay_days
                                .avg
                                .map(|d| format!("{} j", format_number(d, 1)))
                                .unwrap_or_else(|| "-".to_string())
                        }}
                    </span>
                </div>
            </div>

            <Show
                when=move || !loading.get()
                fallback=|| view! { <div class="page__loading"><Spinner /></div> }
            >
                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"Description"</TableHeaderCell>
                            <TableHeaderCell>"Type"</TableHeaderCell>
                            <TableHeaderCell>"Coût estimé"</TableHeaderCell>
                            <TableHeaderCell>"Délai (j)"</TableHeaderCell>
                            <TableHeaderCell>"Statut"</TableHeaderCell>
                            <Show when=move || manager>
                                <TableHeaderCell>"Actions"</TableHeaderCell>
                            </Show>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || {
                            visible()
                                .into_iter()
                                .map(|s| {
                                    let actions = StoredValue::new(if manager { available_actions(s.status) } else { vec![] });
                                    let row = StoredValue::new(s.clone());
                                    let description = s.description.clone();
                                    let solution_type = s.solution_type.clone();
                                    view! {
                                        <TableRow>
                                            <TableCell><TableCellLayout truncate=true>{description}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout>{solution_type}</TableCellLayout></TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {s.estimated_cost.map(format_money).unwrap_or_else(|| "-".to_string())}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {s.estimated_delay_days.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <StatusBadge label=s.status.display_name() color=solution_status_color(s.status) />
                                            </TableCell>
                                            <Show when=move || manager>
                                                <TableCell>
                                                    <Flex gap=FlexGap::Small>
                                                        {actions
                                                            .get_value()
                                                            .iter()
                                                            .map(|target| {
                                                                let target = *target;
                                                                let row = row.get_value();
                                                                let appearance = if target == SolutionStatus::Rejected {
                                                                    ButtonAppearance::Secondary
                                                                } else {
                                                                    ButtonAppearance::Primary
                                                                };
                                                                view! {
                                                                    <Button
                                                                        size=ButtonSize::Small
                                                                        appearance=appearance
                                                                        on_click=move |_| decide(row.clone(), target)
                                                                    >
                                                                        {action_label(target)}
                                                                    </Button>
                                                                }
                                                            })
                                                            .collect_view()}
                                                    </Flex>
                                                </TableCell>
                                            </Show>
                                        </TableRow>
                                    }
                                })
                                .collect_view()
                        }}
                    </TableBody>
                </Table>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_follow_lifecycle() {
        assert_eq!(
            available_actions(SolutionStatus::Proposed),
            vec![SolutionStatus::Validated, SolutionStatus::Rejected]
        );
        assert!(available_actions(SolutionStatus::Validated).contains(&SolutionStatus::Implemented));
        assert!(available_actions(SolutionStatus::Implemented).is_empty());
    }

    #[test]
    fn test_implementation_only_after_validation() {
        for status in SolutionStatus::all() {
            let offers = available_actions(status).contains(&SolutionStatus::Implemented);
            assert_eq!(offers, status == SolutionStatus::Validated, "{}", status);
        }
    }

    #[test]
    fn test_solution_filter_ignores_blank_inputs() {
        let filter = solution_filter("", "  ");
        assert_eq!(filter.status, None);
        assert_eq!(filter.search, None);

        let filter = solution_filter("VALIDEE", " vanne ");
        assert_eq!(filter.status, Some(SolutionStatus::Validated));
        assert_eq!(filter.search.as_deref(), Some("vanne"));
    }
}
