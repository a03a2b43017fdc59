//! Фазы выбранного проекта.
//!
//! Вариант для руководства позволяет менять порядок и удалять фазы; в обоих
//! вариантах фаза раскрывается со списком операций.

use contracts::dashboards::d401_project::dto::OperationDetail;
use contracts::domain::a002_phase::aggregate::Phase;
use contracts::domain::common::AggregateId;
use contracts::shared::status_color::progress_color;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use thaw::{Button, ButtonAppearance, ButtonSize, Flex, FlexGap, Spinner};

use crate::domain::a002_phase::api;
use crate::routes::table::{operation_path, phase_path};
use crate::shared::format::{format_day, format_money};
use crate::shared::icons::icon;
use crate::shared::indicators::{work_status_color, ProgressBar, StatusBadge, StatusDot};
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::shared::project_scope::WithProject;

/// Новый порядок id после сдвига фазы `index` на одну позицию вверх или вниз;
/// `None`, если она уже с краю
pub fn move_phase(ids: &[String], index: usize, up: bool) -> Option<Vec<String>> {
    let target = if up {
        index.checked_sub(1)?
    } else {
        index + 1
    };
    if index >= ids.len() || target >= ids.len() {
        return None;
    }
    let mut reordered = ids.to_vec();
    reordered.swap(index, target);
    Some(reordered)
}

#[component]
pub fn PhasesPage(manager: bool) -> impl IntoView {
    view! {
        <PageFrame page_id="a002_phase--list" category=PAGE_CAT_LIST>
            <WithProject render=move |project_id| view! { <PhaseList project_id=project_id manager=manager /> } />
        </PageFrame>
    }
}

#[component]
fn PhaseList(project_id: String, manager: bool) -> impl IntoView {
    let (phases, set_phases) = signal(Vec::<Phase>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);
    let expanded = RwSignal::new(None::<String>);
    let pending_delete = RwSignal::new(None::<Phase>);
    let project_id = StoredValue::new(project_id);

    let load = move || {
        let id = project_id.get_value();
        spawn_local(async move {
            set_loading.set(true);
            match api::fetch_phases(&id).await {
                Ok(list) => {
                    set_error.set(None);
                    set_phases.set(list);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| load());

    let shift = move |index: usize, up: bool| {
        let ids = phases.with_untracked(|list| list.iter().map(|p| p.id.as_string()).collect::<Vec<_>>());
        let Some(reordered) = move_phase(&ids, index, up) else {
            return;
        };
        let id = project_id.get_value();
        spawn_local(async move {
            match api::reorder(&id, reordered).await {
                Ok(list) => set_phases.set(list),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let confirm_delete = move |_| {
        let Some(phase) = pending_delete.get_untracked() else {
            return;
        };
        pending_delete.set(None);
        spawn_local(async move {
            match api::delete_phase(&phase.id.as_string()).await {
                Ok(()) => {
                    log::info!("Phase deleted: {}", phase.name);
                    load();
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page__header">
            <div class="page__header-left">
                <h1 class="page__title">"Phases et opérations"</h1>
            </div>
            <div class="page__header-right">
                <Button on_click=move |_| load()>{icon("refresh")}" Actualiser"</Button>
            </div>
        </div>

        <div class="page__content">
            {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}

            {move || pending_delete.get().map(|phase| view! {
                <div class="confirm-banner">
                    <span>
                        {format!(
                            "Supprimer la phase « {} » ? Toutes ses opérations seront supprimées.",
                            phase.name,
                        )}
                    </span>
                    <Flex gap=FlexGap::Small>
                        <Button appearance=ButtonAppearance::Primary on_click=confirm_delete>"Supprimer"</Button>
                        <Button on_click=move |_| pending_delete.set(None)>"Annuler"</Button>
                    </Flex>
                </div>
            })}

            <Show
                when=move || !loading.get()
                fallback=|| view! { <div class="page__loading"><Spinner /></div> }
            >
                <Show
                    when=move || !phases.with(|p| p.is_empty())
                    fallback=|| view! { <div class="page__empty">"Aucune phase pour ce projet"</div> }
                >
                    <div class="phase-list">
                        {move || {
                            let count = phases.with(|p| p.len());
                            phases
                                .get()
                                .into_iter()
                                .enumerate()
                                .map(|(index, phase)| {
                                    let id = phase.id.as_string();
                                    let toggle_id = id.clone();
                                    let is_open = {
                                        let id = id.clone();
                                        move || expanded.with(|e| e.as_deref() == Some(id.as_str()))
                                    };
                                    let deleted = StoredValue::new(phase.clone());
                                    view! {
                                        <div class="phase-row">
                                            <div class="phase-row__header">
                                                <span
                                                    class="phase-row__toggle"
                                                    on:click=move |_| {
                                                        let id = toggle_id.clone();
                                                        expanded.update(|e| {
                                                            *e = if e.as_deref() == Some(id.as_str()) { None } else { Some(id) };
                                                        });
                                                    }
                                                >
                                                    {icon("chevron-right")}
                                                </span>
                                                <a class="phase-row__name" href=phase_path(&id)>
                                                    {format!("{}. {}", phase.order, phase.name)}
                                                </a>
                                                <StatusBadge label=phase.status.display_name() color=work_status_color(phase.status) />
                                                <span class="phase-row__dates">
                                                    {format!("{} → {}", format_day(phase.planned_start), format_day(phase.planned_end))}
                                                </span>
                                                <span class="phase-row__budget">
                                                    {format!("{} / {}", format_money(phase.current_cost), format_money(phase.allocated_budget))}
                                                </span>
                                                <ProgressBar value=phase.progress color=progress_color(phase.progress) />
                                                <Show when=move || manager>
                                                    <Flex gap=FlexGap::Small>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            disabled=move || index == 0
                                                            on_click=move |_| shift(index, true)
                                                        >
                                                            "▲"
                                                        </Button>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            disabled={move || index + 1 >= count}
                                                            on_click=move |_| shift(index, false)
                                                        >
                                                            "▼"
                                                        </Button>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            on_click={
                                                                let deleted = deleted.clone();
                                                                move |_| pending_delete.set(Some(deleted.get_value()))
                                                            }
                                                        >
                                                            {icon("trash")}
                                                        </Button>
                                                    </Flex>
                                                </Show>
                                            </div>
                                            <Show when=is_open.clone()>
                                                <PhaseOperations phase_id=id.clone() />
                                            </Show>
                                        </div>
                                    }
                                })
                                .collect_view()
                        }}
                    </div>
                </Show>
            </Show>
        </div>
    }
}

/// Операции одной фазы, загружаются при раскрытии строки
#[component]
fn PhaseOperations(phase_id: String) -> impl IntoView {
    let navigate = use_navigate();
    let (operations, set_operations) = signal(None::<Result<Vec<OperationDetail>, String>>);

    Effect::new(move |_| {
        let id = phase_id.clone();
        spawn_local(async move {
            let result = api::fetch_phase_detail(&id).await.map(|d| d.operations);
            set_operations.set(Some(result));
        });
    });

    view! {
        <div class="phase-row__operations">
            {move || match operations.get() {
                None => view! { <Spinner /> }.into_any(),
                Some(Err(e)) => view! { <div class="alert alert--error">{e}</div> }.into_any(),
                Some(Ok(list)) if list.is_empty() => {
                    view! { <div class="page__empty">"Aucune opération"</div> }.into_any()
                }
                Some(Ok(list)) => list
                    .into_iter()
                    .map(|op| {
                        let navigate = navigate.clone();
                        let path = operation_path(&op.operation.id.as_string());
                        view! {
                            <div class="operation-row" on:click=move |_| navigate(&path, Default::default())>
                                <StatusDot color=op.metrics.time_color title="Délai" />
                                <StatusDot color=op.metrics.cost_color title="Coût" />
                                <span class="operation-row__name">{op.operation.name}</span>
                                <span class="operation-row__type">{op.operation.operation_type}</span>
                                <ProgressBar value=op.operation.progress color=op.metrics.progress_color />
                            </div>
                        }
                    })
                    .collect_view()
                    .into_any(),
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn test_move_phase_up_and_down() {
        assert_eq!(move_phase(&ids(), 1, true), Some(vec!["b".into(), "a".into(), "c".into()]));
        assert_eq!(move_phase(&ids(), 1, false), Some(vec!["a".into(), "c".into(), "b".into()]));
    }

    #[test]
    fn test_move_phase_at_the_ends() {
        assert_eq!(move_phase(&ids(), 0, true), None);
        assert_eq!(move_phase(&ids(), 2, false), None);
        assert_eq!(move_phase(&ids(), 5, true), None);
        assert_eq!(move_phase(&[], 0, false), None);
    }
}
