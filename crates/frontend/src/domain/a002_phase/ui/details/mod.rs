//! Карточка фазы: светофор показателей, операции и заведённые проблемы

use contracts::dashboards::d401_project::dto::{OperationDetail, PhaseDetail};
use contracts::domain::a006_problem::aggregate::EntityKind;
use contracts::domain::common::AggregateId;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use thaw::{
    Spinner, Table, TableBody, TableCell, TableCellLayout, TableHeader, TableHeaderCell, TableRow,
};

use crate::domain::a002_phase::api;
use crate::domain::a006_problem::ui::entity::EntityProblems;
use crate::routes::table::operation_path;
use crate::shared::format::{format_day, format_money};
use crate::shared::indicators::{
    work_status_color, MetricsPanel, ProgressBar, StatusBadge, StatusDot,
};
use crate::shared::page_frame::{PageFrame, PAGE_CAT_DETAIL};

#[component]
pub fn PhaseDetailPage(phase_id: String) -> impl IntoView {
    let (detail, set_detail) = signal(None::<PhaseDetail>);
    let (error, set_error) = signal(None::<String>);
    let phase_id = StoredValue::new(phase_id);

    Effect::new(move |_| {
        let id = phase_id.get_value();
        spawn_local(async move {
            match api::fetch_phase_detail(&id).await {
                Ok(d) => set_detail.set(Some(d)),
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    view! {
        <PageFrame page_id="a002_phase--detail" category=PAGE_CAT_DETAIL>
            {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}
            {move || match detail.get() {
                None => view! { <div class="page__loading"><Spinner /></div> }.into_any(),
                Some(d) => {
                    let phase = d.phase;
                    view! {
                        <div class="page__header">
                            <div class="page__header-left">
                                <h1 class="page__title">{format!("Phase {}: {}", phase.order, phase.name)}</h1>
                                <StatusBadge label=phase.status.display_name() color=work_status_color(phase.status) />
                            </div>
                        </div>
                        <div class="page__content">
                            <p class="page__description">{phase.description.clone().unwrap_or_default()}</p>
                            <div class="detail-grid">
                                <div class="detail-grid__label">"Période prévue"</div>
                                <div class="detail-grid__value">
                                    {format!("{} → {}", format_day(phase.planned_start), format_day(phase.planned_end))}
                                </div>
                                <div class="detail-grid__label">"Budget alloué"</div>
                                <div class="detail-grid__value">{format_money(phase.allocated_budget)}</div>
                            </div>
                            <MetricsPanel metrics=d.metrics />
                            <OperationsTable operations=d.operations />
                            <EntityProblems
                                kind=EntityKind::Phase
                                entity_id=phase.id.as_string()
                                project_id=phase.project_id.as_string()
                            />
                        </div>
                    }
                    .into_any()
                }
            }}
        </PageFrame>
    }
}

#[component]
fn OperationsTable(operations: Vec<OperationDetail>) -> impl IntoView {
    let navigate = use_navigate();

    view! {
        <div class="section">
            <h3 class="section__title">"Opérations"</h3>
            <Table>
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell>"Opération"</TableHeaderCell>
                        <TableHeaderCell>"Type"</TableHeaderCell>
                        <TableHeaderCell>"Délai"</TableHeaderCell>
                        <TableHeaderCell>"Coût"</TableHeaderCell>
                        <TableHeaderCell>"Seuil"</TableHeaderCell>
                        <TableHeaderCell>"Avancement"</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {operations
                        .into_iter()
                        .map(|op| {
                            let navigate = navigate.clone();
                            let path = operation_path(&op.operation.id.as_string());
                            view! {
                                <TableRow>
                                    <TableCell>
                                        <TableCellLayout>
                                            <a
                                                href="#"
                                                on:click=move |e| {
                                                    e.prevent_default();
                                                    navigate(&path, Default::default());
                                                }
                                            >
                                                {op.operation.name}
                                            </a>
                                        </TableCellLayout>
                                    </TableCell>
                                    <TableCell><TableCellLayout>{op.operation.operation_type}</TableCellLayout></TableCell>
                                    <TableCell><StatusDot color=op.metrics.time_color /></TableCell>
                                    <TableCell><StatusDot color=op.metrics.cost_color /></TableCell>
                                    <TableCell>
                                        {match op.threshold_color {
                                            Some(color) => view! { <StatusDot color=color /> }.into_any(),
                                            None => view! { <span>"-"</span> }.into_any(),
                                        }}
                                    </TableCell>
                                    <TableCell>
                                        <ProgressBar value=op.operation.progress color=op.metrics.progress_color />
                                    </TableCell>
                                </TableRow>
                            }
                        })
                        .collect_view()}
                </TableBody>
            </Table>
        </div>
    }
}
