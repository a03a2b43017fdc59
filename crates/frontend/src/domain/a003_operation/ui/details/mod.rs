//! Карточка операции: показатели, обновление прогресса, пороги стоимости

mod thresholds;

use contracts::dashboards::d401_project::dto::OperationDetail;
use contracts::domain::a002_phase::aggregate::validate_progress;
use contracts::domain::a006_problem::aggregate::EntityKind;
use contracts::domain::common::AggregateId;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Button, ButtonAppearance, Flex, FlexGap, Input, InputType, Spinner};

use self::thresholds::ThresholdEditor;
use crate::domain::a003_operation::api;
use crate::domain::a006_problem::ui::entity::EntityProblems;
use crate::domain::a010_history::ui::HistoryPanel;
use crate::routes::table::phase_path;
use crate::shared::format::{format_day, format_optional_day};
use crate::shared::indicators::{work_status_color, MetricsPanel, StatusBadge};
use crate::shared::page_frame::{PageFrame, PAGE_CAT_DETAIL};
use crate::system::auth::context::use_session;

/// Прогресс, введённый пользователем, в процентах
pub fn parse_progress(raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| "Progression invalide".to_string())?;
    validate_progress(value)?;
    Ok(value)
}

#[component]
pub fn OperationDetailPage(operation_id: String) -> impl IntoView {
    let session = use_session();
    let (detail, set_detail) = signal(None::<OperationDetail>);
    let (error, set_error) = signal(None::<String>);
    let (version, set_version) = signal(0u32);
    let progress = RwSignal::new(String::new());
    let operation_id = StoredValue::new(operation_id);

    let load = move || {
        let id = operation_id.get_value();
        spawn_local(async move {
            match api::fetch_operation_detail(&id).await {
                Ok(d) => {
                    progress.set(format!("{}", d.operation.progress));
                    set_detail.set(Some(d));
                    set_version.update(|v| *v += 1);
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    Effect::new(move |_| load());

    let save_progress = move |_| {
        let value = match parse_progress(&progress.get_untracked()) {
            Ok(v) => v,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        let id = operation_id.get_value();
        spawn_local(async move {
            match api::set_progress(&id, value).await {
                Ok(_) => {
                    set_error.set(None);
                    load();
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <PageFrame page_id="a003_operation--detail" category=PAGE_CAT_DETAIL>
            {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}
            {move || match detail.get() {
                None => view! { <div class="page__loading"><Spinner /></div> }.into_any(),
                Some(d) => {
                    let op = d.operation;
                    let record_id = op.id.as_string();
                    view! {
                        <div class="page__header">
                            <div class="page__header-left">
                                <a class="page__back" href=phase_path(&op.phase_id.as_string())>"← Phase"</a>
                                <h1 class="page__title">{op.name.clone()}</h1>
                                <StatusBadge label=op.status.display_name() color=work_status_color(op.status) />
                            </div>
                        </div>
                        <div class="page__content">
                            <div class="detail-grid">
                                <div class="detail-grid__label">"Type"</div>
                                <div class="detail-grid__value">{op.operation_type.clone()}</div>
                                <div class="detail-grid__label">"Période prévue"</div>
                                <div class="detail-grid__value">
                                    {format!("{} → {}", format_day(op.planned_start), format_day(op.planned_end))}
                                </div>
                                <div class="detail-grid__label">"Début réel"</div>
                                <div class="detail-grid__value">{format_optional_day(op.actual_start)}</div>
                                <div class="detail-grid__label">"Fin réelle"</div>
                                <div class="detail-grid__value">{format_optional_day(op.actual_end)}</div>
                            </div>

                            <MetricsPanel metrics=d.metrics />

                            <div class="section">
                                <h3 class="section__title">"Avancement"</h3>
                                <Flex gap=FlexGap::Small>
                                    <Input value=progress input_type=InputType::Number />
                                    <Button appearance=ButtonAppearance::Primary on_click=save_progress>
                                        "Mettre à jour"
                                    </Button>
                                </Flex>
                            </div>

                            <ThresholdEditor
                                operation_id=record_id.clone()
                                thresholds=d.thresholds
                                color=d.threshold_color
                                on_saved=move || load()
                            />

                            <EntityProblems
                                kind=EntityKind::Operation
                                entity_id=record_id.clone()
                                project_id=session.selected_project.get_untracked().unwrap_or_default()
                            />

                            <HistoryPanel table="a003_operation" record_id=record_id version=version />
                        </div>
                    }
                    .into_any()
                }
            }}
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress() {
        assert_eq!(parse_progress(" 42,5 "), Ok(42.5));
        assert_eq!(parse_progress("100"), Ok(100.0));
        assert!(parse_progress("101").is_err());
        assert!(parse_progress("-1").is_err());
        assert!(parse_progress("abc").is_err());
    }
}
