//! Отчёты с площадки по выбранному проекту.
//!
//! Руководство и эксперты рассматривают все отчёты; инженер видит только
//! загруженные им самим и может добавлять новые.

use contracts::domain::a005_report::aggregate::{Report, ReportFilter, ReportReview};
use contracts::domain::common::AggregateId;
use contracts::enums::ReportStatus;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{
    Button, ButtonAppearance, ButtonSize, Flex, FlexGap, Input, Select, SelectSize, Spinner, Table,
    TableBody, TableCell, TableCellLayout, TableHeader, TableHeaderCell, TableRow,
};

use super::upload::UploadReportForm;
use crate::domain::a005_report::api;
use crate::shared::format::format_timestamp;
use crate::shared::indicators::{report_status_color, StatusBadge};
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::shared::project_scope::WithProject;
use crate::system::auth::context::use_session;

pub fn report_filter(project_id: &str, status: &str, own_uploads_of: Option<&str>) -> ReportFilter {
    ReportFilter {
        project_id: Some(project_id.to_string()),
        status: ReportStatus::from_code(status),
        imported_by: own_uploads_of.map(str::to_string),
    }
}

#[component]
pub fn ReportsPage(ingenieur: bool) -> impl IntoView {
    view! {
        <PageFrame page_id="a005_report--list" category=PAGE_CAT_LIST>
            <WithProject render=move |project_id| view! { <ReportList project_id=project_id ingenieur=ingenieur /> } />
        </PageFrame>
    }
}

#[component]
fn ReportList(project_id: String, ingenieur: bool) -> impl IntoView {
    let session = use_session();
    let (reports, set_reports) = signal(Vec::<Report>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);
    let status = RwSignal::new(String::new());
    let show_upload = RwSignal::new(false);
    let project_id = StoredValue::new(project_id);

    let load = move || {
        let own = if ingenieur {
            session.session.with_untracked(|s| s.as_ref().map(|s| s.id.clone()))
        } else {
            None
        };
        let filter = report_filter(
            &project_id.get_value(),
            &status.get_untracked(),
            own.as_deref(),
        );
        spawn_local(async move {
            set_loading.set(true);
            match api::fetch_reports(&filter).await {
                Ok(list) => {
                    set_error.set(None);
                    set_reports.set(list);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        status.track();
        load();
    });

    let review = move |id: String, decision: ReportStatus, comments: String| {
        let body = ReportReview {
            status: decision,
            comments: Some(comments).filter(|c| !c.trim().is_empty()),
        };
        spawn_local(async move {
            match api::review(&id, &body).await {
                Ok(updated) => set_reports.update(|list| {
                    if let Some(r) = list.iter_mut().find(|r| r.id == updated.id) {
                        *r = updated;
                    }
                }),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page__header">
            <div class="page__header-left">
                <h1 class="page__title">{if ingenieur { "Mes rapports" } else { "Rapports" }}</h1>
            </div>
            <div class="page__header-right">
                <Select value=status size=SelectSize::Small>
                    <option value="">"Tous"</option>
                    {ReportStatus::all()
                        .into_iter()
                        .map(|s| view! { <option value=s.code()>{s.display_name()}</option> })
                        .collect_view()}
                </Select>
                <Show when=move || ingenieur>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| show_upload.update(|v| *v = !*v)
                    >
                        "Importer un rapport"
                    </Button>
                </Show>
            </div>
        </div>

        <div class="page__content">
            <Show when=move || show_upload.get()>
                <UploadReportForm
                    project_id=project_id.get_value()
                    on_uploaded=move || {
                        show_upload.set(false);
                        load();
                    }
                />
            </Show>

            {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}

            <Show
                when=move || !loading.get()
                fallback=|| view! { <div class="page__loading"><Spinner /></div> }
            >
                <Show
                    when=move || !reports.with(|r| r.is_empty())
                    fallback=|| view! { <div class="page__empty">"Aucun rapport"</div> }
                >
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell>"Fichier"</TableHeaderCell>
                                <TableHeaderCell>"Type"</TableHeaderCell>
                                <TableHeaderCell>"Importé le"</TableHeaderCell>
                                <TableHeaderCell>"Statut"</TableHeaderCell>
                                <TableHeaderCell>"Commentaires"</TableHeaderCell>
                                <Show when=move || !ingenieur>
                                    <TableHeaderCell>"Décision"</TableHeaderCell>
                                </Show>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {move || {
                                reports
                                    .get()
                                    .into_iter()
                                    .map(|r| view! { <ReportRow report=r reviewer=!ingenieur on_review=review /> })
                                    .collect_view()
                            }}
                        </TableBody>
                    </Table>
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn ReportRow<F>(report: Report, reviewer: bool, on_review: F) -> impl IntoView
where
    F: Fn(String, ReportStatus, String) + Copy + Send + Sync + 'static,
{
    let id = StoredValue::new(report.id.as_string());
    let comment = RwSignal::new(String::new());
    let pending = report.status == ReportStatus::Pending;

    let decide = move |decision: ReportStatus| on_review(id.get_value(), decision, comment.get_untracked());

    view! {
        <TableRow>
            <TableCell><TableCellLayout truncate=true>{report.file_name.clone()}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{report.report_type.clone()}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{format_timestamp(&report.metadata.created_at)}</TableCellLayout></TableCell>
            <TableCell>
                <StatusBadge label=report.status.display_name() color=report_status_color(report.status) />
            </TableCell>
            <TableCell><TableCellLayout>{report.comments.clone().unwrap_or_default()}</TableCellLayout></TableCell>
            <Show when=move || reviewer>
                <TableCell>
                    <Show when=move || pending fallback=|| view! { <span>"-"</span> }>
                        <Flex gap=FlexGap::Small>
                            <Input value=comment placeholder="Commentaire" />
                            <Button
                                size=ButtonSize::Small
                                appearance=ButtonAppearance::Primary
                                on_click=move |_| decide(ReportStatus::Processed)
                            >
                                "Traiter"
                            </Button>
                            <Button size=ButtonSize::Small on_click=move |_| decide(ReportStatus::Rejected)>
                                "Rejeter"
                            </Button>
                        </Flex>
                    </Show>
                </TableCell>
            </Show>
        </TableRow>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engineer_filter_restricts_to_own_uploads() {
        let filter = report_filter("p1", "", Some("u7"));
        assert_eq!(filter.imported_by.as_deref(), Some("u7"));
        assert_eq!(filter.status, None);
    }

    #[test]
    fn test_reviewer_filter_keeps_all_uploads() {
        let filter = report_filter("p1", "A_TRAITER", None);
        assert_eq!(filter.project_id.as_deref(), Some("p1"));
        assert_eq!(filter.imported_by, None);
        assert_eq!(filter.status, Some(ReportStatus::Pending));
    }
}
