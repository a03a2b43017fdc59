//! Журнал изменений одной записи

use contracts::domain::a010_history::aggregate::ModificationRecord;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Table, TableBody, TableCell, TableCellLayout, TableHeader, TableHeaderCell, TableRow};

use crate::domain::a010_history::api;
use crate::shared::format::format_timestamp;

/// Перезагружается при изменении `version`, владелец увеличивает его после сохранения
#[component]
pub fn HistoryPanel(
    table: &'static str,
    record_id: String,
    #[prop(into)] version: Signal<u32>,
) -> impl IntoView {
    let (records, set_records) = signal(Vec::<ModificationRecord>::new());
    let (error, set_error) = signal(None::<String>);
    let record_id = StoredValue::new(record_id);

    Effect::new(move |_| {
        version.track();
        let id = record_id.get_value();
        spawn_local(async move {
            match api::fetch_history(table, &id).await {
                Ok(list) => {
                    set_error.set(None);
                    set_records.set(list);
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    view! {
        <div class="history-panel">
            <h3 class="section__title">"Historique des modifications"</h3>
            {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}
            <Show
                when=move || !records.with(|r| r.is_empty())
                fallback=|| view! { <div class="page__empty">"Aucune modification enregistrée"</div> }
            >
                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"Date"</TableHeaderCell>
                            <TableHeaderCell>"Champ"</TableHeaderCell>
                            <TableHeaderCell>"Ancienne valeur"</TableHeaderCell>
                            <TableHeaderCell>"Nouvelle valeur"</TableHeaderCell>
                            <TableHeaderCell>"Par"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || {
                            records
                                .get()
                                .into_iter()
                                .map(|r| {
                                    view! {
                                        <TableRow>
                                            <TableCell><TableCellLayout>{format_timestamp(&r.modified_at)}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout>{r.field}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout>{r.old_value.unwrap_or_else(|| "-".into())}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout>{r.new_value.unwrap_or_else(|| "-".into())}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout>{r.modified_by.unwrap_or_else(|| "-".into())}</TableCellLayout></TableCell>
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
