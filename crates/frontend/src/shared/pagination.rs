use leptos::prelude::*;

use crate::shared::icons::icon;

/// Number of pages needed for `total` items, at least one
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Page navigation for server-side paging; pages are numbered from 1
#[component]
pub fn PaginationControls(
    #[prop(into)] page: Signal<u64>,
    #[prop(into)] total: Signal<u64>,
    #[prop(into)] page_size: Signal<u64>,
    on_page_change: Callback<u64>,
    on_page_size_change: Callback<u64>,
) -> impl IntoView {
    let pages = move || total_pages(total.get(), page_size.get());

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(1)
                disabled=move || page.get() <= 1
                title="Première page"
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(page.get().saturating_sub(1).max(1))
                disabled=move || page.get() <= 1
                title="Page précédente"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || format!("{} / {} ({})", page.get(), pages(), total.get())}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    if page.get() < pages() {
                        on_page_change.run(page.get() + 1);
                    }
                }
                disabled=move || page.get() >= pages()
                title="Page suivante"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(pages())
                disabled=move || page.get() >= pages()
                title="Dernière page"
            >
                {icon("chevrons-right")}
            </button>
            <select
                class="page-size-select"
                on:change=move |ev| {
                    if let Ok(size) = event_target_value(&ev).parse() {
                        on_page_size_change.run(size);
                    }
                }
                prop:value=move || page_size.get().to_string()
            >
                {[10u64, 20, 50, 100]
                    .into_iter()
                    .map(|size| view! { <option value=size.to_string()>{size.to_string()}</option> })
                    .collect_view()}
            </select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 20), 5);
        assert_eq!(total_pages(5, 0), 1);
    }
}
