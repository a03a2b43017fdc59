//! PageFrame: standard root wrapper for every routed page.
//!
//! The root element carries `id="{entity}--{category}"` and
//! `data-page-category`, e.g. `a002_phase--list`.

use leptos::prelude::*;

pub const PAGE_CAT_LIST: &str = "list";
pub const PAGE_CAT_DETAIL: &str = "detail";
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";
pub const PAGE_CAT_SYSTEM: &str = "system";

fn page_class(category: &str) -> &'static str {
    match category {
        PAGE_CAT_DETAIL => "page page--detail",
        PAGE_CAT_DASHBOARD => "page page--dashboard",
        _ => "page",
    }
}

#[component]
pub fn PageFrame(
    /// HTML id in format `{entity}--{category}`
    page_id: &'static str,
    category: &'static str,
    children: Children,
) -> impl IntoView {
    view! {
        <div id=page_id class=page_class(category) data-page-category=category>
            {children()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_class() {
        assert_eq!(page_class(PAGE_CAT_LIST), "page");
        assert_eq!(page_class(PAGE_CAT_DASHBOARD), "page page--dashboard");
        assert_eq!(page_class("unknown"), "page");
    }
}
