pub mod global_context;
pub mod left;
pub mod top_header;

use leptos::prelude::*;
use top_header::TopHeader;

/// Application shell.
///
/// ```text
/// +------------------------------------------+
/// |              TopHeader                   |
/// +------------------------------------------+
/// |  Sidebar  |           Content            |
/// +------------------------------------------+
/// ```
///
/// Without chrome only the content is rendered.
#[component]
pub fn Shell(show_chrome: bool, children: Children) -> impl IntoView {
    if !show_chrome {
        return view! {
            <div class="app-bare">
                {children()}
            </div>
        }
        .into_any();
    }

    view! {
        <div class="app-layout">
            <TopHeader />

            <div class="app-body">
                <left::Left>
                    <left::Sidebar />
                </left::Left>

                <div class="app-main">
                    {children()}
                </div>
            </div>
        </div>
    }
    .into_any()
}
