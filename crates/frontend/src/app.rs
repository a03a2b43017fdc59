use std::sync::Arc;

use crate::layout::global_context::AppGlobalContext;
use crate::routes::routes::AppRoutes;
use crate::system::auth::context::provide_session;
use crate::system::auth::storage::BrowserStorage;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Provide the AppGlobalContext store to the whole app via context.
    provide_context(AppGlobalContext::new());

    let session = provide_session(Arc::new(BrowserStorage));
    session.listen_cross_window();
    session.revalidate();

    view! {
        <AppRoutes />
    }
}
