use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use thaw::{Button, ButtonAppearance};

use crate::routes::table::choose_project_path;
use crate::system::auth::context::use_session;

/// Renders `render(project_id)` for the selected project, or an invitation
/// to pick one first.
#[component]
pub fn WithProject<F, V>(render: F) -> impl IntoView
where
    F: Fn(String) -> V + Send + Sync + 'static,
    V: IntoView + 'static,
{
    let session = use_session();
    let navigate = use_navigate();

    move || match session.selected_project.get() {
        Some(project_id) => render(project_id).into_any(),
        None => {
            let navigate = navigate.clone();
            view! {
                <div class="page__empty">
                    <p>"Aucun projet sélectionné"</p>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| {
                            if let Some(role) = session.role() {
                                navigate(choose_project_path(role), Default::default());
                            }
                        }
                    >
                        "Choisir un projet"
                    </Button>
                </div>
            }
            .into_any()
        }
    }
}
