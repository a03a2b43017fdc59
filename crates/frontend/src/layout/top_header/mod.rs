//! TopHeader component - application top bar.
//!
//! Shows the sidebar toggle, the selected project, the signed-in user with a
//! link to the profile and the unread alert counter.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::domain::a001_project::api as project_api;
use crate::domain::a009_alert::api as alert_api;
use crate::layout::global_context::AppGlobalContext;
use crate::routes::table::{choose_project_path, AppRoute};
use crate::shared::icons::icon;
use crate::system::auth::context::use_session;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx =
        leptos::context::use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let session = use_session();
    let navigate = use_navigate();

    let (unread, set_unread) = signal(0u64);

    // refreshed whenever the selected project changes
    Effect::new(move |_| {
        let project_id = session.selected_project.get();
        if session.session.with_untracked(|s| s.is_none()) {
            return;
        }
        spawn_local(async move {
            match alert_api::statistics(project_id.as_deref()).await {
                Ok(stats) => set_unread.set(stats.unread),
                Err(e) => log::warn!("Unable to load alert counter: {}", e),
            }
        });
    });

    // the title is lost on reload, only the id survives in storage
    Effect::new(move |_| {
        let Some(project_id) = session.selected_project.get() else {
            ctx.project_title.set(None);
            return;
        };
        if ctx.project_title.with_untracked(|t| t.is_some()) {
            return;
        }
        spawn_local(async move {
            match project_api::fetch_project(&project_id).await {
                Ok(project) => ctx.project_title.set(Some(project.name)),
                Err(e) => log::warn!("Unable to load project {}: {}", project_id, e),
            }
        });
    });

    let user_name = move || {
        session
            .session
            .with(|s| s.as_ref().map(|s| s.name.clone()))
            .unwrap_or_default()
    };

    let role_label = move || {
        session
            .role()
            .map(|r| r.display_name())
            .unwrap_or_default()
    };

    let nav_project = navigate.clone();
    let change_project = move |_| {
        if let Some(role) = session.role() {
            nav_project(choose_project_path(role), Default::default());
        }
    };

    let nav_profile = navigate.clone();
    let open_profile = move |_| nav_profile(AppRoute::Profile.path(), Default::default());

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_left()
                    title=move || if ctx.left_open.get() { "Masquer le menu" } else { "Afficher le menu" }
                >
                    {icon("menu")}
                </button>
                <span class="top-header__title">"PetroMonitore"</span>
                <span class="top-header__project" on:click=change_project title="Changer de projet">
                    {move || ctx.project_title.get().unwrap_or_else(|| "Aucun projet sélectionné".to_string())}
                </span>
            </div>

            <div class="top-header__actions">
                <button class="top-header__icon-btn" title="Alertes non lues">
                    {icon("bell")}
                    <Show when=move || { unread.get() > 0 }>
                        <span class="top-header__badge">{move || unread.get()}</span>
                    </Show>
                </button>

                <div class="top-header__user" on:click=open_profile>
                    {icon("user")}
                    <span>{user_name}</span>
                    <span class="top-header__role">{role_label}</span>
                </div>
            </div>
        </div>
    }
}
