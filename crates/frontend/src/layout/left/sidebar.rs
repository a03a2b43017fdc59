//! Role-based navigation sidebar

use contracts::system::auth::Role;
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::routes::table::AppRoute;
use crate::shared::icons::icon;
use crate::system::auth::context::use_session;
use crate::system::auth::guard::SIGN_IN_PATH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
}

fn item(label: &'static str, route: AppRoute, icon: &'static str) -> MenuItem {
    MenuItem {
        label,
        path: route.path(),
        icon,
    }
}

/// Main menu entries for a role, top to bottom
pub fn menu_for(role: Role) -> Vec<MenuItem> {
    match role {
        Role::TopManagement => vec![
            item("Dashboard", AppRoute::Dashboard, "dashboard"),
            item("Details", AppRoute::Details, "file-text"),
            item("Phases", AppRoute::PhasesManager, "timeline"),
            item("Reports", AppRoute::ReportsManager, "file-text"),
            item("Project Team", AppRoute::TeamManager, "users"),
            item("Solutions", AppRoute::SolutionsManager, "lightbulb"),
        ],
        Role::Expert => vec![
            item("Dashboard", AppRoute::Dashboard, "dashboard"),
            item("Details", AppRoute::Details, "file-text"),
            item("Phases", AppRoute::PhasesExpert, "timeline"),
            item("Reports", AppRoute::ReportsExpert, "file-text"),
            item("Project Team", AppRoute::TeamExpert, "users"),
            item("Solutions", AppRoute::SolutionsExpert, "lightbulb"),
        ],
        Role::IngenieurTerrain => vec![
            item("Rapport", AppRoute::ReportsIngenieur, "file-text"),
            item("Profile", AppRoute::Profile, "user"),
        ],
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let session = use_session();
    let location = use_location();
    let navigate = use_navigate();

    let items = move || session.role().map(menu_for).unwrap_or_default();

    let nav = navigate.clone();
    let logout = move |_| {
        session.sign_out();
        nav(SIGN_IN_PATH, Default::default());
    };

    view! {
        <div class="app-sidebar__content">
            <div class="app-sidebar__brand">
                <span class="app-sidebar__logo">"PetroMonitore"</span>
            </div>

            <nav class="app-sidebar__menu">
                <For
                    each=items
                    key=|item| item.path
                    children=move |item| {
                        let navigate = navigate.clone();
                        let path = item.path;
                        view! {
                            <div
                                class="app-sidebar__item"
                                class:app-sidebar__item--active=move || {
                                    location.pathname.get() == path
                                }
                                on:click=move |_| navigate(path, Default::default())
                            >
                                <span class="app-sidebar__icon">{icon(item.icon)}</span>
                                <span class="app-sidebar__label">{item.label}</span>
                            </div>
                        }
                    }
                />
            </nav>

            <div class="app-sidebar__footer">
                <div class="app-sidebar__item" on:click=logout>
                    <span class="app-sidebar__icon">{icon("log-out")}</span>
                    <span class="app-sidebar__label">"Déconnexion"</span>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::auth::guard::{resolve, Resolution};
    use crate::system::auth::session::Session;

    #[test]
    fn test_every_menu_entry_is_reachable_for_its_role() {
        for role in Role::all() {
            let session = Session {
                id: "1".into(),
                name: "x".into(),
                role,
            };
            for item in menu_for(role) {
                match resolve(item.path, Some(&session)) {
                    Resolution::Render { show_chrome, .. } => {
                        assert!(show_chrome, "{} hides the sidebar", item.path)
                    }
                    other => panic!("{} unreachable for {}: {:?}", item.path, role, other),
                }
            }
        }
    }

    #[test]
    fn test_menus_match_roles() {
        let paths = |role| menu_for(role).into_iter().map(|i| i.path).collect::<Vec<_>>();

        assert_eq!(
            paths(Role::TopManagement),
            vec![
                "/dashboard",
                "/details",
                "/phases/manager",
                "/reports/manager",
                "/team/manager",
                "/solutions/manager",
            ]
        );
        assert_eq!(
            paths(Role::Expert),
            vec![
                "/dashboard",
                "/details",
                "/phases/expert",
                "/reports/expert",
                "/team/expert",
                "/solutions/expert",
            ]
        );
        assert_eq!(paths(Role::IngenieurTerrain), vec!["/reports/ingenieur", "/profile"]);
    }
}
