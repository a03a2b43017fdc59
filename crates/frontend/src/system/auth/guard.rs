use contracts::system::auth::Role;
use leptos::prelude::*;

use super::context::use_session;
use super::session::Session;
use crate::routes::table::{find_route, normalize, AppRoute, RouteParams};

pub const SIGN_IN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render {
        route: AppRoute,
        params: RouteParams,
        show_chrome: bool,
    },
    Redirect(String),
}

fn landing(session: Option<&Session>) -> Resolution {
    match session {
        Some(session) => Resolution::Redirect(session.role.home_path().to_string()),
        None => Resolution::Redirect(SIGN_IN_PATH.to_string()),
    }
}

/// Decides what to show for `path`. Pure and synchronous.
///
/// Missing session and role mismatch both end on the sign-in screen without
/// telling the user which one applied.
pub fn resolve(path: &str, session: Option<&Session>) -> Resolution {
    if normalize(path) == "/" {
        return landing(session);
    }

    let Some((descriptor, params)) = find_route(path) else {
        return landing(session);
    };

    if !descriptor.public {
        let Some(session) = session else {
            return Resolution::Redirect(SIGN_IN_PATH.to_string());
        };
        if !session.has_role(descriptor.required_roles) {
            return Resolution::Redirect(SIGN_IN_PATH.to_string());
        }
    }

    Resolution::Render {
        route: descriptor.route,
        params,
        show_chrome: !descriptor.hide_chrome,
    }
}

/// Sidebar visibility from the route table alone
pub fn show_chrome(path: &str) -> bool {
    find_route(path)
        .map(|(descriptor, _)| !descriptor.hide_chrome)
        .unwrap_or(false)
}

/// Renders `children` only for the listed roles
#[component]
pub fn RequireRole(roles: &'static [Role], children: ChildrenFn) -> impl IntoView {
    let ctx = use_session();
    let allowed = move || {
        ctx.session
            .with(|s| s.as_ref().map(|s| s.has_role(roles)).unwrap_or(false))
    };

    view! {
        <Show when=allowed fallback=|| ()>
            {children()}
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::table::ROUTE_TABLE;

    fn session(role: Role) -> Session {
        Session {
            id: "1".into(),
            name: "Test".into(),
            role,
        }
    }

    fn stored(raw: &str) -> Option<Session> {
        Session::from_stored(Some(raw))
    }

    fn sample_path(pattern: &str) -> String {
        pattern
            .split('/')
            .map(|s| if s.starts_with(':') { "sample-id" } else { s })
            .collect::<Vec<_>>()
            .join("/")
    }

    fn sign_in() -> Resolution {
        Resolution::Redirect(SIGN_IN_PATH.to_string())
    }

    #[test]
    fn test_access_granted_iff_session_role_in_required_set() {
        for descriptor in ROUTE_TABLE.iter().filter(|d| !d.public) {
            let path = sample_path(descriptor.path);
            for role in Role::all() {
                let s = session(role);
                let granted = matches!(resolve(&path, Some(&s)), Resolution::Render { .. });
                assert_eq!(
                    granted,
                    descriptor.required_roles.contains(&role),
                    "{} as {}",
                    path,
                    role
                );
            }
        }
    }

    #[test]
    fn test_no_session_always_redirects_on_guarded_routes() {
        for descriptor in ROUTE_TABLE.iter().filter(|d| !d.public) {
            assert_eq!(resolve(&sample_path(descriptor.path), None), sign_in());
        }
    }

    #[test]
    fn test_chrome_hidden_paths_never_show_sidebar() {
        let sessions = [
            None,
            Some(session(Role::TopManagement)),
            Some(session(Role::Expert)),
            Some(session(Role::IngenieurTerrain)),
        ];
        for path in ["/login", "/forgetpassword", "/choose-project", "/choose-project/manager"] {
            assert!(!show_chrome(path));
            for s in &sessions {
                if let Resolution::Render { show_chrome, .. } = resolve(path, s.as_ref()) {
                    assert!(!show_chrome, "sidebar on {}", path);
                }
            }
        }
    }

    #[test]
    fn test_expert_on_top_management_route_goes_to_sign_in() {
        let s = stored(r#"{"role":"EXPERT"}"#);
        assert_eq!(resolve("/reports/manager", s.as_ref()), sign_in());
        assert_eq!(resolve("/choose-project/manager", s.as_ref()), sign_in());
    }

    #[test]
    fn test_no_session_on_dashboard_goes_to_sign_in() {
        assert_eq!(resolve("/dashboard", None), sign_in());
    }

    #[test]
    fn test_field_engineer_reports_render_with_chrome() {
        let s = stored(r#"{"role":"INGENIEUR_TERRAIN"}"#);
        assert_eq!(
            resolve("/reports/ingenieur", s.as_ref()),
            Resolution::Render {
                route: AppRoute::ReportsIngenieur,
                params: RouteParams::default(),
                show_chrome: true,
            }
        );
    }

    #[test]
    fn test_invalid_json_session_redirects() {
        let s = Session::from_stored(Some("{not json"));
        assert!(s.is_none());
        assert_eq!(resolve("/dashboard", s.as_ref()), sign_in());
        assert_eq!(resolve("/reports/ingenieur", s.as_ref()), sign_in());
    }

    #[test]
    fn test_public_routes_render_without_session() {
        for path in ["/login", "/forgetpassword"] {
            assert!(matches!(
                resolve(path, None),
                Resolution::Render { show_chrome: false, .. }
            ));
        }
    }

    #[test]
    fn test_root_and_unknown_paths_land_on_role_home() {
        assert_eq!(resolve("/", None), sign_in());
        assert_eq!(resolve("/nowhere", None), sign_in());

        let s = session(Role::TopManagement);
        assert_eq!(
            resolve("/", Some(&s)),
            Resolution::Redirect("/choose-project/manager".into())
        );
        let s = session(Role::IngenieurTerrain);
        assert_eq!(
            resolve("/unknown/page", Some(&s)),
            Resolution::Redirect("/reports/ingenieur".into())
        );
    }

    #[test]
    fn test_role_homes_are_reachable() {
        for role in Role::all() {
            let s = session(role);
            assert!(matches!(
                resolve(role.home_path(), Some(&s)),
                Resolution::Render { .. }
            ));
        }
    }

    #[test]
    fn test_params_are_forwarded() {
        let s = session(Role::Expert);
        match resolve("/operations/op-7?tab=seuils", Some(&s)) {
            Resolution::Render { route, params, show_chrome } => {
                assert_eq!(route, AppRoute::OperationDetail);
                assert_eq!(params.get("operation_id"), Some("op-7"));
                assert!(show_chrome);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
