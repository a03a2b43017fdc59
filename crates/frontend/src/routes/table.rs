//! Declarative route table.
//!
//! Every client view is listed exactly once, with the roles allowed to open it
//! and whether the sidebar is hidden on it. The guard reads nothing else.

use std::collections::BTreeMap;

use contracts::system::auth::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Login,
    ForgotPassword,
    ChooseProject,
    ChooseProjectManager,
    Dashboard,
    Details,
    PhasesManager,
    PhasesExpert,
    PhaseDetail,
    OperationDetail,
    ReportsManager,
    ReportsExpert,
    ReportsIngenieur,
    TeamManager,
    TeamExpert,
    Problems,
    SolutionsManager,
    SolutionsExpert,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub route: AppRoute,
    pub path: &'static str,
    /// Empty means any signed-in role
    pub required_roles: &'static [Role],
    pub hide_chrome: bool,
    /// Reachable without a session
    pub public: bool,
}

const TM: Role = Role::TopManagement;
const EX: Role = Role::Expert;
const IT: Role = Role::IngenieurTerrain;

const fn guarded(route: AppRoute, path: &'static str, required_roles: &'static [Role]) -> RouteDescriptor {
    RouteDescriptor {
        route,
        path,
        required_roles,
        hide_chrome: false,
        public: false,
    }
}

/// Static paths come before parameterised ones: the first match wins.
pub static ROUTE_TABLE: &[RouteDescriptor] = &[
    RouteDescriptor {
        route: AppRoute::Login,
        path: "/login",
        required_roles: &[],
        hide_chrome: true,
        public: true,
    },
    RouteDescriptor {
        route: AppRoute::ForgotPassword,
        path: "/forgetpassword",
        required_roles: &[],
        hide_chrome: true,
        public: true,
    },
    RouteDescriptor {
        route: AppRoute::ChooseProject,
        path: "/choose-project",
        required_roles: &[EX, IT],
        hide_chrome: true,
        public: false,
    },
    RouteDescriptor {
        route: AppRoute::ChooseProjectManager,
        path: "/choose-project/manager",
        required_roles: &[TM],
        hide_chrome: true,
        public: false,
    },
    guarded(AppRoute::Dashboard, "/dashboard", &[TM, EX]),
    guarded(AppRoute::Details, "/details", &[TM, EX]),
    guarded(AppRoute::PhasesManager, "/phases/manager", &[TM]),
    guarded(AppRoute::PhasesExpert, "/phases/expert", &[EX]),
    guarded(AppRoute::PhaseDetail, "/phases/:phase_id", &[TM, EX]),
    guarded(AppRoute::OperationDetail, "/operations/:operation_id", &[TM, EX]),
    guarded(AppRoute::ReportsManager, "/reports/manager", &[TM]),
    guarded(AppRoute::ReportsExpert, "/reports/expert", &[EX]),
    guarded(AppRoute::ReportsIngenieur, "/reports/ingenieur", &[IT]),
    guarded(AppRoute::TeamManager, "/team/manager", &[TM]),
    guarded(AppRoute::TeamExpert, "/team/expert", &[EX]),
    guarded(AppRoute::Problems, "/problems", &[TM, EX]),
    guarded(AppRoute::SolutionsManager, "/solutions/manager", &[TM]),
    guarded(AppRoute::SolutionsExpert, "/solutions/expert", &[EX]),
    guarded(AppRoute::Profile, "/profile", &[TM, EX, IT]),
];

/// Values captured from `:name` segments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(BTreeMap<String, String>);

impl RouteParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Path without query string, fragment and trailing slash
pub fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

pub fn match_path(pattern: &str, path: &str) -> Option<RouteParams> {
    let pattern = normalize(pattern);
    let path = normalize(path);

    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    let mut params = BTreeMap::new();

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(RouteParams(params)),
            (Some(expected), Some(actual)) => {
                if let Some(name) = expected.strip_prefix(':') {
                    if actual.is_empty() {
                        return None;
                    }
                    params.insert(name.to_string(), actual.to_string());
                } else if expected != actual {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

pub fn find_route(path: &str) -> Option<(&'static RouteDescriptor, RouteParams)> {
    ROUTE_TABLE
        .iter()
        .find_map(|descriptor| match_path(descriptor.path, path).map(|params| (descriptor, params)))
}

impl AppRoute {
    pub fn descriptor(self) -> &'static RouteDescriptor {
        ROUTE_TABLE
            .iter()
            .find(|d| d.route == self)
            .unwrap_or(&ROUTE_TABLE[0])
    }

    pub fn path(self) -> &'static str {
        self.descriptor().path
    }
}

pub fn phase_path(phase_id: &str) -> String {
    format!("/phases/{}", phase_id)
}

pub fn operation_path(operation_id: &str) -> String {
    format!("/operations/{}", operation_id)
}

/// Per-role variant of the phases, reports, team and solutions views
pub fn phases_path(role: Role) -> &'static str {
    match role {
        Role::TopManagement => AppRoute::PhasesManager.path(),
        _ => AppRoute::PhasesExpert.path(),
    }
}

pub fn reports_path(role: Role) -> &'static str {
    match role {
        Role::TopManagement => AppRoute::ReportsManager.path(),
        Role::Expert => AppRoute::ReportsExpert.path(),
        Role::IngenieurTerrain => AppRoute::ReportsIngenieur.path(),
    }
}

pub fn solutions_path(role: Role) -> &'static str {
    match role {
        Role::TopManagement => AppRoute::SolutionsManager.path(),
        _ => AppRoute::SolutionsExpert.path(),
    }
}

pub fn choose_project_path(role: Role) -> &'static str {
    match role {
        Role::TopManagement => AppRoute::ChooseProjectManager.path(),
        _ => AppRoute::ChooseProject.path(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_match_static_path() {
        assert!(match_path("/dashboard", "/dashboard").unwrap().is_empty());
        assert!(match_path("/dashboard", "/dashboard/").is_some());
        assert!(match_path("/dashboard", "/dashboard?tab=1").is_some());
        assert!(match_path("/dashboard", "/dashboard#top").is_some());
        assert!(match_path("/dashboard", "/dashboards").is_none());
        assert!(match_path("/dashboard", "/dashboard/extra").is_none());
        assert!(match_path("/reports/expert", "/reports").is_none());
    }

    #[test]
    fn test_match_captures_params() {
        let params = match_path("/phases/:phase_id", "/phases/abc-123").unwrap();
        assert_eq!(params.get("phase_id"), Some("abc-123"));
        assert_eq!(params.get("other"), None);
        assert!(match_path("/phases/:phase_id", "/phases/").is_none());
        assert!(match_path("/phases/:phase_id", "/phases").is_none());
    }

    #[test]
    fn test_root_normalization() {
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/?x=1"), "/");
        assert_eq!(normalize("/team/manager/"), "/team/manager");
    }

    #[test]
    fn test_static_segments_win_over_params() {
        let (d, _) = find_route("/phases/manager").unwrap();
        assert_eq!(d.route, AppRoute::PhasesManager);
        let (d, _) = find_route("/phases/expert").unwrap();
        assert_eq!(d.route, AppRoute::PhasesExpert);
        let (d, params) = find_route("/phases/42").unwrap();
        assert_eq!(d.route, AppRoute::PhaseDetail);
        assert_eq!(params.get("phase_id"), Some("42"));
    }

    #[test]
    fn test_table_has_one_entry_per_route_and_unique_paths() {
        let routes: HashSet<_> = ROUTE_TABLE.iter().map(|d| d.route).collect();
        let paths: HashSet<_> = ROUTE_TABLE.iter().map(|d| d.path).collect();
        assert_eq!(routes.len(), ROUTE_TABLE.len());
        assert_eq!(paths.len(), ROUTE_TABLE.len());
        for d in ROUTE_TABLE {
            assert_eq!(d.route.descriptor(), d);
        }
    }

    #[test]
    fn test_public_routes_are_exactly_auth_screens() {
        let public: Vec<_> = ROUTE_TABLE.iter().filter(|d| d.public).map(|d| d.route).collect();
        assert_eq!(public, vec![AppRoute::Login, AppRoute::ForgotPassword]);
        for d in ROUTE_TABLE.iter().filter(|d| !d.public) {
            assert!(!d.required_roles.is_empty(), "{} has no roles", d.path);
        }
    }

    #[test]
    fn test_chrome_hidden_set() {
        let hidden: HashSet<_> = ROUTE_TABLE
            .iter()
            .filter(|d| d.hide_chrome)
            .map(|d| d.path)
            .collect();
        let expected: HashSet<_> = [
            "/login",
            "/forgetpassword",
            "/choose-project",
            "/choose-project/manager",
        ]
        .into_iter()
        .collect();
        assert_eq!(hidden, expected);
    }

    #[test]
    fn test_role_specific_paths_point_to_role_routes() {
        for role in Role::all() {
            for path in [phases_path(role), solutions_path(role), choose_project_path(role)] {
                if role == Role::IngenieurTerrain && path != choose_project_path(role) {
                    continue;
                }
                let (d, _) = find_route(path).unwrap();
                assert!(d.required_roles.contains(&role), "{} not allowed on {}", role, path);
            }
            let (d, _) = find_route(reports_path(role)).unwrap();
            assert!(d.required_roles.contains(&role));
        }
    }

    #[test]
    fn test_detail_paths() {
        let (d, p) = find_route(&phase_path("x1")).unwrap();
        assert_eq!((d.route, p.get("phase_id")), (AppRoute::PhaseDetail, Some("x1")));
        let (d, p) = find_route(&operation_path("o9")).unwrap();
        assert_eq!((d.route, p.get("operation_id")), (AppRoute::OperationDetail, Some("o9")));
    }
}
