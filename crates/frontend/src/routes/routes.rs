//! Client routing.
//!
//! A single guarded outlet: every location change goes through
//! [`resolve`], which either names the page to render or a path to go to.

use leptos::prelude::*;
use leptos_router::components::Router;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::NavigateOptions;

use crate::dashboards::DashboardPage;
use crate::domain::a001_project::ui::choose::ChooseProjectPage;
use crate::domain::a001_project::ui::details::ProjectDetailsPage;
use crate::domain::a002_phase::ui::details::PhaseDetailPage;
use crate::domain::a002_phase::ui::list::PhasesPage;
use crate::domain::a003_operation::ui::details::OperationDetailPage;
use crate::domain::a005_report::ui::list::ReportsPage;
use crate::domain::a006_problem::ui::list::ProblemsPage;
use crate::domain::a007_solution::ui::list::SolutionsPage;
use crate::domain::a008_team_member::ui::list::TeamPage;
use crate::layout::Shell;
use crate::routes::table::{AppRoute, RouteParams};
use crate::system::auth::context::use_session;
use crate::system::auth::guard::{resolve, Resolution};
use crate::system::pages::forgot_password::ForgotPasswordPage;
use crate::system::pages::login::LoginPage;
use crate::system::pages::profile::ProfilePage;

fn render_page(route: AppRoute, params: &RouteParams) -> AnyView {
    let param = |name: &str| params.get(name).unwrap_or_default().to_string();

    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::ForgotPassword => view! { <ForgotPasswordPage /> }.into_any(),
        AppRoute::ChooseProject => view! { <ChooseProjectPage manager=false /> }.into_any(),
        AppRoute::ChooseProjectManager => view! { <ChooseProjectPage manager=true /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Details => view! { <ProjectDetailsPage /> }.into_any(),
        AppRoute::PhasesManager => view! { <PhasesPage manager=true /> }.into_any(),
        AppRoute::PhasesExpert => view! { <PhasesPage manager=false /> }.into_any(),
        AppRoute::PhaseDetail => view! { <PhaseDetailPage phase_id=param("phase_id") /> }.into_any(),
        AppRoute::OperationDetail => {
            view! { <OperationDetailPage operation_id=param("operation_id") /> }.into_any()
        }
        AppRoute::ReportsManager | AppRoute::ReportsExpert => {
            view! { <ReportsPage ingenieur=false /> }.into_any()
        }
        AppRoute::ReportsIngenieur => view! { <ReportsPage ingenieur=true /> }.into_any(),
        AppRoute::TeamManager => view! { <TeamPage manager=true /> }.into_any(),
        AppRoute::TeamExpert => view! { <TeamPage manager=false /> }.into_any(),
        AppRoute::Problems => view! { <ProblemsPage /> }.into_any(),
        AppRoute::SolutionsManager => view! { <SolutionsPage manager=true /> }.into_any(),
        AppRoute::SolutionsExpert => view! { <SolutionsPage manager=false /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
    }
}

#[component]
fn GuardedOutlet() -> impl IntoView {
    let session = use_session();
    let location = use_location();
    let navigate = use_navigate();

    let resolution = Memo::new(move |_| {
        let path = location.pathname.get();
        session.session.with(|s| resolve(&path, s.as_ref()))
    });

    Effect::new(move |_| {
        if let Resolution::Redirect(target) = resolution.get() {
            log::debug!("Redirecting {} to {}", location.pathname.get_untracked(), target);
            navigate(
                &target,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    move || match resolution.get() {
        Resolution::Render {
            route,
            params,
            show_chrome,
        } => view! {
            <Shell show_chrome=show_chrome>
                {render_page(route, &params)}
            </Shell>
        }
        .into_any(),
        Resolution::Redirect(_) => ().into_any(),
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <GuardedOutlet />
        </Router>
    }
}
