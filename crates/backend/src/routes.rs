use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use crate::{handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(auth_routes())
        .merge(user_routes())
        .merge(open_routes())
        .merge(business_routes())
}

fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/login", post(system::handlers::auth::login))
        .route("/api/auth/refresh", post(system::handlers::auth::refresh))
        .route("/api/auth/logout", post(system::handlers::auth::logout))
        .route(
            "/api/auth/profile",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        .route(
            "/api/auth/change-password",
            post(system::handlers::auth::change_password)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
}

fn user_routes() -> Router {
    Router::new()
        .route(
            "/api/users",
            get(system::handlers::users::list_users)
                .post(system::handlers::users::create_user)
                .layer(middleware::from_fn(
                    system::auth::middleware::require_top_management,
                )),
        )
        // Self-service access is checked in the handlers
        .route(
            "/api/users/:id",
            get(system::handlers::users::get_user)
                .put(system::handlers::users::update_user)
                .delete(system::handlers::users::delete_user)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
}

/// Доступно любой роли, включая инженеров на площадке
fn open_routes() -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::a005_report::list).post(handlers::a005_report::create),
        )
        .route("/api/alerts", get(handlers::a009_alert::list))
        .route("/api/alerts/statistics", get(handlers::a009_alert::statistics))
        .route("/api/alerts/read-all", post(handlers::a009_alert::mark_all_read))
        .route("/api/alerts/:id", get(handlers::a009_alert::get_by_id))
        .route("/api/alerts/:id/read", post(handlers::a009_alert::mark_read))
        .route("/api/alerts/:id/treat", post(handlers::a009_alert::mark_treated))
        .route_layer(middleware::from_fn(system::auth::middleware::require_auth))
}

/// Чтение для всех, изменения для TOP_MANAGEMENT и EXPERT
fn business_routes() -> Router {
    use handlers::*;

    Router::new()
        // A001 Projects
        .route(
            "/api/projects",
            get(a001_project::list).post(a001_project::create),
        )
        .route(
            "/api/projects/:id",
            get(a001_project::get_by_id)
                .put(a001_project::update)
                .delete(a001_project::delete),
        )
        .route("/api/projects/:id/status", patch(a001_project::set_status))
        .route(
            "/api/projects/:id/responsible",
            patch(a001_project::set_responsible),
        )
        // A002 Phases
        .route(
            "/api/projects/:id/phases",
            get(a002_phase::list_by_project).post(a002_phase::create),
        )
        .route("/api/projects/:id/phases/order", post(a002_phase::reorder))
        .route(
            "/api/phases/:id",
            get(a002_phase::get_by_id)
                .put(a002_phase::update)
                .delete(a002_phase::delete),
        )
        // A003 Operations
        .route(
            "/api/phases/:id/operations",
            get(a003_operation::list_by_phase).post(a003_operation::create),
        )
        .route(
            "/api/phases/:id/operations/order",
            post(a003_operation::reorder),
        )
        .route(
            "/api/operations/:id",
            get(a003_operation::get_by_id)
                .put(a003_operation::update)
                .delete(a003_operation::delete),
        )
        .route(
            "/api/operations/:id/progress",
            patch(a003_operation::set_progress),
        )
        // A004 Thresholds
        .route(
            "/api/operations/:id/thresholds",
            get(a004_threshold::list_by_operation).post(a004_threshold::create),
        )
        .route(
            "/api/thresholds/:id",
            put(a004_threshold::update).delete(a004_threshold::delete),
        )
        // A005 Reports (review and removal)
        .route(
            "/api/reports/:id",
            get(a005_report::get_by_id).delete(a005_report::delete),
        )
        .route("/api/reports/:id/review", put(a005_report::review))
        // A006 Problems
        .route(
            "/api/problems",
            get(a006_problem::list).post(a006_problem::create),
        )
        .route("/api/problems/statistics", get(a006_problem::statistics))
        .route(
            "/api/problems/entity/:kind/:id",
            get(a006_problem::list_by_entity),
        )
        .route(
            "/api/problems/:id",
            get(a006_problem::get_by_id)
                .put(a006_problem::update)
                .delete(a006_problem::delete),
        )
        .route("/api/problems/:id/status", patch(a006_problem::set_status))
        // A007 Solutions
        .route(
            "/api/solutions",
            get(a007_solution::list).post(a007_solution::create),
        )
        .route("/api/solutions/statistics", get(a007_solution::statistics))
        .route("/api/solutions/to-implement", get(a007_solution::to_implement))
        .route(
            "/api/solutions/:id",
            get(a007_solution::get_by_id)
                .put(a007_solution::update)
                .delete(a007_solution::delete),
        )
        .route(
            "/api/solutions/:id/implement",
            patch(a007_solution::implement),
        )
        .route(
            "/api/projects/:id/solutions",
            get(a007_solution::list_by_project),
        )
        // A008 Team
        .route(
            "/api/projects/:id/team",
            get(a008_team_member::list).post(a008_team_member::assign),
        )
        .route(
            "/api/projects/:id/team/:user_id",
            put(a008_team_member::update_role).delete(a008_team_member::unassign),
        )
        // A009 Alerts (manual detection run)
        .route("/api/alerts/detect", post(a009_alert::detect))
        // A010 History
        .route(
            "/api/history/:table/:id",
            get(a010_history::list_for_record),
        )
        // Dashboards
        .route("/api/dashboard/general", get(dashboard::general))
        .route("/api/dashboard/projects/:id", get(dashboard::project))
        .route_layer(middleware::from_fn(
            system::auth::middleware::require_editor_for_writes,
        ))
}
