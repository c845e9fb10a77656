use axum::{
    routing::{get, post},
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tower_sessions::cookie::SameSite;
use crate::{config::Config, handlers, middleware, services::Repositories};

pub fn build_router(repos: Repositories, config: Config) -> Router {
    // Session store setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_name("session");
    let max_body_size = config.server.max_body_size;

    Router::new()
        // Identity
        .route("/signup", post(handlers::handle_signup))
        .route("/login", post(handlers::handle_login))
        .route("/logout", get(handlers::handle_logout))
        .route("/me", get(handlers::get_me).put(handlers::update_me))
        .route("/users", get(handlers::list_users))

        // Loans
        .route("/loans", get(handlers::list_my_loans).post(handlers::apply_loan))
        .route("/loans/:loan_id/ledger", get(handlers::get_loan_ledger))
        .route("/admin/loans", get(handlers::admin_list_loans).post(handlers::admin_create_loan))
        .route("/admin/stats", get(handlers::admin_stats))

        // Tasks
        .route("/tasks", get(handlers::list_tasks).post(handlers::post_task))
        .route("/tasks/dashboard", get(handlers::task_dashboard))
        .route("/tasks/:task_id/apply", post(handlers::apply_task))
        .route("/tasks/:task_id/assign", post(handlers::assign_task))
        .route("/tasks/:task_id/eligible", get(handlers::eligible_assignees))
        .route("/tasks/:task_id/verification", post(handlers::request_verification))
        .route("/tasks/:task_id/approve", post(handlers::approve_task))
        .route("/tasks/:task_id/reject", post(handlers::reject_task))

        // Pricing
        .route("/pricing/estimate", get(handlers::estimate_price))
        .route("/skills", get(handlers::list_skills))

        .layer(from_fn(middleware::require_auth))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())

        // Request size limit from config
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))

        .with_state((repos, config))
}
