use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/filters", post(handlers::apply_filters))
        .route("/filters/reset", post(handlers::reset))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/dashboard/stats", get(handlers::get_stats))
        .route("/api/dashboard/trips", get(handlers::get_trips))
        .route("/api/dashboard/trips/:id", get(handlers::get_trip))
        .with_state(state)
}
