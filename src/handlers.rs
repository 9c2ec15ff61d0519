use crate::errors::AppError;
use crate::loader::{fetch_trip, load_dashboard, refresh_stats, refresh_trips, reset_filters};
use crate::models::{DashboardSnapshot, FilterSet, StatsView, TripRow, TripsView};
use crate::state::AppState;
use crate::table::trip_row;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Form, Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    load_dashboard(&state).await;
    render_page(&state).await
}

/// Filter changes only re-fetch trips. Failures show up as notices on the page.
pub async fn apply_filters(
    State(state): State<AppState>,
    Form(filters): Form<FilterSet>,
) -> Html<String> {
    let _ = refresh_trips(&state, filters).await;
    render_page(&state).await
}

pub async fn reset(State(state): State<AppState>) -> Html<String> {
    let _ = reset_filters(&state).await;
    render_page(&state).await
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.snapshot())
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsView>, AppError> {
    Ok(Json(refresh_stats(&state).await?))
}

pub async fn get_trips(
    State(state): State<AppState>,
    Query(filters): Query<FilterSet>,
) -> Result<Json<TripsView>, AppError> {
    Ok(Json(refresh_trips(&state, filters).await?))
}

pub async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TripRow>, AppError> {
    if id.trim().is_empty() {
        return Err(AppError::bad_request("trip id must not be blank"));
    }
    let trip = fetch_trip(&state, &id).await?;
    Ok(Json(trip_row(&trip)))
}

async fn render_page(state: &AppState) -> Html<String> {
    let snapshot = state.dashboard.lock().await.take_snapshot();
    Html(render_index(&snapshot))
}
