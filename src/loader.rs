use crate::dashboard::TripOutcome;
use crate::errors::ApiError;
use crate::models::{FilterSet, StatsView, TripRecord, TripsView};
use crate::state::AppState;
use tracing::debug;

/// Page load: stats and trips are requested together and land in whatever
/// order the upstream answers. Failures end up as notices on the dashboard.
pub async fn load_dashboard(state: &AppState) {
    let filters = state.dashboard.lock().await.filters().clone();
    let _ = tokio::join!(refresh_stats(state), refresh_trips(state, filters));
}

pub async fn refresh_stats(state: &AppState) -> Result<StatsView, ApiError> {
    let result = state.source.fetch_stats().await;
    let mut dashboard = state.dashboard.lock().await;
    dashboard.finish_stats_fetch(result).cloned()
}

/// Fetches trips for `filters`, which also become the dashboard's current
/// filters. The lock is released while the request is in flight.
pub async fn refresh_trips(state: &AppState, filters: FilterSet) -> Result<TripsView, ApiError> {
    let ticket = {
        let mut dashboard = state.dashboard.lock().await;
        dashboard.set_filters(filters.clone());
        dashboard.begin_trip_fetch()
    };

    let result = state.source.fetch_trips(&filters).await;

    let mut dashboard = state.dashboard.lock().await;
    if dashboard.finish_trip_fetch(ticket, result)? == TripOutcome::Stale {
        debug!("newer trip list already shown");
    }
    Ok(dashboard.trips_view())
}

pub async fn reset_filters(state: &AppState) -> Result<TripsView, ApiError> {
    refresh_trips(state, FilterSet::defaults()).await
}

/// Single trip lookup. Does not touch the dashboard.
pub async fn fetch_trip(state: &AppState, id: &str) -> Result<TripRecord, ApiError> {
    state.source.fetch_trip(id).await
}
