#![allow(dead_code)]

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, Default)]
pub struct Behavior {
    pub fail_stats: bool,
    pub fail_trips: bool,
    pub garbage_trips: bool,
}

#[derive(Clone)]
struct Upstream {
    behavior: Behavior,
    queries: Arc<Mutex<Vec<Option<String>>>>,
}

/// Stand-in for the trip API, served from the test's own runtime.
pub struct FakeUpstream {
    pub base_url: String,
    queries: Arc<Mutex<Vec<Option<String>>>>,
    handle: JoinHandle<()>,
}

impl FakeUpstream {
    /// Raw query strings received on `/api/trips`, oldest first.
    pub fn trip_queries(&self) -> Vec<Option<String>> {
        self.queries.lock().unwrap().clone()
    }

    pub fn last_trip_query(&self) -> Option<String> {
        self.trip_queries().last().cloned().flatten()
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn sample_trips() -> Value {
    json!([
        {
            "id": "id1",
            "vendor_id": 2,
            "pickup_datetime": "2016-03-14T17:24:55",
            "trip_duration": 455,
            "trip_distance_km": 1.498521,
            "trip_speed_kmh": 11.856428,
            "passenger_count": 1,
            "pickup_hour": 17,
            "pickup_weekday": 0,
            "time_of_day": "Evening"
        },
        {
            "id": "id2",
            "pickup_datetime": "2016-06-12T00:43:35",
            "trip_duration": 663,
            "trip_distance_km": null,
            "trip_speed_kmh": null,
            "passenger_count": 1,
            "pickup_hour": 0,
            "pickup_weekday": 6,
            "time_of_day": null
        },
        {
            "id": "id3",
            "pickup_datetime": "2016-01-19T11:35:24",
            "trip_duration": 2124,
            "trip_distance_km": 6.385107,
            "trip_speed_kmh": 10.822,
            "passenger_count": 2,
            "pickup_hour": 11,
            "pickup_weekday": 1,
            "time_of_day": "Morning"
        }
    ])
}

async fn stats(State(upstream): State<Upstream>) -> impl IntoResponse {
    if upstream.behavior.fail_stats {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }
    Json(json!({
        "total_trips": 1458644,
        "avg_trip_duration_sec": 959.49,
        "avg_trip_distance_km": 3.44,
        "avg_trip_speed_kmh": 14.42,
        "most_active_hour": 18,
        "most_active_weekday": 4
    }))
    .into_response()
}

async fn trips(State(upstream): State<Upstream>, RawQuery(query): RawQuery) -> impl IntoResponse {
    upstream.queries.lock().unwrap().push(query);
    if upstream.behavior.fail_trips {
        return (StatusCode::BAD_GATEWAY, "upstream exploded").into_response();
    }
    if upstream.behavior.garbage_trips {
        return "not json".into_response();
    }
    Json(sample_trips()).into_response()
}

async fn trip(Path(id): Path<String>) -> impl IntoResponse {
    let found = sample_trips()
        .as_array()
        .and_then(|trips| trips.iter().find(|trip| trip["id"] == id.as_str()).cloned());
    match found {
        Some(trip) => Json(trip).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Trip not found" }))).into_response(),
    }
}

pub async fn spawn_upstream(behavior: Behavior) -> FakeUpstream {
    let queries = Arc::new(Mutex::new(Vec::new()));
    let state = Upstream {
        behavior,
        queries: Arc::clone(&queries),
    };
    let app = Router::new()
        .route("/api/stats", get(stats))
        .route("/api/trips", get(trips))
        .route("/api/trips/:id", get(trip))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind upstream");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("upstream server");
    });

    FakeUpstream {
        base_url: format!("http://{addr}"),
        queries,
        handle,
    }
}
