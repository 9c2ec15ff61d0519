use serde::{Deserialize, Deserializer, Serialize};

/// One trip as returned by `GET /api/trips`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TripRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub pickup_datetime: String,
    #[serde(default)]
    pub trip_duration: Option<f64>,
    #[serde(default)]
    pub trip_distance_km: Option<f64>,
    #[serde(default)]
    pub trip_speed_kmh: Option<f64>,
    #[serde(default)]
    pub passenger_count: Option<i64>,
    #[serde(default)]
    pub pickup_hour: Option<i64>,
    #[serde(default)]
    pub pickup_weekday: Option<i64>,
    #[serde(default)]
    pub time_of_day: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

/// Trip ids arrive as strings, but numeric ids are accepted too.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    }))
}

/// Aggregates returned by `GET /api/stats`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StatsSummary {
    #[serde(default)]
    pub total_trips: u64,
    #[serde(default)]
    pub avg_trip_distance_km: Option<f64>,
    #[serde(default)]
    pub avg_trip_speed_kmh: Option<f64>,
    #[serde(default)]
    pub avg_trip_duration_sec: Option<f64>,
    #[serde(default)]
    pub most_active_hour: Option<i64>,
    #[serde(default)]
    pub most_active_weekday: Option<i64>,
}

/// The eight filter inputs, kept as the literal strings the user typed.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FilterSet {
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub pickup_hour: Option<String>,
    #[serde(default)]
    pub pickup_weekday: Option<String>,
    #[serde(default)]
    pub time_of_day: Option<String>,
    #[serde(default)]
    pub min_speed: Option<String>,
    #[serde(default)]
    pub max_speed: Option<String>,
    #[serde(default)]
    pub min_distance: Option<String>,
    #[serde(default)]
    pub max_distance: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsView {
    pub total_trips: String,
    pub avg_distance: String,
    pub avg_speed: String,
    pub avg_duration: String,
    pub busiest_hour: Option<String>,
    pub busiest_weekday: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TripRow {
    pub pickup: String,
    pub duration: String,
    pub distance: String,
    pub speed: String,
    pub passengers: String,
    pub time_of_day: String,
}

/// Label/value pairs for one bar chart, in display order.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub generation: u64,
    pub title: String,
    pub element_id: String,
    pub series: ChartSeries,
    /// ECharts option JSON.
    pub options: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct TripsView {
    pub trip_count: usize,
    pub rows: Vec<TripRow>,
    pub hourly: Option<ChartView>,
    pub weekday: Option<ChartView>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub api_base_url: String,
    pub stats: Option<StatsView>,
    pub filters: FilterSet,
    pub trips: TripsView,
    pub loading: bool,
    pub notices: Vec<Notice>,
}
