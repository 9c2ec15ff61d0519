use crate::models::{TripRecord, TripRow};
use chrono::{DateTime, Local, NaiveDateTime};

pub const PLACEHOLDER: &str = "N/A";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

pub fn build_rows(trips: &[TripRecord]) -> Vec<TripRow> {
    trips.iter().map(trip_row).collect()
}

pub fn trip_row(trip: &TripRecord) -> TripRow {
    TripRow {
        pickup: format_pickup(&trip.pickup_datetime),
        duration: trip
            .trip_duration
            .map(|secs| format!("{} min", whole_minutes(secs)))
            .unwrap_or_else(placeholder),
        distance: trip
            .trip_distance_km
            .map(|km| format!("{} km", fixed(km, 2)))
            .unwrap_or_else(placeholder),
        speed: trip
            .trip_speed_kmh
            .map(|kmh| format!("{} km/h", fixed(kmh, 1)))
            .unwrap_or_else(placeholder),
        passengers: trip
            .passenger_count
            .map(|count| count.to_string())
            .unwrap_or_else(placeholder),
        time_of_day: trip
            .time_of_day
            .as_deref()
            .filter(|label| !label.is_empty())
            .unwrap_or(PLACEHOLDER)
            .to_string(),
    }
}

/// Fixed decimals with ties rounded away from zero.
pub fn fixed(value: f64, digits: usize) -> String {
    let scale = 10f64.powi(digits as i32);
    format!("{:.*}", digits, (value * scale).round() / scale)
}

/// Seconds to minutes, halves rounding up.
pub fn whole_minutes(secs: f64) -> i64 {
    (secs / 60.0 + 0.5).floor() as i64
}

/// Timestamps with an offset are shown in local time; naive ones as written.
/// Anything unparsable is returned unchanged.
pub fn format_pickup(raw: &str) -> String {
    if let Ok(stamped) = DateTime::parse_from_rfc3339(raw) {
        return stamped.with_timezone(&Local).format(DISPLAY_FORMAT).to_string();
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}
