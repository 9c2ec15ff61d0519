use crate::aggregate::{hour_label, weekday_label};
use crate::models::{StatsSummary, StatsView};
use crate::table::{PLACEHOLDER, whole_minutes};
use num_format::{Locale, ToFormattedString};

pub fn build_stats_view(stats: &StatsSummary) -> StatsView {
    StatsView {
        total_trips: stats.total_trips.to_formatted_string(&Locale::en),
        avg_distance: with_unit(stats.avg_trip_distance_km, "km"),
        avg_speed: with_unit(stats.avg_trip_speed_kmh, "km/h"),
        avg_duration: stats
            .avg_trip_duration_sec
            .map(|secs| format!("{} min", whole_minutes(secs)))
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        busiest_hour: stats
            .most_active_hour
            .and_then(|hour| u8::try_from(hour).ok())
            .filter(|hour| *hour < 24)
            .map(hour_label),
        busiest_weekday: stats
            .most_active_weekday
            .and_then(weekday_label)
            .map(str::to_string),
    }
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{value} {unit}"),
        None => PLACEHOLDER.to_string(),
    }
}
