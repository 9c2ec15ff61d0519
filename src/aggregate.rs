use crate::models::{ChartSeries, TripRecord};
use std::collections::BTreeMap;

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Trips per pickup hour, ascending by hour. Hours with no trips are left out.
pub fn hourly_counts(trips: &[TripRecord]) -> Vec<(u8, u64)> {
    let mut counts: BTreeMap<u8, u64> = BTreeMap::new();
    for hour in trips.iter().filter_map(|trip| trip.pickup_hour) {
        if let Ok(hour @ 0..=23) = u8::try_from(hour) {
            *counts.entry(hour).or_default() += 1;
        }
    }
    counts.into_iter().collect()
}

/// Trips per weekday, Monday first. Always seven buckets.
pub fn weekday_counts(trips: &[TripRecord]) -> [u64; 7] {
    let mut counts = [0u64; 7];
    for weekday in trips.iter().filter_map(|trip| trip.pickup_weekday) {
        if let Some(slot) = usize::try_from(weekday).ok().and_then(|idx| counts.get_mut(idx)) {
            *slot += 1;
        }
    }
    counts
}

pub fn hourly_series(trips: &[TripRecord]) -> ChartSeries {
    let counts = hourly_counts(trips);
    ChartSeries {
        labels: counts.iter().map(|(hour, _)| hour_label(*hour)).collect(),
        values: counts.iter().map(|(_, count)| *count).collect(),
    }
}

pub fn weekday_series(trips: &[TripRecord]) -> ChartSeries {
    ChartSeries {
        labels: WEEKDAY_LABELS.iter().map(|day| day.to_string()).collect(),
        values: weekday_counts(trips).to_vec(),
    }
}

pub fn hour_label(hour: u8) -> String {
    format!("{hour}:00")
}

pub fn weekday_label(index: i64) -> Option<&'static str> {
    usize::try_from(index).ok().and_then(|idx| WEEKDAY_LABELS.get(idx).copied())
}
