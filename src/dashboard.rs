use crate::aggregate::{hourly_series, weekday_series};
use crate::charts::{ChartKind, ChartSlot};
use crate::errors::ApiError;
use crate::models::{
    DashboardSnapshot, FilterSet, Notice, StatsSummary, StatsView, TripRecord, TripRow, TripsView,
};
use crate::stats::build_stats_view;
use crate::table::build_rows;
use tracing::{debug, error, info};

/// Issued when a trip fetch starts; hands the response back to [`Dashboard::finish_trip_fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripTicket {
    seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripOutcome {
    Applied { trip_count: usize },
    Stale,
}

/// All state behind the page. Network calls happen outside; results come
/// back through the `finish_*` methods.
#[derive(Debug)]
pub struct Dashboard {
    api_base_url: String,
    stats: Option<StatsView>,
    filters: FilterSet,
    trips: Vec<TripRecord>,
    rows: Vec<TripRow>,
    hourly: ChartSlot,
    weekday: ChartSlot,
    issued: u64,
    applied: u64,
    in_flight: usize,
    notices: Vec<Notice>,
}

impl Dashboard {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            stats: None,
            filters: FilterSet::defaults(),
            trips: Vec::new(),
            rows: Vec::new(),
            hourly: ChartSlot::new(ChartKind::Hourly),
            weekday: ChartSlot::new(ChartKind::Weekday),
            issued: 0,
            applied: 0,
            in_flight: 0,
            notices: Vec::new(),
        }
    }

    /// Applies a stats response. On failure the previous values stay and a
    /// notice is queued; the error is handed back to the caller.
    pub fn finish_stats_fetch(
        &mut self,
        result: Result<StatsSummary, ApiError>,
    ) -> Result<&StatsView, ApiError> {
        match result {
            Ok(summary) => {
                info!(total_trips = summary.total_trips, "stats updated");
                Ok(&*self.stats.insert(build_stats_view(&summary)))
            }
            Err(err) => {
                error!("error fetching stats: {err}");
                let message = format!(
                    "Failed to connect to backend. Make sure your API is running at {}",
                    self.api_base_url
                );
                self.notify(message);
                Err(err)
            }
        }
    }

    pub fn set_filters(&mut self, filters: FilterSet) {
        self.filters = filters;
    }

    pub fn begin_trip_fetch(&mut self) -> TripTicket {
        self.issued += 1;
        self.in_flight += 1;
        TripTicket { seq: self.issued }
    }

    pub fn finish_trip_fetch(
        &mut self,
        ticket: TripTicket,
        result: Result<Vec<TripRecord>, ApiError>,
    ) -> Result<TripOutcome, ApiError> {
        self.in_flight = self.in_flight.saturating_sub(1);

        match result {
            Err(err) => {
                error!(seq = ticket.seq, "error fetching trips: {err}");
                self.notify(
                    "Failed to fetch trips. Check the server log for details and make sure the backend is running.",
                );
                Err(err)
            }
            Ok(_) if ticket.seq <= self.applied => {
                debug!(
                    seq = ticket.seq,
                    applied = self.applied,
                    "discarding stale trip response"
                );
                Ok(TripOutcome::Stale)
            }
            Ok(trips) => {
                self.applied = ticket.seq;
                self.replace_trips(trips);
                info!(seq = ticket.seq, trip_count = self.trips.len(), "trips updated");
                Ok(TripOutcome::Applied {
                    trip_count: self.trips.len(),
                })
            }
        }
    }

    fn replace_trips(&mut self, trips: Vec<TripRecord>) {
        self.trips = trips;
        self.rows = build_rows(&self.trips);
        self.hourly.replace(hourly_series(&self.trips));
        self.weekday.replace(weekday_series(&self.trips));
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.notices.push(Notice {
            message: message.into(),
        });
    }

    pub fn stats(&self) -> Option<&StatsView> {
        self.stats.as_ref()
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn trips(&self) -> &[TripRecord] {
        &self.trips
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    #[cfg(test)]
    pub fn hourly_chart(&self) -> &ChartSlot {
        &self.hourly
    }

    #[cfg(test)]
    pub fn weekday_chart(&self) -> &ChartSlot {
        &self.weekday
    }

    pub fn trips_view(&self) -> TripsView {
        TripsView {
            trip_count: self.trips.len(),
            rows: self.rows.clone(),
            hourly: self.hourly.view(),
            weekday: self.weekday.view(),
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            api_base_url: self.api_base_url.clone(),
            stats: self.stats.clone(),
            filters: self.filters.clone(),
            trips: self.trips_view(),
            loading: self.is_loading(),
            notices: self.notices.clone(),
        }
    }

    /// Snapshot for a page render. Notices are handed out once.
    pub fn take_snapshot(&mut self) -> DashboardSnapshot {
        let mut snapshot = self.snapshot();
        snapshot.notices = std::mem::take(&mut self.notices);
        snapshot
    }
}
