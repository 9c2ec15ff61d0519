use crate::client::TripSource;
use crate::dashboard::Dashboard;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn TripSource>,
    pub dashboard: Arc<Mutex<Dashboard>>,
}

impl AppState {
    pub fn new(source: Arc<dyn TripSource>, api_base_url: impl Into<String>) -> Self {
        Self {
            source,
            dashboard: Arc::new(Mutex::new(Dashboard::new(api_base_url))),
        }
    }
}
