pub mod aggregate;
pub mod app;
pub mod charts;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod filters;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod stats;
pub mod table;
pub mod ui;
pub mod state;

pub use app::router;
pub use client::{HttpTripSource, TripSource};
pub use config::Config;
pub use loader::load_dashboard;
pub use state::AppState;
