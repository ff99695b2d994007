pub mod app_config;
pub mod config;
pub mod dealers;
pub mod geo;
pub mod retry;
pub mod scan;
pub mod state;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use dealers::{Dealer, EnrichedDealer};
pub use geo::{distance_km, distance_m, round_to_tenth, GeoBounds, GeoPoint};
pub use scan::{Language, ScanResult, TreatmentStep};
pub use state::AppState;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid language: {0}")]
    InvalidLanguage(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
