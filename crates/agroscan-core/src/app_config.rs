#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Base URL of the diagnosis and dealer directory API, e.g. `http://localhost:5000/api`.
    pub api_base_url: String,
    /// Google Maps key used for place verification. `None` disables verification.
    pub google_maps_api_key: Option<String>,
    pub places_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Upper bound on the wait for a device position before falling back.
    pub geolocation_timeout_ms: u64,
    pub verify_radius_m: u32,
    /// Concurrent place lookups per enrichment pass; `0` means one per dealer.
    pub max_in_flight_lookups: usize,
    pub api_max_retries: u32,
    pub api_retry_backoff_base_ms: u64,
    pub places_max_retries: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("api_base_url", &self.api_base_url)
            .field(
                "google_maps_api_key",
                &self.google_maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("geolocation_timeout_ms", &self.geolocation_timeout_ms)
            .field("verify_radius_m", &self.verify_radius_m)
            .field("max_in_flight_lookups", &self.max_in_flight_lookups)
            .field("api_max_retries", &self.api_max_retries)
            .field("api_retry_backoff_base_ms", &self.api_retry_backoff_base_ms)
            .field("places_max_retries", &self.places_max_retries)
            .finish()
    }
}
