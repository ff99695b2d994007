use thiserror::Error;

/// Errors returned by the Places web service client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The envelope `status` was neither `OK` nor `ZERO_RESULTS`.
    #[error("Places API error {status}: {message}")]
    Api { status: String, message: String },

    /// HTTP 429 or an `OVER_QUERY_LIMIT` envelope.
    #[error("rate limited by Places API: {0}")]
    RateLimited(String),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Places base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
