//! HTTP client for the Places web service.
//!
//! Wraps `reqwest` with API key handling, envelope status checks and typed
//! response deserialization. `ZERO_RESULTS` is a successful empty answer;
//! `OVER_QUERY_LIMIT` surfaces as [`PlacesError::RateLimited`] and every other
//! non-`OK` status as [`PlacesError::Api`].

use std::time::Duration;

use agroscan_core::GeoPoint;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{DetailsResponse, Envelope, NearbySearchResponse, PlaceDetails, PlaceSummary};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";

/// Client for the Places `nearbysearch` and `details` endpoints.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends the endpoint
        // instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Enables retries on transient failures.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Searches for places within `radius_m` metres of `location` matching
    /// `keyword`.
    ///
    /// Returns an empty list on `ZERO_RESULTS`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::RateLimited`] on HTTP 429 or `OVER_QUERY_LIMIT`.
    /// - [`PlacesError::Api`] for any other non-`OK` envelope status.
    /// - [`PlacesError::Http`] / [`PlacesError::UnexpectedStatus`] on
    ///   transport failure or non-2xx status.
    /// - [`PlacesError::Deserialize`] if the body does not match.
    pub async fn nearby_search(
        &self,
        location: GeoPoint,
        radius_m: u32,
        keyword: &str,
    ) -> Result<Vec<PlaceSummary>, PlacesError> {
        let url = self.build_url(
            "nearbysearch/json",
            &[
                ("location", &location.to_string()),
                ("radius", &radius_m.to_string()),
                ("keyword", keyword),
            ],
        )?;

        let envelope: Envelope<NearbySearchResponse> = self
            .get_envelope(&url, &format!("nearbysearch(keyword={keyword})"))
            .await?;

        Ok(envelope.data.results)
    }

    /// Fetches contact details for `place_id`.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::nearby_search`].
    pub async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError> {
        let url = self.build_url(
            "details/json",
            &[
                ("place_id", place_id),
                ("fields", "formatted_phone_number,international_phone_number"),
            ],
        )?;

        let envelope: Envelope<DetailsResponse> = self
            .get_envelope(&url, &format!("details(place_id={place_id})"))
            .await?;

        Ok(envelope.data.result)
    }

    /// Builds the endpoint URL with percent-encoded query parameters and the
    /// API key appended last.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET with retry, checks the HTTP and envelope status, and
    /// deserializes the body.
    async fn get_envelope<T>(&self, url: &Url, context: &str) -> Result<Envelope<T>, PlacesError>
    where
        T: DeserializeOwned + Send,
    {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let body = self.request_text(url).await?;
            let envelope: Envelope<T> =
                serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })?;
            Self::check_status(&envelope.status, envelope.error_message.as_deref())?;
            Ok(envelope)
        })
        .await
    }

    async fn request_text(&self, url: &Url) -> Result<String, PlacesError> {
        tracing::debug!(endpoint = %url.path(), "places request");
        // `without_url` keeps the API key out of error messages.
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PlacesError::RateLimited(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                url: Self::redacted(url),
            });
        }

        response.text().await.map_err(|e| e.without_url().into())
    }

    fn check_status(status: &str, error_message: Option<&str>) -> Result<(), PlacesError> {
        match status {
            "OK" | "ZERO_RESULTS" => Ok(()),
            "OVER_QUERY_LIMIT" => Err(PlacesError::RateLimited(
                error_message.unwrap_or(status).to_owned(),
            )),
            other => Err(PlacesError::Api {
                status: other.to_owned(),
                message: error_message.unwrap_or("no error message").to_owned(),
            }),
        }
    }

    /// URL without its query string, so the API key never reaches logs or
    /// error messages.
    fn redacted(url: &Url) -> String {
        let mut url = url.clone();
        url.set_query(None);
        url.to_string()
    }
}
