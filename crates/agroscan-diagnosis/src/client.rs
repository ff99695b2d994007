//! HTTP client for the crop diagnosis backend.
//!
//! Two endpoints: `POST /diagnose` takes a multipart leaf image and returns a
//! [`DiagnosisResponse`]; `GET /dealers` lists dealers stocking a product near
//! a coordinate. Both go through the same retry policy.

use std::path::Path;
use std::time::Duration;

use agroscan_core::{Dealer, GeoPoint};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};

use crate::error::DiagnosisError;
use crate::retry::retry_with_backoff;
use crate::types::{DealersPayload, DiagnosisResponse};

/// Multipart field the backend reads the image from.
const IMAGE_FIELD: &str = "leaf_image";

pub struct DiagnosisClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl DiagnosisClient {
    /// Creates a client for the API rooted at `base_url`
    /// (e.g. `http://localhost:5000/api`).
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosisError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`DiagnosisError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, DiagnosisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| DiagnosisError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Enables retries on network errors, 429 and 5xx.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Uploads the image at `image_path` for diagnosis.
    ///
    /// # Errors
    ///
    /// - [`DiagnosisError::Io`] if the image cannot be read.
    /// - [`DiagnosisError::UnexpectedStatus`] / [`DiagnosisError::RateLimited`]
    ///   / [`DiagnosisError::Http`] once retries are exhausted.
    /// - [`DiagnosisError::Deserialize`] if the body does not match.
    pub async fn diagnose_image(
        &self,
        image_path: &Path,
    ) -> Result<DiagnosisResponse, DiagnosisError> {
        let bytes = tokio::fs::read(image_path)
            .await
            .map_err(|e| DiagnosisError::Io {
                path: image_path.display().to_string(),
                source: e,
            })?;
        let file_name = image_path
            .file_name()
            .map_or_else(|| "leaf".to_owned(), |n| n.to_string_lossy().into_owned());
        let mime = image_mime(image_path);
        let url = self.endpoint("diagnose")?;

        tracing::info!(
            image = %image_path.display(),
            bytes = bytes.len(),
            "submitting leaf image for diagnosis"
        );

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let part = Part::bytes(bytes.clone())
                .file_name(file_name.clone())
                .mime_str(mime);
            let url = url.clone();
            async move {
                let form = Form::new().part(IMAGE_FIELD, part?);
                let response = self.client.post(url.clone()).multipart(form).send().await?;
                let body = Self::checked_body(response, &url).await?;
                serde_json::from_str::<DiagnosisResponse>(&body).map_err(|e| {
                    DiagnosisError::Deserialize {
                        context: "diagnose".to_owned(),
                        source: e,
                    }
                })
            }
        })
        .await
    }

    /// Lists dealers stocking `product` near `location`.
    ///
    /// # Errors
    ///
    /// Same transport and decoding errors as [`DiagnosisClient::diagnose_image`].
    pub async fn get_dealers(
        &self,
        location: GeoPoint,
        product: &str,
    ) -> Result<Vec<Dealer>, DiagnosisError> {
        let mut url = self.endpoint("dealers")?;
        url.query_pairs_mut()
            .append_pair("lat", &location.lat.to_string())
            .append_pair("long", &location.lng.to_string())
            .append_pair("product", product);

        let payload = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let body = Self::checked_body(response, &url).await?;
                serde_json::from_str::<DealersPayload>(&body).map_err(|e| {
                    DiagnosisError::Deserialize {
                        context: format!("dealers(product={product})"),
                        source: e,
                    }
                })
            }
        })
        .await?;

        let dealers = payload.into_dealers();
        tracing::debug!(count = dealers.len(), product, "dealer directory answered");
        Ok(dealers)
    }

    fn endpoint(&self, name: &str) -> Result<Url, DiagnosisError> {
        self.base_url
            .join(name)
            .map_err(|e| DiagnosisError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Maps non-2xx statuses to typed errors and returns the body text.
    async fn checked_body(response: reqwest::Response, url: &Url) -> Result<String, DiagnosisError> {
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DiagnosisError::RateLimited {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DiagnosisError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_mime_by_extension() {
        assert_eq!(image_mime(Path::new("leaf.JPG")), "image/jpeg");
        assert_eq!(image_mime(Path::new("leaf.png")), "image/png");
        assert_eq!(image_mime(Path::new("leaf")), "application/octet-stream");
    }

    #[test]
    fn endpoint_keeps_api_prefix() {
        let client = DiagnosisClient::new("http://localhost:5000/api", 5, "ua").unwrap();
        assert_eq!(
            client.endpoint("diagnose").unwrap().as_str(),
            "http://localhost:5000/api/diagnose"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = DiagnosisClient::new("::nope::", 5, "ua");
        assert!(matches!(result, Err(DiagnosisError::InvalidBaseUrl { .. })));
    }
}
