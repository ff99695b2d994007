//! User position lookup with a bounded wait, and the fallback chain used to
//! pick a map center when no position is available.

use std::time::Duration;

use agroscan_core::{Dealer, GeoPoint};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("location permission denied")]
    Denied,
}

/// One-shot source of the user's current position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<GeoPoint, LocationError>;
}

/// A position supplied up front, e.g. from command-line flags.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub GeoPoint);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        Ok(self.0)
    }
}

/// No positioning available on this host.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        Err(LocationError::Unavailable(
            "no location source configured".to_owned(),
        ))
    }
}

/// Where the map center came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterSource {
    Device,
    FirstDealer,
    Origin,
}

/// Asks `provider` for a position, giving up after `timeout`.
///
/// Failure and timeout both yield `None`; neither is an error for callers.
pub async fn locate(provider: &dyn LocationProvider, timeout: Duration) -> Option<GeoPoint> {
    match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(Ok(position)) => Some(position),
        Ok(Err(e)) => {
            tracing::info!(error = %e, "user position unavailable, using fallback center");
            None
        }
        Err(_) => {
            #[allow(clippy::cast_possible_truncation)]
            let timeout_ms = timeout.as_millis() as u64;
            tracing::warn!(timeout_ms, "timed out waiting for user position");
            None
        }
    }
}

/// First dealer's coordinate, or `{0, 0}` when there are no dealers.
#[must_use]
pub fn fallback_center(dealers: &[Dealer]) -> (GeoPoint, CenterSource) {
    dealers.first().map_or((GeoPoint::origin(), CenterSource::Origin), |d| {
        (d.position(), CenterSource::FirstDealer)
    })
}

/// The user's position if it arrives within `timeout`, else [`fallback_center`].
pub async fn resolve_center(
    provider: &dyn LocationProvider,
    dealers: &[Dealer],
    timeout: Duration,
) -> (GeoPoint, CenterSource) {
    match locate(provider, timeout).await {
        Some(position) => (position, CenterSource::Device),
        None => fallback_center(dealers),
    }
}
