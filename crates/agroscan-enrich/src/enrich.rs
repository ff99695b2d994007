//! Dealer enrichment.
//!
//! One verification lookup is issued per dealer and all of them run
//! concurrently behind an all-settled barrier. Each lookup owns its output
//! slot, so a failure only ever affects its own dealer: that dealer comes back
//! with its directory fields intact and every enrichment field unset.

use std::sync::Arc;
use std::time::Duration;

use agroscan_core::{distance_km, Dealer, EnrichedDealer, GeoPoint};
use agroscan_places::PlaceLookup;
use futures::future::join_all;
use futures::stream::{self, StreamExt};

use crate::location::{resolve_center, CenterSource, LocationProvider};

const DEFAULT_RADIUS_M: u32 = 150;
const DEFAULT_GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichOptions {
    /// Nearby-search radius around each dealer's claimed coordinate.
    pub radius_m: u32,
    /// Cap on concurrent lookups; `0` runs every lookup at once.
    pub max_in_flight: usize,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            max_in_flight: 0,
        }
    }
}

/// Result of one enrichment pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub center: GeoPoint,
    pub center_source: CenterSource,
    /// Same length and order as the input dealers.
    pub dealers: Vec<EnrichedDealer>,
}

impl Enrichment {
    #[must_use]
    pub fn verified_count(&self) -> usize {
        self.dealers.iter().filter(|d| d.verified).count()
    }
}

/// Resolves the map center and enriches dealer lists against it.
pub struct Enricher {
    lookup: Option<Arc<dyn PlaceLookup>>,
    locator: Arc<dyn LocationProvider>,
    geolocation_timeout: Duration,
    options: EnrichOptions,
}

impl Enricher {
    /// `lookup = None` means verification is unavailable; dealers are then
    /// returned unenriched.
    #[must_use]
    pub fn new(lookup: Option<Arc<dyn PlaceLookup>>, locator: Arc<dyn LocationProvider>) -> Self {
        Self {
            lookup,
            locator,
            geolocation_timeout: DEFAULT_GEOLOCATION_TIMEOUT,
            options: EnrichOptions::default(),
        }
    }

    #[must_use]
    pub fn with_geolocation_timeout(mut self, timeout: Duration) -> Self {
        self.geolocation_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: EnrichOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolves a center, then enriches `dealers` against it. Never fails.
    pub async fn enrich(&self, dealers: &[Dealer]) -> Enrichment {
        let (center, center_source) =
            resolve_center(self.locator.as_ref(), dealers, self.geolocation_timeout).await;
        let enriched =
            enrich_dealers(dealers, center, self.lookup.as_deref(), &self.options).await;

        let enrichment = Enrichment {
            center,
            center_source,
            dealers: enriched,
        };
        tracing::info!(
            dealers = enrichment.dealers.len(),
            verified = enrichment.verified_count(),
            center = %center,
            ?center_source,
            "dealer enrichment complete"
        );
        enrichment
    }
}

/// Enriches every dealer against `center`, preserving input order.
///
/// Lookups run concurrently; total latency tracks the slowest single lookup.
/// Only dealers whose lookup answered get enrichment fields; with no `lookup`
/// the dealers are returned as-is.
pub async fn enrich_dealers(
    dealers: &[Dealer],
    center: GeoPoint,
    lookup: Option<&dyn PlaceLookup>,
    options: &EnrichOptions,
) -> Vec<EnrichedDealer> {
    if dealers.is_empty() {
        return Vec::new();
    }

    let Some(lookup) = lookup else {
        tracing::warn!(
            dealers = dealers.len(),
            "place verification unavailable, showing dealers unenriched"
        );
        return dealers
            .iter()
            .cloned()
            .map(EnrichedDealer::unenriched)
            .collect();
    };

    let lookups: Vec<_> = dealers
        .iter()
        .map(|dealer| enrich_one(dealer, center, lookup, options.radius_m))
        .collect();

    if options.max_in_flight == 0 {
        join_all(lookups).await
    } else {
        // `buffered` (not `buffer_unordered`) keeps results in input order.
        stream::iter(lookups)
            .buffered(options.max_in_flight)
            .collect()
            .await
    }
}

async fn enrich_one(
    dealer: &Dealer,
    center: GeoPoint,
    lookup: &dyn PlaceLookup,
    radius_m: u32,
) -> EnrichedDealer {
    let mut enriched = EnrichedDealer::unenriched(dealer.clone());

    match lookup
        .find_nearby(dealer.position(), radius_m, &dealer.name)
        .await
    {
        Ok(Some(place)) => {
            enriched.verified = true;
            enriched.distance_km = Some(distance_km(center, dealer.position()));
            tracing::debug!(
                dealer_id = %dealer.id,
                place_id = %place.place_id,
                place_name = ?place.name,
                "dealer verified"
            );
            match lookup.phone_number(&place.place_id).await {
                Ok(phone) => enriched.phone = phone,
                Err(e) => tracing::warn!(
                    dealer_id = %dealer.id,
                    place_id = %place.place_id,
                    error = %e,
                    "phone lookup failed, keeping dealer verified without phone"
                ),
            }
        }
        Ok(None) => {
            enriched.distance_km = Some(distance_km(center, dealer.position()));
            tracing::debug!(dealer_id = %dealer.id, name = %dealer.name, "no matching place nearby");
        }
        Err(e) => {
            tracing::warn!(
                dealer_id = %dealer.id,
                error = %e,
                "dealer verification failed, showing dealer unenriched"
            );
        }
    }

    enriched
}
