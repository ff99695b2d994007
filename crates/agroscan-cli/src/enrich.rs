//! Dealer enrichment command and the wiring shared with `diagnose`.
//!
//! A missing or broken Places configuration never fails the command: the
//! dealers are still listed, unenriched.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use agroscan_core::{AppConfig, Dealer, GeoPoint};
use agroscan_enrich::{
    render_dealer_cards, EnrichOptions, Enricher, EnrichmentSession, FixedLocation,
    LocationProvider, NoLocation, RefreshOutcome,
};
use agroscan_diagnosis::DealersPayload;
use agroscan_places::{PlaceLookup, PlacesClient};
use anyhow::Context as _;

/// Dealer files use the directory API's shape: a bare array or `{"dealers": [...]}`.
pub(crate) fn parse_dealers(raw: &str) -> anyhow::Result<Vec<Dealer>> {
    let payload: DealersPayload = serde_json::from_str(raw).context("invalid dealer JSON")?;
    Ok(payload.into_dealers())
}

/// The verification client, or `None` when verification is unavailable.
pub(crate) fn build_lookup(config: &AppConfig) -> Option<Arc<dyn PlaceLookup>> {
    let Some(api_key) = config.google_maps_api_key.as_deref() else {
        tracing::warn!("GOOGLE_MAPS_API_KEY not set, dealer verification disabled");
        return None;
    };

    match PlacesClient::with_base_url(
        api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.places_base_url,
    ) {
        Ok(client) => {
            let client = client.with_retry_policy(
                config.places_max_retries,
                config.api_retry_backoff_base_ms,
            );
            let lookup: Arc<dyn PlaceLookup> = Arc::new(client);
            Some(lookup)
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to build Places client, dealer verification disabled");
            None
        }
    }
}

pub(crate) fn build_enricher(config: &AppConfig, position: Option<GeoPoint>) -> Enricher {
    let locator: Arc<dyn LocationProvider> = match position {
        Some(p) => Arc::new(FixedLocation(p)),
        None => Arc::new(NoLocation),
    };

    Enricher::new(build_lookup(config), locator)
        .with_geolocation_timeout(Duration::from_millis(config.geolocation_timeout_ms))
        .with_options(EnrichOptions {
            radius_m: config.verify_radius_m,
            max_in_flight: config.max_in_flight_lookups,
        })
}

/// Runs one enrichment pass, abandoning it on Ctrl-C.
pub(crate) async fn refresh_until_interrupted(
    session: &EnrichmentSession,
    dealers: Vec<Dealer>,
) -> RefreshOutcome {
    tokio::select! {
        outcome = session.refresh(dealers) => outcome,
        () = interrupted() => {
            session.teardown();
            tracing::info!("interrupted, enrichment abandoned");
            RefreshOutcome::Cancelled
        }
    }
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

/// Prints the map summary and dealer cards for an applied pass.
pub(crate) fn print_enriched(session: &EnrichmentSession, outcome: &RefreshOutcome) {
    let RefreshOutcome::Applied(enrichment) = outcome else {
        println!("dealer lookup cancelled");
        return;
    };

    let scene = session.scene();
    println!(
        "Map: {} markers around {} ({:?}), {} of {} dealers verified",
        scene.markers().len(),
        scene.center(),
        enrichment.center_source,
        enrichment.verified_count(),
        enrichment.dealers.len(),
    );
    if let Some(bounds) = scene.fitted_bounds() {
        if let (Some(sw), Some(ne)) = (bounds.south_west(), bounds.north_east()) {
            println!("Viewport: {sw} to {ne} (zoom {})", scene.zoom());
        }
    }
    println!();
    print!("{}", render_dealer_cards(&enrichment.dealers));
}

/// Enriches the dealers listed in `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed. Verification
/// failures are logged per dealer and never returned.
pub(crate) async fn run_enrich(
    config: &AppConfig,
    path: &Path,
    position: Option<GeoPoint>,
    json: bool,
) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let dealers = parse_dealers(&raw)?;
    tracing::info!(count = dealers.len(), file = %path.display(), "loaded dealers");

    let session = EnrichmentSession::new(build_enricher(config, position));
    let outcome = refresh_until_interrupted(&session, dealers).await;

    if json {
        if let RefreshOutcome::Applied(enrichment) = &outcome {
            println!("{}", serde_json::to_string_pretty(&enrichment.dealers)?);
        }
    } else {
        print_enriched(&session, &outcome);
    }

    session.teardown();
    Ok(())
}
