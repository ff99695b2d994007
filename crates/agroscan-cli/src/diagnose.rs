//! Leaf diagnosis command.

use std::path::Path;

use agroscan_core::{AppConfig, AppState, GeoPoint, Language, ScanResult};
use agroscan_diagnosis::DiagnosisClient;
use agroscan_enrich::{render_timeline, EnrichmentSession};
use chrono::Utc;
use uuid::Uuid;

use crate::enrich::{build_enricher, print_enriched, refresh_until_interrupted};

/// Diagnoses `image`, then looks up and verifies dealers for the
/// recommended product.
///
/// # Errors
///
/// Returns an error if the diagnosis client cannot be built or the diagnosis
/// call fails. A failed dealer directory call is logged and treated as an
/// empty dealer list.
pub(crate) async fn run_diagnose(
    config: &AppConfig,
    image: &Path,
    position: Option<GeoPoint>,
    language: Language,
) -> anyhow::Result<()> {
    let client = DiagnosisClient::new(
        &config.api_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build diagnosis client: {e}"))?
    .with_retry_policy(config.api_max_retries, config.api_retry_backoff_base_ms);

    let mut state = AppState::new(language);
    state.set_uploaded_image(Some(image.display().to_string()));
    state.begin_scan();
    let diagnosis = client.diagnose_image(image).await;
    state.finish_scan();
    let diagnosis = diagnosis.map_err(|e| anyhow::anyhow!("diagnosis failed: {e}"))?;

    let directory_center = position.unwrap_or_else(GeoPoint::origin);
    let dealers = match client
        .get_dealers(directory_center, &diagnosis.recommended_product)
        .await
    {
        Ok(dealers) => dealers,
        Err(e) => {
            tracing::warn!(
                product = %diagnosis.recommended_product,
                error = %e,
                "dealer directory unavailable, continuing without dealers"
            );
            Vec::new()
        }
    };

    let scan = ScanResult {
        id: Uuid::new_v4(),
        image_path: image.display().to_string(),
        disease_name: diagnosis.disease_name.clone(),
        confidence: diagnosis.confidence(),
        treatment: diagnosis.treatment_steps(),
        recommended_product: diagnosis.recommended_product.clone(),
        dealers,
        scanned_at: Utc::now(),
    };
    state.set_current_scan(scan.clone());
    state.add_to_history(scan);

    if let Some(scan) = state.current_scan() {
        print_scan(scan, state.language());
        let session = EnrichmentSession::new(build_enricher(config, position));
        let outcome = refresh_until_interrupted(&session, scan.dealers.clone()).await;
        println!();
        print_enriched(&session, &outcome);
        session.teardown();
    }

    Ok(())
}

fn print_scan(scan: &ScanResult, language: Language) {
    println!("Scan {} ({language})", scan.id);
    println!("Disease:     {}", scan.disease_name);
    println!("Confidence:  {:.1}%", scan.confidence);
    println!("Product:     {}", scan.recommended_product);
    println!();
    print!("{}", render_timeline(&scan.treatment));
}
