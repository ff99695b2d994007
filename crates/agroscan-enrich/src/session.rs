//! A map view's enrichment lifecycle.
//!
//! Each refresh supersedes the one before it. A pass that is superseded, or
//! that is still running when the view is torn down, is discarded: it never
//! touches the scene.

use std::sync::{Mutex, MutexGuard, PoisonError};

use agroscan_core::Dealer;
use tokio_util::sync::CancellationToken;

use crate::enrich::{Enricher, Enrichment};
use crate::map::MapScene;

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The pass completed and its result is what the scene now shows.
    Applied(Enrichment),
    /// The pass was superseded or the view was torn down first.
    Cancelled,
}

pub struct EnrichmentSession {
    enricher: Enricher,
    current: Mutex<CancellationToken>,
    scene: Mutex<MapScene>,
}

impl EnrichmentSession {
    #[must_use]
    pub fn new(enricher: Enricher) -> Self {
        Self {
            enricher,
            current: Mutex::new(CancellationToken::new()),
            scene: Mutex::new(MapScene::new()),
        }
    }

    /// Enriches `dealers` and renders the result, unless a later refresh or
    /// [`EnrichmentSession::teardown`] gets there first.
    pub async fn refresh(&self, dealers: Vec<Dealer>) -> RefreshOutcome {
        let token = CancellationToken::new();
        {
            let mut current = lock(&self.current);
            current.cancel();
            *current = token.clone();
        }

        let enrichment = tokio::select! {
            () = token.cancelled() => None,
            enrichment = self.enricher.enrich(&dealers) => Some(enrichment),
        };

        let Some(enrichment) = enrichment else {
            tracing::debug!(dealers = dealers.len(), "enrichment pass discarded");
            return RefreshOutcome::Cancelled;
        };

        let mut scene = lock(&self.scene);
        // Teardown may land between the pass finishing and the scene lock.
        if token.is_cancelled() {
            tracing::debug!(dealers = dealers.len(), "enrichment pass discarded");
            return RefreshOutcome::Cancelled;
        }
        scene.render(enrichment.center, &enrichment.dealers);
        RefreshOutcome::Applied(enrichment)
    }

    /// Cancels any in-flight pass and removes every marker.
    pub fn teardown(&self) {
        lock(&self.current).cancel();
        let released = lock(&self.scene).release();
        tracing::debug!(released, "map view torn down");
    }

    /// Copy of the scene as it stands.
    #[must_use]
    pub fn scene(&self) -> MapScene {
        lock(&self.scene).clone()
    }
}

impl Drop for EnrichmentSession {
    fn drop(&mut self) {
        lock(&self.current).cancel();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
