//! Dealer enrichment: verify each dealer against a places provider, attach
//! phone numbers and distances, and lay the result out on a map scene.

pub mod enrich;
pub mod location;
pub mod map;
pub mod session;
pub mod view;

pub use enrich::{enrich_dealers, EnrichOptions, Enricher, Enrichment};
pub use location::{
    fallback_center, locate, resolve_center, CenterSource, FixedLocation, LocationError,
    LocationProvider, NoLocation,
};
pub use map::{MapScene, Marker, MarkerIcon, MarkerId, MarkerKind};
pub use session::{EnrichmentSession, RefreshOutcome};
pub use view::{render_dealer_cards, render_timeline};
