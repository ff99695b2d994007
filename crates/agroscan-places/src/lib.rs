pub mod client;
pub mod error;
pub mod lookup;
pub(crate) mod retry;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use lookup::{PlaceLookup, PlaceMatch};
pub use types::{PlaceDetails, PlaceSummary};
