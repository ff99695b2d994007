//! The verification seam used by dealer enrichment.
//!
//! Enrichment only needs two questions answered: "is there a place called X
//! near this point?" and "what is this place's phone number?". [`PlaceLookup`]
//! names exactly that, so tests and alternative providers can stand in for
//! [`PlacesClient`].

use agroscan_core::GeoPoint;
use async_trait::async_trait;

use crate::client::PlacesClient;
use crate::error::PlacesError;

/// The first place matching a nearby search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceMatch {
    pub place_id: String,
    pub name: Option<String>,
}

#[async_trait]
pub trait PlaceLookup: Send + Sync {
    /// Returns the first place within `radius_m` of `location` matching
    /// `keyword`, or `None` when nothing matches.
    async fn find_nearby(
        &self,
        location: GeoPoint,
        radius_m: u32,
        keyword: &str,
    ) -> Result<Option<PlaceMatch>, PlacesError>;

    /// Returns the display phone number for `place_id`, if the place has one.
    async fn phone_number(&self, place_id: &str) -> Result<Option<String>, PlacesError>;
}

#[async_trait]
impl PlaceLookup for PlacesClient {
    async fn find_nearby(
        &self,
        location: GeoPoint,
        radius_m: u32,
        keyword: &str,
    ) -> Result<Option<PlaceMatch>, PlacesError> {
        let results = self.nearby_search(location, radius_m, keyword).await?;
        Ok(results.into_iter().next().map(|p| PlaceMatch {
            place_id: p.place_id,
            name: p.name,
        }))
    }

    async fn phone_number(&self, place_id: &str) -> Result<Option<String>, PlacesError> {
        let details = self.place_details(place_id).await?;
        Ok(details.and_then(|d| d.formatted_phone_number.or(d.international_phone_number)))
    }
}
