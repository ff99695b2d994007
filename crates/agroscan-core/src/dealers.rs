use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A dealer record as returned by the dealer directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dealer {
    pub id: String,
    pub name: String,
    pub address: String,
    /// Human-readable distance supplied by the directory, e.g. `"2.3 km"`.
    /// Superseded once a distance is computed from the user's position.
    #[serde(default)]
    pub distance: String,
    pub has_stock: bool,
    pub lat: f64,
    #[serde(alias = "long")]
    pub lng: f64,
}

impl Dealer {
    #[must_use]
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// A [`Dealer`] augmented with externally verified facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedDealer {
    #[serde(flatten)]
    pub dealer: Dealer,
    /// A matching place exists near the dealer's claimed coordinate.
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl EnrichedDealer {
    /// Wraps a dealer with every enrichment field unset.
    #[must_use]
    pub fn unenriched(dealer: Dealer) -> Self {
        Self {
            dealer,
            verified: false,
            phone: None,
            distance_km: None,
        }
    }

    /// Computed distance when known, otherwise the directory's placeholder.
    #[must_use]
    pub fn distance_label(&self) -> String {
        match self.distance_km {
            Some(km) => format!("{km} km"),
            None => self.dealer.distance.clone(),
        }
    }

    /// Whether the dealer can be contacted from the list view.
    #[must_use]
    pub fn is_contactable(&self) -> bool {
        self.dealer.has_stock || self.phone.is_some()
    }
}
