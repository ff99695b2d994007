//! In-memory map scene for enriched dealers.
//!
//! A scene holds the markers currently placed on the map, the click content
//! each dealer marker reveals, and the bounds the viewport is fitted to.
//! Every render releases the previous markers first, so re-rendering the
//! same scene never accumulates stale markers.

use agroscan_core::{EnrichedDealer, GeoBounds, GeoPoint};

const DEFAULT_ZOOM: u8 = 12;

const STOCKED_SCALE: u8 = 10;
const UNSTOCKED_SCALE: u8 = 7;
const VERIFIED_FILL: &str = "#10B981";
const UNVERIFIED_FILL: &str = "#9CA3AF";

const USER_SCALE: u8 = 6;
const USER_FILL: &str = "#3B82F6";
const USER_STROKE: &str = "#0ea5e9";

pub type MarkerId = u64;

/// Circle symbol drawn for a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerIcon {
    pub scale: u8,
    pub fill_color: &'static str,
    pub fill_opacity: f32,
    pub stroke_weight: u8,
    pub stroke_color: Option<&'static str>,
}

impl MarkerIcon {
    /// Size keyed by stock, color keyed by verification.
    #[must_use]
    pub fn for_dealer(has_stock: bool, verified: bool) -> Self {
        Self {
            scale: if has_stock {
                STOCKED_SCALE
            } else {
                UNSTOCKED_SCALE
            },
            fill_color: if verified {
                VERIFIED_FILL
            } else {
                UNVERIFIED_FILL
            },
            fill_opacity: 1.0,
            stroke_weight: 0,
            stroke_color: None,
        }
    }

    #[must_use]
    pub fn user() -> Self {
        Self {
            scale: USER_SCALE,
            fill_color: USER_FILL,
            fill_opacity: 1.0,
            stroke_weight: 2,
            stroke_color: Some(USER_STROKE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    User,
    Dealer { dealer_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub kind: MarkerKind,
    pub position: GeoPoint,
    pub title: String,
    pub icon: MarkerIcon,
    /// HTML shown when the marker is clicked. `None` for the user marker.
    pub info_html: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MapScene {
    center: GeoPoint,
    zoom: u8,
    markers: Vec<Marker>,
    fitted_bounds: Option<GeoBounds>,
    next_marker_id: MarkerId,
    released_total: usize,
}

impl Default for MapScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MapScene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            center: GeoPoint::origin(),
            zoom: DEFAULT_ZOOM,
            markers: Vec::new(),
            fitted_bounds: None,
            next_marker_id: 1,
            released_total: 0,
        }
    }

    /// Replaces the scene contents with a user marker at `center` and one
    /// marker per dealer. The viewport is fitted only when there is at least
    /// one dealer.
    pub fn render(&mut self, center: GeoPoint, dealers: &[EnrichedDealer]) {
        self.release();
        self.center = center;
        self.zoom = DEFAULT_ZOOM;

        let mut bounds = GeoBounds::new();

        self.place(Marker {
            id: 0,
            kind: MarkerKind::User,
            position: center,
            title: "You".to_owned(),
            icon: MarkerIcon::user(),
            info_html: None,
        });
        bounds.extend(center);

        for enriched in dealers {
            let dealer = &enriched.dealer;
            self.place(Marker {
                id: 0,
                kind: MarkerKind::Dealer {
                    dealer_id: dealer.id.clone(),
                },
                position: dealer.position(),
                title: dealer.name.clone(),
                icon: MarkerIcon::for_dealer(dealer.has_stock, enriched.verified),
                info_html: Some(info_window_html(enriched)),
            });
            bounds.extend(dealer.position());
        }

        if !dealers.is_empty() {
            self.fitted_bounds = Some(bounds);
        }
    }

    /// Removes every marker from the map and returns how many were removed.
    pub fn release(&mut self) -> usize {
        let removed = self.markers.len();
        self.markers.clear();
        self.fitted_bounds = None;
        self.released_total += removed;
        if removed > 0 {
            tracing::debug!(removed, "released map markers");
        }
        removed
    }

    /// Content revealed by clicking marker `id`.
    #[must_use]
    pub fn click(&self, id: MarkerId) -> Option<&str> {
        self.marker(id).and_then(|m| m.info_html.as_deref())
    }

    #[must_use]
    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn dealer_markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers
            .iter()
            .filter(|m| matches!(m.kind, MarkerKind::Dealer { .. }))
    }

    #[must_use]
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    #[must_use]
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    #[must_use]
    pub fn fitted_bounds(&self) -> Option<&GeoBounds> {
        self.fitted_bounds.as_ref()
    }

    /// Markers removed over the scene's lifetime.
    #[must_use]
    pub fn released_total(&self) -> usize {
        self.released_total
    }

    fn place(&mut self, mut marker: Marker) {
        marker.id = self.next_marker_id;
        self.next_marker_id += 1;
        self.markers.push(marker);
    }
}

fn info_window_html(enriched: &EnrichedDealer) -> String {
    let dealer = &enriched.dealer;
    let phone_html = enriched.phone.as_deref().map_or_else(String::new, |phone| {
        let phone = escape_html(phone);
        format!("<div><a href=\"tel:{phone}\">{phone}</a></div>")
    });
    format!(
        "<div style=\"min-width:160px;color:#111\"><strong>{}</strong><div>{}</div>{phone_html}</div>",
        escape_html(&dealer.name),
        escape_html(&dealer.address),
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use agroscan_core::Dealer;

    use super::*;

    fn enriched(id: &str, has_stock: bool, verified: bool, phone: Option<&str>) -> EnrichedDealer {
        EnrichedDealer {
            dealer: Dealer {
                id: id.to_owned(),
                name: format!("Dealer {id}"),
                address: "Market Yard, Pune".to_owned(),
                distance: String::new(),
                has_stock,
                lat: 18.5 + f64::from(id.len() as u8) / 100.0,
                lng: 73.8,
            },
            verified,
            phone: phone.map(str::to_owned),
            distance_km: Some(1.0),
        }
    }

    #[test]
    fn render_places_user_plus_one_marker_per_dealer() {
        let mut scene = MapScene::new();
        let dealers = vec![
            enriched("1", true, true, Some("020 111")),
            enriched("22", false, false, None),
        ];
        scene.render(GeoPoint::new(18.52, 73.86), &dealers);

        assert_eq!(scene.markers().len(), 3);
        assert_eq!(scene.dealer_markers().count(), 2);
        let user = &scene.markers()[0];
        assert_eq!(user.kind, MarkerKind::User);
        assert_eq!(user.title, "You");
        assert_eq!(user.icon, MarkerIcon::user());
    }

    #[test]
    fn dealer_icon_keyed_by_stock_and_verification() {
        let icon = MarkerIcon::for_dealer(true, true);
        assert_eq!((icon.scale, icon.fill_color), (10, "#10B981"));
        let icon = MarkerIcon::for_dealer(false, false);
        assert_eq!((icon.scale, icon.fill_color), (7, "#9CA3AF"));
    }

    #[test]
    fn click_reveals_name_address_and_phone() {
        let mut scene = MapScene::new();
        scene.render(
            GeoPoint::new(18.52, 73.86),
            &[enriched("1", true, true, Some("020 2612 3456"))],
        );
        let id = scene.dealer_markers().next().unwrap().id;
        let html = scene.click(id).unwrap();
        assert!(html.contains("<strong>Dealer 1</strong>"));
        assert!(html.contains("Market Yard, Pune"));
        assert!(html.contains("href=\"tel:020 2612 3456\""));
    }

    #[test]
    fn click_content_is_escaped() {
        let mut d = enriched("1", true, false, None);
        d.dealer.name = "<script>alert(1)</script>".to_owned();
        let mut scene = MapScene::new();
        scene.render(GeoPoint::origin(), &[d]);
        let id = scene.dealer_markers().next().unwrap().id;
        let html = scene.click(id).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("tel:"));
    }

    #[test]
    fn rerender_releases_previous_markers() {
        let mut scene = MapScene::new();
        let dealers = vec![enriched("1", true, true, None), enriched("22", true, false, None)];
        scene.render(GeoPoint::new(18.52, 73.86), &dealers);
        let first_ids: Vec<MarkerId> = scene.markers().iter().map(|m| m.id).collect();

        scene.render(GeoPoint::new(18.52, 73.86), &dealers[..1]);
        assert_eq!(scene.markers().len(), 2);
        assert_eq!(scene.released_total(), 3);
        assert!(scene.markers().iter().all(|m| !first_ids.contains(&m.id)));
    }

    #[test]
    fn bounds_fitted_only_with_dealers() {
        let mut scene = MapScene::new();
        scene.render(GeoPoint::new(18.52, 73.86), &[]);
        assert_eq!(scene.markers().len(), 1);
        assert!(scene.fitted_bounds().is_none());

        let dealers = vec![enriched("1", true, true, None)];
        scene.render(GeoPoint::new(18.52, 73.86), &dealers);
        let bounds = scene.fitted_bounds().unwrap();
        let dealer = dealers[0].dealer.position();
        assert_eq!(bounds.south_west(), Some(GeoPoint::new(dealer.lat, 73.8)));
        assert_eq!(bounds.north_east(), Some(GeoPoint::new(18.52, 73.86)));
    }

    #[test]
    fn release_clears_everything() {
        let mut scene = MapScene::new();
        scene.render(GeoPoint::origin(), &[enriched("1", true, true, None)]);
        assert_eq!(scene.release(), 2);
        assert!(scene.markers().is_empty());
        assert!(scene.fitted_bounds().is_none());
        assert_eq!(scene.release(), 0);
    }
}
