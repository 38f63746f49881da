use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Influencer attribution embedded in a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencerRef {
    pub display_name: String,
    pub username: String,
}

/// A recommended dish list published by an influencer for a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub dishes: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    /// Paid placements double as active promotional offers in list ordering
    #[serde(default)]
    pub sponsored: bool,
    pub influencer: InfluencerRef,
}

/// A place in the catalog snapshot a discovery page renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub position: GeoPoint,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

impl Place {
    /// Whether any recommendation at this place is a sponsored offer
    pub fn has_active_offer(&self) -> bool {
        self.recommendations.iter().any(|r| r.sponsored)
    }
}

/// Marker payload for the map view
///
/// Marker order is independent of list order; selection state is a UI
/// concern and lives outside this crate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: String,
    pub name: String,
    pub address: String,
    pub position: GeoPoint,
}

impl From<&Place> for MapMarker {
    fn from(place: &Place) -> Self {
        Self {
            id: place.id.clone(),
            name: place.name.clone(),
            address: place.address.clone(),
            position: place.position,
        }
    }
}

/// A list-view row: the place plus proximity annotations when the visitor
/// location is known
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    pub place: Place,
    pub distance_km: Option<f64>,
    pub distance_label: Option<String>,
}
