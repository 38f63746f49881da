use crate::models::place::{GeoPoint, ListEntry, MapMarker, Place};
use crate::models::EventKind;
use crate::services::geo;

/// Ordering applied to the list view when no visitor position is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackOrdering {
    /// Places with an active offer first, alphabetical within each group
    #[default]
    OffersFirst,
    /// Plain alphabetical by place name
    ByName,
}

/// Which presentation of the discovery surface the visitor is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Map,
    List,
}

impl ViewMode {
    /// The impression event emitted when this view becomes active
    pub fn event_kind(&self) -> EventKind {
        match self {
            ViewMode::Map => EventKind::MapView,
            ViewMode::List => EventKind::ListView,
        }
    }
}

/// Orders places for the list view
///
/// With a visitor position, places are sorted nearest-first and annotated
/// with their distance; the sort is stable, so places at identical distances
/// keep their input order. Without a position the fallback ordering applies
/// and no distance annotations are produced.
pub fn compose_list(
    places: Vec<Place>,
    visitor: Option<GeoPoint>,
    fallback: FallbackOrdering,
) -> Vec<ListEntry> {
    match visitor {
        Some(origin) => {
            let mut entries: Vec<ListEntry> = places
                .into_iter()
                .map(|place| {
                    let km = geo::distance_km(origin, place.position);
                    ListEntry {
                        place,
                        distance_km: Some(km),
                        distance_label: Some(geo::format_distance(km)),
                    }
                })
                .collect();

            entries.sort_by(|a, b| {
                // Annotated entries always carry a distance here
                let da = a.distance_km.unwrap_or(f64::MAX);
                let db = b.distance_km.unwrap_or(f64::MAX);
                da.total_cmp(&db)
            });

            entries
        }
        None => {
            let mut places = places;
            match fallback {
                FallbackOrdering::OffersFirst => {
                    places.sort_by_key(|p| (!p.has_active_offer(), p.name.to_lowercase()));
                }
                FallbackOrdering::ByName => {
                    places.sort_by_key(|p| p.name.to_lowercase());
                }
            }

            places
                .into_iter()
                .map(|place| ListEntry {
                    place,
                    distance_km: None,
                    distance_label: None,
                })
                .collect()
        }
    }
}

/// Projects places into map markers, preserving input order
pub fn markers(places: &[Place]) -> Vec<MapMarker> {
    places.iter().map(MapMarker::from).collect()
}
