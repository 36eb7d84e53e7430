//! Measurement locations and map hints.
//!
//! Turns the scalar rows of a location query into [`Location`]s and derives
//! where a map showing them should be centered.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

const ID_COLUMNS: &[&str] = &["id", "location", "uri", "s"];
const LAT_COLUMNS: &[&str] = &["lat", "latitude"];
const LNG_COLUMNS: &[&str] = &["lng", "lon", "long", "longitude"];
const WKT_COLUMNS: &[&str] = &["wkt", "geometry", "geom"];
const LABEL_COLUMNS: &[&str] = &["label", "name"];
const DESCRIPTION_COLUMNS: &[&str] = &["description", "comment"];

/// Zoom used when fewer than two points are available.
pub const DEFAULT_ZOOM: u8 = 10;
const MIN_ZOOM: u8 = 2;
const MAX_ZOOM: u8 = 18;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }
}

/// A geographic measurement point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Location {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lng: self.lng,
        }
    }

    /// Read a location from a result row.
    ///
    /// Returns `None` when the row lacks an identifier or a usable coordinate.
    pub fn from_row(row: &Map<String, Value>) -> Option<Self> {
        let id = first_text(row, ID_COLUMNS)?;
        let coordinate = match (first_number(row, LAT_COLUMNS), first_number(row, LNG_COLUMNS)) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng),
            _ => first_text(row, WKT_COLUMNS).and_then(|wkt| parse_wkt_point(&wkt)),
        }?;

        Some(Self {
            id,
            lat: coordinate.lat,
            lng: coordinate.lng,
            label: first_text(row, LABEL_COLUMNS),
            description: first_text(row, DESCRIPTION_COLUMNS),
        })
    }
}

/// Map every usable row to a location, keeping the first row per identifier.
pub fn locations_from_rows(rows: &[Map<String, Value>]) -> Vec<Location> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(Location::from_row)
        .filter(|location| seen.insert(location.id.clone()))
        .collect()
}

/// Where to center a map and how far to zoom in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: Option<Coordinate>,
    pub zoom: u8,
}

impl MapView {
    /// Centroid of the points, zoomed to fit their bounding box.
    ///
    /// Fewer than two points get [`DEFAULT_ZOOM`]; a single point is its own
    /// center and no points leave the center unset.
    pub fn fit(points: &[Coordinate]) -> Self {
        match points {
            [] => Self {
                center: None,
                zoom: DEFAULT_ZOOM,
            },
            [only] => Self {
                center: Some(*only),
                zoom: DEFAULT_ZOOM,
            },
            _ => {
                let count = points.len() as f64;
                let lat = points.iter().map(|p| p.lat).sum::<f64>() / count;
                let lng = points.iter().map(|p| p.lng).sum::<f64>() / count;
                Self {
                    center: Some(Coordinate { lat, lng }),
                    zoom: zoom_for_span(bounding_span(points)),
                }
            }
        }
    }
}

fn bounding_span(points: &[Coordinate]) -> f64 {
    let (mut min_lat, mut max_lat) = (f64::MAX, f64::MIN);
    let (mut min_lng, mut max_lng) = (f64::MAX, f64::MIN);
    for p in points {
        min_lat = min_lat.min(p.lat);
        max_lat = max_lat.max(p.lat);
        min_lng = min_lng.min(p.lng);
        max_lng = max_lng.max(p.lng);
    }
    (max_lat - min_lat).max(max_lng - min_lng)
}

fn zoom_for_span(span: f64) -> u8 {
    if span <= f64::EPSILON {
        return MAX_ZOOM;
    }
    let zoom = (360.0 / span).log2().floor();
    zoom.clamp(MIN_ZOOM as f64, MAX_ZOOM as f64) as u8
}

/// Parse `POINT(lng lat)`, optionally preceded by a CRS IRI.
fn parse_wkt_point(wkt: &str) -> Option<Coordinate> {
    let upper = wkt.to_ascii_uppercase();
    let start = upper.find("POINT")?;
    let rest = &wkt[start + "POINT".len()..];
    let open = rest.find('(')?;
    let close = rest.find(')')?;
    if close <= open {
        return None;
    }

    let mut numbers = rest[open + 1..close]
        .split_whitespace()
        .map(|part| part.parse::<f64>());
    let lng = numbers.next()?.ok()?;
    let lat = numbers.next()?.ok()?;
    Coordinate::new(lat, lng)
}

fn first_text(row: &Map<String, Value>, columns: &[&str]) -> Option<String> {
    columns.iter().find_map(|column| match row.get(*column) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    })
}

fn first_number(row: &Map<String, Value>, columns: &[&str]) -> Option<f64> {
    columns.iter().find_map(|column| match row.get(*column) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::backends::stub::row;
    use serde_json::json;

    #[test]
    fn test_location_from_lat_lng_columns() {
        let location = Location::from_row(&row(&[
            ("id", json!("loc1")),
            ("lat", json!(51.21)),
            ("lng", json!("4.40")),
            ("label", json!("Oostende haven")),
        ]))
        .unwrap();
        assert_eq!(location.id, "loc1");
        assert_eq!(location.lat, 51.21);
        assert_eq!(location.lng, 4.40);
        assert_eq!(location.label.as_deref(), Some("Oostende haven"));
    }

    #[test]
    fn test_location_from_wkt() {
        let location = Location::from_row(&row(&[
            ("location", json!("http://example.org/loc2")),
            (
                "wkt",
                json!("<http://www.opengis.net/def/crs/OGC/1.3/CRS84> Point(4.41 51.22)"),
            ),
        ]))
        .unwrap();
        assert_eq!(location.lat, 51.22);
        assert_eq!(location.lng, 4.41);
    }

    #[test]
    fn test_rows_without_id_or_coordinate_are_skipped() {
        assert!(Location::from_row(&row(&[("lat", json!(1.0)), ("lng", json!(2.0))])).is_none());
        assert!(Location::from_row(&row(&[("id", json!("x")), ("lat", json!(1.0))])).is_none());
        assert!(
            Location::from_row(&row(&[
                ("id", json!("x")),
                ("lat", json!(123.0)),
                ("lng", json!(2.0))
            ]))
            .is_none()
        );
    }

    #[test]
    fn test_duplicate_ids_keep_first_row() {
        let rows = vec![
            row(&[("id", json!("a")), ("lat", json!(1.0)), ("lng", json!(1.0))]),
            row(&[("id", json!("a")), ("lat", json!(2.0)), ("lng", json!(2.0))]),
            row(&[("id", json!("b")), ("lat", json!(3.0)), ("lng", json!(3.0))]),
        ];
        let locations = locations_from_rows(&rows);
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].lat, 1.0);
    }

    #[test]
    fn test_fit_two_points() {
        let view = MapView::fit(&[
            Coordinate { lat: 51.21, lng: 4.40 },
            Coordinate { lat: 51.22, lng: 4.41 },
        ]);
        let center = view.center.unwrap();
        assert!((center.lat - 51.215).abs() < 1e-9);
        assert!((center.lng - 4.405).abs() < 1e-9);
        assert_eq!(view.zoom, 15);
    }

    #[test]
    fn test_fit_fewer_than_two_points_uses_default_zoom() {
        assert_eq!(MapView::fit(&[]).zoom, DEFAULT_ZOOM);
        assert!(MapView::fit(&[]).center.is_none());

        let single = Coordinate { lat: 50.0, lng: 3.0 };
        let view = MapView::fit(&[single]);
        assert_eq!(view.center, Some(single));
        assert_eq!(view.zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn test_zoom_is_clamped() {
        assert_eq!(zoom_for_span(0.0), MAX_ZOOM);
        assert_eq!(zoom_for_span(300.0), MIN_ZOOM);
    }
}
