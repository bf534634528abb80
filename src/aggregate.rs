use std::collections::HashSet;

use geo::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use tracing::warn;

use crate::config::{AppConfig, ProcessingConfig};
use crate::fetch::fetch_features;
use crate::types::{Dataset, Hotspot, Severity};

pub struct AggregateOptions {
    pub excluded_severities: HashSet<Severity>,
    pub manual_hotspots: Vec<Hotspot>,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        AggregateOptions {
            excluded_severities: HashSet::from([Severity::Low]),
            manual_hotspots: manual_hotspots(),
        }
    }
}

impl AggregateOptions {
    pub fn from_config(processing: &ProcessingConfig) -> Self {
        AggregateOptions {
            excluded_severities: processing.excluded_severities.clone(),
            manual_hotspots: manual_hotspots(),
        }
    }
}

/// Known locations without live polygon backing. Appended to every output in
/// declaration order, for both datasets alike.
pub fn manual_hotspots() -> Vec<Hotspot> {
    vec![
        Hotspot {
            point: Point::new(80.2824, 13.0500),
            severity: Severity::Critical,
            name: "Marina Beach".to_string(),
        },
        Hotspot {
            point: Point::new(83.2875, 17.6868),
            severity: Severity::High,
            name: "Visakhapatnam Harbour".to_string(),
        },
        Hotspot {
            point: Point::new(79.8380, 11.9165),
            severity: Severity::Moderate,
            name: "Puducherry Promenade".to_string(),
        },
    ]
}

/// Fetch the dataset's geometry source and derive its hotspots. Fetch
/// failures degrade to the manual hotspot set alone.
pub async fn compute_hotspots(
    client: &reqwest::Client,
    config: &AppConfig,
    dataset: Dataset,
) -> Vec<Hotspot> {
    let features = fetch_features(client, config.source_url(dataset)).await;
    let options = AggregateOptions::from_config(&config.processing);
    aggregate_features(features, &options)
}

/// The pure aggregation step: one severity-tagged point per surviving source
/// feature, in processing order, followed by the manual hotspots.
///
/// Deterministic for a given feature list; no dedup, no sorting.
pub fn aggregate_features(features: Vec<Feature>, options: &AggregateOptions) -> Vec<Hotspot> {
    let mut hotspots = Vec::with_capacity(features.len() + options.manual_hotspots.len());

    for feature in features {
        let severity = resolve_severity(&feature);
        if options.excluded_severities.contains(&severity) {
            continue;
        }

        let point = match feature_point(&feature) {
            Some(p) => p,
            None => continue,
        };

        hotspots.push(Hotspot {
            point,
            severity,
            name: resolve_name(&feature),
        });
    }

    hotspots.extend(options.manual_hotspots.iter().cloned());
    hotspots
}

/// Severity fallback chain: `severity` property, then `zone`, then Default.
fn resolve_severity(feature: &Feature) -> Severity {
    property_str(feature, "severity")
        .or_else(|| property_str(feature, "zone"))
        .map(Severity::parse)
        .unwrap_or(Severity::Default)
}

/// Display name fallback chain: `name`, then `title`, then "Hotspot".
fn resolve_name(feature: &Feature) -> String {
    property_str(feature, "name")
        .or_else(|| property_str(feature, "title"))
        .unwrap_or("Hotspot")
        .to_string()
}

fn property_str<'a>(feature: &'a Feature, key: &str) -> Option<&'a str> {
    feature.properties.as_ref()?.get(key)?.as_str()
}

/// Reduce a feature's geometry to a single representative point.
///
/// Polygons use the centroid of their exterior ring; multi-polygons use the
/// first polygon's exterior ring only; points pass through unchanged. Other
/// geometry kinds, missing geometry, and unconvertible coordinates skip the
/// feature.
fn feature_point(feature: &Feature) -> Option<Point<f64>> {
    let geometry = feature.geometry.as_ref()?;
    let geo_geom: geo::Geometry<f64> = match geometry.value.clone().try_into() {
        Ok(g) => g,
        Err(e) => {
            warn!("skipping feature with unconvertible geometry: {:?}", e);
            return None;
        }
    };

    match geo_geom {
        geo::Geometry::Polygon(polygon) => ring_centroid(polygon.exterior()),
        geo::Geometry::MultiPolygon(mp) => {
            mp.0.first().and_then(|polygon| ring_centroid(polygon.exterior()))
        }
        geo::Geometry::Point(point) => Some(point),
        _ => None,
    }
}

/// Signed-area (shoelace) centroid of a ring, with wraparound pairing of the
/// last and first vertex. A closing vertex that repeats the first is dropped
/// so it does not double-count in the degenerate mean.
///
/// If the signed area is exactly zero (collinear or single-point ring) the
/// centroid falls back to the arithmetic mean of the vertices; an empty ring
/// yields None.
fn ring_centroid(ring: &LineString<f64>) -> Option<Point<f64>> {
    let mut coords: &[Coord<f64>] = &ring.0;
    if coords.len() > 1 && coords.first() == coords.last() {
        coords = &coords[..coords.len() - 1];
    }
    if coords.is_empty() {
        return None;
    }

    let n = coords.len();
    let mut area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;

    for i in 0..n {
        let j = (i + 1) % n;
        let cross = coords[i].x * coords[j].y - coords[j].x * coords[i].y;
        area += cross;
        cx += (coords[i].x + coords[j].x) * cross;
        cy += (coords[i].y + coords[j].y) * cross;
    }
    area *= 0.5;

    if area == 0.0 {
        let sx: f64 = coords.iter().map(|c| c.x).sum();
        let sy: f64 = coords.iter().map(|c| c.y).sum();
        return Some(Point::new(sx / n as f64, sy / n as f64));
    }

    Some(Point::new(cx / (6.0 * area), cy / (6.0 * area)))
}

/// Package hotspots as a GeoJSON FeatureCollection of points for direct
/// map-layer consumption.
pub fn to_feature_collection(hotspots: &[Hotspot]) -> FeatureCollection {
    let features = hotspots
        .iter()
        .map(|hotspot| {
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), JsonValue::from(hotspot.name.clone()));
            properties.insert(
                "severity".to_string(),
                JsonValue::from(hotspot.severity.as_str()),
            );
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![
                    hotspot.point.x(),
                    hotspot.point.y(),
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
