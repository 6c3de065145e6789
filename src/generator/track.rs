//! Geographic track used for simulated playback

use std::fs;

use geo::geometry::{Coord, LineString, Point};
use log::warn;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Track shipped with the crate, a short drive around Semarang
pub const BUILTIN_TRACK: &str = include_str!("../../assets/track.geojson");

/// Geometry of a track feature, coordinates in `(lon, lat)` order
#[derive(Clone, Debug, PartialEq)]
pub enum TrackGeometry {
    Point(Point),
    Line(LineString),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackFeature {
    pub geometry: TrackGeometry,
    pub properties: Map<String, Value>,
}

impl TrackFeature {
    pub fn point(point: Point) -> Self {
        Self {
            geometry: TrackGeometry::Point(point),
            properties: Map::new(),
        }
    }

    pub fn line(line: LineString) -> Self {
        Self {
            geometry: TrackGeometry::Line(line),
            properties: Map::new(),
        }
    }
}

/// Ordered, immutable collection of point and line features
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoTrack {
    features: Vec<TrackFeature>,
}

impl GeoTrack {
    pub fn new(features: Vec<TrackFeature>) -> Self {
        Self { features }
    }

    pub fn empty() -> Self {
        Self { features: vec![] }
    }

    /// The built-in demo track
    pub fn builtin() -> Result<Self, String> {
        Self::from_geojson(BUILTIN_TRACK)
    }

    /// Load a GeoJSON FeatureCollection file
    pub fn load(path: &str) -> Result<Self, String> {
        let data = fs::read_to_string(path)
            .map_err(|e| format!("Failed on read the track file: {}", e.to_string()))?;

        Self::from_geojson(&data)
    }

    /// Parse a GeoJSON FeatureCollection of Point and LineString features
    ///
    /// Features with other geometries, or without a usable geometry, are
    /// skipped.
    pub fn from_geojson(data: &str) -> Result<Self, String> {
        let collection: RawCollection = serde_json::from_str(data)
            .map_err(|e| format!("Failed on parse the track: {}", e.to_string()))?;

        let mut features = vec![];

        for (idx, raw) in collection.features.into_iter().enumerate() {
            let geometry = match raw.geometry.map(parse_geometry) {
                Some(Ok(g)) => g,
                Some(Err(e)) => {
                    warn!("Skipping track feature {}: {}", idx, e);
                    continue;
                }
                None => {
                    warn!("Skipping track feature {}: no geometry", idx);
                    continue;
                }
            };

            features.push(TrackFeature {
                geometry,
                properties: raw.properties.unwrap_or_default(),
            });
        }

        Ok(Self { features })
    }

    /// Encode back into a GeoJSON FeatureCollection
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .features
            .iter()
            .map(|f| {
                let geometry = match &f.geometry {
                    TrackGeometry::Point(p) => json!({
                        "type": "Point",
                        "coordinates": [p.x(), p.y()],
                    }),
                    TrackGeometry::Line(l) => {
                        let coordinates: Vec<[f64; 2]> = l.0.iter().map(|c| [c.x, c.y]).collect();
                        json!({
                            "type": "LineString",
                            "coordinates": coordinates,
                        })
                    }
                };

                json!({
                    "type": "Feature",
                    "properties": f.properties,
                    "geometry": geometry,
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }

    pub fn get(&self, idx: usize) -> Option<&TrackFeature> {
        self.features.get(idx)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[derive(Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Point { coordinates: Vec<f64> },
    LineString { coordinates: Vec<Vec<f64>> },
}

fn parse_geometry(raw: Value) -> Result<TrackGeometry, String> {
    let geometry: RawGeometry = serde_json::from_value(raw)
        .map_err(|e| format!("unsupported geometry: {}", e.to_string()))?;

    match geometry {
        RawGeometry::Point { coordinates } => {
            let c = to_coord(&coordinates)?;
            Ok(TrackGeometry::Point(Point::from(c)))
        }
        RawGeometry::LineString { coordinates } => {
            let coords = coordinates
                .iter()
                .map(|c| to_coord(c))
                .collect::<Result<Vec<Coord>, String>>()?;
            Ok(TrackGeometry::Line(LineString::new(coords)))
        }
    }
}

/// GeoJSON positions are `[lon, lat]`, an optional altitude is ignored
fn to_coord(position: &[f64]) -> Result<Coord, String> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(format!("invalid position {:?}", position)),
    }
}
