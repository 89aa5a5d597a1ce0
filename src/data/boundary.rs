//! Boundary Layer Module
//! Optional GeoJSON region outlines for the map view, keyed by region name.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum BoundaryError {
    #[error("Failed to read boundary file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to fetch boundary layer: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid boundary JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Boundary layer is not a GeoJSON FeatureCollection")]
    NotFeatureCollection,
}

/// Outline of one region: one or more closed rings of `[lon, lat]` points.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionShape {
    pub rings: Vec<Vec<[f64; 2]>>,
}

/// Region outlines keyed by region name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryLayer {
    shapes: BTreeMap<String, RegionShape>,
}

impl BoundaryLayer {
    pub fn get(&self, region: &str) -> Option<&RegionShape> {
        self.shapes.get(region)
    }

    pub fn regions(&self) -> impl Iterator<Item = (&String, &RegionShape)> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Parse a FeatureCollection, keying features by `key_property`.
    /// Features without the property or without polygon geometry are skipped.
    pub fn from_geojson(json: &str, key_property: &str) -> Result<Self, BoundaryError> {
        let root: Value = serde_json::from_str(json)?;
        if root.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(BoundaryError::NotFeatureCollection);
        }
        let features = root
            .get("features")
            .and_then(Value::as_array)
            .ok_or(BoundaryError::NotFeatureCollection)?;

        let mut shapes = BTreeMap::new();
        for feature in features {
            let Some(name) = feature
                .get("properties")
                .and_then(|p| p.get(key_property))
                .and_then(Value::as_str)
            else {
                continue;
            };
            let Some(rings) = feature.get("geometry").and_then(Self::geometry_rings) else {
                continue;
            };
            shapes.insert(name.to_string(), RegionShape { rings });
        }

        Ok(Self { shapes })
    }

    fn geometry_rings(geometry: &Value) -> Option<Vec<Vec<[f64; 2]>>> {
        let coordinates = geometry.get("coordinates")?;
        match geometry.get("type")?.as_str()? {
            "Polygon" => Some(Self::polygon_rings(coordinates)),
            "MultiPolygon" => Some(
                coordinates
                    .as_array()?
                    .iter()
                    .flat_map(Self::polygon_rings)
                    .collect(),
            ),
            _ => None,
        }
    }

    fn polygon_rings(polygon: &Value) -> Vec<Vec<[f64; 2]>> {
        polygon
            .as_array()
            .map(|rings| {
                rings
                    .iter()
                    .filter_map(Value::as_array)
                    .map(|ring| {
                        ring.iter()
                            .filter_map(|pt| {
                                let pt = pt.as_array()?;
                                Some([pt.first()?.as_f64()?, pt.get(1)?.as_f64()?])
                            })
                            .collect::<Vec<_>>()
                    })
                    .filter(|ring| ring.len() >= 3)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Read a boundary layer from a file path or an `http(s)://` URL.
pub fn fetch_boundaries(
    source: &str,
    key_property: &str,
    timeout: Duration,
) -> Result<BoundaryLayer, BoundaryError> {
    let json = if source.starts_with("http://") || source.starts_with("https://") {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        client.get(source).send()?.error_for_status()?.text()?
    } else {
        std::fs::read_to_string(Path::new(source))?
    };
    BoundaryLayer::from_geojson(&json, key_property)
}

/// Load the boundary layer, downgrading every failure to "no overlay".
pub fn load_boundaries(source: &str, key_property: &str, timeout: Duration) -> Option<BoundaryLayer> {
    match fetch_boundaries(source, key_property, timeout) {
        Ok(layer) if layer.is_empty() => {
            warn!(source, key_property, "Boundary layer has no polygon features with the key property");
            None
        }
        Ok(layer) => {
            info!(source, regions = layer.len(), "Boundary layer loaded");
            Some(layer)
        }
        Err(e) => {
            warn!(source, error = %e, "Boundary layer unavailable, map overlay disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Jaranwala", "code": "JRW"},
                "geometry": {"type": "Polygon", "coordinates": [[[73.3, 31.2], [73.5, 31.2], [73.5, 31.4], [73.3, 31.2]]]}
            },
            {
                "type": "Feature",
                "properties": {"name": "Samundri"},
                "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[72.9, 31.0], [73.0, 31.0], [73.0, 31.1], [72.9, 31.0]]],
                    [[[72.8, 31.0], [72.85, 31.0], [72.85, 31.05], [72.8, 31.0]]]
                ]}
            },
            {
                "type": "Feature",
                "properties": {"code": "UNNAMED"},
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}
            },
            {
                "type": "Feature",
                "properties": {"name": "Landmark"},
                "geometry": {"type": "Point", "coordinates": [73.1, 31.4]}
            }
        ]
    }"#;

    #[test]
    fn test_polygons_keyed_by_property() {
        let layer = BoundaryLayer::from_geojson(GEOJSON, "name").unwrap();
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.get("Jaranwala").unwrap().rings.len(), 1);
        assert_eq!(layer.get("Samundri").unwrap().rings.len(), 2);
        assert!(layer.get("Landmark").is_none());
    }

    #[test]
    fn test_alternate_key_property() {
        let layer = BoundaryLayer::from_geojson(GEOJSON, "code").unwrap();
        assert_eq!(layer.len(), 2);
        assert!(layer.get("JRW").is_some());
        assert!(layer.get("UNNAMED").is_some());
    }

    #[test]
    fn test_rejects_non_collection() {
        let err = BoundaryLayer::from_geojson(r#"{"type": "Feature"}"#, "name").unwrap_err();
        assert!(matches!(err, BoundaryError::NotFeatureCollection));
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GEOJSON.as_bytes()).unwrap();
        let source = file.path().to_string_lossy().to_string();

        let layer = load_boundaries(&source, "name", Duration::from_secs(1)).unwrap();
        assert_eq!(layer.len(), 2);

        assert!(load_boundaries("/nonexistent/tehsils.geojson", "name", Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_layer_without_matching_features_is_dropped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GEOJSON.as_bytes()).unwrap();
        let source = file.path().to_string_lossy().to_string();

        assert!(load_boundaries(&source, "district_code", Duration::from_secs(1)).is_none());
    }
}
