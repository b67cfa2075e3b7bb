//! `GeoJSON` to [`TerritoryGeometry`] decoding.
//!
//! Decoding never fails. Shapes other than `Polygon`, `MultiPolygon` and
//! `Feature`, and anything the `geojson` parser rejects, become
//! [`TerritoryGeometry::Unsupported`], which contains no points.

use geojson::{GeoJson, Geometry, Value};
use wso_atlas_geography_models::{Position, Ring, TerritoryGeometry};

/// Decodes a `GeoJSON` value into a territory geometry.
#[must_use]
pub fn decode_geometry(value: &serde_json::Value) -> TerritoryGeometry {
    match GeoJson::from_json_value(value.clone()) {
        Ok(GeoJson::Geometry(geometry)) => from_geometry(&geometry),
        Ok(GeoJson::Feature(feature)) => TerritoryGeometry::Feature(
            feature
                .geometry
                .as_ref()
                .map(|geometry| Box::new(from_geometry(geometry))),
        ),
        Ok(GeoJson::FeatureCollection(_)) => unsupported("FeatureCollection"),
        Err(e) => {
            log::debug!("Unparseable territory GeoJSON: {e}");
            TerritoryGeometry::Unsupported(type_tag(value))
        }
    }
}

/// Parses a stored territory column.
///
/// `None`, blank text and a JSON `null` all mean "no geometry loaded"
/// and return `None`. Text that is not JSON at all decodes to
/// [`TerritoryGeometry::Unsupported`].
#[must_use]
pub fn parse_territory(text: Option<&str>) -> Option<TerritoryGeometry> {
    let text = text.map(str::trim).filter(|t| !t.is_empty())?;

    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Null) => None,
        Ok(value) => Some(decode_geometry(&value)),
        Err(e) => {
            log::warn!("Territory column is not valid JSON: {e}");
            Some(TerritoryGeometry::Unsupported(None))
        }
    }
}

fn from_geometry(geometry: &Geometry) -> TerritoryGeometry {
    match &geometry.value {
        Value::Polygon(rings) => convert_rings(rings).map_or_else(
            || unsupported("Polygon"),
            TerritoryGeometry::Polygon,
        ),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .map(|rings| convert_rings(rings))
            .collect::<Option<Vec<_>>>()
            .map_or_else(
                || unsupported("MultiPolygon"),
                TerritoryGeometry::MultiPolygon,
            ),
        Value::Point(_) => unsupported("Point"),
        Value::MultiPoint(_) => unsupported("MultiPoint"),
        Value::LineString(_) => unsupported("LineString"),
        Value::MultiLineString(_) => unsupported("MultiLineString"),
        Value::GeometryCollection(_) => unsupported("GeometryCollection"),
    }
}

fn unsupported(tag: &str) -> TerritoryGeometry {
    TerritoryGeometry::Unsupported(Some(tag.to_string()))
}

fn convert_rings(rings: &[Vec<Vec<f64>>]) -> Option<Vec<Ring>> {
    rings
        .iter()
        .map(|ring| ring.iter().map(|p| convert_position(p)).collect())
        .collect()
}

/// Takes `[lon, lat]` from a position, ignoring any altitude.
fn convert_position(position: &[f64]) -> Option<Position> {
    match position {
        [lon, lat, ..] => Some([*lon, *lat]),
        _ => None,
    }
}

fn type_tag(value: &serde_json::Value) -> Option<String> {
    value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}
