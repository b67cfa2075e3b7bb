#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Point-in-territory membership for WSO boundaries.
//!
//! Territories arrive as `GeoJSON` text or values and are decoded into
//! [`TerritoryGeometry`] by [`decode`]. Membership is a plain ray-casting
//! test over each polygon's outer ring ([`membership`]). This is the only
//! point-in-polygon implementation in the workspace; every caller that
//! filters clubs or meets by territory goes through it.

pub mod decode;
pub mod membership;

use thiserror::Error;
use wso_atlas_geography_models::{Entity, InvalidCoordinatesError};

pub use decode::{decode_geometry, parse_territory};
pub use membership::{point_in_geometry, point_in_ring};
pub use wso_atlas_geography_models::{LonLat, TerritoryGeometry};

/// Errors from geographic input validation.
#[derive(Debug, Error)]
pub enum GeoError {
    /// A coordinate pair was out of range.
    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinatesError),
}

/// Tests an entity's stored coordinates against `geometry`.
///
/// Returns `Ok(None)` when the entity has no coordinates and so cannot
/// be classified.
///
/// # Errors
///
/// Returns [`GeoError::InvalidCoordinates`] if the coordinates are out
/// of range.
pub fn entity_in_geometry(
    entity: &Entity,
    geometry: &TerritoryGeometry,
) -> Result<Option<bool>, GeoError> {
    Ok(entity
        .point()?
        .map(|point| point_in_geometry(point, geometry)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wso_atlas_geography_models::EntityKind;

    fn square() -> TerritoryGeometry {
        TerritoryGeometry::Polygon(vec![vec![
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 10.0],
            [0.0, 10.0],
        ]])
    }

    #[test]
    fn entity_without_coordinates_is_unclassified() {
        let entity = Entity::new(EntityKind::Club, "No Address");
        assert!(entity_in_geometry(&entity, &square()).unwrap().is_none());
    }

    #[test]
    fn entity_with_coordinates_is_tested() {
        let inside = Entity::new(EntityKind::Club, "Inside").at(5.0, 5.0);
        let outside = Entity::new(EntityKind::Club, "Outside").at(50.0, 5.0);
        assert_eq!(entity_in_geometry(&inside, &square()).unwrap(), Some(true));
        assert_eq!(entity_in_geometry(&outside, &square()).unwrap(), Some(false));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let entity = Entity::new(EntityKind::Meet, "Bad").at(5.0, 95.0);
        assert!(matches!(
            entity_in_geometry(&entity, &square()),
            Err(GeoError::InvalidCoordinates(_))
        ));
    }
}
