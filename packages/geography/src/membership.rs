//! Ray-casting membership test.
//!
//! A horizontal ray is cast from the point toward +x and each crossing
//! edge toggles the result. Points exactly on an edge or vertex follow
//! whatever the crossing formula yields; they are not special-cased.
//! For the square `(0,0) (10,0) (10,10) (0,10)`, `(10, 5)` is outside
//! and `(0, 5)` is inside.

use wso_atlas_geography_models::{LonLat, Position, TerritoryGeometry};

/// Tests whether `point` lies inside the closed ring.
///
/// The ring is implicitly closed; a repeated closing vertex adds a
/// zero-length edge and does not change the result. Rings with fewer
/// than three vertices contain nothing.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn point_in_ring(point: LonLat, ring: &[Position]) -> bool {
    let (x, y) = (point.lon, point.lat);
    let mut inside = false;

    let Some(mut j) = ring.len().checked_sub(1) else {
        return false;
    };

    for (i, &[xi, yi]) in ring.iter().enumerate() {
        let [xj, yj] = ring[j];
        // Evaluation order is part of the edge behavior; keep it as is.
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Tests whether `point` lies inside any polygon of `geometry`.
///
/// Only each polygon's outer ring is tested; holes are ignored.
/// `Feature` envelopes are unwrapped, and a null or unsupported geometry
/// contains no points.
#[must_use]
pub fn point_in_geometry(point: LonLat, geometry: &TerritoryGeometry) -> bool {
    geometry
        .outer_rings()
        .into_iter()
        .any(|ring| point_in_ring(point, ring))
}
