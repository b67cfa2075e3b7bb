#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial index over WSO territories.
//!
//! Built once from the loaded boundaries, then used to find the
//! territory containing each club or meet without testing every
//! boundary. Candidate boundaries come from an R-tree over bounding
//! boxes; the final decision is always the ray-casting test in
//! `wso_atlas_geography`.

use std::collections::BTreeSet;

use rstar::{AABB, RTree, RTreeObject};
use wso_atlas_geography::point_in_geometry;
use wso_atlas_geography_models::{Boundary, LonLat, TerritoryGeometry};

/// A territory stored in the R-tree with its input position.
struct TerritoryEntry {
    ordinal: usize,
    name: String,
    envelope: AABB<[f64; 2]>,
    geometry: TerritoryGeometry,
}

impl RTreeObject for TerritoryEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built index of territory geometries.
///
/// Boundaries without geometry are remembered by name so that callers
/// can fall back to stored labels for them.
pub struct TerritoryIndex {
    tree: RTree<TerritoryEntry>,
    unloaded: BTreeSet<String>,
    loaded: BTreeSet<String>,
}

impl TerritoryIndex {
    /// Builds the index from boundaries in priority order.
    ///
    /// Geometries with no outer ring contain nothing and are not
    /// inserted, but still count as loaded.
    #[must_use]
    pub fn build(boundaries: &[Boundary]) -> Self {
        let mut entries = Vec::new();
        let mut unloaded = BTreeSet::new();
        let mut loaded = BTreeSet::new();

        for (ordinal, boundary) in boundaries.iter().enumerate() {
            let Some(geometry) = &boundary.geometry else {
                log::debug!("Territory '{}' has no geometry", boundary.name);
                unloaded.insert(boundary.name.clone());
                continue;
            };
            loaded.insert(boundary.name.clone());

            let Some(envelope) = compute_envelope(geometry) else {
                log::warn!(
                    "Territory '{}' has no usable polygon; it will contain no points",
                    boundary.name
                );
                continue;
            };

            entries.push(TerritoryEntry {
                ordinal,
                name: boundary.name.clone(),
                envelope,
                geometry: geometry.clone(),
            });
        }

        log::info!(
            "Indexed {} territories ({} without geometry)",
            entries.len(),
            unloaded.len()
        );

        Self {
            tree: RTree::bulk_load(entries),
            unloaded,
            loaded,
        }
    }

    /// Finds the territory containing `point`.
    ///
    /// Territories may overlap; the one listed first when the index was
    /// built wins.
    #[must_use]
    pub fn lookup(&self, point: LonLat) -> Option<&str> {
        let query_env = AABB::from_point(point.position());

        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| point_in_geometry(point, &entry.geometry))
            .min_by_key(|entry| entry.ordinal)
            .map(|entry| entry.name.as_str())
    }

    /// Whether `name` is a known territory whose geometry is not loaded.
    #[must_use]
    pub fn is_unloaded(&self, name: &str) -> bool {
        self.unloaded.contains(name) && !self.loaded.contains(name)
    }

    /// Number of territories with a usable polygon.
    #[must_use]
    pub fn size(&self) -> usize {
        self.tree.size()
    }
}

/// Bounding box of all outer rings, or `None` if there are no vertices.
fn compute_envelope(geometry: &TerritoryGeometry) -> Option<AABB<[f64; 2]>> {
    let mut vertices = geometry.outer_rings().into_iter().flatten();
    let first = *vertices.next()?;

    let (min, max) = vertices.fold((first, first), |(min, max), &[x, y]| {
        ([min[0].min(x), min[1].min(y)], [max[0].max(x), max[1].max(y)])
    });

    Some(AABB::from_corners(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> TerritoryGeometry {
        TerritoryGeometry::Polygon(vec![vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]])
    }

    fn pt(lon: f64, lat: f64) -> LonLat {
        LonLat::new(lon, lat).unwrap()
    }

    #[test]
    fn finds_containing_territory() {
        let index = TerritoryIndex::build(&[
            Boundary::new("West", Some(rect(-120.0, 30.0, -100.0, 45.0))),
            Boundary::new("East", Some(rect(-90.0, 30.0, -70.0, 45.0))),
        ]);
        assert_eq!(index.size(), 2);
        assert_eq!(index.lookup(pt(-110.0, 40.0)), Some("West"));
        assert_eq!(index.lookup(pt(-80.0, 40.0)), Some("East"));
        assert_eq!(index.lookup(pt(-95.0, 40.0)), None);
    }

    #[test]
    fn envelope_hit_still_requires_ray_casting() {
        // Triangle whose bounding box covers (9, 1) but whose area does not.
        let triangle = TerritoryGeometry::Polygon(vec![vec![[0.0, 0.0], [10.0, 10.0], [0.0, 10.0]]]);
        let index = TerritoryIndex::build(&[Boundary::new("Tri", Some(triangle))]);
        assert_eq!(index.lookup(pt(1.0, 9.0)), Some("Tri"));
        assert_eq!(index.lookup(pt(9.0, 1.0)), None);
    }

    #[test]
    fn overlap_prefers_first_boundary() {
        let index = TerritoryIndex::build(&[
            Boundary::new("First", Some(rect(0.0, 0.0, 10.0, 10.0))),
            Boundary::new("Second", Some(rect(5.0, 5.0, 15.0, 15.0))),
        ]);
        assert_eq!(index.lookup(pt(7.0, 7.0)), Some("First"));
        assert_eq!(index.lookup(pt(12.0, 12.0)), Some("Second"));
    }

    #[test]
    fn tracks_unloaded_territories() {
        let index = TerritoryIndex::build(&[
            Boundary::new("Loaded", Some(rect(0.0, 0.0, 1.0, 1.0))),
            Boundary::new("Pending", None),
            Boundary::new("Broken", Some(TerritoryGeometry::Unsupported(None))),
        ]);
        assert_eq!(index.size(), 1);
        assert!(index.is_unloaded("Pending"));
        assert!(!index.is_unloaded("Loaded"));
        assert!(!index.is_unloaded("Broken"));
        assert!(!index.is_unloaded("Unknown"));
    }
}
