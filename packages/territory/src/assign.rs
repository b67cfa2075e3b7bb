//! Geometric region assignment with stored-label fallback.

use std::collections::BTreeMap;

use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use wso_atlas_geography::entity_in_geometry;
use wso_atlas_geography_models::{Boundary, Entity};
use wso_atlas_spatial::TerritoryIndex;

/// How a single-boundary filter was evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum AssignmentMode {
    /// Entities were tested against the boundary geometry.
    Geometric,
    /// No geometry was available; entities were matched by stored label.
    LabelFallback,
}

/// Entities belonging to one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryAssignment {
    /// Region the entities were filtered for.
    pub region: String,
    /// Whether geometry or stored labels decided membership.
    pub mode: AssignmentMode,
    /// Entities in the region, in input order.
    pub entities: Vec<Entity>,
    /// Entities considered.
    pub examined: usize,
    /// Entities skipped by the geometric test for missing or invalid
    /// coordinates. Always zero in label fallback mode.
    pub unclassifiable: usize,
}

/// Keeps the entities that belong to `region`.
///
/// With a boundary geometry, an entity belongs when its point is inside
/// the territory; entities without usable coordinates are skipped. When
/// the boundary is missing or has no geometry, entities whose stored
/// label equals `region` are kept instead. An empty region name matches
/// nothing in either mode.
#[must_use]
pub fn assign_to_boundary(
    entities: &[Entity],
    region: &str,
    boundary: Option<&Boundary>,
) -> BoundaryAssignment {
    if let Some(geometry) = boundary.and_then(|b| b.geometry.as_ref())
        && !region.is_empty()
    {
        let mut kept = Vec::new();
        let mut unclassifiable = 0;

        for entity in entities {
            match entity_in_geometry(entity, geometry) {
                Ok(Some(true)) => kept.push(entity.clone()),
                Ok(Some(false)) => {}
                Ok(None) => unclassifiable += 1,
                Err(e) => {
                    log::warn!("Skipping '{}': {e}", entity.name);
                    unclassifiable += 1;
                }
            }
        }

        log::info!(
            "Geographic filtering: {} of {} entities inside {region} ({unclassifiable} unclassifiable)",
            kept.len(),
            entities.len()
        );

        return BoundaryAssignment {
            region: region.to_string(),
            mode: AssignmentMode::Geometric,
            entities: kept,
            examined: entities.len(),
            unclassifiable,
        };
    }

    log::warn!("No territory geometry for '{region}', falling back to stored region labels");

    BoundaryAssignment {
        region: region.to_string(),
        mode: AssignmentMode::LabelFallback,
        entities: entities
            .iter()
            .filter(|e| e.claims_region(region))
            .cloned()
            .collect(),
        examined: entities.len(),
        unclassifiable: 0,
    }
}

/// Where an entity's region came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum AssignmentSource {
    /// A loaded territory geometry contains the entity.
    Geometry,
    /// The stored label names a region whose geometry is not loaded.
    StoredLabel,
    /// No usable coordinates and no label fallback.
    Unclassifiable,
    /// Has coordinates but no territory contains it.
    Unassigned,
}

/// One entity with its assigned region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedEntity {
    /// The entity.
    pub entity: Entity,
    /// Assigned region, if any.
    pub region: Option<String>,
    /// How the region was decided.
    pub source: AssignmentSource,
}

/// Assigns every entity to a region.
///
/// The first boundary (in input order) whose geometry contains the
/// entity wins. Otherwise the stored label is used when it names a
/// boundary without loaded geometry. Remaining entities are
/// unclassifiable (no usable coordinates) or unassigned.
#[must_use]
pub fn assign(entities: &[Entity], boundaries: &[Boundary]) -> Vec<AssignedEntity> {
    let index = TerritoryIndex::build(boundaries);

    entities
        .iter()
        .map(|entity| {
            let point = entity.point().unwrap_or_else(|e| {
                log::warn!("Ignoring coordinates of '{}': {e}", entity.name);
                None
            });

            if let Some(point) = point
                && let Some(region) = index.lookup(point)
            {
                return AssignedEntity {
                    entity: entity.clone(),
                    region: Some(region.to_string()),
                    source: AssignmentSource::Geometry,
                };
            }

            if let Some(label) = entity.wso_geography.as_deref()
                && index.is_unloaded(label)
            {
                return AssignedEntity {
                    entity: entity.clone(),
                    region: Some(label.to_string()),
                    source: AssignmentSource::StoredLabel,
                };
            }

            AssignedEntity {
                entity: entity.clone(),
                region: None,
                source: if point.is_some() {
                    AssignmentSource::Unassigned
                } else {
                    AssignmentSource::Unclassifiable
                },
            }
        })
        .collect()
}

/// Counts assigned entities per region. Entities without a region are
/// not counted.
#[must_use]
pub fn region_counts(assigned: &[AssignedEntity]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for region in assigned.iter().filter_map(|a| a.region.as_ref()) {
        *counts.entry(region.clone()).or_insert(0) += 1;
    }
    counts
}
