//! Stored-label vs. geometry audit.

use serde::Serialize;
use wso_atlas_geography::entity_in_geometry;
use wso_atlas_geography_models::{Boundary, Entity};

use crate::TerritoryError;

/// Summary counts for an audit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditCounts {
    /// Entities passed in.
    pub total_examined: usize,
    /// Classifiable entities whose stored label names the region.
    pub claiming: usize,
    /// Classifiable entities geometrically inside the region.
    pub geometrically_inside: usize,
    /// Entities where label and geometry agree on membership.
    pub correctly_labeled: usize,
    /// Entities where label and geometry disagree.
    pub incorrectly_labeled: usize,
}

/// Comparison of stored region labels against one territory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// Audited region.
    pub region: String,
    /// Labeled as the region and inside it.
    pub both_agree: Vec<Entity>,
    /// Labeled as the region but outside it.
    pub claimed_not_geometric: Vec<Entity>,
    /// Inside the region but labeled otherwise (or unlabeled).
    pub geometric_not_claimed: Vec<Entity>,
    /// Entities without usable coordinates. Never counted as violations.
    pub unclassifiable: Vec<Entity>,
    /// Summary counts.
    pub counts: AuditCounts,
}

impl AuditReport {
    /// Percentage of claiming entities that are mislabeled, to one
    /// decimal place. Zero when nothing claims the region.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn contamination_rate(&self) -> f64 {
        if self.counts.claiming == 0 {
            return 0.0;
        }
        let rate = self.counts.incorrectly_labeled as f64 / self.counts.claiming as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    }
}

/// Compares each entity's stored label with the boundary geometry.
///
/// # Errors
///
/// Returns [`TerritoryError::MissingGeometry`] if the boundary has no
/// geometry; there is nothing to audit against.
pub fn audit_labels(entities: &[Entity], boundary: &Boundary) -> Result<AuditReport, TerritoryError> {
    let geometry = boundary
        .geometry
        .as_ref()
        .ok_or_else(|| TerritoryError::MissingGeometry {
            region: boundary.name.clone(),
        })?;

    let mut report = AuditReport {
        region: boundary.name.clone(),
        both_agree: Vec::new(),
        claimed_not_geometric: Vec::new(),
        geometric_not_claimed: Vec::new(),
        unclassifiable: Vec::new(),
        counts: AuditCounts {
            total_examined: entities.len(),
            ..AuditCounts::default()
        },
    };

    for entity in entities {
        let inside = match entity_in_geometry(entity, geometry) {
            Ok(Some(inside)) => inside,
            Ok(None) => {
                report.unclassifiable.push(entity.clone());
                continue;
            }
            Err(e) => {
                log::warn!("Treating '{}' as unclassifiable: {e}", entity.name);
                report.unclassifiable.push(entity.clone());
                continue;
            }
        };
        let claims = entity.claims_region(&boundary.name);

        if claims {
            report.counts.claiming += 1;
        }
        if inside {
            report.counts.geometrically_inside += 1;
        }

        match (claims, inside) {
            (true, true) => report.both_agree.push(entity.clone()),
            (true, false) => report.claimed_not_geometric.push(entity.clone()),
            (false, true) => report.geometric_not_claimed.push(entity.clone()),
            (false, false) => {}
        }
    }

    report.counts.correctly_labeled = report.both_agree.len();
    report.counts.incorrectly_labeled =
        report.claimed_not_geometric.len() + report.geometric_not_claimed.len();

    log::info!(
        "Audit for {}: {} examined, {} claiming, {} inside, {} incorrectly labeled",
        report.region,
        report.counts.total_examined,
        report.counts.claiming,
        report.counts.geometrically_inside,
        report.counts.incorrectly_labeled
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wso_atlas_geography_models::{EntityKind, TerritoryGeometry};

    fn carolina() -> Boundary {
        Boundary::new(
            "Carolina",
            Some(TerritoryGeometry::Polygon(vec![vec![
                [-84.0, 32.0],
                [-75.0, 32.0],
                [-75.0, 37.0],
                [-84.0, 37.0],
            ]])),
        )
    }

    fn meet(name: &str) -> Entity {
        Entity::new(EntityKind::Meet, name)
    }

    #[test]
    fn classifies_each_combination() {
        let meets = vec![
            meet("Agree").at(-78.6, 35.8).labeled("Carolina"),
            meet("Claimed Outside").at(-86.8, 36.1).labeled("Carolina"),
            meet("Inside Unclaimed").at(-80.8, 35.2).labeled("Georgia"),
            meet("Unrelated").at(-86.8, 36.1).labeled("Tennessee-Kentucky"),
            meet("No Coordinates").labeled("Carolina"),
        ];

        let report = audit_labels(&meets, &carolina()).unwrap();
        assert_eq!(report.both_agree.len(), 1);
        assert_eq!(report.claimed_not_geometric[0].name, "Claimed Outside");
        assert_eq!(report.geometric_not_claimed[0].name, "Inside Unclaimed");
        assert_eq!(report.unclassifiable[0].name, "No Coordinates");
        assert_eq!(
            report.counts,
            AuditCounts {
                total_examined: 5,
                claiming: 2,
                geometrically_inside: 2,
                correctly_labeled: 1,
                incorrectly_labeled: 2,
            }
        );
        assert!((report.contamination_rate() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_coordinates_are_never_violations() {
        let meets = vec![meet("A").labeled("Carolina"), meet("B")];
        let report = audit_labels(&meets, &carolina()).unwrap();
        assert_eq!(report.counts.incorrectly_labeled, 0);
        assert_eq!(report.counts.claiming, 0);
        assert_eq!(report.unclassifiable.len(), 2);
        assert!(report.contamination_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn missing_geometry_is_an_error() {
        let boundary = Boundary::new("Florida", None);
        assert!(matches!(
            audit_labels(&[], &boundary),
            Err(TerritoryError::MissingGeometry { region }) if region == "Florida"
        ));
    }

    #[test]
    fn contamination_rate_rounds_to_one_decimal() {
        let meets = vec![
            meet("1").at(-78.0, 35.0).labeled("Carolina"),
            meet("2").at(-78.0, 35.0).labeled("Carolina"),
            meet("3").at(-90.0, 35.0).labeled("Carolina"),
        ];
        let report = audit_labels(&meets, &carolina()).unwrap();
        assert!((report.contamination_rate() - 33.3).abs() < 1e-9);
    }
}
