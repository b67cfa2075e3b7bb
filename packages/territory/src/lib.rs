#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Territory assignment for clubs and meets.
//!
//! Geometry is the source of truth for which WSO an entity belongs to.
//! The stored `wso_geography` label is only consulted when a territory's
//! geometry has not been loaded, and [`audit`] reports where the two
//! disagree.

pub mod assign;
pub mod audit;
pub mod stats;

use thiserror::Error;

pub use assign::{
    AssignedEntity, AssignmentMode, AssignmentSource, BoundaryAssignment, assign,
    assign_to_boundary, region_counts,
};
pub use audit::{AuditCounts, AuditReport, audit_labels};
pub use stats::{TerritoryStats, territory_stats};

/// Errors that can occur during territory operations.
#[derive(Debug, Error)]
pub enum TerritoryError {
    /// The boundary has no geometry to audit against.
    #[error("No territory geometry loaded for region '{region}'")]
    MissingGeometry {
        /// Region name.
        region: String,
    },
}
