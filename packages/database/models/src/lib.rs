#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Row shapes and settings shared by the results store and its callers.
//!
//! Clubs, meets, results and snapshots are imported in the shapes of
//! their domain types. Boundaries are imported as [`BoundaryRecord`],
//! which keeps the territory as raw `GeoJSON` until it is decoded.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default number of event rows fetched per page.
pub const DEFAULT_BATCH_SIZE: usize = 1_000;

/// Default upper bound on pages fetched for one request.
pub const DEFAULT_MAX_PAGES: usize = 200;

/// A WSO boundary row as imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryRecord {
    /// Region name.
    pub name: String,
    /// States covered by the region.
    #[serde(default)]
    pub states: Vec<String>,
    /// Territory `GeoJSON`; `null` or absent when not loaded yet.
    #[serde(default)]
    pub territory_geojson: Option<serde_json::Value>,
}

/// Kinds of data the store can import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImportKind {
    /// Club rows.
    Clubs,
    /// Meet rows.
    Meets,
    /// WSO boundary rows.
    Boundaries,
    /// Competition result rows.
    Results,
    /// Monthly rolling-metric snapshots.
    Snapshots,
}

/// Bounds for paginated event reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Rows per page.
    pub batch_size: usize,
    /// Pages fetched before giving up with partial data.
    pub max_pages: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_record_defaults() {
        let record: BoundaryRecord = serde_json::from_str(r#"{"name":"Carolina"}"#).unwrap();
        assert!(record.states.is_empty());
        assert!(record.territory_geojson.is_none());
    }

    #[test]
    fn pagination_fields_default_individually() {
        let config: PaginationConfig = toml::de::from_str("batch_size = 50").unwrap();
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
    }

    #[test]
    fn import_kind_parses() {
        assert_eq!("snapshots".parse::<ImportKind>().unwrap(), ImportKind::Snapshots);
        assert!("athletes".parse::<ImportKind>().is_err());
    }
}
