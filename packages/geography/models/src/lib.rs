#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic types for WSO territory assignment.
//!
//! These types describe points, territory geometries, and the clubs and
//! meets placed on the map. They carry no behavior beyond validation;
//! membership tests live in `wso_atlas_geography`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A raw `[longitude, latitude]` vertex as it appears in `GeoJSON`.
pub type Position = [f64; 2];

/// An ordered ring of vertices. The ring is implicitly closed; the first
/// and last vertex need not be equal.
pub type Ring = Vec<Position>;

/// A validated longitude/latitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    /// Longitude in degrees, within `[-180, 180]`.
    pub lon: f64,
    /// Latitude in degrees, within `[-90, 90]`.
    pub lat: f64,
}

impl LonLat {
    /// Creates a point, rejecting out-of-range or non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinatesError`] if longitude is outside
    /// `[-180, 180]` or latitude is outside `[-90, 90]` (NaN included).
    pub fn new(lon: f64, lat: f64) -> Result<Self, InvalidCoordinatesError> {
        if (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat) {
            Ok(Self { lon, lat })
        } else {
            Err(InvalidCoordinatesError { lon, lat })
        }
    }

    /// Returns the point as a `[lon, lat]` position.
    #[must_use]
    pub const fn position(self) -> Position {
        [self.lon, self.lat]
    }
}

/// Error returned when a longitude/latitude pair is out of range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinatesError {
    /// The rejected longitude.
    pub lon: f64,
    /// The rejected latitude.
    pub lat: f64,
}

impl std::fmt::Display for InvalidCoordinatesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid coordinates ({}, {}): longitude must be within [-180, 180] and latitude within [-90, 90]",
            self.lon, self.lat
        )
    }
}

impl std::error::Error for InvalidCoordinatesError {}

/// A territory geometry decoded from `GeoJSON`.
///
/// Only the shapes used for territories are modeled. Anything else
/// decodes to [`TerritoryGeometry::Unsupported`], which contains no
/// points.
#[derive(Debug, Clone, PartialEq)]
pub enum TerritoryGeometry {
    /// A polygon as a list of rings. Only the first (outer) ring is used
    /// for membership; holes are ignored.
    Polygon(Vec<Ring>),
    /// A list of polygons, each a list of rings.
    MultiPolygon(Vec<Vec<Ring>>),
    /// A `Feature` envelope around an optional geometry.
    Feature(Option<Box<TerritoryGeometry>>),
    /// Any other or malformed geometry, with the type tag if one was
    /// present.
    Unsupported(Option<String>),
}

impl TerritoryGeometry {
    /// Unwraps nested `Feature` envelopes down to the inner geometry.
    ///
    /// Returns `None` for a feature with a null geometry.
    #[must_use]
    pub fn unwrap_feature(&self) -> Option<&Self> {
        match self {
            Self::Feature(inner) => inner.as_deref().and_then(Self::unwrap_feature),
            other => Some(other),
        }
    }

    /// Returns the outer ring of every polygon in this geometry.
    ///
    /// Polygons with no rings contribute nothing.
    #[must_use]
    pub fn outer_rings(&self) -> Vec<&Ring> {
        match self.unwrap_feature() {
            Some(Self::Polygon(rings)) => rings.first().into_iter().collect(),
            Some(Self::MultiPolygon(polygons)) => {
                polygons.iter().filter_map(|rings| rings.first()).collect()
            }
            Some(Self::Feature(_) | Self::Unsupported(_)) | None => Vec::new(),
        }
    }
}

/// A named WSO territory.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    /// Region name, compared verbatim against stored region labels.
    pub name: String,
    /// Territory geometry, or `None` when it has not been loaded yet.
    pub geometry: Option<TerritoryGeometry>,
    /// States covered by the region.
    pub states: Vec<String>,
}

impl Boundary {
    /// Creates a boundary with no state list.
    #[must_use]
    pub fn new(name: impl Into<String>, geometry: Option<TerritoryGeometry>) -> Self {
        Self {
            name: name.into(),
            geometry,
            states: Vec::new(),
        }
    }

    /// Whether the boundary has a geometry to test against.
    #[must_use]
    pub const fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }
}

/// What kind of row an [`Entity`] came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    /// A barbell club.
    Club,
    /// A competition.
    Meet,
}

/// A club or meet with an optional location and stored region label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Row kind.
    pub kind: EntityKind,
    /// Source identifier (meet id for meets), if any.
    #[serde(default)]
    pub id: Option<i64>,
    /// Club or meet name.
    pub name: String,
    /// Raw street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Geocoder display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// City, when stored separately.
    #[serde(default)]
    pub city: Option<String>,
    /// State, when stored separately.
    #[serde(default)]
    pub state: Option<String>,
    /// Latitude in degrees.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Stored region label (`wso_geography`). May disagree with the
    /// geometric result.
    #[serde(default)]
    pub wso_geography: Option<String>,
    /// Meet date. Always `None` for clubs.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl Entity {
    /// Creates an entity with only a kind and name.
    #[must_use]
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            id: None,
            name: name.into(),
            address: None,
            display_name: None,
            city: None,
            state: None,
            latitude: None,
            longitude: None,
            wso_geography: None,
            date: None,
        }
    }

    /// Sets the coordinates.
    #[must_use]
    pub fn at(mut self, lon: f64, lat: f64) -> Self {
        self.longitude = Some(lon);
        self.latitude = Some(lat);
        self
    }

    /// Sets the stored region label.
    #[must_use]
    pub fn labeled(mut self, wso: impl Into<String>) -> Self {
        self.wso_geography = Some(wso.into());
        self
    }

    /// Returns the entity's point.
    ///
    /// `Ok(None)` means a coordinate is missing; the entity cannot be
    /// classified geometrically.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinatesError`] if both coordinates are present
    /// but out of range.
    pub fn point(&self) -> Result<Option<LonLat>, InvalidCoordinatesError> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => LonLat::new(lon, lat).map(Some),
            _ => Ok(None),
        }
    }

    /// Whether both coordinates are present. Range is not checked.
    #[must_use]
    pub const fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// Whether the stored region label equals `region` exactly.
    ///
    /// An empty `region` never matches.
    #[must_use]
    pub fn claims_region(&self, region: &str) -> bool {
        !region.is_empty() && self.wso_geography.as_deref() == Some(region)
    }
}
