//! Club counts for a territory page.

use std::collections::BTreeSet;

use serde::Serialize;
use wso_atlas_geography_models::{Boundary, Entity};
use wso_atlas_names::location::{city_segment, location_source};

/// Headline numbers for the clubs in one territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoryStats {
    /// Number of clubs.
    pub total_clubs: usize,
    /// Distinct non-empty cities: the stored city, or the second-to-last
    /// part of the club's location text.
    pub cities_count: usize,
    /// States covered by the territory, or 1 when unknown.
    pub states_count: usize,
}

/// Computes [`TerritoryStats`] for an already-filtered club list.
#[must_use]
pub fn territory_stats(clubs: &[Entity], boundary: Option<&Boundary>) -> TerritoryStats {
    let cities: BTreeSet<String> = clubs
        .iter()
        .filter_map(|club| {
            club.city
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(ToString::to_string)
                .or_else(|| {
                    city_segment(location_source(
                        club.display_name.as_deref(),
                        club.address.as_deref(),
                    ))
                    .map(ToString::to_string)
                })
        })
        .collect();

    let states_count = boundary
        .map(|b| b.states.len())
        .filter(|&n| n > 0)
        .unwrap_or(1);

    TerritoryStats {
        total_clubs: clubs.len(),
        cities_count: cities.len(),
        states_count,
    }
}
