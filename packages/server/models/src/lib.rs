#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the WSO atlas server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the core model types so the API contract can evolve on its own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wso_atlas_analytics_models::{
    ActivityMetrics, MonthlyAggregate, Quadrant, QuadrantStats, QuadrantThresholds, RollupSummary,
};
use wso_atlas_geography_models::Entity;
use wso_atlas_names::location::{location_source, parse_location};
use wso_atlas_names::slugify;
use wso_atlas_territory::{AssignmentMode, AuditCounts, TerritoryStats};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

/// A WSO region in the boundaries overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBoundary {
    /// Region name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// States covered by the region.
    pub states: Vec<String>,
    /// Whether a territory geometry is loaded.
    pub has_territory: bool,
    /// Distinct meets held in the region over the trailing window.
    pub recent_meets_count: usize,
    /// Clubs assigned to the region.
    pub barbell_clubs_count: usize,
}

/// A club as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiClub {
    /// Club name.
    pub club_name: String,
    /// URL slug.
    pub slug: String,
    /// Raw address.
    pub address: Option<String>,
    /// City, stored or parsed from the location text.
    pub city: Option<String>,
    /// State, stored or parsed from the location text.
    pub state: Option<String>,
    /// Latitude.
    pub latitude: Option<f64>,
    /// Longitude.
    pub longitude: Option<f64>,
    /// Stored WSO label.
    pub wso_geography: Option<String>,
}

impl From<&Entity> for ApiClub {
    fn from(club: &Entity) -> Self {
        let (city, state) = entity_location(club);
        Self {
            club_name: club.name.clone(),
            slug: slugify(&club.name),
            address: club.address.clone(),
            city,
            state,
            latitude: club.latitude,
            longitude: club.longitude,
            wso_geography: club.wso_geography.clone(),
        }
    }
}

/// A meet as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMeet {
    /// Source meet id.
    pub meet_id: Option<i64>,
    /// Meet name.
    pub meet_name: String,
    /// Meet date.
    pub date: Option<NaiveDate>,
    /// City.
    pub city: Option<String>,
    /// State.
    pub state: Option<String>,
    /// Latitude.
    pub latitude: Option<f64>,
    /// Longitude.
    pub longitude: Option<f64>,
    /// Stored WSO label.
    pub wso_geography: Option<String>,
}

impl From<&Entity> for ApiMeet {
    fn from(meet: &Entity) -> Self {
        let (city, state) = entity_location(meet);
        Self {
            meet_id: meet.id,
            meet_name: meet.name.clone(),
            date: meet.date,
            city,
            state,
            latitude: meet.latitude,
            longitude: meet.longitude,
            wso_geography: meet.wso_geography.clone(),
        }
    }
}

/// Stored city/state, falling back to parsing the display name or
/// address.
fn entity_location(entity: &Entity) -> (Option<String>, Option<String>) {
    let parsed = parse_location(location_source(
        entity.display_name.as_deref(),
        entity.address.as_deref(),
    ));
    let city = entity
        .city
        .clone()
        .or_else(|| parsed.as_ref().map(|p| p.city.clone()))
        .filter(|c| !c.is_empty());
    let state = entity
        .state
        .clone()
        .or_else(|| parsed.map(|p| p.state))
        .filter(|s| !s.is_empty());
    (city, state)
}

/// Response for `GET /api/wso/{slug}/clubs`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WsoClubsResponse {
    /// Resolved region name.
    pub wso_name: String,
    /// States covered by the region, when known.
    pub states: Vec<String>,
    /// Geometric or label-fallback filtering.
    pub mode: AssignmentMode,
    /// Clubs in the region.
    pub clubs: Vec<ApiClub>,
    /// Headline numbers.
    pub club_stats: TerritoryStats,
    /// Clubs skipped for missing or invalid coordinates.
    pub unclassifiable: usize,
}

/// Response for `GET /api/wso/{slug}/meets`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WsoMeetsResponse {
    /// Resolved region name.
    pub wso_name: String,
    /// Geometric or label-fallback filtering.
    pub mode: AssignmentMode,
    /// Start of the trailing window.
    pub since: NaiveDate,
    /// Meets in the region, newest first.
    pub meets: Vec<ApiMeet>,
    /// Number of meets returned.
    pub total_meets: usize,
}

/// Query parameters for `GET /api/debug-wso`.
#[derive(Debug, Clone, Deserialize)]
pub struct DebugWsoQuery {
    /// Region name, verbatim.
    pub wso: Option<String>,
}

/// Names of mislabeled meets, capped for readability.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditExamples {
    /// Labeled as the region but outside it.
    pub claimed_not_geometric: Vec<String>,
    /// Inside the region but labeled otherwise.
    pub geometric_not_claimed: Vec<String>,
}

/// Response for `GET /api/debug-wso`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugWsoResponse {
    /// Audited region.
    pub wso: String,
    /// Summary counts.
    pub analysis: AuditCounts,
    /// Meets without usable coordinates.
    pub unclassifiable: usize,
    /// Percent of claiming meets that are mislabeled.
    pub contamination_rate: f64,
    /// One-line verdict.
    pub conclusion: String,
    /// Sample names per discrepancy kind.
    pub examples: AuditExamples,
}

/// Response for `GET /api/club/{slug}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubDetailResponse {
    /// Matched club.
    #[serde(flatten)]
    pub club: ApiClub,
    /// Activity over the trailing window.
    pub metrics: ActivityMetrics,
    /// Participations per participant, two decimals.
    pub activity_factor: f64,
    /// Quadrant key.
    pub quadrant: Quadrant,
    /// Quadrant display label.
    pub quadrant_label: String,
    /// Window length in months.
    pub window_months: u32,
}

/// One club on the quadrant chart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadrantClub {
    /// Club name.
    pub club_name: String,
    /// URL slug.
    pub slug: String,
    /// Distinct active lifters.
    pub active_lifters_count: u64,
    /// Result rows.
    pub total_participations: u64,
    /// Distinct meets attended.
    pub recent_meets_count: u64,
    /// Participations per lifter, two decimals.
    pub activity_factor: f64,
    /// Quadrant key.
    pub quadrant: Quadrant,
    /// Stored WSO label.
    pub wso_geography: Option<String>,
}

/// Response for `GET /api/club-quadrant-data`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadrantDataResponse {
    /// Every club with its metrics.
    pub clubs: Vec<QuadrantClub>,
    /// Per-quadrant counts and averages.
    pub quadrant_stats: QuadrantStats,
    /// Thresholds used to classify.
    pub thresholds: QuadrantThresholds,
    /// Window length in months.
    pub window_months: u32,
    /// Whether the results read stopped at the page limit.
    pub partial: bool,
}

/// Query parameters for `GET /api/club-metrics/top-clubs`.
#[derive(Debug, Clone, Deserialize)]
pub struct TopClubsQuery {
    /// Snapshot month (`YYYY-MM-DD` or `YYYY-MM`). Defaults to the latest.
    pub month: Option<String>,
    /// Metric to rank by. Defaults to `active_members_12mo`.
    pub metric: Option<String>,
    /// Number of clubs, at most 50. Defaults to 20.
    pub limit: Option<usize>,
}

/// Query parameters for `GET /api/club-metrics/monthly-aggregates`.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyAggregatesQuery {
    /// Earliest month to include. Defaults to everything.
    pub start_date: Option<String>,
}

/// Response for `GET /api/club-metrics/monthly-aggregates`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAggregatesResponse {
    /// One entry per month, oldest first.
    pub aggregates: Vec<MonthlyAggregate>,
    /// Month count and range.
    pub summary: RollupSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wso_atlas_geography_models::EntityKind;

    #[test]
    fn club_location_falls_back_to_display_name() {
        let mut club = Entity::new(EntityKind::Club, "Iron & Oak W/L");
        club.display_name = Some("100 Main St, Austin, TX".to_string());
        let api = ApiClub::from(&club);
        assert_eq!(api.slug, "iron-oak-wl");
        assert_eq!(api.city.as_deref(), Some("Austin"));
        assert_eq!(api.state.as_deref(), Some("TX"));

        club.city = Some("Round Rock".to_string());
        assert_eq!(ApiClub::from(&club).city.as_deref(), Some("Round Rock"));
    }

    #[test]
    fn club_without_location_has_no_city() {
        let club = Entity::new(EntityKind::Club, "Nowhere Barbell");
        let api = ApiClub::from(&club);
        assert_eq!(api.city, None);
        assert_eq!(api.state, None);
    }

    #[test]
    fn meet_serializes_camel_case() {
        let mut meet = Entity::new(EntityKind::Meet, "Spring Open").labeled("Carolina");
        meet.id = Some(7);
        meet.date = NaiveDate::from_ymd_opt(2024, 4, 6);
        let json = serde_json::to_value(ApiMeet::from(&meet)).unwrap();
        assert_eq!(json["meetId"], 7);
        assert_eq!(json["date"], "2024-04-06");
        assert_eq!(json["wsoGeography"], "Carolina");
    }
}
