//! HTTP handler functions for the WSO atlas API.

use std::collections::BTreeSet;
use std::str::FromStr as _;

use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use wso_atlas_analytics::{
    aggregate_by_region, aggregate_for_known, classify_quadrant, monthly_rollup, parse_date,
    quadrant_stats, rollup_since, rollup_summary, round_to, top_clubs, window_start,
};
use wso_atlas_analytics_models::{ActivityWindow, MAX_TOP_N, QuadrantThresholds, RollingMetric};
use wso_atlas_database::{LoadedEvents, load_events, null_progress};
use wso_atlas_geography_models::Entity;
use wso_atlas_names::matching::{best_match, slug_search_pattern};
use wso_atlas_names::regions::slug_to_region_name;
use wso_atlas_names::slugify;
use wso_atlas_server_models::{
    ApiBoundary, ApiClub, ApiHealth, ApiMeet, AuditExamples, ClubDetailResponse, DebugWsoQuery,
    DebugWsoResponse, MonthlyAggregatesQuery, MonthlyAggregatesResponse, QuadrantClub,
    QuadrantDataResponse, TopClubsQuery, WsoClubsResponse, WsoMeetsResponse,
};
use wso_atlas_territory::{
    assign, assign_to_boundary, audit_labels, region_counts, territory_stats,
};

use crate::{AppState, ServerError};

const DEFAULT_TOP_LIMIT: usize = 20;
const CLUB_CANDIDATE_LIMIT: usize = 10;
const AUDIT_MEET_LIMIT: usize = 200;
const AUDIT_EXAMPLE_LIMIT: usize = 10;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/wso-boundaries`
///
/// Lists every region with its recent meet count and assigned club count.
pub async fn wso_boundaries(state: web::Data<AppState>) -> Result<HttpResponse, ServerError> {
    let boundaries = state.store.boundaries().await?;
    let (since, loaded) = recent_events(&state, ActivityWindow::Months12).await?;
    let meet_counts = aggregate_by_region(&loaded.events, since);

    let clubs = state.store.clubs().await?;
    let club_counts = region_counts(&assign(&clubs, &boundaries));

    let body: Vec<ApiBoundary> = boundaries
        .iter()
        .map(|boundary| ApiBoundary {
            name: boundary.name.clone(),
            slug: slugify(&boundary.name),
            states: boundary.states.clone(),
            has_territory: boundary.has_geometry(),
            recent_meets_count: meet_counts.get(&boundary.name).copied().unwrap_or(0),
            barbell_clubs_count: club_counts.get(&boundary.name).copied().unwrap_or(0),
        })
        .collect();

    log::info!("Served {} WSO boundaries", body.len());
    Ok(HttpResponse::Ok().json(body))
}

/// `GET /api/wso/{slug}/clubs`
///
/// Clubs inside one region, by geometry when its territory is loaded and
/// by stored label otherwise.
pub async fn wso_clubs(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let region = resolve_region(&path)?;
    let boundary = state.store.boundary(&region).await?;
    let clubs = state.store.clubs().await?;

    let assignment = assign_to_boundary(&clubs, &region, boundary.as_ref());
    let club_stats = territory_stats(&assignment.entities, boundary.as_ref());

    log::info!(
        "WSO '{region}': {} of {} clubs ({})",
        assignment.entities.len(),
        assignment.examined,
        assignment.mode
    );

    Ok(HttpResponse::Ok().json(WsoClubsResponse {
        states: boundary.map(|b| b.states).unwrap_or_default(),
        mode: assignment.mode,
        clubs: assignment.entities.iter().map(ApiClub::from).collect(),
        club_stats,
        unclassifiable: assignment.unclassifiable,
        wso_name: region,
    }))
}

/// `GET /api/wso/{slug}/meets`
///
/// Meets inside one region within the configured activity window.
pub async fn wso_meets(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let region = resolve_region(&path)?;
    let boundary = state.store.boundary(&region).await?;
    let since = window_start(state.today(), state.config.activity_window())?;
    let meets = state.store.meets(Some(since)).await?;

    let assignment = assign_to_boundary(&meets, &region, boundary.as_ref());
    let meets: Vec<ApiMeet> = assignment.entities.iter().map(ApiMeet::from).collect();

    log::info!("WSO '{region}': {} meets since {since}", meets.len());

    Ok(HttpResponse::Ok().json(WsoMeetsResponse {
        wso_name: region,
        mode: assignment.mode,
        since,
        total_meets: meets.len(),
        meets,
    }))
}

/// `GET /api/debug-wso?wso=Name`
///
/// Audits the stored labels of recent meets against one territory.
pub async fn debug_wso(
    state: web::Data<AppState>,
    query: web::Query<DebugWsoQuery>,
) -> Result<HttpResponse, ServerError> {
    let Some(wso) = query.wso.as_deref().map(str::trim).filter(|w| !w.is_empty()) else {
        return Err(ServerError::BadRequest(
            "Missing 'wso' query parameter".to_string(),
        ));
    };

    let boundary = state
        .store
        .boundary(wso)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Unknown WSO '{wso}'")))?;

    let since = window_start(state.today(), ActivityWindow::Months12)?;
    let mut meets = state.store.meets(Some(since)).await?;
    meets.truncate(AUDIT_MEET_LIMIT);

    let report = audit_labels(&meets, &boundary)?;
    let counts = report.counts;

    let conclusion = if counts.incorrectly_labeled == 0 {
        format!("Stored labels agree with the {wso} territory")
    } else {
        format!(
            "{} of {} classifiable meets have a stored label that disagrees with the {wso} territory",
            counts.incorrectly_labeled,
            counts.total_examined - report.unclassifiable.len()
        )
    };

    Ok(HttpResponse::Ok().json(DebugWsoResponse {
        wso: report.region.clone(),
        analysis: counts,
        unclassifiable: report.unclassifiable.len(),
        contamination_rate: report.contamination_rate(),
        conclusion,
        examples: AuditExamples {
            claimed_not_geometric: example_names(&report.claimed_not_geometric),
            geometric_not_claimed: example_names(&report.geometric_not_claimed),
        },
    }))
}

/// `GET /api/club/{slug}`
///
/// Resolves a slug to the best-matching club and classifies it.
pub async fn club_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let slug = path.into_inner();
    let not_found = || ServerError::NotFound(format!("Club '{slug}' not found"));

    let pattern = slug_search_pattern(&slug).ok_or_else(not_found)?;
    let candidates = state.store.find_clubs(&pattern, CLUB_CANDIDATE_LIMIT).await?;
    let club = best_match(&slug, &candidates, |c| c.name.as_str()).ok_or_else(not_found)?;

    let window = state.config.activity_window();
    let (since, loaded) = recent_events(&state, window).await?;
    let metrics = aggregate_for_known(&loaded.events, since, [club.name.as_str()])
        .into_values()
        .next()
        .unwrap_or_default();

    let activity_factor = metrics.activity_factor();
    let quadrant = classify_quadrant(
        metrics.distinct_participant_count,
        activity_factor,
        &QuadrantThresholds::CANONICAL,
    );

    log::info!("Club slug '{slug}' resolved to '{}' ({quadrant})", club.name);

    Ok(HttpResponse::Ok().json(ClubDetailResponse {
        club: ApiClub::from(club),
        metrics,
        activity_factor: round_to(activity_factor, 2),
        quadrant,
        quadrant_label: quadrant.label().to_string(),
        window_months: window.months(),
    }))
}

/// `GET /api/club-quadrant-data`
///
/// Every club with activity in the window, classified, plus per-quadrant
/// statistics.
pub async fn club_quadrant_data(state: web::Data<AppState>) -> Result<HttpResponse, ServerError> {
    let clubs = state.store.clubs().await?;
    let window = state.config.activity_window();
    let (since, loaded) = recent_events(&state, window).await?;
    let metrics = aggregate_for_known(&loaded.events, since, clubs.iter().map(|c| c.name.as_str()));
    let thresholds = QuadrantThresholds::CANONICAL;

    let mut seen = BTreeSet::new();
    let classified: Vec<(QuadrantClub, f64)> = clubs
        .iter()
        .filter_map(|club| {
            let name = club.name.trim();
            let m = metrics.get(name)?;
            if m.distinct_participant_count == 0 || !seen.insert(name) {
                return None;
            }
            let activity_factor = m.activity_factor();
            Some((
                QuadrantClub {
                    club_name: name.to_string(),
                    slug: slugify(name),
                    active_lifters_count: m.distinct_participant_count,
                    total_participations: m.total_participation_count,
                    recent_meets_count: m.distinct_event_count,
                    activity_factor: round_to(activity_factor, 2),
                    quadrant: classify_quadrant(
                        m.distinct_participant_count,
                        activity_factor,
                        &thresholds,
                    ),
                    wso_geography: club.wso_geography.clone(),
                },
                activity_factor,
            ))
        })
        .collect();

    let stats = quadrant_stats(
        classified
            .iter()
            .map(|(club, factor)| (club.quadrant, club.active_lifters_count, *factor)),
    );

    log::info!("Classified {} active clubs since {since}", classified.len());

    Ok(HttpResponse::Ok().json(QuadrantDataResponse {
        clubs: classified.into_iter().map(|(club, _)| club).collect(),
        quadrant_stats: stats,
        thresholds,
        window_months: window.months(),
        partial: loaded.truncated,
    }))
}

/// `GET /api/club-metrics/top-clubs?month=&metric=&limit=`
///
/// Top clubs for one snapshot month. `month` defaults to the latest
/// snapshot month.
pub async fn club_metrics_top_clubs(
    state: web::Data<AppState>,
    query: web::Query<TopClubsQuery>,
) -> Result<HttpResponse, ServerError> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT);
    if limit > MAX_TOP_N {
        return Err(ServerError::BadRequest(format!(
            "Limit cannot exceed {MAX_TOP_N} clubs"
        )));
    }

    let metric = match query.metric.as_deref() {
        Some(name) => RollingMetric::from_str(name.trim())
            .map_err(|_| ServerError::BadRequest(format!("Unknown metric '{name}'")))?,
        None => RollingMetric::default(),
    };

    let requested = query.month.as_deref().map(parse_date).transpose()?;
    let snapshots = state.store.snapshots(requested).await?;
    let month = match requested {
        Some(month) => month,
        None => snapshots
            .iter()
            .map(|s| s.month)
            .max()
            .ok_or_else(|| ServerError::NotFound("No snapshots available".to_string()))?,
    };

    let top = top_clubs(&snapshots, month, metric, limit)?;
    Ok(HttpResponse::Ok().json(top))
}

/// `GET /api/club-metrics/monthly-aggregates?start_date=`
///
/// Monthly totals across all clubs, optionally from `start_date` on.
pub async fn club_metrics_monthly_aggregates(
    state: web::Data<AppState>,
    query: web::Query<MonthlyAggregatesQuery>,
) -> Result<HttpResponse, ServerError> {
    let start = query.start_date.as_deref().map(parse_date).transpose()?;
    let snapshots = state.store.snapshots(start).await?;

    let (aggregates, summary) = match start {
        Some(start) => rollup_since(&snapshots, start),
        None => {
            let aggregates = monthly_rollup(&snapshots);
            let summary = rollup_summary(&aggregates);
            (aggregates, summary)
        }
    };

    Ok(HttpResponse::Ok().json(MonthlyAggregatesResponse {
        aggregates,
        summary,
    }))
}

fn example_names(entities: &[Entity]) -> Vec<String> {
    entities
        .iter()
        .take(AUDIT_EXAMPLE_LIMIT)
        .map(|e| e.name.clone())
        .collect()
}

fn resolve_region(slug: &str) -> Result<String, ServerError> {
    slug_to_region_name(slug).ok_or_else(|| ServerError::BadRequest("Invalid WSO slug".to_string()))
}

async fn recent_events(
    state: &AppState,
    window: ActivityWindow,
) -> Result<(NaiveDate, LoadedEvents), ServerError> {
    let since = window_start(state.today(), window)?;
    let loaded = load_events(
        state.store.as_ref(),
        since,
        &state.config.pagination,
        &null_progress(),
    )
    .await?;
    Ok((since, loaded))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use serde_json::Value;
    use wso_atlas_analytics_models::{EventRow, ParticipantId, Snapshot};
    use wso_atlas_database::MemoryStore;
    use wso_atlas_geography_models::{Boundary, EntityKind, TerritoryGeometry};

    use super::*;
    use crate::config::AtlasConfig;
    use crate::configure;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn carolina() -> Boundary {
        let mut boundary = Boundary::new(
            "Carolina",
            Some(TerritoryGeometry::Polygon(vec![vec![
                [-84.0, 32.0],
                [-75.0, 32.0],
                [-75.0, 37.0],
                [-84.0, 37.0],
            ]])),
        );
        boundary.states = vec!["North Carolina".to_string(), "South Carolina".to_string()];
        boundary
    }

    fn club(name: &str, lon: f64, lat: f64, label: &str) -> Entity {
        let mut club = Entity::new(EntityKind::Club, name).at(lon, lat).labeled(label);
        club.display_name = Some(format!("1 Main St, {name} City, NC"));
        club
    }

    fn meet(id: i64, name: &str, lon: f64, lat: f64, label: &str, on: NaiveDate) -> Entity {
        let mut meet = Entity::new(EntityKind::Meet, name).at(lon, lat).labeled(label);
        meet.id = Some(id);
        meet.date = Some(on);
        meet
    }

    fn result(club: &str, lifter: i64, meet_id: i64, on: NaiveDate) -> EventRow {
        EventRow {
            entity_name: club.to_string(),
            participant_id: ParticipantId::Int(lifter),
            event_id: Some(meet_id),
            event_name: format!("Meet {meet_id}"),
            date: on,
            region: Some("Carolina".to_string()),
        }
    }

    fn snapshot(club: &str, month: NaiveDate, members: u64) -> Snapshot {
        Snapshot {
            entity_name: club.to_string(),
            month,
            active_members_12mo: Some(members),
            total_competitions_12mo: Some(members * 2),
            unique_lifters_12mo: Some(members),
        }
    }

    fn fixture() -> MemoryStore {
        let recent = day(2024, 3, 1);
        let mut results = Vec::new();
        // 25 lifters, 3 results each: powerhouse.
        for lifter in 0..25 {
            for meet_id in 1..=3 {
                results.push(result("Raleigh Barbell", lifter, meet_id, recent));
            }
        }
        // 5 lifters, 1 result each: developing.
        for lifter in 100..105 {
            results.push(result("Charlotte Iron", lifter, 1, recent));
        }
        results.push(result("Charlotte Iron", 100, 9, day(2020, 1, 1)));
        // Active, but never geocoded.
        for lifter in 200..203 {
            results.push(result("Ghost Gym", lifter, 1, recent));
        }

        MemoryStore::new()
            .with_boundaries(vec![carolina(), Boundary::new("Florida", None)])
            .with_clubs(vec![
                club("Raleigh Barbell", -78.6, 35.8, "Carolina"),
                club("Charlotte Iron", -80.8, 35.2, "Carolina"),
                club("Tampa Strength", -82.5, 27.9, "Florida"),
                Entity::new(EntityKind::Club, "Ghost Gym").labeled("Florida"),
            ])
            .with_meets(vec![
                meet(1, "Raleigh Open", -78.6, 35.8, "Carolina", day(2024, 2, 10)),
                meet(2, "Tampa Classic", -82.5, 27.9, "Carolina", day(2024, 3, 9)),
                meet(3, "Old Raleigh Open", -78.6, 35.8, "Carolina", day(2020, 2, 10)),
            ])
            .with_events(results)
            .with_snapshots(vec![
                snapshot("Raleigh Barbell", day(2024, 5, 1), 30),
                snapshot("Charlotte Iron", day(2024, 5, 1), 8),
                snapshot("-", day(2024, 5, 1), 500),
                snapshot("Raleigh Barbell", day(2024, 6, 1), 31),
                snapshot("Charlotte Iron", day(2024, 6, 1), 0),
            ])
    }

    fn state(store: MemoryStore) -> web::Data<AppState> {
        web::Data::new(AppState {
            store: Arc::new(store),
            config: AtlasConfig::default(),
            today: Some(day(2024, 6, 15)),
        })
    }

    async fn get(store: MemoryStore, uri: &str) -> (u16, Value) {
        let app = test::init_service(App::new().app_data(state(store)).configure(configure)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status().as_u16();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let (status, body) = get(MemoryStore::new(), "/api/health").await;
        assert_eq!(status, 200);
        assert_eq!(body["healthy"], true);
    }

    #[actix_web::test]
    async fn boundaries_include_meet_and_club_counts() {
        let (status, body) = get(fixture(), "/api/wso-boundaries").await;
        assert_eq!(status, 200);
        let carolina = &body[0];
        assert_eq!(carolina["name"], "Carolina");
        assert_eq!(carolina["hasTerritory"], true);
        assert_eq!(carolina["recentMeetsCount"], 3);
        assert_eq!(carolina["barbellClubsCount"], 2);
        assert_eq!(body[1]["hasTerritory"], false);
        assert_eq!(body[1]["barbellClubsCount"], 1);
    }

    #[actix_web::test]
    async fn wso_clubs_filters_geometrically() {
        let (status, body) = get(fixture(), "/api/wso/carolina/clubs").await;
        assert_eq!(status, 200);
        assert_eq!(body["wsoName"], "Carolina");
        assert_eq!(body["mode"], "geometric");
        assert_eq!(body["clubs"].as_array().unwrap().len(), 2);
        assert_eq!(body["clubStats"]["totalClubs"], 2);
        assert_eq!(body["clubStats"]["citiesCount"], 2);
        assert_eq!(body["clubStats"]["statesCount"], 2);
        assert_eq!(body["unclassifiable"], 0);
    }

    #[actix_web::test]
    async fn wso_clubs_falls_back_to_labels() {
        let (status, body) = get(fixture(), "/api/wso/florida/clubs").await;
        assert_eq!(status, 200);
        assert_eq!(body["mode"], "labelFallback");
        // Ghost Gym is labeled Florida but has no coordinates.
        assert_eq!(body["clubs"].as_array().unwrap().len(), 1);
        assert_eq!(body["clubs"][0]["clubName"], "Tampa Strength");
        assert_eq!(body["clubStats"]["statesCount"], 1);
    }

    #[actix_web::test]
    async fn wso_meets_uses_window_and_geometry() {
        let (status, body) = get(fixture(), "/api/wso/carolina/meets").await;
        assert_eq!(status, 200);
        assert_eq!(body["since"], "2023-06-15");
        assert_eq!(body["totalMeets"], 1);
        assert_eq!(body["meets"][0]["meetName"], "Raleigh Open");
    }

    #[actix_web::test]
    async fn debug_wso_reports_mislabeled_meets() {
        let (status, body) = get(fixture(), "/api/debug-wso?wso=Carolina").await;
        assert_eq!(status, 200);
        assert_eq!(body["analysis"]["totalExamined"], 2);
        assert_eq!(body["analysis"]["claiming"], 2);
        assert_eq!(body["analysis"]["incorrectlyLabeled"], 1);
        assert_eq!(body["contaminationRate"], 50.0);
        assert_eq!(body["examples"]["claimedNotGeometric"][0], "Tampa Classic");
    }

    #[actix_web::test]
    async fn debug_wso_caps_only_located_meets() {
        let mut meets: Vec<Entity> = (0..200)
            .map(|i| {
                let mut meet =
                    Entity::new(EntityKind::Meet, format!("Unplaced {i}")).labeled("Carolina");
                meet.id = Some(1_000 + i);
                meet.date = Some(day(2024, 6, 1));
                meet
            })
            .collect();
        meets.push(meet(7, "Tampa Classic", -82.5, 27.9, "Carolina", day(2024, 1, 1)));
        let store = MemoryStore::new()
            .with_boundaries(vec![carolina()])
            .with_meets(meets);

        let (status, body) = get(store, "/api/debug-wso?wso=Carolina").await;
        assert_eq!(status, 200);
        assert_eq!(body["analysis"]["totalExamined"], 1);
        assert_eq!(body["analysis"]["incorrectlyLabeled"], 1);
        assert_eq!(body["unclassifiable"], 0);
        assert_eq!(body["examples"]["claimedNotGeometric"][0], "Tampa Classic");
    }

    #[actix_web::test]
    async fn debug_wso_status_codes() {
        let (status, body) = get(fixture(), "/api/debug-wso").await;
        assert_eq!(status, 400);
        assert!(body["error"].is_string());

        let (status, _) = get(fixture(), "/api/debug-wso?wso=Atlantis").await;
        assert_eq!(status, 404);

        let (status, _) = get(fixture(), "/api/debug-wso?wso=Florida").await;
        assert_eq!(status, 404);
    }

    #[actix_web::test]
    async fn club_detail_classifies_best_match() {
        let (status, body) = get(fixture(), "/api/club/raleigh-barbell").await;
        assert_eq!(status, 200);
        assert_eq!(body["clubName"], "Raleigh Barbell");
        assert_eq!(body["city"], "Raleigh Barbell City");
        assert_eq!(body["metrics"]["distinctParticipantCount"], 25);
        assert_eq!(body["metrics"]["totalParticipationCount"], 75);
        assert_eq!(body["activityFactor"], 3.0);
        assert_eq!(body["quadrant"], "powerhouse");
        assert_eq!(body["quadrantLabel"], "Powerhouse");

        let (status, _) = get(fixture(), "/api/club/no-such-club").await;
        assert_eq!(status, 404);

        let (status, _) = get(fixture(), "/api/club/ghost-gym").await;
        assert_eq!(status, 404);
    }

    #[actix_web::test]
    async fn quadrant_data_skips_inactive_clubs() {
        let (status, body) = get(fixture(), "/api/club-quadrant-data").await;
        assert_eq!(status, 200);
        let clubs = body["clubs"].as_array().unwrap();
        assert_eq!(clubs.len(), 2);
        assert!(clubs.iter().all(|c| c["clubName"] != "Ghost Gym"));
        assert_eq!(body["quadrantStats"]["powerhouse"]["count"], 1);
        assert_eq!(body["quadrantStats"]["developing"]["count"], 1);
        assert_eq!(body["quadrantStats"]["developing"]["avgParticipants"], 5.0);
        assert_eq!(body["partial"], false);
    }

    #[actix_web::test]
    async fn top_clubs_defaults_to_latest_month() {
        let (status, body) = get(fixture(), "/api/club-metrics/top-clubs").await;
        assert_eq!(status, 200);
        assert_eq!(body["month"], "2024-06-01");
        assert_eq!(body["topClubs"].as_array().unwrap().len(), 1);

        let (_, body) = get(fixture(), "/api/club-metrics/top-clubs?month=2024-05&limit=5").await;
        let names: Vec<&str> = body["topClubs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["clubName"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Raleigh Barbell", "Charlotte Iron"]);
    }

    #[actix_web::test]
    async fn top_clubs_validation() {
        let (status, _) = get(fixture(), "/api/club-metrics/top-clubs?limit=51").await;
        assert_eq!(status, 400);
        let (status, _) = get(fixture(), "/api/club-metrics/top-clubs?metric=bogus").await;
        assert_eq!(status, 400);
        let (status, _) = get(fixture(), "/api/club-metrics/top-clubs?month=June").await;
        assert_eq!(status, 400);
        let (status, _) = get(MemoryStore::new(), "/api/club-metrics/top-clubs").await;
        assert_eq!(status, 404);
    }

    #[actix_web::test]
    async fn monthly_aggregates_with_start_date() {
        let (status, body) = get(fixture(), "/api/club-metrics/monthly-aggregates").await;
        assert_eq!(status, 200);
        assert_eq!(body["summary"]["totalMonths"], 2);
        assert_eq!(body["aggregates"][0]["totalActiveMembers"], 538);

        let (_, body) = get(
            fixture(),
            "/api/club-metrics/monthly-aggregates?start_date=2024-06-01",
        )
        .await;
        assert_eq!(body["summary"]["totalMonths"], 1);
        assert_eq!(body["summary"]["dateRange"]["start"], "2024-06-01");
        assert_eq!(body["aggregates"][0]["count"], 2);
        assert_eq!(body["aggregates"][0]["avg"], 15.5);
    }
}
