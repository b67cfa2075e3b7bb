//! Subcommand implementations.

use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};

use serde::Serialize;
use wso_atlas_analytics::{
    aggregate_for_known, classify_quadrant, monthly_rollup, parse_date, rollup_since,
    rollup_summary, round_to, top_clubs, window_start,
};
use wso_atlas_analytics_models::{
    ActivityMetrics, ActivityWindow, Quadrant, QuadrantThresholds, RollingMetric,
};
use wso_atlas_cli_utils::{IndicatifProgress, MultiProgress};
use wso_atlas_database::import::import_file;
use wso_atlas_database::{DuckDbStore, ImportKind, ResultsStore, load_events};
use wso_atlas_geography_models::Entity;
use wso_atlas_names::documents::{DocumentKind, build_documents};
use wso_atlas_names::location::{location_source, parse_location};
use wso_atlas_server::AtlasConfig;
use wso_atlas_territory::{
    AssignmentSource, AuditReport, assign as assign_all, assign_to_boundary, audit_labels, region_counts,
};

type CmdResult = Result<(), Box<dyn Error>>;

fn print_json(value: &impl Serialize) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// `import <kind> <file>...`
pub fn import(db: &Path, kind: ImportKind, files: &[PathBuf], multi: &MultiProgress) -> CmdResult {
    let store = DuckDbStore::open(db)?;
    let steps = u64::try_from(files.len())?;
    let progress = IndicatifProgress::steps_bar(multi, &format!("Importing {kind}"), steps);

    let mut total = 0;
    for file in files {
        total += import_file(&store, kind, file)?;
        progress.inc(1);
    }

    progress.finish(format!("Imported {total} {kind} rows from {} files", files.len()));
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignSummary {
    assigned: BTreeMap<String, usize>,
    stored_label: usize,
    unassigned: usize,
    unclassifiable: usize,
}

/// `assign [--wso NAME] [--meets]`
pub async fn assign(db: &Path, wso: Option<&str>, meets: bool) -> CmdResult {
    let store = DuckDbStore::open(db)?;
    let entities = if meets {
        let since = window_start(today(), ActivityWindow::Months12)?;
        store.meets(Some(since)).await?
    } else {
        store.clubs().await?
    };

    if let Some(wso) = wso {
        let boundary = store.boundary(wso).await?;
        let assignment = assign_to_boundary(&entities, wso, boundary.as_ref());
        return print_json(&assignment);
    }

    let boundaries = store.boundaries().await?;
    let assigned = assign_all(&entities, &boundaries);
    let count_source = |source| assigned.iter().filter(|a| a.source == source).count();

    print_json(&AssignSummary {
        assigned: region_counts(&assigned),
        stored_label: count_source(AssignmentSource::StoredLabel),
        unassigned: count_source(AssignmentSource::Unassigned),
        unclassifiable: count_source(AssignmentSource::Unclassifiable),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuditOutput {
    #[serde(flatten)]
    report: AuditReport,
    contamination_rate: f64,
}

/// `audit --wso NAME`
pub async fn audit(db: &Path, wso: &str) -> CmdResult {
    let store = DuckDbStore::open(db)?;
    let Some(boundary) = store.boundary(wso).await? else {
        return Err(format!("Unknown WSO '{wso}'").into());
    };

    let since = window_start(today(), ActivityWindow::Months12)?;
    let meets = store.meets(Some(since)).await?;
    let report = audit_labels(&meets, &boundary)?;

    let contamination_rate = report.contamination_rate();
    log::info!(
        "{wso}: {} of {} claiming meets are outside the territory ({contamination_rate}%)",
        report.counts.incorrectly_labeled,
        report.counts.claiming,
    );

    print_json(&AuditOutput {
        contamination_rate,
        report,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClubActivity {
    club_name: String,
    #[serde(flatten)]
    metrics: ActivityMetrics,
    activity_factor: f64,
    quadrant: Quadrant,
}

/// `activity [--window 12|24]`
pub async fn activity(db: &Path, window: Option<u32>, multi: &MultiProgress) -> CmdResult {
    let config = AtlasConfig::from_env()?;
    let window = match window {
        Some(months) => ActivityWindow::from_months(months)
            .ok_or_else(|| format!("Unsupported window of {months} months (use 12 or 24)"))?,
        None => config.activity_window(),
    };

    let store = DuckDbStore::open(db)?;
    let since = window_start(today(), window)?;
    let clubs = store.clubs().await?;

    let progress = IndicatifProgress::records_bar(multi, "Reading results");
    let loaded = load_events(&store, since, &config.pagination, &progress).await?;
    if loaded.truncated {
        log::warn!("Activity is based on partial results");
    }

    let metrics = aggregate_for_known(&loaded.events, since, clubs.iter().map(|c| c.name.as_str()));
    let report: Vec<ClubActivity> = metrics
        .into_iter()
        .map(|(club_name, metrics)| {
            let activity_factor = metrics.activity_factor();
            ClubActivity {
                club_name,
                quadrant: classify_quadrant(
                    metrics.distinct_participant_count,
                    activity_factor,
                    &QuadrantThresholds::CANONICAL,
                ),
                metrics,
                activity_factor: round_to(activity_factor, 2),
            }
        })
        .collect();

    print_json(&report)
}

/// `top [--month M] [--metric NAME] [--limit N]`
pub async fn top(db: &Path, month: Option<&str>, metric: RollingMetric, limit: usize) -> CmdResult {
    let store = DuckDbStore::open(db)?;
    let month = month.map(parse_date).transpose()?;
    let snapshots = store.snapshots(month).await?;

    let Some(month) = month.or_else(|| snapshots.iter().map(|s| s.month).max()) else {
        return Err("No snapshots in the results store".into());
    };

    print_json(&top_clubs(&snapshots, month, metric, limit)?)
}

#[derive(Serialize)]
struct Rollup<A, S> {
    aggregates: A,
    summary: S,
}

/// `rollup [--start-date D]`
pub async fn rollup(db: &Path, start_date: Option<&str>) -> CmdResult {
    let store = DuckDbStore::open(db)?;
    let start = start_date.map(parse_date).transpose()?;
    let snapshots = store.snapshots(start).await?;

    let (aggregates, summary) = match start {
        Some(start) => rollup_since(&snapshots, start),
        None => {
            let aggregates = monthly_rollup(&snapshots);
            let summary = rollup_summary(&aggregates);
            (aggregates, summary)
        }
    };

    print_json(&Rollup {
        aggregates,
        summary,
    })
}

fn club_subtitle(club: &Entity) -> Option<String> {
    match (club.city.as_deref(), club.state.as_deref()) {
        (Some(city), Some(state)) => Some(format!("{city}, {state}")),
        _ => parse_location(location_source(
            club.display_name.as_deref(),
            club.address.as_deref(),
        ))
        .map(|parsed| format!("{}, {}", parsed.city, parsed.state)),
    }
}

/// `search-docs [--output FILE]`
pub async fn search_docs(db: &Path, output: Option<&Path>) -> CmdResult {
    let store = DuckDbStore::open(db)?;
    let clubs = store.clubs().await?;
    let boundaries = store.boundaries().await?;

    let club_entries: Vec<(&str, Option<String>)> = clubs
        .iter()
        .map(|club| (club.name.as_str(), club_subtitle(club)))
        .collect();
    let region_entries: Vec<(&str, Option<String>)> = boundaries
        .iter()
        .map(|b| (b.name.as_str(), (!b.states.is_empty()).then(|| b.states.join(", "))))
        .collect();

    let docs = build_documents(
        club_entries
            .iter()
            .map(|(name, sub)| (DocumentKind::Club, *name, sub.as_deref()))
            .chain(
                region_entries
                    .iter()
                    .map(|(name, sub)| (DocumentKind::Region, *name, sub.as_deref())),
            ),
    );

    log::info!("Built {} search documents", docs.len());

    match output {
        Some(path) => {
            std::fs::write(path, serde_json::to_vec_pretty(&docs)?)?;
            log::info!("Wrote {}", path.display());
            Ok(())
        }
        None => print_json(&docs),
    }
}
