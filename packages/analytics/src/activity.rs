//! Per-entity activity over a trailing window.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Months, NaiveDate};
use wso_atlas_analytics_models::{ActivityMetrics, ActivityWindow, EventRow};

use crate::AnalyticsError;

/// First day of `window` ending at `today`.
///
/// Month arithmetic clamps to the end of shorter months, so 2024-03-31
/// minus 1 month is 2024-02-29.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidDate`] if the start falls outside
/// the representable date range.
pub fn window_start(today: NaiveDate, window: ActivityWindow) -> Result<NaiveDate, AnalyticsError> {
    today
        .checked_sub_months(Months::new(window.months()))
        .ok_or_else(|| AnalyticsError::InvalidDate {
            value: format!("{today} minus {} months", window.months()),
        })
}

#[derive(Default)]
struct Accumulator {
    participants: BTreeSet<String>,
    participations: u64,
    events: BTreeSet<String>,
}

impl Accumulator {
    fn add(&mut self, row: &EventRow) {
        self.participants.insert(row.participant_id.key());
        self.participations += 1;
        self.events.insert(row.event_key());
    }

    fn finish(&self) -> ActivityMetrics {
        ActivityMetrics {
            distinct_participant_count: self.participants.len() as u64,
            total_participation_count: self.participations,
            distinct_event_count: self.events.len() as u64,
        }
    }
}

fn accumulate(events: &[EventRow], window_start: NaiveDate) -> BTreeMap<String, Accumulator> {
    let mut groups: BTreeMap<String, Accumulator> = BTreeMap::new();

    for row in events.iter().filter(|row| row.date >= window_start) {
        let name = row.entity_name.trim();
        if name.is_empty() {
            continue;
        }
        groups.entry(name.to_string()).or_default().add(row);
    }

    groups
}

/// Computes activity for every entity appearing in `events` on or after
/// `window_start`, keyed by trimmed entity name.
///
/// Rows with a blank entity name are ignored.
#[must_use]
pub fn aggregate(events: &[EventRow], window_start: NaiveDate) -> BTreeMap<String, ActivityMetrics> {
    let metrics: BTreeMap<_, _> = accumulate(events, window_start)
        .into_iter()
        .map(|(name, acc)| (name, acc.finish()))
        .collect();

    log::debug!(
        "Aggregated {} events into {} entities since {window_start}",
        events.len(),
        metrics.len()
    );

    metrics
}

/// Like [`aggregate`], restricted to `known` entity names.
///
/// Known entities with no events in the window get a zero record;
/// entities not in `known` are dropped.
#[must_use]
pub fn aggregate_for_known<'a>(
    events: &[EventRow],
    window_start: NaiveDate,
    known: impl IntoIterator<Item = &'a str>,
) -> BTreeMap<String, ActivityMetrics> {
    let groups = accumulate(events, window_start);

    known
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            let metrics = groups
                .get(name)
                .map_or_else(ActivityMetrics::default, Accumulator::finish);
            (name.to_string(), metrics)
        })
        .collect()
}

/// Counts distinct event ids per region label on or after
/// `window_start`.
///
/// Labels are trimmed; rows with no label or no event id contribute
/// nothing.
#[must_use]
pub fn aggregate_by_region(events: &[EventRow], window_start: NaiveDate) -> BTreeMap<String, usize> {
    let mut by_region: BTreeMap<String, BTreeSet<i64>> = BTreeMap::new();

    for row in events.iter().filter(|row| row.date >= window_start) {
        let Some(region) = row.region.as_deref().map(str::trim).filter(|r| !r.is_empty()) else {
            continue;
        };
        let Some(event_id) = row.event_id else {
            continue;
        };
        by_region
            .entry(region.to_string())
            .or_default()
            .insert(event_id);
    }

    by_region
        .into_iter()
        .map(|(region, ids)| (region, ids.len()))
        .collect()
}
