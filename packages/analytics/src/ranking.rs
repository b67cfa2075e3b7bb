//! Top-N rankings.

use chrono::NaiveDate;
use wso_atlas_analytics_models::{
    MAX_TOP_N, MaxValues, MetricValue, RankedEntry, RollingMetric, Snapshot, TopClub, TopClubs,
    TopClubsSummary, UNAFFILIATED,
};

use crate::AnalyticsError;

fn check_limit(n: usize) -> Result<(), AnalyticsError> {
    if n > MAX_TOP_N {
        return Err(AnalyticsError::InvalidInput {
            message: format!("Limit cannot exceed {MAX_TOP_N} (got {n})"),
        });
    }
    Ok(())
}

/// Stable descending sort by `value_of`, keeping the first `n` items.
///
/// Items with a missing, zero, negative or NaN value are dropped. Equal
/// values keep their input order.
fn rank_by<'a, T>(
    items: impl IntoIterator<Item = &'a T>,
    n: usize,
    value_of: impl Fn(&T) -> Option<f64>,
) -> Vec<(&'a T, f64)> {
    let mut ranked: Vec<(&T, f64)> = items
        .into_iter()
        .filter_map(|item| value_of(item).filter(|v| *v > 0.0).map(|v| (item, v)))
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Ranks metric values, highest first.
///
/// Names in `exclude` (compared after trimming), zero values and
/// missing values are dropped. `n = 0` yields an empty list.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidInput`] if `n` exceeds
/// [`MAX_TOP_N`].
pub fn top_n(
    metrics: &[MetricValue],
    n: usize,
    exclude: &[&str],
) -> Result<Vec<RankedEntry>, AnalyticsError> {
    check_limit(n)?;

    let eligible = metrics
        .iter()
        .filter(|m| !exclude.contains(&m.entity_name.trim()));

    Ok(rank_by(eligible, n, |m| m.value)
        .into_iter()
        .enumerate()
        .map(|(i, (m, value))| RankedEntry {
            entity_name: m.entity_name.clone(),
            metric_value: value,
            rank: i + 1,
        })
        .collect())
}

/// Ranks clubs for one snapshot month by `metric`, through [`top_n`].
///
/// The unaffiliated sentinel and clubs without a positive value for
/// `metric` are left out. Missing values on the other metrics are
/// reported as 0.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidInput`] if `n` exceeds
/// [`MAX_TOP_N`].
#[allow(clippy::cast_precision_loss)]
pub fn top_clubs(
    snapshots: &[Snapshot],
    month: NaiveDate,
    metric: RollingMetric,
    n: usize,
) -> Result<TopClubs, AnalyticsError> {
    let mut candidates: Vec<Option<&Snapshot>> = snapshots
        .iter()
        .filter(|s| s.month == month)
        .map(Some)
        .collect();
    let values: Vec<MetricValue> = candidates
        .iter()
        .flatten()
        .map(|s| MetricValue {
            entity_name: s.entity_name.clone(),
            value: s.metric(metric).map(|v| v as f64),
        })
        .collect();

    let ranked = top_n(&values, n, &[UNAFFILIATED])?;

    // Each ranked entry takes the first unused snapshot with its name, so
    // repeated names keep their input order.
    let top_clubs: Vec<TopClub> = ranked
        .iter()
        .filter_map(|entry| {
            let slot = candidates
                .iter_mut()
                .find(|c| c.is_some_and(|s| s.entity_name == entry.entity_name))?;
            let s = slot.take()?;
            Some(TopClub {
                club_name: s.entity_name.clone(),
                active_members_12mo: s.active_members_12mo.unwrap_or(0),
                total_competitions_12mo: s.total_competitions_12mo.unwrap_or(0),
                unique_lifters_12mo: s.unique_lifters_12mo.unwrap_or(0),
                rank: entry.rank,
            })
        })
        .collect();

    let max_values = MaxValues {
        active_members: top_clubs.iter().map(|c| c.active_members_12mo).max().unwrap_or(0),
        total_competitions: top_clubs
            .iter()
            .map(|c| c.total_competitions_12mo)
            .max()
            .unwrap_or(0),
        unique_lifters: top_clubs.iter().map(|c| c.unique_lifters_12mo).max().unwrap_or(0),
    };

    log::debug!("Top {} clubs for {month} by {metric}", top_clubs.len());

    Ok(TopClubs {
        month,
        metric,
        summary: TopClubsSummary {
            total_clubs: top_clubs.len(),
            max_values,
        },
        top_clubs,
    })
}
