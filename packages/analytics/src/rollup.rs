//! Monthly rollups of club snapshots.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use wso_atlas_analytics_models::{DateRange, MonthlyAggregate, RollupSummary, Snapshot};

use crate::round_to;

/// Sums snapshots per month, in month order.
///
/// Every snapshot counts toward its month; missing values add 0. The
/// average is active members per snapshot, rounded to two decimals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn monthly_rollup(snapshots: &[Snapshot]) -> Vec<MonthlyAggregate> {
    let mut months: BTreeMap<NaiveDate, MonthlyAggregate> = BTreeMap::new();

    for snapshot in snapshots {
        let entry = months
            .entry(snapshot.month)
            .or_insert_with(|| MonthlyAggregate {
                month: snapshot.month,
                total_active_members: 0,
                total_competitions: 0,
                total_unique_lifters: 0,
                count: 0,
                avg: 0.0,
            });
        entry.total_active_members += snapshot.active_members_12mo.unwrap_or(0);
        entry.total_competitions += snapshot.total_competitions_12mo.unwrap_or(0);
        entry.total_unique_lifters += snapshot.unique_lifters_12mo.unwrap_or(0);
        entry.count += 1;
    }

    months
        .into_values()
        .map(|mut aggregate| {
            aggregate.avg = if aggregate.count == 0 {
                0.0
            } else {
                round_to(
                    aggregate.total_active_members as f64 / aggregate.count as f64,
                    2,
                )
            };
            aggregate
        })
        .collect()
}

/// Month count and range of a rollup.
#[must_use]
pub fn rollup_summary(aggregates: &[MonthlyAggregate]) -> RollupSummary {
    RollupSummary {
        total_months: aggregates.len(),
        date_range: DateRange {
            start: aggregates.iter().map(|a| a.month).min(),
            end: aggregates.iter().map(|a| a.month).max(),
        },
    }
}

/// [`monthly_rollup`] over snapshots from `start` onward, with its
/// summary.
#[must_use]
pub fn rollup_since(
    snapshots: &[Snapshot],
    start: NaiveDate,
) -> (Vec<MonthlyAggregate>, RollupSummary) {
    let recent: Vec<Snapshot> = snapshots
        .iter()
        .filter(|s| s.month >= start)
        .cloned()
        .collect();
    let aggregates = monthly_rollup(&recent);
    let summary = rollup_summary(&aggregates);
    (aggregates, summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn snap(name: &str, on: NaiveDate, members: Option<u64>) -> Snapshot {
        Snapshot {
            entity_name: name.to_string(),
            month: on,
            active_members_12mo: members,
            total_competitions_12mo: members.map(|m| m * 2),
            unique_lifters_12mo: None,
        }
    }

    #[test]
    fn single_entity_single_month() {
        let rollup = monthly_rollup(&[snap("A", month(2024, 1), Some(10))]);
        assert_eq!(rollup.len(), 1);
        assert!((rollup[0].avg - 10.0).abs() < f64::EPSILON);
        assert_eq!(rollup[0].count, 1);
    }

    #[test]
    fn sums_and_orders_months() {
        let rollup = monthly_rollup(&[
            snap("A", month(2024, 2), Some(10)),
            snap("A", month(2024, 1), Some(4)),
            snap("B", month(2024, 2), None),
            snap("C", month(2024, 2), Some(1)),
        ]);
        assert_eq!(rollup[0].month, month(2024, 1));
        let feb = &rollup[1];
        assert_eq!(feb.total_active_members, 11);
        assert_eq!(feb.total_competitions, 22);
        assert_eq!(feb.total_unique_lifters, 0);
        assert_eq!(feb.count, 3);
        assert!((feb.avg - 3.67).abs() < 1e-9);
    }

    #[test]
    fn summary_and_start_filter() {
        let snapshots = vec![
            snap("A", month(2019, 12), Some(1)),
            snap("A", month(2020, 1), Some(2)),
            snap("A", month(2020, 3), Some(3)),
        ];
        let (aggregates, summary) = rollup_since(&snapshots, month(2020, 1));
        assert_eq!(aggregates.len(), 2);
        assert_eq!(summary.total_months, 2);
        assert_eq!(summary.date_range.start, Some(month(2020, 1)));
        assert_eq!(summary.date_range.end, Some(month(2020, 3)));

        let empty = rollup_summary(&[]);
        assert_eq!(empty, RollupSummary::default());
    }
}
