//! Fixed-threshold quadrant classification.

use wso_atlas_analytics_models::{Quadrant, QuadrantStats, QuadrantThresholds};

use crate::round_to;

/// Classifies a club by participant count and activity factor.
///
/// Values at a threshold count as high. The thresholds are constants;
/// they are never derived from the data being classified.
#[must_use]
pub fn classify_quadrant(
    participants: u64,
    activity_factor: f64,
    thresholds: &QuadrantThresholds,
) -> Quadrant {
    let many = participants >= thresholds.participants;
    let active = activity_factor >= thresholds.activity;

    match (many, active) {
        (true, true) => Quadrant::Powerhouse,
        (false, true) => Quadrant::Intensive,
        (true, false) => Quadrant::SleepingGiant,
        (false, false) => Quadrant::Developing,
    }
}

/// Per-quadrant counts and averages.
///
/// Takes `(quadrant, participants, activity_factor)` triples. Averages
/// are rounded to one decimal (participants) and two decimals
/// (activity); empty quadrants report zeros.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn quadrant_stats(clubs: impl IntoIterator<Item = (Quadrant, u64, f64)>) -> QuadrantStats {
    let mut stats = QuadrantStats::default();

    for (quadrant, participants, activity) in clubs {
        let stat = stats.get_mut(quadrant);
        stat.count += 1;
        stat.avg_participants += participants as f64;
        stat.avg_activity += activity;
    }

    for stat in [
        &mut stats.powerhouse,
        &mut stats.intensive,
        &mut stats.sleeping_giant,
        &mut stats.developing,
    ] {
        if stat.count > 0 {
            let count = stat.count as f64;
            stat.avg_participants = round_to(stat.avg_participants / count, 1);
            stat.avg_activity = round_to(stat.avg_activity / count, 2);
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_canonical_examples() {
        let t = QuadrantThresholds::CANONICAL;
        assert_eq!(classify_quadrant(25, 3.0, &t), Quadrant::Powerhouse);
        assert_eq!(classify_quadrant(10, 3.0, &t), Quadrant::Intensive);
        assert_eq!(classify_quadrant(25, 1.0, &t), Quadrant::SleepingGiant);
        assert_eq!(classify_quadrant(10, 1.0, &t), Quadrant::Developing);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let t = QuadrantThresholds::CANONICAL;
        assert_eq!(classify_quadrant(20, 2.75, &t), Quadrant::Powerhouse);
        assert_eq!(classify_quadrant(19, 2.75, &t), Quadrant::Intensive);
        assert_eq!(classify_quadrant(20, 2.74, &t), Quadrant::SleepingGiant);
    }

    #[test]
    fn zero_activity_is_developing() {
        let t = QuadrantThresholds::CANONICAL;
        assert_eq!(classify_quadrant(0, 0.0, &t), Quadrant::Developing);
    }

    #[test]
    fn stats_average_and_round() {
        let stats = quadrant_stats([
            (Quadrant::Powerhouse, 25, 3.0),
            (Quadrant::Powerhouse, 30, 3.5),
            (Quadrant::Developing, 4, 1.0),
        ]);
        assert_eq!(stats.powerhouse.count, 2);
        assert!((stats.powerhouse.avg_participants - 27.5).abs() < 1e-9);
        assert!((stats.powerhouse.avg_activity - 3.25).abs() < 1e-9);
        assert_eq!(stats.developing.count, 1);
        assert_eq!(stats.get(Quadrant::Intensive).count, 0);
        assert!(stats.intensive.avg_activity.abs() < f64::EPSILON);
    }
}
