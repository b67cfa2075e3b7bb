#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Input and output types for activity and ranking analytics.
//!
//! Event rows and monthly snapshots come from the results store; metric,
//! quadrant, and ranking types are what the aggregators produce.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Largest `n` accepted by top-N queries.
pub const MAX_TOP_N: usize = 50;

/// Club name used for lifters with no club affiliation.
pub const UNAFFILIATED: &str = "-";

/// A participant identifier as stored: numeric or text.
///
/// Compared by [`ParticipantId::key`], so `1` and `"1"` are the same
/// participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParticipantId {
    /// Numeric id.
    Int(i64),
    /// Text id.
    Text(String),
}

impl ParticipantId {
    /// The string form used for distinct counting.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Int(id) => id.to_string(),
            Self::Text(id) => id.clone(),
        }
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ParticipantId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

/// One competition result: a participant competing for an entity at an
/// event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRow {
    /// Club name as stored (may carry surrounding whitespace).
    pub entity_name: String,
    /// Participant (lifter) id.
    pub participant_id: ParticipantId,
    /// Event (meet) id, if known.
    #[serde(default)]
    pub event_id: Option<i64>,
    /// Event name.
    #[serde(default)]
    pub event_name: String,
    /// Event date.
    pub date: NaiveDate,
    /// Region label stored on the result.
    #[serde(default)]
    pub region: Option<String>,
}

impl EventRow {
    /// Key identifying the event: the id when present, otherwise
    /// `"<name>|<date>"`.
    #[must_use]
    pub fn event_key(&self) -> String {
        self.event_id.map_or_else(
            || format!("{}|{}", self.event_name, self.date),
            |id| id.to_string(),
        )
    }
}

/// Activity counts for one entity over a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityMetrics {
    /// Distinct participants.
    pub distinct_participant_count: u64,
    /// Result rows.
    pub total_participation_count: u64,
    /// Distinct events.
    pub distinct_event_count: u64,
}

impl ActivityMetrics {
    /// Participations per participant, or 0 with no participants.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn activity_factor(&self) -> f64 {
        if self.distinct_participant_count == 0 {
            0.0
        } else {
            self.total_participation_count as f64 / self.distinct_participant_count as f64
        }
    }
}

/// Supported trailing windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum ActivityWindow {
    /// The last 12 months.
    #[serde(rename = "12")]
    #[strum(serialize = "12")]
    Months12,
    /// The last 24 months.
    #[serde(rename = "24")]
    #[strum(serialize = "24")]
    Months24,
}

impl ActivityWindow {
    /// Window length in months.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::Months12 => 12,
            Self::Months24 => 24,
        }
    }

    /// Window for a month count, if supported.
    #[must_use]
    pub const fn from_months(months: u32) -> Option<Self> {
        match months {
            12 => Some(Self::Months12),
            24 => Some(Self::Months24),
            _ => None,
        }
    }
}

/// Size/intensity classification of a club.
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
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Quadrant {
    /// Many participants, high activity.
    Powerhouse,
    /// Few participants, high activity.
    Intensive,
    /// Many participants, low activity.
    SleepingGiant,
    /// Few participants, low activity.
    Developing,
}

impl Quadrant {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Powerhouse => "Powerhouse",
            Self::Intensive => "Intensive",
            Self::SleepingGiant => "Sleeping Giant",
            Self::Developing => "Developing",
        }
    }
}

/// Cutoffs separating the quadrants. A value at the cutoff is high.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadrantThresholds {
    /// Participant count cutoff.
    pub participants: u64,
    /// Activity factor cutoff.
    pub activity: f64,
}

impl QuadrantThresholds {
    /// The thresholds used everywhere: 20 participants, 2.75 activity.
    pub const CANONICAL: Self = Self {
        participants: 20,
        activity: 2.75,
    };
}

impl Default for QuadrantThresholds {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// Aggregate numbers for one quadrant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadrantStat {
    /// Clubs in the quadrant.
    pub count: u64,
    /// Mean participant count, one decimal place.
    pub avg_participants: f64,
    /// Mean activity factor, two decimal places.
    pub avg_activity: f64,
}

/// [`QuadrantStat`] for every quadrant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct QuadrantStats {
    /// Powerhouse clubs.
    pub powerhouse: QuadrantStat,
    /// Intensive clubs.
    pub intensive: QuadrantStat,
    /// Sleeping-giant clubs.
    pub sleeping_giant: QuadrantStat,
    /// Developing clubs.
    pub developing: QuadrantStat,
}

impl QuadrantStats {
    /// The stat for `quadrant`.
    #[must_use]
    pub const fn get(&self, quadrant: Quadrant) -> &QuadrantStat {
        match quadrant {
            Quadrant::Powerhouse => &self.powerhouse,
            Quadrant::Intensive => &self.intensive,
            Quadrant::SleepingGiant => &self.sleeping_giant,
            Quadrant::Developing => &self.developing,
        }
    }

    /// Mutable stat for `quadrant`.
    pub const fn get_mut(&mut self, quadrant: Quadrant) -> &mut QuadrantStat {
        match quadrant {
            Quadrant::Powerhouse => &mut self.powerhouse,
            Quadrant::Intensive => &mut self.intensive,
            Quadrant::SleepingGiant => &mut self.sleeping_giant,
            Quadrant::Developing => &mut self.developing,
        }
    }
}

/// One entity's value for a ranking metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    /// Entity name.
    pub entity_name: String,
    /// Metric value; `None` when not recorded.
    pub value: Option<f64>,
}

/// One row of a top-N list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    /// Entity name.
    pub entity_name: String,
    /// Metric value.
    pub metric_value: f64,
    /// 1-based position.
    pub rank: usize,
}

/// Rolling metrics recorded on monthly snapshots.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum RollingMetric {
    /// Active members over the trailing 12 months.
    #[default]
    #[serde(rename = "active_members_12mo")]
    #[strum(serialize = "active_members_12mo")]
    ActiveMembers12mo,
    /// Competition entries over the trailing 12 months.
    #[serde(rename = "total_competitions_12mo")]
    #[strum(serialize = "total_competitions_12mo")]
    TotalCompetitions12mo,
    /// Distinct lifters over the trailing 12 months.
    #[serde(rename = "unique_lifters_12mo")]
    #[strum(serialize = "unique_lifters_12mo")]
    UniqueLifters12mo,
}

/// One club's rolling metrics for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Club name.
    pub entity_name: String,
    /// Snapshot month (first of the month).
    pub month: NaiveDate,
    /// Active members, trailing 12 months.
    #[serde(default)]
    pub active_members_12mo: Option<u64>,
    /// Competition entries, trailing 12 months.
    #[serde(default)]
    pub total_competitions_12mo: Option<u64>,
    /// Distinct lifters, trailing 12 months.
    #[serde(default)]
    pub unique_lifters_12mo: Option<u64>,
}

impl Snapshot {
    /// The value of `metric` on this snapshot.
    #[must_use]
    pub const fn metric(&self, metric: RollingMetric) -> Option<u64> {
        match metric {
            RollingMetric::ActiveMembers12mo => self.active_members_12mo,
            RollingMetric::TotalCompetitions12mo => self.total_competitions_12mo,
            RollingMetric::UniqueLifters12mo => self.unique_lifters_12mo,
        }
    }
}

/// Sums over all snapshots of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAggregate {
    /// Snapshot month.
    pub month: NaiveDate,
    /// Sum of active members.
    pub total_active_members: u64,
    /// Sum of competition entries.
    pub total_competitions: u64,
    /// Sum of distinct lifters.
    pub total_unique_lifters: u64,
    /// Snapshots contributing to the month.
    pub count: u64,
    /// `total_active_members / count`, two decimal places; 0 when empty.
    pub avg: f64,
}

/// First and last month of a rollup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest month.
    pub start: Option<NaiveDate>,
    /// Latest month.
    pub end: Option<NaiveDate>,
}

/// Summary of a monthly rollup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupSummary {
    /// Months in the rollup.
    pub total_months: usize,
    /// Month range.
    pub date_range: DateRange,
}

/// A club in a top list, with all three rolling metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopClub {
    /// Club name.
    pub club_name: String,
    /// Active members (0 when missing).
    pub active_members_12mo: u64,
    /// Competition entries (0 when missing).
    pub total_competitions_12mo: u64,
    /// Distinct lifters (0 when missing).
    pub unique_lifters_12mo: u64,
    /// 1-based rank by the requested metric.
    pub rank: usize,
}

/// Largest value of each metric within a top list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxValues {
    /// Largest active member count.
    pub active_members: u64,
    /// Largest competition count.
    pub total_competitions: u64,
    /// Largest lifter count.
    pub unique_lifters: u64,
}

/// Summary of a top list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopClubsSummary {
    /// Clubs in the list.
    pub total_clubs: usize,
    /// Per-metric maxima.
    pub max_values: MaxValues,
}

/// A ranked list of clubs for one snapshot month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopClubs {
    /// Snapshot month.
    pub month: NaiveDate,
    /// Ranking metric.
    pub metric: RollingMetric,
    /// Clubs in rank order.
    pub top_clubs: Vec<TopClub>,
    /// Summary.
    pub summary: TopClubsSummary,
}
