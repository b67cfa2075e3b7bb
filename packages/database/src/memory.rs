//! In-memory [`ResultsStore`] for tests and small fixtures.

use async_trait::async_trait;
use chrono::NaiveDate;
use wso_atlas_analytics_models::{EventRow, Snapshot};
use wso_atlas_geography_models::{Boundary, Entity};

use crate::{DbError, ResultsStore};

/// A store backed by plain vectors, fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    clubs: Vec<Entity>,
    meets: Vec<Entity>,
    boundaries: Vec<Boundary>,
    events: Vec<EventRow>,
    snapshots: Vec<Snapshot>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the clubs.
    #[must_use]
    pub fn with_clubs(mut self, clubs: Vec<Entity>) -> Self {
        self.clubs = clubs;
        self
    }

    /// Replaces the meets.
    #[must_use]
    pub fn with_meets(mut self, meets: Vec<Entity>) -> Self {
        self.meets = meets;
        self
    }

    /// Replaces the boundaries.
    #[must_use]
    pub fn with_boundaries(mut self, boundaries: Vec<Boundary>) -> Self {
        self.boundaries = boundaries;
        self
    }

    /// Replaces the result rows.
    #[must_use]
    pub fn with_events(mut self, events: Vec<EventRow>) -> Self {
        self.events = events;
        self
    }

    /// Replaces the snapshots.
    #[must_use]
    pub fn with_snapshots(mut self, snapshots: Vec<Snapshot>) -> Self {
        self.snapshots = snapshots;
        self
    }
}

#[async_trait]
impl ResultsStore for MemoryStore {
    async fn clubs(&self) -> Result<Vec<Entity>, DbError> {
        let mut clubs: Vec<Entity> = self
            .clubs
            .iter()
            .filter(|c| c.has_coordinates())
            .cloned()
            .collect();
        clubs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(clubs)
    }

    async fn meets(&self, since: Option<NaiveDate>) -> Result<Vec<Entity>, DbError> {
        let mut meets: Vec<Entity> = self
            .meets
            .iter()
            .filter(|m| m.has_coordinates())
            .filter(|m| since.is_none_or(|since| m.date.is_some_and(|d| d >= since)))
            .cloned()
            .collect();
        meets.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(meets)
    }

    async fn boundaries(&self) -> Result<Vec<Boundary>, DbError> {
        Ok(self.boundaries.clone())
    }

    async fn events_page(
        &self,
        since: NaiveDate,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<EventRow>, DbError> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.date >= since)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn snapshots(&self, since: Option<NaiveDate>) -> Result<Vec<Snapshot>, DbError> {
        let mut snapshots: Vec<Snapshot> = self
            .snapshots
            .iter()
            .filter(|s| since.is_none_or(|since| s.month >= since))
            .cloned()
            .collect();
        snapshots.sort_by_key(|s| s.month);
        Ok(snapshots)
    }

    async fn find_clubs(&self, pattern: &str, limit: usize) -> Result<Vec<Entity>, DbError> {
        Ok(self
            .clubs()
            .await?
            .into_iter()
            .filter(|c| ilike(&c.name, pattern))
            .take(limit)
            .collect())
    }
}

/// Case-insensitive SQL `LIKE` with `%` wildcards only.
fn ilike(text: &str, pattern: &str) -> bool {
    let text = text.to_lowercase();
    let pattern = pattern.to_lowercase();
    let segments: Vec<&str> = pattern.split('%').collect();

    let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
        return false;
    };
    if segments.len() == 1 {
        return text == pattern;
    }
    if !text.starts_with(first) {
        return false;
    }

    let mut pos = first.len();
    for segment in &segments[1..segments.len() - 1] {
        match text[pos..].find(segment) {
            Some(found) => pos += found + segment.len(),
            None => return false,
        }
    }

    text.len() >= pos + last.len() && text[pos..].ends_with(last)
}
