//! The read interface every backend implements.

use async_trait::async_trait;
use chrono::NaiveDate;
use wso_atlas_analytics_models::{EventRow, Snapshot};
use wso_atlas_geography_models::{Boundary, Entity};

use crate::DbError;

/// Read-only access to results data.
///
/// All methods are reads; nothing in the request path writes back.
#[async_trait]
pub trait ResultsStore: Send + Sync {
    /// All clubs with both coordinates, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    async fn clubs(&self) -> Result<Vec<Entity>, DbError>;

    /// Meets with both coordinates dated on or after `since` (all dates
    /// when `None`), newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    async fn meets(&self, since: Option<NaiveDate>) -> Result<Vec<Entity>, DbError>;

    /// All WSO boundaries, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    async fn boundaries(&self) -> Result<Vec<Boundary>, DbError>;

    /// The boundary named exactly `name`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    async fn boundary(&self, name: &str) -> Result<Option<Boundary>, DbError> {
        Ok(self
            .boundaries()
            .await?
            .into_iter()
            .find(|b| b.name == name))
    }

    /// One page of result rows dated on or after `since`, in a stable
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    async fn events_page(
        &self,
        since: NaiveDate,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<EventRow>, DbError>;

    /// Snapshots for months on or after `since` (all when `None`),
    /// ordered by month.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    async fn snapshots(&self, since: Option<NaiveDate>) -> Result<Vec<Snapshot>, DbError>;

    /// Up to `limit` clubs with both coordinates whose name matches a
    /// case-insensitive `LIKE` pattern.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    async fn find_clubs(&self, pattern: &str, limit: usize) -> Result<Vec<Entity>, DbError>;
}
