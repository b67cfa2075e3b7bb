//! Bounded, page-at-a-time reads of competition results.
//!
//! Result tables are large, so event rows are fetched in batches of
//! [`PaginationConfig::batch_size`]. Reading stops at the first short
//! page, or after [`PaginationConfig::max_pages`] pages, in which case
//! the result is marked truncated.

use std::sync::Arc;

use chrono::NaiveDate;
use wso_atlas_analytics_models::EventRow;
use wso_atlas_database_models::PaginationConfig;

use crate::{DbError, ProgressCallback, ResultsStore};

/// Event rows read by [`load_events`].
#[derive(Debug, Clone, Default)]
pub struct LoadedEvents {
    /// Every row read, in store order.
    pub events: Vec<EventRow>,
    /// Number of pages fetched.
    pub pages: usize,
    /// Whether reading stopped at the page limit with rows possibly left.
    pub truncated: bool,
}

/// Reads all result rows dated on or after `since`, one page at a time.
///
/// # Errors
///
/// Returns [`DbError::Conversion`] for a zero batch size, or any error the
/// store returns for a page.
pub async fn load_events(
    store: &dyn ResultsStore,
    since: NaiveDate,
    config: &PaginationConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<LoadedEvents, DbError> {
    if config.batch_size == 0 {
        return Err(DbError::Conversion {
            message: "pagination batch_size must be at least 1".to_string(),
        });
    }

    let mut loaded = LoadedEvents::default();
    progress.set_message(format!("Reading results since {since}"));

    loop {
        if loaded.pages >= config.max_pages {
            log::warn!(
                "Stopped reading results after {} pages ({} rows); remaining rows were skipped",
                loaded.pages,
                loaded.events.len()
            );
            loaded.truncated = true;
            break;
        }

        let offset = loaded.pages * config.batch_size;
        let page = store.events_page(since, offset, config.batch_size).await?;
        loaded.pages += 1;

        let count = page.len();
        log::debug!("Results page {} returned {count} rows", loaded.pages);
        progress.inc(count as u64);
        loaded.events.extend(page);

        if count < config.batch_size {
            break;
        }
    }

    progress.finish(format!(
        "Read {} results in {} pages",
        loaded.events.len(),
        loaded.pages
    ));

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, null_progress};
    use wso_atlas_analytics_models::ParticipantId;

    fn rows(count: i64) -> Vec<EventRow> {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        (0..count)
            .map(|i| EventRow {
                entity_name: "Club".to_string(),
                participant_id: ParticipantId::Int(i),
                event_id: Some(i),
                event_name: String::new(),
                date: day,
                region: None,
            })
            .collect()
    }

    fn since() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn reads_until_short_page() {
        let store = MemoryStore::new().with_events(rows(7));
        let config = PaginationConfig {
            batch_size: 3,
            max_pages: 10,
        };
        let loaded = load_events(&store, since(), &config, &null_progress())
            .await
            .unwrap();
        assert_eq!(loaded.events.len(), 7);
        assert_eq!(loaded.pages, 3);
        assert!(!loaded.truncated);
    }

    #[tokio::test]
    async fn exact_multiple_needs_one_empty_page() {
        let store = MemoryStore::new().with_events(rows(6));
        let config = PaginationConfig {
            batch_size: 3,
            max_pages: 10,
        };
        let loaded = load_events(&store, since(), &config, &null_progress())
            .await
            .unwrap();
        assert_eq!(loaded.events.len(), 6);
        assert_eq!(loaded.pages, 3);
    }

    #[tokio::test]
    async fn page_limit_truncates() {
        let store = MemoryStore::new().with_events(rows(20));
        let config = PaginationConfig {
            batch_size: 4,
            max_pages: 2,
        };
        let loaded = load_events(&store, since(), &config, &null_progress())
            .await
            .unwrap();
        assert_eq!(loaded.events.len(), 8);
        assert!(loaded.truncated);
    }

    #[tokio::test]
    async fn zero_batch_size_is_rejected() {
        let store = MemoryStore::new();
        let config = PaginationConfig {
            batch_size: 0,
            max_pages: 1,
        };
        assert!(
            load_events(&store, since(), &config, &null_progress())
                .await
                .is_err()
        );
    }
}
