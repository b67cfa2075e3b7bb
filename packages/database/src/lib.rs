#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Results store for clubs, meets, WSO boundaries, competition results
//! and monthly snapshots.
//!
//! Route handlers and commands read through the [`ResultsStore`] trait,
//! injected as an `Arc<dyn ResultsStore>`. Two backends are provided: a
//! `DuckDB` file ([`results_db::DuckDbStore`]) and an in-memory store
//! for tests ([`memory::MemoryStore`]). Event rows are read in bounded
//! pages through [`pagination::load_events`].

pub mod import;
pub mod memory;
pub mod pagination;
pub mod paths;
pub mod progress;
pub mod results_db;
pub mod store;

pub use memory::MemoryStore;
pub use pagination::{LoadedEvents, load_events};
pub use progress::{NullProgress, ProgressCallback, null_progress};
pub use results_db::DuckDbStore;
pub use store::ResultsStore;
pub use wso_atlas_database_models::{BoundaryRecord, ImportKind, PaginationConfig};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// `DuckDB` error.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A connection mutex was poisoned by a panicking holder.
    #[error("Connection lock poisoned")]
    LockPoisoned,

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
