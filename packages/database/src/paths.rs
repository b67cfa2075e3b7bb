//! Default location of the results database.

use std::path::{Path, PathBuf};

/// Database path used when `WSO_ATLAS_DB` is unset.
pub const DEFAULT_DB_PATH: &str = "data/wso_atlas.duckdb";

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "WSO_ATLAS_DB";

/// Returns the database path from `WSO_ATLAS_DB`, or the default.
#[must_use]
pub fn db_path_from_env() -> PathBuf {
    std::env::var(DB_PATH_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_DB_PATH), PathBuf::from)
}

/// Creates a directory (and parents) if it does not already exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
