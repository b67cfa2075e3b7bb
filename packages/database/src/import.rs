//! Loading JSON exports into the `DuckDB` store.
//!
//! Each import file is a JSON array of rows in the shape of the matching
//! model type. Club and meet rows may omit `kind`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use wso_atlas_geography_models::{Entity, EntityKind};

use crate::{DbError, DuckDbStore, ImportKind};

/// Imports a JSON array file of `kind` rows into `store`.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`DbError`] if the file cannot be read, a row does not match
/// the expected shape, or an insert fails.
pub fn import_file(store: &DuckDbStore, kind: ImportKind, path: &Path) -> Result<u64, DbError> {
    log::info!("Importing {kind} from {}", path.display());

    let reader = BufReader::new(File::open(path)?);
    let rows: Vec<Value> = serde_json::from_reader(reader)?;

    import_rows(store, kind, rows)
}

/// Imports already-parsed JSON rows.
///
/// # Errors
///
/// See [`import_file`].
pub fn import_rows(store: &DuckDbStore, kind: ImportKind, rows: Vec<Value>) -> Result<u64, DbError> {
    let count = match kind {
        ImportKind::Clubs => store.insert_clubs(&entities(EntityKind::Club, rows)?)?,
        ImportKind::Meets => store.insert_meets(&entities(EntityKind::Meet, rows)?)?,
        ImportKind::Boundaries => store.insert_boundaries(&decode_all(rows)?)?,
        ImportKind::Results => store.insert_results(&decode_all(rows)?)?,
        ImportKind::Snapshots => store.insert_snapshots(&decode_all(rows)?)?,
    };

    log::info!("Imported {count} {kind} rows");
    Ok(count)
}

fn decode_all<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, DbError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(DbError::from))
        .collect()
}

fn entities(kind: EntityKind, rows: Vec<Value>) -> Result<Vec<Entity>, DbError> {
    rows.into_iter()
        .map(|mut row| {
            if let Value::Object(map) = &mut row {
                map.entry("kind")
                    .or_insert_with(|| Value::String(kind.to_string()));
            }
            Ok(serde_json::from_value(row)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResultsStore;
    use serde_json::json;

    #[tokio::test]
    async fn imports_clubs_without_kind() {
        let store = DuckDbStore::open_in_memory().unwrap();
        let count = import_rows(
            &store,
            ImportKind::Clubs,
            vec![
                json!({"name": "Iron Oak", "latitude": 30.2, "longitude": -97.7, "wsoGeography": "Texas-Oklahoma"}),
                json!({"name": "Gold Bar"}),
            ],
        )
        .unwrap();
        assert_eq!(count, 2);

        let clubs = store.clubs().await.unwrap();
        assert_eq!(clubs.len(), 1);
        assert_eq!(clubs[0].name, "Iron Oak");
        assert_eq!(clubs[0].kind, EntityKind::Club);
        assert_eq!(clubs[0].wso_geography.as_deref(), Some("Texas-Oklahoma"));
    }

    #[tokio::test]
    async fn imports_boundaries_and_snapshots() {
        let store = DuckDbStore::open_in_memory().unwrap();
        import_rows(
            &store,
            ImportKind::Boundaries,
            vec![json!({"name": "Florida", "states": ["Florida"], "territoryGeojson": null})],
        )
        .unwrap();
        import_rows(
            &store,
            ImportKind::Snapshots,
            vec![json!({"entityName": "Iron Oak", "month": "2024-05-01", "activeMembers12mo": 12})],
        )
        .unwrap();

        let boundaries = store.boundaries().await.unwrap();
        assert_eq!(boundaries[0].states, vec!["Florida".to_string()]);
        let snapshots = store.snapshots(None).await.unwrap();
        assert_eq!(snapshots[0].active_members_12mo, Some(12));
    }

    #[test]
    fn rejects_malformed_rows() {
        let store = DuckDbStore::open_in_memory().unwrap();
        let result = import_rows(&store, ImportKind::Results, vec![json!({"entityName": 3})]);
        assert!(matches!(result, Err(DbError::Json(_))));
    }
}
