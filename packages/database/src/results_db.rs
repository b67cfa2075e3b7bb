//! `DuckDB`-backed [`ResultsStore`].
//!
//! One file holds every table. Dates are written through `CAST(? AS
//! DATE)` and read back as `VARCHAR`, and territories are stored as
//! `GeoJSON` text.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use duckdb::Connection;
use wso_atlas_analytics_models::{EventRow, ParticipantId, Snapshot};
use wso_atlas_database_models::BoundaryRecord;
use wso_atlas_geography::parse_territory;
use wso_atlas_geography_models::{Boundary, Entity, EntityKind};

use crate::{DbError, ResultsStore};

const CLUB_COLUMNS: &str = "club_name, address, geocode_display_name, city, state, \
                            latitude, longitude, wso_geography";

/// Entity rows without both coordinates are never read back.
const LOCATED: &str = "latitude IS NOT NULL AND longitude IS NOT NULL";

/// Results store over a single `DuckDB` connection.
///
/// `duckdb::Connection` is `Send` but not `Sync`, so it lives behind a
/// `Mutex`. Queries are short and run while the lock is held.
pub struct DuckDbStore {
    conn: Mutex<Connection>,
}

impl DuckDbStore {
    /// Opens (or creates) the database file and ensures the schema
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the directory, connection or schema
    /// creation fails.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            crate::paths::ensure_dir(parent)?;
        }

        let conn = Connection::open(path)?;
        log::info!("Opened results database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Opens a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or schema creation fails.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DbError> {
        create_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    /// Inserts clubs. Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any insert fails.
    pub fn insert_clubs(&self, clubs: &[Entity]) -> Result<u64, DbError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut total = 0u64;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO clubs ({CLUB_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
            ))?;
            for club in clubs {
                total += stmt.execute(duckdb::params![
                    club.name,
                    club.address,
                    club.display_name,
                    club.city,
                    club.state,
                    club.latitude,
                    club.longitude,
                    club.wso_geography,
                ])? as u64;
            }
        }
        tx.commit()?;
        Ok(total)
    }

    /// Inserts meets. Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any insert fails.
    pub fn insert_meets(&self, meets: &[Entity]) -> Result<u64, DbError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut total = 0u64;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO meets (meet_id, meet_name, meet_date, address, city, state, \
                 latitude, longitude, wso_geography)
                 VALUES (?, ?, CAST(? AS DATE), ?, ?, ?, ?, ?, ?)",
            )?;
            for meet in meets {
                total += stmt.execute(duckdb::params![
                    meet.id,
                    meet.name,
                    meet.date.map(|d| d.to_string()),
                    meet.address,
                    meet.city,
                    meet.state,
                    meet.latitude,
                    meet.longitude,
                    meet.wso_geography,
                ])? as u64;
            }
        }
        tx.commit()?;
        Ok(total)
    }

    /// Inserts or replaces boundaries by name. Returns the number of rows
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if serialization or any insert fails.
    pub fn insert_boundaries(&self, records: &[BoundaryRecord]) -> Result<u64, DbError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut total = 0u64;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO wso_information (name, states, territory_geojson)
                 VALUES (?, ?, ?)",
            )?;
            for record in records {
                let states = serde_json::to_string(&record.states)?;
                let territory = record
                    .territory_geojson
                    .as_ref()
                    .filter(|v| !v.is_null())
                    .map(serde_json::to_string)
                    .transpose()?;
                total += stmt.execute(duckdb::params![record.name, states, territory])? as u64;
            }
        }
        tx.commit()?;
        Ok(total)
    }

    /// Inserts competition results. Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any insert fails.
    pub fn insert_results(&self, events: &[EventRow]) -> Result<u64, DbError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut total = 0u64;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO meet_results (club_name, lifter_id, meet_id, meet_name, meet_date, wso)
                 VALUES (?, ?, ?, ?, CAST(? AS DATE), ?)",
            )?;
            for event in events {
                total += stmt.execute(duckdb::params![
                    event.entity_name,
                    event.participant_id.key(),
                    event.event_id,
                    event.event_name,
                    event.date.to_string(),
                    event.region,
                ])? as u64;
            }
        }
        tx.commit()?;
        Ok(total)
    }

    /// Inserts monthly snapshots. Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a value does not fit a `BIGINT` or any
    /// insert fails.
    pub fn insert_snapshots(&self, snapshots: &[Snapshot]) -> Result<u64, DbError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut total = 0u64;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO club_rolling_metrics (club_name, snapshot_month, \
                 active_members_12mo, total_competitions_12mo, unique_lifters_12mo)
                 VALUES (?, CAST(? AS DATE), ?, ?, ?)",
            )?;
            for snapshot in snapshots {
                total += stmt.execute(duckdb::params![
                    snapshot.entity_name,
                    snapshot.month.to_string(),
                    to_bigint(snapshot.active_members_12mo)?,
                    to_bigint(snapshot.total_competitions_12mo)?,
                    to_bigint(snapshot.unique_lifters_12mo)?,
                ])? as u64;
            }
        }
        tx.commit()?;
        Ok(total)
    }
}

fn create_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS clubs (
            club_name TEXT NOT NULL,
            address TEXT,
            geocode_display_name TEXT,
            city TEXT,
            state TEXT,
            latitude DOUBLE,
            longitude DOUBLE,
            wso_geography TEXT
        );

        CREATE TABLE IF NOT EXISTS meets (
            meet_id BIGINT,
            meet_name TEXT NOT NULL,
            meet_date DATE,
            address TEXT,
            city TEXT,
            state TEXT,
            latitude DOUBLE,
            longitude DOUBLE,
            wso_geography TEXT
        );

        CREATE TABLE IF NOT EXISTS wso_information (
            name TEXT PRIMARY KEY,
            states TEXT,
            territory_geojson TEXT
        );

        CREATE TABLE IF NOT EXISTS meet_results (
            club_name TEXT,
            lifter_id TEXT NOT NULL,
            meet_id BIGINT,
            meet_name TEXT,
            meet_date DATE NOT NULL,
            wso TEXT
        );

        CREATE TABLE IF NOT EXISTS club_rolling_metrics (
            club_name TEXT NOT NULL,
            snapshot_month DATE NOT NULL,
            active_members_12mo BIGINT,
            total_competitions_12mo BIGINT,
            unique_lifters_12mo BIGINT
        );",
    )?;

    Ok(())
}

fn to_bigint(value: Option<u64>) -> Result<Option<i64>, DbError> {
    value
        .map(|v| {
            i64::try_from(v).map_err(|_| DbError::Conversion {
                message: format!("{v} does not fit in BIGINT"),
            })
        })
        .transpose()
}

fn from_bigint(value: Option<i64>) -> Result<Option<u64>, DbError> {
    value
        .map(|v| {
            u64::try_from(v).map_err(|_| DbError::Conversion {
                message: format!("negative metric value {v}"),
            })
        })
        .transpose()
}

fn to_limit(value: usize) -> Result<i64, DbError> {
    i64::try_from(value).map_err(|_| DbError::Conversion {
        message: format!("{value} is too large for LIMIT/OFFSET"),
    })
}

fn parse_date(text: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| DbError::Conversion {
        message: format!("Bad date {text:?}: {e}"),
    })
}

fn parse_participant(text: String) -> ParticipantId {
    text.parse::<i64>()
        .map_or(ParticipantId::Text(text), ParticipantId::Int)
}

fn club_from_row(row: &duckdb::Row<'_>) -> Result<Entity, DbError> {
    let mut club = Entity::new(EntityKind::Club, row.get::<_, String>(0)?);
    club.address = row.get(1)?;
    club.display_name = row.get(2)?;
    club.city = row.get(3)?;
    club.state = row.get(4)?;
    club.latitude = row.get(5)?;
    club.longitude = row.get(6)?;
    club.wso_geography = row.get(7)?;
    Ok(club)
}

fn read_clubs(conn: &Connection, sql: &str, params: &[&dyn duckdb::ToSql]) -> Result<Vec<Entity>, DbError> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut clubs = Vec::new();
    while let Some(row) = rows.next()? {
        clubs.push(club_from_row(row)?);
    }
    Ok(clubs)
}

#[async_trait]
impl ResultsStore for DuckDbStore {
    async fn clubs(&self) -> Result<Vec<Entity>, DbError> {
        let conn = self.lock()?;
        let clubs = read_clubs(
            &conn,
            &format!("SELECT {CLUB_COLUMNS} FROM clubs WHERE {LOCATED} ORDER BY club_name"),
            &[],
        )?;
        log::debug!("Loaded {} clubs", clubs.len());
        Ok(clubs)
    }

    async fn meets(&self, since: Option<NaiveDate>) -> Result<Vec<Entity>, DbError> {
        const SELECT: &str = "SELECT meet_id, meet_name, CAST(meet_date AS VARCHAR), address, \
                              city, state, latitude, longitude, wso_geography FROM meets";
        const ORDER: &str = "ORDER BY meet_date DESC NULLS LAST, meet_name";

        let conn = self.lock()?;
        let (sql, since_text) = match since {
            Some(since) => (
                format!("{SELECT} WHERE {LOCATED} AND meet_date >= CAST(? AS DATE) {ORDER}"),
                Some(since.to_string()),
            ),
            None => (format!("{SELECT} WHERE {LOCATED} {ORDER}"), None),
        };

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = match &since_text {
            Some(text) => stmt.query([text])?,
            None => stmt.query([])?,
        };

        let mut meets = Vec::new();
        while let Some(row) = rows.next()? {
            let mut meet = Entity::new(EntityKind::Meet, row.get::<_, String>(1)?);
            meet.id = row.get(0)?;
            meet.date = row
                .get::<_, Option<String>>(2)?
                .as_deref()
                .map(parse_date)
                .transpose()?;
            meet.address = row.get(3)?;
            meet.city = row.get(4)?;
            meet.state = row.get(5)?;
            meet.latitude = row.get(6)?;
            meet.longitude = row.get(7)?;
            meet.wso_geography = row.get(8)?;
            meets.push(meet);
        }
        Ok(meets)
    }

    async fn boundaries(&self) -> Result<Vec<Boundary>, DbError> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT name, states, territory_geojson FROM wso_information ORDER BY name")?;
        let mut rows = stmt.query([])?;

        let mut boundaries = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            let states = match row.get::<_, Option<String>>(1)? {
                Some(text) if !text.trim().is_empty() => serde_json::from_str(&text)?,
                _ => Vec::new(),
            };
            let territory: Option<String> = row.get(2)?;

            let mut boundary = Boundary::new(name, parse_territory(territory.as_deref()));
            boundary.states = states;
            if !boundary.has_geometry() {
                log::debug!("Boundary '{}' has no territory loaded", boundary.name);
            }
            boundaries.push(boundary);
        }

        log::debug!("Loaded {} boundaries", boundaries.len());
        Ok(boundaries)
    }

    async fn events_page(
        &self,
        since: NaiveDate,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<EventRow>, DbError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT club_name, lifter_id, meet_id, meet_name, CAST(meet_date AS VARCHAR), wso
             FROM meet_results
             WHERE meet_date >= CAST(? AS DATE)
             ORDER BY meet_date, rowid
             LIMIT ? OFFSET ?",
        )?;
        let mut rows = stmt.query(duckdb::params![
            since.to_string(),
            to_limit(limit)?,
            to_limit(offset)?
        ])?;

        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(EventRow {
                entity_name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                participant_id: parse_participant(row.get(1)?),
                event_id: row.get(2)?,
                event_name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                date: parse_date(&row.get::<_, String>(4)?)?,
                region: row.get(5)?,
            });
        }
        Ok(events)
    }

    async fn snapshots(&self, since: Option<NaiveDate>) -> Result<Vec<Snapshot>, DbError> {
        const SELECT: &str = "SELECT club_name, CAST(snapshot_month AS VARCHAR), \
                              active_members_12mo, total_competitions_12mo, unique_lifters_12mo \
                              FROM club_rolling_metrics";
        const ORDER: &str = "ORDER BY snapshot_month, club_name";

        let conn = self.lock()?;
        let (sql, since_text) = match since {
            Some(since) => (
                format!("{SELECT} WHERE snapshot_month >= CAST(? AS DATE) {ORDER}"),
                Some(since.to_string()),
            ),
            None => (format!("{SELECT} {ORDER}"), None),
        };

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = match &since_text {
            Some(text) => stmt.query([text])?,
            None => stmt.query([])?,
        };

        let mut snapshots = Vec::new();
        while let Some(row) = rows.next()? {
            snapshots.push(Snapshot {
                entity_name: row.get(0)?,
                month: parse_date(&row.get::<_, String>(1)?)?,
                active_members_12mo: from_bigint(row.get(2)?)?,
                total_competitions_12mo: from_bigint(row.get(3)?)?,
                unique_lifters_12mo: from_bigint(row.get(4)?)?,
            });
        }
        Ok(snapshots)
    }

    async fn find_clubs(&self, pattern: &str, limit: usize) -> Result<Vec<Entity>, DbError> {
        let conn = self.lock()?;
        let limit = to_limit(limit)?;
        read_clubs(
            &conn,
            &format!(
                "SELECT {CLUB_COLUMNS} FROM clubs \
                 WHERE {LOCATED} AND club_name ILIKE ? ORDER BY club_name LIMIT ?"
            ),
            &[&pattern, &limit],
        )
    }
}
