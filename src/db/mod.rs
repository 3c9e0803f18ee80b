mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::models::*;

/// Handle to the durable store. Cheap to clone; all clones share one
/// serialized connection, so every read and write runs in its own critical
/// section.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "mission-control")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("mission-control.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Launch operations
    // ============================================================

    /// Create-or-replace a launch by flight number.
    ///
    /// Repeated application with identical data is a no-op; applying changed
    /// data fully replaces the stored fields. Failures surface as `Err` so
    /// callers decide whether a write failure is fatal or isolated.
    pub fn upsert_launch(&self, launch: &Launch) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO launches
                 (flight_number, mission, rocket, launch_date, target, upcoming, success, customers)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(flight_number) DO UPDATE SET
                 mission = excluded.mission,
                 rocket = excluded.rocket,
                 launch_date = excluded.launch_date,
                 target = excluded.target,
                 upcoming = excluded.upcoming,
                 success = excluded.success,
                 customers = excluded.customers",
            (
                launch.flight_number,
                &launch.mission,
                &launch.rocket,
                launch.launch_date.to_rfc3339(),
                &launch.target,
                launch.upcoming as i32,
                launch.success.map(|s| s as i32),
                serde_json::to_string(&launch.customers)?,
            ),
        )?;
        Ok(())
    }

    pub fn get_launch(&self, flight_number: u32) -> Result<Option<Launch>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {LAUNCH_COLUMNS} FROM launches WHERE flight_number = ?"
        ))?;
        let launch = stmt
            .query_row([flight_number], launch_from_row)
            .optional()?;
        Ok(launch)
    }

    /// Exact-match lookup on flight number, mission and rocket. Catalog sync
    /// uses this as its "already synced" sentinel probe.
    pub fn find_launch_matching(
        &self,
        flight_number: u32,
        mission: &str,
        rocket: &str,
    ) -> Result<Option<Launch>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {LAUNCH_COLUMNS} FROM launches
             WHERE flight_number = ? AND mission = ? AND rocket = ?"
        ))?;
        let launch = stmt
            .query_row((flight_number, mission, rocket), launch_from_row)
            .optional()?;
        Ok(launch)
    }

    /// A page of launches ordered ascending by flight number.
    ///
    /// `limit == 0` means unbounded.
    pub fn list_launches(&self, skip: u64, limit: u64) -> Result<Vec<Launch>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {LAUNCH_COLUMNS} FROM launches
             ORDER BY flight_number ASC LIMIT ? OFFSET ?"
        ))?;
        // SQLite treats a negative LIMIT as "no limit". Clamp both values
        // before the cast: a limit above i64::MAX must not flip negative and
        // become unbounded by accident, and an offset that large can only
        // ever address an empty page.
        let limit = if limit == 0 {
            -1
        } else {
            limit.min(i64::MAX as u64) as i64
        };
        let skip = skip.min(i64::MAX as u64) as i64;
        let launches = stmt
            .query_map((limit, skip), launch_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(launches)
    }

    /// Highest flight number currently persisted, `None` on an empty store.
    pub fn max_flight_number(&self) -> Result<Option<u32>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let max: Option<u32> =
            conn.query_row("SELECT MAX(flight_number) FROM launches", [], |row| {
                row.get(0)
            })?;
        Ok(max)
    }

    // ============================================================
    // Planet operations
    // ============================================================

    /// Idempotent create-if-absent by Kepler name. A planet record carries no
    /// other fields, so there is nothing to replace on conflict.
    pub fn upsert_planet(&self, kepler_name: &str) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT OR IGNORE INTO planets (kepler_name) VALUES (?)",
            [kepler_name],
        )?;
        Ok(())
    }

    pub fn planet_exists(&self, kepler_name: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM planets WHERE kepler_name = ?",
            [kepler_name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn get_all_planets(&self) -> Result<Vec<Planet>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT kepler_name FROM planets ORDER BY kepler_name")?;
        let planets = stmt
            .query_map([], |row| {
                Ok(Planet {
                    kepler_name: row.get(0)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(planets)
    }

    pub fn count_planets(&self) -> Result<u64> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM planets", [], |row| row.get(0))?;
        Ok(count)
    }
}

const LAUNCH_COLUMNS: &str =
    "flight_number, mission, rocket, launch_date, target, upcoming, success, customers";

fn launch_from_row(row: &Row<'_>) -> rusqlite::Result<Launch> {
    Ok(Launch {
        flight_number: row.get(0)?,
        mission: row.get(1)?,
        rocket: row.get(2)?,
        launch_date: parse_datetime(3, row.get(3)?)?,
        target: row.get(4)?,
        upcoming: row.get::<_, i32>(5)? != 0,
        success: row.get::<_, Option<i32>>(6)?.map(|s| s != 0),
        customers: parse_customers(7, row.get(7)?)?,
    })
}

// Corrupt stored text is a conversion failure, not a default value.

fn parse_datetime(idx: usize, s: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
        })
}

fn parse_customers(idx: usize, s: String) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(&s).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
    })
}
