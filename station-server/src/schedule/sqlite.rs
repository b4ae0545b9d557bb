//! SQLite master schedule reader.
//!
//! Reads the `allocations` table maintained by the allocation tooling.
//! The table is wide text: times are "HH:MM" or "TBD", and the `days`
//! column joins weekday tokens (Sun..Sat). Rows that fail validation are
//! skipped with a warning rather than failing the whole load.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::domain::{DaySet, RunDay, ScheduleRecord, ScheduledArrival, TrainId};

use super::error::ScheduleError;
use super::source::ScheduleSource;

/// A raw `allocations` row before validation.
struct AllocationRow {
    train_number: String,
    train_name: String,
    category: String,
    from_station: String,
    to_station: String,
    arrives: String,
    platform: String,
    passengers: i64,
    priority: String,
    days: String,
}

/// Master schedule backed by a SQLite database file.
///
/// A connection is opened per query; the schedule is read a handful of
/// times per day, so connection reuse buys nothing.
#[derive(Debug, Clone)]
pub struct SqliteSchedule {
    path: PathBuf,
}

impl SqliteSchedule {
    /// Create a reader for the given database file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection, ScheduleError> {
        if !self.path.exists() {
            return Err(ScheduleError::Unavailable {
                message: format!("schedule database not found: {}", self.path.display()),
            });
        }
        Ok(Connection::open(&self.path)?)
    }

    fn load_rows(&self) -> Result<Vec<AllocationRow>, ScheduleError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT train_number, train_name, type, from_station, to_station, \
             arrives, allocated_platform, passengers, priority, days \
             FROM allocations",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(AllocationRow {
                train_number: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                train_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                category: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                from_station: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                to_station: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                arrives: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                platform: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                passengers: row.get::<_, Option<i64>>(7)?.unwrap_or_default(),
                priority: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
                days: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl ScheduleSource for SqliteSchedule {
    fn records_for(&self, day: RunDay) -> Result<Vec<ScheduleRecord>, ScheduleError> {
        let rows = self.load_rows()?;
        let records = rows
            .into_iter()
            .filter_map(convert_row)
            .filter(|r| r.days.contains(day))
            .collect();
        Ok(records)
    }

    fn check(&self) -> Result<(), ScheduleError> {
        let conn = self.open()?;
        conn.query_row("SELECT 1 FROM allocations LIMIT 1", [], |_| Ok(()))
            .or_else(|e| match e {
                // An empty table is healthy.
                rusqlite::Error::QueryReturnedNoRows => Ok(()),
                other => Err(ScheduleError::from(other)),
            })
    }
}

/// Validate a raw row into a schedule record, or drop it.
fn convert_row(row: AllocationRow) -> Option<ScheduleRecord> {
    let train_id = match TrainId::parse(&row.train_number) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(train_number = %row.train_number, error = %e, "skipping schedule row");
            return None;
        }
    };

    let days = DaySet::parse(&row.days);
    if days.is_empty() {
        tracing::warn!(train = %train_id, days = %row.days, "skipping schedule row with no run days");
        return None;
    }

    Some(ScheduleRecord {
        train_id,
        name: row.train_name,
        category: row.category,
        origin: row.from_station,
        destination: row.to_station,
        arrival: ScheduledArrival::parse(&row.arrives),
        platform: row.platform,
        passengers: row.passengers.try_into().unwrap_or(0),
        priority: row.priority,
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_db(path: &Path, rows: &[(&str, &str, &str, &str)]) {
        let conn = Connection::open(path).unwrap();
        conn.execute(
            "CREATE TABLE allocations (
                train_number TEXT,
                train_name TEXT,
                type TEXT,
                from_station TEXT,
                to_station TEXT,
                arrives TEXT,
                allocated_platform TEXT,
                passengers INTEGER,
                priority TEXT,
                days TEXT
            )",
            [],
        )
        .unwrap();

        for (number, name, arrives, days) in rows {
            conn.execute(
                "INSERT INTO allocations VALUES (?1, ?2, 'Express', 'New Delhi', 'Mumbai', ?3, '1', 450, 'High', ?4)",
                rusqlite::params![number, name, arrives, days],
            )
            .unwrap();
        }
    }

    #[test]
    fn loads_rows_for_day() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("allocations.db");
        create_db(
            &path,
            &[
                ("12345", "Rajdhani Express", "14:30", "Sun,Mon"),
                ("67890", "Shatabdi Express", "15:45", "Tue"),
            ],
        );

        let source = SqliteSchedule::new(&path);
        let records = source.records_for(RunDay::Sun).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].train_id.as_str(), "12345");
        assert_eq!(records[0].name, "Rajdhani Express");
        assert_eq!(records[0].arrival.time().unwrap().to_string(), "14:30");
        assert_eq!(records[0].passengers, 450);

        let records = source.records_for(RunDay::Tue).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].train_id.as_str(), "67890");
    }

    #[test]
    fn tbd_arrival_is_undetermined() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("allocations.db");
        create_db(&path, &[("12345", "Rajdhani Express", "TBD", "Sun")]);

        let source = SqliteSchedule::new(&path);
        let records = source.records_for(RunDay::Sun).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].arrival.time().is_none());
    }

    #[test]
    fn invalid_rows_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("allocations.db");
        create_db(
            &path,
            &[
                ("", "No Number", "10:00", "Sun"),
                ("22222", "No Days", "10:00", "whenever"),
                ("33333", "Valid", "10:00", "Sun"),
            ],
        );

        let source = SqliteSchedule::new(&path);
        let records = source.records_for(RunDay::Sun).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].train_id.as_str(), "33333");
    }

    #[test]
    fn missing_database_is_unavailable() {
        let source = SqliteSchedule::new("/nonexistent/allocations.db");
        let err = source.records_for(RunDay::Sun).unwrap_err();
        assert!(matches!(err, ScheduleError::Unavailable { .. }));
        assert!(source.check().is_err());
    }

    #[test]
    fn check_passes_on_empty_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("allocations.db");
        create_db(&path, &[]);

        let source = SqliteSchedule::new(&path);
        source.check().unwrap();
    }
}
