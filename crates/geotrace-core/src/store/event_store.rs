//! Append-only SQLite event store

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use super::schema::Schema;
use crate::error::PersistenceError;
use crate::location::{LocationEvent, NewLocationEvent};

type Result<T> = std::result::Result<T, PersistenceError>;

/// Append-only store of location events backed by a SQLite file
#[derive(Debug, Clone)]
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    /// Open the store at the given path, creating the schema if absent
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Database file backing this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    fn initialize(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(Schema::create_tables())?;
        tracing::debug!("Event store ready at {:?}", self.path);
        Ok(())
    }

    /// Append an event and return its assigned id
    pub fn append(&self, event: &NewLocationEvent) -> Result<i64> {
        let conn = self.connect()?;
        let input = &event.input;

        conn.execute(
            r#"
            INSERT INTO location_events (latitude, longitude, method, accuracy, city, country, ip, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                input.latitude,
                input.longitude,
                input.method,
                input.accuracy,
                input.city,
                input.country,
                input.ip,
                event.timestamp,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Read every event, newest first. Equal timestamps surface the later insert first.
    pub fn list_all(&self) -> Result<Vec<LocationEvent>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, latitude, longitude, method, accuracy, city, country, ip, timestamp
            FROM location_events
            ORDER BY timestamp DESC, id DESC
            "#,
        )?;

        let events = stmt
            .query_map([], Self::row_to_event)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }

    fn row_to_event(row: &rusqlite::Row) -> rusqlite::Result<LocationEvent> {
        Ok(LocationEvent {
            id: row.get(0)?,
            latitude: row.get(1)?,
            longitude: row.get(2)?,
            method: row.get(3)?,
            accuracy: row.get(4)?,
            city: row.get(5)?,
            country: row.get(6)?,
            ip: row.get(7)?,
            timestamp: row.get(8)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationEventInput;

    fn temp_store() -> (tempfile::TempDir, EventStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::open(dir.path().join("events.db")).unwrap();
        (dir, store)
    }

    fn event_at(method: &str, timestamp: &str) -> NewLocationEvent {
        LocationEventInput::new(1.0, 2.0, method, "10m").stamp(timestamp)
    }

    #[test]
    fn test_empty_store() {
        let (_dir, store) = temp_store();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let (_dir, store) = temp_store();

        let first = store.append(&event_at("gps", "2026-01-01 10:00:00")).unwrap();
        let second = store.append(&event_at("gps", "2026-01-01 10:00:01")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_round_trip_fields() {
        let (_dir, store) = temp_store();

        let mut input = LocationEventInput::new(12.9, 77.6, "gps", "5m");
        input.city = "Bengaluru".to_string();
        input.ip = "203.0.113.7".to_string();
        let id = store.append(&input.clone().stamp("2026-03-04 05:06:07")).unwrap();

        let events = store.list_all().unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.id, id);
        assert_eq!(event.latitude, 12.9);
        assert_eq!(event.longitude, 77.6);
        assert_eq!(event.city, "Bengaluru");
        assert_eq!(event.country, "Unknown");
        assert_eq!(event.ip, "203.0.113.7");
        assert_eq!(event.timestamp, "2026-03-04 05:06:07");
    }

    #[test]
    fn test_list_orders_newest_first() {
        let (_dir, store) = temp_store();

        store.append(&event_at("old", "2026-01-01 09:00:00")).unwrap();
        store.append(&event_at("new", "2026-01-01 11:00:00")).unwrap();
        store.append(&event_at("mid", "2026-01-01 10:00:00")).unwrap();

        let methods: Vec<_> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|e| e.method)
            .collect();
        assert_eq!(methods, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_equal_timestamps_later_insert_first() {
        let (_dir, store) = temp_store();

        store.append(&event_at("first", "2026-01-01 10:00:00")).unwrap();
        store.append(&event_at("second", "2026-01-01 10:00:00")).unwrap();
        store.append(&event_at("third", "2026-01-01 10:00:00")).unwrap();

        let events = store.list_all().unwrap();
        let methods: Vec<_> = events.iter().map(|e| e.method.as_str()).collect();
        assert_eq!(methods, vec!["third", "second", "first"]);

        for pair in events.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.db");

        let store = EventStore::open(&path).unwrap();
        store.append(&event_at("gps", "2026-01-01 10:00:00")).unwrap();

        let reopened = EventStore::open(&path).unwrap();
        assert_eq!(reopened.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_list_sees_writes_from_other_handles() {
        let (_dir, store) = temp_store();
        let other = store.clone();

        assert!(store.list_all().unwrap().is_empty());
        other.append(&event_at("gps", "2026-01-01 10:00:00")).unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let err = EventStore::open("/nonexistent/dir/events.db").unwrap_err();
        assert!(matches!(err, PersistenceError::Database(_)));
    }
}
