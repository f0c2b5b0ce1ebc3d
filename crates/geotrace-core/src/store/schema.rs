//! SQLite schema for the location event log

/// SQLite schema definition
pub struct Schema;

impl Schema {
    /// Get the complete schema SQL. Safe to run against an existing database.
    pub fn create_tables() -> &'static str {
        r#"
-- Location events (append-only log)
CREATE TABLE IF NOT EXISTS location_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    method TEXT NOT NULL,
    accuracy TEXT NOT NULL,
    city TEXT NOT NULL,
    country TEXT NOT NULL,
    ip TEXT NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_location_events_timestamp ON location_events(timestamp);
"#
    }
}
