//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, Utc};
use rusqlite::Row;

use ipvault_core::resource::Resource;

/// Convert a SQLite row to a Resource.
///
/// Expected columns: id, name, ip, created_at, updated_at
pub fn row_to_resource(row: &Row) -> rusqlite::Result<Resource> {
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;

    Ok(Resource {
        id: row.get(0)?,
        name: row.get(1)?,
        ip: row.get(2)?,
        created_at: parse_datetime(3, &created_at)?,
        updated_at: parse_datetime(4, &updated_at)?,
    })
}

/// Parse an RFC 3339 timestamp stored in column `idx`.
fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Format a DateTime for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
