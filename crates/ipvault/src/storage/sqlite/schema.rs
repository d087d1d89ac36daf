//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite repository,
//! following the Functional Core pattern - pure data, no I/O.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS resources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    ip TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_resources_name ON resources(name);
"#;

pub const INSERT_RESOURCE: &str = r#"
INSERT INTO resources (name, ip, created_at, updated_at)
VALUES (?1, ?2, ?3, ?3)
RETURNING id, name, ip, created_at, updated_at
"#;

pub const SELECT_RESOURCE_BY_ID: &str = r#"
SELECT id, name, ip, created_at, updated_at
FROM resources
WHERE id = ?1
"#;

/// `?1` must already have `%`, `_` and `\` escaped (see `like_pattern`).
pub const SELECT_RESOURCES_PAGE: &str = r#"
SELECT id, name, ip, created_at, updated_at
FROM resources
WHERE name LIKE ?1 ESCAPE '\'
ORDER BY id
LIMIT ?2 OFFSET ?3
"#;

pub const COUNT_RESOURCES: &str = r#"
SELECT COUNT(*)
FROM resources
WHERE name LIKE ?1 ESCAPE '\'
"#;

pub const UPDATE_RESOURCE: &str = r#"
UPDATE resources
SET name = ?2, ip = ?3, updated_at = ?4
WHERE id = ?1
RETURNING id, name, ip, created_at, updated_at
"#;

pub const DELETE_RESOURCE: &str = "DELETE FROM resources WHERE id = ?1";

/// Builds the LIKE pattern for a substring match on `filter`.
pub fn like_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for c in filter.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
