//! SQLite repository implementation.
//!
//! Implements [`ResourceRepository`] from `ipvault_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;
use tokio_rusqlite::Connection;

use ipvault_core::resource::{Resource, ResourceInput};
use ipvault_core::storage::{RepositoryError, ResourceRepository, Result};

use super::conversions::{format_datetime, row_to_resource};
use super::error::map_tokio_rusqlite_error;
use super::schema;

const ENTITY: &str = "Resource";

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn collect_rows(
    stmt: &mut rusqlite::Statement<'_>,
    params: impl rusqlite::Params,
) -> std::result::Result<Vec<Resource>, tokio_rusqlite::Error> {
    let rows = stmt.query_map(params, row_to_resource).map_err(wrap_err)?;

    let mut resources = Vec::new();
    for row_result in rows {
        resources.push(row_result.map_err(wrap_err)?);
    }
    Ok(resources)
}

/// SQLite-based resource repository.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl ResourceRepository for SqliteRepository {
    async fn create(&self, input: &ResourceInput) -> Result<Vec<Resource>> {
        let name = input.name.clone();
        let ip = input.ip.clone();
        let now = format_datetime(&Utc::now());

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::INSERT_RESOURCE).map_err(wrap_err)?;
                collect_rows(&mut stmt, params![name, ip, now])
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ENTITY))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Resource>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_RESOURCE_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([id], row_to_resource) {
                    Ok(resource) => Ok(Some(resource)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ENTITY))
    }

    async fn find_page(
        &self,
        limit: u32,
        offset: u64,
        name_filter: &str,
    ) -> Result<Vec<Resource>> {
        let pattern = schema::like_pattern(name_filter);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_RESOURCES_PAGE)
                    .map_err(wrap_err)?;
                collect_rows(&mut stmt, params![pattern, limit, offset])
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ENTITY))
    }

    async fn count(&self, name_filter: &str) -> Result<u64> {
        let pattern = schema::like_pattern(name_filter);

        let count: i64 = self
            .conn
            .call(move |conn| {
                conn.query_row(schema::COUNT_RESOURCES, [pattern], |row| row.get(0))
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ENTITY))?;

        u64::try_from(count).map_err(|e| RepositoryError::InvalidData(e.to_string()))
    }

    async fn update(&self, id: i64, input: &ResourceInput) -> Result<Vec<Resource>> {
        let name = input.name.clone();
        let ip = input.ip.clone();
        let now = format_datetime(&Utc::now());

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::UPDATE_RESOURCE).map_err(wrap_err)?;
                collect_rows(&mut stmt, params![id, name, ip, now])
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ENTITY))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(schema::DELETE_RESOURCE, [id])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ENTITY))
    }
}
