use crate::convert::{driver_error, from_sqlite, to_sqlite};
use quarry_core::{
    db::{
        connection::{Connection, DriverError, DriverErrorKind, Row},
        sql::SqlQuery,
    },
    value::Value,
};
use rusqlite::{OpenFlags, ToSql};
use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

/// Lock wait applied to every opened database.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

///
/// SqliteConnection
///
/// One `rusqlite` connection behind a mutex. Queries run one at a time; a
/// statement is prepared per call and cached by SQLite.
///

pub struct SqliteConnection {
    conn: Mutex<rusqlite::Connection>,
}

impl SqliteConnection {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let conn = rusqlite::Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(driver_error)?;

        Self::from_rusqlite(conn)
    }

    pub fn open_in_memory() -> Result<Self, DriverError> {
        let conn = rusqlite::Connection::open_in_memory().map_err(driver_error)?;

        Self::from_rusqlite(conn)
    }

    pub fn from_rusqlite(conn: rusqlite::Connection) -> Result<Self, DriverError> {
        conn.busy_timeout(BUSY_TIMEOUT).map_err(driver_error)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run a batch of statements, e.g. a schema or fixture script.
    pub fn execute_batch(&self, sql: &str) -> Result<(), DriverError> {
        self.lock()?.execute_batch(sql).map_err(driver_error)
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, rusqlite::Connection>, DriverError> {
        self.conn
            .lock()
            .map_err(|_| DriverError::new(DriverErrorKind::Connection, "sqlite connection lock poisoned"))
    }
}

impl Connection for SqliteConnection {
    fn fetch_count(&self, query: &SqlQuery) -> Result<u64, DriverError> {
        let values = bindable(query)?;
        let named = named_params(query, &values);

        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&query.sql).map_err(driver_error)?;
        let count: i64 = stmt
            .query_row(named.as_slice(), |row| row.get(0))
            .map_err(driver_error)?;

        u64::try_from(count).map_err(|_| {
            DriverError::new(DriverErrorKind::Other, format!("negative count {count}"))
        })
    }

    fn fetch_rows(&self, query: &SqlQuery) -> Result<Vec<Row>, DriverError> {
        let values = bindable(query)?;
        let named = named_params(query, &values);

        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&query.sql).map_err(driver_error)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt.query(named.as_slice()).map_err(driver_error)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(driver_error)? {
            let mut cells: Vec<(String, Value)> = Vec::with_capacity(columns.len());
            for (index, column) in columns.iter().enumerate() {
                let cell = row.get_ref(index).map_err(driver_error)?;
                cells.push((column.clone(), from_sqlite(cell)));
            }
            out.push(cells.into_iter().collect());
        }

        Ok(out)
    }
}

fn bindable(query: &SqlQuery) -> Result<Vec<rusqlite::types::Value>, DriverError> {
    query
        .params
        .iter()
        .map(|(name, value)| to_sqlite(name, value))
        .collect()
}

fn named_params<'a>(
    query: &'a SqlQuery,
    values: &'a [rusqlite::types::Value],
) -> Vec<(&'a str, &'a dyn ToSql)> {
    query
        .params
        .iter()
        .zip(values)
        .map(|((name, _), value)| (name.as_str(), value as &dyn ToSql))
        .collect()
}
