pub mod fixtures;

use crate::db::{
    connection::{Connection, DriverError, DriverErrorKind, Row},
    sql::SqlQuery,
};
use std::sync::Mutex;

///
/// MockConnection
///
/// Recording connection for gateway tests. Returns a canned count and canned
/// rows, or fails every call with a driver error of the configured kind.
///

#[derive(Debug, Default)]
pub struct MockConnection {
    count: u64,
    rows: Vec<Row>,
    failure: Option<DriverErrorKind>,
    queries: Mutex<Vec<SqlQuery>>,
}

impl MockConnection {
    #[must_use]
    pub fn new(count: u64, rows: Vec<Row>) -> Self {
        Self {
            count,
            rows,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing(kind: DriverErrorKind) -> Self {
        Self {
            failure: Some(kind),
            ..Self::default()
        }
    }

    /// Every query received so far, in order.
    pub fn queries(&self) -> Vec<SqlQuery> {
        self.queries.lock().expect("mock lock").clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().expect("mock lock").len()
    }

    fn receive(&self, query: &SqlQuery) -> Result<(), DriverError> {
        self.queries.lock().expect("mock lock").push(query.clone());
        match self.failure {
            Some(kind) => Err(DriverError::new(kind, "mock failure")),
            None => Ok(()),
        }
    }
}

impl Connection for MockConnection {
    fn fetch_count(&self, query: &SqlQuery) -> Result<u64, DriverError> {
        self.receive(query)?;
        Ok(self.count)
    }

    fn fetch_rows(&self, query: &SqlQuery) -> Result<Vec<Row>, DriverError> {
        self.receive(query)?;
        Ok(self.rows.clone())
    }
}
