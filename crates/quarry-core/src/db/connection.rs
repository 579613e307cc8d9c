use crate::{db::sql::SqlQuery, value::Value};
use derive_more::{Deref, IntoIterator};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, error::Error as StdError, fmt};
use thiserror::Error as ThisError;

///
/// Connection
///
/// Relational execution handle consumed by the gateway. Implementations bind
/// the named parameters of a [`SqlQuery`] and run it in a single round trip.
/// Driver failures are reported as [`DriverError`] and are converted into
/// domain errors only at the gateway boundary.
///

pub trait Connection: Send + Sync {
    /// Execute a `SELECT COUNT(...)` query and return its single integer cell.
    fn fetch_count(&self, query: &SqlQuery) -> Result<u64, DriverError>;

    /// Execute a row query and materialize every returned row.
    fn fetch_rows(&self, query: &SqlQuery) -> Result<Vec<Row>, DriverError>;
}

///
/// Row
/// One materialized result row keyed by column name.
///

#[derive(Clone, Debug, Default, Deref, Deserialize, IntoIterator, PartialEq, Serialize)]
pub struct Row(pub BTreeMap<String, Value>);

impl Row {
    #[must_use]
    pub fn int(&self, column: &str) -> Option<i64> {
        self.0.get(column).and_then(Value::as_int)
    }

    #[must_use]
    pub fn text(&self, column: &str) -> Option<&str> {
        self.0.get(column).and_then(Value::as_text)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

///
/// DriverErrorKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DriverErrorKind {
    Connection,
    Syntax,
    Constraint,
    Other,
}

impl fmt::Display for DriverErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Connection => "connection",
            Self::Syntax => "syntax",
            Self::Constraint => "constraint",
            Self::Other => "driver",
        };
        write!(f, "{label}")
    }
}

///
/// DriverError
/// Low-level failure surfaced by a [`Connection`] implementation.
///

#[derive(Debug, ThisError)]
#[error("{kind} error: {message}")]
pub struct DriverError {
    pub kind: DriverErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl DriverError {
    pub fn new(kind: DriverErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}
