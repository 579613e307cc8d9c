use crate::{
    db::sql::{Fragment, Join, QueryContext},
    value::Value,
};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Row cap rendered when an offset is requested without a limit.
const UNBOUNDED_LIMIT: i64 = i64::MAX;

///
/// SqlQuery
///
/// Fully rendered SQL text plus its named parameters, ready for a
/// [`Connection`](crate::db::connection::Connection).
///

#[derive(Clone, Debug, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<(String, Value)>,
}

impl SqlQuery {
    pub fn new(sql: impl Into<String>, params: Vec<(String, Value)>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Look up a bound parameter by placeholder name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }

    /// Stable SHA-256 over the SQL text and the bound parameters.
    /// Identical criteria compile to identical fingerprints, so callers can
    /// key result caches on it.
    #[must_use]
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.sql.as_bytes());
        for (name, value) in &self.params {
            hasher.update([0u8]);
            hasher.update(name.as_bytes());
            hasher.update([0u8]);
            hasher.update(value.to_string().as_bytes());
        }
        hasher.finalize().into()
    }

    /// Hex rendering of [`Self::fingerprint`].
    #[must_use]
    pub fn fingerprint_hex(&self) -> String {
        self.fingerprint()
            .iter()
            .fold(String::with_capacity(64), |mut out, byte| {
                let _ = write!(out, "{byte:02x}");
                out
            })
    }
}

///
/// SelectQuery
/// Structured SELECT composed by the gateway and rendered once.
///

#[derive(Clone, Debug)]
pub struct SelectQuery {
    pub columns: Vec<String>,
    pub table: String,
    pub alias: String,
    pub joins: Vec<Join>,
    pub predicate: Fragment,
    pub order_by: Vec<String>,
    pub limit: Option<u64>,
    pub offset: u64,
}

impl SelectQuery {
    #[must_use]
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            columns: Vec::new(),
            table: table.into(),
            alias: alias.into(),
            joins: Vec::new(),
            predicate: Fragment::always_true(),
            order_by: Vec::new(),
            limit: None,
            offset: 0,
        }
    }

    /// Render the query, consuming the context that holds its joins and
    /// parameters.
    #[must_use]
    pub fn render(mut self, ctx: QueryContext<'_>) -> SqlQuery {
        let (joins, params) = ctx.into_parts();
        self.joins.extend(joins);

        let mut sql = format!(
            "SELECT {} FROM {} AS {}",
            self.columns.join(", "),
            self.table,
            self.alias
        );
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.render());
        }
        if !self.predicate.is_always_true() {
            let _ = write!(sql, " WHERE {}", self.predicate);
        }
        if !self.order_by.is_empty() {
            let _ = write!(sql, " ORDER BY {}", self.order_by.join(", "));
        }
        // Backends bind LIMIT and OFFSET as signed 64-bit integers.
        let limit = self.limit.map(clamp_i64);
        let offset = clamp_i64(self.offset);
        match (limit, offset) {
            (Some(limit), 0) => {
                let _ = write!(sql, " LIMIT {limit}");
            }
            (Some(limit), offset) => {
                let _ = write!(sql, " LIMIT {limit} OFFSET {offset}");
            }
            (None, 0) => {}
            (None, offset) => {
                let _ = write!(sql, " LIMIT {UNBOUNDED_LIMIT} OFFSET {offset}");
            }
        }

        SqlQuery::new(sql, params)
    }
}

fn clamp_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
