//! SQL fragments, per-call query context, and the composed query handed to a
//! [`Connection`](crate::db::connection::Connection).

pub(crate) mod compare;
mod context;
mod fragment;
pub(crate) mod like;
mod query;

#[cfg(test)]
mod tests;

pub use context::{Join, JoinKind, QueryContext};
pub use fragment::Fragment;
pub use query::{SelectQuery, SqlQuery};
