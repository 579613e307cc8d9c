//! SQLite backend for Quarry: a [`Connection`](quarry_core::db::connection::Connection)
//! over `rusqlite` and a schema provider reading the searchable field map
//! from the content-type tables.

mod connection;
mod convert;
mod schema;

pub use connection::SqliteConnection;
pub use schema::SqliteSchemaProvider;
