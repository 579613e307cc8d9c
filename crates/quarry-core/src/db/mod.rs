pub mod connection;
pub mod criteria;
pub mod engine;
pub mod field;
pub mod gateway;
pub mod language;
pub mod schema;
pub mod sort;
pub mod sql;
pub mod transform;

pub use engine::{EngineBuilder, SearchEngine};
