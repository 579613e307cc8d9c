//! ## Crate layout
//! - `config`: TOML configuration model and validation.
//! - `core`: criterion tree, compilers, gateway, and observability.
//! - `error`: public error type with a stable kind + origin taxonomy.
//! - `searcher`: a ready engine assembled from configuration.
//!
//! The `prelude` module carries the query vocabulary used by callers.

pub use quarry_config as config;
pub use quarry_core as core;

mod error;
mod searcher;


pub use error::{Error, ErrorKind, ErrorOrigin};
pub use searcher::Searcher;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Searcher,
        config::SearchConfig,
        core::{
            db::{
                connection::{Connection, Row},
                field::SchemaProvider,
                gateway::QueryResult,
            },
            prelude::*,
        },
    };
}
