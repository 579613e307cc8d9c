//! TOML configuration for a Quarry search engine.
//!
//! The model is plain serde data. Everything that can be checked without a
//! database is checked by [`SearchConfig::validate`], which
//! [`SearchConfig::from_toml_str`] runs before returning.

mod error;
mod model;

#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use model::{
    FieldKind, IndexableConfig, SearchConfig, SearchSection, TransformationSection,
    ValueHandlerKind,
};
