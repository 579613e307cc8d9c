//! Core of Quarry: the criterion tree, criteria and sort compilation over a
//! normalized content/attribute schema, the query gateway with its error
//! boundary, and the ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod db;
pub mod error;
pub mod obs;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, gateways, connections, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::{
            criteria::{Criterion, Operator, Target},
            gateway::FindQuery,
            language::LanguageFilter,
            sort::{SortClause, SortDirection, SortTarget},
        },
        value::Value,
    };
}
