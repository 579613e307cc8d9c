//! Built-in sort clause handlers.

mod column;
mod field;

pub use column::ColumnSortHandler;
pub use field::FieldSortHandler;

use crate::{
    db::{field::FieldNameResolver, sort::SortClause, sql::QueryContext},
    error::InternalError,
};
use std::sync::Arc;

///
/// SortClauseHandler
///

pub trait SortClauseHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn accepts(&self, clause: &SortClause) -> bool;

    /// Request any joins the clause needs and return its ORDER BY terms.
    fn apply(
        &self,
        ctx: &mut QueryContext<'_>,
        clause: &SortClause,
    ) -> Result<Vec<String>, InternalError>;
}

/// Built-in sort handlers of the content target.
#[must_use]
pub fn content_sort_handlers(resolver: &Arc<FieldNameResolver>) -> Vec<Arc<dyn SortClauseHandler>> {
    vec![
        Arc::new(ColumnSortHandler::content_id()),
        Arc::new(ColumnSortHandler::content_name()),
        Arc::new(ColumnSortHandler::date_modified()),
        Arc::new(ColumnSortHandler::date_published()),
        Arc::new(ColumnSortHandler::section_identifier()),
        Arc::new(ColumnSortHandler::section_name()),
        Arc::new(ColumnSortHandler::location_depth()),
        Arc::new(ColumnSortHandler::location_priority()),
        Arc::new(ColumnSortHandler::location_path()),
        Arc::new(ColumnSortHandler::content_type_identifier()),
        Arc::new(FieldSortHandler::new(Arc::clone(resolver))),
    ]
}

/// Built-in sort handlers of the content-type target.
#[must_use]
pub fn content_type_sort_handlers() -> Vec<Arc<dyn SortClauseHandler>> {
    vec![
        Arc::new(ColumnSortHandler::type_id()),
        Arc::new(ColumnSortHandler::type_identifier()),
    ]
}
