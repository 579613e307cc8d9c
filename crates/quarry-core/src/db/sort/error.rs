use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use thiserror::Error as ThisError;

///
/// SortError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SortError {
    #[error("no sort clause handler accepts '{target}'")]
    NoHandlerForSortClause { target: String },

    #[error("sort clause handler '{name}' registered twice")]
    DuplicateHandler { name: String },
}

impl SortError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::NoHandlerForSortClause { .. } | Self::DuplicateHandler { .. } => {
                ErrorClass::Configuration
            }
        }
    }
}

impl From<SortError> for InternalError {
    fn from(err: SortError) -> Self {
        Self::new(err.class(), ErrorOrigin::Sort, err.to_string())
    }
}
