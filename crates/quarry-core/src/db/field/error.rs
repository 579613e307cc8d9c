use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use thiserror::Error as ThisError;

///
/// FieldError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum FieldError {
    #[error("attribute type '{type_identifier}' has no registered index definition")]
    NoIndexDefinition { type_identifier: String },

    #[error("attribute type '{type_identifier}' does not declare index field '{sub_field}'")]
    UndefinedIndexField {
        type_identifier: String,
        sub_field: String,
    },

    #[error("attribute type '{type_identifier}' has no default {purpose} field")]
    UndefinedDefaultField {
        type_identifier: String,
        purpose: &'static str,
    },

    #[error("no field value handler for attribute type '{type_identifier}' and no default handler")]
    NoFieldValueHandler { type_identifier: String },

    #[error("no searchable fields found for attribute '{attribute}'")]
    NoSearchableFields { attribute: String },

    #[error("entity type '{entity_type}' has no searchable attribute '{attribute}'")]
    UnknownField {
        entity_type: String,
        attribute: String,
    },

    #[error("custom field '{field}' is not a valid column name")]
    InvalidCustomField { field: String },
}

impl FieldError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::NoIndexDefinition { .. }
            | Self::UndefinedIndexField { .. }
            | Self::UndefinedDefaultField { .. }
            | Self::NoFieldValueHandler { .. } => ErrorClass::Configuration,
            Self::NoSearchableFields { .. }
            | Self::UnknownField { .. }
            | Self::InvalidCustomField { .. } => ErrorClass::InvalidArgument,
        }
    }
}

impl From<FieldError> for InternalError {
    fn from(err: FieldError) -> Self {
        Self::new(err.class(), ErrorOrigin::Field, err.to_string())
    }
}
