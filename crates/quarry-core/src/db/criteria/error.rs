use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use thiserror::Error as ThisError;

///
/// CriterionError
///
/// Failures raised while compiling a criterion tree. Missing handlers are
/// wiring defects and unsupported operators are fatal; malformed operands are
/// caller errors.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum CriterionError {
    #[error("no criterion handler accepts '{target}'")]
    NoHandlerForCriterion { target: String },

    #[error("operator '{operator}' is not supported for '{target}'")]
    UnsupportedOperator { operator: String, target: String },

    #[error("invalid value for '{target}': {message}")]
    InvalidValue { target: String, message: String },

    #[error("criterion handler '{name}' registered twice")]
    DuplicateHandler { name: String },
}

impl CriterionError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::NoHandlerForCriterion { .. } | Self::DuplicateHandler { .. } => {
                ErrorClass::Configuration
            }
            Self::UnsupportedOperator { .. } => ErrorClass::Unsupported,
            Self::InvalidValue { .. } => ErrorClass::InvalidArgument,
        }
    }

    pub(crate) fn unsupported_operator(
        operator: impl ToString,
        target: impl ToString,
    ) -> Self {
        Self::UnsupportedOperator {
            operator: operator.to_string(),
            target: target.to_string(),
        }
    }

    pub(crate) fn invalid_value(target: impl ToString, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            target: target.to_string(),
            message: message.into(),
        }
    }
}

impl From<CriterionError> for InternalError {
    fn from(err: CriterionError) -> Self {
        Self::new(err.class(), ErrorOrigin::Criterion, err.to_string())
    }
}
