use crate::db::connection::DriverError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable classification.
/// Every public compiler and gateway operation returns this type once it has
/// crossed the exception-conversion boundary.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    #[source]
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a wiring/registration defect for a specific origin.
    pub(crate) fn configuration(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Configuration, origin, message)
    }

    /// Construct an invalid-argument error for a specific origin.
    pub(crate) fn invalid_argument(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidArgument, origin, message)
    }

    /// Construct a not-found error for a specific origin.
    pub(crate) fn not_found(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::NotFound, origin, message)
    }

    /// Wrap a driver failure; the only constructor producing `ErrorClass::Backend`.
    /// Connection crates use it when a schema read fails.
    #[must_use]
    pub fn backend(origin: ErrorOrigin, err: DriverError) -> Self {
        Self {
            class: ErrorClass::Backend,
            origin,
            message: format!("search backend failure: {err}"),
            detail: Some(ErrorDetail::Driver(err)),
        }
    }

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.class, ErrorClass::Configuration)
    }

    /// Borrow the driver failure when this error came from the backend.
    #[must_use]
    pub const fn driver_error(&self) -> Option<&DriverError> {
        match &self.detail {
            Some(ErrorDetail::Driver(err)) => Some(err),
            None => None,
        }
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Driver(#[source] DriverError),
}

///
/// ErrorClass
///
/// `Configuration` marks wiring defects such as missing handlers or undeclared
/// index fields. `Unsupported` marks an operator a handler has no rule for.
/// Neither is retried.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Unsupported,
    InvalidArgument,
    NotFound,
    Backend,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Unsupported => "unsupported",
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Backend => "backend",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Criterion,
    Sort,
    Field,
    Language,
    Schema,
    Gateway,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Criterion => "criterion",
            Self::Sort => "sort",
            Self::Field => "field",
            Self::Language => "language",
            Self::Schema => "schema",
            Self::Gateway => "gateway",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}
