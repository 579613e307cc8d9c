use derive_more::Display;
use quarry_config::ConfigError;
use quarry_core::error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self::new(err.class.into(), err.origin.into(), err.message)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Configuration, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Configuration,
    Unsupported,
    InvalidArgument,
    NotFound,
    Backend,
    Internal,
}

impl From<ErrorClass> for ErrorKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::Configuration => Self::Configuration,
            ErrorClass::Unsupported => Self::Unsupported,
            ErrorClass::InvalidArgument => Self::InvalidArgument,
            ErrorClass::NotFound => Self::NotFound,
            ErrorClass::Backend => Self::Backend,
            ErrorClass::Internal => Self::Internal,
        }
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Criterion,
    Sort,
    Field,
    Language,
    Schema,
    Gateway,
    Config,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Criterion => Self::Criterion,
            CoreErrorOrigin::Sort => Self::Sort,
            CoreErrorOrigin::Field => Self::Field,
            CoreErrorOrigin::Language => Self::Language,
            CoreErrorOrigin::Schema => Self::Schema,
            CoreErrorOrigin::Gateway => Self::Gateway,
            CoreErrorOrigin::Config => Self::Config,
        }
    }
}
