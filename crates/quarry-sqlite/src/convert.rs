use quarry_core::{
    db::connection::{DriverError, DriverErrorKind},
    value::Value,
};
use rusqlite::{ErrorCode, types::ValueRef};

/// Bindable form of a parameter. Lists never reach the driver.
pub(crate) fn to_sqlite(name: &str, value: &Value) -> Result<rusqlite::types::Value, DriverError> {
    let converted = match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Bool(flag) => rusqlite::types::Value::Integer(i64::from(*flag)),
        Value::Int(n) => rusqlite::types::Value::Integer(*n),
        Value::Float(x) => rusqlite::types::Value::Real(*x),
        Value::Text(text) => rusqlite::types::Value::Text(text.clone()),
        Value::List(_) => {
            return Err(DriverError::new(
                DriverErrorKind::Other,
                format!("parameter '{name}' is a list and cannot be bound"),
            ));
        }
    };

    Ok(converted)
}

pub(crate) fn from_sqlite(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Int(n),
        ValueRef::Real(x) => Value::Float(x),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Classify a driver failure and keep it as the source.
pub(crate) fn driver_error(err: rusqlite::Error) -> DriverError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(failure, message) => match failure.code {
            ErrorCode::ConstraintViolation => DriverErrorKind::Constraint,
            ErrorCode::CannotOpen
            | ErrorCode::NotADatabase
            | ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::PermissionDenied => DriverErrorKind::Connection,
            ErrorCode::Unknown if message.as_deref().is_some_and(is_syntax_message) => {
                DriverErrorKind::Syntax
            }
            _ => DriverErrorKind::Other,
        },
        rusqlite::Error::InvalidParameterName(_) | rusqlite::Error::InvalidColumnName(_) => {
            DriverErrorKind::Syntax
        }
        _ => DriverErrorKind::Other,
    };

    DriverError::new(kind, err.to_string()).with_source(err)
}

fn is_syntax_message(message: &str) -> bool {
    message.contains("syntax error") || message.starts_with("no such")
}
