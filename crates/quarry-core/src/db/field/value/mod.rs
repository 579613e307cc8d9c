//! Field-value operator translation: one handler per attribute type, plus a
//! default used for every type without its own registration.

mod collation;
mod simple;

pub use collation::CollationHandler;
pub use simple::SimpleHandler;

use crate::{
    db::{
        criteria::{CriterionError, Operator},
        field::{FieldError, StorageKind},
        sql::{Fragment, QueryContext},
    },
    error::InternalError,
    value::Value,
};
use std::{collections::BTreeMap, sync::Arc};

///
/// FieldColumn
///
/// The qualified attribute column a translated predicate reads, and its
/// declared storage. `kind` is `None` for custom-field overrides.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldColumn {
    pub column: String,
    pub kind: Option<StorageKind>,
}

impl FieldColumn {
    pub fn new(column: impl Into<String>, kind: Option<StorageKind>) -> Self {
        Self {
            column: column.into(),
            kind,
        }
    }

    #[must_use]
    pub fn is_case_folded(&self) -> bool {
        self.kind.is_some_and(StorageKind::is_case_folded)
    }
}

///
/// FieldValueHandler
///

pub trait FieldValueHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Render `column <op> value`, binding operands into `ctx`.
    fn handle(
        &self,
        ctx: &mut QueryContext<'_>,
        op: Operator,
        value: &Value,
        column: &FieldColumn,
    ) -> Result<Fragment, CriterionError>;
}

///
/// FieldValueTranslator
/// Attribute type → handler, with an optional default.
///

#[derive(Clone, Default)]
pub struct FieldValueTranslator {
    handlers: BTreeMap<String, Arc<dyn FieldValueHandler>>,
    default: Option<Arc<dyn FieldValueHandler>>,
}

impl FieldValueTranslator {
    #[must_use]
    pub fn new(default: Option<Arc<dyn FieldValueHandler>>) -> Self {
        Self {
            handlers: BTreeMap::new(),
            default,
        }
    }

    /// Register (or replace) the handler for one attribute type.
    pub fn register(
        &mut self,
        type_identifier: impl Into<String>,
        handler: Arc<dyn FieldValueHandler>,
    ) {
        self.handlers.insert(type_identifier.into(), handler);
    }

    pub fn set_default(&mut self, handler: Arc<dyn FieldValueHandler>) {
        self.default = Some(handler);
    }

    pub fn handler(&self, type_identifier: &str) -> Result<&dyn FieldValueHandler, FieldError> {
        self.handlers
            .get(type_identifier)
            .or(self.default.as_ref())
            .map(|handler| &**handler)
            .ok_or_else(|| FieldError::NoFieldValueHandler {
                type_identifier: type_identifier.to_string(),
            })
    }

    pub fn translate(
        &self,
        ctx: &mut QueryContext<'_>,
        type_identifier: &str,
        op: Operator,
        value: &Value,
        column: &FieldColumn,
    ) -> Result<Fragment, InternalError> {
        let handler = self.handler(type_identifier)?;

        Ok(handler.handle(ctx, op, value, column)?)
    }
}

// Pattern operands may arrive as numbers; anything else has no text form.
fn pattern_text(value: &Value, column: &FieldColumn) -> Result<String, CriterionError> {
    match value.to_scalar() {
        Value::Text(text) => Ok(text),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(x) => Ok(x.to_string()),
        other => Err(CriterionError::invalid_value(
            &column.column,
            format!("pattern operand must be text, got {other}"),
        )),
    }
}
