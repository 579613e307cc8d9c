use crate::{
    db::{
        criteria::{CriterionError, Operator},
        field::value::{FieldColumn, FieldValueHandler, pattern_text},
        sql::{Fragment, QueryContext, compare::compare, like},
        transform::StringTransformer,
    },
    value::Value,
};
use std::sync::Arc;

///
/// CollationHandler
///
/// Default handler for textual attribute types. Values compared against a
/// case-folded column are folded with the injected transformer; LIKE and
/// CONTAINS patterns are always folded.
///

#[derive(Clone)]
pub struct CollationHandler {
    transformer: Arc<dyn StringTransformer>,
}

impl CollationHandler {
    #[must_use]
    pub fn new(transformer: Arc<dyn StringTransformer>) -> Self {
        Self { transformer }
    }

    fn fold(&self, value: Value) -> Value {
        match value {
            Value::Text(text) => Value::Text(self.transformer.fold(&text)),
            other => other,
        }
    }
}

impl FieldValueHandler for CollationHandler {
    fn name(&self) -> &'static str {
        "collation"
    }

    fn handle(
        &self,
        ctx: &mut QueryContext<'_>,
        op: Operator,
        value: &Value,
        column: &FieldColumn,
    ) -> Result<Fragment, CriterionError> {
        let folded = column.is_case_folded();
        if let Some(fragment) = compare(ctx, &column.column, op, value, |v| {
            if folded { self.fold(v) } else { v }
        }) {
            return Ok(fragment);
        }

        let text = pattern_text(value, column)?;
        let pattern = if op == Operator::Contains {
            like::contains(&text)
        } else {
            like::translate_wildcards(&text)
        };
        let placeholder = ctx.bind(self.transformer.fold(&pattern));

        Ok(Fragment::new(like::predicate(&column.column, &placeholder)))
    }
}
