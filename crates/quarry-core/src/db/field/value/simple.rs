use crate::{
    db::{
        criteria::{CriterionError, Operator},
        field::value::{FieldColumn, FieldValueHandler},
        sql::{Fragment, QueryContext, compare::compare},
    },
    value::Value,
};

///
/// SimpleHandler
/// Numeric and identifier attribute types: values are bound as given.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleHandler;

impl FieldValueHandler for SimpleHandler {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn handle(
        &self,
        ctx: &mut QueryContext<'_>,
        op: Operator,
        value: &Value,
        column: &FieldColumn,
    ) -> Result<Fragment, CriterionError> {
        compare(ctx, &column.column, op, value, |v| v)
            .ok_or_else(|| CriterionError::unsupported_operator(op, &column.column))
    }
}
