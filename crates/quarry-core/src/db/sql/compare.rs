use crate::{
    db::{
        criteria::Operator,
        sql::{Fragment, QueryContext},
    },
    value::Value,
};

///
/// Comparison rendering shared by every handler that compares one column
/// against a criterion operand.
///
/// Operands are coerced leniently: list operators accept a scalar as a
/// one-element list, scalar operators take the first element of a list, and
/// `BETWEEN` with a single element uses it as both bounds. `normalize` runs
/// on every value before it is bound.
///
/// Returns `None` for the pattern operators (`LIKE`, `CONTAINS`), which each
/// caller renders (or rejects) itself.
///

pub(crate) fn compare(
    ctx: &mut QueryContext<'_>,
    column: &str,
    op: Operator,
    value: &Value,
    normalize: impl Fn(Value) -> Value,
) -> Option<Fragment> {
    let fragment = match op {
        Operator::Eq | Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => {
            let placeholder = ctx.bind(normalize(value.to_scalar()));
            Fragment::new(format!("{column} {} {placeholder}", op.as_str()))
        }
        Operator::In => {
            let values = value.to_list().into_iter().map(normalize).collect();
            ctx.in_list(column, values)
        }
        Operator::Between => {
            let bounds = value.to_list();
            let low = bounds.first().cloned().unwrap_or(Value::Null);
            let high = bounds.get(1).cloned().unwrap_or_else(|| low.clone());
            let low = ctx.bind(normalize(low));
            let high = ctx.bind(normalize(high));
            Fragment::new(format!("{column} BETWEEN {low} AND {high}"))
        }
        Operator::Like | Operator::Contains => return None,
    };

    Some(fragment)
}
