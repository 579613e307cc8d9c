use crate::{
    db::{
        criteria::{CriterionError, CriterionHandler, LeafCriterion, Target},
        schema::content,
        sql::{Fragment, QueryContext, compare::compare},
    },
    error::InternalError,
};

///
/// DateHandler
/// Timestamp column comparisons. Every operator except the pattern ones.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DateHandler {
    name: &'static str,
    target: Target,
    column: &'static str,
}

impl DateHandler {
    #[must_use]
    pub const fn modified() -> Self {
        Self {
            name: "date_modified",
            target: Target::DateModified,
            column: content::MODIFIED,
        }
    }

    #[must_use]
    pub const fn published() -> Self {
        Self {
            name: "date_published",
            target: Target::DatePublished,
            column: content::PUBLISHED,
        }
    }
}

impl CriterionHandler for DateHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        leaf.target == self.target
    }

    fn build(
        &self,
        ctx: &mut QueryContext<'_>,
        leaf: &LeafCriterion,
    ) -> Result<Fragment, InternalError> {
        let column = ctx.column(self.column);
        compare(ctx, &column, leaf.op, &leaf.value, |v| v).ok_or_else(|| {
            CriterionError::unsupported_operator(leaf.op, &leaf.target).into()
        })
    }
}
