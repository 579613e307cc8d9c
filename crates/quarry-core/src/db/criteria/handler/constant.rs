use crate::{
    db::{
        criteria::{CriterionHandler, LeafCriterion, Target},
        sql::{Fragment, QueryContext},
    },
    error::InternalError,
};

///
/// MatchAllHandler
///

#[derive(Clone, Copy, Debug, Default)]
pub struct MatchAllHandler;

impl CriterionHandler for MatchAllHandler {
    fn name(&self) -> &'static str {
        "match_all"
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        leaf.target == Target::MatchAll
    }

    fn build(&self, _: &mut QueryContext<'_>, _: &LeafCriterion) -> Result<Fragment, InternalError> {
        Ok(Fragment::always_true())
    }
}

///
/// MatchNoneHandler
///

#[derive(Clone, Copy, Debug, Default)]
pub struct MatchNoneHandler;

impl CriterionHandler for MatchNoneHandler {
    fn name(&self) -> &'static str {
        "match_none"
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        leaf.target == Target::MatchNone
    }

    fn build(&self, _: &mut QueryContext<'_>, _: &LeafCriterion) -> Result<Fragment, InternalError> {
        Ok(Fragment::always_false())
    }
}
