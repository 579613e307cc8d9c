use crate::{
    db::{
        criteria::{CriterionError, CriterionHandler, LeafCriterion, Target, handler::text_values},
        language::LanguageRegistry,
        sql::{Fragment, QueryContext},
    },
    error::InternalError,
};
use std::sync::Arc;

///
/// LanguageCodeHandler
///
/// `(<mask column> & :mask) > 0` over the searched entity. The criterion's
/// `match_always_available` flag adds bit 0 to the mask.
///

#[derive(Clone, Debug)]
pub struct LanguageCodeHandler {
    languages: Arc<LanguageRegistry>,
}

impl LanguageCodeHandler {
    #[must_use]
    pub const fn new(languages: Arc<LanguageRegistry>) -> Self {
        Self { languages }
    }
}

impl CriterionHandler for LanguageCodeHandler {
    fn name(&self) -> &'static str {
        "language_code"
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        matches!(leaf.target, Target::LanguageCode { .. })
    }

    fn build(
        &self,
        ctx: &mut QueryContext<'_>,
        leaf: &LeafCriterion,
    ) -> Result<Fragment, InternalError> {
        let Target::LanguageCode {
            match_always_available,
        } = leaf.target
        else {
            return Err(CriterionError::NoHandlerForCriterion {
                target: leaf.target.to_string(),
            }
            .into());
        };
        let Some(mask_column) = ctx.target().language_mask_column else {
            return Err(CriterionError::unsupported_operator(leaf.op, &leaf.target).into());
        };

        let codes = text_values(leaf)?;
        let mask = self.languages.mask_for(&codes, match_always_available)?;
        if mask.bits() == 0 {
            return Ok(Fragment::always_false());
        }

        let column = ctx.column(mask_column);
        let placeholder = ctx.bind(mask.as_i64());
        Ok(Fragment::new(format!("({column} & {placeholder}) > 0")))
    }
}
