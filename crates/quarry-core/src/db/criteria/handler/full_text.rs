use crate::{
    db::{
        criteria::{CriterionError, CriterionHandler, LeafCriterion, Operator, Target},
        schema::{search_object_word_link, search_word},
        sql::{Fragment, QueryContext, like},
        transform::StringTransformer,
    },
    error::InternalError,
    value::Value,
};
use std::sync::Arc;

///
/// FullTextHandler
///
/// Word-index search: the operand is split on whitespace, every word is
/// folded, and each must be linked to the entity. With wildcards enabled a
/// `*` inside a word becomes a LIKE wildcard; otherwise it matches itself.
///

#[derive(Clone)]
pub struct FullTextHandler {
    transformer: Arc<dyn StringTransformer>,
    wildcards: bool,
}

impl FullTextHandler {
    #[must_use]
    pub fn new(transformer: Arc<dyn StringTransformer>, wildcards: bool) -> Self {
        Self {
            transformer,
            wildcards,
        }
    }

    fn word_match(&self, ctx: &mut QueryContext<'_>, word: &str) -> Fragment {
        let link = ctx.next_alias("l");
        let words = ctx.next_alias("w");
        let column = format!("{words}.{}", search_word::WORD);
        let folded = self.transformer.fold(word);

        let predicate = if self.wildcards && folded.contains(like::CALLER_WILDCARD) {
            let placeholder = ctx.bind(like::translate_wildcards(&folded));
            like::predicate(&column, &placeholder)
        } else {
            let placeholder = ctx.bind(folded);
            format!("{column} = {placeholder}")
        };

        Fragment::new(format!(
            "{} IN (SELECT {link}.{} FROM {} AS {link} INNER JOIN {} AS {words} ON {words}.{} = {link}.{} WHERE {predicate})",
            ctx.id_column(),
            search_object_word_link::CONTENT_ID,
            search_object_word_link::TABLE,
            search_word::TABLE,
            search_word::ID,
            search_object_word_link::WORD_ID,
        ))
    }
}

impl CriterionHandler for FullTextHandler {
    fn name(&self) -> &'static str {
        "full_text"
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        leaf.target == Target::FullText
    }

    fn build(
        &self,
        ctx: &mut QueryContext<'_>,
        leaf: &LeafCriterion,
    ) -> Result<Fragment, InternalError> {
        if !matches!(leaf.op, Operator::Like | Operator::Eq | Operator::Contains) {
            return Err(CriterionError::unsupported_operator(leaf.op, &leaf.target).into());
        }
        let Value::Text(text) = leaf.value.to_scalar() else {
            return Err(CriterionError::invalid_value(&leaf.target, "expected search text").into());
        };

        let words = text.split_whitespace().collect::<Vec<_>>();
        if words.is_empty() {
            return Ok(Fragment::always_false());
        }

        let matches = words
            .into_iter()
            .map(|word| self.word_match(ctx, word))
            .collect();
        Ok(Fragment::and(matches))
    }
}
