//! Built-in criterion handlers and the per-target handler sets.

mod constant;
mod date;
mod field;
mod full_text;
mod identifier;
mod language;
mod location;

pub use constant::{MatchAllHandler, MatchNoneHandler};
pub use date::DateHandler;
pub use field::FieldHandler;
pub use full_text::FullTextHandler;
pub use identifier::{IdentifierHandler, SectionIdentifierHandler};
pub use language::LanguageCodeHandler;
pub use location::{
    AncestorHandler, MainNodeHandler, NodeHandler, SubtreeHandler, VisibilityHandler,
};

use crate::{
    db::{
        criteria::{CriterionError, LeafCriterion, Operator},
        field::{FieldNameResolver, FieldValueTranslator},
        language::LanguageRegistry,
        sql::{Fragment, QueryContext},
        transform::StringTransformer,
    },
    error::InternalError,
    value::Value,
};
use std::sync::Arc;

///
/// CriterionHandler
///
/// Compiles one family of leaf criteria. Handlers are stateless with respect
/// to a call: everything per-call goes through the [`QueryContext`].
///

pub trait CriterionHandler: Send + Sync {
    /// Stable registry name; unique within one converter.
    fn name(&self) -> &'static str;

    fn accepts(&self, leaf: &LeafCriterion) -> bool;

    fn build(
        &self,
        ctx: &mut QueryContext<'_>,
        leaf: &LeafCriterion,
    ) -> Result<Fragment, InternalError>;
}

///
/// HandlerDeps
/// Shared collaborators handed to the built-in handler sets.
///

#[derive(Clone)]
pub struct HandlerDeps {
    pub resolver: Arc<FieldNameResolver>,
    pub translator: Arc<FieldValueTranslator>,
    pub languages: Arc<LanguageRegistry>,
    pub transformer: Arc<dyn StringTransformer>,
    pub full_text_wildcards: bool,
}

/// Built-in handlers of the content target, in dispatch order.
#[must_use]
pub fn content_handlers(deps: &HandlerDeps) -> Vec<Arc<dyn CriterionHandler>> {
    vec![
        Arc::new(MatchAllHandler),
        Arc::new(MatchNoneHandler),
        Arc::new(IdentifierHandler::content_id()),
        Arc::new(IdentifierHandler::remote_id()),
        Arc::new(IdentifierHandler::content_type_id()),
        Arc::new(IdentifierHandler::content_type_identifier()),
        Arc::new(IdentifierHandler::content_type_group_id()),
        Arc::new(IdentifierHandler::section_id()),
        Arc::new(SectionIdentifierHandler),
        Arc::new(LanguageCodeHandler::new(Arc::clone(&deps.languages))),
        Arc::new(DateHandler::modified()),
        Arc::new(DateHandler::published()),
        Arc::new(NodeHandler::location_id()),
        Arc::new(NodeHandler::parent_location_id()),
        Arc::new(SubtreeHandler::subtree()),
        Arc::new(SubtreeHandler::permission_subtree()),
        Arc::new(AncestorHandler),
        Arc::new(VisibilityHandler),
        Arc::new(MainNodeHandler::depth()),
        Arc::new(MainNodeHandler::priority()),
        Arc::new(FieldHandler::new(
            Arc::clone(&deps.resolver),
            Arc::clone(&deps.translator),
        )),
        Arc::new(FullTextHandler::new(
            Arc::clone(&deps.transformer),
            deps.full_text_wildcards,
        )),
    ]
}

/// Built-in handlers of the content-type target, in dispatch order.
#[must_use]
pub fn content_type_handlers(deps: &HandlerDeps) -> Vec<Arc<dyn CriterionHandler>> {
    vec![
        Arc::new(MatchAllHandler),
        Arc::new(MatchNoneHandler),
        Arc::new(IdentifierHandler::type_id()),
        Arc::new(IdentifierHandler::type_identifier()),
        Arc::new(IdentifierHandler::type_group_id()),
        Arc::new(LanguageCodeHandler::new(Arc::clone(&deps.languages))),
    ]
}

/// Operand of a membership criterion; only `EQ` and `IN` are meaningful.
pub(crate) fn membership_values(leaf: &LeafCriterion) -> Result<Vec<Value>, CriterionError> {
    match leaf.op {
        Operator::Eq | Operator::In => Ok(leaf.value.to_list()),
        op => Err(CriterionError::unsupported_operator(op, &leaf.target)),
    }
}

/// Every element of the operand as text.
pub(crate) fn text_values(leaf: &LeafCriterion) -> Result<Vec<String>, CriterionError> {
    membership_values(leaf)?
        .into_iter()
        .map(|value| match value {
            Value::Text(text) => Ok(text),
            other => Err(CriterionError::invalid_value(
                &leaf.target,
                format!("expected text, got {other}"),
            )),
        })
        .collect()
}
