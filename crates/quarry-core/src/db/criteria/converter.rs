use crate::{
    db::{
        criteria::{Criterion, CriterionError, CriterionHandler, LeafCriterion},
        sql::{Fragment, QueryContext},
    },
    error::InternalError,
};
use std::sync::Arc;

///
/// CriteriaConverter
///
/// Compiles a criterion tree into a WHERE fragment. Leaves go to the first
/// registered handler that accepts them, in registration order. Built once
/// at startup and shared read-only.
///

#[derive(Clone, Default)]
pub struct CriteriaConverter {
    handlers: Vec<Arc<dyn CriterionHandler>>,
}

impl CriteriaConverter {
    #[must_use]
    pub fn builder() -> CriteriaConverterBuilder {
        CriteriaConverterBuilder::default()
    }

    pub fn convert(
        &self,
        ctx: &mut QueryContext<'_>,
        criterion: &Criterion,
    ) -> Result<Fragment, InternalError> {
        match criterion {
            Criterion::And(children) => Ok(Fragment::and(self.convert_all(ctx, children)?)),
            Criterion::Or(children) => Ok(Fragment::or(self.convert_all(ctx, children)?)),
            // Only the first child of NOT is compiled.
            Criterion::Not(children) => {
                let inner = match children.first() {
                    Some(first) => self.convert(ctx, first)?,
                    None => Fragment::always_true(),
                };
                Ok(Fragment::not(inner))
            }
            Criterion::Leaf(leaf) => self.handler_for(leaf)?.build(ctx, leaf),
        }
    }

    fn convert_all(
        &self,
        ctx: &mut QueryContext<'_>,
        children: &[Criterion],
    ) -> Result<Vec<Fragment>, InternalError> {
        children
            .iter()
            .map(|child| self.convert(ctx, child))
            .collect()
    }

    fn handler_for(&self, leaf: &LeafCriterion) -> Result<&dyn CriterionHandler, CriterionError> {
        self.handlers
            .iter()
            .find(|handler| handler.accepts(leaf))
            .map(|handler| &**handler)
            .ok_or_else(|| CriterionError::NoHandlerForCriterion {
                target: leaf.target.to_string(),
            })
    }

    /// Registered handler names, in dispatch order.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }
}

///
/// CriteriaConverterBuilder
///

#[derive(Default)]
pub struct CriteriaConverterBuilder {
    handlers: Vec<Arc<dyn CriterionHandler>>,
}

impl CriteriaConverterBuilder {
    /// Append a handler; earlier registrations win on overlap.
    #[must_use]
    pub fn register(mut self, handler: Arc<dyn CriterionHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    #[must_use]
    pub fn register_all(mut self, handlers: impl IntoIterator<Item = Arc<dyn CriterionHandler>>) -> Self {
        self.handlers.extend(handlers);
        self
    }

    /// Freeze the registry, rejecting duplicate handler names.
    pub fn build(self) -> Result<CriteriaConverter, InternalError> {
        for (i, handler) in self.handlers.iter().enumerate() {
            if self.handlers[..i]
                .iter()
                .any(|earlier| earlier.name() == handler.name())
            {
                return Err(CriterionError::DuplicateHandler {
                    name: handler.name().to_string(),
                }
                .into());
            }
        }

        Ok(CriteriaConverter {
            handlers: self.handlers,
        })
    }
}
