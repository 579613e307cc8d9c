use crate::{
    db::{
        sort::{SortClause, SortClauseHandler, SortError},
        sql::QueryContext,
    },
    error::InternalError,
};
use std::sync::Arc;

///
/// SortClauseConverter
///
/// Compiles sort clauses into ORDER BY terms, requesting whatever joins they
/// need on the way. First accepting handler wins, as for criteria.
///

#[derive(Clone, Default)]
pub struct SortClauseConverter {
    handlers: Vec<Arc<dyn SortClauseHandler>>,
}

impl SortClauseConverter {
    #[must_use]
    pub fn builder() -> SortClauseConverterBuilder {
        SortClauseConverterBuilder::default()
    }

    /// ORDER BY terms for `clauses`, in clause order.
    pub fn convert(
        &self,
        ctx: &mut QueryContext<'_>,
        clauses: &[SortClause],
    ) -> Result<Vec<String>, InternalError> {
        let mut terms = Vec::with_capacity(clauses.len());
        for clause in clauses {
            let handler = self.handler_for(clause)?;
            terms.extend(handler.apply(ctx, clause)?);
        }

        Ok(terms)
    }

    fn handler_for(&self, clause: &SortClause) -> Result<&dyn SortClauseHandler, SortError> {
        self.handlers
            .iter()
            .find(|handler| handler.accepts(clause))
            .map(|handler| &**handler)
            .ok_or_else(|| SortError::NoHandlerForSortClause {
                target: clause.target.to_string(),
            })
    }

    #[must_use]
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }
}

///
/// SortClauseConverterBuilder
///

#[derive(Default)]
pub struct SortClauseConverterBuilder {
    handlers: Vec<Arc<dyn SortClauseHandler>>,
}

impl SortClauseConverterBuilder {
    #[must_use]
    pub fn register(mut self, handler: Arc<dyn SortClauseHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    #[must_use]
    pub fn register_all(
        mut self,
        handlers: impl IntoIterator<Item = Arc<dyn SortClauseHandler>>,
    ) -> Self {
        self.handlers.extend(handlers);
        self
    }

    pub fn build(self) -> Result<SortClauseConverter, InternalError> {
        for (i, handler) in self.handlers.iter().enumerate() {
            if self.handlers[..i]
                .iter()
                .any(|earlier| earlier.name() == handler.name())
            {
                return Err(SortError::DuplicateHandler {
                    name: handler.name().to_string(),
                }
                .into());
            }
        }

        Ok(SortClauseConverter {
            handlers: self.handlers,
        })
    }
}
