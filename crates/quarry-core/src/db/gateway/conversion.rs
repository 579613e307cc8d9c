use crate::{
    db::{
        criteria::Criterion,
        gateway::{FindQuery, Gateway, GatewayError, QueryResult},
        language::LanguageFilter,
    },
    error::{ErrorOrigin, InternalError},
    obs::sink::{self, MetricsEvent},
};

///
/// ExceptionConversion
///
/// The single error boundary over a gateway. Driver failures leave as
/// `ErrorClass::Backend` with the driver error attached as detail; every
/// other error passes through unchanged.
///

#[derive(Clone)]
pub struct ExceptionConversion<G> {
    inner: G,
}

impl<G: Gateway> ExceptionConversion<G> {
    pub const fn new(inner: G) -> Self {
        Self { inner }
    }

    pub const fn inner(&self) -> &G {
        &self.inner
    }

    pub fn find(&self, query: &FindQuery) -> Result<QueryResult, InternalError> {
        self.inner.find(query).map_err(|err| self.convert(err))
    }

    pub fn count(
        &self,
        criterion: &Criterion,
        language_filter: &LanguageFilter,
    ) -> Result<u64, InternalError> {
        self.inner
            .count(criterion, language_filter)
            .map_err(|err| self.convert(err))
    }

    fn convert(&self, err: GatewayError) -> InternalError {
        match err {
            GatewayError::Driver(err) => {
                sink::record(MetricsEvent::BackendError {
                    target: self.inner.target().name(),
                });
                InternalError::backend(ErrorOrigin::Gateway, err)
            }
            GatewayError::Internal(err) => err,
        }
    }
}
