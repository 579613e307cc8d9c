//! Startup wiring: registries are collected on an [`EngineBuilder`],
//! validated once, and frozen into a [`SearchEngine`].

use crate::{
    db::{
        connection::Connection,
        criteria::{
            CriteriaConverter, Criterion, CriterionHandler,
            handler::{HandlerDeps, content_handlers, content_type_handlers},
        },
        field::{
            DefaultFieldNames, FieldNameGenerator, FieldNameResolver, FieldValueHandler,
            FieldValueTranslator, IndexDefinition, IndexRegistry, SchemaProvider,
            value::CollationHandler,
        },
        gateway::{ExceptionConversion, FindQuery, QueryResult, SqlGateway},
        language::{LanguageFilter, LanguageRegistry},
        schema::SearchTarget,
        sort::{
            SortClauseConverter, SortClauseHandler,
            handler::{content_sort_handlers, content_type_sort_handlers},
        },
        transform::{Lowercase, StringTransformer},
    },
    error::InternalError,
};
use std::{collections::BTreeSet, sync::Arc};

/// `content.status` of published content.
pub const DEFAULT_PUBLISHED_STATUS: i64 = 1;

/// `content_type.status` of defined (non-draft) content types.
pub const DEFAULT_CONTENT_TYPE_STATUS: i64 = 0;

///
/// EngineBuilder
///
/// Handlers registered here are consulted before the built-in ones, so a
/// registration for an already-handled target replaces the built-in
/// behaviour. Content and content-type searches keep separate handler lists.
/// Built-ins can also be excluded by name, on both targets.
///

pub struct EngineBuilder {
    criterion_handlers: Vec<Arc<dyn CriterionHandler>>,
    sort_handlers: Vec<Arc<dyn SortClauseHandler>>,
    content_type_criterion_handlers: Vec<Arc<dyn CriterionHandler>>,
    content_type_sort_handlers: Vec<Arc<dyn SortClauseHandler>>,
    excluded: BTreeSet<&'static str>,
    field_value_handlers: Vec<(String, Arc<dyn FieldValueHandler>)>,
    default_field_value_handler: Option<Arc<dyn FieldValueHandler>>,
    indexables: Vec<(String, IndexDefinition)>,
    languages: Vec<(String, u64)>,
    transformer: Arc<dyn StringTransformer>,
    names: Arc<dyn FieldNameGenerator>,
    published_status: i64,
    content_type_status: i64,
    full_text_wildcards: bool,
    debug: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            criterion_handlers: Vec::new(),
            sort_handlers: Vec::new(),
            content_type_criterion_handlers: Vec::new(),
            content_type_sort_handlers: Vec::new(),
            excluded: BTreeSet::new(),
            field_value_handlers: Vec::new(),
            default_field_value_handler: None,
            indexables: Vec::new(),
            languages: Vec::new(),
            transformer: Arc::new(Lowercase),
            names: Arc::new(DefaultFieldNames),
            published_status: DEFAULT_PUBLISHED_STATUS,
            content_type_status: DEFAULT_CONTENT_TYPE_STATUS,
            full_text_wildcards: true,
            debug: false,
        }
    }
}

impl EngineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn register_criterion_handler(mut self, handler: Arc<dyn CriterionHandler>) -> Self {
        self.criterion_handlers.push(handler);
        self
    }

    #[must_use]
    pub fn register_sort_clause_handler(mut self, handler: Arc<dyn SortClauseHandler>) -> Self {
        self.sort_handlers.push(handler);
        self
    }

    #[must_use]
    pub fn register_content_type_criterion_handler(
        mut self,
        handler: Arc<dyn CriterionHandler>,
    ) -> Self {
        self.content_type_criterion_handlers.push(handler);
        self
    }

    #[must_use]
    pub fn register_content_type_sort_clause_handler(
        mut self,
        handler: Arc<dyn SortClauseHandler>,
    ) -> Self {
        self.content_type_sort_handlers.push(handler);
        self
    }

    /// Drop a built-in criterion or sort handler by name.
    #[must_use]
    pub fn exclude_builtin(mut self, name: &'static str) -> Self {
        self.excluded.insert(name);
        self
    }

    #[must_use]
    pub fn register_field_value_handler(
        mut self,
        type_identifier: impl Into<String>,
        handler: Arc<dyn FieldValueHandler>,
    ) -> Self {
        self.field_value_handlers
            .push((type_identifier.into(), handler));
        self
    }

    /// Replace the default field-value handler (collation by default).
    #[must_use]
    pub fn default_field_value_handler(mut self, handler: Arc<dyn FieldValueHandler>) -> Self {
        self.default_field_value_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn register_indexable(
        mut self,
        type_identifier: impl Into<String>,
        definition: IndexDefinition,
    ) -> Self {
        self.indexables.push((type_identifier.into(), definition));
        self
    }

    #[must_use]
    pub fn language(mut self, code: impl Into<String>, id: u64) -> Self {
        self.languages.push((code.into(), id));
        self
    }

    #[must_use]
    pub fn transformer(mut self, transformer: Arc<dyn StringTransformer>) -> Self {
        self.transformer = transformer;
        self
    }

    #[must_use]
    pub fn field_names(mut self, names: Arc<dyn FieldNameGenerator>) -> Self {
        self.names = names;
        self
    }

    #[must_use]
    pub const fn published_status(mut self, status: i64) -> Self {
        self.published_status = status;
        self
    }

    #[must_use]
    pub const fn content_type_status(mut self, status: i64) -> Self {
        self.content_type_status = status;
        self
    }

    #[must_use]
    pub const fn full_text_wildcards(mut self, enabled: bool) -> Self {
        self.full_text_wildcards = enabled;
        self
    }

    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate every registry, read the searchable field map once, and
    /// freeze the result.
    pub fn build(
        self,
        connection: Arc<dyn Connection>,
        schema: &dyn SchemaProvider,
    ) -> Result<SearchEngine, InternalError> {
        let mut indexes = IndexRegistry::new();
        for (type_identifier, definition) in self.indexables {
            indexes.register(type_identifier, definition)?;
        }

        let languages = Arc::new(LanguageRegistry::new(self.languages)?);

        let default_handler = self.default_field_value_handler.unwrap_or_else(|| {
            Arc::new(CollationHandler::new(Arc::clone(&self.transformer)))
        });
        let mut translator = FieldValueTranslator::new(Some(default_handler));
        for (type_identifier, handler) in self.field_value_handlers {
            translator.register(type_identifier, handler);
        }

        let resolver = Arc::new(FieldNameResolver::new(
            schema.searchable_field_map()?,
            indexes,
            self.names,
        ));

        let deps = HandlerDeps {
            resolver: Arc::clone(&resolver),
            translator: Arc::new(translator),
            languages: Arc::clone(&languages),
            transformer: self.transformer,
            full_text_wildcards: self.full_text_wildcards,
        };
        let excluded = &self.excluded;

        let content_criteria = CriteriaConverter::builder()
            .register_all(self.criterion_handlers)
            .register_all(
                content_handlers(&deps)
                    .into_iter()
                    .filter(|handler| !excluded.contains(handler.name())),
            )
            .build()?;
        let content_type_criteria = CriteriaConverter::builder()
            .register_all(self.content_type_criterion_handlers)
            .register_all(
                content_type_handlers(&deps)
                    .into_iter()
                    .filter(|handler| !excluded.contains(handler.name())),
            )
            .build()?;

        let content_sort = SortClauseConverter::builder()
            .register_all(self.sort_handlers)
            .register_all(
                content_sort_handlers(&resolver)
                    .into_iter()
                    .filter(|handler| !excluded.contains(handler.name())),
            )
            .build()?;
        let content_type_sort = SortClauseConverter::builder()
            .register_all(self.content_type_sort_handlers)
            .register_all(
                content_type_sort_handlers()
                    .into_iter()
                    .filter(|handler| !excluded.contains(handler.name())),
            )
            .build()?;

        let content = SqlGateway::new(
            Arc::clone(&connection),
            SearchTarget::content(self.published_status),
            Arc::new(content_criteria),
            Arc::new(content_sort),
            Arc::clone(&languages),
        )
        .debug(self.debug);
        let content_type = SqlGateway::new(
            connection,
            SearchTarget::content_type(self.content_type_status),
            Arc::new(content_type_criteria),
            Arc::new(content_type_sort),
            Arc::clone(&languages),
        )
        .debug(self.debug);

        Ok(SearchEngine {
            content: ExceptionConversion::new(content),
            content_type: ExceptionConversion::new(content_type),
            resolver,
            languages,
        })
    }
}

///
/// SearchEngine
///
/// Frozen registries plus one converted gateway per search target.
/// Shareable across threads; every call builds its own query context.
///

#[derive(Clone)]
pub struct SearchEngine {
    content: ExceptionConversion<SqlGateway>,
    content_type: ExceptionConversion<SqlGateway>,
    resolver: Arc<FieldNameResolver>,
    languages: Arc<LanguageRegistry>,
}

impl SearchEngine {
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Search content.
    pub fn find(&self, query: &FindQuery) -> Result<QueryResult, InternalError> {
        self.content.find(query)
    }

    /// Count matching content.
    pub fn count(
        &self,
        criterion: &Criterion,
        language_filter: &LanguageFilter,
    ) -> Result<u64, InternalError> {
        self.content.count(criterion, language_filter)
    }

    /// Search content types.
    pub fn find_content_types(&self, query: &FindQuery) -> Result<QueryResult, InternalError> {
        self.content_type.find(query)
    }

    /// Count matching content types.
    pub fn count_content_types(
        &self,
        criterion: &Criterion,
        language_filter: &LanguageFilter,
    ) -> Result<u64, InternalError> {
        self.content_type.count(criterion, language_filter)
    }

    #[must_use]
    pub const fn content_gateway(&self) -> &ExceptionConversion<SqlGateway> {
        &self.content
    }

    #[must_use]
    pub const fn content_type_gateway(&self) -> &ExceptionConversion<SqlGateway> {
        &self.content_type
    }

    #[must_use]
    pub fn resolver(&self) -> &FieldNameResolver {
        &self.resolver
    }

    #[must_use]
    pub fn languages(&self) -> &LanguageRegistry {
        &self.languages
    }
}
