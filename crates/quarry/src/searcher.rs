use crate::Error;
use quarry_config::{FieldKind, IndexableConfig, SearchConfig, ValueHandlerKind};
use quarry_core::{
    db::{
        EngineBuilder, SearchEngine,
        connection::Connection,
        criteria::Criterion,
        field::{
            FieldValueHandler, IndexDefinition, SchemaProvider, StorageKind,
            value::{CollationHandler, SimpleHandler},
        },
        gateway::{FindQuery, QueryResult},
        language::LanguageFilter,
        transform::{RuleTable, StringTransformer},
    },
};
use std::sync::Arc;

///
/// Searcher
///
/// A [`SearchEngine`] assembled from a [`SearchConfig`]. Construction reads
/// the searchable field map once; rebuild the searcher after schema changes.
///

#[derive(Clone)]
pub struct Searcher {
    engine: SearchEngine,
    config: SearchConfig,
}

impl Searcher {
    pub fn from_config(
        config: SearchConfig,
        connection: Arc<dyn Connection>,
        schema: &dyn SchemaProvider,
    ) -> Result<Self, Error> {
        config.validate()?;
        let engine = Self::builder(&config).build(connection, schema)?;

        tracing::debug!(
            languages = config.languages.len(),
            indexables = config.indexables.len(),
            "search engine ready"
        );

        Ok(Self { engine, config })
    }

    pub fn from_toml_str(
        source: &str,
        connection: Arc<dyn Connection>,
        schema: &dyn SchemaProvider,
    ) -> Result<Self, Error> {
        Self::from_config(SearchConfig::from_toml_str(source)?, connection, schema)
    }

    /// Engine builder preloaded from configuration, for callers that also
    /// register their own criterion or sort handlers.
    #[must_use]
    pub fn builder(config: &SearchConfig) -> EngineBuilder {
        let transformer = transformer(config);

        let mut builder = SearchEngine::builder()
            .transformer(Arc::clone(&transformer))
            .published_status(config.search.published_status)
            .content_type_status(config.search.content_type_status)
            .full_text_wildcards(config.search.full_text_wildcards)
            .debug(config.search.debug);

        for (code, &id) in &config.languages {
            builder = builder.language(code.clone(), id);
        }
        for (type_identifier, indexable) in &config.indexables {
            builder = builder.register_indexable(type_identifier.clone(), index_definition(indexable));
        }
        for (type_identifier, &kind) in &config.field_value_handlers {
            builder = builder
                .register_field_value_handler(type_identifier.clone(), value_handler(kind, &transformer));
        }

        builder
    }

    pub fn find(&self, query: &FindQuery) -> Result<QueryResult, Error> {
        self.engine.find(query).map_err(Error::from)
    }

    pub fn count(
        &self,
        criterion: &Criterion,
        language_filter: &LanguageFilter,
    ) -> Result<u64, Error> {
        self.engine
            .count(criterion, language_filter)
            .map_err(Error::from)
    }

    pub fn find_content_types(&self, query: &FindQuery) -> Result<QueryResult, Error> {
        self.engine.find_content_types(query).map_err(Error::from)
    }

    pub fn count_content_types(
        &self,
        criterion: &Criterion,
        language_filter: &LanguageFilter,
    ) -> Result<u64, Error> {
        self.engine
            .count_content_types(criterion, language_filter)
            .map_err(Error::from)
    }

    /// Lower-level access; errors stay `InternalError` with driver detail.
    #[must_use]
    pub const fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }
}

fn transformer(config: &SearchConfig) -> Arc<dyn StringTransformer> {
    let table = config
        .transformation
        .rules()
        .fold(RuleTable::new(), |table, (from, to)| table.with_rule(from, to));

    Arc::new(table)
}

fn index_definition(indexable: &IndexableConfig) -> IndexDefinition {
    let mut definition = indexable
        .fields
        .iter()
        .fold(IndexDefinition::new(), |definition, (sub_field, &kind)| {
            definition.with_field(sub_field.clone(), storage_kind(kind))
        });

    if let Some(sub_field) = &indexable.default_match {
        definition = definition.with_default_match(sub_field.clone());
    }
    if let Some(sub_field) = &indexable.default_sort {
        definition = definition.with_default_sort(sub_field.clone());
    }

    definition
}

const fn storage_kind(kind: FieldKind) -> StorageKind {
    match kind {
        FieldKind::Integer => StorageKind::Integer,
        FieldKind::Float => StorageKind::Float,
        FieldKind::String => StorageKind::String,
        FieldKind::StringCi => StorageKind::StringCi,
        FieldKind::Boolean => StorageKind::Boolean,
    }
}

fn value_handler(
    kind: ValueHandlerKind,
    transformer: &Arc<dyn StringTransformer>,
) -> Arc<dyn FieldValueHandler> {
    match kind {
        ValueHandlerKind::Simple => Arc::new(SimpleHandler),
        ValueHandlerKind::Collation => Arc::new(CollationHandler::new(Arc::clone(transformer))),
    }
}
