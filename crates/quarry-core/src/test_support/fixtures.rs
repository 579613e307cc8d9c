//! Shared schema fixtures for core tests.
//!
//! Entity types: `article { title: ezstring, price: ezinteger }`,
//! `folder { title: ezstring }`, `blog_post { title: ezstring }`.

use crate::db::{
    connection::Connection,
    engine::{EngineBuilder, SearchEngine},
    field::{
        DefaultFieldNames, FieldNameResolver, IndexDefinition, IndexRegistry,
        SearchableFieldMap, StaticSchema, StorageKind, value::SimpleHandler,
    },
    language::LanguageRegistry,
    schema::SearchTarget,
};
use std::sync::Arc;

pub const ARTICLE_TITLE: i64 = 10;
pub const ARTICLE_PRICE: i64 = 11;
pub const FOLDER_TITLE: i64 = 20;
pub const BLOG_POST_TITLE: i64 = 30;

pub const ENG_GB: u64 = 2;
pub const GER_DE: u64 = 4;

pub const CONTENT: SearchTarget = SearchTarget::content(1);
pub const CONTENT_TYPE: SearchTarget = SearchTarget::content_type(0);

#[must_use]
pub fn field_map() -> SearchableFieldMap {
    SearchableFieldMap::new()
        .with("article", "title", ARTICLE_TITLE, "ezstring")
        .with("article", "price", ARTICLE_PRICE, "ezinteger")
        .with("folder", "title", FOLDER_TITLE, "ezstring")
        .with("blog_post", "title", BLOG_POST_TITLE, "ezstring")
}

#[must_use]
pub fn ezstring() -> IndexDefinition {
    IndexDefinition::new()
        .with_field("value", StorageKind::String)
        .with_field("sort_value", StorageKind::StringCi)
        .with_default_match("sort_value")
        .with_default_sort("sort_value")
}

#[must_use]
pub fn ezinteger() -> IndexDefinition {
    IndexDefinition::single("value", StorageKind::Integer)
}

#[must_use]
pub fn indexes() -> IndexRegistry {
    let mut registry = IndexRegistry::new();
    registry
        .register("ezstring", ezstring())
        .expect("ezstring definition");
    registry
        .register("ezinteger", ezinteger())
        .expect("ezinteger definition");
    registry
}

#[must_use]
pub fn resolver() -> FieldNameResolver {
    FieldNameResolver::new(field_map(), indexes(), Arc::new(DefaultFieldNames))
}

#[must_use]
pub fn languages() -> LanguageRegistry {
    LanguageRegistry::new([("eng-GB", ENG_GB), ("ger-DE", GER_DE)]).expect("language registry")
}

/// Builder preloaded with the fixture languages, indexables and handlers.
#[must_use]
pub fn builder() -> EngineBuilder {
    EngineBuilder::new()
        .language("eng-GB", ENG_GB)
        .language("ger-DE", GER_DE)
        .register_indexable("ezstring", ezstring())
        .register_indexable("ezinteger", ezinteger())
        .register_field_value_handler("ezinteger", Arc::new(SimpleHandler))
}

#[must_use]
pub fn engine(connection: Arc<dyn Connection>) -> SearchEngine {
    builder()
        .build(connection, &StaticSchema(field_map()))
        .expect("fixture engine")
}
