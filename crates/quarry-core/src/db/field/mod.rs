//! Attribute (field) metadata: per-type index definitions, the searchable
//! field map, logical → physical name resolution, and operator translation.

mod error;
pub mod resolver;
pub mod value;

#[cfg(test)]
mod tests;

use crate::{
    db::schema::attribute,
    error::{ErrorOrigin, InternalError},
};
use derive_more::{Deref, IntoIterator};
use std::{collections::BTreeMap, fmt, str::FromStr};

pub use error::FieldError;
pub use resolver::{DefaultFieldNames, FieldNameGenerator, FieldNameResolver, ResolvedField};
pub use value::{FieldColumn, FieldValueHandler, FieldValueTranslator};

///
/// StorageKind
///
/// Declared storage of one indexed sub-field. Each kind lives in exactly one
/// column of the attribute table.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StorageKind {
    Integer,
    Float,
    String,
    StringCi,
    Boolean,
}

impl StorageKind {
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Integer => attribute::SORT_KEY_INT,
            Self::Float => attribute::DATA_FLOAT,
            Self::String => attribute::DATA_TEXT,
            Self::StringCi => attribute::SORT_KEY_STRING,
            Self::Boolean => attribute::DATA_INT,
        }
    }

    /// Case-insensitive sortable string column; compared values are folded.
    #[must_use]
    pub const fn is_case_folded(self) -> bool {
        matches!(self, Self::StringCi)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::StringCi => "string_ci",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "string" => Ok(Self::String),
            "string_ci" => Ok(Self::StringCi),
            "boolean" => Ok(Self::Boolean),
            other => Err(InternalError::configuration(
                ErrorOrigin::Field,
                format!("unknown storage kind '{other}'"),
            )),
        }
    }
}

///
/// IndexDefinition
///
/// An attribute type's indexing contract: which sub-fields it exposes and
/// which of them answer un-qualified match and sort requests.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IndexDefinition {
    pub fields: BTreeMap<String, StorageKind>,
    pub default_match: Option<String>,
    pub default_sort: Option<String>,
}

impl IndexDefinition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-column definition used by most scalar attribute types.
    #[must_use]
    pub fn single(sub_field: &str, kind: StorageKind) -> Self {
        Self::new()
            .with_field(sub_field, kind)
            .with_default_match(sub_field)
            .with_default_sort(sub_field)
    }

    #[must_use]
    pub fn with_field(mut self, sub_field: impl Into<String>, kind: StorageKind) -> Self {
        self.fields.insert(sub_field.into(), kind);
        self
    }

    #[must_use]
    pub fn with_default_match(mut self, sub_field: impl Into<String>) -> Self {
        self.default_match = Some(sub_field.into());
        self
    }

    #[must_use]
    pub fn with_default_sort(mut self, sub_field: impl Into<String>) -> Self {
        self.default_sort = Some(sub_field.into());
        self
    }

    #[must_use]
    pub fn kind(&self, sub_field: &str) -> Option<StorageKind> {
        self.fields.get(sub_field).copied()
    }

    /// Defaults, when named, must be declared sub-fields.
    fn validate(&self, type_identifier: &str) -> Result<(), FieldError> {
        for default in [&self.default_match, &self.default_sort].into_iter().flatten() {
            if !self.fields.contains_key(default) {
                return Err(FieldError::UndefinedIndexField {
                    type_identifier: type_identifier.to_string(),
                    sub_field: default.clone(),
                });
            }
        }

        Ok(())
    }
}

///
/// IndexRegistry
/// Attribute type identifier → [`IndexDefinition`].
///

#[derive(Clone, Debug, Default)]
pub struct IndexRegistry {
    definitions: BTreeMap<String, IndexDefinition>,
}

impl IndexRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the definition of an attribute type.
    pub fn register(
        &mut self,
        type_identifier: impl Into<String>,
        definition: IndexDefinition,
    ) -> Result<(), InternalError> {
        let type_identifier = type_identifier.into();
        definition.validate(&type_identifier)?;
        self.definitions.insert(type_identifier, definition);

        Ok(())
    }

    pub fn get(&self, type_identifier: &str) -> Result<&IndexDefinition, FieldError> {
        self.definitions
            .get(type_identifier)
            .ok_or_else(|| FieldError::NoIndexDefinition {
                type_identifier: type_identifier.to_string(),
            })
    }

    #[must_use]
    pub fn contains(&self, type_identifier: &str) -> bool {
        self.definitions.contains_key(type_identifier)
    }
}

///
/// FieldDefinition
/// One attribute of one entity type.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDefinition {
    pub id: i64,
    pub type_identifier: String,
}

impl FieldDefinition {
    pub fn new(id: i64, type_identifier: impl Into<String>) -> Self {
        Self {
            id,
            type_identifier: type_identifier.into(),
        }
    }
}

///
/// SearchableFieldMap
///
/// entity type → attribute → definition. Iteration is ordered by entity type
/// and attribute, which keeps aggregate resolution deterministic.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct SearchableFieldMap(BTreeMap<String, BTreeMap<String, FieldDefinition>>);

impl SearchableFieldMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        entity_type: impl Into<String>,
        attribute: impl Into<String>,
        definition: FieldDefinition,
    ) {
        self.0
            .entry(entity_type.into())
            .or_default()
            .insert(attribute.into(), definition);
    }

    #[must_use]
    pub fn with(
        mut self,
        entity_type: &str,
        attribute: &str,
        id: i64,
        type_identifier: &str,
    ) -> Self {
        self.insert(entity_type, attribute, FieldDefinition::new(id, type_identifier));
        self
    }

    #[must_use]
    pub fn definition(&self, entity_type: &str, attribute: &str) -> Option<&FieldDefinition> {
        self.0.get(entity_type)?.get(attribute)
    }
}

///
/// SchemaProvider
///
/// Source of the searchable field map. Consulted once when the engine is
/// built; schema changes require rebuilding the engine.
///

pub trait SchemaProvider {
    fn searchable_field_map(&self) -> Result<SearchableFieldMap, InternalError>;
}

///
/// StaticSchema
/// A schema provider over a precomputed map.
///

#[derive(Clone, Debug, Default)]
pub struct StaticSchema(pub SearchableFieldMap);

impl SchemaProvider for StaticSchema {
    fn searchable_field_map(&self) -> Result<SearchableFieldMap, InternalError> {
        Ok(self.0.clone())
    }
}
