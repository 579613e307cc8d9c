use crate::db::{
    criteria::CustomFields,
    field::{FieldError, IndexRegistry, SearchableFieldMap, StorageKind},
};
use std::{collections::BTreeMap, sync::Arc};

///
/// FieldNameGenerator
///
/// Deterministic physical naming: the same `(sub_field, attribute,
/// entity_type)` must always produce the same name, since names double as
/// join aliases and cache keys.
///

pub trait FieldNameGenerator: Send + Sync {
    fn name(&self, sub_field: &str, attribute: &str, entity_type: &str) -> String;
}

///
/// DefaultFieldNames
/// `{entity_type}_{attribute}_{sub_field}`, lowercased, non-alphanumerics as `_`.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultFieldNames;

impl FieldNameGenerator for DefaultFieldNames {
    fn name(&self, sub_field: &str, attribute: &str, entity_type: &str) -> String {
        format!("{entity_type}_{attribute}_{sub_field}")
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

///
/// ResolvedField
///
/// A physical field. `kind` is `None` for custom-field overrides, which name
/// a raw attribute column and bypass the index definitions.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedField {
    pub name: String,
    pub alias: String,
    pub kind: Option<StorageKind>,
    pub type_identifier: String,
    pub definition_ids: Vec<i64>,
}

impl ResolvedField {
    /// Attribute-table column holding this field.
    #[must_use]
    pub fn column(&self) -> &str {
        match self.kind {
            Some(kind) => kind.column(),
            None => &self.name,
        }
    }
}

///
/// FieldNameResolver
///
/// Resolves logical attribute identifiers to physical fields using the
/// searchable field map and the index registry, both frozen at construction.
///

pub struct FieldNameResolver {
    field_map: SearchableFieldMap,
    indexes: IndexRegistry,
    names: Arc<dyn FieldNameGenerator>,
}

impl FieldNameResolver {
    #[must_use]
    pub fn new(
        field_map: SearchableFieldMap,
        indexes: IndexRegistry,
        names: Arc<dyn FieldNameGenerator>,
    ) -> Self {
        Self {
            field_map,
            indexes,
            names,
        }
    }

    #[must_use]
    pub const fn field_map(&self) -> &SearchableFieldMap {
        &self.field_map
    }

    #[must_use]
    pub const fn indexes(&self) -> &IndexRegistry {
        &self.indexes
    }

    /// Resolve one `(entity_type, attribute)` pair to its physical name and
    /// storage kind.
    pub fn resolve(
        &self,
        custom_fields: &CustomFields,
        entity_type: &str,
        attribute: &str,
        type_identifier: &str,
        sub_field: Option<&str>,
        is_sort: bool,
    ) -> Result<(String, Option<StorageKind>), FieldError> {
        if let Some(custom) = custom_fields.get(entity_type, attribute) {
            return Ok((custom.to_string(), None));
        }

        let definition = self.indexes.get(type_identifier)?;
        let sub_field = match sub_field {
            Some(sub_field) => sub_field,
            None => {
                let default = if is_sort {
                    definition.default_sort.as_deref()
                } else {
                    definition.default_match.as_deref()
                };
                default.ok_or_else(|| FieldError::UndefinedDefaultField {
                    type_identifier: type_identifier.to_string(),
                    purpose: if is_sort { "sort" } else { "match" },
                })?
            }
        };

        let kind = definition
            .kind(sub_field)
            .ok_or_else(|| FieldError::UndefinedIndexField {
                type_identifier: type_identifier.to_string(),
                sub_field: sub_field.to_string(),
            })?;

        Ok((self.names.name(sub_field, attribute, entity_type), Some(kind)))
    }

    /// Resolve `attribute` across every entity type that defines it,
    /// optionally restricted to one attribute type. The first resolution per
    /// physical name fixes its kind; definition ids accumulate.
    pub fn field_names(
        &self,
        custom_fields: &CustomFields,
        attribute: &str,
        type_filter: Option<&str>,
        sub_field: Option<&str>,
    ) -> Result<BTreeMap<String, ResolvedField>, FieldError> {
        let mut resolved: BTreeMap<String, ResolvedField> = BTreeMap::new();

        for (entity_type, attributes) in self.field_map.iter() {
            let Some(definition) = attributes.get(attribute) else {
                continue;
            };
            if type_filter.is_some_and(|filter| filter != definition.type_identifier) {
                continue;
            }

            let (name, kind) = self.resolve(
                custom_fields,
                entity_type,
                attribute,
                &definition.type_identifier,
                sub_field,
                false,
            )?;
            let alias = self.alias(&name, kind, attribute, entity_type)?;

            resolved
                .entry(name.clone())
                .or_insert_with(|| ResolvedField {
                    name,
                    alias,
                    kind,
                    type_identifier: definition.type_identifier.clone(),
                    definition_ids: Vec::new(),
                })
                .definition_ids
                .push(definition.id);
        }

        Ok(resolved)
    }

    /// Resolve the sort field of one attribute on one entity type.
    pub fn sort_field(
        &self,
        custom_fields: &CustomFields,
        entity_type: &str,
        attribute: &str,
        sub_field: Option<&str>,
    ) -> Result<ResolvedField, FieldError> {
        let definition = self
            .field_map
            .definition(entity_type, attribute)
            .ok_or_else(|| FieldError::UnknownField {
                entity_type: entity_type.to_string(),
                attribute: attribute.to_string(),
            })?;

        let (name, kind) = self.resolve(
            custom_fields,
            entity_type,
            attribute,
            &definition.type_identifier,
            sub_field,
            true,
        )?;
        let alias = self.alias(&name, kind, attribute, entity_type)?;

        Ok(ResolvedField {
            name,
            alias,
            kind,
            type_identifier: definition.type_identifier.clone(),
            definition_ids: vec![definition.id],
        })
    }

    // Generated names are valid identifiers already; custom names are
    // interpolated as columns, so they are checked and given their own alias.
    fn alias(
        &self,
        name: &str,
        kind: Option<StorageKind>,
        attribute: &str,
        entity_type: &str,
    ) -> Result<String, FieldError> {
        if kind.is_some() {
            return Ok(name.to_string());
        }
        if !is_identifier(name) {
            return Err(FieldError::InvalidCustomField {
                field: name.to_string(),
            });
        }

        Ok(self.names.name(name, attribute, entity_type))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
