use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bit 0 of a language mask is the always-available flag.
const ALWAYS_AVAILABLE_BIT: u64 = 1;

///
/// SearchConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub search: SearchSection,

    /// Language code → reserved mask bit.
    pub languages: BTreeMap<String, u64>,

    pub transformation: TransformationSection,

    /// Attribute type identifier → index definition.
    pub indexables: BTreeMap<String, IndexableConfig>,

    /// Attribute type identifier → operator translator.
    pub field_value_handlers: BTreeMap<String, ValueHandlerKind>,
}

impl SearchConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_languages()?;

        for (type_identifier, indexable) in &self.indexables {
            indexable.validate(type_identifier)?;
        }

        // Rules apply to already-lowercased text.
        for source_text in self.transformation.replacements.keys() {
            if source_text.chars().count() != 1 || *source_text != source_text.to_lowercase() {
                return Err(ConfigError::InvalidReplacement {
                    source_text: source_text.clone(),
                });
            }
        }

        Ok(())
    }

    fn validate_languages(&self) -> Result<(), ConfigError> {
        let mut seen: BTreeMap<u64, &str> = BTreeMap::new();

        for (code, &id) in &self.languages {
            if !id.is_power_of_two() || id == ALWAYS_AVAILABLE_BIT || id > 1 << 62 {
                return Err(ConfigError::InvalidLanguageId {
                    code: code.clone(),
                    id,
                });
            }
            if let Some(first) = seen.insert(id, code) {
                return Err(ConfigError::DuplicateLanguageId {
                    first: first.to_string(),
                    second: code.clone(),
                    id,
                });
            }
        }

        Ok(())
    }
}

///
/// SearchSection
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSection {
    /// Log compiled SQL at debug level.
    pub debug: bool,

    /// `content.status` counted as published.
    pub published_status: i64,

    /// `content_type.status` counted as defined.
    pub content_type_status: i64,

    /// Treat `*` in full-text words as a wildcard.
    pub full_text_wildcards: bool,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            debug: false,
            published_status: 1,
            content_type_status: 0,
            full_text_wildcards: true,
        }
    }
}

///
/// TransformationSection
/// Extra folding rules applied after lowercasing, e.g. `"ß" = "ss"`.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformationSection {
    pub replacements: BTreeMap<String, String>,
}

impl TransformationSection {
    /// Rules as `(char, replacement)` pairs; only meaningful after validation.
    pub fn rules(&self) -> impl Iterator<Item = (char, &str)> {
        self.replacements.iter().filter_map(|(from, to)| {
            let mut chars = from.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Some((ch, to.as_str())),
                _ => None,
            }
        })
    }
}

///
/// IndexableConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IndexableConfig {
    pub fields: BTreeMap<String, FieldKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_match: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<String>,
}

impl IndexableConfig {
    fn validate(&self, type_identifier: &str) -> Result<(), ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::EmptyIndexable {
                type_identifier: type_identifier.to_string(),
            });
        }

        for (purpose, default) in [("match", &self.default_match), ("sort", &self.default_sort)] {
            if let Some(sub_field) = default
                && !self.fields.contains_key(sub_field)
            {
                return Err(ConfigError::UndeclaredDefault {
                    type_identifier: type_identifier.to_string(),
                    purpose,
                    sub_field: sub_field.clone(),
                });
            }
        }

        Ok(())
    }
}

///
/// FieldKind
/// Storage column family of an indexed sub-field.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Integer,
    Float,
    String,
    StringCi,
    Boolean,
}

///
/// ValueHandlerKind
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueHandlerKind {
    Simple,
    #[default]
    Collation,
}
