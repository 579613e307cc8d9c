use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to parse search configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("language '{code}' has id {id}; ids must be powers of two >= 2")]
    InvalidLanguageId { code: String, id: u64 },

    #[error("languages '{first}' and '{second}' share id {id}")]
    DuplicateLanguageId {
        first: String,
        second: String,
        id: u64,
    },

    #[error("indexable '{type_identifier}' declares no fields")]
    EmptyIndexable { type_identifier: String },

    #[error("indexable '{type_identifier}' names undeclared {purpose} field '{sub_field}'")]
    UndeclaredDefault {
        type_identifier: String,
        purpose: &'static str,
        sub_field: String,
    },

    #[error("replacement source '{source_text}' must be exactly one lowercase character")]
    InvalidReplacement { source_text: String },
}
