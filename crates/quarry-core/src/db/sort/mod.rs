//! Sort clauses and their compilation into ORDER BY terms.

pub mod converter;
mod error;
pub mod handler;


use crate::db::criteria::CustomFields;
use std::fmt;

pub use converter::{SortClauseConverter, SortClauseConverterBuilder};
pub use error::SortError;
pub use handler::SortClauseHandler;

///
/// SortDirection
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

///
/// SortTarget
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SortTarget {
    ContentId,
    ContentName,
    DateModified,
    DatePublished,
    SectionIdentifier,
    SectionName,
    LocationDepth,
    LocationPriority,
    LocationPath,
    ContentTypeIdentifier,
    Field {
        entity_type: String,
        attribute: String,
        sub_field: Option<String>,
    },
    Custom(String),
}

impl fmt::Display for SortTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentId => f.write_str("content_id"),
            Self::ContentName => f.write_str("content_name"),
            Self::DateModified => f.write_str("date_modified"),
            Self::DatePublished => f.write_str("date_published"),
            Self::SectionIdentifier => f.write_str("section_identifier"),
            Self::SectionName => f.write_str("section_name"),
            Self::LocationDepth => f.write_str("location_depth"),
            Self::LocationPriority => f.write_str("location_priority"),
            Self::LocationPath => f.write_str("location_path"),
            Self::ContentTypeIdentifier => f.write_str("content_type_identifier"),
            Self::Field {
                entity_type,
                attribute,
                ..
            } => write!(f, "field:{entity_type}.{attribute}"),
            Self::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

///
/// SortClause
///
/// One ORDER BY request. Carries the same custom-field override map as a
/// leaf criterion.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortClause {
    pub target: SortTarget,
    pub direction: SortDirection,
    custom_fields: CustomFields,
}

impl SortClause {
    #[must_use]
    pub fn new(target: SortTarget, direction: SortDirection) -> Self {
        Self {
            target,
            direction,
            custom_fields: CustomFields::default(),
        }
    }

    #[must_use]
    pub fn asc(target: SortTarget) -> Self {
        Self::new(target, SortDirection::Ascending)
    }

    #[must_use]
    pub fn desc(target: SortTarget) -> Self {
        Self::new(target, SortDirection::Descending)
    }

    /// Sort on an attribute of one entity type, by its default sort field.
    #[must_use]
    pub fn field(entity_type: &str, attribute: &str, direction: SortDirection) -> Self {
        Self::new(
            SortTarget::Field {
                entity_type: entity_type.to_string(),
                attribute: attribute.to_string(),
                sub_field: None,
            },
            direction,
        )
    }

    pub fn set_custom_field(
        &mut self,
        entity_type: impl Into<String>,
        attribute: impl Into<String>,
        field: impl Into<String>,
    ) {
        self.custom_fields.set(entity_type, attribute, field);
    }

    #[must_use]
    pub const fn custom_fields(&self) -> &CustomFields {
        &self.custom_fields
    }
}
