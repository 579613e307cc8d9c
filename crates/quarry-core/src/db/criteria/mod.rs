//! Criterion tree: leaf criteria and AND / OR / NOT composites.
//!
//! Trees are plain values built per call. Only the custom-field override on a
//! leaf may be changed after construction, and only before compilation.

pub mod converter;
mod error;
pub mod handler;

#[cfg(test)]
mod tests;

use crate::value::Value;
use std::{
    collections::BTreeMap,
    fmt,
    ops::{BitAnd, BitOr},
};

pub use converter::{CriteriaConverter, CriteriaConverterBuilder};
pub use error::CriterionError;
pub use handler::CriterionHandler;

///
/// Operator
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Between,
    Like,
    Contains,
}

impl Operator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::In => "in",
            Self::Between => "between",
            Self::Like => "like",
            Self::Contains => "contains",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// Target
///
/// What a leaf criterion constrains. `Custom` is the extension point for
/// handlers registered by the embedding application.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
    MatchAll,
    MatchNone,
    ContentId,
    RemoteId,
    ContentTypeId,
    ContentTypeIdentifier,
    ContentTypeGroupId,
    SectionId,
    SectionIdentifier,
    LanguageCode { match_always_available: bool },
    DateModified,
    DatePublished,
    LocationId,
    ParentLocationId,
    Subtree,
    PermissionSubtree,
    Ancestor,
    Visibility,
    Depth,
    LocationPriority,
    Field(String),
    FullText,
    Custom(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatchAll => f.write_str("match_all"),
            Self::MatchNone => f.write_str("match_none"),
            Self::ContentId => f.write_str("content_id"),
            Self::RemoteId => f.write_str("remote_id"),
            Self::ContentTypeId => f.write_str("content_type_id"),
            Self::ContentTypeIdentifier => f.write_str("content_type_identifier"),
            Self::ContentTypeGroupId => f.write_str("content_type_group_id"),
            Self::SectionId => f.write_str("section_id"),
            Self::SectionIdentifier => f.write_str("section_identifier"),
            Self::LanguageCode { .. } => f.write_str("language_code"),
            Self::DateModified => f.write_str("date_modified"),
            Self::DatePublished => f.write_str("date_published"),
            Self::LocationId => f.write_str("location_id"),
            Self::ParentLocationId => f.write_str("parent_location_id"),
            Self::Subtree => f.write_str("subtree"),
            Self::PermissionSubtree => f.write_str("permission_subtree"),
            Self::Ancestor => f.write_str("ancestor"),
            Self::Visibility => f.write_str("visibility"),
            Self::Depth => f.write_str("depth"),
            Self::LocationPriority => f.write_str("location_priority"),
            Self::Field(attribute) => write!(f, "field:{attribute}"),
            Self::FullText => f.write_str("full_text"),
            Self::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

///
/// CustomFields
///
/// Per-(entity type, attribute) override of the physical field a criterion or
/// sort clause targets. An override bypasses the index definitions entirely.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CustomFields(BTreeMap<(String, String), String>);

impl CustomFields {
    pub fn set(
        &mut self,
        entity_type: impl Into<String>,
        attribute: impl Into<String>,
        field: impl Into<String>,
    ) {
        self.0
            .insert((entity_type.into(), attribute.into()), field.into());
    }

    #[must_use]
    pub fn get(&self, entity_type: &str, attribute: &str) -> Option<&str> {
        self.0
            .get(&(entity_type.to_string(), attribute.to_string()))
            .map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

///
/// LeafCriterion
///

#[derive(Clone, Debug, PartialEq)]
pub struct LeafCriterion {
    pub target: Target,
    pub op: Operator,
    pub value: Value,
    custom_fields: CustomFields,
}

impl LeafCriterion {
    pub fn new(target: Target, op: Operator, value: impl Into<Value>) -> Self {
        Self {
            target,
            op,
            value: value.into(),
            custom_fields: CustomFields::default(),
        }
    }

    /// Target a specific physical field for `(entity_type, attribute)`.
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

///
/// Criterion
///
/// `Not` carries a list for source compatibility, but only its first child is
/// compiled; any further children are ignored.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Criterion {
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Vec<Self>),
    Leaf(LeafCriterion),
}

impl Criterion {
    #[must_use]
    pub const fn and(children: Vec<Self>) -> Self {
        Self::And(children)
    }

    #[must_use]
    pub const fn or(children: Vec<Self>) -> Self {
        Self::Or(children)
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(child: Self) -> Self {
        Self::Not(vec![child])
    }

    pub fn leaf(target: Target, op: Operator, value: impl Into<Value>) -> Self {
        Self::Leaf(LeafCriterion::new(target, op, value))
    }

    #[must_use]
    pub fn match_all() -> Self {
        Self::leaf(Target::MatchAll, Operator::Eq, Value::Null)
    }

    #[must_use]
    pub fn match_none() -> Self {
        Self::leaf(Target::MatchNone, Operator::Eq, Value::Null)
    }

    #[must_use]
    pub fn content_id(ids: Vec<i64>) -> Self {
        Self::leaf(Target::ContentId, Operator::In, ids)
    }

    #[must_use]
    pub fn remote_id(ids: Vec<&str>) -> Self {
        Self::leaf(Target::RemoteId, Operator::In, ids)
    }

    #[must_use]
    pub fn content_type_id(ids: Vec<i64>) -> Self {
        Self::leaf(Target::ContentTypeId, Operator::In, ids)
    }

    #[must_use]
    pub fn content_type_identifier(identifiers: Vec<&str>) -> Self {
        Self::leaf(Target::ContentTypeIdentifier, Operator::In, identifiers)
    }

    #[must_use]
    pub fn content_type_group_id(ids: Vec<i64>) -> Self {
        Self::leaf(Target::ContentTypeGroupId, Operator::In, ids)
    }

    #[must_use]
    pub fn section_id(ids: Vec<i64>) -> Self {
        Self::leaf(Target::SectionId, Operator::In, ids)
    }

    #[must_use]
    pub fn section_identifier(identifiers: Vec<&str>) -> Self {
        Self::leaf(Target::SectionIdentifier, Operator::In, identifiers)
    }

    #[must_use]
    pub fn language_code(codes: Vec<&str>, match_always_available: bool) -> Self {
        Self::leaf(
            Target::LanguageCode {
                match_always_available,
            },
            Operator::In,
            codes,
        )
    }

    pub fn date_modified(op: Operator, value: impl Into<Value>) -> Self {
        Self::leaf(Target::DateModified, op, value)
    }

    pub fn date_published(op: Operator, value: impl Into<Value>) -> Self {
        Self::leaf(Target::DatePublished, op, value)
    }

    #[must_use]
    pub fn location_id(ids: Vec<i64>) -> Self {
        Self::leaf(Target::LocationId, Operator::In, ids)
    }

    #[must_use]
    pub fn parent_location_id(ids: Vec<i64>) -> Self {
        Self::leaf(Target::ParentLocationId, Operator::In, ids)
    }

    #[must_use]
    pub fn subtree(path_strings: Vec<&str>) -> Self {
        Self::leaf(Target::Subtree, Operator::In, path_strings)
    }

    #[must_use]
    pub fn permission_subtree(path_strings: Vec<&str>) -> Self {
        Self::leaf(Target::PermissionSubtree, Operator::In, path_strings)
    }

    #[must_use]
    pub fn ancestor(path_strings: Vec<&str>) -> Self {
        Self::leaf(Target::Ancestor, Operator::In, path_strings)
    }

    #[must_use]
    pub fn visible(visible: bool) -> Self {
        Self::leaf(Target::Visibility, Operator::Eq, visible)
    }

    pub fn depth(op: Operator, value: impl Into<Value>) -> Self {
        Self::leaf(Target::Depth, op, value)
    }

    pub fn location_priority(op: Operator, value: impl Into<Value>) -> Self {
        Self::leaf(Target::LocationPriority, op, value)
    }

    pub fn field(attribute: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self::leaf(Target::Field(attribute.into()), op, value)
    }

    pub fn full_text(text: impl Into<String>) -> Self {
        Self::leaf(Target::FullText, Operator::Like, text.into())
    }

    pub fn custom(name: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self::leaf(Target::Custom(name.into()), op, value)
    }

    /// Set a custom-field override on this criterion when it is a leaf.
    /// Composites are returned unchanged.
    #[must_use]
    pub fn with_custom_field(
        mut self,
        entity_type: impl Into<String>,
        attribute: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        if let Self::Leaf(leaf) = &mut self {
            leaf.set_custom_field(entity_type, attribute, field);
        }
        self
    }
}

impl From<LeafCriterion> for Criterion {
    fn from(leaf: LeafCriterion) -> Self {
        Self::Leaf(leaf)
    }
}

impl BitAnd for Criterion {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::And(vec![self, rhs])
    }
}

impl BitOr for Criterion {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::Or(vec![self, rhs])
    }
}
