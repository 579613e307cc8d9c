use crate::{
    db::{
        criteria::{CriterionHandler, LeafCriterion, Target, handler::membership_values},
        schema::{SharedJoin, content, content_type, content_type_group_link, section},
        sql::{Fragment, QueryContext},
    },
    error::InternalError,
};

///
/// Lookup
/// Caller values matched in another table, whose `key` the entity column holds.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Lookup {
    table: &'static str,
    key: &'static str,
    column: &'static str,
}

///
/// IdentifierHandler
///
/// Membership of an entity column in the operand list, either directly or
/// through a lookup sub-select.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdentifierHandler {
    name: &'static str,
    target: Target,
    column: &'static str,
    lookup: Option<Lookup>,
}

impl IdentifierHandler {
    const fn direct(name: &'static str, target: Target, column: &'static str) -> Self {
        Self {
            name,
            target,
            column,
            lookup: None,
        }
    }

    const fn via(name: &'static str, target: Target, column: &'static str, lookup: Lookup) -> Self {
        Self {
            name,
            target,
            column,
            lookup: Some(lookup),
        }
    }

    #[must_use]
    pub const fn content_id() -> Self {
        Self::direct("content_id", Target::ContentId, content::ID)
    }

    #[must_use]
    pub const fn remote_id() -> Self {
        Self::direct("remote_id", Target::RemoteId, content::REMOTE_ID)
    }

    #[must_use]
    pub const fn content_type_id() -> Self {
        Self::direct(
            "content_type_id",
            Target::ContentTypeId,
            content::CONTENT_TYPE_ID,
        )
    }

    #[must_use]
    pub const fn content_type_identifier() -> Self {
        Self::via(
            "content_type_identifier",
            Target::ContentTypeIdentifier,
            content::CONTENT_TYPE_ID,
            Lookup {
                table: content_type::TABLE,
                key: content_type::ID,
                column: content_type::IDENTIFIER,
            },
        )
    }

    #[must_use]
    pub const fn content_type_group_id() -> Self {
        Self::via(
            "content_type_group_id",
            Target::ContentTypeGroupId,
            content::CONTENT_TYPE_ID,
            Lookup {
                table: content_type_group_link::TABLE,
                key: content_type_group_link::CONTENT_TYPE_ID,
                column: content_type_group_link::GROUP_ID,
            },
        )
    }

    #[must_use]
    pub const fn section_id() -> Self {
        Self::direct("section_id", Target::SectionId, content::SECTION_ID)
    }

    /// Content-type target: the type's own id.
    #[must_use]
    pub const fn type_id() -> Self {
        Self::direct("content_type_id", Target::ContentTypeId, content_type::ID)
    }

    /// Content-type target: the type's identifier.
    #[must_use]
    pub const fn type_identifier() -> Self {
        Self::direct(
            "content_type_identifier",
            Target::ContentTypeIdentifier,
            content_type::IDENTIFIER,
        )
    }

    /// Content-type target: membership in a type group.
    #[must_use]
    pub const fn type_group_id() -> Self {
        Self::via(
            "content_type_group_id",
            Target::ContentTypeGroupId,
            content_type::ID,
            Lookup {
                table: content_type_group_link::TABLE,
                key: content_type_group_link::CONTENT_TYPE_ID,
                column: content_type_group_link::GROUP_ID,
            },
        )
    }
}

impl CriterionHandler for IdentifierHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        leaf.target == self.target
    }

    fn build(
        &self,
        ctx: &mut QueryContext<'_>,
        leaf: &LeafCriterion,
    ) -> Result<Fragment, InternalError> {
        let values = membership_values(leaf)?;
        let column = ctx.column(self.column);

        let Some(lookup) = self.lookup else {
            return Ok(ctx.in_list(&column, values));
        };
        if values.is_empty() {
            return Ok(Fragment::always_false());
        }

        let list = ctx.bind_list(values);
        Ok(Fragment::new(format!(
            "{column} IN (SELECT {} FROM {} WHERE {} IN {list})",
            lookup.key, lookup.table, lookup.column
        )))
    }
}

///
/// SectionIdentifierHandler
/// Matches on the joined section's identifier.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SectionIdentifierHandler;

impl CriterionHandler for SectionIdentifierHandler {
    fn name(&self) -> &'static str {
        "section_identifier"
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        leaf.target == Target::SectionIdentifier
    }

    fn build(
        &self,
        ctx: &mut QueryContext<'_>,
        leaf: &LeafCriterion,
    ) -> Result<Fragment, InternalError> {
        let values = membership_values(leaf)?;
        SharedJoin::Section.ensure(ctx);

        Ok(ctx.in_list(&SharedJoin::Section.column(section::IDENTIFIER), values))
    }
}
