use crate::{
    db::{
        schema::{SharedJoin, content, content_type, section, tree_node},
        sort::{SortClause, SortClauseHandler, SortTarget},
        sql::QueryContext,
    },
    error::InternalError,
};

///
/// ColumnSortHandler
///
/// Orders by one column of the searched entity or of a shared join.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnSortHandler {
    name: &'static str,
    target: SortTarget,
    column: &'static str,
    join: Option<SharedJoin>,
}

impl ColumnSortHandler {
    const fn entity(name: &'static str, target: SortTarget, column: &'static str) -> Self {
        Self {
            name,
            target,
            column,
            join: None,
        }
    }

    const fn joined(
        name: &'static str,
        target: SortTarget,
        join: SharedJoin,
        column: &'static str,
    ) -> Self {
        Self {
            name,
            target,
            column,
            join: Some(join),
        }
    }

    #[must_use]
    pub const fn content_id() -> Self {
        Self::entity("content_id", SortTarget::ContentId, content::ID)
    }

    #[must_use]
    pub const fn content_name() -> Self {
        Self::entity("content_name", SortTarget::ContentName, content::NAME)
    }

    #[must_use]
    pub const fn date_modified() -> Self {
        Self::entity("date_modified", SortTarget::DateModified, content::MODIFIED)
    }

    #[must_use]
    pub const fn date_published() -> Self {
        Self::entity("date_published", SortTarget::DatePublished, content::PUBLISHED)
    }

    #[must_use]
    pub const fn section_identifier() -> Self {
        Self::joined(
            "section_identifier",
            SortTarget::SectionIdentifier,
            SharedJoin::Section,
            section::IDENTIFIER,
        )
    }

    #[must_use]
    pub const fn section_name() -> Self {
        Self::joined(
            "section_name",
            SortTarget::SectionName,
            SharedJoin::Section,
            section::NAME,
        )
    }

    #[must_use]
    pub const fn location_depth() -> Self {
        Self::joined(
            "location_depth",
            SortTarget::LocationDepth,
            SharedJoin::MainNode,
            tree_node::DEPTH,
        )
    }

    #[must_use]
    pub const fn location_priority() -> Self {
        Self::joined(
            "location_priority",
            SortTarget::LocationPriority,
            SharedJoin::MainNode,
            tree_node::PRIORITY,
        )
    }

    #[must_use]
    pub const fn location_path() -> Self {
        Self::joined(
            "location_path",
            SortTarget::LocationPath,
            SharedJoin::MainNode,
            tree_node::PATH_STRING,
        )
    }

    #[must_use]
    pub const fn content_type_identifier() -> Self {
        Self::joined(
            "content_type_identifier",
            SortTarget::ContentTypeIdentifier,
            SharedJoin::ContentType,
            content_type::IDENTIFIER,
        )
    }

    /// Content-type target: the type's own id.
    #[must_use]
    pub const fn type_id() -> Self {
        Self::entity("content_type_id", SortTarget::ContentId, content_type::ID)
    }

    /// Content-type target: the type's identifier.
    #[must_use]
    pub const fn type_identifier() -> Self {
        Self::entity(
            "content_type_identifier",
            SortTarget::ContentTypeIdentifier,
            content_type::IDENTIFIER,
        )
    }
}

impl SortClauseHandler for ColumnSortHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn accepts(&self, clause: &SortClause) -> bool {
        clause.target == self.target
    }

    fn apply(
        &self,
        ctx: &mut QueryContext<'_>,
        clause: &SortClause,
    ) -> Result<Vec<String>, InternalError> {
        let column = match self.join {
            Some(join) => {
                join.ensure(ctx);
                join.column(self.column)
            }
            None => ctx.column(self.column),
        };

        Ok(vec![format!("{column} {}", clause.direction.as_sql())])
    }
}
