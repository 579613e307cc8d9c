//! Physical storage schema read by the built-in handlers, and the search
//! targets a gateway can run against.

use crate::db::sql::{Join, QueryContext};

///
/// Table and column names
///

pub mod content {
    pub const TABLE: &str = "content";
    pub const ID: &str = "id";
    pub const CONTENT_TYPE_ID: &str = "content_type_id";
    pub const SECTION_ID: &str = "section_id";
    pub const CURRENT_VERSION: &str = "current_version";
    pub const STATUS: &str = "status";
    pub const LANGUAGE_MASK: &str = "language_mask";
    pub const INITIAL_LANGUAGE_ID: &str = "initial_language_id";
    pub const REMOTE_ID: &str = "remote_id";
    pub const NAME: &str = "name";
    pub const MODIFIED: &str = "modified";
    pub const PUBLISHED: &str = "published";
}

pub mod content_type {
    pub const TABLE: &str = "content_type";
    pub const ID: &str = "id";
    pub const IDENTIFIER: &str = "identifier";
    pub const STATUS: &str = "status";
    pub const LANGUAGE_MASK: &str = "language_mask";
}

pub mod content_type_group_link {
    pub const TABLE: &str = "content_type_group_link";
    pub const CONTENT_TYPE_ID: &str = "content_type_id";
    pub const GROUP_ID: &str = "group_id";
}

pub mod content_type_field {
    pub const TABLE: &str = "content_type_field";
    pub const ID: &str = "id";
    pub const CONTENT_TYPE_ID: &str = "content_type_id";
    pub const IDENTIFIER: &str = "identifier";
    pub const DATA_TYPE: &str = "data_type";
    pub const IS_SEARCHABLE: &str = "is_searchable";
}

pub mod section {
    pub const TABLE: &str = "section";
    pub const ID: &str = "id";
    pub const IDENTIFIER: &str = "identifier";
    pub const NAME: &str = "name";
}

pub mod tree_node {
    pub const TABLE: &str = "tree_node";
    pub const NODE_ID: &str = "node_id";
    pub const PARENT_NODE_ID: &str = "parent_node_id";
    pub const MAIN_NODE_ID: &str = "main_node_id";
    pub const PATH_STRING: &str = "path_string";
    pub const DEPTH: &str = "depth";
    pub const PRIORITY: &str = "priority";
    pub const IS_INVISIBLE: &str = "is_invisible";
    pub const CONTENT_ID: &str = "content_id";
}

pub mod attribute {
    pub const TABLE: &str = "attribute";
    pub const CONTENT_ID: &str = "content_id";
    pub const VERSION: &str = "version";
    pub const FIELD_DEFINITION_ID: &str = "content_type_field_id";
    pub const LANGUAGE_ID: &str = "language_id";
    pub const DATA_INT: &str = "data_int";
    pub const DATA_FLOAT: &str = "data_float";
    pub const DATA_TEXT: &str = "data_text";
    pub const SORT_KEY_INT: &str = "sort_key_int";
    pub const SORT_KEY_STRING: &str = "sort_key_string";
}

pub mod search_word {
    pub const TABLE: &str = "search_word";
    pub const ID: &str = "id";
    pub const WORD: &str = "word";
}

pub mod search_object_word_link {
    pub const TABLE: &str = "search_object_word_link";
    pub const WORD_ID: &str = "word_id";
    pub const CONTENT_ID: &str = "content_id";
}

///
/// Shared join aliases
///
/// Handlers and sort clauses that need the same auxiliary table request it
/// under one of these aliases through `QueryContext::ensure_join`.
///

pub const MAIN_NODE_ALIAS: &str = "main_node";
pub const SECTION_ALIAS: &str = "section_join";
pub const CONTENT_TYPE_ALIAS: &str = "content_type_join";

///
/// SharedJoin
///
/// One-to-one auxiliary joins of the content target. Every consumer goes
/// through [`SharedJoin::ensure`], so a join requested by a sort clause and a
/// criterion in the same call is emitted once.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SharedJoin {
    MainNode,
    Section,
    ContentType,
}

impl SharedJoin {
    #[must_use]
    pub const fn alias(self) -> &'static str {
        match self {
            Self::MainNode => MAIN_NODE_ALIAS,
            Self::Section => SECTION_ALIAS,
            Self::ContentType => CONTENT_TYPE_ALIAS,
        }
    }

    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::MainNode => tree_node::TABLE,
            Self::Section => section::TABLE,
            Self::ContentType => content_type::TABLE,
        }
    }

    /// Add the join unless present and return its alias.
    pub fn ensure(self, ctx: &mut QueryContext<'_>) -> String {
        let alias = self.alias();
        ctx.ensure_join(alias, |ctx| {
            let on = match self {
                Self::MainNode => format!(
                    "{alias}.{} = {} AND {alias}.{} = {alias}.{}",
                    tree_node::CONTENT_ID,
                    ctx.id_column(),
                    tree_node::NODE_ID,
                    tree_node::MAIN_NODE_ID,
                ),
                Self::Section => format!(
                    "{alias}.{} = {}",
                    section::ID,
                    ctx.column(content::SECTION_ID)
                ),
                Self::ContentType => format!(
                    "{alias}.{} = {}",
                    content_type::ID,
                    ctx.column(content::CONTENT_TYPE_ID)
                ),
            };
            Join::left(self.table(), alias, on)
        })
    }

    /// Qualified column of the joined table.
    #[must_use]
    pub fn column(self, name: &str) -> String {
        format!("{}.{name}", self.alias())
    }
}

///
/// StatusFilter
/// Column/value pair ANDed into every query of a target.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusFilter {
    pub column: &'static str,
    pub value: i64,
}

///
/// SearchTargetKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SearchTargetKind {
    Content,
    ContentType,
}

///
/// SearchTarget
///
/// The entity table a gateway searches: where rows come from, which column
/// identifies them, which status counts as live, and where the language mask
/// lives.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchTarget {
    pub kind: SearchTargetKind,
    pub table: &'static str,
    pub alias: &'static str,
    pub id_column: &'static str,
    pub columns: &'static [&'static str],
    pub status: StatusFilter,
    pub language_mask_column: Option<&'static str>,
}

const CONTENT_COLUMNS: &[&str] = &[
    content::ID,
    content::CONTENT_TYPE_ID,
    content::SECTION_ID,
    content::CURRENT_VERSION,
    content::STATUS,
    content::LANGUAGE_MASK,
    content::INITIAL_LANGUAGE_ID,
    content::REMOTE_ID,
    content::NAME,
    content::MODIFIED,
    content::PUBLISHED,
];

const CONTENT_TYPE_COLUMNS: &[&str] = &[
    content_type::ID,
    content_type::IDENTIFIER,
    content_type::STATUS,
    content_type::LANGUAGE_MASK,
];

impl SearchTarget {
    /// Content search; only rows whose status equals `published_status` count.
    #[must_use]
    pub const fn content(published_status: i64) -> Self {
        Self {
            kind: SearchTargetKind::Content,
            table: content::TABLE,
            alias: "c",
            id_column: content::ID,
            columns: CONTENT_COLUMNS,
            status: StatusFilter {
                column: content::STATUS,
                value: published_status,
            },
            language_mask_column: Some(content::LANGUAGE_MASK),
        }
    }

    /// Content-type search; only rows whose status equals `defined_status` count.
    #[must_use]
    pub const fn content_type(defined_status: i64) -> Self {
        Self {
            kind: SearchTargetKind::ContentType,
            table: content_type::TABLE,
            alias: "ct",
            id_column: content_type::ID,
            columns: CONTENT_TYPE_COLUMNS,
            status: StatusFilter {
                column: content_type::STATUS,
                value: defined_status,
            },
            language_mask_column: Some(content_type::LANGUAGE_MASK),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.table
    }

    /// Qualify a column with this target's alias.
    #[must_use]
    pub fn column(&self, name: &str) -> String {
        format!("{}.{name}", self.alias)
    }
}
