use crate::{
    db::{language::LanguageMask, schema::SearchTarget, sql::Fragment},
    value::Value,
};

///
/// JoinKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JoinKind {
    Inner,
    Left,
}

///
/// Join
///
/// An auxiliary join keyed by its alias. Two joins with the same alias are
/// the same join; [`QueryContext::ensure_join`] never adds it twice.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub alias: String,
    pub on: String,
}

impl Join {
    pub fn left(table: impl Into<String>, alias: impl Into<String>, on: impl Into<String>) -> Self {
        Self {
            kind: JoinKind::Left,
            table: table.into(),
            alias: alias.into(),
            on: on.into(),
        }
    }

    pub fn inner(
        table: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Self {
        Self {
            kind: JoinKind::Inner,
            table: table.into(),
            alias: alias.into(),
            on: on.into(),
        }
    }

    pub(crate) fn render(&self) -> String {
        let kind = match self.kind {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
        };
        format!("{kind} {} AS {} ON {}", self.table, self.alias, self.on)
    }
}

///
/// QueryContext
///
/// Per-call mutable builder state threaded through the criteria and sort
/// converters: bound parameters, generated sub-select aliases, and the
/// auxiliary joins requested so far. Never shared between calls.
///

#[derive(Debug)]
pub struct QueryContext<'a> {
    target: &'a SearchTarget,
    language: Option<LanguageMask>,
    params: Vec<(String, Value)>,
    joins: Vec<Join>,
    alias_seq: usize,
}

impl<'a> QueryContext<'a> {
    #[must_use]
    pub const fn new(target: &'a SearchTarget, language: Option<LanguageMask>) -> Self {
        Self {
            target,
            language,
            params: Vec::new(),
            joins: Vec::new(),
            alias_seq: 0,
        }
    }

    #[must_use]
    pub const fn target(&self) -> &'a SearchTarget {
        self.target
    }

    /// Qualified id column of the searched entity, e.g. `c.id`.
    #[must_use]
    pub fn id_column(&self) -> String {
        self.target.column(self.target.id_column)
    }

    /// Qualified column of the searched entity.
    #[must_use]
    pub fn column(&self, name: &str) -> String {
        self.target.column(name)
    }

    /// Language restriction in effect for this call, `None` for all languages.
    #[must_use]
    pub const fn language(&self) -> Option<LanguageMask> {
        self.language
    }

    /// Bind a parameter and return its placeholder.
    pub fn bind(&mut self, value: impl Into<Value>) -> String {
        let name = format!(":p{}", self.params.len());
        self.params.push((name.clone(), value.into()));
        name
    }

    /// Bind every element and return a parenthesized placeholder list.
    /// Callers must handle the empty case themselves.
    pub fn bind_list(&mut self, values: impl IntoIterator<Item = Value>) -> String {
        let placeholders = values
            .into_iter()
            .map(|value| self.bind(value))
            .collect::<Vec<_>>();
        format!("({})", placeholders.join(", "))
    }

    /// `<column> IN (...)`, or "always false" for an empty list.
    pub fn in_list(&mut self, column: &str, values: Vec<Value>) -> Fragment {
        if values.is_empty() {
            return Fragment::always_false();
        }
        let list = self.bind_list(values);
        Fragment::new(format!("{column} IN {list}"))
    }

    /// Allocate a fresh alias for a sub-select, e.g. `t0`, `t1`.
    pub fn next_alias(&mut self, prefix: &str) -> String {
        let alias = format!("{prefix}{}", self.alias_seq);
        self.alias_seq += 1;
        alias
    }

    #[must_use]
    pub fn has_join(&self, alias: &str) -> bool {
        self.joins.iter().any(|join| join.alias == alias)
    }

    /// Add the join produced by `build` unless a join with `alias` already
    /// exists; returns the alias either way. `build` runs only when the join
    /// is new, so no parameter is bound for a duplicate.
    pub fn ensure_join(&mut self, alias: &str, build: impl FnOnce(&mut Self) -> Join) -> String {
        if !self.has_join(alias) {
            let join = build(self);
            debug_assert_eq!(join.alias, alias, "join alias must match its key");
            self.joins.push(join);
        }
        alias.to_string()
    }

    #[must_use]
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    #[must_use]
    pub fn params(&self) -> &[(String, Value)] {
        &self.params
    }

    pub(crate) fn into_parts(self) -> (Vec<Join>, Vec<(String, Value)>) {
        (self.joins, self.params)
    }
}
