//! Query gateway: count-then-fetch orchestration over a [`Connection`].

mod conversion;


pub use conversion::ExceptionConversion;

use crate::{
    db::{
        connection::{Connection, DriverError, Row},
        criteria::{CriteriaConverter, Criterion},
        language::{LanguageFilter, LanguageMask, LanguageRegistry},
        schema::SearchTarget,
        sort::{SortClause, SortClauseConverter, SortDirection},
        sql::{Fragment, QueryContext, SelectQuery, SqlQuery},
    },
    error::{ErrorOrigin, InternalError},
    obs::sink::{self, MetricsEvent, QueryKind, Span},
};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// FindQuery
///
/// One search request. `limit: None` is unbounded; `do_count: false` skips
/// the COUNT round trip and leaves [`QueryResult::count`] empty.
///

#[derive(Clone, Debug, PartialEq)]
pub struct FindQuery {
    pub criterion: Criterion,
    pub offset: u64,
    pub limit: Option<u64>,
    pub sort: Vec<SortClause>,
    pub language_filter: LanguageFilter,
    pub do_count: bool,
}

impl FindQuery {
    #[must_use]
    pub fn new(criterion: Criterion) -> Self {
        Self {
            criterion,
            offset: 0,
            limit: None,
            sort: Vec::new(),
            language_filter: LanguageFilter::all(),
            do_count: true,
        }
    }

    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn sort(mut self, clause: SortClause) -> Self {
        self.sort.push(clause);
        self
    }

    #[must_use]
    pub fn languages(mut self, filter: LanguageFilter) -> Self {
        self.language_filter = filter;
        self
    }

    #[must_use]
    pub const fn without_count(mut self) -> Self {
        self.do_count = false;
        self
    }
}

///
/// QueryResult
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
    /// Total matches ignoring pagination; `None` when counting was skipped.
    pub count: Option<u64>,
    pub rows: Vec<Row>,
}

///
/// GatewayError
///
/// Raw gateway failure. Driver errors are still unconverted here; callers
/// outside this crate only ever see them through [`ExceptionConversion`].
///

#[derive(Debug, ThisError)]
pub enum GatewayError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

///
/// Gateway
///

pub trait Gateway {
    fn target(&self) -> &SearchTarget;

    fn find(&self, query: &FindQuery) -> Result<QueryResult, GatewayError>;

    fn count(
        &self,
        criterion: &Criterion,
        language_filter: &LanguageFilter,
    ) -> Result<u64, GatewayError>;
}

///
/// SqlGateway
///
/// Gateway over one search target. Every query it issues is ANDed with the
/// target's status filter and, when the caller restricts languages, with
/// the language mask test.
///

#[derive(Clone)]
pub struct SqlGateway {
    connection: Arc<dyn Connection>,
    target: SearchTarget,
    criteria: Arc<CriteriaConverter>,
    sort: Arc<SortClauseConverter>,
    languages: Arc<LanguageRegistry>,
    debug: bool,
}

impl SqlGateway {
    #[must_use]
    pub fn new(
        connection: Arc<dyn Connection>,
        target: SearchTarget,
        criteria: Arc<CriteriaConverter>,
        sort: Arc<SortClauseConverter>,
        languages: Arc<LanguageRegistry>,
    ) -> Self {
        Self {
            connection,
            target,
            criteria,
            sort,
            languages,
            debug: false,
        }
    }

    /// Log compiled SQL and parameters at debug level.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Compile the COUNT query for a criterion without running it.
    pub fn count_query(
        &self,
        criterion: &Criterion,
        language: Option<LanguageMask>,
    ) -> Result<SqlQuery, InternalError> {
        let mut ctx = QueryContext::new(&self.target, language);
        let predicate = self.predicate(&mut ctx, criterion)?;

        let mut select = SelectQuery::new(self.target.table, self.target.alias);
        select.columns = vec![format!("COUNT(DISTINCT {}) AS count", ctx.id_column())];
        select.predicate = predicate;

        Ok(select.render(ctx))
    }

    /// Compile the paginated row query without running it.
    pub fn row_query(
        &self,
        query: &FindQuery,
        language: Option<LanguageMask>,
    ) -> Result<SqlQuery, InternalError> {
        let mut ctx = QueryContext::new(&self.target, language);

        // Sort joins first; criteria then reuse them.
        let mut order_by = self.sort.convert(&mut ctx, &query.sort)?;
        let predicate = self.predicate(&mut ctx, &query.criterion)?;

        let id_column = ctx.id_column();
        let id_prefix = format!("{id_column} ");
        if !order_by.iter().any(|term| term.starts_with(&id_prefix)) {
            order_by.push(format!("{id_column} {}", SortDirection::Ascending.as_sql()));
        }

        let mut select = SelectQuery::new(self.target.table, self.target.alias);
        select.columns = self
            .target
            .columns
            .iter()
            .map(|column| ctx.column(column))
            .collect();
        select.predicate = predicate;
        select.order_by = order_by;
        select.limit = query.limit;
        select.offset = query.offset;

        Ok(select.render(ctx))
    }

    fn predicate(
        &self,
        ctx: &mut QueryContext<'_>,
        criterion: &Criterion,
    ) -> Result<Fragment, InternalError> {
        let compiled = self.criteria.convert(ctx, criterion)?;

        let status_column = ctx.column(self.target.status.column);
        let status = ctx.bind(self.target.status.value);
        let mut parts = vec![
            compiled,
            Fragment::new(format!("{status_column} = {status}")),
        ];

        if let (Some(mask), Some(mask_column)) = (ctx.language(), self.target.language_mask_column)
        {
            let column = ctx.column(mask_column);
            let placeholder = ctx.bind(mask.as_i64());
            parts.push(Fragment::new(format!("({column} & {placeholder}) > 0")));
        }

        Ok(Fragment::and(parts))
    }

    fn log(&self, label: &str, query: &SqlQuery) {
        if self.debug {
            tracing::debug!(
                search_target = self.target.name(),
                fingerprint = %query.fingerprint_hex(),
                sql = %query.sql,
                params = ?query.params,
                "{label}"
            );
        }
    }

    fn run_count(&self, query: &SqlQuery) -> Result<u64, DriverError> {
        self.log("count query", query);
        sink::record(MetricsEvent::BackendQuery {
            target: self.target.name(),
            kind: QueryKind::Count,
        });

        self.connection.fetch_count(query)
    }

    fn run_rows(&self, query: &SqlQuery) -> Result<Vec<Row>, DriverError> {
        self.log("row query", query);
        sink::record(MetricsEvent::BackendQuery {
            target: self.target.name(),
            kind: QueryKind::Rows,
        });

        self.connection.fetch_rows(query)
    }
}

impl Gateway for SqlGateway {
    fn target(&self) -> &SearchTarget {
        &self.target
    }

    fn find(&self, query: &FindQuery) -> Result<QueryResult, GatewayError> {
        if !query.do_count && query.limit == Some(0) {
            return Err(InternalError::invalid_argument(
                ErrorOrigin::Gateway,
                "a find with limit 0 must request the count",
            )
            .into());
        }

        let mut span = Span::new(self.target.name());
        let language = self.languages.filter_mask(&query.language_filter)?;

        let count = if query.do_count {
            let count_query = self.count_query(&query.criterion, language)?;
            Some(self.run_count(&count_query)?)
        } else {
            None
        };
        span.set_count(count);

        if query.limit == Some(0) || count.is_some_and(|count| count <= query.offset) {
            sink::record(MetricsEvent::RowQuerySkipped {
                target: self.target.name(),
            });
            return Ok(QueryResult {
                count,
                rows: Vec::new(),
            });
        }

        let row_query = self.row_query(query, language)?;
        let rows = self.run_rows(&row_query)?;
        span.set_rows(rows.len() as u64);

        Ok(QueryResult { count, rows })
    }

    fn count(
        &self,
        criterion: &Criterion,
        language_filter: &LanguageFilter,
    ) -> Result<u64, GatewayError> {
        let language = self.languages.filter_mask(language_filter)?;
        let count_query = self.count_query(criterion, language)?;

        Ok(self.run_count(&count_query)?)
    }
}
