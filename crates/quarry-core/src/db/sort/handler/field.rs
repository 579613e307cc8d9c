use crate::{
    db::{
        field::FieldNameResolver,
        schema::{attribute, content},
        sort::{SortClause, SortClauseHandler, SortTarget},
        sql::{Join, QueryContext},
    },
    error::InternalError,
};
use std::sync::Arc;

///
/// FieldSortHandler
///
/// Orders by an attribute of one entity type. The attribute row of the
/// current version in the entity's initial language is LEFT JOINed under
/// the resolved physical name, so sorting on the same field twice joins
/// once and entities without a value sort as NULL.
///

#[derive(Clone)]
pub struct FieldSortHandler {
    resolver: Arc<FieldNameResolver>,
}

impl FieldSortHandler {
    #[must_use]
    pub const fn new(resolver: Arc<FieldNameResolver>) -> Self {
        Self { resolver }
    }
}

impl SortClauseHandler for FieldSortHandler {
    fn name(&self) -> &'static str {
        "field"
    }

    fn accepts(&self, clause: &SortClause) -> bool {
        matches!(clause.target, SortTarget::Field { .. })
    }

    fn apply(
        &self,
        ctx: &mut QueryContext<'_>,
        clause: &SortClause,
    ) -> Result<Vec<String>, InternalError> {
        let SortTarget::Field {
            entity_type,
            attribute: attribute_name,
            sub_field,
        } = &clause.target
        else {
            return Ok(Vec::new());
        };

        let field = self.resolver.sort_field(
            clause.custom_fields(),
            entity_type,
            attribute_name,
            sub_field.as_deref(),
        )?;

        let alias = ctx.ensure_join(&field.alias, |ctx| {
            let ids = ctx.in_list(
                &format!("{}.{}", field.alias, attribute::FIELD_DEFINITION_ID),
                field.definition_ids.iter().copied().map(Into::into).collect(),
            );
            let on = format!(
                "{a}.{} = {} AND {a}.{} = {} AND {ids} AND ({a}.{} & {}) > 0",
                attribute::CONTENT_ID,
                ctx.id_column(),
                attribute::VERSION,
                ctx.column(content::CURRENT_VERSION),
                attribute::LANGUAGE_ID,
                ctx.column(content::INITIAL_LANGUAGE_ID),
                a = field.alias,
            );
            Join::left(attribute::TABLE, &field.alias, on)
        });

        Ok(vec![format!(
            "{alias}.{} {}",
            field.column(),
            clause.direction.as_sql()
        )])
    }
}
