use crate::{
    db::{
        criteria::{CriterionHandler, LeafCriterion, Target},
        field::{FieldColumn, FieldError, FieldNameResolver, FieldValueTranslator},
        schema::{attribute, content},
        sql::{Fragment, Join, QueryContext},
    },
    error::InternalError,
};
use std::sync::Arc;

///
/// FieldHandler
///
/// Generic attribute-value criterion. The attribute is resolved across every
/// entity type defining it; each physical field contributes
/// `definition id IN (...) AND <translated predicate>` and the alternatives
/// are ORed inside one sub-select over the current-version attribute rows.
///

#[derive(Clone)]
pub struct FieldHandler {
    resolver: Arc<FieldNameResolver>,
    translator: Arc<FieldValueTranslator>,
}

impl FieldHandler {
    #[must_use]
    pub const fn new(resolver: Arc<FieldNameResolver>, translator: Arc<FieldValueTranslator>) -> Self {
        Self {
            resolver,
            translator,
        }
    }
}

impl CriterionHandler for FieldHandler {
    fn name(&self) -> &'static str {
        "field"
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        matches!(leaf.target, Target::Field(_))
    }

    fn build(
        &self,
        ctx: &mut QueryContext<'_>,
        leaf: &LeafCriterion,
    ) -> Result<Fragment, InternalError> {
        let Target::Field(attribute_name) = &leaf.target else {
            return Ok(Fragment::always_false());
        };

        let fields = self
            .resolver
            .field_names(leaf.custom_fields(), attribute_name, None, None)?;
        if fields.is_empty() {
            return Err(FieldError::NoSearchableFields {
                attribute: attribute_name.clone(),
            }
            .into());
        }

        let alias = ctx.next_alias("a");
        let mut alternatives = Vec::with_capacity(fields.len());
        for field in fields.values() {
            let ids = ctx.in_list(
                &format!("{alias}.{}", attribute::FIELD_DEFINITION_ID),
                field.definition_ids.iter().copied().map(Into::into).collect(),
            );
            let column = FieldColumn::new(format!("{alias}.{}", field.column()), field.kind);
            let predicate =
                self.translator
                    .translate(ctx, &field.type_identifier, leaf.op, &leaf.value, &column)?;
            alternatives.push(Fragment::and(vec![ids, predicate]));
        }

        let mut conditions = vec![Fragment::or(alternatives)];
        if let Some(mask) = ctx.language() {
            let placeholder = ctx.bind(mask.as_i64());
            conditions.push(Fragment::new(format!(
                "({alias}.{} & {placeholder}) > 0",
                attribute::LANGUAGE_ID
            )));
        }

        let version = format!("{alias}v");
        let current = Join::inner(
            content::TABLE,
            &version,
            format!(
                "{version}.{} = {alias}.{} AND {version}.{} = {alias}.{}",
                content::ID,
                attribute::CONTENT_ID,
                content::CURRENT_VERSION,
                attribute::VERSION,
            ),
        );

        Ok(Fragment::new(format!(
            "{} IN (SELECT {alias}.{} FROM {} AS {alias} {} WHERE {})",
            ctx.id_column(),
            attribute::CONTENT_ID,
            attribute::TABLE,
            current.render(),
            Fragment::and(conditions),
        )))
    }
}
