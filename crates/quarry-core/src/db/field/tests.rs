use crate::{
    db::{
        criteria::{CriterionError, CustomFields, Operator},
        field::{
            DefaultFieldNames, FieldColumn, FieldError, FieldNameGenerator, FieldNameResolver,
            FieldValueTranslator, IndexDefinition, IndexRegistry, StorageKind,
            value::{CollationHandler, FieldValueHandler, SimpleHandler},
        },
        sql::{Fragment, QueryContext},
        transform::{Lowercase, RuleTable},
    },
    error::{ErrorClass, InternalError},
    test_support::fixtures::{
        ARTICLE_TITLE, BLOG_POST_TITLE, CONTENT, FOLDER_TITLE, field_map, indexes, resolver,
    },
    value::Value,
};
use proptest::prelude::*;
use std::sync::Arc;

fn no_custom() -> CustomFields {
    CustomFields::default()
}

///
/// Resolver
///

#[test]
fn default_names_are_lowercased_and_sanitized() {
    let name = DefaultFieldNames.name("sort_value", "Title", "Blog-Post");
    assert_eq!(name, "blog_post_title_sort_value");
}

#[test]
fn resolve_uses_default_match_and_sort_fields() {
    let resolver = resolver();

    let (name, kind) = resolver
        .resolve(&no_custom(), "article", "title", "ezstring", None, false)
        .expect("match field");
    assert_eq!(name, "article_title_sort_value");
    assert_eq!(kind, Some(StorageKind::StringCi));

    let (name, kind) = resolver
        .resolve(&no_custom(), "article", "title", "ezstring", Some("value"), true)
        .expect("explicit field");
    assert_eq!(name, "article_title_value");
    assert_eq!(kind, Some(StorageKind::String));
}

#[test]
fn resolve_rejects_undeclared_sub_field() {
    let err = resolver()
        .resolve(&no_custom(), "article", "title", "ezstring", Some("nope"), false)
        .expect_err("undeclared sub-field");

    assert_eq!(
        err,
        FieldError::UndefinedIndexField {
            type_identifier: "ezstring".to_string(),
            sub_field: "nope".to_string(),
        }
    );
}

#[test]
fn unregistered_attribute_type_is_a_configuration_error() {
    let err = resolver()
        .resolve(&no_custom(), "article", "body", "ezrichtext", None, false)
        .expect_err("no index definition");
    assert!(matches!(err, FieldError::NoIndexDefinition { .. }));

    let err = InternalError::from(err);
    assert_eq!(err.class, ErrorClass::Configuration);
}

#[test]
fn custom_field_bypasses_index_definitions() {
    let mut custom = no_custom();
    custom.set("article", "title", "data_text");

    let (name, kind) = resolver()
        .resolve(&custom, "article", "title", "ezrichtext", None, false)
        .expect("custom field");
    assert_eq!(name, "data_text");
    assert_eq!(kind, None);
}

#[test]
fn field_names_aggregates_across_entity_types() {
    let fields = resolver()
        .field_names(&no_custom(), "title", None, None)
        .expect("title fields");

    let names = fields.keys().map(String::as_str).collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "article_title_sort_value",
            "blog_post_title_sort_value",
            "folder_title_sort_value",
        ]
    );
    assert_eq!(fields["article_title_sort_value"].definition_ids, vec![ARTICLE_TITLE]);
}

#[test]
fn field_names_filters_by_attribute_type_and_tolerates_unknown_attributes() {
    let resolver = resolver();

    let filtered = resolver
        .field_names(&no_custom(), "title", Some("ezinteger"), None)
        .expect("filtered");
    assert!(filtered.is_empty());

    let unknown = resolver
        .field_names(&no_custom(), "no_such_attribute", None, None)
        .expect("unknown attribute");
    assert!(unknown.is_empty());
}

#[test]
fn colliding_names_accumulate_definition_ids() {
    struct PerAttribute;

    impl FieldNameGenerator for PerAttribute {
        fn name(&self, sub_field: &str, attribute: &str, _: &str) -> String {
            format!("{attribute}_{sub_field}")
        }
    }

    let resolver = FieldNameResolver::new(field_map(), indexes(), Arc::new(PerAttribute));
    let fields = resolver
        .field_names(&no_custom(), "title", None, None)
        .expect("title fields");

    assert_eq!(fields.len(), 1);
    assert_eq!(
        fields["title_sort_value"].definition_ids,
        vec![ARTICLE_TITLE, BLOG_POST_TITLE, FOLDER_TITLE]
    );
}

#[test]
fn sort_field_requires_a_searchable_attribute() {
    let resolver = resolver();

    let field = resolver
        .sort_field(&no_custom(), "folder", "title", None)
        .expect("folder title");
    assert_eq!(field.alias, "folder_title_sort_value");
    assert_eq!(field.column(), "sort_key_string");

    let err = resolver
        .sort_field(&no_custom(), "folder", "price", None)
        .expect_err("folder has no price");
    assert_eq!(InternalError::from(err).class, ErrorClass::InvalidArgument);
}

#[test]
fn custom_field_must_be_an_identifier() {
    let mut custom = no_custom();
    custom.set("article", "title", "data_text; DROP TABLE content");

    let err = resolver()
        .sort_field(&custom, "article", "title", None)
        .expect_err("not an identifier");
    assert!(matches!(err, FieldError::InvalidCustomField { .. }));
}

#[test]
fn registry_rejects_undeclared_defaults() {
    let mut registry = IndexRegistry::new();
    let definition = IndexDefinition::new()
        .with_field("value", StorageKind::String)
        .with_default_sort("sort_value");

    let err = registry
        .register("ezstring", definition)
        .expect_err("undeclared default");
    assert!(err.is_configuration());
    assert!(!registry.contains("ezstring"));
}

#[test]
fn storage_kind_parses_known_names_only() {
    assert_eq!("string_ci".parse::<StorageKind>().ok(), Some(StorageKind::StringCi));
    assert!("blob".parse::<StorageKind>().is_err());
    assert_eq!(StorageKind::Integer.column(), "sort_key_int");
}

///
/// Translator
///

fn collation() -> CollationHandler {
    CollationHandler::new(Arc::new(Lowercase))
}

fn translate(
    handler: &dyn FieldValueHandler,
    op: Operator,
    value: impl Into<Value>,
    kind: StorageKind,
) -> (Result<Fragment, CriterionError>, Vec<Value>) {
    let mut ctx = QueryContext::new(&CONTENT, None);
    let column = FieldColumn::new("a0.col", Some(kind));
    let fragment = handler.handle(&mut ctx, op, &value.into(), &column);
    let params = ctx.params().iter().map(|(_, v)| v.clone()).collect();

    (fragment, params)
}

#[test]
fn collation_folds_only_for_case_folded_columns() {
    let (fragment, params) = translate(&collation(), Operator::Eq, "Hello", StorageKind::StringCi);
    assert_eq!(fragment.expect("eq").as_str(), "a0.col = :p0");
    assert_eq!(params, vec![Value::from("hello")]);

    let (_, params) = translate(&collation(), Operator::Eq, "Hello", StorageKind::String);
    assert_eq!(params, vec![Value::from("Hello")]);
}

#[test]
fn collation_folds_both_between_bounds() {
    let (fragment, params) = translate(
        &collation(),
        Operator::Between,
        vec!["A", "M"],
        StorageKind::StringCi,
    );
    assert_eq!(fragment.expect("between").as_str(), "a0.col BETWEEN :p0 AND :p1");
    assert_eq!(params, vec![Value::from("a"), Value::from("m")]);
}

#[test]
fn collation_like_escapes_translates_and_folds() {
    let (fragment, params) = translate(&collation(), Operator::Like, "Fo_*", StorageKind::String);
    assert_eq!(
        fragment.expect("like").as_str(),
        "a0.col LIKE :p0 ESCAPE '\\'"
    );
    assert_eq!(params, vec![Value::from("fo\\_%")]);

    let (_, params) = translate(&collation(), Operator::Contains, "50%", StorageKind::String);
    assert_eq!(params, vec![Value::from("%50\\%%")]);
}

#[test]
fn collation_uses_rule_table_transformer() {
    let handler = CollationHandler::new(Arc::new(RuleTable::new().with_rule('ß', "ss")));
    let (_, params) = translate(&handler, Operator::Eq, "Straße", StorageKind::StringCi);
    assert_eq!(params, vec![Value::from("strasse")]);
}

#[test]
fn empty_in_list_matches_nothing() {
    let (fragment, params) =
        translate(&collation(), Operator::In, Vec::<Value>::new(), StorageKind::StringCi);
    assert_eq!(fragment.expect("in"), Fragment::always_false());
    assert!(params.is_empty());
}

#[test]
fn simple_handler_never_folds_and_rejects_patterns() {
    let (_, params) = translate(&SimpleHandler, Operator::Eq, "ABC", StorageKind::StringCi);
    assert_eq!(params, vec![Value::from("ABC")]);

    let (fragment, _) = translate(&SimpleHandler, Operator::Like, "a*", StorageKind::Integer);
    assert!(matches!(
        fragment,
        Err(CriterionError::UnsupportedOperator { .. })
    ));
}

#[test]
fn translator_falls_back_to_default_or_fails() {
    let mut ctx = QueryContext::new(&CONTENT, None);
    let column = FieldColumn::new("a0.col", Some(StorageKind::Integer));

    let empty = FieldValueTranslator::default();
    let err = empty
        .translate(&mut ctx, "ezinteger", Operator::Eq, &Value::Int(1), &column)
        .expect_err("no handler");
    assert!(err.is_configuration());

    let mut translator = FieldValueTranslator::new(Some(Arc::new(collation())));
    translator.register("ezinteger", Arc::new(SimpleHandler));
    assert_eq!(translator.handler("ezinteger").map(|h| h.name()), Ok("simple"));
    assert_eq!(translator.handler("ezstring").map(|h| h.name()), Ok("collation"));
}

proptest! {
    #[test]
    fn resolution_is_deterministic(
        entity in "[a-z][a-z_]{0,8}",
        attribute in "[a-z][a-z_]{0,8}",
        sub_field in prop_oneof![Just("value"), Just("sort_value")],
    ) {
        let resolver = resolver();
        let first = resolver.resolve(&no_custom(), &entity, &attribute, "ezstring", Some(sub_field), false);
        let second = resolver.resolve(&no_custom(), &entity, &attribute, "ezstring", Some(sub_field), false);

        prop_assert_eq!(&first, &second);
        let (name, _) = first.expect("declared sub-field");
        prop_assert_eq!(name, format!("{entity}_{attribute}_{sub_field}"));
    }
}
