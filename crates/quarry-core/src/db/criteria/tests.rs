use crate::{
    db::{
        criteria::{
            CriteriaConverter, Criterion, CriterionHandler, LeafCriterion, Operator, Target,
            handler::{HandlerDeps, content_handlers, content_type_handlers},
        },
        field::{
            DefaultFieldNames, FieldNameResolver, FieldValueTranslator, SearchableFieldMap,
            value::{CollationHandler, SimpleHandler},
        },
        language::LanguageMask,
        sql::{Fragment, QueryContext},
        transform::Lowercase,
    },
    error::{ErrorClass, InternalError},
    test_support::fixtures::{self, CONTENT, CONTENT_TYPE},
    value::Value,
};
use proptest::prelude::*;
use std::sync::Arc;

fn deps_with(resolver: FieldNameResolver, full_text_wildcards: bool) -> HandlerDeps {
    let mut translator = FieldValueTranslator::new(Some(Arc::new(CollationHandler::new(
        Arc::new(Lowercase),
    ))));
    translator.register("ezinteger", Arc::new(SimpleHandler));

    HandlerDeps {
        resolver: Arc::new(resolver),
        translator: Arc::new(translator),
        languages: Arc::new(fixtures::languages()),
        transformer: Arc::new(Lowercase),
        full_text_wildcards,
    }
}

fn deps() -> HandlerDeps {
    deps_with(fixtures::resolver(), true)
}

fn converter() -> CriteriaConverter {
    CriteriaConverter::builder()
        .register_all(content_handlers(&deps()))
        .build()
        .expect("content converter")
}

///
/// Compiled
/// Rendered predicate, bound parameter values, and join aliases.
///

struct Compiled {
    sql: String,
    params: Vec<Value>,
    joins: Vec<String>,
}

fn compile_with(
    converter: &CriteriaConverter,
    language: Option<LanguageMask>,
    criterion: &Criterion,
) -> Result<Compiled, InternalError> {
    let mut ctx = QueryContext::new(&CONTENT, language);
    let fragment = converter.convert(&mut ctx, criterion)?;

    Ok(Compiled {
        sql: fragment.into_string(),
        params: ctx.params().iter().map(|(_, v)| v.clone()).collect(),
        joins: ctx.joins().iter().map(|join| join.alias.clone()).collect(),
    })
}

fn compile(criterion: &Criterion) -> Compiled {
    compile_with(&converter(), None, criterion).expect("criterion compiles")
}

fn compile_err(criterion: &Criterion) -> InternalError {
    match compile_with(&converter(), None, criterion) {
        Ok(compiled) => panic!("expected an error, compiled to {}", compiled.sql),
        Err(err) => err,
    }
}

///
/// Composites
///

#[test]
fn empty_and_or_compile_to_always_true() {
    assert_eq!(compile(&Criterion::and(vec![])).sql, "1 = 1");
    assert_eq!(compile(&Criterion::or(vec![])).sql, "1 = 1");
}

#[test]
fn single_child_and_is_the_child() {
    let leaf = Criterion::content_id(vec![4]);
    assert_eq!(
        compile(&Criterion::and(vec![leaf.clone()])).sql,
        compile(&leaf).sql
    );
}

#[test]
fn composites_parenthesize_children() {
    let criterion = Criterion::content_id(vec![1])
        & (Criterion::section_id(vec![2]) | Criterion::remote_id(vec!["abc"]));

    assert_eq!(
        compile(&criterion).sql,
        "(c.id IN (:p0)) AND ((c.section_id IN (:p1)) OR (c.remote_id IN (:p2)))"
    );
}

#[test]
fn not_without_children_matches_nothing() {
    assert_eq!(compile(&Criterion::Not(vec![])).sql, "NOT (1 = 1)");
}

#[test]
fn match_none_is_always_false() {
    assert_eq!(compile(&Criterion::match_none()).sql, "1 = 0");
    assert_eq!(compile(&Criterion::match_all()).sql, "1 = 1");
}

///
/// Dispatch
///

#[test]
fn unhandled_leaf_is_a_configuration_error() {
    let err = compile_err(&Criterion::custom("geo", Operator::Eq, 1));
    assert_eq!(err.class, ErrorClass::Configuration);
    assert!(err.message.contains("custom:geo"));
}

struct FixedHandler(&'static str);

impl CriterionHandler for FixedHandler {
    fn name(&self) -> &'static str {
        self.0
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        matches!(leaf.target, Target::ContentId | Target::Custom(_))
    }

    fn build(
        &self,
        _: &mut QueryContext<'_>,
        _: &LeafCriterion,
    ) -> Result<Fragment, InternalError> {
        Ok(Fragment::new(format!("fixed_{}", self.0)))
    }
}

#[test]
fn first_registered_handler_wins() {
    let converter = CriteriaConverter::builder()
        .register(Arc::new(FixedHandler("first")))
        .register_all(content_handlers(&deps()))
        .build()
        .expect("converter");

    let compiled = compile_with(&converter, None, &Criterion::content_id(vec![1])).expect("ok");
    assert_eq!(compiled.sql, "fixed_first");
    assert_eq!(converter.handler_names()[0], "first");
}

#[test]
fn duplicate_handler_names_are_rejected() {
    let result = CriteriaConverter::builder()
        .register(Arc::new(FixedHandler("twice")))
        .register(Arc::new(FixedHandler("twice")))
        .build();

    assert!(matches!(result, Err(err) if err.is_configuration()));
}

#[test]
fn builtin_handler_sets_have_unique_names() {
    CriteriaConverter::builder()
        .register_all(content_handlers(&deps()))
        .build()
        .expect("content handlers");
    CriteriaConverter::builder()
        .register_all(content_type_handlers(&deps()))
        .build()
        .expect("content type handlers");
}

///
/// Identifier handlers
///

#[test]
fn content_type_identifier_resolves_through_lookup() {
    let compiled = compile(&Criterion::content_type_identifier(vec!["folder", "article"]));

    assert_eq!(
        compiled.sql,
        "c.content_type_id IN (SELECT id FROM content_type WHERE identifier IN (:p0, :p1))"
    );
    assert_eq!(compiled.params, vec![Value::from("folder"), Value::from("article")]);
}

#[test]
fn content_type_target_matches_its_own_columns() {
    let converter = CriteriaConverter::builder()
        .register_all(content_type_handlers(&deps()))
        .build()
        .expect("converter");
    let criterion = Criterion::and(vec![
        Criterion::content_type_identifier(vec!["folder"]),
        Criterion::content_type_group_id(vec![1]),
    ]);

    let mut ctx = QueryContext::new(&CONTENT_TYPE, None);
    let fragment = converter.convert(&mut ctx, &criterion).expect("compiles");
    assert_eq!(
        fragment.as_str(),
        "(ct.identifier IN (:p0)) AND (ct.id IN (SELECT content_type_id FROM \
         content_type_group_link WHERE group_id IN (:p1)))"
    );
}

#[test]
fn identifier_handlers_reject_range_operators() {
    let err = compile_err(&Criterion::leaf(Target::ContentId, Operator::Gt, 3));
    assert_eq!(err.class, ErrorClass::Unsupported);
}

#[test]
fn section_identifier_joins_section_once() {
    let criterion = Criterion::or(vec![
        Criterion::section_identifier(vec!["media"]),
        Criterion::section_identifier(vec!["users"]),
    ]);
    let compiled = compile(&criterion);

    assert_eq!(compiled.joins, vec!["section_join".to_string()]);
    assert_eq!(
        compiled.sql,
        "(section_join.identifier IN (:p0)) OR (section_join.identifier IN (:p1))"
    );
}

///
/// Language, date and location handlers
///

#[test]
fn language_code_builds_mask_with_always_available_bit() {
    let compiled = compile(&Criterion::language_code(vec!["eng-GB", "ger-DE"], true));

    assert_eq!(compiled.sql, "(c.language_mask & :p0) > 0");
    assert_eq!(compiled.params, vec![Value::Int(7)]);
}

#[test]
fn unknown_language_code_is_not_found() {
    let err = compile_err(&Criterion::language_code(vec!["fre-FR"], false));
    assert_eq!(err.class, ErrorClass::NotFound);
}

#[test]
fn date_handler_supports_comparisons_but_not_patterns() {
    let compiled = compile(&Criterion::date_modified(Operator::Between, vec![100, 200]));
    assert_eq!(compiled.sql, "c.modified BETWEEN :p0 AND :p1");

    let err = compile_err(&Criterion::date_published(Operator::Like, "2020*"));
    assert_eq!(err.class, ErrorClass::Unsupported);
}

#[test]
fn subtree_matches_path_prefixes() {
    let compiled = compile(&Criterion::subtree(vec!["/1/2/", "/1/5/"]));

    assert_eq!(
        compiled.sql,
        "c.id IN (SELECT t0.content_id FROM tree_node AS t0 WHERE \
         (t0.path_string LIKE :p0 ESCAPE '\\') OR (t0.path_string LIKE :p1 ESCAPE '\\'))"
    );
    assert_eq!(compiled.params, vec![Value::from("/1/2/%"), Value::from("/1/5/%")]);
}

#[test]
fn ancestor_parses_node_ids_from_paths() {
    let compiled = compile(&Criterion::ancestor(vec!["/1/2/54/", "/1/2/60/"]));

    assert_eq!(
        compiled.sql,
        "c.id IN (SELECT t0.content_id FROM tree_node AS t0 WHERE t0.node_id IN (:p0, :p1, :p2, :p3))"
    );
    assert_eq!(
        compiled.params,
        vec![Value::Int(1), Value::Int(2), Value::Int(54), Value::Int(60)]
    );

    let err = compile_err(&Criterion::ancestor(vec!["/1/x/"]));
    assert_eq!(err.class, ErrorClass::InvalidArgument);
}

#[test]
fn visibility_negates_for_hidden_content() {
    assert_eq!(
        compile(&Criterion::visible(true)).sql,
        "c.id IN (SELECT t0.content_id FROM tree_node AS t0 WHERE t0.is_invisible = 0)"
    );
    assert_eq!(
        compile(&Criterion::visible(false)).sql,
        "c.id NOT IN (SELECT t0.content_id FROM tree_node AS t0 WHERE t0.is_invisible = 0)"
    );
}

#[test]
fn depth_and_priority_share_the_main_node_join() {
    let criterion = Criterion::depth(Operator::Gte, 2) & Criterion::location_priority(Operator::Lt, 10);
    let compiled = compile(&criterion);

    assert_eq!(compiled.joins, vec!["main_node".to_string()]);
    assert_eq!(
        compiled.sql,
        "(main_node.depth >= :p0) AND (main_node.priority < :p1)"
    );
}

///
/// Field handler
///

#[test]
fn field_criterion_compiles_to_current_version_subselect() {
    let compiled = compile(&Criterion::field("price", Operator::Gt, 5));

    assert_eq!(
        compiled.sql,
        "c.id IN (SELECT a0.content_id FROM attribute AS a0 INNER JOIN content AS a0v \
         ON a0v.id = a0.content_id AND a0v.current_version = a0.version \
         WHERE (a0.content_type_field_id IN (:p0)) AND (a0.sort_key_int > :p1))"
    );
    assert_eq!(compiled.params, vec![Value::Int(11), Value::Int(5)]);
}

#[test]
fn field_criterion_ors_every_entity_type_defining_the_attribute() {
    let compiled = compile(&Criterion::field("title", Operator::Eq, "News"));

    assert_eq!(compiled.sql.matches("a0.content_type_field_id IN").count(), 3);
    assert_eq!(compiled.sql.matches(" OR ").count(), 2);
    // Folded once per alternative.
    assert_eq!(
        compiled.params.iter().filter(|v| **v == Value::from("news")).count(),
        3
    );
}

#[test]
fn field_criterion_restricts_attribute_language_when_filtered() {
    let compiled = compile_with(
        &converter(),
        Some(LanguageMask::from_bits(3)),
        &Criterion::field("price", Operator::Eq, 5),
    )
    .expect("compiles");

    assert!(compiled.sql.contains("((a0.language_id & :p2) > 0)"));
    assert_eq!(compiled.params[2], Value::Int(3));
}

#[test]
fn field_criterion_honours_custom_field() {
    let criterion =
        Criterion::field("price", Operator::Eq, 5).with_custom_field("article", "price", "data_int");
    let compiled = compile(&criterion);

    assert!(compiled.sql.contains("(a0.data_int = :p1)"));
}

#[test]
fn field_criterion_without_searchable_fields_is_invalid_argument() {
    let err = compile_err(&Criterion::field("missing", Operator::Eq, 1));
    assert_eq!(err.class, ErrorClass::InvalidArgument);
}

#[test]
fn field_criterion_on_unregistered_type_is_configuration_error() {
    let map = SearchableFieldMap::new().with("article", "body", 12, "ezrichtext");
    let resolver = FieldNameResolver::new(map, fixtures::indexes(), Arc::new(DefaultFieldNames));
    let converter = CriteriaConverter::builder()
        .register_all(content_handlers(&deps_with(resolver, true)))
        .build()
        .expect("converter");

    let err = compile_with(&converter, None, &Criterion::field("body", Operator::Eq, "x"))
        .err()
        .expect("no index definition");
    assert_eq!(err.class, ErrorClass::Configuration);
}

///
/// Full text
///

#[test]
fn full_text_requires_every_word() {
    let compiled = compile(&Criterion::full_text("Rust ba*"));

    assert_eq!(compiled.sql.matches("search_object_word_link AS").count(), 2);
    assert!(compiled.sql.contains("w1.word = :p0"));
    assert!(compiled.sql.contains("w3.word LIKE :p1 ESCAPE '\\'"));
    assert_eq!(compiled.params, vec![Value::from("rust"), Value::from("ba%")]);
}

#[test]
fn full_text_wildcards_can_be_disabled() {
    let converter = CriteriaConverter::builder()
        .register_all(content_handlers(&deps_with(fixtures::resolver(), false)))
        .build()
        .expect("converter");
    let compiled =
        compile_with(&converter, None, &Criterion::full_text("ba*")).expect("compiles");

    assert!(compiled.sql.contains("w1.word = :p0"));
    assert_eq!(compiled.params, vec![Value::from("ba*")]);
}

#[test]
fn blank_full_text_matches_nothing() {
    assert_eq!(compile(&Criterion::full_text("   ")).sql, "1 = 0");
}

proptest! {
    #[test]
    fn not_compiles_only_its_first_child(
        first in prop::collection::vec(0i64..100, 0..4),
        rest in prop::collection::vec(prop::collection::vec(0i64..100, 0..4), 0..3),
    ) {
        let head = Criterion::content_id(first);
        let mut children = vec![head.clone()];
        children.extend(rest.into_iter().map(Criterion::section_id));

        let negated_all = compile(&Criterion::Not(children));
        let negated_head = compile(&Criterion::not(head));

        prop_assert_eq!(negated_all.sql, negated_head.sql);
        prop_assert_eq!(negated_all.params, negated_head.params);
    }
}
