use crate::{
    db::{
        criteria::Operator,
        sql::{Fragment, Join, QueryContext, SelectQuery, compare::compare, like},
    },
    test_support::fixtures::CONTENT,
    value::Value,
};
use proptest::prelude::*;

#[test]
fn and_or_of_nothing_is_always_true() {
    assert!(Fragment::and(Vec::new()).is_always_true());
    assert!(Fragment::or(Vec::new()).is_always_true());
}

#[test]
fn single_part_is_not_wrapped() {
    let part = Fragment::new("c.id = :p0");
    assert_eq!(Fragment::and(vec![part.clone()]), part);
    assert_eq!(Fragment::or(vec![part.clone()]), part);
}

#[test]
fn and_drops_always_true_parts() {
    let fragment = Fragment::and(vec![
        Fragment::always_true(),
        Fragment::new("a = 1"),
        Fragment::new("b = 2"),
    ]);
    assert_eq!(fragment.as_str(), "(a = 1) AND (b = 2)");
}

#[test]
fn not_wraps_inner_expression() {
    let fragment = Fragment::not(Fragment::or(vec![
        Fragment::new("a = 1"),
        Fragment::new("b = 2"),
    ]));
    assert_eq!(fragment.as_str(), "NOT ((a = 1) OR (b = 2))");
}

#[test]
fn like_translates_caller_wildcards() {
    assert_eq!(like::translate_wildcards("fo*"), "fo%");
    assert_eq!(like::translate_wildcards("*bar*"), "%bar%");
    assert_eq!(like::translate_wildcards("100%_off*"), "100\\%\\_off%");
}

#[test]
fn like_contains_escapes_before_wrapping() {
    assert_eq!(like::contains("50%"), "%50\\%%");
    assert_eq!(like::contains("a*b"), "%a%b%");
}

#[test]
fn like_predicate_declares_escape_character() {
    assert_eq!(
        like::predicate("a0.data_text", ":p0"),
        "a0.data_text LIKE :p0 ESCAPE '\\'"
    );
}

#[test]
fn bind_numbers_placeholders_in_order() {
    let mut ctx = QueryContext::new(&CONTENT, None);
    assert_eq!(ctx.bind(1), ":p0");
    assert_eq!(ctx.bind("x"), ":p1");
    assert_eq!(
        ctx.params(),
        &[
            (":p0".to_string(), Value::Int(1)),
            (":p1".to_string(), Value::Text("x".to_string())),
        ]
    );
}

#[test]
fn in_list_of_nothing_is_always_false() {
    let mut ctx = QueryContext::new(&CONTENT, None);
    let fragment = ctx.in_list("c.id", Vec::new());
    assert_eq!(fragment, Fragment::always_false());
    assert!(ctx.params().is_empty());
}

#[test]
fn ensure_join_adds_each_alias_once_without_orphan_params() {
    let mut ctx = QueryContext::new(&CONTENT, None);
    for _ in 0..3 {
        ctx.ensure_join("s", |ctx| {
            let placeholder = ctx.bind(7);
            Join::left("section", "s", format!("s.id = {placeholder}"))
        });
    }

    assert_eq!(ctx.joins().len(), 1);
    assert_eq!(ctx.params().len(), 1);
}

#[test]
fn compare_coerces_operands_leniently() {
    let mut ctx = QueryContext::new(&CONTENT, None);

    let eq = compare(&mut ctx, "col", Operator::Eq, &Value::from(vec![3, 4]), |v| v)
        .expect("eq renders");
    assert_eq!(eq.as_str(), "col = :p0");
    assert_eq!(ctx.params()[0].1, Value::Int(3));

    let between = compare(&mut ctx, "col", Operator::Between, &Value::Int(9), |v| v)
        .expect("between renders");
    assert_eq!(between.as_str(), "col BETWEEN :p1 AND :p2");
    assert_eq!(ctx.params()[1].1, Value::Int(9));
    assert_eq!(ctx.params()[2].1, Value::Int(9));

    let membership = compare(&mut ctx, "col", Operator::In, &Value::Int(5), |v| v)
        .expect("in renders");
    assert_eq!(membership.as_str(), "col IN (:p3)");

    assert!(compare(&mut ctx, "col", Operator::Like, &Value::Null, |v| v).is_none());
}

#[test]
fn select_renders_clauses_in_order() {
    let mut ctx = QueryContext::new(&CONTENT, None);
    let placeholder = ctx.bind(1);
    ctx.ensure_join("s", |_| Join::left("section", "s", "s.id = c.section_id"));

    let mut select = SelectQuery::new("content", "c");
    select.columns = vec!["c.id".to_string()];
    select.predicate = Fragment::new(format!("c.status = {placeholder}"));
    select.order_by = vec!["c.id ASC".to_string()];
    select.limit = Some(10);
    select.offset = 20;

    let query = select.render(ctx);
    assert_eq!(
        query.sql,
        "SELECT c.id FROM content AS c LEFT JOIN section AS s ON s.id = c.section_id \
         WHERE c.status = :p0 ORDER BY c.id ASC LIMIT 10 OFFSET 20"
    );
    assert_eq!(query.param(":p0"), Some(&Value::Int(1)));
}

#[test]
fn offset_without_limit_renders_unbounded_limit() {
    let mut select = SelectQuery::new("content", "c");
    select.columns = vec!["c.id".to_string()];
    select.offset = 5;

    let query = select.render(QueryContext::new(&CONTENT, None));
    assert!(query.sql.ends_with(&format!("LIMIT {} OFFSET 5", i64::MAX)));
    assert!(!query.sql.contains("WHERE"));
}

#[test]
fn oversized_limit_and_offset_render_as_signed_integers() {
    let mut select = SelectQuery::new("content", "c");
    select.columns = vec!["c.id".to_string()];
    select.limit = Some(u64::MAX);
    select.offset = u64::MAX;

    let query = select.render(QueryContext::new(&CONTENT, None));
    let max = i64::MAX;
    assert!(query.sql.ends_with(&format!("LIMIT {max} OFFSET {max}")));
}

#[test]
fn fingerprint_tracks_sql_and_params() {
    let render = |value: i64| {
        let mut ctx = QueryContext::new(&CONTENT, None);
        let mut select = SelectQuery::new("content", "c");
        select.columns = vec!["c.id".to_string()];
        select.predicate = Fragment::new(format!("c.id = {}", ctx.bind(value)));
        select.render(ctx)
    };

    assert_eq!(render(1).fingerprint(), render(1).fingerprint());
    assert_ne!(render(1).fingerprint(), render(2).fingerprint());
    assert_eq!(render(1).fingerprint_hex().len(), 64);
}

proptest! {
    #[test]
    fn escaped_literal_never_contains_bare_metacharacters(input in "[a-z%_\\\\]{0,16}") {
        let escaped = like::escape(&input);
        let mut chars = escaped.chars();
        while let Some(ch) = chars.next() {
            if ch == like::ESCAPE_CHAR {
                let next = chars.next();
                prop_assert!(matches!(next, Some('%' | '_' | '\\')));
            } else {
                prop_assert!(ch != '%' && ch != '_');
            }
        }
    }

    #[test]
    fn wildcard_count_matches_caller_stars(input in "[a-z*%]{0,16}") {
        let pattern = like::translate_wildcards(&input);
        let stars = input.chars().filter(|c| *c == '*').count();
        let bare = pattern.chars().filter(|c| *c == '%').count()
            - input.chars().filter(|c| *c == '%').count();
        prop_assert_eq!(bare, stars);
    }
}
