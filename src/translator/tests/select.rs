//! Query spec rendering across dialects.

use pretty_assertions::assert_eq;

use super::{dialect_with, render, sql};
use crate::ast::builders::*;
use crate::ast::{
    ComparisonOperator, Expression, FetchClause, JdbcParameter, NullPrecedence, Predicate,
    Quantifier, QueryPart, QuerySpec, SortSpecification, Statement,
};
use crate::dialect::{DialectKind, SelectItemReferenceStrategy};
use crate::error::RenderError;
use crate::translator::SqlAstTranslator;

fn entity() -> QuerySpec {
    QuerySpec::new()
        .select(qualified("e", "id"))
        .select_as(qualified("e", "name"), "n")
        .from(table("entity", "e"))
}

#[test]
fn test_select_where_order_limit_postgres() {
    let spec = entity()
        .filter(eq(qualified("e", "id"), param("id")))
        .order_by(SortSpecification::desc(select_ref(2)))
        .fetch(FetchClause::first(int(10)).offset(int(20)));
    let operation = render(DialectKind::Postgres, spec).unwrap();
    assert_eq!(
        operation.sql,
        "select e.id,e.name as n from entity e where e.id = ? order by 2 desc limit 10 offset 20"
    );
    assert_eq!(operation.parameters, vec![JdbcParameter::named("id")]);
}

#[test]
fn test_offset_fetch_ansi() {
    let spec = entity().fetch(FetchClause::first(int(10)).offset(int(20)));
    assert_eq!(
        sql(DialectKind::Ansi, spec),
        "select e.id,e.name as n from entity e offset 20 rows fetch first 10 rows only"
    );
}

#[test]
fn test_derby_limit_handler() {
    let spec = QuerySpec::new()
        .select(qualified("e", "id"))
        .from(table("entity", "e"))
        .fetch(FetchClause::first(int(10)).offset(int(5)));
    assert_eq!(
        sql(DialectKind::Derby, spec),
        "select e.id from entity e offset 5 rows fetch first 10 rows only"
    );

    let first_only = QuerySpec::new()
        .select(qualified("e", "id"))
        .from(table("entity", "e"))
        .fetch(FetchClause::first(int(3)));
    assert_eq!(
        sql(DialectKind::Derby, first_only),
        "select e.id from entity e fetch first 3 rows only"
    );
}

#[test]
fn test_limit_parameters_follow_placeholder_order() {
    let spec = QuerySpec::new()
        .select(qualified("e", "id"))
        .from(table("entity", "e"))
        .filter(eq(qualified("e", "kind"), param("kind")))
        .fetch(FetchClause::first(param("max")).offset(param("skip")));
    let operation = render(DialectKind::Derby, spec).unwrap();
    assert_eq!(
        operation.sql,
        "select e.id from entity e where e.kind = ? offset ? rows fetch first ? rows only"
    );
    let labels: Vec<_> = operation
        .parameters
        .iter()
        .map(|p| p.label.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(labels, vec!["kind", "skip", "max"]);
}

#[test]
fn test_mysql_offset_only_uses_max_rows() {
    let spec = QuerySpec::new()
        .select(qualified("e", "id"))
        .from(table("entity", "e"))
        .fetch(FetchClause {
            offset: Some(int(5)),
            fetch: None,
        });
    assert_eq!(
        sql(DialectKind::MySql, spec),
        "select e.id from entity e limit 18446744073709551615 offset 5"
    );
}

#[test]
fn test_select_item_reference_strategies() {
    let spec = entity()
        .group_by(select_ref(2))
        .order_by(SortSpecification::desc(select_ref(2)));
    let statement = Statement::from(spec);

    let position = dialect_with(DialectKind::Postgres, |_| {});
    let alias = dialect_with(DialectKind::Postgres, |caps| {
        caps.select_item_reference_strategy = SelectItemReferenceStrategy::Alias;
    });
    let expression = dialect_with(DialectKind::Postgres, |caps| {
        caps.select_item_reference_strategy = SelectItemReferenceStrategy::Expression;
    });

    let render_with = |dialect| SqlAstTranslator::new(dialect).translate(&statement).unwrap().sql;
    assert_eq!(
        render_with(&position),
        "select e.id,e.name as n from entity e group by 2 order by 2 desc"
    );
    assert_eq!(
        render_with(&alias),
        "select e.id,e.name as n from entity e group by n order by n desc"
    );
    assert_eq!(
        render_with(&expression),
        "select e.id,e.name as n from entity e group by e.name order by e.name desc"
    );
}

#[test]
fn test_alias_strategy_falls_back_to_expression() {
    let dialect = dialect_with(DialectKind::Postgres, |caps| {
        caps.select_item_reference_strategy = SelectItemReferenceStrategy::Alias;
    });
    let statement = Statement::from(entity().order_by(SortSpecification::asc(select_ref(1))));
    let operation = SqlAstTranslator::new(&dialect).translate(&statement).unwrap();
    assert_eq!(operation.sql, "select e.id,e.name as n from entity e order by e.id");
}

#[test]
fn test_select_item_reference_outside_order_renders_expression() {
    let spec = entity().filter(eq(select_ref(1), int(3)));
    assert_eq!(
        sql(DialectKind::Postgres, spec),
        "select e.id,e.name as n from entity e where e.id = 3"
    );
}

#[test]
fn test_select_item_reference_out_of_range() {
    let spec = entity().order_by(SortSpecification::asc(select_ref(3)));
    assert!(matches!(
        render(DialectKind::Postgres, spec),
        Err(RenderError::QueryDefinition(_))
    ));
}

#[test]
fn test_typed_parameter_in_select_on_derby() {
    let spec = QuerySpec::new()
        .select(typed_param("p", "integer"))
        .from(table("entity", "e"))
        .filter(eq(qualified("e", "n"), typed_param("q", "integer")));
    assert_eq!(
        sql(DialectKind::Derby, spec.clone()),
        "select cast(? as integer) from entity e where e.n = ?"
    );
    assert_eq!(
        sql(DialectKind::Postgres, spec),
        "select ? from entity e where e.n = ?"
    );
}

#[test]
fn test_native_nulls_precedence() {
    let spec = entity().order_by(SortSpecification::asc(qualified("e", "name")).nulls(NullPrecedence::Last));
    assert_eq!(
        sql(DialectKind::Postgres, spec),
        "select e.id,e.name as n from entity e order by e.name nulls last"
    );
}

#[test]
fn test_emulated_nulls_precedence() {
    let spec = entity()
        .order_by(SortSpecification::asc(qualified("e", "name")).nulls(NullPrecedence::Last))
        .order_by(SortSpecification::desc(select_ref(2)).nulls(NullPrecedence::First));
    assert_eq!(
        sql(DialectKind::MySql, spec),
        "select e.id,e.name as n from entity e order by \
         case when e.name is null then 1 else 0 end,e.name,\
         case when e.name is null then 0 else 1 end,2 desc"
    );
}

#[test]
fn test_quantified_subquery() {
    let subquery = QuerySpec::new().select(qualified("o", "n")).from(table("other", "o"));
    let spec = QuerySpec::new()
        .select(qualified("e", "id"))
        .from(table("entity", "e"))
        .filter(Predicate::Quantified {
            left: qualified("e", "n"),
            op: ComparisonOperator::Gt,
            quantifier: Quantifier::All,
            subquery: Box::new(QueryPart::Spec(subquery)),
        });
    assert_eq!(
        sql(DialectKind::Postgres, spec.clone()),
        "select e.id from entity e where e.n > all (select o.n from other o)"
    );

    let err = render(DialectKind::SingleStore, spec).unwrap_err();
    assert!(matches!(err, RenderError::CapabilityMismatch { .. }));
    assert_eq!(
        err.to_string(),
        "Dialect singlestore does not support the all quantifier over subqueries"
    );
}

#[test]
fn test_case_insensitive_like() {
    let spec = QuerySpec::new()
        .select(qualified("e", "id"))
        .from(table("entity", "e"))
        .filter(Predicate::Like {
            expression: qualified("e", "name"),
            pattern: param("pattern"),
            escape: Some('!'),
            negated: false,
            case_insensitive: true,
        });
    assert_eq!(
        sql(DialectKind::Postgres, spec.clone()),
        "select e.id from entity e where e.name ilike ? escape '!'"
    );
    assert_eq!(
        sql(DialectKind::MySql, spec),
        "select e.id from entity e where lower(e.name) like lower(?) escape '!'"
    );
}

#[test]
fn test_junctions_and_empty_lists() {
    let spec = QuerySpec::new()
        .select(qualified("e", "id"))
        .from(table("entity", "e"))
        .filter(Predicate::and(vec![
            eq(qualified("e", "a"), int(1)),
            Predicate::or(vec![
                eq(qualified("e", "b"), int(2)),
                Predicate::InList {
                    expression: qualified("e", "c"),
                    list: vec![],
                    negated: false,
                },
            ]),
        ]));
    assert_eq!(
        sql(DialectKind::Ansi, spec),
        "select e.id from entity e where e.a = 1 and (e.b = 2 or 1=0)"
    );
}

#[test]
fn test_identifier_quoting_per_dialect() {
    let spec = QuerySpec::new()
        .select(qualified("e", "order"))
        .from(table("entity", "e"))
        .filter(eq(qualified("e", "active"), boolean(true)));
    assert_eq!(
        sql(DialectKind::MySql, spec.clone()),
        "select e.`order` from entity e where e.active = 1"
    );
    assert_eq!(
        sql(DialectKind::Postgres, spec),
        "select e.\"order\" from entity e where e.active = true"
    );
}

#[test]
fn test_case_cast_and_arithmetic() {
    let spec = QuerySpec::new()
        .select(Expression::Case {
            when_clauses: vec![crate::ast::CaseWhen {
                condition: is_null(qualified("e", "n")),
                result: int(0),
            }],
            otherwise: Some(Box::new(binary(
                qualified("e", "n"),
                crate::ast::BinaryOp::Mul,
                binary(int(2), crate::ast::BinaryOp::Add, int(1)),
            ))),
        })
        .select(cast(qualified("e", "n"), "varchar(10)"))
        .from(table("entity", "e"));
    assert_eq!(
        sql(DialectKind::Ansi, spec),
        "select case when e.n is null then 0 else e.n * (2 + 1) end,cast(e.n as varchar(10)) from entity e"
    );
}

#[test]
fn test_unary_minus_never_emits_double_dash() {
    let spec = QuerySpec::new()
        .select(Expression::Negated(Box::new(Expression::Negated(Box::new(qualified("e", "x"))))))
        .select(Expression::Negated(Box::new(int(-5))))
        .select(Expression::Negated(Box::new(binary(
            qualified("e", "x"),
            crate::ast::BinaryOp::Sub,
            int(1),
        ))))
        .select(Expression::Negated(Box::new(int(5))))
        .from(table("entity", "e"));
    let rendered = sql(DialectKind::Postgres, spec);
    assert_eq!(rendered, "select -(-e.x),-(-5),-(e.x - 1),-5 from entity e");
    assert!(!rendered.contains("--"));
}

#[test]
fn test_aggregates_and_having() {
    let spec = QuerySpec::new()
        .select(qualified("e", "kind"))
        .select(Expression::Function(func("count", vec![star()])))
        .from(table("entity", "e"))
        .group_by(qualified("e", "kind"))
        .having(gt(Expression::Function(func("count", vec![star()])), int(1)));
    assert_eq!(
        sql(DialectKind::Postgres, spec),
        "select e.kind,count(*) from entity e group by e.kind having count(*) > 1"
    );
}

#[test]
fn test_unknown_function_and_arity() {
    let unknown = QuerySpec::new()
        .select(Expression::Function(func("json_arrayagg", vec![arg(qualified("e", "v"))])))
        .from(table("entity", "e"));
    let err = render(DialectKind::Derby, unknown).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Function 'json_arrayagg' is not registered for dialect derby"
    );

    let arity = QuerySpec::new()
        .select(Expression::Function(func("upper", vec![])))
        .from(table("entity", "e"));
    assert!(matches!(
        render(DialectKind::Postgres, arity),
        Err(RenderError::ArgumentCount { actual: 0, .. })
    ));
}

#[test]
fn test_empty_select_list_is_rejected() {
    assert!(matches!(
        render(DialectKind::Ansi, QuerySpec::new().from(table("entity", "e"))),
        Err(RenderError::QueryDefinition(_))
    ));
}
