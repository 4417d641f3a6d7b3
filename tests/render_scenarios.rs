use pretty_assertions::assert_eq;
use sqlrender::ast::builders::*;
use sqlrender::prelude::*;

fn json_arrayagg_query() -> Statement {
    QuerySpec::new()
        .select(func("json_arrayagg", vec![arg(qualified("c", "val"))]))
        .from(table("item", "c"))
        .into()
}

fn json_array_insert_update(path: Expression) -> Statement {
    UpdateStatement {
        target: TableReference::aliased("entity", "e"),
        assignments: vec![Assignment {
            column: ColumnReference::new("doc"),
            value: func(
                "json_array_insert",
                vec![arg(qualified("e", "doc")), arg(path), arg(param("value"))],
            )
            .into(),
        }],
        where_clause: Some(eq(qualified("e", "id"), param("id"))),
    }
    .into()
}

#[test]
fn test_json_arrayagg_across_dialects() {
    let statement = json_arrayagg_query();

    let mysql = Dialect::new(DialectKind::MySql);
    assert_eq!(
        sqlrender::translate(&statement, &mysql).unwrap().sql,
        "select cast(concat('[',group_concat(nullif(json_extract(json_array(c.val),'$[0]'),cast('null' as json))),']') as json) from item c"
    );

    let pg = Dialect::new(DialectKind::Postgres);
    assert_eq!(
        sqlrender::translate(&statement, &pg).unwrap().sql,
        "select json_arrayagg(c.val) from item c"
    );

    let singlestore = Dialect::new(DialectKind::SingleStore);
    assert_eq!(
        sqlrender::translate(&statement, &singlestore).unwrap().sql,
        "select json_agg(c.val) from item c"
    );

    let derby = Dialect::new(DialectKind::Derby);
    let err = sqlrender::translate(&statement, &derby).unwrap_err();
    assert!(matches!(err, RenderError::UnknownFunction { .. }));
}

#[test]
fn test_json_array_insert_on_singlestore() {
    let statement = json_array_insert_update(text("$.a[2]"));
    let dialect = Dialect::new(DialectKind::SingleStore);
    let operation = sqlrender::translate(&statement, &dialect).unwrap();
    assert_eq!(
        operation.sql,
        "update entity e set doc=case when json_get_type(json_extract_json(e.doc,'a')) = 'array' THEN \
         json_set_json(e.doc,'a', json_splice_json(json_extract_json(e.doc,'a'), 2, 0, to_json(?))) \
         else e.doc END where e.id = ?"
    );
    let labels: Vec<_> = operation
        .parameters
        .iter()
        .filter_map(|p| p.label.as_deref())
        .collect();
    assert_eq!(labels, vec!["value", "id"]);
}

#[test]
fn test_json_array_insert_path_from_bindings() {
    let statement = json_array_insert_update(param("path"));
    let dialect = Dialect::new(DialectKind::SingleStore);
    let mut bindings = ParameterBindings::new();
    bindings.insert("path".to_string(), Literal::parse_loose("$.tags[0]"));

    let operation = SqlAstTranslator::new(&dialect)
        .with_bindings(&bindings)
        .translate(&statement)
        .unwrap();
    assert!(
        operation.sql.contains("json_splice_json(json_extract_json(e.doc,'tags'), 0, 0, to_json(?))"),
        "{}",
        operation.sql
    );
}

#[test]
fn test_rejected_paths_leave_translator_reusable() {
    let dialect = Dialect::new(DialectKind::SingleStore);
    let bad = json_array_insert_update(text("$.a.b"));
    let ordered_agg: Statement = QuerySpec::new()
        .select(
            func("json_arrayagg", vec![arg(qualified("c", "val"))])
                .within_group(vec![SortSpecification::asc(qualified("c", "id"))]),
        )
        .from(table("item", "c"))
        .into();
    let plain: Statement = QuerySpec::new()
        .select(qualified("e", "id"))
        .from(table("entity", "e"))
        .into();

    let mut translator = SqlAstTranslator::new(&dialect);
    let err = translator.translate(&bad).unwrap_err();
    assert_eq!(
        err.to_string(),
        "SingleStore json_array_insert function last path parameter must be an array index element"
    );
    assert!(translator.clause_stack().is_empty());

    assert!(translator.translate(&ordered_agg).is_err());
    assert!(translator.clause_stack().is_empty());

    let operation = translator.translate(&plain).unwrap();
    assert_eq!(operation.sql, "select e.id from entity e");
}

#[test]
fn test_statement_from_json() {
    let statement: Statement = serde_json::from_str(
        r#"{
            "select": {
                "query_part": {
                    "spec": {
                        "selections": [
                            {"expression": {"column": {"qualifier": "e", "column": "id"}}},
                            {"expression": {"column": {"qualifier": "e", "column": "name"}}, "alias": "n"}
                        ],
                        "from": [{"table": {"name": "entity", "alias": "e"}}],
                        "where_clause": {
                            "comparison": {
                                "left": {"column": {"qualifier": "e", "column": "id"}},
                                "op": "gt",
                                "right": {"literal": {"type": "integer", "value": 5}}
                            }
                        },
                        "fetch": {"fetch": {"parameter": {"label": "max"}}}
                    }
                }
            }
        }"#,
    )
    .unwrap();

    let pg = Dialect::new(DialectKind::Postgres);
    let operation = sqlrender::translate(&statement, &pg).unwrap();
    assert_eq!(
        operation.sql,
        "select e.id,e.name as n from entity e where e.id > 5 limit ?"
    );
    assert_eq!(operation.parameters, vec![JdbcParameter::named("max")]);

    let serialized = serde_json::to_value(&operation).unwrap();
    assert_eq!(serialized["sql"], operation.sql.as_str());
    assert_eq!(serialized["parameters"][0]["label"], "max");
}

#[test]
fn test_config_drives_dialect() {
    let config = RenderConfig::from_toml_str(
        r#"
        dialect = "postgres"

        [capabilities]
        supports_union_with_limit = false
        "#,
    )
    .unwrap();
    let dialect = config.build_dialect();

    let group: Statement = QueryGroup::new(
        SetOperator::Union,
        vec![
            QuerySpec::new().select(qualified("a", "id")).from(table("a", "a")).into(),
            QuerySpec::new().select(qualified("b", "id")).from(table("b", "b")).into(),
        ],
    )
    .fetch(FetchClause::first(int(3)))
    .into();

    let err = sqlrender::translate(&group, &dialect).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Dialect postgres does not support union combined with a row limit"
    );
}
