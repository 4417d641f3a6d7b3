//! `json_array_insert(document, path, value)` renderers.

use crate::ast::FunctionCall;
use crate::error::{RenderError, RenderResult};
use crate::function::json::path_argument;
use crate::function::{argument, expression_argument, reject_aggregate_clauses, Arity, FunctionRenderer};
use crate::json_path::JsonPathElement;
use crate::translator::{SqlAppender, SqlAstTranslator};

/// Native `json_array_insert(doc,path,value)` (MySQL, ANSI).
#[derive(Debug, Clone, Default)]
pub struct JsonArrayInsertFunction;

impl JsonArrayInsertFunction {
    pub fn new() -> Self {
        Self
    }
}

impl FunctionRenderer for JsonArrayInsertFunction {
    fn arity(&self) -> Arity {
        Arity::exactly(3)
    }

    fn render<'a>(
        &self,
        call: &'a FunctionCall,
        translator: &mut SqlAstTranslator<'a>,
    ) -> RenderResult<()> {
        reject_aggregate_clauses(call)?;
        translator.append_sql("json_array_insert(");
        translator.render_expression(expression_argument(call, 0)?)?;
        translator.append_char(',');
        translator.render_expression(expression_argument(call, 1)?)?;
        translator.append_char(',');
        translator.render_node(argument(call, 2)?)?;
        translator.append_char(')');
        Ok(())
    }
}

/// PostgreSQL `jsonb_insert(doc,'{a,2}',to_jsonb(value))`.
///
/// The path becomes a text array literal. Parameter index elements are
/// resolved from the bound parameter values.
#[derive(Debug, Clone, Default)]
pub struct PostgresJsonArrayInsertFunction;

impl PostgresJsonArrayInsertFunction {
    pub fn new() -> Self {
        Self
    }

    fn text_array_path<'a>(
        &self,
        path: &str,
        elements: &[JsonPathElement],
        translator: &SqlAstTranslator<'a>,
    ) -> RenderResult<String> {
        if !elements.last().is_some_and(JsonPathElement::is_index)
            && !matches!(elements.last(), Some(JsonPathElement::ParameterIndexAccess(_)))
        {
            return Err(RenderError::json_path(
                path,
                "PostgreSQL json_array_insert function last path parameter must be an array index element",
            ));
        }
        let mut parts = Vec::with_capacity(elements.len());
        for element in elements {
            match element {
                JsonPathElement::Attribute(name) => {
                    if name.chars().all(|c| c.is_alphanumeric() || c == '_') && !name.is_empty() {
                        parts.push(name.clone());
                    } else {
                        parts.push(format!(
                            "\"{}\"",
                            name.replace('\\', "\\\\").replace('"', "\\\"")
                        ));
                    }
                }
                JsonPathElement::IndexAccess(index) => parts.push(index.to_string()),
                JsonPathElement::ParameterIndexAccess(name) => {
                    let index = translator
                        .binding(name)
                        .and_then(|literal| literal.as_i64())
                        .ok_or_else(|| RenderError::JsonPathParameterNotPassed {
                            path: path.to_string(),
                            parameter: name.clone(),
                        })?;
                    parts.push(index.to_string());
                }
            }
        }
        Ok(format!("{{{}}}", parts.join(",")))
    }
}

impl FunctionRenderer for PostgresJsonArrayInsertFunction {
    fn arity(&self) -> Arity {
        Arity::exactly(3)
    }

    fn render<'a>(
        &self,
        call: &'a FunctionCall,
        translator: &mut SqlAstTranslator<'a>,
    ) -> RenderResult<()> {
        reject_aggregate_clauses(call)?;
        let document = expression_argument(call, 0)?;
        let value = argument(call, 2)?;
        let (path, elements) = path_argument(call, 1, translator)?;
        let text_path = self.text_array_path(&path, &elements, translator)?;

        translator.append_sql("jsonb_insert(");
        translator.render_expression(document)?;
        translator.append_char(',');
        translator.append_single_quote_escaped_string(&text_path);
        translator.append_sql(",to_jsonb(");
        translator.render_node(value)?;
        translator.append_sql("))");
        Ok(())
    }
}

/// SingleStore emulation built from `json_get_type`, `json_extract_json`,
/// `json_splice_json` and `json_set_json`.
///
/// ```text
/// case when json_get_type(json_extract_json(doc,<parent>)) = 'array'
///   THEN json_set_json(doc,<parent>, json_splice_json(json_extract_json(doc,<parent>), i, 0, to_json(v)))
///   else doc END
/// ```
///
/// `json_set_json` is only needed when the target array is nested, i.e. the
/// path has more than one element.
#[derive(Debug, Clone, Default)]
pub struct SingleStoreJsonArrayInsertFunction;

impl SingleStoreJsonArrayInsertFunction {
    pub fn new() -> Self {
        Self
    }
}

/// Index of the insert position: the last path element, which must be a
/// literal array index.
pub(crate) fn array_index(path: &str, elements: &[JsonPathElement]) -> RenderResult<i32> {
    match elements.last() {
        None => Err(RenderError::json_path(
            path,
            "SingleStore json_array_insert function requires at least one json path element",
        )),
        Some(JsonPathElement::IndexAccess(index)) => Ok(*index),
        Some(_) => Err(RenderError::json_path(
            path,
            "SingleStore json_array_insert function last path parameter must be an array index element",
        )),
    }
}

/// Key arguments addressing the parent of the insert position, each prefixed
/// with a comma: `,'a','2'`.
pub(crate) fn parent_path_arguments(path: &str, elements: &[JsonPathElement]) -> RenderResult<String> {
    let mut sql = String::new();
    let parent = &elements[..elements.len().saturating_sub(1)];
    for element in parent {
        sql.append_char(',');
        match element {
            JsonPathElement::Attribute(name) => sql.append_single_quote_escaped_string(name),
            JsonPathElement::IndexAccess(index) => {
                sql.append_char('\'');
                sql.append_int(i64::from(*index));
                sql.append_char('\'');
            }
            JsonPathElement::ParameterIndexAccess(parameter) => {
                return Err(RenderError::JsonPathParameterNotPassed {
                    path: path.to_string(),
                    parameter: parameter.clone(),
                });
            }
        }
    }
    Ok(sql)
}

impl FunctionRenderer for SingleStoreJsonArrayInsertFunction {
    fn arity(&self) -> Arity {
        Arity::exactly(3)
    }

    fn render<'a>(
        &self,
        call: &'a FunctionCall,
        translator: &mut SqlAstTranslator<'a>,
    ) -> RenderResult<()> {
        reject_aggregate_clauses(call)?;
        let document = expression_argument(call, 0)?;
        let value = argument(call, 2)?;
        let (path, elements) = path_argument(call, 1, translator)?;
        // Validate the whole path before emitting anything.
        let index = array_index(&path, &elements)?;
        let parent = parent_path_arguments(&path, &elements)?;
        let nested = elements.len() > 1;

        translator.append_sql("case when json_get_type(json_extract_json(");
        translator.render_expression(document)?;
        translator.append_sql(&parent);
        translator.append_sql(")) = 'array' THEN ");
        if nested {
            translator.append_sql("json_set_json(");
            translator.render_expression(document)?;
            translator.append_sql(&parent);
            translator.append_sql(", ");
        }
        translator.append_sql("json_splice_json(json_extract_json(");
        translator.render_expression(document)?;
        translator.append_sql(&parent);
        translator.append_sql("), ");
        translator.append_int(i64::from(index));
        translator.append_sql(", 0, to_json(");
        translator.render_node(value)?;
        translator.append_sql("))");
        if nested {
            translator.append_char(')');
        }
        translator.append_sql(" else ");
        translator.render_expression(document)?;
        translator.append_sql(" END");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::builders::*;
    use crate::ast::{Expression, Literal, ParameterBindings};
    use crate::dialect::{Dialect, DialectKind};
    use crate::json_path::parse_json_path_elements;

    fn insert_call(path: Expression) -> FunctionCall {
        func(
            "json_array_insert",
            vec![arg(qualified("e", "doc")), arg(path), arg(param("v"))],
        )
    }

    fn render(kind: DialectKind, call: FunctionCall) -> RenderResult<String> {
        let dialect = Dialect::new(kind);
        let expression = Expression::Function(call);
        let mut translator = SqlAstTranslator::new(&dialect);
        translator.render_standalone(&expression)
    }

    #[test]
    fn test_singlestore_nested_path() {
        let sql = render(DialectKind::SingleStore, insert_call(text("$.a[2]"))).unwrap();
        assert_eq!(
            sql,
            "case when json_get_type(json_extract_json(e.doc,'a')) = 'array' THEN \
             json_set_json(e.doc,'a', json_splice_json(json_extract_json(e.doc,'a'), 2, 0, to_json(?))) \
             else e.doc END"
        );
    }

    #[test]
    fn test_singlestore_single_element_path_writes_directly() {
        let sql = render(DialectKind::SingleStore, insert_call(text("$[0]"))).unwrap();
        assert_eq!(
            sql,
            "case when json_get_type(json_extract_json(e.doc)) = 'array' THEN \
             json_splice_json(json_extract_json(e.doc), 0, 0, to_json(?)) else e.doc END"
        );
    }

    #[test]
    fn test_singlestore_index_in_parent_path_is_quoted() {
        let sql = render(DialectKind::SingleStore, insert_call(text("$.a[1].b[3]"))).unwrap();
        assert!(sql.starts_with("case when json_get_type(json_extract_json(e.doc,'a','1','b'))"), "{}", sql);
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let err = array_index("$", &[]).unwrap_err();
        assert!(err.to_string().contains("requires at least one json path element"));
        let err = render(DialectKind::SingleStore, insert_call(text("$"))).unwrap_err();
        assert!(err.to_string().contains("requires at least one json path element"));
    }

    #[test]
    fn test_last_element_must_be_index() {
        for path in ["$.a", "$[1].b", "$.a[$i]"] {
            let elements = parse_json_path_elements(path).unwrap();
            let err = array_index(path, &elements).unwrap_err();
            assert_eq!(
                err.to_string(),
                "SingleStore json_array_insert function last path parameter must be an array index element"
            );
        }
    }

    #[test]
    fn test_failure_emits_no_sql() {
        let dialect = Dialect::new(DialectKind::SingleStore);
        let expression = Expression::Function(insert_call(text("$.a.b")));
        let mut translator = SqlAstTranslator::new(&dialect);
        assert!(translator.render_standalone(&expression).is_err());
        assert_eq!(translator.sql(), "");
    }

    #[test]
    fn test_parameter_in_parent_path_is_rejected() {
        let err = render(DialectKind::SingleStore, insert_call(text("$.a[$p][0]"))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "JSON path [$.a[$p][0]] uses parameter [p] that is not passed"
        );
    }

    #[test]
    fn test_path_from_bound_parameter() {
        let dialect = Dialect::new(DialectKind::SingleStore);
        let mut bindings = ParameterBindings::new();
        bindings.insert("path".to_string(), Literal::String("$.tags[0]".to_string()));
        let expression = Expression::Function(insert_call(param("path")));
        let mut translator = SqlAstTranslator::new(&dialect).with_bindings(&bindings);
        let sql = translator.render_standalone(&expression).unwrap();
        assert!(sql.contains("json_extract_json(e.doc,'tags')"), "{}", sql);
    }

    #[test]
    fn test_unbound_path_is_not_a_literal() {
        let err = render(DialectKind::SingleStore, insert_call(param("path"))).unwrap_err();
        assert!(matches!(err, RenderError::NotALiteral(_)));
    }

    #[test]
    fn test_postgres_jsonb_insert() {
        assert_eq!(
            render(DialectKind::Postgres, insert_call(text("$.a.\"b c\"[2]"))).unwrap(),
            "jsonb_insert(e.doc,'{a,\"b c\",2}',to_jsonb(?))"
        );
    }

    #[test]
    fn test_postgres_parameter_index_from_bindings() {
        let dialect = Dialect::new(DialectKind::Postgres);
        let mut bindings = ParameterBindings::new();
        bindings.insert("i".to_string(), Literal::Integer(4));
        let expression = Expression::Function(insert_call(text("$.a[$i]")));
        let mut translator = SqlAstTranslator::new(&dialect).with_bindings(&bindings);
        assert_eq!(
            translator.render_standalone(&expression).unwrap(),
            "jsonb_insert(e.doc,'{a,4}',to_jsonb(?))"
        );
    }

    #[test]
    fn test_mysql_native() {
        assert_eq!(
            render(DialectKind::MySql, insert_call(text("$.a[2]"))).unwrap(),
            "json_array_insert(e.doc,'$.a[2]',?)"
        );
    }
}
