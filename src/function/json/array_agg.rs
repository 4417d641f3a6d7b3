//! `json_arrayagg` renderers.

use crate::ast::{Expression, FunctionCall, JsonNullBehavior, SqlAstNode};
use crate::error::{RenderError, RenderResult};
use crate::function::{
    argument, json_null_behavior, render_case_filtered, render_filter_clause, render_ordering,
    Arity, FunctionRenderer,
};
use crate::translator::{SqlAppender, SqlAstTranslator};

const FILTER_WITH_NULL_ON_NULL: &str =
    "Can't emulate json_arrayagg filter clause when using 'null on null' clause.";

/// Split the aggregated argument into its distinct flag and value.
fn aggregated_value(call: &FunctionCall) -> RenderResult<(bool, &Expression)> {
    match argument(call, 0)? {
        SqlAstNode::Distinct(expression) => Ok((true, expression)),
        SqlAstNode::Expression(expression) => Ok((false, expression)),
        other => Err(RenderError::definition(format!(
            "json_arrayagg expects a value expression, got {:?}",
            other
        ))),
    }
}

/// Standard `json_arrayagg([distinct] v [order by ..] [null on null])`.
///
/// Without native filter support a filter becomes a case wrapper around the
/// value, relying on `absent on null` to drop filtered rows.
#[derive(Debug, Clone)]
pub struct JsonArrayAggFunction {
    native_filter: bool,
}

impl JsonArrayAggFunction {
    pub fn new(native_filter: bool) -> Self {
        Self { native_filter }
    }
}

impl FunctionRenderer for JsonArrayAggFunction {
    fn arity(&self) -> Arity {
        Arity::between(1, 2)
    }

    fn render<'a>(
        &self,
        call: &'a FunctionCall,
        translator: &mut SqlAstTranslator<'a>,
    ) -> RenderResult<()> {
        let null_behavior = json_null_behavior(call).unwrap_or_default();
        let emulated_filter = call.filter.as_deref().filter(|_| !self.native_filter);
        if emulated_filter.is_some() && null_behavior == JsonNullBehavior::Null {
            return Err(RenderError::UnsupportedEmulation(FILTER_WITH_NULL_ON_NULL.to_string()));
        }
        let (distinct, value) = aggregated_value(call)?;

        translator.append_sql("json_arrayagg(");
        if distinct {
            translator.append_sql("distinct ");
        }
        match emulated_filter {
            Some(filter) => {
                render_case_filtered(filter, translator, |t| t.render_expression(value))?
            }
            None => translator.render_expression(value)?,
        }
        if !call.within_group.is_empty() {
            translator.append_char(' ');
            render_ordering(&call.within_group, translator)?;
        }
        if null_behavior == JsonNullBehavior::Null {
            translator.append_sql(" null on null");
        }
        translator.append_char(')');
        if let (Some(filter), true) = (call.filter.as_deref(), self.native_filter) {
            render_filter_clause(filter, translator)?;
        }
        Ok(())
    }
}

/// `json_arrayagg` for MySQL-family databases that only have `group_concat`.
///
/// Each value is turned into a JSON scalar by wrapping it in a one-element
/// array and extracting element 0. The scalars are joined by `group_concat`,
/// bracketed, and cast back to JSON.
///
/// `group_concat` drops SQL NULLs, so:
/// - `absent on null`: a JSON null scalar is collapsed back to SQL NULL with
///   `nullif` and dropped.
/// - `null on null`: the JSON null scalar is kept and ends up as a `null`
///   entry.
///
/// A filter is a case wrapper yielding SQL NULL for filtered rows, which only
/// works when NULLs are dropped; combining it with `null on null` fails.
#[derive(Debug, Clone, Default)]
pub struct MySqlJsonArrayAggFunction;

impl MySqlJsonArrayAggFunction {
    pub fn new() -> Self {
        Self
    }

    fn render_argument<'a>(
        &self,
        value: &'a Expression,
        null_behavior: JsonNullBehavior,
        translator: &mut SqlAstTranslator<'a>,
    ) -> RenderResult<()> {
        let collapse_null = null_behavior != JsonNullBehavior::Null;
        if collapse_null {
            translator.append_sql("nullif(");
        }
        translator.append_sql("json_extract(json_array(");
        translator.render_expression(value)?;
        translator.append_sql("),'$[0]')");
        if collapse_null {
            translator.append_sql(",cast('null' as json))");
        }
        Ok(())
    }
}

impl FunctionRenderer for MySqlJsonArrayAggFunction {
    fn arity(&self) -> Arity {
        Arity::between(1, 2)
    }

    fn render<'a>(
        &self,
        call: &'a FunctionCall,
        translator: &mut SqlAstTranslator<'a>,
    ) -> RenderResult<()> {
        let null_behavior = json_null_behavior(call).unwrap_or_default();
        if call.filter.is_some() && null_behavior != JsonNullBehavior::Absent {
            return Err(RenderError::UnsupportedEmulation(FILTER_WITH_NULL_ON_NULL.to_string()));
        }
        let (distinct, value) = aggregated_value(call)?;

        translator.append_sql("cast(concat('[',group_concat(");
        if distinct {
            translator.append_sql("distinct ");
        }
        match call.filter.as_deref() {
            Some(filter) => render_case_filtered(filter, translator, |t| {
                self.render_argument(value, null_behavior, t)
            })?,
            None => self.render_argument(value, null_behavior, translator)?,
        }
        if !call.within_group.is_empty() {
            translator.append_char(' ');
            render_ordering(&call.within_group, translator)?;
        }
        translator.append_sql("),']') as json)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::builders::*;
    use crate::ast::SortSpecification;
    use crate::dialect::{Dialect, DialectKind};

    fn render(kind: DialectKind, call: FunctionCall) -> RenderResult<String> {
        let dialect = Dialect::new(kind);
        let expression = Expression::Function(call);
        let mut translator = SqlAstTranslator::new(&dialect);
        translator.render_standalone(&expression)
    }

    #[test]
    fn test_mysql_default_absent_on_null() {
        let call = func("json_arrayagg", vec![arg(qualified("c", "val"))]);
        assert_eq!(
            render(DialectKind::MySql, call).unwrap(),
            "cast(concat('[',group_concat(nullif(json_extract(json_array(c.val),'$[0]'),cast('null' as json))),']') as json)"
        );
    }

    #[test]
    fn test_mysql_null_on_null_keeps_json_null() {
        // No nullif: a SQL NULL becomes the JSON scalar null, which group_concat keeps.
        let call = func(
            "json_arrayagg",
            vec![arg(qualified("c", "val")), json_null(JsonNullBehavior::Null)],
        );
        assert_eq!(
            render(DialectKind::MySql, call).unwrap(),
            "cast(concat('[',group_concat(json_extract(json_array(c.val),'$[0]')),']') as json)"
        );
    }

    #[test]
    fn test_mysql_distinct_filter_and_order() {
        let call = func("json_arrayagg", vec![distinct(qualified("c", "val"))])
            .filter(gt(qualified("c", "id"), int(5)))
            .within_group(vec![SortSpecification::desc(qualified("c", "id"))]);
        assert_eq!(
            render(DialectKind::MySql, call).unwrap(),
            "cast(concat('[',group_concat(distinct case when c.id > 5 then nullif(json_extract(json_array(c.val),'$[0]'),cast('null' as json)) else null end order by c.id desc),']') as json)"
        );
    }

    #[test]
    fn test_mysql_filter_with_null_on_null_fails() {
        let call = func(
            "json_arrayagg",
            vec![arg(qualified("c", "val")), json_null(JsonNullBehavior::Null)],
        )
        .filter(gt(qualified("c", "id"), int(5)));
        let err = render(DialectKind::MySql, call).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedEmulation(_)));
        assert_eq!(err.to_string(), FILTER_WITH_NULL_ON_NULL);
    }

    #[test]
    fn test_standard_native_filter() {
        let call = func(
            "json_arrayagg",
            vec![arg(qualified("c", "val")), json_null(JsonNullBehavior::Null)],
        )
        .filter(is_not_null(qualified("c", "id")));
        assert_eq!(
            render(DialectKind::Postgres, call).unwrap(),
            "json_arrayagg(c.val null on null) filter (where c.id is not null)"
        );
    }

    #[test]
    fn test_standard_emulated_filter_and_conflict() {
        let filtered = func("json_arrayagg", vec![arg(qualified("c", "val"))])
            .filter(eq(qualified("c", "k"), int(1)));
        let dialect = Dialect::with_capabilities(DialectKind::Ansi, {
            let mut caps = DialectKind::Ansi.profile().capabilities();
            caps.supports_aggregate_filter = false;
            caps
        });
        let expression = Expression::Function(filtered);
        let mut translator = SqlAstTranslator::new(&dialect);
        assert_eq!(
            translator.render_standalone(&expression).unwrap(),
            "json_arrayagg(case when c.k = 1 then c.val else null end)"
        );

        let conflicting = Expression::Function(
            func(
                "json_arrayagg",
                vec![arg(qualified("c", "val")), json_null(JsonNullBehavior::Null)],
            )
            .filter(eq(qualified("c", "k"), int(1))),
        );
        let mut translator = SqlAstTranslator::new(&dialect);
        assert!(matches!(
            translator.render_standalone(&conflicting),
            Err(RenderError::UnsupportedEmulation(_))
        ));
        assert!(translator.clause_stack().is_empty());
    }
}
