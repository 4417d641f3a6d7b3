//! Plain, aggregate and string-aggregation function renderers.

use crate::ast::{Expression, FunctionCall, SqlAstNode};
use crate::error::{RenderError, RenderResult};
use crate::function::{
    argument, expression_argument, reject_aggregate_clauses, render_arguments,
    render_case_filtered, render_filter_clause, render_ordering, Arity, FunctionRenderer,
};
use crate::translator::{SqlAppender, SqlAstTranslator};

/// `sql_name(args)`. Used both for identical names and for renames such as
/// `length` -> `char_length`.
#[derive(Debug, Clone)]
pub struct NamedFunction {
    sql_name: String,
    arity: Arity,
}

impl NamedFunction {
    pub fn new(sql_name: impl Into<String>, arity: Arity) -> Self {
        Self {
            sql_name: sql_name.into(),
            arity,
        }
    }
}

impl FunctionRenderer for NamedFunction {
    fn arity(&self) -> Arity {
        self.arity
    }

    fn render<'a>(
        &self,
        call: &'a FunctionCall,
        translator: &mut SqlAstTranslator<'a>,
    ) -> RenderResult<()> {
        reject_aggregate_clauses(call)?;
        translator.append_sql(&self.sql_name);
        translator.append_char('(');
        render_arguments(call, translator)?;
        translator.append_char(')');
        Ok(())
    }
}

/// A plain aggregate such as `count` or `sum`.
///
/// A filter is rendered natively as `filter (where ..)` or, when the dialect
/// lacks it, by wrapping each argument in `case when <filter> then <arg> else
/// null end`. `count(*)` with an emulated filter counts the constant `1`.
#[derive(Debug, Clone)]
pub struct AggregateFunction {
    sql_name: String,
    arity: Arity,
    native_filter: bool,
}

impl AggregateFunction {
    pub fn new(sql_name: impl Into<String>, arity: Arity, native_filter: bool) -> Self {
        Self {
            sql_name: sql_name.into(),
            arity,
            native_filter,
        }
    }
}

impl FunctionRenderer for AggregateFunction {
    fn arity(&self) -> Arity {
        self.arity
    }

    fn render<'a>(
        &self,
        call: &'a FunctionCall,
        translator: &mut SqlAstTranslator<'a>,
    ) -> RenderResult<()> {
        if !call.within_group.is_empty() {
            return Err(RenderError::definition(format!(
                "Aggregate '{}' does not accept a within group clause",
                call.name
            )));
        }
        translator.append_sql(&self.sql_name);
        translator.append_char('(');
        match call.filter.as_deref() {
            Some(filter) if !self.native_filter => {
                for (i, node) in call.arguments.iter().enumerate() {
                    if i > 0 {
                        translator.append_char(',');
                    }
                    match node {
                        SqlAstNode::Star => render_case_filtered(filter, translator, |t| {
                            t.append_char('1');
                            Ok(())
                        })?,
                        SqlAstNode::Distinct(expression) => {
                            translator.append_sql("distinct ");
                            render_case_filtered(filter, translator, |t| {
                                t.render_expression(expression)
                            })?;
                        }
                        SqlAstNode::Expression(expression) => {
                            render_case_filtered(filter, translator, |t| {
                                t.render_expression(expression)
                            })?;
                        }
                        SqlAstNode::JsonNullBehavior(_) => {
                            return Err(RenderError::definition(format!(
                                "Aggregate '{}' does not accept a null behavior clause",
                                call.name
                            )));
                        }
                    }
                }
                translator.append_char(')');
            }
            Some(filter) => {
                render_arguments(call, translator)?;
                translator.append_char(')');
                render_filter_clause(filter, translator)?;
            }
            None => {
                render_arguments(call, translator)?;
                translator.append_char(')');
            }
        }
        Ok(())
    }
}

/// Target syntax for `listagg(value, separator)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListaggStyle {
    /// `listagg(v,sep) within group (order by ..)`
    Standard,
    /// `string_agg(v,sep order by ..)`
    StringAgg,
    /// `group_concat(v order by .. separator 'sep')`
    GroupConcat,
}

/// Ordered string aggregation.
#[derive(Debug, Clone)]
pub struct ListaggFunction {
    style: ListaggStyle,
    native_filter: bool,
}

impl ListaggFunction {
    pub fn new(style: ListaggStyle, native_filter: bool) -> Self {
        Self {
            style,
            native_filter,
        }
    }

    fn emulates_filter(&self) -> bool {
        !self.native_filter || self.style == ListaggStyle::GroupConcat
    }

    fn render_value<'a>(
        &self,
        call: &'a FunctionCall,
        translator: &mut SqlAstTranslator<'a>,
    ) -> RenderResult<()> {
        let expression: &'a Expression = match argument(call, 0)? {
            SqlAstNode::Distinct(expression) => {
                translator.append_sql("distinct ");
                expression
            }
            SqlAstNode::Expression(expression) => expression,
            other => {
                return Err(RenderError::definition(format!(
                    "listagg expects a value expression, got {:?}",
                    other
                )));
            }
        };
        match call.filter.as_deref() {
            Some(filter) if self.emulates_filter() => {
                render_case_filtered(filter, translator, |t| t.render_expression(expression))
            }
            _ => translator.render_expression(expression),
        }
    }
}

impl FunctionRenderer for ListaggFunction {
    fn arity(&self) -> Arity {
        Arity::exactly(2)
    }

    fn render<'a>(
        &self,
        call: &'a FunctionCall,
        translator: &mut SqlAstTranslator<'a>,
    ) -> RenderResult<()> {
        let separator = expression_argument(call, 1)?;
        match self.style {
            ListaggStyle::Standard => {
                translator.append_sql("listagg(");
                self.render_value(call, translator)?;
                translator.append_char(',');
                translator.render_expression(separator)?;
                translator.append_char(')');
                if !call.within_group.is_empty() {
                    translator.append_sql(" within group (");
                    render_ordering(&call.within_group, translator)?;
                    translator.append_char(')');
                }
            }
            ListaggStyle::StringAgg => {
                translator.append_sql("string_agg(");
                self.render_value(call, translator)?;
                translator.append_char(',');
                translator.render_expression(separator)?;
                if !call.within_group.is_empty() {
                    translator.append_char(' ');
                    render_ordering(&call.within_group, translator)?;
                }
                translator.append_char(')');
            }
            ListaggStyle::GroupConcat => {
                // The separator is part of the syntax, not an expression.
                let literal = translator.literal_value(separator)?;
                let text = literal.as_str().ok_or_else(|| {
                    RenderError::NotALiteral("group_concat separator".to_string())
                })?;
                translator.append_sql("group_concat(");
                self.render_value(call, translator)?;
                if !call.within_group.is_empty() {
                    translator.append_char(' ');
                    render_ordering(&call.within_group, translator)?;
                }
                translator.append_sql(" separator ");
                translator.append_single_quote_escaped_string(text);
                translator.append_char(')');
            }
        }
        if let Some(filter) = call.filter.as_deref() {
            if !self.emulates_filter() {
                render_filter_clause(filter, translator)?;
            }
        }
        Ok(())
    }
}
