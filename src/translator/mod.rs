//! SQL AST to dialect SQL translation.
//!
//! [`SqlAstTranslator`] walks a statement depth-first in SQL syntax order,
//! emitting built-in syntax itself and delegating function calls to the
//! dialect's function renderers. While it walks, it keeps a [`ClauseStack`]
//! so that nested renderers can tell which clause they are in.

mod appender;
mod clause;
mod dml;
mod query;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::ast::{
    ColumnReference, Expression, JdbcParameter, JsonNullBehavior, JunctionKind, Literal,
    NullPrecedence, ParameterBindings, Predicate, QuerySpec, SortOrder, SortSpecification,
    SqlAstNode, SqlSelection, Statement,
};
use crate::dialect::{Dialect, SelectItemReferenceStrategy};
use crate::error::{RenderError, RenderResult};

pub use appender::SqlAppender;
pub use clause::{Clause, ClauseStack};

/// Tracing target for AST dumps and rendered SQL.
pub const SQL_AST_TREE_TARGET: &str = "sqlrender::sql_ast_tree";

/// The result of a translation: SQL text plus the bind parameters in
/// placeholder order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JdbcOperation {
    pub sql: String,
    pub parameters: Vec<JdbcParameter>,
}

/// Renders one statement at a time for a fixed dialect.
///
/// A translator is cheap to create and must not be shared between threads;
/// the [`Dialect`] it borrows can be.
pub struct SqlAstTranslator<'a> {
    dialect: &'a Dialect,
    bindings: Option<&'a ParameterBindings>,
    sql: String,
    parameters: Vec<JdbcParameter>,
    clause_stack: ClauseStack,
    /// Query specs being rendered, innermost last. Select item references
    /// resolve against the innermost.
    query_specs: Vec<&'a QuerySpec>,
}

impl<'a> SqlAstTranslator<'a> {
    pub fn new(dialect: &'a Dialect) -> Self {
        Self {
            dialect,
            bindings: None,
            sql: String::new(),
            parameters: Vec::new(),
            clause_stack: ClauseStack::new(),
            query_specs: Vec::new(),
        }
    }

    /// Values of named parameters, consulted where a render-time literal is
    /// required.
    pub fn with_bindings(mut self, bindings: &'a ParameterBindings) -> Self {
        self.bindings = Some(bindings);
        self
    }

    pub fn dialect(&self) -> &'a Dialect {
        self.dialect
    }

    pub fn clause_stack(&self) -> &ClauseStack {
        &self.clause_stack
    }

    pub fn current_clause(&self) -> Option<Clause> {
        self.clause_stack.current()
    }

    /// SQL emitted so far by the current translation.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binding(&self, name: &str) -> Option<&'a Literal> {
        self.bindings.and_then(|bindings| bindings.get(name))
    }

    /// Translate a statement into SQL and its ordered parameter list.
    pub fn translate(&mut self, statement: &'a Statement) -> RenderResult<JdbcOperation> {
        self.reset();
        tracing::trace!(
            target: SQL_AST_TREE_TARGET,
            kind = statement.kind(),
            tree = ?statement,
            "SQL AST tree"
        );

        let result = match statement {
            Statement::Select(select) => self.render_query_part(&select.query_part),
            Statement::Insert(insert) => self.render_insert(insert),
            Statement::Update(update) => self.render_update(update),
            Statement::Delete(delete) => self.render_delete(delete),
        };
        debug_assert!(
            self.clause_stack.is_empty(),
            "clause stack not empty after translation: {:?}",
            self.clause_stack
        );
        self.query_specs.clear();

        if let Err(e) = &result {
            tracing::debug!(
                target: SQL_AST_TREE_TARGET,
                dialect = %self.dialect.kind(),
                error = %e,
                "Translation failed"
            );
        }
        result?;

        let operation = JdbcOperation {
            sql: std::mem::take(&mut self.sql),
            parameters: std::mem::take(&mut self.parameters),
        };
        tracing::debug!(
            target: SQL_AST_TREE_TARGET,
            dialect = %self.dialect.kind(),
            parameters = operation.parameters.len(),
            sql = %operation.sql,
            "Rendered SQL"
        );
        Ok(operation)
    }

    /// Render a single expression outside of any statement. On failure the
    /// partial SQL stays available through [`sql`](Self::sql).
    pub fn render_standalone(&mut self, expression: &'a Expression) -> RenderResult<String> {
        self.reset();
        self.render_expression(expression)?;
        Ok(std::mem::take(&mut self.sql))
    }

    fn reset(&mut self) {
        if !self.clause_stack.is_empty() {
            tracing::warn!(
                depth = self.clause_stack.depth(),
                "Clause stack left non-empty by a previous translation, clearing"
            );
            self.clause_stack.clear();
        }
        self.sql.clear();
        self.parameters.clear();
        self.query_specs.clear();
    }

    /// Run `render` with `clause` pushed; the clause is popped whether or not
    /// `render` succeeds.
    pub fn with_clause<T, F>(&mut self, clause: Clause, render: F) -> RenderResult<T>
    where
        F: FnOnce(&mut Self) -> RenderResult<T>,
    {
        self.clause_stack.push(clause);
        let result = render(self);
        self.clause_stack.pop();
        result
    }

    /// The literal value of `expression` known at render time.
    pub fn literal_value(&self, expression: &Expression) -> RenderResult<Literal> {
        match expression {
            Expression::Literal(literal) => Ok(literal.clone()),
            Expression::Parameter(JdbcParameter {
                label: Some(label), ..
            }) => self.binding(label).cloned().ok_or_else(|| {
                RenderError::NotALiteral(format!("parameter '{}' without a bound value", label))
            }),
            other => Err(RenderError::NotALiteral(format!("{:?}", other))),
        }
    }

    /// Append an identifier, quoting it when needed or forced.
    pub fn append_identifier(&mut self, name: &str, force_quote: bool) {
        let rendered = if force_quote {
            self.dialect.quote_identifier(name)
        } else {
            self.dialect.render_identifier(name)
        };
        self.sql.push_str(&rendered);
    }

    fn render_column(&mut self, column: &ColumnReference) {
        if let Some(qualifier) = &column.qualifier {
            self.append_identifier(qualifier, false);
            self.append_char('.');
        }
        self.append_identifier(&column.column, column.quoted);
    }

    pub fn render_node(&mut self, node: &'a SqlAstNode) -> RenderResult<()> {
        match node {
            SqlAstNode::Expression(expression) => self.render_expression(expression),
            SqlAstNode::Distinct(expression) => {
                self.append_sql("distinct ");
                self.render_expression(expression)
            }
            SqlAstNode::JsonNullBehavior(JsonNullBehavior::Null) => {
                self.append_sql("null on null");
                Ok(())
            }
            SqlAstNode::JsonNullBehavior(JsonNullBehavior::Absent) => {
                self.append_sql("absent on null");
                Ok(())
            }
            SqlAstNode::Star => {
                self.append_char('*');
                Ok(())
            }
        }
    }

    pub fn render_expression(&mut self, expression: &'a Expression) -> RenderResult<()> {
        match expression {
            Expression::Column(column) => {
                self.render_column(column);
                Ok(())
            }
            Expression::Literal(literal) => {
                let rendered = self.dialect.render_literal(literal)?;
                self.append_sql(&rendered);
                Ok(())
            }
            Expression::Parameter(parameter) => {
                self.render_parameter(parameter);
                Ok(())
            }
            Expression::Function(call) => {
                let dialect = self.dialect;
                let renderer = dialect.functions().resolve(&call.name).ok_or_else(|| {
                    RenderError::UnknownFunction {
                        function: call.name.clone(),
                        dialect: dialect.kind().to_string(),
                    }
                })?;
                tracing::trace!(target: SQL_AST_TREE_TARGET, function = %call.name, "Rendering function");
                renderer.arity().check(&call.name, call.arguments.len())?;
                renderer.render(call, self)
            }
            Expression::Binary { left, op, right } => {
                self.render_operand(left)?;
                self.append_char(' ');
                self.append_sql(&op.to_string());
                self.append_char(' ');
                self.render_operand(right)
            }
            Expression::Negated(inner) => {
                self.append_char('-');
                // A second leading minus would open a `--` line comment.
                if starts_with_minus(inner) {
                    self.append_char('(');
                    self.render_expression(inner)?;
                    self.append_char(')');
                    Ok(())
                } else {
                    self.render_operand(inner)
                }
            }
            Expression::Case {
                when_clauses,
                otherwise,
            } => {
                if when_clauses.is_empty() {
                    return Err(RenderError::definition("Case expression without when clauses"));
                }
                self.append_sql("case");
                for when in when_clauses {
                    self.append_sql(" when ");
                    self.render_predicate(&when.condition)?;
                    self.append_sql(" then ");
                    self.render_expression(&when.result)?;
                }
                if let Some(otherwise) = otherwise {
                    self.append_sql(" else ");
                    self.render_expression(otherwise)?;
                }
                self.append_sql(" end");
                Ok(())
            }
            Expression::Cast { expression, target } => {
                self.append_sql("cast(");
                self.render_expression(expression)?;
                self.append_sql(" as ");
                self.append_sql(target);
                self.append_char(')');
                Ok(())
            }
            Expression::Subquery(query) => {
                if self.current_clause() == Some(Clause::OrderBy)
                    && !self.dialect.capabilities().supports_correlated_subquery_in_order_by
                {
                    return Err(RenderError::unsupported(
                        self.dialect.kind(),
                        "subqueries in the order by clause",
                    ));
                }
                self.append_char('(');
                self.render_query_part(query)?;
                self.append_char(')');
                Ok(())
            }
            Expression::Tuple(items) => {
                self.append_char('(');
                self.render_expression_list(items)?;
                self.append_char(')');
                Ok(())
            }
            Expression::SelectItemRef(position) => self.render_select_item_ref(*position),
        }
    }

    /// Operand of an arithmetic operator; nested arithmetic is parenthesized.
    fn render_operand(&mut self, expression: &'a Expression) -> RenderResult<()> {
        if matches!(expression, Expression::Binary { .. }) {
            self.append_char('(');
            self.render_expression(expression)?;
            self.append_char(')');
            Ok(())
        } else {
            self.render_expression(expression)
        }
    }

    pub(crate) fn render_expression_list(&mut self, items: &'a [Expression]) -> RenderResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.append_char(',');
            }
            self.render_expression(item)?;
        }
        Ok(())
    }

    fn render_parameter(&mut self, parameter: &JdbcParameter) {
        let dialect = self.dialect;
        let caps = dialect.capabilities();
        let marker = caps.parameter_marker.render(self.parameters.len() + 1);
        match &parameter.sql_type {
            Some(sql_type)
                if caps.requires_typed_parameters_in_select
                    && self.current_clause() == Some(Clause::Select) =>
            {
                self.append_sql("cast(");
                self.append_sql(&marker);
                self.append_sql(" as ");
                self.append_sql(sql_type);
                self.append_char(')');
            }
            _ => self.append_sql(&marker),
        }
        self.parameters.push(parameter.clone());
    }

    /// The select item at 1-based `position` of the innermost query spec.
    fn selection(&self, position: usize) -> RenderResult<&'a SqlSelection> {
        let spec = self
            .query_specs
            .last()
            .copied()
            .ok_or_else(|| RenderError::definition("Select item reference outside of a query"))?;
        position
            .checked_sub(1)
            .and_then(|index| spec.selections.get(index))
            .ok_or_else(|| {
                RenderError::definition(format!(
                    "Select item reference {} out of range (select list has {} items)",
                    position,
                    spec.selections.len()
                ))
            })
    }

    fn render_select_item_ref(&mut self, position: usize) -> RenderResult<()> {
        let selection = self.selection(position)?;
        if !matches!(self.current_clause(), Some(Clause::OrderBy | Clause::GroupBy)) {
            return self.render_expression(&selection.expression);
        }
        let strategy = self.dialect.capabilities().select_item_reference_strategy;
        match strategy {
            SelectItemReferenceStrategy::Position => {
                self.append_int(position as i64);
                Ok(())
            }
            SelectItemReferenceStrategy::Alias => match &selection.alias {
                Some(alias) => {
                    self.append_identifier(alias, false);
                    Ok(())
                }
                None => self.render_expression(&selection.expression),
            },
            SelectItemReferenceStrategy::Expression => self.render_expression(&selection.expression),
        }
    }

    pub fn render_predicate(&mut self, predicate: &'a Predicate) -> RenderResult<()> {
        match predicate {
            Predicate::Comparison { left, op, right } => {
                self.render_expression(left)?;
                self.append_char(' ');
                self.append_sql(&op.to_string());
                self.append_char(' ');
                self.render_expression(right)
            }
            Predicate::Quantified {
                left,
                op,
                quantifier,
                subquery,
            } => {
                if !self.dialect.capabilities().supports_subquery_quantifiers {
                    return Err(RenderError::unsupported(
                        self.dialect.kind(),
                        format!("the {} quantifier over subqueries", quantifier),
                    ));
                }
                self.render_expression(left)?;
                self.append_sql(&format!(" {} {} (", op, quantifier));
                self.render_query_part(subquery)?;
                self.append_char(')');
                Ok(())
            }
            Predicate::Junction { kind, predicates } => {
                if predicates.is_empty() {
                    self.append_sql(match kind {
                        JunctionKind::And => "1=1",
                        JunctionKind::Or => "1=0",
                    });
                    return Ok(());
                }
                let separator = format!(" {} ", kind);
                for (i, nested) in predicates.iter().enumerate() {
                    if i > 0 {
                        self.append_sql(&separator);
                    }
                    if matches!(nested, Predicate::Junction { .. }) {
                        self.append_char('(');
                        self.render_predicate(nested)?;
                        self.append_char(')');
                    } else {
                        self.render_predicate(nested)?;
                    }
                }
                Ok(())
            }
            Predicate::Negated(inner) => {
                self.append_sql("not (");
                self.render_predicate(inner)?;
                self.append_char(')');
                Ok(())
            }
            Predicate::NullCheck {
                expression,
                negated,
            } => {
                self.render_expression(expression)?;
                self.append_sql(if *negated { " is not null" } else { " is null" });
                Ok(())
            }
            Predicate::InList {
                expression,
                list,
                negated,
            } => {
                if list.is_empty() {
                    self.append_sql(if *negated { "1=1" } else { "1=0" });
                    return Ok(());
                }
                self.render_expression(expression)?;
                self.append_sql(if *negated { " not in (" } else { " in (" });
                self.render_expression_list(list)?;
                self.append_char(')');
                Ok(())
            }
            Predicate::InSubquery {
                expression,
                subquery,
                negated,
            } => {
                self.render_expression(expression)?;
                self.append_sql(if *negated { " not in (" } else { " in (" });
                self.render_query_part(subquery)?;
                self.append_char(')');
                Ok(())
            }
            Predicate::Exists { subquery, negated } => {
                self.append_sql(if *negated { "not exists (" } else { "exists (" });
                self.render_query_part(subquery)?;
                self.append_char(')');
                Ok(())
            }
            Predicate::Like {
                expression,
                pattern,
                escape,
                negated,
                case_insensitive,
            } => {
                let native_ilike = self.dialect.capabilities().supports_case_insensitive_like;
                let lower = *case_insensitive && !native_ilike;
                if lower {
                    self.append_sql("lower(");
                }
                self.render_expression(expression)?;
                if lower {
                    self.append_char(')');
                }
                if *negated {
                    self.append_sql(" not");
                }
                self.append_sql(if *case_insensitive && native_ilike {
                    " ilike "
                } else {
                    " like "
                });
                if lower {
                    self.append_sql("lower(");
                }
                self.render_expression(pattern)?;
                if lower {
                    self.append_char(')');
                }
                if let Some(escape) = escape {
                    self.append_sql(" escape ");
                    self.append_single_quote_escaped_string(&escape.to_string());
                }
                Ok(())
            }
            Predicate::Between {
                expression,
                low,
                high,
                negated,
            } => {
                self.render_expression(expression)?;
                self.append_sql(if *negated { " not between " } else { " between " });
                self.render_expression(low)?;
                self.append_sql(" and ");
                self.render_expression(high)
            }
            Predicate::Boolean(expression) => self.render_expression(expression),
        }
    }

    /// `expr [desc] [nulls first|last]`. Without native null precedence a
    /// leading `case when expr is null ...` sort key is emitted instead.
    pub fn render_sort_specification(&mut self, sort: &'a SortSpecification) -> RenderResult<()> {
        let emulated_nulls = sort
            .nulls
            .filter(|_| !self.dialect.capabilities().supports_nulls_precedence);
        if let Some(nulls) = emulated_nulls {
            let (null_key, other_key) = match nulls {
                NullPrecedence::First => ("0", "1"),
                NullPrecedence::Last => ("1", "0"),
            };
            self.append_sql("case when ");
            match &sort.expression {
                Expression::SelectItemRef(position) => {
                    let selection = self.selection(*position)?;
                    self.render_expression(&selection.expression)?;
                }
                expression => self.render_expression(expression)?,
            }
            self.append_sql(" is null then ");
            self.append_sql(null_key);
            self.append_sql(" else ");
            self.append_sql(other_key);
            self.append_sql(" end,");
        }
        self.render_expression(&sort.expression)?;
        if sort.order == SortOrder::Desc {
            self.append_sql(" desc");
        }
        if let (Some(nulls), None) = (sort.nulls, emulated_nulls) {
            self.append_char(' ');
            self.append_sql(&nulls.to_string());
        }
        Ok(())
    }
}

/// Whether `expression` renders with a leading `-`.
fn starts_with_minus(expression: &Expression) -> bool {
    match expression {
        Expression::Negated(_) => true,
        Expression::Literal(Literal::Integer(n)) => *n < 0,
        Expression::Literal(Literal::Float(n)) => n.is_sign_negative(),
        _ => false,
    }
}

impl SqlAppender for SqlAstTranslator<'_> {
    fn append_sql(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    fn append_char(&mut self, c: char) {
        self.sql.push(c);
    }
}
