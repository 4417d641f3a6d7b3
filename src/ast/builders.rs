//! Ergonomic builder functions for AST nodes.
//!
//! # Example
//! ```
//! use sqlrender::ast::builders::*;
//! use sqlrender::ast::{QuerySpec, SortSpecification};
//!
//! let spec = QuerySpec::new()
//!     .select(qualified("e", "id"))
//!     .from(table("entity", "e"))
//!     .filter(eq(qualified("e", "id"), int(1)))
//!     .order_by(SortSpecification::asc(select_ref(1)));
//! assert_eq!(spec.selections.len(), 1);
//! ```

use crate::ast::{
    BinaryOp, ColumnReference, ComparisonOperator, Expression, FunctionCall, JdbcParameter,
    JsonNullBehavior, Literal, Predicate, SqlAstNode, TableGroup, TableReference,
};

/// Unqualified column reference
pub fn col(name: &str) -> Expression {
    Expression::Column(ColumnReference::new(name))
}

/// Column qualified by a table alias (`alias.name`)
pub fn qualified(alias: &str, name: &str) -> Expression {
    Expression::Column(ColumnReference::qualified(alias, name))
}

/// Integer literal
pub fn int(value: i64) -> Expression {
    Expression::Literal(Literal::Integer(value))
}

/// Character literal
pub fn text(value: &str) -> Expression {
    Expression::Literal(Literal::String(value.to_string()))
}

/// Boolean literal
pub fn boolean(value: bool) -> Expression {
    Expression::Literal(Literal::Boolean(value))
}

/// NULL literal
pub fn null() -> Expression {
    Expression::Literal(Literal::Null)
}

/// Named bind parameter
pub fn param(label: &str) -> Expression {
    Expression::Parameter(JdbcParameter::named(label))
}

/// Named bind parameter with a known SQL type
pub fn typed_param(label: &str, sql_type: &str) -> Expression {
    Expression::Parameter(JdbcParameter::named(label).typed(sql_type))
}

/// Reference to the select item at `position` (1-based)
pub fn select_ref(position: usize) -> Expression {
    Expression::SelectItemRef(position)
}

/// Function call; convert with `.into()` or wrap in `Expression::Function`
pub fn func(name: &str, arguments: Vec<SqlAstNode>) -> FunctionCall {
    FunctionCall::new(name, arguments)
}

/// Plain function argument
pub fn arg(expression: Expression) -> SqlAstNode {
    SqlAstNode::Expression(expression)
}

/// `distinct <expr>` function argument
pub fn distinct(expression: Expression) -> SqlAstNode {
    SqlAstNode::Distinct(expression)
}

/// `null on null` / `absent on null` function argument
pub fn json_null(behavior: JsonNullBehavior) -> SqlAstNode {
    SqlAstNode::JsonNullBehavior(behavior)
}

/// `*` function argument
pub fn star() -> SqlAstNode {
    SqlAstNode::Star
}

/// cast(expr as target)
pub fn cast(expression: Expression, target: &str) -> Expression {
    Expression::Cast {
        expression: Box::new(expression),
        target: target.to_string(),
    }
}

/// Binary expression
pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Expression {
    Expression::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

/// Table group for `name alias`
pub fn table(name: &str, alias: &str) -> TableGroup {
    TableGroup::new(TableReference::aliased(name, alias))
}

fn compare(left: Expression, op: ComparisonOperator, right: Expression) -> Predicate {
    Predicate::Comparison { left, op, right }
}

pub fn eq(left: Expression, right: Expression) -> Predicate {
    compare(left, ComparisonOperator::Eq, right)
}

pub fn ne(left: Expression, right: Expression) -> Predicate {
    compare(left, ComparisonOperator::Ne, right)
}

pub fn gt(left: Expression, right: Expression) -> Predicate {
    compare(left, ComparisonOperator::Gt, right)
}

pub fn gte(left: Expression, right: Expression) -> Predicate {
    compare(left, ComparisonOperator::Gte, right)
}

pub fn lt(left: Expression, right: Expression) -> Predicate {
    compare(left, ComparisonOperator::Lt, right)
}

pub fn lte(left: Expression, right: Expression) -> Predicate {
    compare(left, ComparisonOperator::Lte, right)
}

pub fn is_null(expression: Expression) -> Predicate {
    Predicate::NullCheck {
        expression,
        negated: false,
    }
}

pub fn is_not_null(expression: Expression) -> Predicate {
    Predicate::NullCheck {
        expression,
        negated: true,
    }
}
