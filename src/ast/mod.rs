//! SQL AST node types.
//!
//! A statement tree is built once per statement compilation and is never
//! mutated while it is being rendered.

pub mod builders;
pub mod dml;
pub mod expr;
pub mod operators;
pub mod predicate;
pub mod select;
pub mod values;

use serde::{Deserialize, Serialize};

pub use self::dml::{Assignment, DeleteStatement, InsertSource, InsertStatement, UpdateStatement};
pub use self::expr::{
    CaseWhen, ColumnReference, Expression, FunctionCall, JsonNullBehavior, SqlAstNode,
};
pub use self::operators::{
    BinaryOp, ComparisonOperator, JoinType, JunctionKind, NullPrecedence, Quantifier,
    SetOperator, SortOrder,
};
pub use self::predicate::Predicate;
pub use self::select::{
    FetchClause, QueryGroup, QueryPart, QuerySpec, SelectStatement, SortSpecification,
    SqlSelection, TableGroup, TableGroupJoin, TableReference,
};
pub use self::values::{JdbcParameter, Literal, ParameterBindings};

/// The root of a statement tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}

impl Statement {
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Select(_) => "select",
            Statement::Insert(_) => "insert",
            Statement::Update(_) => "update",
            Statement::Delete(_) => "delete",
        }
    }
}

impl From<SelectStatement> for Statement {
    fn from(statement: SelectStatement) -> Self {
        Statement::Select(statement)
    }
}

impl From<QuerySpec> for Statement {
    fn from(spec: QuerySpec) -> Self {
        Statement::Select(SelectStatement::new(spec))
    }
}

impl From<QueryGroup> for Statement {
    fn from(group: QueryGroup) -> Self {
        Statement::Select(SelectStatement::new(group))
    }
}

impl From<InsertStatement> for Statement {
    fn from(statement: InsertStatement) -> Self {
        Statement::Insert(statement)
    }
}

impl From<UpdateStatement> for Statement {
    fn from(statement: UpdateStatement) -> Self {
        Statement::Update(statement)
    }
}

impl From<DeleteStatement> for Statement {
    fn from(statement: DeleteStatement) -> Self {
        Statement::Delete(statement)
    }
}
