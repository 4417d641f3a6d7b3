use serde::{Deserialize, Serialize};

use crate::ast::{ColumnReference, Expression, Predicate, QueryPart, TableReference};

/// `insert into <target> (<columns>) values ... | <query>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    pub target: TableReference,
    pub columns: Vec<ColumnReference>,
    pub source: InsertSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertSource {
    Values(Vec<Vec<Expression>>),
    Query(Box<QueryPart>),
}

/// `update <target> set <assignments> [where ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub target: TableReference,
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub where_clause: Option<Predicate>,
}

/// `column = value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: ColumnReference,
    pub value: Expression,
}

/// `delete from <target> [where ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub target: TableReference,
    #[serde(default)]
    pub where_clause: Option<Predicate>,
}
