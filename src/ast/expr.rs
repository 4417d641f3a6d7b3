use serde::{Deserialize, Serialize};

use crate::ast::{BinaryOp, JdbcParameter, Literal, Predicate, QueryPart, SortSpecification};

/// A column of a table reference, optionally qualified by the table alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnReference {
    #[serde(default)]
    pub qualifier: Option<String>,
    pub column: String,
    /// Render the column name quoted regardless of reserved words.
    #[serde(default)]
    pub quoted: bool,
}

impl ColumnReference {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            column: column.into(),
            quoted: false,
        }
    }

    pub fn qualified(qualifier: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            column: column.into(),
            quoted: false,
        }
    }
}

impl std::fmt::Display for ColumnReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}.{}", q, self.column),
            None => write!(f, "{}", self.column),
        }
    }
}

/// A general expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// A column reference (alias.column)
    Column(ColumnReference),
    /// A literal value rendered inline
    Literal(Literal),
    /// A bind parameter slot
    Parameter(JdbcParameter),
    /// A function call resolved through the dialect's function registry
    Function(FunctionCall),
    /// Binary arithmetic/concatenation
    Binary {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
    },
    /// Unary minus
    Negated(Box<Expression>),
    /// Searched CASE expression
    Case {
        when_clauses: Vec<CaseWhen>,
        #[serde(default)]
        otherwise: Option<Box<Expression>>,
    },
    /// cast(expr as target)
    Cast {
        expression: Box<Expression>,
        target: String,
    },
    /// Scalar subquery
    Subquery(Box<QueryPart>),
    /// Row value constructor (a, b)
    Tuple(Vec<Expression>),
    /// Reference to a select item of the enclosing query by 1-based position
    SelectItemRef(usize),
}

impl Expression {
    pub fn is_subquery(&self) -> bool {
        matches!(self, Expression::Subquery(_))
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Expression::Literal(literal)
    }
}

impl From<ColumnReference> for Expression {
    fn from(column: ColumnReference) -> Self {
        Expression::Column(column)
    }
}

impl From<FunctionCall> for Expression {
    fn from(call: FunctionCall) -> Self {
        Expression::Function(call)
    }
}

/// One `when <predicate> then <result>` branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseWhen {
    pub condition: Predicate,
    pub result: Expression,
}

/// How JSON constructors treat SQL NULL inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonNullBehavior {
    /// `null on null`: keep a JSON null entry
    Null,
    /// `absent on null`: skip the entry
    #[default]
    Absent,
}

/// A node that may appear as a function argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlAstNode {
    Expression(Expression),
    /// `distinct <expr>` inside an aggregate
    Distinct(Expression),
    /// `null on null` / `absent on null` marker
    JsonNullBehavior(JsonNullBehavior),
    /// `*` as in count(*)
    Star,
}

impl SqlAstNode {
    /// The wrapped expression, unwrapping `distinct`.
    pub fn expression(&self) -> Option<&Expression> {
        match self {
            SqlAstNode::Expression(e) | SqlAstNode::Distinct(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Expression> for SqlAstNode {
    fn from(expression: Expression) -> Self {
        SqlAstNode::Expression(expression)
    }
}

/// A call site of a (possibly aggregate) function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<SqlAstNode>,
    /// Aggregate `filter (where ...)`
    #[serde(default)]
    pub filter: Option<Box<Predicate>>,
    /// Ordered-set ordering (`within group (order by ...)`)
    #[serde(default)]
    pub within_group: Vec<SortSpecification>,
    /// SQL type of the result, when the caller resolved one
    #[serde(default)]
    pub return_type: Option<String>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: Vec<SqlAstNode>) -> Self {
        Self {
            name: name.into(),
            arguments,
            filter: None,
            within_group: Vec::new(),
            return_type: None,
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(Box::new(predicate));
        self
    }

    pub fn within_group(mut self, sort: Vec<SortSpecification>) -> Self {
        self.within_group = sort;
        self
    }

    pub fn returning(mut self, sql_type: impl Into<String>) -> Self {
        self.return_type = Some(sql_type.into());
        self
    }
}
