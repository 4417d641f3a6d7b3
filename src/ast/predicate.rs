use serde::{Deserialize, Serialize};

use crate::ast::{ComparisonOperator, Expression, JunctionKind, Quantifier, QueryPart};

/// A boolean-valued node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// left <op> right
    Comparison {
        left: Expression,
        op: ComparisonOperator,
        right: Expression,
    },
    /// left <op> all|any|some (subquery)
    Quantified {
        left: Expression,
        op: ComparisonOperator,
        quantifier: Quantifier,
        subquery: Box<QueryPart>,
    },
    /// p1 and p2 ... / p1 or p2 ...
    Junction {
        kind: JunctionKind,
        predicates: Vec<Predicate>,
    },
    /// not (p)
    Negated(Box<Predicate>),
    /// expr is [not] null
    NullCheck {
        expression: Expression,
        #[serde(default)]
        negated: bool,
    },
    /// expr [not] in (a, b, ...)
    InList {
        expression: Expression,
        list: Vec<Expression>,
        #[serde(default)]
        negated: bool,
    },
    /// expr [not] in (subquery)
    InSubquery {
        expression: Expression,
        subquery: Box<QueryPart>,
        #[serde(default)]
        negated: bool,
    },
    /// [not] exists (subquery)
    Exists {
        subquery: Box<QueryPart>,
        #[serde(default)]
        negated: bool,
    },
    /// expr [not] like pattern [escape c]
    Like {
        expression: Expression,
        pattern: Expression,
        #[serde(default)]
        escape: Option<char>,
        #[serde(default)]
        negated: bool,
        #[serde(default)]
        case_insensitive: bool,
    },
    /// expr [not] between low and high
    Between {
        expression: Expression,
        low: Expression,
        high: Expression,
        #[serde(default)]
        negated: bool,
    },
    /// A boolean expression used as a predicate
    Boolean(Expression),
}

impl Predicate {
    /// Combine predicates with `and`, flattening a single element.
    pub fn and(mut predicates: Vec<Predicate>) -> Predicate {
        if predicates.len() == 1 {
            return predicates.remove(0);
        }
        Predicate::Junction {
            kind: JunctionKind::And,
            predicates,
        }
    }

    /// Combine predicates with `or`, flattening a single element.
    pub fn or(mut predicates: Vec<Predicate>) -> Predicate {
        if predicates.len() == 1 {
            return predicates.remove(0);
        }
        Predicate::Junction {
            kind: JunctionKind::Or,
            predicates,
        }
    }
}
