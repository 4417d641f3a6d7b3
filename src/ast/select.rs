use serde::{Deserialize, Serialize};

use crate::ast::{Expression, JoinType, NullPrecedence, Predicate, SetOperator, SortOrder};

/// Top-level select statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    pub query_part: QueryPart,
}

impl SelectStatement {
    pub fn new(query_part: impl Into<QueryPart>) -> Self {
        Self {
            query_part: query_part.into(),
        }
    }
}

/// Either a single query specification or a set operation over several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryPart {
    Spec(QuerySpec),
    Group(QueryGroup),
}

impl QueryPart {
    /// The leftmost query specification; its select list names the columns
    /// of the whole part. `None` for a set operation without parts.
    pub fn first_query_spec(&self) -> Option<&QuerySpec> {
        match self {
            QueryPart::Spec(spec) => Some(spec),
            QueryPart::Group(group) => group.parts.first()?.first_query_spec(),
        }
    }

    pub fn order_by(&self) -> &[SortSpecification] {
        match self {
            QueryPart::Spec(spec) => &spec.order_by,
            QueryPart::Group(group) => &group.order_by,
        }
    }

    pub fn fetch(&self) -> Option<&FetchClause> {
        match self {
            QueryPart::Spec(spec) => spec.fetch.as_ref(),
            QueryPart::Group(group) => group.fetch.as_ref(),
        }
    }

    /// Whether this part carries its own ORDER BY or row limit.
    pub fn has_order_or_fetch(&self) -> bool {
        !self.order_by().is_empty() || self.fetch().is_some_and(|f| !f.is_empty())
    }
}

impl From<QuerySpec> for QueryPart {
    fn from(spec: QuerySpec) -> Self {
        QueryPart::Spec(spec)
    }
}

impl From<QueryGroup> for QueryPart {
    fn from(group: QueryGroup) -> Self {
        QueryPart::Group(group)
    }
}

/// `part <op> part <op> part [order by ...] [fetch ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryGroup {
    pub set_operator: SetOperator,
    pub parts: Vec<QueryPart>,
    #[serde(default)]
    pub order_by: Vec<SortSpecification>,
    #[serde(default)]
    pub fetch: Option<FetchClause>,
}

impl QueryGroup {
    pub fn new(set_operator: SetOperator, parts: Vec<QueryPart>) -> Self {
        Self {
            set_operator,
            parts,
            order_by: Vec::new(),
            fetch: None,
        }
    }

    pub fn order_by(mut self, sort: SortSpecification) -> Self {
        self.order_by.push(sort);
        self
    }

    pub fn fetch(mut self, fetch: FetchClause) -> Self {
        self.fetch = Some(fetch);
        self
    }
}

/// A single `select ... from ... where ...` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuerySpec {
    #[serde(default)]
    pub distinct: bool,
    pub selections: Vec<SqlSelection>,
    #[serde(default)]
    pub from: Vec<TableGroup>,
    #[serde(default)]
    pub where_clause: Option<Predicate>,
    #[serde(default)]
    pub group_by: Vec<Expression>,
    #[serde(default)]
    pub having: Option<Predicate>,
    #[serde(default)]
    pub order_by: Vec<SortSpecification>,
    #[serde(default)]
    pub fetch: Option<FetchClause>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, expression: impl Into<Expression>) -> Self {
        self.selections.push(SqlSelection {
            expression: expression.into(),
            alias: None,
        });
        self
    }

    pub fn select_as(mut self, expression: impl Into<Expression>, alias: impl Into<String>) -> Self {
        self.selections.push(SqlSelection {
            expression: expression.into(),
            alias: Some(alias.into()),
        });
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn from(mut self, group: TableGroup) -> Self {
        self.from.push(group);
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => Predicate::and(vec![existing, predicate]),
            None => predicate,
        });
        self
    }

    pub fn group_by(mut self, expression: impl Into<Expression>) -> Self {
        self.group_by.push(expression.into());
        self
    }

    pub fn having(mut self, predicate: Predicate) -> Self {
        self.having = Some(predicate);
        self
    }

    pub fn order_by(mut self, sort: SortSpecification) -> Self {
        self.order_by.push(sort);
        self
    }

    pub fn fetch(mut self, fetch: FetchClause) -> Self {
        self.fetch = Some(fetch);
        self
    }

    /// Associations eagerly joined by this spec, in join order.
    pub fn fetch_shape(&self) -> Vec<&str> {
        let mut shape = Vec::new();
        for group in &self.from {
            group.collect_fetches(&mut shape);
        }
        shape
    }
}

/// One item of the select list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlSelection {
    pub expression: Expression,
    #[serde(default)]
    pub alias: Option<String>,
}

/// A named table with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableReference {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
}

impl TableReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }
}

/// A root table reference plus the joins hanging off it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableGroup {
    pub table: TableReference,
    #[serde(default)]
    pub joins: Vec<TableGroupJoin>,
}

impl TableGroup {
    pub fn new(table: TableReference) -> Self {
        Self {
            table,
            joins: Vec::new(),
        }
    }

    pub fn join(mut self, join: TableGroupJoin) -> Self {
        self.joins.push(join);
        self
    }

    fn collect_fetches<'a>(&'a self, shape: &mut Vec<&'a str>) {
        for join in &self.joins {
            if let Some(path) = &join.fetched_association {
                shape.push(path);
            }
            join.group.collect_fetches(shape);
        }
    }
}

/// A join of a nested table group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableGroupJoin {
    #[serde(default)]
    pub join_type: JoinType,
    pub group: TableGroup,
    #[serde(default)]
    pub predicate: Option<Predicate>,
    /// Association path this join eagerly fetches, if it is a fetch join.
    #[serde(default)]
    pub fetched_association: Option<String>,
}

impl TableGroupJoin {
    pub fn new(join_type: JoinType, group: TableGroup, predicate: Option<Predicate>) -> Self {
        Self {
            join_type,
            group,
            predicate,
            fetched_association: None,
        }
    }

    pub fn fetching(mut self, association: impl Into<String>) -> Self {
        self.fetched_association = Some(association.into());
        self
    }
}

/// `<expr> [asc|desc] [nulls first|last]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpecification {
    pub expression: Expression,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub nulls: Option<NullPrecedence>,
}

impl SortSpecification {
    pub fn asc(expression: impl Into<Expression>) -> Self {
        Self {
            expression: expression.into(),
            order: SortOrder::Asc,
            nulls: None,
        }
    }

    pub fn desc(expression: impl Into<Expression>) -> Self {
        Self {
            expression: expression.into(),
            order: SortOrder::Desc,
            nulls: None,
        }
    }

    pub fn nulls(mut self, precedence: NullPrecedence) -> Self {
        self.nulls = Some(precedence);
        self
    }
}

/// Row limiting: `offset` rows skipped, at most `fetch` rows returned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FetchClause {
    #[serde(default)]
    pub offset: Option<Expression>,
    #[serde(default)]
    pub fetch: Option<Expression>,
}

impl FetchClause {
    pub fn first(rows: impl Into<Expression>) -> Self {
        Self {
            offset: None,
            fetch: Some(rows.into()),
        }
    }

    pub fn offset(mut self, rows: impl Into<Expression>) -> Self {
        self.offset = Some(rows.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.offset.is_none() && self.fetch.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;

    #[test]
    fn test_first_query_spec() {
        let left = QuerySpec::new().select(qualified("a", "id")).from(table("a", "a"));
        let right = QuerySpec::new().select(qualified("b", "id")).from(table("b", "b"));
        let nested = QueryGroup::new(SetOperator::Union, vec![left.clone().into(), right.into()]);
        let outer = QueryPart::from(QueryGroup::new(SetOperator::UnionAll, vec![nested.into()]));
        assert_eq!(outer.first_query_spec(), Some(&left));

        let empty: QueryPart =
            serde_json::from_str(r#"{"group": {"set_operator": "union", "parts": []}}"#).unwrap();
        assert_eq!(empty.first_query_spec(), None);
    }
}
