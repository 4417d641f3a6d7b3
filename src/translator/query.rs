//! Query specifications and set operations.

use crate::ast::{FetchClause, QueryGroup, QueryPart, QuerySpec, SortSpecification, TableGroup, TableReference};
use crate::error::{RenderError, RenderResult};
use crate::translator::{Clause, SqlAppender, SqlAstTranslator};

impl<'a> SqlAstTranslator<'a> {
    pub(crate) fn render_query_part(&mut self, part: &'a QueryPart) -> RenderResult<()> {
        match part {
            QueryPart::Spec(spec) => self.render_query_spec(spec),
            QueryPart::Group(group) => self.render_query_group(group),
        }
    }

    fn render_query_spec(&mut self, spec: &'a QuerySpec) -> RenderResult<()> {
        self.query_specs.push(spec);
        let result = self.render_query_spec_clauses(spec);
        self.query_specs.pop();
        result
    }

    fn render_query_spec_clauses(&mut self, spec: &'a QuerySpec) -> RenderResult<()> {
        if spec.selections.is_empty() {
            return Err(RenderError::definition("Query has an empty select list"));
        }

        self.append_sql("select ");
        if spec.distinct {
            self.append_sql("distinct ");
        }
        self.with_clause(Clause::Select, |t| {
            for (i, selection) in spec.selections.iter().enumerate() {
                if i > 0 {
                    t.append_char(',');
                }
                t.render_expression(&selection.expression)?;
                if let Some(alias) = &selection.alias {
                    t.append_sql(" as ");
                    t.append_identifier(alias, false);
                }
            }
            Ok(())
        })?;

        if !spec.from.is_empty() {
            self.append_sql(" from ");
            self.with_clause(Clause::From, |t| {
                for (i, group) in spec.from.iter().enumerate() {
                    if i > 0 {
                        t.append_char(',');
                    }
                    t.render_table_group(group)?;
                }
                Ok(())
            })?;
        }

        if let Some(predicate) = &spec.where_clause {
            self.append_sql(" where ");
            self.with_clause(Clause::Where, |t| t.render_predicate(predicate))?;
        }

        if !spec.group_by.is_empty() {
            self.append_sql(" group by ");
            self.with_clause(Clause::GroupBy, |t| t.render_expression_list(&spec.group_by))?;
        }

        if let Some(predicate) = &spec.having {
            self.append_sql(" having ");
            self.with_clause(Clause::Having, |t| t.render_predicate(predicate))?;
        }

        self.render_order_by(&spec.order_by)?;
        if let Some(fetch) = &spec.fetch {
            self.render_fetch(fetch)?;
        }
        Ok(())
    }

    pub(crate) fn render_table_reference(&mut self, table: &TableReference) {
        self.append_identifier(&table.name, false);
        if let Some(alias) = &table.alias {
            self.append_char(' ');
            self.append_identifier(alias, false);
        }
    }

    fn render_table_group(&mut self, group: &'a TableGroup) -> RenderResult<()> {
        self.render_table_reference(&group.table);
        for join in &group.joins {
            self.append_char(' ');
            self.append_sql(&join.join_type.to_string());
            self.append_char(' ');
            let nested = !join.group.joins.is_empty();
            if nested {
                self.append_char('(');
            }
            self.render_table_group(&join.group)?;
            if nested {
                self.append_char(')');
            }
            if let Some(predicate) = &join.predicate {
                self.append_sql(" on ");
                self.render_predicate(predicate)?;
            }
        }
        Ok(())
    }

    fn render_order_by(&mut self, order_by: &'a [SortSpecification]) -> RenderResult<()> {
        if order_by.is_empty() {
            return Ok(());
        }
        self.append_sql(" order by ");
        self.with_clause(Clause::OrderBy, |t| {
            for (i, sort) in order_by.iter().enumerate() {
                if i > 0 {
                    t.append_char(',');
                }
                t.render_sort_specification(sort)?;
            }
            Ok(())
        })
    }

    fn render_fetch(&mut self, fetch: &'a FetchClause) -> RenderResult<()> {
        if fetch.is_empty() {
            return Ok(());
        }
        self.dialect.limit_handler().render(fetch, self)
    }

    fn render_query_group(&mut self, group: &'a QueryGroup) -> RenderResult<()> {
        self.validate_query_group(group)?;

        for (i, part) in group.parts.iter().enumerate() {
            if i > 0 {
                self.append_char(' ');
                self.append_sql(&group.set_operator.to_string());
                self.append_char(' ');
            }
            let parenthesize = part.has_order_or_fetch() || matches!(part, QueryPart::Group(_));
            if parenthesize {
                self.append_char('(');
            }
            self.render_query_part(part)?;
            if parenthesize {
                self.append_char(')');
            }
        }

        // Select item references in the group's order by address the
        // columns of the leftmost branch.
        let first = group
            .parts
            .first()
            .and_then(QueryPart::first_query_spec)
            .ok_or_else(|| RenderError::definition("Set operation without query parts"))?;
        self.query_specs.push(first);
        let ordered = self.render_order_by(&group.order_by);
        self.query_specs.pop();
        ordered?;

        if let Some(fetch) = &group.fetch {
            self.render_fetch(fetch)?;
        }
        Ok(())
    }

    /// Check a set operation, including nested ones, before any of it is
    /// rendered.
    fn validate_query_group(&self, group: &QueryGroup) -> RenderResult<()> {
        if group.parts.len() < 2 {
            return Err(RenderError::definition(format!(
                "Set operation {} requires at least two query parts, got {}",
                group.set_operator,
                group.parts.len()
            )));
        }
        validate_fetch_shape(group)?;

        let dialect = self.dialect;
        let caps = dialect.capabilities();
        if group.set_operator.is_intersect_or_except() && !caps.supports_intersect {
            return Err(RenderError::unsupported(dialect.kind(), group.set_operator.to_string()));
        }
        if group.fetch.as_ref().is_some_and(|f| !f.is_empty()) && !caps.supports_union_with_limit {
            return Err(RenderError::unsupported(
                dialect.kind(),
                format!("{} combined with a row limit", group.set_operator),
            ));
        }
        for part in &group.parts {
            if part.has_order_or_fetch() && !caps.supports_order_by_in_subquery {
                return Err(RenderError::unsupported(
                    dialect.kind(),
                    format!("order by or row limit in a {} branch", group.set_operator),
                ));
            }
            if part.fetch().is_some_and(|f| !f.is_empty()) && !caps.supports_union_with_limit {
                return Err(RenderError::unsupported(
                    dialect.kind(),
                    format!("a row limit in a {} branch", group.set_operator),
                ));
            }
            if let QueryPart::Group(nested) = part {
                self.validate_query_group(nested)?;
            }
        }
        Ok(())
    }
}

/// Every leaf of a set operation must fetch-join the same associations in the
/// same order, otherwise the rows of the branches have different shapes.
fn validate_fetch_shape(group: &QueryGroup) -> RenderResult<()> {
    let mut leaves = Vec::new();
    collect_leaves(group, &mut leaves);
    let Some((first, rest)) = leaves.split_first() else {
        return Ok(());
    };
    let expected = first.fetch_shape();
    for (i, leaf) in rest.iter().enumerate() {
        let actual = leaf.fetch_shape();
        if actual != expected {
            return Err(RenderError::SetOperationShape(format!(
                "branch 1 fetches [{}] but branch {} fetches [{}]",
                expected.join(", "),
                i + 2,
                actual.join(", ")
            )));
        }
    }
    Ok(())
}

fn collect_leaves<'g>(group: &'g QueryGroup, leaves: &mut Vec<&'g QuerySpec>) {
    for part in &group.parts {
        match part {
            QueryPart::Spec(spec) => leaves.push(spec),
            QueryPart::Group(nested) => collect_leaves(nested, leaves),
        }
    }
}
