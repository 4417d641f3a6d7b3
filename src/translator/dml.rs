//! Insert, update and delete statements.

use crate::ast::{DeleteStatement, InsertSource, InsertStatement, UpdateStatement};
use crate::error::{RenderError, RenderResult};
use crate::translator::{Clause, SqlAppender, SqlAstTranslator};

impl<'a> SqlAstTranslator<'a> {
    pub(crate) fn render_insert(&mut self, insert: &'a InsertStatement) -> RenderResult<()> {
        self.with_clause(Clause::Insert, |t| {
            t.append_sql("insert into ");
            t.append_identifier(&insert.target.name, false);
            if !insert.columns.is_empty() {
                t.append_sql(" (");
                for (i, column) in insert.columns.iter().enumerate() {
                    if i > 0 {
                        t.append_char(',');
                    }
                    t.append_identifier(&column.column, column.quoted);
                }
                t.append_char(')');
            }
            Ok(())
        })?;

        match &insert.source {
            InsertSource::Values(rows) => {
                if rows.is_empty() {
                    return Err(RenderError::definition("Insert without any values row"));
                }
                if let Some(row) = rows
                    .iter()
                    .find(|row| !insert.columns.is_empty() && row.len() != insert.columns.len())
                {
                    return Err(RenderError::definition(format!(
                        "Insert into {} lists {} columns but a values row has {} expressions",
                        insert.target.name,
                        insert.columns.len(),
                        row.len()
                    )));
                }
                self.append_sql(" values ");
                self.with_clause(Clause::Values, |t| {
                    for (i, row) in rows.iter().enumerate() {
                        if i > 0 {
                            t.append_char(',');
                        }
                        t.append_char('(');
                        t.render_expression_list(row)?;
                        t.append_char(')');
                    }
                    Ok(())
                })
            }
            InsertSource::Query(query) => {
                self.append_char(' ');
                self.render_query_part(query)
            }
        }
    }

    pub(crate) fn render_update(&mut self, update: &'a UpdateStatement) -> RenderResult<()> {
        if update.assignments.is_empty() {
            return Err(RenderError::definition(format!(
                "Update of {} without assignments",
                update.target.name
            )));
        }
        self.with_clause(Clause::Update, |t| {
            t.append_sql("update ");
            t.render_table_reference(&update.target);
            Ok(())
        })?;

        self.append_sql(" set ");
        self.with_clause(Clause::Set, |t| {
            for (i, assignment) in update.assignments.iter().enumerate() {
                if i > 0 {
                    t.append_char(',');
                }
                t.append_identifier(&assignment.column.column, assignment.column.quoted);
                t.append_char('=');
                t.render_expression(&assignment.value)?;
            }
            Ok(())
        })?;

        if let Some(predicate) = &update.where_clause {
            self.append_sql(" where ");
            self.with_clause(Clause::Where, |t| t.render_predicate(predicate))?;
        }
        Ok(())
    }

    pub(crate) fn render_delete(&mut self, delete: &'a DeleteStatement) -> RenderResult<()> {
        self.with_clause(Clause::Delete, |t| {
            t.append_sql("delete from ");
            t.render_table_reference(&delete.target);
            Ok(())
        })?;

        if let Some(predicate) = &delete.where_clause {
            self.append_sql(" where ");
            self.with_clause(Clause::Where, |t| t.render_predicate(predicate))?;
        }
        Ok(())
    }
}
