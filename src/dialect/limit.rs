//! Row-limit rendering strategies.

use crate::ast::FetchClause;
use crate::error::RenderResult;
use crate::translator::{Clause, SqlAppender, SqlAstTranslator};

/// Largest row count MySQL accepts; used when only an offset is given.
const MYSQL_MAX_ROWS: &str = "18446744073709551615";

/// How a dialect spells `offset` / `fetch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitHandler {
    /// ` limit n offset m`
    LimitOffset,
    /// ` limit n offset m`, with a max-rows limit when only an offset is given
    MySqlLimit,
    /// ` offset m rows fetch first n rows only`
    OffsetFetch,
}

impl LimitHandler {
    pub fn render<'a>(
        &self,
        fetch: &'a FetchClause,
        translator: &mut SqlAstTranslator<'a>,
    ) -> RenderResult<()> {
        match self {
            LimitHandler::LimitOffset => {
                if let Some(rows) = &fetch.fetch {
                    translator.with_clause(Clause::Fetch, |t| {
                        t.append_sql(" limit ");
                        t.render_expression(rows)
                    })?;
                }
                if let Some(offset) = &fetch.offset {
                    translator.with_clause(Clause::Offset, |t| {
                        t.append_sql(" offset ");
                        t.render_expression(offset)
                    })?;
                }
            }
            LimitHandler::MySqlLimit => {
                match &fetch.fetch {
                    Some(rows) => translator.with_clause(Clause::Fetch, |t| {
                        t.append_sql(" limit ");
                        t.render_expression(rows)
                    })?,
                    None if fetch.offset.is_some() => {
                        translator.append_sql(" limit ");
                        translator.append_sql(MYSQL_MAX_ROWS);
                    }
                    None => {}
                }
                if let Some(offset) = &fetch.offset {
                    translator.with_clause(Clause::Offset, |t| {
                        t.append_sql(" offset ");
                        t.render_expression(offset)
                    })?;
                }
            }
            LimitHandler::OffsetFetch => {
                if let Some(offset) = &fetch.offset {
                    translator.with_clause(Clause::Offset, |t| {
                        t.append_sql(" offset ");
                        t.render_expression(offset)?;
                        t.append_sql(" rows");
                        Ok(())
                    })?;
                }
                if let Some(rows) = &fetch.fetch {
                    translator.with_clause(Clause::Fetch, |t| {
                        t.append_sql(" fetch first ");
                        t.render_expression(rows)?;
                        t.append_sql(" rows only");
                        Ok(())
                    })?;
                }
            }
        }
        Ok(())
    }
}
