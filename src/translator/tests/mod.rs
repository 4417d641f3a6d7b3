//! Translator test modules.
//!
//! - `select`: query specs, predicates, sorting, limits, dialect differences
//! - `set_ops`: set operations, fetch-shape and limit composition rules
//! - `dml`: insert, update, delete
//! - `clause`: clause stack discipline as seen by function renderers

mod select;

use crate::ast::Statement;
use crate::dialect::{Dialect, DialectCapabilities, DialectKind};
use crate::error::RenderResult;
use crate::translator::{JdbcOperation, SqlAstTranslator};

fn render(kind: DialectKind, statement: impl Into<Statement>) -> RenderResult<JdbcOperation> {
    let dialect = Dialect::new(kind);
    let statement = statement.into();
    SqlAstTranslator::new(&dialect).translate(&statement)
}

fn sql(kind: DialectKind, statement: impl Into<Statement>) -> String {
    render(kind, statement).unwrap().sql
}

/// Dialect defaults adjusted by `configure`.
fn dialect_with(kind: DialectKind, configure: impl FnOnce(&mut DialectCapabilities)) -> Dialect {
    let mut caps = kind.profile().capabilities();
    configure(&mut caps);
    Dialect::with_capabilities(kind, caps)
}
