//! # sqlrender
//!
//! Renders a dialect-agnostic SQL AST into dialect-specific SQL text plus
//! an ordered list of bind parameters, emulating functions a database lacks.
//!
//! ## Quick Example
//!
//! ```
//! use sqlrender::prelude::*;
//! use sqlrender::ast::builders::*;
//!
//! let statement: Statement = QuerySpec::new()
//!     .select(func("json_arrayagg", vec![arg(qualified("c", "val"))]))
//!     .from(table("item", "c"))
//!     .into();
//!
//! let dialect = Dialect::new(DialectKind::MySql);
//! let operation = sqlrender::translate(&statement, &dialect)?;
//! assert!(operation.sql.starts_with("select cast(concat('[',group_concat("));
//! # Ok::<(), sqlrender::RenderError>(())
//! ```
//!
//! ## Layout
//!
//! | Module       | Role                                              |
//! |--------------|---------------------------------------------------|
//! | `ast`        | Statement tree and builders                       |
//! | `translator` | Tree walk, clause stack, SQL appender             |
//! | `function`   | Function renderers and the per-dialect registry   |
//! | `dialect`    | Capabilities, limit strategies, dialect profiles  |
//! | `json_path`  | JSON path parsing for JSON function emulation     |
//! | `config`     | TOML configuration                                |

pub mod ast;
pub mod config;
pub mod dialect;
pub mod error;
pub mod function;
pub mod json_path;
pub mod translator;

pub use error::{RenderError, RenderResult};

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::RenderConfig;
    pub use crate::dialect::{Dialect, DialectCapabilities, DialectKind};
    pub use crate::error::*;
    pub use crate::function::{FunctionRegistry, FunctionRenderer};
    pub use crate::translator::{Clause, JdbcOperation, SqlAppender, SqlAstTranslator};
}

/// Translate `statement` for `dialect` with a fresh translator.
pub fn translate(
    statement: &ast::Statement,
    dialect: &dialect::Dialect,
) -> RenderResult<translator::JdbcOperation> {
    translator::SqlAstTranslator::new(dialect).translate(statement)
}
