//! SQL dialects.
//!
//! A [`Dialect`] is the aggregation root handed to the translator: it owns
//! the function registry, the limit strategy and the capability flags of one
//! target database. It is built once and only read afterwards, so a single
//! instance can serve concurrent translations.

pub mod ansi;
pub mod capabilities;
pub mod derby;
pub mod limit;
pub mod mysql;
pub mod postgres;
pub mod singlestore;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ast::Literal;
use crate::error::{RenderError, RenderResult};
use crate::function::{FunctionRegistry, FunctionRenderer};

pub use capabilities::{
    CapabilityOverrides, DialectCapabilities, ParameterMarker, SelectItemReferenceStrategy,
};
pub use limit::LimitHandler;

/// SQL reserved words that must be quoted when used as identifiers.
const RESERVED_WORDS: &[&str] = &[
    "order", "group", "user", "table", "select", "from", "where", "join",
    "left", "right", "inner", "outer", "on", "and", "or", "not", "null",
    "true", "false", "limit", "offset", "as", "in", "is", "like", "between",
    "having", "union", "all", "distinct", "case", "when", "then", "else", "end",
    "create", "alter", "drop", "insert", "update", "delete", "index", "key",
    "primary", "foreign", "references", "default", "constraint", "check",
    "fetch", "rows", "values", "set", "intersect", "except", "any", "some",
];

/// Whether an identifier has to be quoted to survive the SQL parser.
pub fn needs_quoting(name: &str) -> bool {
    let lower = name.to_lowercase();
    RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
        || name.chars().next().is_some_and(|c| c.is_numeric())
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Ansi,
    Postgres,
    MySql,
    SingleStore,
    Derby,
}

impl DialectKind {
    pub const ALL: [DialectKind; 5] = [
        DialectKind::Ansi,
        DialectKind::Postgres,
        DialectKind::MySql,
        DialectKind::SingleStore,
        DialectKind::Derby,
    ];

    pub fn profile(&self) -> Box<dyn DialectProfile> {
        match self {
            DialectKind::Ansi => Box::new(ansi::AnsiProfile),
            DialectKind::Postgres => Box::new(postgres::PostgresProfile),
            DialectKind::MySql => Box::new(mysql::MySqlProfile),
            DialectKind::SingleStore => Box::new(singlestore::SingleStoreProfile),
            DialectKind::Derby => Box::new(derby::DerbyProfile),
        }
    }
}

impl std::fmt::Display for DialectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialectKind::Ansi => write!(f, "ansi"),
            DialectKind::Postgres => write!(f, "postgres"),
            DialectKind::MySql => write!(f, "mysql"),
            DialectKind::SingleStore => write!(f, "singlestore"),
            DialectKind::Derby => write!(f, "derby"),
        }
    }
}

impl FromStr for DialectKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ansi" | "standard" => Ok(DialectKind::Ansi),
            "postgres" | "postgresql" | "pg" => Ok(DialectKind::Postgres),
            "mysql" => Ok(DialectKind::MySql),
            "singlestore" | "memsql" => Ok(DialectKind::SingleStore),
            "derby" => Ok(DialectKind::Derby),
            other => Err(RenderError::Config(format!(
                "Unknown dialect '{}'. Expected one of: ansi, postgres, mysql, singlestore, derby",
                other
            ))),
        }
    }
}

/// Per-database syntax profile. One implementation per [`DialectKind`].
pub trait DialectProfile: Send + Sync {
    /// Quote an identifier.
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "true" } else { "false" }
    }

    /// Temporal literal, e.g. `date '2024-01-01'`.
    fn temporal_literal(&self, keyword: &str, text: &str) -> String {
        format!("{} '{}'", keyword, text)
    }

    fn capabilities(&self) -> DialectCapabilities;

    fn limit_handler(&self) -> LimitHandler;

    /// Register this dialect's function renderers.
    fn register_functions(&self, registry: &mut FunctionRegistry, caps: &DialectCapabilities);
}

/// A fully configured dialect: profile, capabilities and function registry.
pub struct Dialect {
    kind: DialectKind,
    profile: Box<dyn DialectProfile>,
    capabilities: DialectCapabilities,
    functions: FunctionRegistry,
}

impl Dialect {
    /// Build a dialect with its default capabilities.
    pub fn new(kind: DialectKind) -> Self {
        let capabilities = kind.profile().capabilities();
        Self::with_capabilities(kind, capabilities)
    }

    /// Build a dialect with explicit capabilities. Function renderers are
    /// configured from these capabilities once, here.
    pub fn with_capabilities(kind: DialectKind, capabilities: DialectCapabilities) -> Self {
        let profile = kind.profile();
        let mut functions = FunctionRegistry::new();
        profile.register_functions(&mut functions, &capabilities);
        tracing::debug!(dialect = %kind, functions = functions.len(), "Dialect initialized");
        Self {
            kind,
            profile,
            capabilities,
            functions,
        }
    }

    /// Build a dialect applying configuration overrides to the defaults.
    pub fn with_overrides(kind: DialectKind, overrides: &CapabilityOverrides) -> Self {
        let mut capabilities = kind.profile().capabilities();
        overrides.apply(&mut capabilities);
        Self::with_capabilities(kind, capabilities)
    }

    /// Contribute a function renderer, replacing any registered under `name`.
    /// Only possible before the dialect is shared.
    pub fn register_function(&mut self, name: &str, renderer: impl FunctionRenderer + 'static) {
        self.functions.register(name, renderer);
    }

    pub fn kind(&self) -> DialectKind {
        self.kind
    }

    pub fn capabilities(&self) -> &DialectCapabilities {
        &self.capabilities
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn limit_handler(&self) -> LimitHandler {
        self.profile.limit_handler()
    }

    pub fn quote_identifier(&self, name: &str) -> String {
        self.profile.quote_identifier(name)
    }

    /// The identifier as it must appear in SQL: quoted only when required.
    pub fn render_identifier(&self, name: &str) -> String {
        if needs_quoting(name) {
            self.quote_identifier(name)
        } else {
            name.to_string()
        }
    }

    /// SQL text of a literal in this dialect.
    pub fn render_literal(&self, literal: &Literal) -> RenderResult<String> {
        let rendered = match literal {
            Literal::Null => "null".to_string(),
            Literal::Boolean(b) => self.profile.bool_literal(*b).to_string(),
            Literal::Integer(n) => n.to_string(),
            Literal::Float(n) if !n.is_finite() => {
                return Err(RenderError::definition(format!(
                    "Float literal {} has no SQL representation",
                    n
                )));
            }
            Literal::Float(n) => n.to_string(),
            Literal::String(s) => format!("'{}'", s.replace('\'', "''")),
            Literal::Date(d) => self
                .profile
                .temporal_literal("date", &d.format("%Y-%m-%d").to_string()),
            Literal::Time(t) => self
                .profile
                .temporal_literal("time", &t.format("%H:%M:%S").to_string()),
            Literal::Timestamp(ts) => self
                .profile
                .temporal_literal("timestamp", &ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
        };
        Ok(rendered)
    }
}

impl std::fmt::Debug for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dialect")
            .field("kind", &self.kind)
            .field("capabilities", &self.capabilities)
            .field("functions", &self.functions.len())
            .finish()
    }
}
