//! Function renderers and the per-dialect registry.
//!
//! Every function call in the AST is rendered by a [`FunctionRenderer`]
//! looked up by name in the dialect's [`FunctionRegistry`]. A renderer either
//! emits the native syntax, emulates the function with other primitives, or
//! fails when no faithful emulation exists for the given arguments.

pub mod json;
pub mod standard;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::ast::{Expression, FunctionCall, JsonNullBehavior, Predicate, SortSpecification, SqlAstNode};
use crate::error::{RenderError, RenderResult};
use crate::translator::{Clause, SqlAppender, SqlAstTranslator};

pub use json::{
    JsonArrayAggFunction, JsonArrayInsertFunction, MySqlJsonArrayAggFunction,
    PostgresJsonArrayInsertFunction, SingleStoreJsonArrayInsertFunction,
};
pub use standard::{AggregateFunction, ListaggFunction, ListaggStyle, NamedFunction};

/// Render contract for one function on one dialect.
///
/// Renderers hold only fixed configuration and are shared read-only across
/// translations.
pub trait FunctionRenderer: Send + Sync + fmt::Debug {
    /// Accepted argument count, checked before [`render`](Self::render).
    fn arity(&self) -> Arity;

    fn render<'a>(
        &self,
        call: &'a FunctionCall,
        translator: &mut SqlAstTranslator<'a>,
    ) -> RenderResult<()>;
}

/// Inclusive bounds on the number of arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    pub const fn at_least(n: usize) -> Self {
        Self { min: n, max: None }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }

    /// Fail with a structural error when `count` is out of range.
    pub fn check(&self, function: &str, count: usize) -> RenderResult<()> {
        if self.accepts(count) {
            return Ok(());
        }
        Err(RenderError::ArgumentCount {
            function: function.to_string(),
            expected: self.to_string(),
            actual: count,
        })
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "exactly {}", max),
            Some(max) => write!(f, "between {} and {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// Name -> renderer map owned by a [`Dialect`](crate::dialect::Dialect).
#[derive(Default, Clone)]
pub struct FunctionRegistry {
    renderers: HashMap<String, Arc<dyn FunctionRenderer>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the renderer for `name`.
    pub fn register(&mut self, name: &str, renderer: impl FunctionRenderer + 'static) {
        self.renderers.insert(name.to_lowercase(), Arc::new(renderer));
    }

    /// Register a passthrough function rendered as `sql_name(args)`.
    pub fn register_named(&mut self, name: &str, sql_name: &str, arity: Arity) {
        self.register(name, NamedFunction::new(sql_name, arity));
    }

    /// Register an aggregate; `native_filter` selects `filter (where ..)`
    /// over the case-wrapper emulation.
    pub fn register_aggregate(&mut self, name: &str, arity: Arity, native_filter: bool) {
        self.register(name, AggregateFunction::new(name, arity, native_filter));
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn FunctionRenderer>> {
        self.renderers.remove(&name.to_lowercase())
    }

    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn FunctionRenderer>> {
        self.renderers.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.renderers.contains_key(&name.to_lowercase())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

/// The `index`th argument, or a structural error.
pub(crate) fn argument<'a>(call: &'a FunctionCall, index: usize) -> RenderResult<&'a SqlAstNode> {
    call.arguments.get(index).ok_or_else(|| {
        RenderError::definition(format!(
            "Function '{}' is missing argument {}",
            call.name,
            index + 1
        ))
    })
}

/// The `index`th argument as a plain expression.
pub(crate) fn expression_argument<'a>(
    call: &'a FunctionCall,
    index: usize,
) -> RenderResult<&'a Expression> {
    match argument(call, index)? {
        SqlAstNode::Expression(expression) => Ok(expression),
        other => Err(RenderError::definition(format!(
            "Function '{}' expects an expression as argument {}, got {:?}",
            call.name,
            index + 1,
            other
        ))),
    }
}

/// The explicit null behavior argument, if any.
pub(crate) fn json_null_behavior(call: &FunctionCall) -> Option<JsonNullBehavior> {
    call.arguments.iter().find_map(|node| match node {
        SqlAstNode::JsonNullBehavior(behavior) => Some(*behavior),
        _ => None,
    })
}

/// Fail if a function that does not aggregate was given aggregate clauses.
pub(crate) fn reject_aggregate_clauses(call: &FunctionCall) -> RenderResult<()> {
    if call.filter.is_some() {
        return Err(RenderError::definition(format!(
            "Function '{}' does not accept a filter clause",
            call.name
        )));
    }
    if !call.within_group.is_empty() {
        return Err(RenderError::definition(format!(
            "Function '{}' does not accept a within group clause",
            call.name
        )));
    }
    Ok(())
}

/// Comma-separated arguments, skipping null-behavior markers.
pub(crate) fn render_arguments<'a>(
    call: &'a FunctionCall,
    translator: &mut SqlAstTranslator<'a>,
) -> RenderResult<()> {
    let mut first = true;
    for node in &call.arguments {
        if matches!(node, SqlAstNode::JsonNullBehavior(_)) {
            continue;
        }
        if !first {
            translator.append_char(',');
        }
        translator.render_node(node)?;
        first = false;
    }
    Ok(())
}

/// `order by a,b` rendered under [`Clause::WithinGroup`]. Emits nothing
/// for an empty list.
pub(crate) fn render_ordering<'a>(
    sort: &'a [SortSpecification],
    translator: &mut SqlAstTranslator<'a>,
) -> RenderResult<()> {
    if sort.is_empty() {
        return Ok(());
    }
    translator.with_clause(Clause::WithinGroup, |t| {
        t.append_sql("order by ");
        for (i, spec) in sort.iter().enumerate() {
            if i > 0 {
                t.append_char(',');
            }
            t.render_sort_specification(spec)?;
        }
        Ok(())
    })
}

/// ` filter (where p)`
pub(crate) fn render_filter_clause<'a>(
    filter: &'a Predicate,
    translator: &mut SqlAstTranslator<'a>,
) -> RenderResult<()> {
    translator.append_sql(" filter (where ");
    translator.with_clause(Clause::Where, |t| t.render_predicate(filter))?;
    translator.append_char(')');
    Ok(())
}

/// `case when <filter> then <value> else null end`, the filter rendered
/// under [`Clause::Where`].
pub(crate) fn render_case_filtered<'a, F>(
    filter: &'a Predicate,
    translator: &mut SqlAstTranslator<'a>,
    value: F,
) -> RenderResult<()>
where
    F: FnOnce(&mut SqlAstTranslator<'a>) -> RenderResult<()>,
{
    translator.append_sql("case when ");
    translator.with_clause(Clause::Where, |t| t.render_predicate(filter))?;
    translator.append_sql(" then ");
    value(translator)?;
    translator.append_sql(" else null end");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_bounds() {
        assert!(Arity::exactly(2).accepts(2));
        assert!(!Arity::exactly(2).accepts(3));
        assert!(Arity::at_least(1).accepts(9));
        assert!(!Arity::between(1, 2).accepts(0));
        assert_eq!(Arity::between(1, 2).to_string(), "between 1 and 2");
    }

    #[test]
    fn test_arity_error_message() {
        let err = Arity::exactly(3).check("json_array_insert", 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Function 'json_array_insert' expects exactly 3 argument(s), but 2 were given"
        );
    }

    #[test]
    fn test_registry_is_case_insensitive() {
        let mut registry = FunctionRegistry::new();
        registry.register_named("Upper", "upper", Arity::exactly(1));
        assert!(registry.contains("UPPER"));
        assert!(registry.resolve("upper").is_some());
        assert!(registry.remove("upper").is_some());
        assert!(registry.is_empty());
    }
}
