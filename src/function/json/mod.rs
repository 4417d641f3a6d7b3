//! JSON function renderers.

mod array_agg;
mod array_insert;

pub use array_agg::{JsonArrayAggFunction, MySqlJsonArrayAggFunction};
pub use array_insert::{
    JsonArrayInsertFunction, PostgresJsonArrayInsertFunction, SingleStoreJsonArrayInsertFunction,
};

use crate::ast::FunctionCall;
use crate::error::{RenderError, RenderResult};
use crate::function::expression_argument;
use crate::json_path::{parse_json_path_elements, JsonPathElement};
use crate::translator::SqlAstTranslator;

/// Parse the JSON path passed as argument `index`. The path must be known
/// at render time: a string literal, or a parameter with a bound value.
pub(crate) fn path_argument<'a>(
    call: &'a FunctionCall,
    index: usize,
    translator: &SqlAstTranslator<'a>,
) -> RenderResult<(String, Vec<JsonPathElement>)> {
    let expression = expression_argument(call, index)?;
    let literal = translator.literal_value(expression)?;
    let path = literal
        .as_str()
        .ok_or_else(|| RenderError::NotALiteral(format!("the json path of {}", call.name)))?
        .to_string();
    let elements = parse_json_path_elements(&path)?;
    tracing::trace!(function = %call.name, path = %path, elements = elements.len(), "Parsed json path");
    Ok((path, elements))
}
