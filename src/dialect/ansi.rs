//! Standard SQL profile, also the baseline the other dialects start from.

use crate::dialect::{DialectCapabilities, DialectProfile, LimitHandler};
use crate::function::{
    Arity, FunctionRegistry, JsonArrayAggFunction, JsonArrayInsertFunction, ListaggFunction,
    ListaggStyle,
};

/// Aggregates and scalar functions every dialect shares.
pub(crate) fn register_common_functions(registry: &mut FunctionRegistry, caps: &DialectCapabilities) {
    for aggregate in ["count", "sum", "avg", "min", "max"] {
        registry.register_aggregate(aggregate, Arity::exactly(1), caps.supports_aggregate_filter);
    }
    registry.register_named("coalesce", "coalesce", Arity::at_least(1));
    registry.register_named("nullif", "nullif", Arity::exactly(2));
    registry.register_named("upper", "upper", Arity::exactly(1));
    registry.register_named("lower", "lower", Arity::exactly(1));
    registry.register_named("abs", "abs", Arity::exactly(1));
    registry.register_named("concat", "concat", Arity::at_least(1));
}

pub struct AnsiProfile;

impl DialectProfile for AnsiProfile {
    fn capabilities(&self) -> DialectCapabilities {
        DialectCapabilities::default()
    }

    fn limit_handler(&self) -> LimitHandler {
        LimitHandler::OffsetFetch
    }

    fn register_functions(&self, registry: &mut FunctionRegistry, caps: &DialectCapabilities) {
        register_common_functions(registry, caps);
        registry.register_named("length", "character_length", Arity::exactly(1));
        registry.register(
            "listagg",
            ListaggFunction::new(ListaggStyle::Standard, caps.supports_aggregate_filter),
        );
        registry.register(
            "json_arrayagg",
            JsonArrayAggFunction::new(caps.supports_aggregate_filter),
        );
        registry.register("json_array_insert", JsonArrayInsertFunction::new());
    }
}
