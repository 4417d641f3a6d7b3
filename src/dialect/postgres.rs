//! PostgreSQL profile.

use crate::dialect::ansi::register_common_functions;
use crate::dialect::{DialectCapabilities, DialectProfile, LimitHandler};
use crate::function::{
    Arity, FunctionRegistry, JsonArrayAggFunction, ListaggFunction, ListaggStyle,
    PostgresJsonArrayInsertFunction,
};

pub struct PostgresProfile;

impl DialectProfile for PostgresProfile {
    fn capabilities(&self) -> DialectCapabilities {
        DialectCapabilities {
            supports_case_insensitive_like: true,
            ..Default::default()
        }
    }

    fn limit_handler(&self) -> LimitHandler {
        LimitHandler::LimitOffset
    }

    fn register_functions(&self, registry: &mut FunctionRegistry, caps: &DialectCapabilities) {
        register_common_functions(registry, caps);
        registry.register_named("length", "length", Arity::exactly(1));
        registry.register(
            "listagg",
            ListaggFunction::new(ListaggStyle::StringAgg, caps.supports_aggregate_filter),
        );
        registry.register(
            "json_arrayagg",
            JsonArrayAggFunction::new(caps.supports_aggregate_filter),
        );
        registry.register("json_array_insert", PostgresJsonArrayInsertFunction::new());
    }
}
