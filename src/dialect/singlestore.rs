//! SingleStore profile: MySQL syntax with a narrower feature set.

use crate::dialect::mysql::{register_mysql_functions, MySqlProfile};
use crate::dialect::{DialectCapabilities, DialectProfile, LimitHandler};
use crate::function::{
    AggregateFunction, Arity, FunctionRegistry, SingleStoreJsonArrayInsertFunction,
};

pub struct SingleStoreProfile;

impl DialectProfile for SingleStoreProfile {
    fn quote_identifier(&self, name: &str) -> String {
        MySqlProfile.quote_identifier(name)
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        MySqlProfile.bool_literal(value)
    }

    fn capabilities(&self) -> DialectCapabilities {
        DialectCapabilities {
            supports_union_with_limit: false,
            supports_subquery_quantifiers: false,
            supports_nulls_precedence: false,
            supports_aggregate_filter: false,
            ..Default::default()
        }
    }

    fn limit_handler(&self) -> LimitHandler {
        LimitHandler::MySqlLimit
    }

    fn register_functions(&self, registry: &mut FunctionRegistry, caps: &DialectCapabilities) {
        register_mysql_functions(registry, caps);
        // Native json_agg takes a single value; order by and null-on-null are rejected.
        registry.register(
            "json_arrayagg",
            AggregateFunction::new("json_agg", Arity::exactly(1), caps.supports_aggregate_filter),
        );
        registry.register("json_array_insert", SingleStoreJsonArrayInsertFunction::new());
    }
}
