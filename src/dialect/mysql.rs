//! MySQL profile.

use crate::dialect::ansi::register_common_functions;
use crate::dialect::{DialectCapabilities, DialectProfile, LimitHandler};
use crate::function::{
    Arity, FunctionRegistry, JsonArrayInsertFunction, ListaggFunction, ListaggStyle,
    MySqlJsonArrayAggFunction,
};

/// Functions shared by MySQL and the MySQL-compatible SingleStore.
pub(crate) fn register_mysql_functions(registry: &mut FunctionRegistry, caps: &DialectCapabilities) {
    register_common_functions(registry, caps);
    registry.register_named("length", "char_length", Arity::exactly(1));
    registry.register("listagg", ListaggFunction::new(ListaggStyle::GroupConcat, false));
    registry.register("json_arrayagg", MySqlJsonArrayAggFunction::new());
    registry.register("json_array_insert", JsonArrayInsertFunction::new());
}

pub struct MySqlProfile;

impl DialectProfile for MySqlProfile {
    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn capabilities(&self) -> DialectCapabilities {
        DialectCapabilities {
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
    }
}
