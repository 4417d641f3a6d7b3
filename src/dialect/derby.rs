//! Apache Derby profile.

use crate::dialect::ansi::register_common_functions;
use crate::dialect::{DialectCapabilities, DialectProfile, LimitHandler};
use crate::function::{Arity, FunctionRegistry};

pub struct DerbyProfile;

impl DialectProfile for DerbyProfile {
    /// Derby has no typed literal syntax, only conversion functions.
    fn temporal_literal(&self, keyword: &str, text: &str) -> String {
        format!("{}('{}')", keyword, text)
    }

    fn capabilities(&self) -> DialectCapabilities {
        DialectCapabilities {
            supports_aggregate_filter: false,
            requires_typed_parameters_in_select: true,
            ..Default::default()
        }
    }

    fn limit_handler(&self) -> LimitHandler {
        LimitHandler::OffsetFetch
    }

    fn register_functions(&self, registry: &mut FunctionRegistry, caps: &DialectCapabilities) {
        register_common_functions(registry, caps);
        registry.register_named("length", "length", Arity::exactly(1));
    }
}
