//! Capability flags consulted while rendering.

use serde::{Deserialize, Serialize};

/// How ORDER BY / GROUP BY refer to an item of the select list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectItemReferenceStrategy {
    /// Render the selected expression again.
    Expression,
    /// Refer to the item via its alias.
    Alias,
    /// Refer to the item via its position.
    #[default]
    Position,
}

/// Placeholder syntax for bind parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterMarker {
    /// `?`
    #[default]
    Question,
    /// `$1`, `$2`, ...
    Dollar,
    /// `:1`, `:2`, ...
    Colon,
}

impl ParameterMarker {
    /// Placeholder for the 1-based parameter `index`.
    pub fn render(&self, index: usize) -> String {
        match self {
            ParameterMarker::Question => "?".to_string(),
            ParameterMarker::Dollar => format!("${}", index),
            ParameterMarker::Colon => format!(":{}", index),
        }
    }
}

/// What a dialect can express natively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectCapabilities {
    /// A set operation may carry its own ORDER BY + row limit.
    pub supports_union_with_limit: bool,
    /// A set operation branch may carry its own ORDER BY / row limit.
    pub supports_order_by_in_subquery: bool,
    /// Subqueries may appear inside ORDER BY.
    pub supports_correlated_subquery_in_order_by: bool,
    /// `x > all (select ...)`, `any`, `some`.
    pub supports_subquery_quantifiers: bool,
    /// INTERSECT and EXCEPT.
    pub supports_intersect: bool,
    /// `nulls first` / `nulls last` in sort specifications.
    pub supports_nulls_precedence: bool,
    /// `filter (where ...)` on aggregates.
    pub supports_aggregate_filter: bool,
    /// Native `ilike`.
    pub supports_case_insensitive_like: bool,
    /// Untyped `?` in the select list is rejected, so wrap it in a cast.
    pub requires_typed_parameters_in_select: bool,
    pub select_item_reference_strategy: SelectItemReferenceStrategy,
    pub parameter_marker: ParameterMarker,
}

impl Default for DialectCapabilities {
    fn default() -> Self {
        Self {
            supports_union_with_limit: true,
            supports_order_by_in_subquery: true,
            supports_correlated_subquery_in_order_by: true,
            supports_subquery_quantifiers: true,
            supports_intersect: true,
            supports_nulls_precedence: true,
            supports_aggregate_filter: true,
            supports_case_insensitive_like: false,
            requires_typed_parameters_in_select: false,
            select_item_reference_strategy: SelectItemReferenceStrategy::Position,
            parameter_marker: ParameterMarker::Question,
        }
    }
}

/// Partial capabilities read from configuration; `None` keeps the dialect default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapabilityOverrides {
    pub supports_union_with_limit: Option<bool>,
    pub supports_order_by_in_subquery: Option<bool>,
    pub supports_correlated_subquery_in_order_by: Option<bool>,
    pub supports_subquery_quantifiers: Option<bool>,
    pub supports_intersect: Option<bool>,
    pub supports_nulls_precedence: Option<bool>,
    pub supports_aggregate_filter: Option<bool>,
    pub supports_case_insensitive_like: Option<bool>,
    pub requires_typed_parameters_in_select: Option<bool>,
    pub select_item_reference_strategy: Option<SelectItemReferenceStrategy>,
    pub parameter_marker: Option<ParameterMarker>,
}

impl CapabilityOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite every flag that is set.
    pub fn apply(&self, caps: &mut DialectCapabilities) {
        macro_rules! set {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field {
                    caps.$field = value;
                })*
            };
        }
        set!(
            supports_union_with_limit,
            supports_order_by_in_subquery,
            supports_correlated_subquery_in_order_by,
            supports_subquery_quantifiers,
            supports_intersect,
            supports_nulls_precedence,
            supports_aggregate_filter,
            supports_case_insensitive_like,
            requires_typed_parameters_in_select,
            select_item_reference_strategy,
            parameter_marker,
        );
    }
}
