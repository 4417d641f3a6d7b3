//! Error types for SQL AST rendering.

use thiserror::Error;

/// The main error type for translation and dialect setup.
///
/// Every variant is raised synchronously while a statement is being
/// translated. None of them are retryable: the caller either picks a
/// different dialect capability path or fails the query compilation.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The AST is structurally invalid (wrong argument shape, missing node).
    #[error("Query definition error: {0}")]
    QueryDefinition(String),

    /// A function was invoked with an argument count outside its contract.
    #[error("Function '{function}' expects {expected} argument(s), but {actual} were given")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// No renderer is registered for the function on this dialect.
    #[error("Function '{function}' is not registered for dialect {dialect}")]
    UnknownFunction { function: String, dialect: String },

    /// The requested combination of clauses cannot be emulated faithfully.
    #[error("{0}")]
    UnsupportedEmulation(String),

    /// A JSON path is malformed or has a shape the function cannot handle.
    #[error("{message}")]
    IllegalJsonPath { path: String, message: String },

    /// A JSON path refers to a passing parameter that was not supplied.
    #[error("JSON path [{path}] uses parameter [{parameter}] that is not passed")]
    JsonPathParameterNotPassed { path: String, parameter: String },

    /// The dialect lacks a capability the statement depends on.
    #[error("Dialect {dialect} does not support {feature}")]
    CapabilityMismatch { dialect: String, feature: String },

    /// Branches of a set operation disagree on their fetch-join shape.
    #[error("Set operation branches have incompatible fetch joins: {0}")]
    SetOperationShape(String),

    /// A compile-time literal was required but the node is not one.
    #[error("Expected a literal value for {0}")]
    NotALiteral(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Create a structural AST error.
    pub fn definition(message: impl Into<String>) -> Self {
        Self::QueryDefinition(message.into())
    }

    /// Create a capability mismatch error for the named dialect.
    pub fn unsupported(dialect: impl ToString, feature: impl Into<String>) -> Self {
        Self::CapabilityMismatch {
            dialect: dialect.to_string(),
            feature: feature.into(),
        }
    }

    /// Create an illegal JSON path error.
    pub fn json_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::IllegalJsonPath {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::unsupported("singlestore", "UNION combined with a row limit");
        assert_eq!(
            err.to_string(),
            "Dialect singlestore does not support UNION combined with a row limit"
        );
    }

    #[test]
    fn test_parameter_not_passed_display() {
        let err = RenderError::JsonPathParameterNotPassed {
            path: "$.a[$idx][0]".to_string(),
            parameter: "idx".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "JSON path [$.a[$idx][0]] uses parameter [idx] that is not passed"
        );
    }
}
