// Configuration error types
// Programming errors: signatures the engine cannot address by name, argument
// lists that do not bind, and path parameters bound to non-path values

use serde_json::json;
use thiserror::Error;

use crate::{ErrorCode, ErrorDomain, PathRoleError};

/// Configuration error codes
pub mod codes {
    use crate::ErrorCode;

    // Signature errors start with 1000
    pub const INVALID_PARAMETER_NAME: ErrorCode = ErrorCode(1001);
    pub const DUPLICATE_PARAMETER: ErrorCode = ErrorCode(1002);
    pub const VARIADIC_PATH_ROLE: ErrorCode = ErrorCode(1003);
    pub const NO_NAMED_PARAMETERS: ErrorCode = ErrorCode(1004);
    pub const INVALID_SIGNATURE_ORDER: ErrorCode = ErrorCode(1005);

    // Binding errors start with 1100
    pub const TOO_MANY_POSITIONAL: ErrorCode = ErrorCode(1101);
    pub const UNEXPECTED_ARGUMENT: ErrorCode = ErrorCode(1102);
    pub const DUPLICATE_ARGUMENT: ErrorCode = ErrorCode(1103);
    pub const MISSING_ARGUMENT: ErrorCode = ErrorCode(1104);

    // Path resolution errors start with 1200
    pub const UNBOUND_PATH_PARAMETER: ErrorCode = ErrorCode(1201);
    pub const NOT_A_PATH: ErrorCode = ErrorCode(1202);
}

/// A caller bug: raised while building a model or while binding and
/// resolving the arguments of one call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Parameter name is empty or not an identifier
    #[error("Invalid parameter name: {name:?}")]
    InvalidParameterName { name: String },

    /// Two parameters share a name
    #[error("Duplicate parameter: `{name}`")]
    DuplicateParameter { name: String },

    /// A variadic parameter was declared with a path role
    #[error("Variadic parameter `{name}` cannot carry path role `{tag}`")]
    VariadicPathRole { name: String, tag: String },

    /// Signature has parameters but none of them is individually named
    #[error("Signature declares only variadic parameters")]
    NoNamedParameters,

    /// Parameter kinds appear in an order no callable can have
    #[error("Invalid signature at `{name}`: {reason}")]
    InvalidSignatureOrder { name: String, reason: String },

    /// More positional arguments than positional parameters
    #[error("Expected at most {expected} positional arguments, got {got}")]
    TooManyPositional { expected: usize, got: usize },

    /// Keyword argument with no matching parameter
    #[error("Unexpected keyword argument `{name}`")]
    UnexpectedArgument { name: String },

    /// Parameter supplied both positionally and by keyword, or twice by keyword
    #[error("Multiple values for argument `{name}`")]
    DuplicateArgument { name: String },

    /// Required parameter not supplied
    #[error("Missing required argument `{name}`")]
    MissingArgument { name: String },

    /// Effect refers to a parameter with no bound value
    #[error("No value bound for path parameter `{name}`")]
    UnboundPathParameter { name: String },

    /// Bound value cannot be interpreted as a filesystem path
    #[error("Argument `{name}` is not a path (found {found})")]
    NotAPath { name: String, found: String },
}

impl ConfigurationError {
    /// Name of the offending parameter or argument, when there is one
    pub fn parameter(&self) -> Option<&str> {
        match self {
            ConfigurationError::InvalidParameterName { name }
            | ConfigurationError::DuplicateParameter { name }
            | ConfigurationError::VariadicPathRole { name, .. }
            | ConfigurationError::InvalidSignatureOrder { name, .. }
            | ConfigurationError::UnexpectedArgument { name }
            | ConfigurationError::DuplicateArgument { name }
            | ConfigurationError::MissingArgument { name }
            | ConfigurationError::UnboundPathParameter { name }
            | ConfigurationError::NotAPath { name, .. } => Some(name.as_str()),
            ConfigurationError::NoNamedParameters
            | ConfigurationError::TooManyPositional { .. } => None,
        }
    }

    pub fn not_a_path(name: impl Into<String>, found: impl Into<String>) -> Self {
        ConfigurationError::NotAPath {
            name: name.into(),
            found: found.into(),
        }
    }

    pub fn invalid_order(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigurationError::InvalidSignatureOrder {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl PathRoleError for ConfigurationError {
    fn code(&self) -> ErrorCode {
        use codes::*;
        match self {
            ConfigurationError::InvalidParameterName { .. } => INVALID_PARAMETER_NAME,
            ConfigurationError::DuplicateParameter { .. } => DUPLICATE_PARAMETER,
            ConfigurationError::VariadicPathRole { .. } => VARIADIC_PATH_ROLE,
            ConfigurationError::NoNamedParameters => NO_NAMED_PARAMETERS,
            ConfigurationError::InvalidSignatureOrder { .. } => INVALID_SIGNATURE_ORDER,
            ConfigurationError::TooManyPositional { .. } => TOO_MANY_POSITIONAL,
            ConfigurationError::UnexpectedArgument { .. } => UNEXPECTED_ARGUMENT,
            ConfigurationError::DuplicateArgument { .. } => DUPLICATE_ARGUMENT,
            ConfigurationError::MissingArgument { .. } => MISSING_ARGUMENT,
            ConfigurationError::UnboundPathParameter { .. } => UNBOUND_PATH_PARAMETER,
            ConfigurationError::NotAPath { .. } => NOT_A_PATH,
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Configuration
    }

    fn details(&self) -> Option<serde_json::Value> {
        self.parameter().map(|name| json!({ "parameter": name }))
    }
}

/// Convenient Result type for build and bind operations
pub type ConfigResult<T> = Result<T, ConfigurationError>;
