// Pathrole Error Handling
// Central location for error types shared by the effect engine and its callers

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use thiserror;

mod call;
mod configuration;
mod effect;

pub use call::CallError;
pub use configuration::{ConfigResult, ConfigurationError};
pub use effect::{EffectError, EffectResult, EffectViolation, ViolationKind};

/// All error codes, grouped by domain
pub mod codes {
    pub use crate::configuration::codes::*;
    pub use crate::effect::codes::*;
}

/// Error domains, one per failure category of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDomain {
    /// Programming errors: bad signatures, bad bindings, non-path arguments
    Configuration,
    /// Precondition violations against filesystem state
    Effect,
    /// Existence queries that could not be answered
    Io,
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDomain::Configuration => write!(f, "configuration"),
            ErrorDomain::Effect => write!(f, "effect"),
            ErrorDomain::Io => write!(f, "io"),
        }
    }
}

/// Error code structure for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ErrorCode(pub u32);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Standard error message format for serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub code: ErrorCode,
    pub domain: ErrorDomain,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Base trait for all errors raised by the engine.
pub trait PathRoleError: StdError + Send + Sync + 'static {
    /// Numeric code, unique per variant.
    fn code(&self) -> ErrorCode;

    /// The category this error belongs to.
    fn domain(&self) -> ErrorDomain;

    /// Whether retrying the same call unchanged might succeed.
    fn is_transient(&self) -> bool {
        false
    }

    /// Structured details (offending parameter, path, ...), if any.
    fn details(&self) -> Option<serde_json::Value> {
        None
    }

    /// Render into the serializable message form.
    fn to_message(&self) -> ErrorMessage {
        ErrorMessage {
            code: self.code(),
            domain: self.domain(),
            message: self.to_string(),
            details: self.details(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_code_display_is_zero_padded() {
        assert_eq!(ErrorCode(7).to_string(), "0007");
        assert_eq!(ErrorCode(2001).to_string(), "2001");
    }

    #[test]
    fn test_message_carries_details() {
        let violation = EffectViolation::missing_input("input_path", PathBuf::from("missing.txt"));
        let message = violation.to_message();

        assert_eq!(message.domain, ErrorDomain::Effect);
        assert_eq!(message.code, effect::codes::MISSING_INPUT);

        let details = message.details.expect("violation details");
        assert_eq!(details["path_param"], "input_path");
        assert_eq!(details["path"], "missing.txt");
        assert_eq!(details["kind"], "missing_input");
    }

    #[test]
    fn test_message_serializes_without_empty_details() {
        let message = ConfigurationError::NoNamedParameters.to_message();
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["domain"], "configuration");
        assert!(json.get("details").is_none());
    }
}
