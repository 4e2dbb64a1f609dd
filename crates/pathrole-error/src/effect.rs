// Effect error types
// Precondition violations found at call time, and the umbrella error for a
// refused call

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::{ConfigurationError, ErrorCode, ErrorDomain, PathRoleError};

/// Effect error codes
pub mod codes {
    use crate::ErrorCode;

    // Violation codes start with 2000
    pub const MISSING_INPUT: ErrorCode = ErrorCode(2001);
    pub const CONFLICT: ErrorCode = ErrorCode(2002);
    pub const MISSING_PARENT: ErrorCode = ErrorCode(2003);

    // I/O codes start with 3000
    pub const EXISTENCE_QUERY_FAILED: ErrorCode = ErrorCode(3001);
}

/// What went wrong with a declared effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A read target does not exist
    MissingInput,
    /// A write target already exists
    Conflict,
    /// A write target's containing directory does not exist
    MissingParent,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::MissingInput => write!(f, "missing input"),
            ViolationKind::Conflict => write!(f, "conflict"),
            ViolationKind::MissingParent => write!(f, "missing parent directory"),
        }
    }
}

/// A declared precondition that does not hold against the filesystem
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} for parameter `{path_param}`: {}", .path.display())]
pub struct EffectViolation {
    pub kind: ViolationKind,
    pub path_param: String,
    pub path: PathBuf,
}

impl EffectViolation {
    pub fn new(
        kind: ViolationKind,
        path_param: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind,
            path_param: path_param.into(),
            path: path.into(),
        }
    }

    pub fn missing_input(path_param: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(ViolationKind::MissingInput, path_param, path)
    }

    pub fn conflict(path_param: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(ViolationKind::Conflict, path_param, path)
    }

    pub fn missing_parent(path_param: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(ViolationKind::MissingParent, path_param, path)
    }
}

impl PathRoleError for EffectViolation {
    fn code(&self) -> ErrorCode {
        match self.kind {
            ViolationKind::MissingInput => codes::MISSING_INPUT,
            ViolationKind::Conflict => codes::CONFLICT,
            ViolationKind::MissingParent => codes::MISSING_PARENT,
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Effect
    }

    fn details(&self) -> Option<serde_json::Value> {
        Some(json!({
            "kind": self.kind,
            "path_param": self.path_param,
            "path": self.path.display().to_string(),
        }))
    }
}

/// Everything that makes the engine refuse a call before delegating.
#[derive(Error, Debug)]
pub enum EffectError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Violation(#[from] EffectViolation),

    /// The existence query itself failed; the resource is neither known
    /// missing nor known present.
    #[error("I/O error checking `{path_param}` at {}: {source}", .path.display())]
    Io {
        path_param: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EffectError {
    pub fn io(path_param: impl Into<String>, path: impl Into<PathBuf>, source: io::Error) -> Self {
        EffectError::Io {
            path_param: path_param.into(),
            path: path.into(),
            source,
        }
    }

    pub fn violation(&self) -> Option<&EffectViolation> {
        match self {
            EffectError::Violation(v) => Some(v),
            _ => None,
        }
    }

    pub fn configuration(&self) -> Option<&ConfigurationError> {
        match self {
            EffectError::Configuration(c) => Some(c),
            _ => None,
        }
    }

    /// Offending parameter name, when the error is tied to one
    pub fn path_param(&self) -> Option<&str> {
        match self {
            EffectError::Configuration(c) => c.parameter(),
            EffectError::Violation(v) => Some(v.path_param.as_str()),
            EffectError::Io { path_param, .. } => Some(path_param.as_str()),
        }
    }
}

impl PathRoleError for EffectError {
    fn code(&self) -> ErrorCode {
        match self {
            EffectError::Configuration(c) => c.code(),
            EffectError::Violation(v) => v.code(),
            EffectError::Io { .. } => codes::EXISTENCE_QUERY_FAILED,
        }
    }

    fn domain(&self) -> ErrorDomain {
        match self {
            EffectError::Configuration(c) => c.domain(),
            EffectError::Violation(v) => v.domain(),
            EffectError::Io { .. } => ErrorDomain::Io,
        }
    }

    fn is_transient(&self) -> bool {
        matches!(self, EffectError::Io { .. })
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            EffectError::Configuration(c) => c.details(),
            EffectError::Violation(v) => v.details(),
            EffectError::Io { path_param, path, source } => Some(json!({
                "path_param": path_param,
                "path": path.display().to_string(),
                "io_kind": source.kind().to_string(),
            })),
        }
    }
}

/// Convenient Result type for validation
pub type EffectResult<T> = Result<T, EffectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display() {
        let v = EffectViolation::conflict("output_path", "out.txt");
        assert_eq!(v.to_string(), "conflict for parameter `output_path`: out.txt");
    }

    #[test]
    fn test_effect_error_delegates_codes() {
        let err = EffectError::from(EffectViolation::missing_input("p", "a.txt"));
        assert_eq!(err.code(), codes::MISSING_INPUT);
        assert_eq!(err.domain(), ErrorDomain::Effect);
        assert_eq!(err.path_param(), Some("p"));
        assert!(err.violation().is_some());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_io_error_is_transient() {
        let source = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = EffectError::io("q", "/locked/out.txt", source);

        assert!(err.is_transient());
        assert_eq!(err.domain(), ErrorDomain::Io);
        assert_eq!(err.code(), codes::EXISTENCE_QUERY_FAILED);
        assert!(err.violation().is_none());
        assert!(std::error::Error::source(&err).is_some());
    }
}
