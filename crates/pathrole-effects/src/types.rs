// Effect metadata types
//
// Path roles, the operations they imply, and the parameter/effect records a
// model exposes for introspection.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Declared type of a parameter or return value.
///
/// Path roles are ordinary tags; whether a tag implies an effect is decided by
/// the [`EffectRegistry`](crate::EffectRegistry), not by the tag itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeTag {
    /// A path that must already exist when the call is made
    ExistingPath,
    /// A path the call is going to produce
    NewPath,
    /// No value
    Unit,
    /// Any other declared type, e.g. `str`, `int`, `Config`, or a custom role
    Named(String),
}

impl TypeTag {
    /// Tag from its declared name; built-in names map to their variants
    pub fn named(name: impl Into<String>) -> Self {
        TypeTag::from(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::ExistingPath => "ExistingPath",
            TypeTag::NewPath => "NewPath",
            TypeTag::Unit => "()",
            TypeTag::Named(name) => name,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for TypeTag {
    fn from(s: &str) -> Self {
        match s {
            "ExistingPath" => TypeTag::ExistingPath,
            "NewPath" => TypeTag::NewPath,
            "()" => TypeTag::Unit,
            other => TypeTag::Named(other.to_string()),
        }
    }
}

impl From<String> for TypeTag {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ExistingPath" | "NewPath" | "()" => TypeTag::from(s.as_str()),
            _ => TypeTag::Named(s),
        }
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Named(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for TypeTag {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TypeTag::from(s))
    }
}

/// The kind of filesystem access an effect declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Read,
    Write,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => write!(f, "Read"),
            Operation::Write => write!(f, "Write"),
        }
    }
}

/// What must hold about the bound path before the call is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistencePolicy {
    /// Something exists at the path
    MustExist,
    /// Nothing exists at the path
    MustNotExist,
    /// The containing directory exists; the path itself may or may not
    ParentMustExist,
}

impl fmt::Display for ExistencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExistencePolicy::MustExist => write!(f, "MustExist"),
            ExistencePolicy::MustNotExist => write!(f, "MustNotExist"),
            ExistencePolicy::ParentMustExist => write!(f, "ParentMustExist"),
        }
    }
}

/// A declared filesystem effect tied to one parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Effect {
    /// Read or write
    pub operation: Operation,
    /// Name of the parameter whose bound value is the path
    pub path_param: String,
    /// Precondition checked before every call
    pub policy: ExistencePolicy,
}

impl Effect {
    pub fn new(
        operation: Operation,
        path_param: impl Into<String>,
        policy: ExistencePolicy,
    ) -> Self {
        Self {
            operation,
            path_param: path_param.into(),
            policy,
        }
    }

    /// Read of an existing resource
    pub fn read(path_param: impl Into<String>) -> Self {
        Self::new(Operation::Read, path_param, ExistencePolicy::MustExist)
    }

    /// Write of a resource that must not exist yet
    pub fn write(path_param: impl Into<String>) -> Self {
        Self::new(Operation::Write, path_param, ExistencePolicy::MustNotExist)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.operation, self.path_param, self.policy)
    }
}

/// How an argument binds to a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Bound by position or by keyword
    Positional,
    /// Bound by keyword only
    KeywordOnly,
    /// Collects surplus positional arguments
    VarPositional,
    /// Collects surplus keyword arguments
    VarKeyword,
}

impl ParamKind {
    pub fn is_variadic(self) -> bool {
        matches!(self, ParamKind::VarPositional | ParamKind::VarKeyword)
    }
}

/// One declared parameter of the wrapped callable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub declared_type: TypeTag,
    pub kind: ParamKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Parameter {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            ParamKind::VarPositional => "*",
            ParamKind::VarKeyword => "**",
            _ => "",
        };
        write!(f, "{}{}: {}", prefix, self.name, self.declared_type)?;
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}
