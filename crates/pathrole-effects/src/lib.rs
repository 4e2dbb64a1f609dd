//! Declared filesystem effects for plain callables.
//!
//! A callable's parameters are tagged with path roles ([`TypeTag::ExistingPath`],
//! [`TypeTag::NewPath`], or custom roles from the [`EffectRegistry`]). The
//! [`ModelBuilder`] turns that signature into an [`EffectModel`] whose effects can
//! be inspected, and whose [`call`](EffectModel::call) checks every declared
//! precondition against the filesystem before delegating. When a check fails the
//! callable is not invoked.
//!
//! The engine never performs the I/O itself and does not isolate or roll back
//! what the callable does once it runs.

pub mod binding;
pub mod builder;
pub mod config;
pub mod logging;
pub mod model;
pub mod probe;
pub mod registry;
pub mod types;
pub mod validator;
pub mod value;

pub use binding::{Arguments, BoundArguments};
pub use builder::ModelBuilder;
pub use config::{EffectConfig, LoggingConfig, RegistryConfig, RoleConfig, WritePolicy};
pub use model::{EffectModel, ModelDescription};
pub use probe::{FsProbe, InMemoryProbe, ResourceProbe};
pub use registry::{EffectRegistry, RegistryEntry};
pub use types::{Effect, ExistencePolicy, Operation, ParamKind, Parameter, TypeTag};
pub use validator::EffectValidator;
pub use value::Value;

pub use pathrole_error::{
    CallError, ConfigurationError, EffectError, EffectViolation, ErrorCode, ErrorDomain,
    PathRoleError, ViolationKind,
};
