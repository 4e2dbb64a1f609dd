// Effect model
//
// The validated wrapper: parameter, effect and return metadata plus the
// callable. Every call binds, validates and only then delegates.

use std::fmt;

use pathrole_error::{CallError, ConfigResult, EffectResult, EffectViolation};
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, warn};

use crate::binding::{bind, Arguments, BoundArguments};
use crate::types::{Effect, Parameter, TypeTag};
use crate::validator::EffectValidator;

/// Immutable, introspectable wrapper around a callable with declared path effects.
///
/// Built by [`ModelBuilder`](crate::ModelBuilder). Holds no per-call state, so one
/// model can serve any number of calls, from any number of threads when `F` is
/// `Sync`. Validation and the callable's own I/O are not atomic: a path can
/// change between the check and the callable's access.
pub struct EffectModel<F> {
    name: String,
    parameters: Vec<Parameter>,
    effects: Vec<Effect>,
    return_type: TypeTag,
    validator: EffectValidator,
    underlying: F,
}

impl<F> EffectModel<F> {
    pub(crate) fn new(
        name: String,
        parameters: Vec<Parameter>,
        effects: Vec<Effect>,
        return_type: TypeTag,
        validator: EffectValidator,
        underlying: F,
    ) -> Self {
        Self {
            name,
            parameters,
            effects,
            return_type,
            validator,
            underlying,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters, in declaration order
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Declared effects, in the order of their parameters
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn return_type(&self) -> &TypeTag {
        &self.return_type
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// The wrapped callable, for calls that bypass validation
    pub fn underlying(&self) -> &F {
        &self.underlying
    }

    /// Bind `args` to the parameter list without checking effects
    pub fn bind(&self, args: &Arguments) -> ConfigResult<BoundArguments> {
        bind(&self.parameters, args)
    }

    /// Bind and validate without calling; returns what the callable would receive.
    pub fn check(&self, args: &Arguments) -> EffectResult<BoundArguments> {
        let bound = self.bind(args)?;
        self.validator.validate(&self.effects, &bound)?;
        Ok(bound)
    }

    /// Bind and report every violated precondition instead of only the first.
    pub fn diagnose(&self, args: &Arguments) -> EffectResult<Vec<EffectViolation>> {
        let bound = self.bind(args)?;
        self.validator.collect_violations(&self.effects, &bound)
    }

    /// Serializable snapshot of the model's metadata
    pub fn describe(&self) -> ModelDescription {
        ModelDescription {
            name: self.name.clone(),
            parameters: self.parameters.clone(),
            effects: self.effects.clone(),
            return_type: self.return_type.clone(),
        }
    }

    /// Bind, validate, then delegate.
    ///
    /// If binding or validation fails the callable is not invoked and the error
    /// is returned as [`CallError::Refused`]. Otherwise the callable's result is
    /// returned as-is, its error wrapped in [`CallError::Callable`].
    pub fn call<R, E>(&self, args: Arguments) -> Result<R, CallError<E>>
    where
        F: Fn(&BoundArguments) -> Result<R, E>,
    {
        let span = debug_span!("effect_call", model = %self.name);
        let _enter = span.enter();

        let bound = match self.check(&args) {
            Ok(bound) => bound,
            Err(err) => {
                warn!(model = %self.name, error = %err, "call refused");
                return Err(CallError::Refused(err));
            }
        };

        debug!(model = %self.name, effects = self.effects.len(), "preconditions hold, delegating");
        (self.underlying)(&bound).map_err(CallError::Callable)
    }
}

impl<F> fmt::Debug for EffectModel<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectModel")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("effects", &self.effects)
            .field("return_type", &self.return_type)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

/// Metadata of an [`EffectModel`], detached from the callable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescription {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub effects: Vec<Effect>,
    pub return_type: TypeTag,
}

impl ModelDescription {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ModelDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "Parameters:")?;
        for param in &self.parameters {
            writeln!(f, " - {}", param)?;
        }
        writeln!(f, "Effects:")?;
        for effect in &self.effects {
            writeln!(
                f,
                " - Operation: {}, Path Parameter: {}",
                effect.operation, effect.path_param
            )?;
        }
        write!(f, "Return type: {}", self.return_type)
    }
}
