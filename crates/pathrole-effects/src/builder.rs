// Model builder
//
// Collects a callable's declared signature and derives its effects from the
// registry. Building is pure: no filesystem access happens here.

use std::collections::HashSet;
use std::sync::Arc;

use pathrole_error::{ConfigResult, ConfigurationError};
use tracing::debug;

use crate::model::EffectModel;
use crate::probe::ResourceProbe;
use crate::registry::EffectRegistry;
use crate::types::{Effect, ParamKind, Parameter, TypeTag};
use crate::validator::EffectValidator;
use crate::value::Value;

/// Declares a callable's signature and wraps it in an [`EffectModel`].
///
/// ```
/// use pathrole_effects::{EffectRegistry, ModelBuilder, TypeTag};
///
/// let registry = EffectRegistry::with_builtins();
/// let model = ModelBuilder::new("process_file", &registry)
///     .param("input_path", TypeTag::ExistingPath)
///     .param("output_path", TypeTag::NewPath)
///     .build(|_args: &pathrole_effects::BoundArguments| Ok::<(), std::io::Error>(()))
///     .unwrap();
///
/// assert_eq!(model.effects().len(), 2);
/// ```
pub struct ModelBuilder<'r> {
    name: String,
    registry: &'r EffectRegistry,
    parameters: Vec<Parameter>,
    return_type: TypeTag,
    validator: Option<EffectValidator>,
}

impl<'r> ModelBuilder<'r> {
    pub fn new(name: impl Into<String>, registry: &'r EffectRegistry) -> Self {
        Self {
            name: name.into(),
            registry,
            parameters: Vec::new(),
            return_type: TypeTag::Unit,
            validator: None,
        }
    }

    fn push(
        mut self,
        name: impl Into<String>,
        tag: impl Into<TypeTag>,
        kind: ParamKind,
        default: Option<Value>,
    ) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            declared_type: tag.into(),
            kind,
            default,
        });
        self
    }

    /// Positional-or-keyword parameter without default
    pub fn param(self, name: impl Into<String>, tag: impl Into<TypeTag>) -> Self {
        self.push(name, tag, ParamKind::Positional, None)
    }

    /// Positional-or-keyword parameter with default
    pub fn param_with_default(
        self,
        name: impl Into<String>,
        tag: impl Into<TypeTag>,
        default: impl Into<Value>,
    ) -> Self {
        self.push(name, tag, ParamKind::Positional, Some(default.into()))
    }

    /// Keyword-only parameter without default
    pub fn keyword_only(self, name: impl Into<String>, tag: impl Into<TypeTag>) -> Self {
        self.push(name, tag, ParamKind::KeywordOnly, None)
    }

    /// Keyword-only parameter with default
    pub fn keyword_only_with_default(
        self,
        name: impl Into<String>,
        tag: impl Into<TypeTag>,
        default: impl Into<Value>,
    ) -> Self {
        self.push(name, tag, ParamKind::KeywordOnly, Some(default.into()))
    }

    /// Parameter collecting surplus positional arguments
    pub fn var_positional(self, name: impl Into<String>, tag: impl Into<TypeTag>) -> Self {
        self.push(name, tag, ParamKind::VarPositional, None)
    }

    /// Parameter collecting surplus keyword arguments
    pub fn var_keyword(self, name: impl Into<String>, tag: impl Into<TypeTag>) -> Self {
        self.push(name, tag, ParamKind::VarKeyword, None)
    }

    /// Declared return type; `Unit` if never called
    pub fn returns(mut self, tag: impl Into<TypeTag>) -> Self {
        self.return_type = tag.into();
        self
    }

    /// Answer existence queries through `probe` instead of the real filesystem
    pub fn probe(mut self, probe: Arc<dyn ResourceProbe>) -> Self {
        self.validator = Some(EffectValidator::new(probe));
        self
    }

    /// Check the signature, derive effects and wrap `underlying`.
    pub fn build<F>(self, underlying: F) -> ConfigResult<EffectModel<F>> {
        check_signature(&self.parameters, self.registry)?;

        let effects: Vec<Effect> = self
            .parameters
            .iter()
            .filter_map(|param| {
                self.registry
                    .lookup(&param.declared_type)
                    .map(|entry| Effect::new(entry.operation, &param.name, entry.policy))
            })
            .collect();

        debug!(
            model = %self.name,
            parameters = self.parameters.len(),
            effects = effects.len(),
            return_type = %self.return_type,
            "built effect model"
        );

        Ok(EffectModel::new(
            self.name,
            self.parameters,
            effects,
            self.return_type,
            self.validator.unwrap_or_default(),
            underlying,
        ))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Reject signatures whose parameters cannot each be addressed by name.
fn check_signature(parameters: &[Parameter], registry: &EffectRegistry) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    let mut after_positional = false;
    let mut seen_var_positional = false;
    let mut seen_var_keyword = false;
    let mut seen_default = false;

    for param in parameters {
        let name = param.name.as_str();
        if !is_identifier(name) {
            return Err(ConfigurationError::InvalidParameterName { name: name.to_string() });
        }
        if !seen.insert(name) {
            return Err(ConfigurationError::DuplicateParameter { name: name.to_string() });
        }
        if seen_var_keyword {
            return Err(ConfigurationError::invalid_order(
                name,
                "no parameter may follow the variadic keyword parameter",
            ));
        }

        match param.kind {
            ParamKind::Positional => {
                if after_positional {
                    return Err(ConfigurationError::invalid_order(
                        name,
                        "positional parameter follows keyword-only or variadic parameter",
                    ));
                }
                if param.has_default() {
                    seen_default = true;
                } else if seen_default {
                    return Err(ConfigurationError::invalid_order(
                        name,
                        "parameter without default follows parameter with default",
                    ));
                }
            }
            ParamKind::KeywordOnly => after_positional = true,
            ParamKind::VarPositional => {
                if seen_var_positional || after_positional {
                    return Err(ConfigurationError::invalid_order(
                        name,
                        "variadic positional parameter must directly follow \
                         the positional parameters",
                    ));
                }
                seen_var_positional = true;
                after_positional = true;
            }
            ParamKind::VarKeyword => seen_var_keyword = true,
        }

        if param.kind.is_variadic() && registry.contains(&param.declared_type) {
            return Err(ConfigurationError::VariadicPathRole {
                name: name.to_string(),
                tag: param.declared_type.to_string(),
            });
        }
    }

    if !parameters.is_empty() && parameters.iter().all(|p| p.kind.is_variadic()) {
        return Err(ConfigurationError::NoNamedParameters);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BoundArguments;
    use crate::types::{ExistencePolicy, Operation};

    fn noop(_: &BoundArguments) -> Result<(), std::io::Error> {
        Ok(())
    }

    #[test]
    fn test_effects_follow_parameter_order() {
        let registry = EffectRegistry::with_builtins();
        let model = ModelBuilder::new("merge", &registry)
            .param("station", "str")
            .param("output_path", TypeTag::NewPath)
            .param("verbose", "bool")
            .param("input_path", TypeTag::ExistingPath)
            .build(noop)
            .unwrap();

        assert_eq!(
            model.effects(),
            &[Effect::write("output_path"), Effect::read("input_path")]
        );
        assert_eq!(model.parameters().len(), 4);
        assert_eq!(model.return_type(), &TypeTag::Unit);
    }

    #[test]
    fn test_plain_signature_has_no_effects() {
        let registry = EffectRegistry::with_builtins();
        let model = ModelBuilder::new("add", &registry)
            .param("a", "int")
            .param_with_default("b", "int", 1)
            .returns("int")
            .build(noop)
            .unwrap();

        assert!(model.effects().is_empty());
        assert_eq!(model.return_type(), &TypeTag::named("int"));
        assert!(model.parameter("b").unwrap().has_default());
    }

    #[test]
    fn test_empty_registry_declares_nothing() {
        let registry = EffectRegistry::empty();
        let model = ModelBuilder::new("copy", &registry)
            .param("src", TypeTag::ExistingPath)
            .build(noop)
            .unwrap();
        assert!(model.effects().is_empty());
    }

    #[test]
    fn test_builtin_role_by_name_declares_effect() {
        let registry = EffectRegistry::with_builtins();
        let model = ModelBuilder::new("export", &registry)
            .param("out", TypeTag::named("NewPath"))
            .build(noop)
            .unwrap();
        assert_eq!(model.parameter("out").unwrap().declared_type, TypeTag::NewPath);
        assert_eq!(model.effects(), &[Effect::write("out")]);
    }

    #[test]
    fn test_custom_role_policy_is_carried() {
        let mut registry = EffectRegistry::with_builtins();
        registry.register("LogFile", Operation::Write, ExistencePolicy::ParentMustExist);

        let model = ModelBuilder::new("run", &registry)
            .keyword_only("log", "LogFile")
            .build(noop)
            .unwrap();
        assert_eq!(
            model.effects(),
            &[Effect::new(Operation::Write, "log", ExistencePolicy::ParentMustExist)]
        );
    }

    #[test]
    fn test_zero_parameters_is_fine() {
        let registry = EffectRegistry::with_builtins();
        let model = ModelBuilder::new("tick", &registry).build(noop).unwrap();
        assert!(model.parameters().is_empty());
        assert!(model.effects().is_empty());
    }

    #[test]
    fn test_rejects_unaddressable_signatures() {
        let registry = EffectRegistry::with_builtins();

        let err = ModelBuilder::new("f", &registry)
            .var_positional("args", "any")
            .var_keyword("kwargs", "any")
            .build(noop)
            .unwrap_err();
        assert_eq!(err, ConfigurationError::NoNamedParameters);

        let err = ModelBuilder::new("f", &registry)
            .param("first", "str")
            .var_positional("paths", TypeTag::ExistingPath)
            .build(noop)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::VariadicPathRole { ref name, .. } if name == "paths"
        ));

        let err = ModelBuilder::new("f", &registry)
            .param("", TypeTag::ExistingPath)
            .build(noop)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidParameterName { .. }));

        let err = ModelBuilder::new("f", &registry)
            .param("1st", "str")
            .build(noop)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidParameterName { .. }));

        let err = ModelBuilder::new("f", &registry)
            .param("path", TypeTag::ExistingPath)
            .keyword_only("path", TypeTag::NewPath)
            .build(noop)
            .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateParameter { name: "path".into() });
    }

    #[test]
    fn test_rejects_impossible_kind_order() {
        let registry = EffectRegistry::with_builtins();

        let cases = vec![
            ModelBuilder::new("f", &registry).keyword_only("a", "str").param("b", "str"),
            ModelBuilder::new("f", &registry).var_keyword("kw", "any").param("b", "str"),
            ModelBuilder::new("f", &registry)
                .param_with_default("a", "str", "x")
                .param("b", "str"),
            ModelBuilder::new("f", &registry)
                .param("a", "str")
                .var_positional("rest", "any")
                .var_positional("more", "any"),
            ModelBuilder::new("f", &registry)
                .keyword_only("a", "str")
                .var_positional("rest", "any"),
        ];

        for builder in cases {
            let err = builder.build(noop).unwrap_err();
            assert!(
                matches!(err, ConfigurationError::InvalidSignatureOrder { .. }),
                "unexpected error: {err}"
            );
        }
    }

    #[test]
    fn test_keyword_only_after_var_positional_is_valid() {
        let registry = EffectRegistry::with_builtins();
        let model = ModelBuilder::new("f", &registry)
            .param("src", TypeTag::ExistingPath)
            .var_positional("rest", "str")
            .keyword_only_with_default("dest", TypeTag::NewPath, "out.txt")
            .var_keyword("options", "any")
            .build(noop)
            .unwrap();

        assert_eq!(model.effects(), &[Effect::read("src"), Effect::write("dest")]);
    }
}
