// Argument binding
//
// Maps the arguments of one call onto the declared parameter list, the same
// way the callable's own signature would: positionals fill positional slots in
// order, keywords match by name, defaults fill the rest, variadics collect the
// surplus.

use std::collections::BTreeMap;
use std::path::PathBuf;

use pathrole_error::{ConfigResult, ConfigurationError};

use crate::types::{ParamKind, Parameter};
use crate::value::Value;

/// Arguments supplied to one call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.push((name.into(), value.into()));
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keywords(&self) -> &[(String, Value)] {
        &self.keywords
    }
}

/// Every parameter of a call mapped to its value, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    values: Vec<(String, Value)>,
}

impl BoundArguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Bound value of `name` interpreted as a path, if it is one
    pub fn path(&self, name: &str) -> Option<PathBuf> {
        self.get(name).and_then(Value::as_path)
    }

    /// Bound value of `name` as a path, or the configuration error explaining why not
    pub fn require_path(&self, name: &str) -> ConfigResult<PathBuf> {
        let value = self
            .get(name)
            .ok_or_else(|| ConfigurationError::UnboundPathParameter { name: name.to_string() })?;
        value
            .as_path()
            .ok_or_else(|| ConfigurationError::not_a_path(name, describe_non_path(value)))
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for BoundArguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

fn describe_non_path(value: &Value) -> String {
    match value {
        Value::String(s) if s.is_empty() => "empty str".to_string(),
        Value::Bytes(_) => "non-UTF-8 bytes".to_string(),
        other => other.type_name().to_string(),
    }
}

/// Bind `args` to `parameters`.
pub fn bind(parameters: &[Parameter], args: &Arguments) -> ConfigResult<BoundArguments> {
    let mut slots: Vec<Option<Value>> = vec![None; parameters.len()];
    let mut surplus_positional = Vec::new();
    let mut surplus_keywords = BTreeMap::new();

    let positional_slots: Vec<usize> = parameters
        .iter()
        .enumerate()
        .filter(|(_, p)| p.kind == ParamKind::Positional)
        .map(|(i, _)| i)
        .collect();
    let var_positional = parameters.iter().position(|p| p.kind == ParamKind::VarPositional);
    let var_keyword = parameters.iter().position(|p| p.kind == ParamKind::VarKeyword);

    for (i, value) in args.positional.iter().enumerate() {
        match positional_slots.get(i) {
            Some(&slot) => slots[slot] = Some(value.clone()),
            None if var_positional.is_some() => surplus_positional.push(value.clone()),
            None => {
                return Err(ConfigurationError::TooManyPositional {
                    expected: positional_slots.len(),
                    got: args.positional.len(),
                })
            }
        }
    }

    for (name, value) in &args.keywords {
        let slot = parameters
            .iter()
            .position(|p| &p.name == name && !p.kind.is_variadic());
        match slot {
            Some(slot) if slots[slot].is_some() => {
                return Err(ConfigurationError::DuplicateArgument { name: name.clone() })
            }
            Some(slot) => slots[slot] = Some(value.clone()),
            None if var_keyword.is_some() => {
                if surplus_keywords.insert(name.clone(), value.clone()).is_some() {
                    return Err(ConfigurationError::DuplicateArgument { name: name.clone() });
                }
            }
            None => return Err(ConfigurationError::UnexpectedArgument { name: name.clone() }),
        }
    }

    let mut surplus_positional = Some(surplus_positional);
    let mut surplus_keywords = Some(surplus_keywords);

    parameters
        .iter()
        .zip(slots)
        .map(|(param, slot)| {
            let value = match param.kind {
                ParamKind::VarPositional => {
                    Value::Array(surplus_positional.take().unwrap_or_default())
                }
                ParamKind::VarKeyword => Value::Map(surplus_keywords.take().unwrap_or_default()),
                ParamKind::Positional | ParamKind::KeywordOnly => {
                    match slot.or_else(|| param.default.clone()) {
                        Some(value) => value,
                        None => {
                            return Err(ConfigurationError::MissingArgument {
                                name: param.name.clone(),
                            })
                        }
                    }
                }
            };
            Ok((param.name.clone(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeTag;

    fn param(name: &str, kind: ParamKind, default: Option<Value>) -> Parameter {
        Parameter {
            name: name.to_string(),
            declared_type: TypeTag::named("any"),
            kind,
            default,
        }
    }

    fn signature() -> Vec<Parameter> {
        vec![
            param("input_path", ParamKind::Positional, None),
            param("output_path", ParamKind::Positional, None),
            param("encoding", ParamKind::Positional, Some(Value::from("utf-8"))),
            param("overwrite", ParamKind::KeywordOnly, Some(Value::Bool(false))),
        ]
    }

    #[test]
    fn test_positional_and_keyword_binding() {
        let bound = bind(
            &signature(),
            &Arguments::new().arg("in.txt").kwarg("output_path", "out.txt"),
        )
        .unwrap();

        let names: Vec<_> = bound.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["input_path", "output_path", "encoding", "overwrite"]);
        assert_eq!(bound.path("input_path"), Some(PathBuf::from("in.txt")));
        assert_eq!(bound.str("output_path"), Some("out.txt"));
        assert_eq!(bound.str("encoding"), Some("utf-8"));
        assert_eq!(bound.get("overwrite"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_keyword_only_cannot_be_positional() {
        let err = bind(
            &signature(),
            &Arguments::new().arg("a").arg("b").arg("latin-1").arg(true),
        )
        .unwrap_err();
        assert_eq!(err, ConfigurationError::TooManyPositional { expected: 3, got: 4 });
    }

    #[test]
    fn test_missing_required_argument() {
        let err = bind(&signature(), &Arguments::new().arg("in.txt")).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingArgument { name: "output_path".into() });
    }

    #[test]
    fn test_duplicate_and_unexpected_keywords() {
        let err = bind(
            &signature(),
            &Arguments::new().arg("in.txt").kwarg("input_path", "other.txt"),
        )
        .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateArgument { name: "input_path".into() });

        let err = bind(
            &signature(),
            &Arguments::new().arg("a").arg("b").kwarg("verbose", true),
        )
        .unwrap_err();
        assert_eq!(err, ConfigurationError::UnexpectedArgument { name: "verbose".into() });
    }

    #[test]
    fn test_variadics_collect_surplus() {
        let params = vec![
            param("first", ParamKind::Positional, None),
            param("rest", ParamKind::VarPositional, None),
            param("options", ParamKind::VarKeyword, None),
        ];
        let bound = bind(
            &params,
            &Arguments::new().arg(1).arg(2).arg(3).kwarg("verbose", true),
        )
        .unwrap();

        assert_eq!(bound.int("first"), Some(1));
        assert_eq!(
            bound.get("rest"),
            Some(&Value::Array(vec![Value::Int(2), Value::Int(3)]))
        );
        let options = bound.get("options").and_then(Value::as_map).unwrap();
        assert_eq!(options.get("verbose"), Some(&Value::Bool(true)));

        let bound = bind(&params, &Arguments::new().arg(1)).unwrap();
        assert_eq!(bound.get("rest"), Some(&Value::Array(Vec::new())));
        assert_eq!(bound.get("options"), Some(&Value::Map(BTreeMap::new())));
    }

    #[test]
    fn test_require_path_errors() {
        let bound: BoundArguments = vec![
            ("count".to_string(), Value::Int(3)),
            ("blank".to_string(), Value::from("")),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            bound.require_path("count").unwrap_err(),
            ConfigurationError::not_a_path("count", "int")
        );
        assert_eq!(
            bound.require_path("blank").unwrap_err(),
            ConfigurationError::not_a_path("blank", "empty str")
        );
        assert_eq!(
            bound.require_path("nope").unwrap_err(),
            ConfigurationError::UnboundPathParameter { name: "nope".into() }
        );
    }
}
