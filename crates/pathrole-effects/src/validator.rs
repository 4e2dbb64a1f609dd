// Effect validator
//
// Checks declared effects against filesystem state for one set of bound
// arguments. Effects are checked in declaration order. Nothing is modified.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pathrole_error::{EffectError, EffectResult, EffectViolation, ViolationKind};
use tracing::{debug, trace};

use crate::binding::BoundArguments;
use crate::probe::{FsProbe, ResourceProbe};
use crate::types::{Effect, ExistencePolicy};

/// Validates effect preconditions through a [`ResourceProbe`].
#[derive(Debug, Clone)]
pub struct EffectValidator {
    probe: Arc<dyn ResourceProbe>,
}

impl EffectValidator {
    pub fn new(probe: Arc<dyn ResourceProbe>) -> Self {
        Self { probe }
    }

    /// Validator against the real filesystem
    pub fn filesystem() -> Self {
        Self::new(Arc::new(FsProbe::new()))
    }

    pub fn probe(&self) -> &dyn ResourceProbe {
        self.probe.as_ref()
    }

    /// Check every effect in order and stop at the first failure.
    pub fn validate(&self, effects: &[Effect], bound: &BoundArguments) -> EffectResult<()> {
        for effect in effects {
            if let Some(violation) = self.check(effect, bound)? {
                return Err(violation.into());
            }
        }
        Ok(())
    }

    /// Check every effect and return all violations found.
    ///
    /// Configuration and I/O errors still abort, since they say nothing about
    /// the remaining effects' preconditions.
    pub fn collect_violations(
        &self,
        effects: &[Effect],
        bound: &BoundArguments,
    ) -> EffectResult<Vec<EffectViolation>> {
        let mut violations = Vec::new();
        for effect in effects {
            if let Some(violation) = self.check(effect, bound)? {
                violations.push(violation);
            }
        }
        Ok(violations)
    }

    fn check(
        &self,
        effect: &Effect,
        bound: &BoundArguments,
    ) -> EffectResult<Option<EffectViolation>> {
        let path = bound.require_path(&effect.path_param)?;
        debug!(
            path_param = %effect.path_param,
            path = %path.display(),
            operation = %effect.operation,
            policy = %effect.policy,
            "checking effect"
        );

        let (satisfied, kind) = match effect.policy {
            ExistencePolicy::MustExist => (self.probe.exists(&path), ViolationKind::MissingInput),
            ExistencePolicy::MustNotExist => {
                (self.probe.exists(&path).map(|present| !present), ViolationKind::Conflict)
            }
            ExistencePolicy::ParentMustExist => {
                (self.probe.is_dir(&containing_dir(&path)), ViolationKind::MissingParent)
            }
        };
        let satisfied =
            satisfied.map_err(|source| EffectError::io(&effect.path_param, &path, source))?;

        if satisfied {
            trace!(path_param = %effect.path_param, "effect precondition holds");
            Ok(None)
        } else {
            Ok(Some(EffectViolation::new(kind, &effect.path_param, path)))
        }
    }
}

impl Default for EffectValidator {
    fn default() -> Self {
        Self::filesystem()
    }
}

/// Directory that will contain `path`; a bare file name lives in the current directory
fn containing_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None => path.to_path_buf(),
    }
}
