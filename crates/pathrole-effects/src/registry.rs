// Effect registry
//
// Maps a path-role type tag to the effect it implies. Tags with no entry are
// plain parameters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{RegistryConfig, WritePolicy};
use crate::types::{ExistencePolicy, Operation, TypeTag};

/// Effect semantics registered for one type tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub tag: TypeTag,
    pub operation: Operation,
    pub policy: ExistencePolicy,
}

/// Table of path roles consulted by [`ModelBuilder`](crate::ModelBuilder).
///
/// Populate it during setup, then lend it to builders. Builders only borrow it
/// immutably, so it cannot change while a model is being built.
#[derive(Debug, Clone)]
pub struct EffectRegistry {
    entries: HashMap<TypeTag, RegistryEntry>,
}

impl EffectRegistry {
    /// A registry with no entries; every parameter is plain.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// A registry with the two built-in roles: `ExistingPath` reads a resource
    /// that must exist, `NewPath` writes a resource that must not exist yet.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(TypeTag::ExistingPath, Operation::Read, ExistencePolicy::MustExist);
        registry.register(TypeTag::NewPath, Operation::Write, ExistencePolicy::MustNotExist);
        registry
    }

    /// Build a registry from configuration: built-ins first, with the
    /// configured write policy applied to `NewPath`, then custom roles in order.
    pub fn from_config(config: &RegistryConfig) -> Self {
        let mut registry = Self::with_builtins();
        if config.write_policy == WritePolicy::AllowOverwrite {
            registry.register(TypeTag::NewPath, Operation::Write, ExistencePolicy::ParentMustExist);
        }
        for role in &config.roles {
            registry.register(role.tag.clone(), role.operation, role.policy);
        }
        registry
    }

    /// Add or replace the entry for `tag`, returning the replaced entry.
    pub fn register(
        &mut self,
        tag: impl Into<TypeTag>,
        operation: Operation,
        policy: ExistencePolicy,
    ) -> Option<RegistryEntry> {
        let tag = tag.into();
        debug!(%tag, %operation, %policy, "registering path role");
        let entry = RegistryEntry {
            tag: tag.clone(),
            operation,
            policy,
        };
        self.entries.insert(tag, entry)
    }

    /// Entry for `tag`, or `None` when the tag declares no effect.
    pub fn lookup(&self, tag: &TypeTag) -> Option<&RegistryEntry> {
        self.entries.get(tag)
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by tag
    pub fn entries(&self) -> Vec<&RegistryEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| a.tag.cmp(&b.tag));
        entries
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
