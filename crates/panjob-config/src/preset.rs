/*
 * preset.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Named, reusable job presets.
 */

//! The preset store.
//!
//! Presets are named partial job specifications loaded once from the user's
//! configuration file. A preset may inherit from another preset through
//! `use_preset`; inheritance is flattened eagerly at load time, so every entry
//! in a loaded [`PresetStore`] is a plain [`JobSpec`] with no references left.
//!
//! Flattening walks each preset's parent chain depth-first, memoizing results,
//! and rejects unknown parents and inheritance cycles with a [`ConfigError`].

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_yaml::Value;
use tracing::debug;

use crate::convert::{declaration_from_yaml, key_to_string, value_kind};
use crate::error::{ConfigError, ResolveError};
use crate::types::{JobDeclaration, JobSpec};

/// Immutable mapping of preset name to flattened job specification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetStore {
    presets: IndexMap<String, JobSpec>,
}

impl PresetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load presets from an already-parsed `presets` mapping.
    ///
    /// `null` is accepted as "no presets".
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the source is not a mapping, a name is not a
    /// string, an entry has unknown or badly shaped fields, or the inheritance
    /// between presets is broken.
    pub fn load(source: &Value) -> Result<Self, ConfigError> {
        let mapping = match source {
            Value::Null => return Ok(Self::new()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(ConfigError::NotAMapping {
                    found: value_kind(other),
                });
            }
        };

        let mut declarations = IndexMap::with_capacity(mapping.len());
        for (name, entry) in mapping {
            let name = key_to_string(name).ok_or(ConfigError::InvalidPresetName {
                found: value_kind(name),
            })?;
            // A bare `name:` entry is an empty preset
            let declaration = if entry.is_null() {
                JobDeclaration::default()
            } else {
                declaration_from_yaml(entry).map_err(|source| ConfigError::InvalidPreset {
                    preset: name.clone(),
                    source,
                })?
            };
            declarations.insert(name, declaration);
        }

        let presets = flatten(&declarations)?;
        debug!(count = presets.len(), "loaded presets");
        Ok(Self { presets })
    }

    /// Load presets from YAML text holding the `presets` mapping.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::load(&value)
    }

    /// Look up a preset by name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownPreset`] if no preset has that name.
    pub fn lookup(&self, name: &str) -> Result<&JobSpec, ResolveError> {
        self.presets
            .get(name)
            .ok_or_else(|| ResolveError::UnknownPreset {
                name: name.to_string(),
                available: self.names().map(String::from).collect(),
            })
    }

    /// Get a preset by name, if present.
    pub fn get(&self, name: &str) -> Option<&JobSpec> {
        self.presets.get(name)
    }

    /// Check whether a preset exists.
    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// Preset names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// Iterate over `(name, spec)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JobSpec)> {
        self.presets.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Check if there are no presets.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl FromIterator<(String, JobSpec)> for PresetStore {
    fn from_iter<I: IntoIterator<Item = (String, JobSpec)>>(iter: I) -> Self {
        Self {
            presets: iter.into_iter().collect(),
        }
    }
}

/// Flatten preset inheritance, keeping declaration order.
fn flatten(
    declarations: &IndexMap<String, JobDeclaration>,
) -> Result<IndexMap<String, JobSpec>, ConfigError> {
    let mut done: HashMap<&str, JobSpec> = HashMap::with_capacity(declarations.len());
    let mut visiting = Vec::new();

    for name in declarations.keys() {
        flatten_one(name, declarations, &mut done, &mut visiting)?;
    }

    Ok(declarations
        .keys()
        .filter_map(|name| {
            done.remove(name.as_str())
                .map(|spec| (name.clone(), spec))
        })
        .collect())
}

fn flatten_one<'a>(
    name: &'a str,
    declarations: &'a IndexMap<String, JobDeclaration>,
    done: &mut HashMap<&'a str, JobSpec>,
    visiting: &mut Vec<&'a str>,
) -> Result<JobSpec, ConfigError> {
    if let Some(spec) = done.get(name) {
        return Ok(spec.clone());
    }

    if let Some(start) = visiting.iter().position(|n| *n == name) {
        let mut chain: Vec<String> = visiting[start..].iter().map(|n| n.to_string()).collect();
        chain.push(name.to_string());
        return Err(ConfigError::InheritanceCycle { chain });
    }

    let declaration = &declarations[name];
    visiting.push(name);

    let spec = match declaration.use_preset.as_deref() {
        None => declaration.spec.clone(),
        Some(parent) => {
            let (parent, _) =
                declarations
                    .get_key_value(parent)
                    .ok_or_else(|| ConfigError::UnknownParent {
                        preset: name.to_string(),
                        parent: parent.to_string(),
                    })?;
            debug!(preset = name, parent = parent.as_str(), "flattening preset");
            flatten_one(parent, declarations, done, visiting)?.merged(&declaration.spec)
        }
    };

    visiting.pop();
    done.insert(name, spec.clone());
    Ok(spec)
}
