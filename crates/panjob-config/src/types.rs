/*
 * types.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Job specification types.
 */

//! Core type definitions for job specifications.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde_yaml::Value;

/// Key/value options whose values are kept opaque (metadata, pandoc arguments).
///
/// Insertion order is preserved. Merging a key that already exists keeps the
/// key in its original position and replaces the value.
pub type OptionMap = IndexMap<String, Value>;

/// Filter toggles, keyed by filter name.
pub type FilterMap = IndexMap<String, bool>;

/// One conversion request with every preset reference already applied.
///
/// The same shape is used for the three resolution layers (built-in defaults,
/// a preset entry and the document's own declaration), so that merging is a
/// single operation regardless of where a layer came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobSpec {
    /// Target format passed to pandoc (`--to`)
    pub output_format: Option<String>,

    /// Destination of the artifact (`--output`)
    pub output_file: Option<PathBuf>,

    /// Document metadata assignments (`--metadata`)
    pub metadata: OptionMap,

    /// Direct pandoc options
    pub pandoc_args: OptionMap,

    /// Filter toggles (`--filter` / `--lua-filter`)
    pub filters: FilterMap,
}

impl JobSpec {
    /// The neutral specification: every optional field absent, every map empty.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Check whether this specification sets nothing at all.
    pub fn is_empty(&self) -> bool {
        self.output_format.is_none()
            && self.output_file.is_none()
            && self.metadata.is_empty()
            && self.pandoc_args.is_empty()
            && self.filters.is_empty()
    }

    /// Layer `higher` over `self` in place.
    ///
    /// Scalar fields are replaced only when `higher` defines them. Map fields
    /// are merged key by key; a key present on both sides takes `higher`'s
    /// value outright, without looking inside it.
    pub fn merge_from(&mut self, higher: &JobSpec) {
        if let Some(format) = &higher.output_format {
            self.output_format = Some(format.clone());
        }
        if let Some(file) = &higher.output_file {
            self.output_file = Some(file.clone());
        }
        for (key, value) in &higher.metadata {
            self.metadata.insert(key.clone(), value.clone());
        }
        for (key, value) in &higher.pandoc_args {
            self.pandoc_args.insert(key.clone(), value.clone());
        }
        for (name, enabled) in &higher.filters {
            self.filters.insert(name.clone(), *enabled);
        }
    }

    /// Layer `higher` over `self`, returning the result.
    pub fn merged(mut self, higher: &JobSpec) -> JobSpec {
        self.merge_from(higher);
        self
    }

    /// Names of enabled filters, sorted.
    pub fn active_filters(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .filters
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

/// A job exactly as declared in a document or preset file.
///
/// `use_preset` names the preset this declaration inherits from. It is
/// consumed during resolution and never reaches a resolved [`JobSpec`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobDeclaration {
    /// Preset to inherit from, if any
    pub use_preset: Option<String>,

    /// The options set by this declaration
    pub spec: JobSpec,
}

impl JobDeclaration {
    /// Create a declaration without a preset reference.
    pub fn new(spec: JobSpec) -> Self {
        Self {
            use_preset: None,
            spec,
        }
    }

    /// Set the preset reference.
    pub fn with_preset(mut self, name: impl Into<String>) -> Self {
        self.use_preset = Some(name.into());
        self
    }
}
