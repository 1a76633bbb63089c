//! Layered job resolution.
//!
//! A resolved job is built from three layers, lowest precedence first:
//!
//! 1. the built-in defaults (normally [`JobSpec::neutral`])
//! 2. the preset named by the declaration's `use_preset`, if any
//! 3. the declaration itself
//!
//! Each layer is applied with [`JobSpec::merge_from`]: scalar fields are
//! replaced when the higher layer sets them, map fields merge key by key.

use serde_yaml::Value;
use tracing::debug;

use crate::convert::declaration_from_yaml;
use crate::error::ResolveError;
use crate::preset::PresetStore;
use crate::types::{JobDeclaration, JobSpec};

/// Resolve a typed declaration against the preset store and defaults.
///
/// # Errors
///
/// Returns [`ResolveError::UnknownPreset`] if the declaration names a preset
/// that is not in `presets`.
pub fn resolve(
    declaration: &JobDeclaration,
    presets: &PresetStore,
    defaults: &JobSpec,
) -> Result<JobSpec, ResolveError> {
    let mut spec = defaults.clone();

    if let Some(name) = declaration.use_preset.as_deref() {
        let preset = presets.lookup(name)?;
        debug!(preset = name, "applying preset layer");
        spec.merge_from(preset);
    }

    spec.merge_from(&declaration.spec);
    Ok(spec)
}

/// Validate a raw declaration and resolve it.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidField`] if `raw` has unknown keys or badly
/// shaped values, and [`ResolveError::UnknownPreset`] as for [`resolve`].
pub fn resolve_raw(
    raw: &Value,
    presets: &PresetStore,
    defaults: &JobSpec,
) -> Result<JobSpec, ResolveError> {
    let declaration = declaration_from_yaml(raw)?;
    resolve(&declaration, presets, defaults)
}
