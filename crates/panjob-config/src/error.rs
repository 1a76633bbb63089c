//! Error types for job declarations, presets and resolution.

use thiserror::Error;

/// A job declaration (or preset entry) does not match the recognized fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The declaration itself is not a mapping.
    #[error("job declaration must be a mapping, found {found}")]
    NotAMapping {
        /// Kind of value that was found instead
        found: &'static str,
    },

    /// One or more keys are not recognized fields.
    #[error(
        "unexpected key(s) {}; valid keys are: {}",
        .keys.join(", "),
        .valid.join(", ")
    )]
    Unknown {
        /// Offending keys, sorted
        keys: Vec<String>,
        /// Every accepted key, aliases included
        valid: Vec<&'static str>,
    },

    /// A field was given both under its name and under its alias.
    #[error("`{field}` is given more than once (`{alias}` is an alias for it)")]
    Duplicate {
        /// Canonical field name
        field: &'static str,
        /// Alias that collided with it
        alias: &'static str,
    },

    /// A field (or an entry inside one) has the wrong shape.
    #[error("`{field}` must be {expected}, found {found}")]
    WrongType {
        /// Field path, e.g. `metadata` or `filters.pagebreak.lua`
        field: String,
        /// Description of the accepted shape
        expected: &'static str,
        /// Kind of value that was found
        found: &'static str,
    },
}

impl FieldError {
    /// The offending field or key, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            FieldError::NotAMapping { .. } => None,
            FieldError::Unknown { keys, .. } => keys.first().map(String::as_str),
            FieldError::Duplicate { field, .. } => Some(field),
            FieldError::WrongType { field, .. } => Some(field),
        }
    }
}

/// The preset configuration source is structurally invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The source could not be parsed or deserialized.
    #[error("failed to parse preset configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// `presets` is not a mapping of names to job options.
    #[error("`presets` must be a mapping of preset names to job options, found {found}")]
    NotAMapping {
        /// Kind of value that was found instead
        found: &'static str,
    },

    /// A preset name is not a string.
    #[error("preset names must be strings, found {found}")]
    InvalidPresetName {
        /// Kind of value that was found instead
        found: &'static str,
    },

    /// A preset entry fails field validation.
    #[error("preset `{preset}` is invalid: {source}")]
    InvalidPreset {
        /// Name of the offending preset
        preset: String,
        /// What is wrong with it
        #[source]
        source: FieldError,
    },

    /// A preset inherits from a preset that does not exist.
    #[error("preset `{preset}` inherits from unknown preset `{parent}`")]
    UnknownParent {
        /// Preset declaring the inheritance
        preset: String,
        /// Missing parent name
        parent: String,
    },

    /// Presets inherit from each other in a loop.
    #[error("preset inheritance cycle: {}", .chain.join(" -> "))]
    InheritanceCycle {
        /// The loop, starting and ending with the same preset
        chain: Vec<String>,
    },
}

/// Resolving a job declaration failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The declaration references a preset that is not in the store.
    #[error("unknown preset `{name}`; available presets: {}", display_names(.available))]
    UnknownPreset {
        /// Requested preset name
        name: String,
        /// Names present in the store
        available: Vec<String>,
    },

    /// The declaration does not match the recognized fields.
    #[error(transparent)]
    InvalidField(#[from] FieldError),
}

impl ResolveError {
    /// The offending field or key, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ResolveError::UnknownPreset { .. } => Some(crate::convert::USE_PRESET),
            ResolveError::InvalidField(e) => e.field(),
        }
    }
}

fn display_names(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}
