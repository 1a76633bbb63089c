//! Job specifications, presets and layered resolution for panjob.
//!
//! A document declares a list of conversion jobs in its front matter. Each job
//! may name a preset from the user's configuration file and override any of
//! its options. This crate turns those raw declarations into fully resolved
//! [`JobSpec`]s.
//!
//! # Key Features
//!
//! - **Fixed field set**: declarations are validated eagerly into typed records
//! - **Key-wise merging**: map fields merge by key, scalars override wholesale
//! - **Preset inheritance**: presets may build on other presets; cycles are rejected
//! - **Pure resolution**: no global state, the preset store is passed explicitly
//!
//! # Example
//!
//! ```rust
//! use panjob_config::{JobSpec, PresetStore, resolve_raw};
//!
//! let presets = PresetStore::from_yaml_str(
//!     "journal: {output_format: pdf, filters: {pagebreak.lua: true}}",
//! )?;
//! let raw = serde_yaml::from_str("{use_preset: journal, output_file: paper.pdf}")?;
//!
//! let job = resolve_raw(&raw, &presets, &JobSpec::neutral())?;
//! assert_eq!(job.output_format.as_deref(), Some("pdf"));
//! assert_eq!(job.active_filters(), vec!["pagebreak.lua"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod convert;
mod error;
mod preset;
mod resolve;
mod types;

pub use convert::{
    FILTERS, METADATA, OUTPUT_FILE, OUTPUT_FORMAT, PANDOC_ARGS, USE_PRESET, declaration_from_yaml,
    key_to_string, recognized_fields, value_kind,
};

pub use error::{ConfigError, FieldError, ResolveError};

pub use preset::PresetStore;

pub use resolve::{resolve, resolve_raw};

pub use types::{FilterMap, JobDeclaration, JobSpec, OptionMap};

// Re-export for convenience
pub use serde_yaml::Value;
