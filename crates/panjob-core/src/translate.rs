/*
 * translate.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Translation of resolved jobs into pandoc arguments.
 */

//! Argument translation.
//!
//! Turns a resolved [`JobSpec`] into the argument vector for one pandoc run.
//! Tokens are emitted in a fixed order:
//!
//! 1. `--to=<format>` if an output format is set
//! 2. `--output=<path>` if an output file is set
//! 3. `--metadata=<key>:<value>` per metadata entry, sorted by key
//! 4. pandoc options, in the order they were declared and merged
//! 5. `--lua-filter=<name>` / `--filter=<name>` per enabled filter, sorted
//!
//! The output depends only on the input spec, so translating the same spec
//! twice yields identical arguments.
//!
//! ## Pandoc options
//!
//! Keys have `_` replaced by `-`. One-character keys become short options
//! (`-s`), longer keys long options (`--standalone`).
//!
//! - `true` emits the bare flag
//! - `false`, `null` and blank strings emit nothing; they only cancel a
//!   lower layer
//! - any other scalar emits `--key=value` (short options take the value as a
//!   separate token: `-V`, `value`)

use panjob_config::{JobSpec, METADATA, PANDOC_ARGS, Value, value_kind};

use crate::error::TranslateError;

/// Long option selecting the output format.
pub const FORMAT_OPTION: &str = "--to";

/// Long option selecting the output file.
pub const OUTPUT_OPTION: &str = "--output";

/// Long option assigning one metadata value.
pub const METADATA_OPTION: &str = "--metadata";

/// Long option activating a Lua filter.
pub const LUA_FILTER_OPTION: &str = "--lua-filter";

/// Long option activating a JSON filter executable.
pub const FILTER_OPTION: &str = "--filter";

/// Translate a resolved job into pandoc arguments.
///
/// # Errors
///
/// Returns [`TranslateError::NotScalar`] if a metadata or pandoc option value
/// is a sequence, mapping or tagged value, [`TranslateError::InvalidKey`] for
/// a metadata key that is empty or contains `:`, and
/// [`TranslateError::EmptyKey`] for an option whose name is empty.
pub fn translate(spec: &JobSpec) -> Result<Vec<String>, TranslateError> {
    let mut args = Vec::new();

    if let Some(format) = &spec.output_format {
        args.push(format!("{FORMAT_OPTION}={format}"));
    }

    if let Some(file) = &spec.output_file {
        args.push(format!("{OUTPUT_OPTION}={}", file.display()));
    }

    let mut metadata: Vec<_> = spec.metadata.iter().collect();
    metadata.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
    for (key, value) in metadata {
        if key.trim().is_empty() || key.contains(':') {
            return Err(TranslateError::InvalidKey {
                field: METADATA,
                key: key.clone(),
            });
        }
        if let Some(value) = render_scalar(METADATA, key, value)? {
            args.push(format!("{METADATA_OPTION}={key}:{value}"));
        }
    }

    for (key, value) in &spec.pandoc_args {
        push_option(&mut args, key, value)?;
    }

    for name in spec.active_filters() {
        args.push(filter_arg(name));
    }

    Ok(args)
}

/// Append the tokens for one pandoc option.
fn push_option(args: &mut Vec<String>, key: &str, value: &Value) -> Result<(), TranslateError> {
    let flag = format_flag(key).ok_or(TranslateError::EmptyKey { field: PANDOC_ARGS })?;

    match value {
        Value::Bool(true) => args.push(flag),
        Value::Bool(false) | Value::Null => {}
        other => {
            let Some(value) = render_scalar(PANDOC_ARGS, key, other)? else {
                return Ok(());
            };
            if flag.starts_with("--") {
                args.push(format!("{flag}={value}"));
            } else {
                args.push(flag);
                args.push(value);
            }
        }
    }

    Ok(())
}

/// Turn an option key into a flag.
///
/// Leading dashes in the key are ignored, so `toc`, `-toc` and `--toc` all
/// produce `--toc`. Returns `None` if nothing is left.
pub fn format_flag(key: &str) -> Option<String> {
    let name = key.trim().trim_start_matches('-').replace('_', "-");
    match name.chars().count() {
        0 => None,
        1 => Some(format!("-{name}")),
        _ => Some(format!("--{name}")),
    }
}

/// Render a scalar as token text. `null` and blank strings render as nothing.
fn render_scalar(
    field: &'static str,
    key: &str,
    value: &Value,
) -> Result<Option<String>, TranslateError> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.trim().to_string())),
        other => Err(TranslateError::NotScalar {
            field,
            key: key.to_string(),
            found: value_kind(other),
        }),
    }
}

/// Filter activation token. Lua filters are recognized by extension.
pub fn filter_arg(name: &str) -> String {
    if name.ends_with(".lua") {
        format!("{LUA_FILTER_OPTION}={name}")
    } else {
        format!("{FILTER_OPTION}={name}")
    }
}
