//! Conversion from parsed YAML to job declarations.
//!
//! Every raw declaration, whether it comes from a document's front matter or
//! from a preset file, passes through [`declaration_from_yaml`]. Unknown keys
//! and badly shaped values are rejected here, so later stages only ever see
//! typed [`JobDeclaration`]s.

use std::path::PathBuf;

use serde_yaml::{Mapping, Value};

use crate::error::FieldError;
use crate::types::{FilterMap, JobDeclaration, OptionMap};

pub const USE_PRESET: &str = "use_preset";
pub const OUTPUT_FORMAT: &str = "output_format";
pub const OUTPUT_FILE: &str = "output_file";
pub const METADATA: &str = "metadata";
pub const PANDOC_ARGS: &str = "pandoc_args";
pub const FILTERS: &str = "filters";

/// The fixed set of job declaration fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    UsePreset,
    OutputFormat,
    OutputFile,
    Metadata,
    PandocArgs,
    Filters,
}

/// A recognized field, its key and the alias it may also be written as.
struct FieldDef {
    field: Field,
    name: &'static str,
    alias: Option<&'static str>,
}

static FIELDS: [FieldDef; 6] = [
    FieldDef {
        field: Field::UsePreset,
        name: USE_PRESET,
        alias: Some("preset_name"),
    },
    FieldDef {
        field: Field::OutputFormat,
        name: OUTPUT_FORMAT,
        alias: Some("to"),
    },
    FieldDef {
        field: Field::OutputFile,
        name: OUTPUT_FILE,
        alias: None,
    },
    FieldDef {
        field: Field::Metadata,
        name: METADATA,
        alias: None,
    },
    FieldDef {
        field: Field::PandocArgs,
        name: PANDOC_ARGS,
        alias: Some("tool_args"),
    },
    FieldDef {
        field: Field::Filters,
        name: FILTERS,
        alias: None,
    },
];

/// Every key accepted in a job declaration, aliases included.
pub fn recognized_fields() -> Vec<&'static str> {
    FIELDS
        .iter()
        .flat_map(|def| std::iter::once(def.name).chain(def.alias))
        .collect()
}

/// Find the definition a key refers to, returning the alias used (if any).
fn field_def(key: &str) -> Option<(&'static FieldDef, Option<&'static str>)> {
    FIELDS.iter().find_map(|def| {
        if def.name == key {
            Some((def, None))
        } else if def.alias == Some(key) {
            Some((def, def.alias))
        } else {
            None
        }
    })
}

/// Human-readable name of a YAML value's kind, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Stringify a mapping key. Only scalar keys are accepted.
pub fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Convert one raw declaration into a [`JobDeclaration`].
///
/// # Errors
///
/// - [`FieldError::NotAMapping`] if `raw` is not a mapping
/// - [`FieldError::Unknown`] listing every key outside the recognized set
/// - [`FieldError::Duplicate`] if a field is given under both its name and alias
/// - [`FieldError::WrongType`] if a value does not have the expected shape
pub fn declaration_from_yaml(raw: &Value) -> Result<JobDeclaration, FieldError> {
    let Value::Mapping(mapping) = raw else {
        return Err(FieldError::NotAMapping {
            found: value_kind(raw),
        });
    };

    let fields = canonicalize(mapping)?;
    let mut declaration = JobDeclaration::default();

    for (def, value) in fields {
        let name = def.name;
        match def.field {
            Field::UsePreset => declaration.use_preset = optional_string(name, value)?,
            Field::OutputFormat => declaration.spec.output_format = optional_string(name, value)?,
            Field::OutputFile => {
                declaration.spec.output_file = optional_string(name, value)?.map(PathBuf::from)
            }
            Field::Metadata => declaration.spec.metadata = option_map(name, value)?,
            Field::PandocArgs => declaration.spec.pandoc_args = option_map(name, value)?,
            Field::Filters => declaration.spec.filters = filter_map(value)?,
        }
    }

    Ok(declaration)
}

/// Resolve aliases and reject unknown or repeated keys.
fn canonicalize(mapping: &Mapping) -> Result<Vec<(&'static FieldDef, &Value)>, FieldError> {
    let mut fields: Vec<(&'static FieldDef, Option<&'static str>, &Value)> = Vec::new();
    let mut unknown = Vec::new();

    for (key, value) in mapping {
        let key = key_to_string(key).unwrap_or_else(|| format!("<{}>", value_kind(key)));
        match field_def(&key) {
            Some((def, alias)) => {
                if let Some((_, previous_alias, _)) =
                    fields.iter().find(|(d, _, _)| d.field == def.field)
                {
                    return Err(FieldError::Duplicate {
                        field: def.name,
                        alias: alias.or(*previous_alias).unwrap_or(def.name),
                    });
                }
                fields.push((def, alias, value));
            }
            None => unknown.push(key),
        }
    }

    if !unknown.is_empty() {
        unknown.sort();
        return Err(FieldError::Unknown {
            keys: unknown,
            valid: recognized_fields(),
        });
    }

    Ok(fields
        .into_iter()
        .map(|(def, _, value)| (def, value))
        .collect())
}

/// A string field. Null and blank strings count as "not set".
fn optional_string(field: &str, value: &Value) -> Result<Option<String>, FieldError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.trim().to_string())),
        other => Err(FieldError::WrongType {
            field: field.to_string(),
            expected: "a string",
            found: value_kind(other),
        }),
    }
}

/// A mapping with opaque values. Null counts as an empty mapping.
fn option_map(field: &str, value: &Value) -> Result<OptionMap, FieldError> {
    match value {
        Value::Null => Ok(OptionMap::new()),
        Value::Mapping(mapping) => {
            let mut options = OptionMap::with_capacity(mapping.len());
            for (key, value) in mapping {
                let key = key_to_string(key).ok_or_else(|| FieldError::WrongType {
                    field: format!("{field} key"),
                    expected: "a string",
                    found: value_kind(key),
                })?;
                options.insert(key, value.clone());
            }
            Ok(options)
        }
        other => Err(FieldError::WrongType {
            field: field.to_string(),
            expected: "a mapping",
            found: value_kind(other),
        }),
    }
}

/// Filter toggles: a mapping of name to boolean, or a list of enabled names.
fn filter_map(value: &Value) -> Result<FilterMap, FieldError> {
    match value {
        Value::Null => Ok(FilterMap::new()),
        Value::Mapping(mapping) => {
            let mut filters = FilterMap::with_capacity(mapping.len());
            for (key, enabled) in mapping {
                let name = key_to_string(key).ok_or_else(|| FieldError::WrongType {
                    field: format!("{FILTERS} key"),
                    expected: "a string",
                    found: value_kind(key),
                })?;
                let Value::Bool(enabled) = enabled else {
                    return Err(FieldError::WrongType {
                        field: format!("{FILTERS}.{name}"),
                        expected: "a boolean",
                        found: value_kind(enabled),
                    });
                };
                filters.insert(name, *enabled);
            }
            Ok(filters)
        }
        Value::Sequence(items) => {
            let mut filters = FilterMap::with_capacity(items.len());
            for item in items {
                let Value::String(name) = item else {
                    return Err(FieldError::WrongType {
                        field: format!("{FILTERS} item"),
                        expected: "a string",
                        found: value_kind(item),
                    });
                };
                filters.insert(name.clone(), true);
            }
            Ok(filters)
        }
        other => Err(FieldError::WrongType {
            field: FILTERS.to_string(),
            expected: "a mapping of filter names to booleans",
            found: value_kind(other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_full_declaration() {
        let decl = declaration_from_yaml(&yaml(
            r#"
use_preset: journal
output_format: html
output_file: out/report.html
metadata:
  author: Ada
  toc-own-page: true
pandoc_args:
  standalone: true
  pdf_engine: weasyprint
filters:
  pagebreak.lua: true
  wordcount.lua: false
"#,
        ))
        .unwrap();

        assert_eq!(decl.use_preset.as_deref(), Some("journal"));
        assert_eq!(decl.spec.output_format.as_deref(), Some("html"));
        assert_eq!(decl.spec.output_file, Some(PathBuf::from("out/report.html")));
        assert_eq!(decl.spec.metadata["author"], Value::String("Ada".into()));
        assert_eq!(decl.spec.metadata["toc-own-page"], Value::Bool(true));
        assert_eq!(decl.spec.pandoc_args.len(), 2);
        assert!(decl.spec.filters["pagebreak.lua"]);
        assert!(!decl.spec.filters["wordcount.lua"]);
    }

    #[test]
    fn test_empty_mapping_is_neutral() {
        let decl = declaration_from_yaml(&yaml("{}")).unwrap();
        assert_eq!(decl, JobDeclaration::default());
    }

    #[test]
    fn test_aliases() {
        let decl =
            declaration_from_yaml(&yaml("{preset_name: default, to: pdf, tool_args: {toc: true}}"))
                .unwrap();
        assert_eq!(decl.use_preset.as_deref(), Some("default"));
        assert_eq!(decl.spec.output_format.as_deref(), Some("pdf"));
        assert_eq!(decl.spec.pandoc_args["toc"], Value::Bool(true));
    }

    #[test]
    fn test_alias_and_name_together() {
        let err = declaration_from_yaml(&yaml("{to: pdf, output_format: html}")).unwrap_err();
        assert_eq!(
            err,
            FieldError::Duplicate {
                field: OUTPUT_FORMAT,
                alias: "to",
            }
        );
    }

    #[test]
    fn test_unknown_keys_sorted() {
        let err = declaration_from_yaml(&yaml("{zebra: 1, output_format: html, colour: red}"))
            .unwrap_err();
        match err {
            FieldError::Unknown { keys, valid } => {
                assert_eq!(keys, vec!["colour", "zebra"]);
                assert!(valid.contains(&"metadata"));
            }
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn test_not_a_mapping() {
        let err = declaration_from_yaml(&yaml("- html")).unwrap_err();
        assert_eq!(err, FieldError::NotAMapping { found: "a sequence" });
    }

    #[test]
    fn test_metadata_must_be_mapping() {
        let err = declaration_from_yaml(&yaml("{metadata: just a string}")).unwrap_err();
        assert_eq!(
            err,
            FieldError::WrongType {
                field: "metadata".into(),
                expected: "a mapping",
                found: "a string",
            }
        );
    }

    #[test]
    fn test_output_format_must_be_string() {
        let err = declaration_from_yaml(&yaml("{output_format: [html, pdf]}")).unwrap_err();
        assert_eq!(err.field(), Some("output_format"));
    }

    #[test]
    fn test_blank_and_null_strings_are_absent() {
        let decl = declaration_from_yaml(&yaml("{output_format: '  ', output_file: null}")).unwrap();
        assert!(decl.spec.output_format.is_none());
        assert!(decl.spec.output_file.is_none());
    }

    #[test]
    fn test_null_maps_are_empty() {
        let decl = declaration_from_yaml(&yaml("{metadata: null, filters: ~}")).unwrap();
        assert!(decl.spec.metadata.is_empty());
        assert!(decl.spec.filters.is_empty());
    }

    #[test]
    fn test_filter_value_must_be_boolean() {
        let err = declaration_from_yaml(&yaml("{filters: {pagebreak.lua: yes please}}")).unwrap_err();
        assert_eq!(err.field(), Some("filters.pagebreak.lua"));
    }

    #[test]
    fn test_filter_list_enables_each() {
        let decl = declaration_from_yaml(&yaml("{filters: [a.lua, citeproc]}")).unwrap();
        assert!(decl.spec.filters["a.lua"]);
        assert!(decl.spec.filters["citeproc"]);
    }

    #[test]
    fn test_numeric_keys_are_stringified() {
        let decl = declaration_from_yaml(&yaml("{metadata: {2024: leap}}")).unwrap();
        assert!(decl.spec.metadata.contains_key("2024"));
    }
}
