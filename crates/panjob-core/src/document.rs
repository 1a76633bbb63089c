/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Job declarations embedded in a document's front matter.
 */

//! Document front matter.
//!
//! A document carries its job list in a YAML front-matter block:
//!
//! ```yaml
//! ---
//! title: Quarterly report
//! panjob:
//!   - use_preset: default
//!     output_format: html
//!   - output_format: pdf
//!     pandoc_args:
//!       pdf_engine: weasyprint
//! ---
//! ```
//!
//! Only the `panjob` key is interpreted. Everything else is kept as opaque
//! document metadata.

use std::path::Path;

use panjob_config::{Value, value_kind};
use serde_yaml::Mapping;
use thiserror::Error;

use crate::error::{PanjobError, Result};

/// Front-matter key holding the job list.
pub const JOBS_KEY: &str = "panjob";

/// The front matter of a document is unusable.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The front-matter block is not valid YAML.
    #[error("invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    /// The front matter is valid YAML but not a mapping.
    #[error("front matter must be a mapping, found {found}")]
    NotAMapping {
        /// Kind of value that was found instead
        found: &'static str,
    },

    /// The job list is not a list.
    #[error("`panjob` must be a list of job declarations, found {found}")]
    JobsNotAList {
        /// Kind of value that was found instead
        found: &'static str,
    },
}

/// A document's job declarations plus its other front matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Raw job declarations, in declaration order
    pub jobs: Vec<Value>,

    /// Remaining front-matter entries (not interpreted)
    pub metadata: Mapping,
}

impl Document {
    /// Build a document from already-parsed front matter.
    ///
    /// `null` front matter yields a document without jobs.
    pub fn from_front_matter(front_matter: Value) -> std::result::Result<Self, DocumentError> {
        let mut metadata = match front_matter {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(DocumentError::NotAMapping {
                    found: value_kind(&other),
                });
            }
        };

        let jobs = match metadata.remove(JOBS_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(jobs)) => jobs,
            Some(other) => {
                return Err(DocumentError::JobsNotAList {
                    found: value_kind(&other),
                });
            }
        };

        Ok(Self { jobs, metadata })
    }

    /// Parse document text. Text without front matter has no jobs.
    pub fn parse(text: &str) -> std::result::Result<Self, DocumentError> {
        match split_front_matter(text) {
            Some((yaml, _body)) if yaml.trim().is_empty() => Ok(Self::default()),
            Some((yaml, _body)) => {
                let front_matter: Value = serde_yaml::from_str(yaml)?;
                Self::from_front_matter(front_matter)
            }
            None => Ok(Self::default()),
        }
    }

    /// Read and parse a document file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| PanjobError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| PanjobError::Document {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Document title, if the front matter has a string `title`.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }

    /// Number of declared jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}

/// Split text into its front-matter YAML and the remaining body.
///
/// The block must start on the first line with `---` and end with a line
/// holding `---` or `...`. Returns `None` if there is no complete block.
pub fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some((&text[start..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}
