//! Core job processing for panjob
//!
//! This crate takes the jobs a document declares, resolves them against the
//! user's presets, translates them into pandoc arguments and runs pandoc.
//!
//! # Architecture
//!
//! - [`Document`] - Job declarations read from front matter
//! - [`AppConfig`] - Presets and pandoc location from `panjob.yaml`
//! - [`Batch`] - Lazy per-job resolution and translation with isolated failures
//! - [`PandocInvocation`] - One pandoc process for one translated job
//!
//! # Example
//!
//! ```ignore
//! use panjob_core::{AppConfig, Batch, Document, PandocInvocation, find_pandoc};
//!
//! let config = AppConfig::discover()?;
//! let document = Document::read("report.md".as_ref())?;
//! let pandoc = find_pandoc(config.pandoc_path.as_deref())?;
//!
//! for outcome in Batch::run(&document, &config.presets) {
//!     if let Ok(job) = outcome.result {
//!         PandocInvocation::new(&pandoc, job.args, "report.md").run()?;
//!     }
//! }
//! ```

pub mod app_config;
pub mod batch;
pub mod document;
pub mod error;
pub mod invoke;
pub mod translate;

// Re-export commonly used types
pub use app_config::{AppConfig, CONFIG_FILENAME, config_template};
pub use batch::{Batch, BatchSummary, JobOutcome, TranslatedJob, process_job, select};
pub use document::{Document, DocumentError, JOBS_KEY};
pub use error::{ErrorKind, JobError, PanjobError, Result, TranslateError};
pub use invoke::{InvokeError, PANDOC_ENV, PandocInvocation, find_pandoc};
pub use translate::translate;
