/*
 * batch.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Resolution and translation of every job declared by a document.
 */

//! Batch driving.
//!
//! A document declares zero or more jobs. [`Batch`] resolves and translates
//! them one at a time, in declaration order, yielding one [`JobOutcome`] per
//! declaration. A failing job never stops the batch: its outcome carries the
//! error and the next job is processed normally.

use std::path::PathBuf;

use panjob_config::{JobSpec, PresetStore, Value, resolve_raw};
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::JobError;
use crate::translate::translate;

/// A job that resolved and translated successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedJob {
    /// Pandoc arguments, ready to pass to the binary
    pub args: Vec<String>,

    /// Where the artifact goes, if the job says
    pub output_file: Option<PathBuf>,

    /// The fully resolved specification the arguments came from
    pub spec: JobSpec,
}

/// Result of processing one declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    /// Zero-based position of the declaration in the document
    pub index: usize,

    /// Translated job or the reason it failed
    pub result: Result<TranslatedJob, JobError>,
}

impl JobOutcome {
    /// Check whether this job produced arguments.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Resolve and translate a single raw declaration.
pub fn process_job(
    raw: &Value,
    presets: &PresetStore,
    defaults: &JobSpec,
) -> Result<TranslatedJob, JobError> {
    let spec = resolve_raw(raw, presets, defaults)?;
    let args = translate(&spec)?;
    Ok(TranslatedJob {
        args,
        output_file: spec.output_file.clone(),
        spec,
    })
}

/// Lazy iterator over the outcomes of a document's jobs.
///
/// Each call to `next` processes exactly one declaration, so a consumer that
/// stops early never resolves the remaining jobs.
#[derive(Debug)]
pub struct Batch<'a> {
    jobs: std::iter::Enumerate<std::slice::Iter<'a, Value>>,
    presets: &'a PresetStore,
}

impl<'a> Batch<'a> {
    /// Start a batch over `document`'s jobs.
    pub fn run(document: &'a Document, presets: &'a PresetStore) -> Self {
        Self::over(&document.jobs, presets)
    }

    /// Start a batch over a slice of raw declarations.
    pub fn over(jobs: &'a [Value], presets: &'a PresetStore) -> Self {
        Self {
            jobs: jobs.iter().enumerate(),
            presets,
        }
    }
}

impl Iterator for Batch<'_> {
    type Item = JobOutcome;

    fn next(&mut self) -> Option<JobOutcome> {
        let (index, raw) = self.jobs.next()?;
        let result = process_job(raw, self.presets, &JobSpec::neutral());

        match &result {
            Ok(job) => debug!(index, args = job.args.len(), "job translated"),
            Err(e) => warn!(index, kind = %e.kind(), "job failed: {e}"),
        }

        Some(JobOutcome { index, result })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.jobs.size_hint()
    }
}

impl ExactSizeIterator for Batch<'_> {}

/// Process only the job at `index`. Returns `None` if there is no such job.
pub fn select(document: &Document, presets: &PresetStore, index: usize) -> Option<JobOutcome> {
    let raw = document.jobs.get(index)?;
    Some(JobOutcome {
        index,
        result: process_job(raw, presets, &JobSpec::neutral()),
    })
}

/// Tally of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Count one outcome.
    pub fn record(&mut self, outcome: &JobOutcome) {
        if outcome.is_ok() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// True when no job failed. An empty batch counts as success.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

impl<'a> FromIterator<&'a JobOutcome> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = &'a JobOutcome>>(iter: I) -> Self {
        let mut summary = Self::default();
        for outcome in iter {
            summary.record(outcome);
        }
        summary
    }
}
