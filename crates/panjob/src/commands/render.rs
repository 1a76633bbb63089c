/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render command implementation
 */

//! Render command implementation.
//!
//! For each document: read its front matter, resolve and translate every
//! declared job, then run pandoc once per translated job (or print the
//! command line with `--dry-run`). A job that fails to resolve or translate
//! is reported and skipped; the remaining jobs still run. The command fails
//! at the end if any job failed.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use panjob_core::{
    AppConfig, Batch, BatchSummary, Document, JobOutcome, PandocInvocation, find_pandoc, select,
};

/// Arguments for the render command
#[derive(Debug)]
pub struct RenderArgs {
    /// Documents to process
    pub documents: Vec<PathBuf>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// Single job to process
    pub job: Option<usize>,
    /// Print command lines instead of running pandoc
    pub dry_run: bool,
}

/// Execute the render command
pub fn execute(args: RenderArgs) -> Result<()> {
    let config = AppConfig::load_or_discover(args.config.as_deref())
        .context("Failed to load panjob configuration")?;
    if let Some(source) = &config.source {
        info!("Loaded configuration: {}", source.display());
    }

    let pandoc = if args.dry_run {
        // Dry runs still show a real binary when one can be found
        find_pandoc(config.pandoc_path.as_deref()).unwrap_or_else(|_| PathBuf::from("pandoc"))
    } else {
        find_pandoc(config.pandoc_path.as_deref())?
    };
    debug!(pandoc = %pandoc.display(), "pandoc binary");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut summary = BatchSummary::default();

    for path in &args.documents {
        render_document(path, &config, &pandoc, &args, &mut out, &mut summary)?;
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "render finished"
    );

    if !summary.all_succeeded() {
        anyhow::bail!("{} of {} jobs failed", summary.failed, summary.total());
    }
    Ok(())
}

/// Process every selected job of one document.
///
/// Problems with the document itself are reported and counted as a failed
/// job so that the other documents are still processed. Only write errors
/// on `out` are returned.
fn render_document(
    path: &Path,
    config: &AppConfig,
    pandoc: &Path,
    args: &RenderArgs,
    out: &mut impl Write,
    summary: &mut BatchSummary,
) -> Result<()> {
    let document = match Document::read(path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("{e}");
            summary.failed += 1;
            return Ok(());
        }
    };

    if document.job_count() == 0 && args.job.is_none() {
        warn!("{}: no jobs declared", path.display());
        return Ok(());
    }

    let outcomes: Box<dyn Iterator<Item = JobOutcome> + '_> = match args.job {
        Some(index) => match select(&document, &config.presets, index) {
            Some(outcome) => Box::new(std::iter::once(outcome)),
            None => {
                eprintln!(
                    "{}: no job at index {index} ({} declared)",
                    path.display(),
                    document.job_count()
                );
                summary.failed += 1;
                return Ok(());
            }
        },
        None => Box::new(Batch::run(&document, &config.presets)),
    };

    for outcome in outcomes {
        let index = outcome.index;
        let job = match outcome.result {
            Ok(job) => job,
            Err(e) => {
                eprintln!("{}: job {index}: {}: {e}", path.display(), e.kind());
                summary.failed += 1;
                continue;
            }
        };

        let invocation = PandocInvocation::new(pandoc, job.args, path);
        if args.dry_run {
            writeln!(out, "{invocation}")?;
            summary.succeeded += 1;
            continue;
        }

        match invocation.run() {
            Ok(()) => {
                if let Some(file) = &job.output_file {
                    info!("Wrote {}", file.display());
                }
                summary.succeeded += 1;
            }
            Err(e) => {
                eprintln!("{}: job {index}: {e}", path.display());
                summary.failed += 1;
            }
        }
    }

    Ok(())
}
