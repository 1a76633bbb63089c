/*
 * batch_integration.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for reading a document and translating its jobs.
 */

//! Integration tests for the job pipeline.
//!
//! These tests go from files on disk (a `panjob.yaml` and a markdown
//! document) to the pandoc argument lists, the way the CLI does.

use std::fs;
use std::path::PathBuf;

use panjob_core::{AppConfig, Batch, BatchSummary, CONFIG_FILENAME, Document, ErrorKind};
use tempfile::TempDir;

const CONFIG: &str = r#"
presets:
  default:
    output_format: pdf
    pandoc_args:
      standalone: true
      toc: true
    filters:
      pagebreak.lua: true

  journal:
    output_format: pdf
    output_file: journal.pdf
    metadata:
      author: Journal Staff
      toc-own-page: true
    pandoc_args:
      pdf_engine: xelatex
    filters:
      pandoc-crossref: true
      pagebreak.lua: true
      section-refs.lua: true
      abstract.lua: true
      scholarly.lua: true
"#;

const DOCUMENT: &str = r#"---
title: Field notes
panjob:
  - use_preset: default
    output_format: html
    output_file: notes.html
  - use_preset: journal
    metadata:
      author: ada@example.org
    filters:
      wordcount.lua: true
  - output_format: pdf
    pandoc_args:
      pdf_engine: weasyprint
---

# Field notes

Observations go here.
"#;

struct Workspace {
    _temp: TempDir,
    config: PathBuf,
    document: PathBuf,
}

fn workspace(config: &str, document: &str) -> Workspace {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp.path().join(CONFIG_FILENAME);
    let document_path = temp.path().join("notes.md");
    fs::write(&config_path, config).expect("Failed to write config");
    fs::write(&document_path, document).expect("Failed to write document");

    Workspace {
        _temp: temp,
        config: config_path,
        document: document_path,
    }
}

#[test]
fn test_three_job_document() {
    let ws = workspace(CONFIG, DOCUMENT);
    let config = AppConfig::load(&ws.config).unwrap();
    let document = Document::read(&ws.document).unwrap();
    assert_eq!(document.title(), Some("Field notes"));

    let args: Vec<Vec<String>> = Batch::run(&document, &config.presets)
        .map(|outcome| outcome.result.expect("job should translate").args)
        .collect();

    assert_eq!(args.len(), 3);

    assert_eq!(
        args[0],
        vec![
            "--to=html",
            "--output=notes.html",
            "--standalone",
            "--toc",
            "--lua-filter=pagebreak.lua",
        ]
    );

    assert_eq!(
        args[1],
        vec![
            "--to=pdf",
            "--output=journal.pdf",
            "--metadata=author:ada@example.org",
            "--metadata=toc-own-page:true",
            "--pdf-engine=xelatex",
            "--lua-filter=abstract.lua",
            "--lua-filter=pagebreak.lua",
            "--filter=pandoc-crossref",
            "--lua-filter=scholarly.lua",
            "--lua-filter=section-refs.lua",
            "--lua-filter=wordcount.lua",
        ]
    );
    assert!(!args[1].iter().any(|a| a.contains("Journal Staff")));

    assert_eq!(args[2], vec!["--to=pdf", "--pdf-engine=weasyprint"]);
}

#[test]
fn test_broken_job_does_not_stop_the_batch() {
    let ws = workspace(
        CONFIG,
        r#"---
panjob:
  - use_preset: jurnal
  - output_format: html
    outptu_file: typo.html
  - use_preset: journal
    metadata:
      toc-own-page: false
---
"#,
    );
    let config = AppConfig::load(&ws.config).unwrap();
    let document = Document::read(&ws.document).unwrap();

    let outcomes: Vec<_> = Batch::run(&document, &config.presets).collect();
    assert_eq!(outcomes.len(), 3);

    let first = outcomes[0].result.as_ref().unwrap_err();
    assert_eq!(first.kind(), ErrorKind::UnknownPreset);
    assert!(first.to_string().contains("jurnal"));
    assert!(first.to_string().contains("journal"));

    let second = outcomes[1].result.as_ref().unwrap_err();
    assert_eq!(second.kind(), ErrorKind::InvalidField);
    assert_eq!(second.field().as_deref(), Some("outptu_file"));

    let third = outcomes[2].result.as_ref().unwrap();
    assert!(third.args.contains(&"--metadata=toc-own-page:false".to_string()));

    let summary = outcomes.iter().collect::<BatchSummary>();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 2);
}

#[test]
fn test_document_without_jobs() {
    let ws = workspace(CONFIG, "# No front matter\n");
    let config = AppConfig::load(&ws.config).unwrap();
    let document = Document::read(&ws.document).unwrap();
    assert_eq!(Batch::run(&document, &config.presets).count(), 0);
}

#[test]
fn test_inherited_preset_from_file() {
    let ws = workspace(
        r#"
presets:
  base:
    output_format: pdf
    metadata: {lang: en}
  thesis:
    use_preset: base
    metadata: {documentclass: report}
"#,
        "---\npanjob:\n  - use_preset: thesis\n---\n",
    );
    let config = AppConfig::load(&ws.config).unwrap();
    let document = Document::read(&ws.document).unwrap();

    let job = Batch::run(&document, &config.presets)
        .next()
        .unwrap()
        .result
        .unwrap();
    assert_eq!(
        job.args,
        vec![
            "--to=pdf",
            "--metadata=documentclass:report",
            "--metadata=lang:en",
        ]
    );
}
