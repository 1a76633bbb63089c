//! Presets command implementation
//!
//! Lists each preset after inheritance has been applied, together with the
//! pandoc arguments it contributes on its own.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use panjob_config::{JobSpec, PresetStore};
use panjob_core::{AppConfig, translate};

/// Execute the presets command
pub fn execute(config: Option<&Path>) -> Result<()> {
    let config =
        AppConfig::load_or_discover(config).context("Failed to load panjob configuration")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Some(source) = &config.source {
        writeln!(out, "# {}", source.display())?;
    }
    list_presets(&config.presets, &mut out)
}

fn list_presets(presets: &PresetStore, out: &mut impl Write) -> Result<()> {
    if presets.is_empty() {
        writeln!(out, "(no presets)")?;
        return Ok(());
    }

    for (name, spec) in presets.iter() {
        writeln!(out, "{name}: {}", describe(spec))?;
    }
    Ok(())
}

fn describe(spec: &JobSpec) -> String {
    if spec.is_empty() {
        return "(empty)".to_string();
    }
    match translate(spec) {
        Ok(args) if args.is_empty() => "(no arguments)".to_string(),
        Ok(args) => args.join(" "),
        Err(e) => format!("(invalid: {e})"),
    }
}
