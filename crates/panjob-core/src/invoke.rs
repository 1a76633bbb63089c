/*
 * invoke.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Running pandoc for a translated job.
 */

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming the pandoc binary to use.
pub const PANDOC_ENV: &str = "PANJOB_PANDOC";

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("pandoc not found: set `pandoc_path` in panjob.yaml, set PANJOB_PANDOC, or add pandoc to PATH")]
    NotFound,

    #[error("Failed to run {}: {source}", .binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} failed ({status})", .binary.display())]
    Failed { binary: PathBuf, status: ExitStatus },
}

/// Find the pandoc binary.
///
/// Searches in this order:
/// 1. `configured`, the `pandoc_path` from panjob.yaml
/// 2. the `PANJOB_PANDOC` environment variable
/// 3. system PATH via `which`
pub fn find_pandoc(configured: Option<&Path>) -> Result<PathBuf, InvokeError> {
    if let Some(path) = configured {
        debug!(path = %path.display(), "using configured pandoc");
        return Ok(path.to_path_buf());
    }

    if let Some(path) = std::env::var_os(PANDOC_ENV).filter(|p| !p.is_empty()) {
        debug!("using pandoc from {PANDOC_ENV}");
        return Ok(PathBuf::from(path));
    }

    which::which("pandoc").map_err(|_| InvokeError::NotFound)
}

/// One pandoc run: binary, translated arguments and the input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PandocInvocation {
    pub binary: PathBuf,
    pub args: Vec<String>,
    pub input: PathBuf,
}

impl PandocInvocation {
    pub fn new(binary: impl Into<PathBuf>, args: Vec<String>, input: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            args,
            input: input.into(),
        }
    }

    /// Full argument vector, binary first and input document last.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 2);
        argv.push(self.binary.display().to_string());
        argv.extend(self.args.iter().cloned());
        argv.push(self.input.display().to_string());
        argv
    }

    /// Build the process command without running it.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args).arg(&self.input);
        cmd
    }

    /// Run pandoc with inherited stdio and wait for it to finish.
    pub fn run(&self) -> Result<(), InvokeError> {
        info!("Running: {self}");

        let status = self
            .command()
            .status()
            .map_err(|source| InvokeError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !status.success() {
            return Err(InvokeError::Failed {
                binary: self.binary.clone(),
                status,
            });
        }

        Ok(())
    }
}

impl fmt::Display for PandocInvocation {
    /// Shell-like rendering; arguments with whitespace are single-quoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let argv = self.argv();
        let mut first = true;
        for arg in &argv {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            if arg.is_empty() || arg.chars().any(char::is_whitespace) {
                write!(f, "'{}'", arg.replace('\'', r"'\''"))?;
            } else {
                f.write_str(arg)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation() -> PandocInvocation {
        PandocInvocation::new(
            "/usr/bin/pandoc",
            vec!["--to=pdf".into(), "--metadata=author:Ada Lovelace".into()],
            "paper.md",
        )
    }

    #[test]
    fn test_argv_order() {
        assert_eq!(
            invocation().argv(),
            vec![
                "/usr/bin/pandoc",
                "--to=pdf",
                "--metadata=author:Ada Lovelace",
                "paper.md",
            ]
        );
    }

    #[test]
    fn test_display_quotes_whitespace() {
        assert_eq!(
            invocation().to_string(),
            "/usr/bin/pandoc --to=pdf '--metadata=author:Ada Lovelace' paper.md"
        );
    }

    #[test]
    fn test_command() {
        let cmd = invocation().command();
        assert_eq!(cmd.get_program(), "/usr/bin/pandoc");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args.last().map(String::as_str), Some("paper.md"));
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_configured_path_wins() {
        let path = find_pandoc(Some(Path::new("/opt/pandoc/bin/pandoc"))).unwrap();
        assert_eq!(path, PathBuf::from("/opt/pandoc/bin/pandoc"));
    }

    #[test]
    fn test_spawn_failure() {
        let err = PandocInvocation::new("/definitely/not/pandoc", vec![], "in.md")
            .run()
            .unwrap_err();
        assert!(matches!(err, InvokeError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_message() {
        use std::os::unix::process::ExitStatusExt;

        let err = InvokeError::Failed {
            binary: PathBuf::from("pandoc"),
            status: ExitStatus::from_raw(64 << 8),
        };
        assert_eq!(err.to_string(), "pandoc failed (exit status: 64)");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failure() {
        let err = PandocInvocation::new("false", vec![], "in.md").run().unwrap_err();
        assert!(matches!(err, InvokeError::Failed { .. }));
    }
}
