//! Template command implementation

use anyhow::Result;

/// Print a commented `panjob.yaml` to stdout.
pub fn execute() -> Result<()> {
    print!("{}", panjob_core::config_template());
    Ok(())
}
