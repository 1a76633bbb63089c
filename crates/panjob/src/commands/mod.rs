//! Command implementations for the panjob CLI
//!
//! Each command module handles the CLI interface and delegates to
//! panjob-core for the actual work.

pub mod presets;
pub mod render;
pub mod template;
