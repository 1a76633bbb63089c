//! Shared utilities for panjob

pub mod version;

pub use version::{cargo_version, cli_version};
