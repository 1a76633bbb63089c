//! Version reporting for panjob
//!
//! Pre-1.0 builds report the crate version with a `-dev` suffix so that bug
//! reports make the unstable status obvious. From 1.0.0 on the plain crate
//! version is reported.

/// Get the version string that should be reported by the CLI
pub fn cli_version() -> &'static str {
    const CARGO_VERSION: &str = env!("CARGO_PKG_VERSION");
    const DEV_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "-dev");

    if is_pre_release(CARGO_VERSION) {
        DEV_VERSION
    } else {
        CARGO_VERSION
    }
}

/// Get the Cargo package version
pub fn cargo_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

fn is_pre_release(version: &str) -> bool {
    version.starts_with("0.")
}
