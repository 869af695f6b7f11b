// Build-time identity from Cargo.toml, logged once at startup

/// Package version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// "asg-metrics 0.3.0": the startup log line and one-shot banner.
pub fn banner() -> String {
    format!("{} {}", NAME, VERSION)
}
