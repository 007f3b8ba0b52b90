//! Tracing setup shared by both binaries.
//!
//! Logs go to stderr: stdout belongs to the REPL output and to the MCP
//! transport.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "pokedex_explorer=info,pokedex_explorer_mcp=info";

/// Install the global subscriber. Honors `RUST_LOG`; safe to call twice.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
