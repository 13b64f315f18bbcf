//! Tracing subscriber setup.
//!
//! Logs go to stderr so they never interleave with rendered output on
//! stdout. The filter comes from `ROSTER_LOG` (standard `EnvFilter` syntax,
//! e.g. `ROSTER_LOG=roster=debug`); without it only warnings are shown, or
//! debug output with `--verbose`.

use tracing_subscriber::EnvFilter;

use crate::constants::ENV_LOG;
use crate::env::Env;

/// Build the filter directive set for this run.
pub fn env_filter(env: &Env, verbose: bool) -> EnvFilter {
    let fallback = if verbose { "roster=debug" } else { "warn" };
    match env.var(ENV_LOG) {
        Ok(spec) => EnvFilter::try_new(&spec).unwrap_or_else(|e| {
            eprintln!("Warning: ignoring invalid {ENV_LOG} value '{spec}': {e}");
            EnvFilter::new(fallback)
        }),
        Err(_) => EnvFilter::new(fallback),
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are no-ops.
pub fn init(env: &Env, verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(env, verbose))
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .try_init();
}
