//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and defaults so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "roster";

/// Crate version, as reported by `roster version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compilation target triple (set by `build.rs`).
pub const TARGET: &str = env!("TARGET");

/// `User-Agent` header sent with every API request.
pub const USER_AGENT: &str = concat!("roster/", env!("CARGO_PKG_VERSION"));

/// Local config filename (e.g. `.roster.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".roster.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "roster";

/// Collection endpoint used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// Number of users shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// How long a success notice stays visible.
pub const DEFAULT_NOTICE_SECS: u64 = 3;

/// HTTP request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Website sent with every newly created user.
pub const DEFAULT_WEBSITE: &str = "example.com";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_API_URL: &str = "ROSTER_API_URL";
pub const ENV_PAGE_SIZE: &str = "ROSTER_PAGE_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "ROSTER_TIMEOUT_SECS";
pub const ENV_ID_STRATEGY: &str = "ROSTER_ID_STRATEGY";
pub const ENV_LOG: &str = "ROSTER_LOG";
