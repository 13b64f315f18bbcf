//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests use [`Env::mock()`] backed by a `HashMap`, so config layering can be
//! exercised without touching the process environment.

use std::collections::HashMap;
use std::str::FromStr;

/// Environment variable reader.
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up an environment variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var(name),
        }
    }

    /// Look up a variable and parse it.
    ///
    /// `None` when the variable is absent or blank; `Some(Err(raw))` carries
    /// the raw value back when parsing fails so callers can warn about it.
    pub fn parsed<T: FromStr>(&self, name: &str) -> Option<Result<T, String>> {
        let raw = self.var(name).ok()?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(trimmed.parse::<T>().map_err(|_| raw.clone()))
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_env_reads_cargo_manifest_dir() {
        let env = Env::real();
        assert!(env.var("CARGO_MANIFEST_DIR").is_ok());
    }

    #[test]
    fn mock_env_returns_set_values() {
        let env = Env::mock([("ROSTER_API_URL", "http://localhost/users")]);
        assert_eq!(env.var("ROSTER_API_URL").unwrap(), "http://localhost/users");
        assert!(env.var("NONEXISTENT").is_err());
    }

    #[test]
    fn parsed_handles_valid_invalid_and_blank() {
        let env = Env::mock([("GOOD", " 12 "), ("BAD", "twelve"), ("BLANK", "  ")]);
        assert_eq!(env.parsed::<usize>("GOOD"), Some(Ok(12)));
        assert_eq!(env.parsed::<usize>("BAD"), Some(Err("twelve".to_string())));
        assert_eq!(env.parsed::<usize>("BLANK"), None);
        assert_eq!(env.parsed::<usize>("MISSING"), None);
    }
}
