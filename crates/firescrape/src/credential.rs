//! API key lookup
//!
//! The key comes from the `FIRECRAWL_API_KEY` environment variable or, when
//! that is unset or empty, from a `FIRECRAWL_API_KEY=...` line in
//! `~/.claude/.env`. All reads go through a [`CredentialSource`], so callers
//! decide where values come from and tests never touch the real environment.

use crate::error::ScrapeError;
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Environment variable (and config key) holding the API key
pub const API_KEY_VAR: &str = "FIRECRAWL_API_KEY";

/// Config file location relative to the home directory
const CONFIG_FILE: &str = ".claude/.env";

/// Firecrawl API key
///
/// `Debug` output is redacted so the key never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for building the Authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Where credential lookups read from
pub trait CredentialSource {
    /// Value of an environment variable, if set
    fn env_var(&self, name: &str) -> Option<String>;

    /// Contents of the `KEY=value` config file, if it exists
    fn read_config(&self) -> Option<String>;
}

/// Reads the real process environment and `~/.claude/.env`
#[derive(Debug, Clone)]
pub struct ProcessEnvironment {
    config_path: Option<PathBuf>,
}

impl ProcessEnvironment {
    /// Use the config file under the current user's home directory
    pub fn new() -> Self {
        Self {
            config_path: dirs::home_dir().map(|home| home.join(CONFIG_FILE)),
        }
    }
}

impl Default for ProcessEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for ProcessEnvironment {
    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).and_then(|value| env_value_to_string(name, value))
    }

    fn read_config(&self) -> Option<String> {
        let path = self.config_path.as_ref()?;
        match std::fs::read_to_string(path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config file");
                None
            }
        }
    }
}

/// Non-UTF-8 values cannot be sent as a header; warn instead of treating them as unset
fn env_value_to_string(name: &str, value: OsString) -> Option<String> {
    match value.into_string() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, "Environment variable is not valid UTF-8, ignoring it");
            None
        }
    }
}

/// Resolve the API key, environment first, then config file
///
/// A non-empty environment value is returned as-is and the config file is
/// not read. Returns [`ScrapeError::MissingCredential`] when neither source
/// has a value.
pub fn resolve_credential(source: &impl CredentialSource) -> Result<Credential, ScrapeError> {
    if let Some(key) = source.env_var(API_KEY_VAR).filter(|k| !k.is_empty()) {
        debug!(source = "environment", "Resolved API key");
        return Ok(Credential::new(key));
    }

    if let Some(key) = source.read_config().as_deref().and_then(parse_config) {
        debug!(source = "config", "Resolved API key");
        return Ok(Credential::new(key));
    }

    Err(ScrapeError::MissingCredential)
}

/// Find the first `FIRECRAWL_API_KEY=` line and return its unquoted value
fn parse_config(contents: &str) -> Option<String> {
    let prefix = format!("{API_KEY_VAR}=");
    contents
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .map(|value| value.trim().trim_matches('"').trim_matches('\''))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
