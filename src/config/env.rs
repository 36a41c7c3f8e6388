//! Environment variable snapshot.
//!
//! The process environment is read exactly once, here. Everything downstream
//! receives values through [`Environment`] or the resolved configuration.

use std::collections::HashMap;

/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the login page URL.
pub const BASE_URL: &str = "BASE_URL";
/// Environment variable holding the login username.
pub const AUTH_USERNAME: &str = "AUTH_USERNAME";
/// Environment variable holding the login password.
pub const AUTH_PASSWORD: &str = "AUTH_PASSWORD";
/// Environment variable holding an explicit Chromium binary path.
pub const CHROMIUM_PATH: &str = "CHROMIUM_PATH";
/// Environment variable toggling anonymized telemetry in the agent framework.
pub const ANONYMIZED_TELEMETRY: &str = "ANONYMIZED_TELEMETRY";
/// Environment variable selecting the agent framework log level.
pub const BROWSER_USE_LOGGING_LEVEL: &str = "BROWSER_USE_LOGGING_LEVEL";
/// Environment variable toggling headless mode.
pub const HEADLESS: &str = "HEADLESS";
/// Environment variable selecting the LLM model.
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
/// Environment variable naming the agent program to launch.
pub const AGENT_COMMAND: &str = "AGENT_COMMAND";

/// An immutable snapshot of environment variables.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the current process environment.
    ///
    /// A `.env` file in the working directory is loaded first. Variables that
    /// are already set take priority over the file.
    pub fn from_process() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment file {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
        }
        Self::from_pairs(std::env::vars())
    }

    /// Builds an environment from explicit name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns a value exactly as set, treating unset and blank variables alike.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Returns true if the variable is set to a non-blank value.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
