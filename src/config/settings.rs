//! Run configuration and its resolution from defaults, environment and CLI.
//!
//! Three sources are merged per field, highest precedence first:
//! 1. CLI overrides (when supplied)
//! 2. Environment variables (when set to a non-blank value)
//! 3. Built-in defaults (optional fields only)
//!
//! Every validation rule runs on every resolution; failures are collected and
//! returned together so a misconfigured run reports everything at once.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use super::env::{self, Environment};
use super::secret::SecretValue;

/// Default LLM model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default for anonymized telemetry in the agent framework.
pub const DEFAULT_ANONYMIZED_TELEMETRY: bool = true;
/// Default headless mode.
pub const DEFAULT_HEADLESS: bool = false;
/// Default agent program.
pub const DEFAULT_AGENT_COMMAND: &str = "browser-use";

/// A single reason a candidate configuration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// A required value was not supplied by any source.
    #[error("{var} is required{}", .flag.map(|f| format!(" (set it in the environment or pass {})", f)).unwrap_or_default())]
    Missing {
        var: &'static str,
        flag: Option<&'static str>,
    },

    /// A value was supplied explicitly but is empty.
    #[error("{var} must not be empty")]
    Empty { var: &'static str },

    /// The login URL is not an absolute URL.
    #[error("{var} must be an absolute URL with a scheme and host, got {value:?} ({reason})")]
    InvalidUrl {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// The logging level is not one of the recognized values.
    #[error("{var} must be one of result, debug, info; got {value:?}")]
    InvalidLoggingLevel { var: &'static str, value: String },

    /// A boolean-valued variable holds something that is not boolean-like.
    #[error("{var} must be true or false, got {value:?}")]
    InvalidBoolean { var: &'static str, value: String },
}

/// Configuration validation failed.
///
/// Holds every failure found, in field order, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Configuration errors:\n{}", format_failures(.failures))]
pub struct ConfigError {
    failures: Vec<ValidationFailure>,
}

fn format_failures(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  - {}", f))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ConfigError {
    /// Returns the individual failures in the order they were found.
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Returns human-readable messages, one per failure.
    pub fn messages(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }
}

/// Log verbosity for the run and the agent framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    /// Only the final outcome.
    Result,
    /// Everything, including agent internals.
    Debug,
    /// Progress messages.
    Info,
}

impl Default for LoggingLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl LoggingLevel {
    /// Returns the `tracing` filter directive for this level.
    pub fn filter_directive(&self) -> &'static str {
        match self {
            LoggingLevel::Result => "warn",
            LoggingLevel::Debug => "debug",
            LoggingLevel::Info => "info",
        }
    }
}

impl fmt::Display for LoggingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingLevel::Result => write!(f, "result"),
            LoggingLevel::Debug => write!(f, "debug"),
            LoggingLevel::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for LoggingLevel {
    type Err = ValidationFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "result" => Ok(LoggingLevel::Result),
            "debug" => Ok(LoggingLevel::Debug),
            "info" => Ok(LoggingLevel::Info),
            _ => Err(ValidationFailure::InvalidLoggingLevel {
                var: env::BROWSER_USE_LOGGING_LEVEL,
                value: s.to_string(),
            }),
        }
    }
}

/// Values supplied on the command line.
///
/// `None` means "not overridden".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--headless`
    pub headless: Option<bool>,
    /// `--url <URL>`
    pub url: Option<String>,
    /// `--model <NAME>`
    pub model: Option<String>,
}

/// Validated, immutable run configuration.
///
/// Only produced by [`ConfigResolver`]; required fields are always non-empty.
/// Secrets are redacted in `Debug`, `Display` and serialized output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    api_key: SecretValue,
    base_url: String,
    username: String,
    password: SecretValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    chromium_path: Option<PathBuf>,
    anonymized_telemetry: bool,
    logging_level: LoggingLevel,
    headless: bool,
    model: String,
    agent_command: String,
}

impl Configuration {
    /// Resolves a configuration from the environment and CLI overrides.
    ///
    /// # Example
    ///
    /// ```rust
    /// use login_agent::config::{CliOverrides, Configuration, Environment};
    ///
    /// let env = Environment::from_pairs([
    ///     ("OPENAI_API_KEY", "sk-x"),
    ///     ("BASE_URL", "https://example.com"),
    ///     ("AUTH_USERNAME", "student"),
    ///     ("AUTH_PASSWORD", "Password123"),
    /// ]);
    /// let config = Configuration::resolve(&env, &CliOverrides::default()).unwrap();
    /// assert_eq!(config.model(), "gpt-4o-mini");
    /// ```
    pub fn resolve(env: &Environment, overrides: &CliOverrides) -> Result<Self, ConfigError> {
        ConfigResolver::new(env, overrides).resolve()
    }

    pub fn api_key(&self) -> &SecretValue {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretValue {
        &self.password
    }

    /// Explicit browser binary, or `None` to auto-discover one.
    pub fn chromium_path(&self) -> Option<&Path> {
        self.chromium_path.as_deref()
    }

    pub fn anonymized_telemetry(&self) -> bool {
        self.anonymized_telemetry
    }

    pub fn logging_level(&self) -> LoggingLevel {
        self.logging_level
    }

    pub fn headless(&self) -> bool {
        self.headless
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Program used to run the agent framework.
    pub fn agent_command(&self) -> &str {
        &self.agent_command
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "api key:      {}", self.api_key)?;
        writeln!(f, "base url:     {}", self.base_url)?;
        writeln!(f, "username:     {}", self.username)?;
        writeln!(f, "password:     {}", self.password)?;
        match self.chromium_path {
            Some(ref path) => writeln!(f, "chromium:     {}", path.display())?,
            None => writeln!(f, "chromium:     auto-discover")?,
        }
        writeln!(f, "telemetry:    {}", self.anonymized_telemetry)?;
        writeln!(f, "log level:    {}", self.logging_level)?;
        writeln!(f, "headless:     {}", self.headless)?;
        writeln!(f, "model:        {}", self.model)?;
        write!(f, "agent:        {}", self.agent_command)
    }
}

/// Ordered, duplicate-free collection of validation failures.
#[derive(Debug, Default)]
struct Failures(Vec<ValidationFailure>);

impl Failures {
    fn push(&mut self, failure: ValidationFailure) {
        if !self.0.contains(&failure) {
            self.0.push(failure);
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_error(self) -> ConfigError {
        ConfigError { failures: self.0 }
    }
}

/// Merges defaults, environment and CLI overrides into a [`Configuration`].
///
/// Pure: reads only the supplied inputs, performs no I/O and no logging.
#[derive(Debug, Clone, Copy)]
pub struct ConfigResolver<'a> {
    env: &'a Environment,
    overrides: &'a CliOverrides,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(env: &'a Environment, overrides: &'a CliOverrides) -> Self {
        Self { env, overrides }
    }

    /// Resolves and validates every field.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] listing every failed rule. No partial
    /// configuration is ever returned.
    pub fn resolve(&self) -> Result<Configuration, ConfigError> {
        let mut failures = Failures::default();

        let api_key = self.required(env::OPENAI_API_KEY, None, None, &mut failures);

        let base_url = self.required(
            env::BASE_URL,
            Some("--url"),
            self.overrides.url.as_deref(),
            &mut failures,
        );
        if let Some(ref url) = base_url {
            if let Err(failure) = validate_base_url(url) {
                failures.push(failure);
            }
        }

        let username = self.required(env::AUTH_USERNAME, None, None, &mut failures);
        let password = self.required(env::AUTH_PASSWORD, None, None, &mut failures);

        let chromium_path = self
            .env
            .get(env::CHROMIUM_PATH)
            .map(|path| PathBuf::from(path.trim()));

        let anonymized_telemetry = self.boolean(
            env::ANONYMIZED_TELEMETRY,
            None,
            DEFAULT_ANONYMIZED_TELEMETRY,
            &mut failures,
        );

        let logging_level = match self.env.get(env::BROWSER_USE_LOGGING_LEVEL) {
            Some(raw) => raw.parse().unwrap_or_else(|failure| {
                failures.push(failure);
                LoggingLevel::default()
            }),
            None => LoggingLevel::default(),
        };

        let headless = self.boolean(
            env::HEADLESS,
            self.overrides.headless,
            DEFAULT_HEADLESS,
            &mut failures,
        );

        let model = match self.overrides.model.as_deref() {
            Some(model) if model.trim().is_empty() => {
                failures.push(ValidationFailure::Empty {
                    var: env::OPENAI_MODEL,
                });
                String::new()
            }
            Some(model) => model.trim().to_string(),
            None => self
                .env
                .get(env::OPENAI_MODEL)
                .map_or(DEFAULT_MODEL, str::trim)
                .to_string(),
        };

        let agent_command = self
            .env
            .get(env::AGENT_COMMAND)
            .map_or(DEFAULT_AGENT_COMMAND, str::trim)
            .to_string();

        match (api_key, base_url, username, password) {
            (Some(api_key), Some(base_url), Some(username), Some(password))
                if failures.is_empty() =>
            {
                Ok(Configuration {
                    api_key: SecretValue::new(api_key),
                    base_url,
                    username,
                    password: SecretValue::new(password),
                    chromium_path,
                    anonymized_telemetry,
                    logging_level,
                    headless,
                    model,
                    agent_command,
                })
            }
            _ => Err(failures.into_error()),
        }
    }

    /// Resolves a required string. An explicit override wins even when empty.
    ///
    /// Whitespace only decides whether a value is blank; a present value is
    /// returned unchanged so credentials reach the agent exactly as given.
    fn required(
        &self,
        var: &'static str,
        flag: Option<&'static str>,
        overridden: Option<&str>,
        failures: &mut Failures,
    ) -> Option<String> {
        let value = match overridden {
            Some(value) => Some(value),
            None => self.env.get(var),
        };

        match value {
            Some(value) if !value.trim().is_empty() => Some(value.to_string()),
            _ => {
                failures.push(ValidationFailure::Missing { var, flag });
                None
            }
        }
    }

    /// Resolves a boolean-like value, recording a failure for anything else.
    fn boolean(
        &self,
        var: &'static str,
        overridden: Option<bool>,
        default: bool,
        failures: &mut Failures,
    ) -> bool {
        if let Some(value) = overridden {
            return value;
        }

        match self.env.get(var) {
            Some(raw) => parse_bool(raw).unwrap_or_else(|| {
                failures.push(ValidationFailure::InvalidBoolean {
                    var,
                    value: raw.to_string(),
                });
                default
            }),
            None => default,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn validate_base_url(raw: &str) -> Result<(), ValidationFailure> {
    let invalid = |reason: String| ValidationFailure::InvalidUrl {
        var: env::BASE_URL,
        value: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid("missing host".to_string())),
    }
}
