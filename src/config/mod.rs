//! Configuration module for login-agent.
//!
//! This module turns the process inputs into one validated [`Configuration`]:
//! - Environment snapshot (optionally seeded from `.env`)
//! - CLI overrides
//! - Built-in defaults
//! - Secret redaction for the API key and password
//!
//! # Example
//!
//! ```rust,no_run
//! use login_agent::config::{CliOverrides, Configuration, Environment};
//!
//! let env = Environment::from_process();
//! let overrides = CliOverrides {
//!     headless: Some(true),
//!     ..Default::default()
//! };
//!
//! match Configuration::resolve(&env, &overrides) {
//!     Ok(config) => println!("{}", config),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

pub mod env;
mod secret;
mod settings;

pub use env::Environment;
pub use secret::{SecretValue, REDACTED};
pub use settings::{
    CliOverrides, ConfigError, ConfigResolver, Configuration, LoggingLevel, ValidationFailure,
    DEFAULT_AGENT_COMMAND, DEFAULT_ANONYMIZED_TELEMETRY, DEFAULT_HEADLESS, DEFAULT_MODEL,
};
