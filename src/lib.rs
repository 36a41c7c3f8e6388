//! # Login-Agent
//!
//! Runs an AI browser agent through a scripted login flow against a test
//! website, configured from the environment and the command line.
//!
//! The browser and the agent are external collaborators reached through
//! narrow traits; the part with a real contract is the configuration
//! resolver, which merges defaults, environment variables and CLI overrides
//! into one validated, immutable [`config::Configuration`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use login_agent::{
//!     agent::CommandAgentFactory,
//!     browser::ChromiumDriver,
//!     config::{CliOverrides, Configuration, Environment},
//!     runner::TaskRunner,
//!     task::LoginTask,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let overrides = CliOverrides {
//!         headless: Some(true),
//!         ..Default::default()
//!     };
//!     let config = Configuration::resolve(&Environment::from_process(), &overrides)?;
//!
//!     let runner = TaskRunner::new(ChromiumDriver::new(), CommandAgentFactory::new());
//!     runner.run(&config, &LoginTask::from_config(&config)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`config`]: Environment snapshot, secret redaction, configuration resolution
//! - [`browser`]: Browser driver seam and local Chromium launcher
//! - [`agent`]: Agent seam and the agent framework bridge
//! - [`task`]: Task definitions and post-conditions
//! - [`runner`]: Run orchestration
//! - [`exit`]: Process exit codes
//!
//! ## Configuration
//!
//! Each field is resolved by precedence:
//! 1. CLI overrides (`--headless`, `--url`, `--model`)
//! 2. Environment variables (`OPENAI_API_KEY`, `BASE_URL`, ...)
//! 3. Built-in defaults
//!
//! See [`config::Configuration`] for all fields.

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Full version string with name
pub const FULL_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Module Exports
// ============================================================================

/// Configuration resolution from defaults, environment and CLI.
pub mod config;

/// Browser driver seam and local Chromium launcher.
pub mod browser;

/// Agent seam and the agent framework bridge.
pub mod agent;

/// Task definitions handed to the agent.
pub mod task;

/// Run orchestration.
pub mod runner;

/// Process exit codes.
pub mod exit;

// ============================================================================
// Re-exports for Convenience
// ============================================================================

pub use agent::{Agent, AgentError, AgentFactory, AgentHistory, AgentSettings};
pub use browser::{BrowserDriver, BrowserLaunchConfig, BrowserSession, DriverError};
pub use config::{
    CliOverrides, ConfigError, ConfigResolver, Configuration, Environment, LoggingLevel,
    SecretValue, ValidationFailure,
};
pub use runner::{RunError, TaskRunner};
pub use task::{LoginTask, Task, TaskCredentials};
