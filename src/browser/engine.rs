//! Browser driver abstraction layer.
//!
//! The driver launches a browser and hands back a session exposing the
//! DevTools endpoint the agent connects to. Implementations can be swapped
//! for mocks in tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use login_agent::browser::{BrowserDriver, BrowserLaunchConfig, BrowserSession, ChromiumDriver};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BrowserLaunchConfig::new().headless(true);
//!     let mut session = ChromiumDriver::new().launch(&config).await?;
//!
//!     println!("DevTools at {}", session.ws_endpoint());
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::config::Configuration;

/// Default time allowed for the browser to expose its DevTools endpoint.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(20);

/// Errors raised while launching or closing a browser.
#[derive(Debug, Error)]
pub enum DriverError {
    /// No usable browser binary.
    #[error("Browser unavailable: {0}. Install Chromium (or Google Chrome) or set CHROMIUM_PATH to an existing browser binary")]
    Unavailable(String),

    /// The binary was found but could not be started.
    #[error("Failed to launch browser {}: {source}", .path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The browser started but never exposed a DevTools endpoint.
    #[error("Browser did not start: {0}")]
    Startup(String),

    /// Temporary profile or process handling failed.
    #[error("Browser I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for launching a browser.
#[derive(Debug, Clone)]
pub struct BrowserLaunchConfig {
    /// Run browser in headless mode (no visible window).
    pub headless: bool,

    /// Path to browser executable. If None, one is discovered.
    pub executable_path: Option<PathBuf>,

    /// Additional browser launch arguments.
    pub args: Vec<String>,

    /// Time allowed for the browser to come up.
    pub startup_timeout: Duration,
}

impl Default for BrowserLaunchConfig {
    fn default() -> Self {
        Self {
            headless: false,
            executable_path: None,
            args: Vec::new(),
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
        }
    }
}

impl BrowserLaunchConfig {
    /// Creates a new launch config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives launch options from the run configuration.
    pub fn from_config(config: &Configuration) -> Self {
        let launch = Self::new().headless(config.headless());
        match config.chromium_path() {
            Some(path) => launch.executable_path(path),
            None => launch,
        }
    }

    /// Sets headless mode.
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Sets the browser executable.
    pub fn executable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable_path = Some(path.into());
        self
    }

    /// Adds a browser launch argument.
    pub fn add_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets the startup timeout.
    pub fn startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }
}

/// A running browser.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// DevTools websocket URL of the browser.
    fn ws_endpoint(&self) -> &str;

    /// Shuts the browser down and releases its resources.
    ///
    /// Calling this more than once is a no-op.
    async fn close(&mut self) -> Result<(), DriverError>;
}

/// Launches browsers.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Launches a browser with the given options.
    ///
    /// # Errors
    ///
    /// Fails if no browser binary is available or it does not start.
    /// Failures are fatal for the run and never retried.
    async fn launch(
        &self,
        config: &BrowserLaunchConfig,
    ) -> Result<Box<dyn BrowserSession>, DriverError>;
}
