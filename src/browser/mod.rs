//! Browser module providing the browser driver seam.
//!
//! # Submodules
//!
//! - [`engine`] - Driver and session traits, launch configuration
//! - [`chromium`] - Local Chrome/Chromium launcher

pub mod chromium;
pub mod engine;

pub use chromium::{resolve_executable, ChromiumDriver, ChromiumSession};
pub use engine::{
    BrowserDriver, BrowserLaunchConfig, BrowserSession, DriverError, DEFAULT_STARTUP_TIMEOUT,
};
