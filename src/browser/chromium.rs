//! Local Chromium launcher.
//!
//! Starts Chrome/Chromium with remote debugging enabled on a throwaway
//! profile and reports the DevTools websocket URL it prints on stderr.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStderr, Command};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use which::which;

use super::engine::{BrowserDriver, BrowserLaunchConfig, BrowserSession, DriverError};

/// Flags passed to every launched browser.
const DEFAULT_ARGS: &[&str] = &[
    "--remote-debugging-port=0",
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-background-networking",
    "--disable-sync",
    "--disable-popup-blocking",
    "--disable-blink-features=AutomationControlled",
    "--password-store=basic",
];

/// Launches a local Chrome/Chromium binary.
#[derive(Debug, Clone, Default)]
pub struct ChromiumDriver;

impl ChromiumDriver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn launch(
        &self,
        config: &BrowserLaunchConfig,
    ) -> Result<Box<dyn BrowserSession>, DriverError> {
        let executable = resolve_executable(config.executable_path.as_deref())?;
        let profile = tempfile::Builder::new()
            .prefix("login-agent-profile-")
            .tempdir()?;

        info!(
            "Launching browser {} (headless={})",
            executable.display(),
            config.headless
        );

        let mut command = Command::new(&executable);
        command
            .args(DEFAULT_ARGS)
            .arg(format!("--user-data-dir={}", profile.path().display()));
        if config.headless {
            command.arg("--headless=new");
        }
        command
            .args(&config.args)
            .arg("about:blank")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|source| DriverError::Launch {
            path: executable.clone(),
            source,
        })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DriverError::Startup("browser process has no stderr handle".into()))?;

        let ws_endpoint = match wait_for_ws_endpoint(stderr, config.startup_timeout).await {
            Ok(ws) => ws,
            Err(e) => {
                if let Err(kill_err) = child.kill().await {
                    warn!("Failed to kill browser after startup failure: {}", kill_err);
                }
                return Err(e);
            }
        };

        debug!("Browser DevTools endpoint: {}", ws_endpoint);

        Ok(Box::new(ChromiumSession {
            child: Some(child),
            ws_endpoint,
            profile: Some(profile),
        }))
    }
}

/// A browser process started by [`ChromiumDriver`].
pub struct ChromiumSession {
    child: Option<Child>,
    ws_endpoint: String,
    profile: Option<TempDir>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    fn ws_endpoint(&self) -> &str {
        &self.ws_endpoint
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        if let Some(mut child) = self.child.take() {
            if child.try_wait()?.is_none() {
                child.kill().await?;
            }
        }
        if let Some(profile) = self.profile.take() {
            profile.close()?;
        }
        Ok(())
    }
}

/// Resolves the browser binary to launch.
///
/// An explicit path must exist, either as a file or as a program name on
/// `PATH`. Without one, well-known program names are searched on `PATH`,
/// then the usual install locations for the platform.
pub fn resolve_executable(explicit: Option<&Path>) -> Result<PathBuf, DriverError> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        if let Ok(found) = which(path) {
            return Ok(found);
        }
        return Err(DriverError::Unavailable(format!(
            "configured browser binary {} does not exist",
            path.display()
        )));
    }

    for name in executable_names() {
        if let Ok(path) = which(name) {
            return Ok(path);
        }
    }

    for candidate in install_paths() {
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(DriverError::Unavailable(
        "no Chromium or Chrome binary found on PATH or in standard install locations".into(),
    ))
}

fn executable_names() -> &'static [&'static str] {
    #[cfg(target_os = "windows")]
    {
        &["chrome.exe", "chromium.exe", "msedge.exe"]
    }

    #[cfg(not(target_os = "windows"))]
    {
        &[
            "chromium",
            "chromium-browser",
            "google-chrome-stable",
            "google-chrome",
            "chrome",
        ]
    }
}

fn install_paths() -> Vec<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        vec![
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
        ]
    }

    #[cfg(target_os = "windows")]
    {
        vec![
            PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
            PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
        ]
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/usr/bin/chromium-browser"),
            PathBuf::from("/snap/bin/chromium"),
        ]
    }
}

/// Reads stderr until the browser prints its DevTools websocket URL.
///
/// Remaining stderr output is forwarded to debug logs so the pipe never fills.
async fn wait_for_ws_endpoint(
    stderr: ChildStderr,
    limit: Duration,
) -> Result<String, DriverError> {
    let mut lines = BufReader::new(stderr).lines();

    let ws = timeout(limit, read_ws_endpoint(&mut lines))
        .await
        .map_err(|_| {
            DriverError::Startup(format!(
                "timed out after {}s waiting for the DevTools endpoint",
                limit.as_secs()
            ))
        })??;

    tokio::spawn(async move {
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(target: "browser", "{}", line);
        }
    });

    Ok(ws)
}

async fn read_ws_endpoint(
    lines: &mut Lines<BufReader<ChildStderr>>,
) -> Result<String, DriverError> {
    let mut captured = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if let Some(ws) = parse_ws_endpoint(&line) {
            return Ok(ws);
        }
        captured.push(line);
    }
    Err(DriverError::Startup(format!(
        "browser exited before exposing a DevTools endpoint; stderr: {}",
        captured
            .iter()
            .take(8)
            .cloned()
            .collect::<Vec<_>>()
            .join(" | ")
    )))
}

fn parse_ws_endpoint(line: &str) -> Option<String> {
    let (_, ws) = line.rsplit_once("listening on ")?;
    let ws = ws.trim();
    if ws.starts_with("ws") && ws.contains("devtools/browser") {
        Some(ws.to_string())
    } else {
        None
    }
}
