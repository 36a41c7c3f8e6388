//! Agent backed by the agent framework's command-line runner.
//!
//! The program is started once per run and attached to the already running
//! browser through its DevTools endpoint:
//!
//! ```text
//! <program> --model <NAME> --max-steps <N> --max-actions-per-step <K> --cdp-url <WS>
//! ```
//!
//! Task instructions are written to the program's stdin. The API key and
//! framework switches travel in its environment, never on the command line.
//! Whatever the program prints on stdout is taken as its final report.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use super::{Agent, AgentError, AgentFactory, AgentHistory, AgentSettings};
use crate::browser::BrowserSession;
use crate::config::env;
use crate::task::Task;

/// Creates [`CommandAgent`]s.
#[derive(Debug, Clone, Default)]
pub struct CommandAgentFactory;

impl CommandAgentFactory {
    pub fn new() -> Self {
        Self
    }
}

impl AgentFactory for CommandAgentFactory {
    fn create(
        &self,
        settings: &AgentSettings,
        task: &dyn Task,
        session: &dyn BrowserSession,
    ) -> Result<Box<dyn Agent>, AgentError> {
        if settings.command.trim().is_empty() {
            return Err(AgentError::Setup("agent program is empty".into()));
        }

        info!("Initializing agent with model: {}", settings.model);

        Ok(Box::new(CommandAgent {
            settings: settings.clone(),
            task_name: task.name().to_string(),
            instructions: task.instructions(),
            cdp_url: session.ws_endpoint().to_string(),
        }))
    }
}

/// One agent run executed by an external program.
pub struct CommandAgent {
    settings: AgentSettings,
    task_name: String,
    instructions: String,
    cdp_url: String,
}

impl CommandAgent {
    /// Command-line arguments for a run of at most `max_steps` steps.
    fn args(&self, max_steps: usize) -> Vec<String> {
        vec![
            "--model".to_string(),
            self.settings.model.clone(),
            "--max-steps".to_string(),
            max_steps.to_string(),
            "--max-actions-per-step".to_string(),
            self.settings.max_actions_per_step.to_string(),
            "--cdp-url".to_string(),
            self.cdp_url.clone(),
        ]
    }
}

#[async_trait]
impl Agent for CommandAgent {
    async fn run(&mut self, max_steps: usize) -> Result<AgentHistory, AgentError> {
        let program = self.settings.command.clone();
        debug!(
            "Starting agent program {} for task '{}' (max_steps={})",
            program, self.task_name, max_steps
        );

        let mut child = Command::new(&program)
            .args(self.args(max_steps))
            .env(env::OPENAI_API_KEY, self.settings.api_key.expose_secret())
            .env(
                env::ANONYMIZED_TELEMETRY,
                self.settings.anonymized_telemetry.to_string(),
            )
            .env(
                env::BROWSER_USE_LOGGING_LEVEL,
                self.settings.logging_level.to_string(),
            )
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AgentError::Spawn {
                program: program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(self.instructions.as_bytes()).await {
                Ok(()) => {}
                // The program may exit without reading its task.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e.into()),
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(AgentError::Run(format!(
                "{} exited with {}",
                program, output.status
            )));
        }

        Ok(parse_report(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn parse_report(stdout: &str) -> AgentHistory {
    let report = stdout.trim();
    AgentHistory {
        final_result: (!report.is_empty()).then(|| report.to_string()),
        is_done: true,
        steps: report.lines().filter(|l| !l.trim().is_empty()).count(),
    }
}
