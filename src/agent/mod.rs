//! Agent abstraction.
//!
//! An agent takes natural-language task instructions and drives a browser
//! session to completion. Planning, page interaction and model calls all
//! happen inside the agent framework; this module only parameterizes it.
//!
//! # Submodules
//!
//! - [`command`] - Bridge to the agent framework's command-line runner

pub mod command;

pub use command::{CommandAgent, CommandAgentFactory};

use async_trait::async_trait;
use thiserror::Error;

use crate::browser::BrowserSession;
use crate::config::{Configuration, LoggingLevel, SecretValue};
use crate::task::Task;

/// Default cap on browser actions the agent may take per step.
pub const DEFAULT_MAX_ACTIONS_PER_STEP: usize = 5;

/// Errors raised while building or running an agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The agent could not be created.
    #[error("Failed to create agent: {0}")]
    Setup(String),

    /// The agent program could not be started.
    #[error("Failed to start agent program {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The agent ran but reported failure.
    #[error("Agent run failed: {0}")]
    Run(String),

    /// I/O while talking to the agent.
    #[error("Agent I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings the agent framework is parameterized with.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// LLM model name.
    pub model: String,
    /// OpenAI API key.
    pub api_key: SecretValue,
    /// Anonymized telemetry toggle forwarded to the framework.
    pub anonymized_telemetry: bool,
    /// Framework log level.
    pub logging_level: LoggingLevel,
    /// Maximum browser actions per agent step.
    pub max_actions_per_step: usize,
    /// Program implementing the agent.
    pub command: String,
}

impl AgentSettings {
    /// Derives agent settings from the run configuration.
    pub fn from_config(config: &Configuration) -> Self {
        Self {
            model: config.model().to_string(),
            api_key: config.api_key().clone(),
            anonymized_telemetry: config.anonymized_telemetry(),
            logging_level: config.logging_level(),
            max_actions_per_step: DEFAULT_MAX_ACTIONS_PER_STEP,
            command: config.agent_command().to_string(),
        }
    }

    /// Sets the per-step action cap.
    pub fn with_max_actions_per_step(mut self, max: usize) -> Self {
        self.max_actions_per_step = max;
        self
    }
}

/// Outcome of an agent run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentHistory {
    /// The agent's final answer.
    pub final_result: Option<String>,
    /// Whether the agent reported the task as finished.
    pub is_done: bool,
    /// Number of steps the agent reported.
    pub steps: usize,
}

/// A runnable agent bound to one task and one browser session.
#[async_trait]
pub trait Agent: Send {
    /// Runs the task to completion, taking at most `max_steps` steps.
    async fn run(&mut self, max_steps: usize) -> Result<AgentHistory, AgentError>;
}

/// Builds agents.
pub trait AgentFactory: Send + Sync {
    /// Creates an agent for `task` that drives `session`.
    fn create(
        &self,
        settings: &AgentSettings,
        task: &dyn Task,
        session: &dyn BrowserSession,
    ) -> Result<Box<dyn Agent>, AgentError>;
}
