//! Task execution orchestration.
//!
//! Launches the browser, hands the task to an agent, checks the outcome and
//! always closes the browser afterwards. Nothing is retried here; retry
//! policy, if any, belongs to the agent framework.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::agent::{
    AgentError, AgentFactory, AgentHistory, AgentSettings, DEFAULT_MAX_ACTIONS_PER_STEP,
};
use crate::browser::{BrowserDriver, BrowserLaunchConfig, BrowserSession, DriverError};
use crate::config::Configuration;
use crate::exit;
use crate::task::Task;

/// Default cap on agent steps per run.
pub const DEFAULT_MAX_STEPS: usize = 25;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The browser could not be launched.
    #[error(transparent)]
    DriverUnavailable(#[from] DriverError),

    /// The agent could not be created or its run failed.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// The agent finished but the task's success criteria do not hold.
    #[error("Task '{task}' did not succeed: {reason}")]
    OutcomeNotMet { task: String, reason: String },
}

impl RunError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::DriverUnavailable(_) => exit::DRIVER_UNAVAILABLE,
            RunError::Agent(_) | RunError::OutcomeNotMet { .. } => exit::AUTOMATION_FAILED,
        }
    }
}

/// Executes browser automation tasks.
///
/// # Example
///
/// ```rust,no_run
/// use login_agent::agent::CommandAgentFactory;
/// use login_agent::browser::ChromiumDriver;
/// use login_agent::config::{CliOverrides, Configuration, Environment};
/// use login_agent::runner::TaskRunner;
/// use login_agent::task::LoginTask;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = Configuration::resolve(&Environment::from_process(), &CliOverrides::default())?;
///     let runner = TaskRunner::new(ChromiumDriver::new(), CommandAgentFactory::new());
///     let history = runner.run(&config, &LoginTask::from_config(&config)).await?;
///     println!("{:?}", history.final_result);
///     Ok(())
/// }
/// ```
pub struct TaskRunner<D, F> {
    driver: D,
    agents: F,
    max_steps: usize,
    max_actions_per_step: usize,
}

impl<D: BrowserDriver, F: AgentFactory> TaskRunner<D, F> {
    pub fn new(driver: D, agents: F) -> Self {
        Self {
            driver,
            agents,
            max_steps: DEFAULT_MAX_STEPS,
            max_actions_per_step: DEFAULT_MAX_ACTIONS_PER_STEP,
        }
    }

    /// Sets the maximum number of agent steps.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the maximum number of browser actions per agent step.
    pub fn with_max_actions_per_step(mut self, max: usize) -> Self {
        self.max_actions_per_step = max;
        self
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Runs `task` with the given configuration.
    ///
    /// The browser is closed whenever it was launched, whether the run
    /// succeeds or not. A failure to close is logged and does not replace
    /// the run's result.
    pub async fn run(
        &self,
        config: &Configuration,
        task: &dyn Task,
    ) -> Result<AgentHistory, RunError> {
        let launch = BrowserLaunchConfig::from_config(config);
        let mut session = self.driver.launch(&launch).await.map_err(|e| {
            error!("Browser launch failed: {}", e);
            RunError::from(e)
        })?;

        let result = self.drive(config, task, session.as_ref()).await;
        if let Err(ref e) = result {
            error!("Error during task '{}': {}", task.name(), e);
        }

        info!("Closing browser...");
        match session.close().await {
            Ok(()) => info!("Browser closed successfully"),
            Err(e) => warn!("Failed to close browser: {}", e),
        }

        result
    }

    async fn drive(
        &self,
        config: &Configuration,
        task: &dyn Task,
        session: &dyn BrowserSession,
    ) -> Result<AgentHistory, RunError> {
        let settings = AgentSettings::from_config(config)
            .with_max_actions_per_step(self.max_actions_per_step);
        let mut agent = self.agents.create(&settings, task, session)?;

        info!("Starting agent task '{}'...", task.name());
        let history = agent.run(self.max_steps).await?;

        task.check_outcome(&history)
            .map_err(|reason| RunError::OutcomeNotMet {
                task: task.name().to_string(),
                reason,
            })?;

        info!("Task '{}' completed successfully!", task.name());
        Ok(history)
    }
}
