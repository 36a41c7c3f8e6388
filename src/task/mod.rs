//! Task definitions handed to the agent.
//!
//! A task supplies natural-language instructions and a post-condition that
//! the agent's final report must satisfy.

mod login;

pub use login::LoginTask;

use crate::agent::AgentHistory;
use crate::config::SecretValue;

/// Credentials for authentication tasks.
#[derive(Debug, Clone)]
pub struct TaskCredentials {
    pub username: String,
    pub password: SecretValue,
}

impl TaskCredentials {
    pub fn new(username: impl Into<String>, password: SecretValue) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// A browser automation task.
pub trait Task: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Instructions for the agent.
    ///
    /// May contain secrets; never log the returned text.
    fn instructions(&self) -> String;

    /// Checks the agent's result against the task's success criteria.
    ///
    /// Returns a description of what was not met on failure.
    fn check_outcome(&self, history: &AgentHistory) -> Result<(), String>;
}
