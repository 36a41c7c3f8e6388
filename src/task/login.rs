//! Login flow against the practice test site.

use super::{Task, TaskCredentials};
use crate::agent::AgentHistory;
use crate::config::Configuration;

/// Text shown on the page after a successful login.
pub const SUCCESS_MESSAGE: &str = "Logged In Successfully";

/// Label of the logout control shown after a successful login.
pub const LOGOUT_CONTROL: &str = "Log out";

/// Logs in with the given credentials and verifies the landing page.
#[derive(Debug, Clone)]
pub struct LoginTask {
    url: String,
    credentials: TaskCredentials,
}

impl LoginTask {
    pub fn new(url: impl Into<String>, credentials: TaskCredentials) -> Self {
        Self {
            url: url.into(),
            credentials,
        }
    }

    /// Builds the task from the resolved configuration.
    pub fn from_config(config: &Configuration) -> Self {
        Self::new(
            config.base_url(),
            TaskCredentials::new(config.username(), config.password().clone()),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Task for LoginTask {
    fn name(&self) -> &str {
        "login"
    }

    fn instructions(&self) -> String {
        format!(
            r#"Your task is to navigate to a login page and successfully authenticate using the provided credentials.

OBJECTIVE:
Complete the login process and verify successful authentication.

REQUIRED ACTIONS (execute in order):

1. Navigate to the login page:
   - URL: {url}
   - Wait for the page to fully load

2. Verify you're on the correct page:
   - Locate the header element with text "Test login"
   - This header is an <h2> element with attribute id="login"
   - If you cannot find this header, report an error

3. Enter username:
   - Locate the username input field (attribute: name="username")
   - Clear any existing text in the field
   - Enter the username: "{username}"
   - Verify the text was entered correctly

4. Enter password:
   - Locate the password input field (attribute: name="password")
   - Clear any existing text in the field
   - Enter the password: "{password}"
   - Verify the text was entered correctly

5. Submit the login form:
   - Locate and click the submit/login button
   - Wait for the page to process the login request

6. Verify successful authentication:
   - Confirm the text "{success}" is displayed on the page
   - Confirm the "{logout}" button is present and visible
   - Both conditions must be met to consider the login successful

SUCCESS CRITERIA:
The task is complete when BOTH of the following are true:
- The message "{success}" is visible on the page
- The "{logout}" button is present and visible

When finished, report both observations in your final answer.

IMPORTANT GUIDELINES:
- Wait for each element to be visible and interactive before attempting to interact with it
- If any element cannot be found within a reasonable time, report which step failed
- Do not proceed to the next step until the current step is successfully completed
- If the login fails (success message not shown), report the failure
"#,
            url = self.url,
            username = self.credentials.username,
            password = self.credentials.password.expose_secret(),
            success = SUCCESS_MESSAGE,
            logout = LOGOUT_CONTROL,
        )
    }

    fn check_outcome(&self, history: &AgentHistory) -> Result<(), String> {
        if !history.is_done {
            return Err("agent did not finish the task".to_string());
        }

        let report = history
            .final_result
            .as_deref()
            .ok_or_else(|| "agent finished without a final report".to_string())?
            .to_lowercase();

        let mut missing = Vec::new();
        if !report.contains(&SUCCESS_MESSAGE.to_lowercase()) {
            missing.push(format!("success message \"{}\"", SUCCESS_MESSAGE));
        }
        if !report.contains(&LOGOUT_CONTROL.to_lowercase()) {
            missing.push(format!("\"{}\" control", LOGOUT_CONTROL));
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("login not confirmed: missing {}", missing.join(" and ")))
        }
    }
}
