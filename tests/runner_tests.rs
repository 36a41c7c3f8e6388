//! Integration tests for the task runner
//!
//! Tests browser lifecycle (always closed after launch), step limits,
//! agent failures, post-condition checks and driver failures using mock
//! collaborators.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use login_agent::agent::{Agent, AgentError, AgentFactory, AgentHistory, AgentSettings};
use login_agent::browser::{BrowserDriver, BrowserLaunchConfig, BrowserSession, DriverError};
use login_agent::config::{CliOverrides, Configuration, Environment};
use login_agent::exit;
use login_agent::runner::{RunError, TaskRunner, DEFAULT_MAX_STEPS};
use login_agent::task::{LoginTask, Task};

/// Mock implementations for runner testing
mod mock {
    use super::*;

    /// Shared observations recorded by the mocks
    #[derive(Debug, Default)]
    pub struct Probe {
        pub launches: AtomicUsize,
        pub closes: AtomicUsize,
        pub agents_created: AtomicUsize,
        pub last_max_steps: AtomicUsize,
        pub last_headless: AtomicBool,
        pub last_settings: Mutex<Option<AgentSettings>>,
        pub last_instructions: Mutex<Option<String>>,
    }

    pub struct MockSession {
        pub probe: Arc<Probe>,
        pub fail_close: bool,
    }

    #[async_trait]
    impl BrowserSession for MockSession {
        fn ws_endpoint(&self) -> &str {
            "ws://127.0.0.1:9222/devtools/browser/mock"
        }

        async fn close(&mut self) -> Result<(), DriverError> {
            self.probe.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                Err(DriverError::Startup("already gone".into()))
            } else {
                Ok(())
            }
        }
    }

    pub struct MockDriver {
        pub probe: Arc<Probe>,
        pub available: bool,
        pub fail_close: bool,
    }

    #[async_trait]
    impl BrowserDriver for MockDriver {
        async fn launch(
            &self,
            config: &BrowserLaunchConfig,
        ) -> Result<Box<dyn BrowserSession>, DriverError> {
            self.probe.launches.fetch_add(1, Ordering::SeqCst);
            self.probe
                .last_headless
                .store(config.headless, Ordering::SeqCst);
            if !self.available {
                return Err(DriverError::Unavailable("no chromium in test".into()));
            }
            Ok(Box::new(MockSession {
                probe: self.probe.clone(),
                fail_close: self.fail_close,
            }))
        }
    }

    /// What the mock agent does when run
    #[derive(Debug, Clone)]
    pub enum Behavior {
        Report(&'static str),
        Fail(&'static str),
    }

    pub struct MockAgent {
        probe: Arc<Probe>,
        behavior: Behavior,
    }

    #[async_trait]
    impl Agent for MockAgent {
        async fn run(&mut self, max_steps: usize) -> Result<AgentHistory, AgentError> {
            self.probe.last_max_steps.store(max_steps, Ordering::SeqCst);
            match self.behavior {
                Behavior::Report(report) => Ok(AgentHistory {
                    final_result: Some(report.to_string()),
                    is_done: true,
                    steps: 4,
                }),
                Behavior::Fail(msg) => Err(AgentError::Run(msg.to_string())),
            }
        }
    }

    pub struct MockAgentFactory {
        pub probe: Arc<Probe>,
        pub behavior: Behavior,
    }

    impl AgentFactory for MockAgentFactory {
        fn create(
            &self,
            settings: &AgentSettings,
            task: &dyn Task,
            session: &dyn BrowserSession,
        ) -> Result<Box<dyn Agent>, AgentError> {
            assert!(session.ws_endpoint().starts_with("ws://"));
            self.probe.agents_created.fetch_add(1, Ordering::SeqCst);
            *self.probe.last_settings.lock().unwrap() = Some(settings.clone());
            *self.probe.last_instructions.lock().unwrap() = Some(task.instructions());
            Ok(Box::new(MockAgent {
                probe: self.probe.clone(),
                behavior: self.behavior.clone(),
            }))
        }
    }
}

use mock::{Behavior, MockAgentFactory, MockDriver, Probe};

const CONFIRMED: &str = "The page shows \"Logged In Successfully\" and a Log out button.";

fn config(headless: bool) -> Configuration {
    let env = Environment::from_pairs([
        ("OPENAI_API_KEY", "sk-x"),
        ("BASE_URL", "https://practicetestautomation.com/practice-test-login/"),
        ("AUTH_USERNAME", "student"),
        ("AUTH_PASSWORD", "Password123"),
    ]);
    let overrides = CliOverrides {
        headless: Some(headless),
        ..Default::default()
    };
    Configuration::resolve(&env, &overrides).unwrap()
}

fn runner(
    probe: &Arc<Probe>,
    available: bool,
    behavior: Behavior,
) -> TaskRunner<MockDriver, MockAgentFactory> {
    TaskRunner::new(
        MockDriver {
            probe: probe.clone(),
            available,
            fail_close: false,
        },
        MockAgentFactory {
            probe: probe.clone(),
            behavior,
        },
    )
}

#[tokio::test]
async fn test_run_task_successfully() {
    let probe = Arc::new(Probe::default());
    let config = config(false);
    let task = LoginTask::from_config(&config);

    let history = runner(&probe, true, Behavior::Report(CONFIRMED))
        .run(&config, &task)
        .await
        .unwrap();

    assert_eq!(history.final_result.as_deref(), Some(CONFIRMED));
    assert_eq!(probe.launches.load(Ordering::SeqCst), 1);
    assert_eq!(probe.agents_created.load(Ordering::SeqCst), 1);
    assert_eq!(probe.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_run_uses_default_max_steps() {
    let probe = Arc::new(Probe::default());
    let config = config(false);
    let runner = runner(&probe, true, Behavior::Report(CONFIRMED));

    assert_eq!(runner.max_steps(), DEFAULT_MAX_STEPS);
    runner.run(&config, &LoginTask::from_config(&config)).await.unwrap();

    assert_eq!(probe.last_max_steps.load(Ordering::SeqCst), 25);
}

#[tokio::test]
async fn test_run_with_custom_limits() {
    let probe = Arc::new(Probe::default());
    let config = config(false);

    runner(&probe, true, Behavior::Report(CONFIRMED))
        .with_max_steps(50)
        .with_max_actions_per_step(2)
        .run(&config, &LoginTask::from_config(&config))
        .await
        .unwrap();

    assert_eq!(probe.last_max_steps.load(Ordering::SeqCst), 50);
    let settings = probe.last_settings.lock().unwrap().clone().unwrap();
    assert_eq!(settings.max_actions_per_step, 2);
}

#[tokio::test]
async fn test_configuration_is_injected_into_collaborators() {
    let probe = Arc::new(Probe::default());
    let config = config(true);

    runner(&probe, true, Behavior::Report(CONFIRMED))
        .run(&config, &LoginTask::from_config(&config))
        .await
        .unwrap();

    assert!(probe.last_headless.load(Ordering::SeqCst));

    let settings = probe.last_settings.lock().unwrap().clone().unwrap();
    assert_eq!(settings.model, "gpt-4o-mini");
    assert_eq!(settings.api_key.expose_secret(), "sk-x");
    assert_eq!(settings.max_actions_per_step, 5);

    let instructions = probe.last_instructions.lock().unwrap().clone().unwrap();
    assert!(instructions.contains("https://practicetestautomation.com/practice-test-login/"));
    assert!(instructions.contains("student"));
}

#[tokio::test]
async fn test_run_closes_browser_on_agent_failure() {
    let probe = Arc::new(Probe::default());
    let config = config(false);

    let err = runner(&probe, true, Behavior::Fail("element not found"))
        .run(&config, &LoginTask::from_config(&config))
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::Agent(AgentError::Run(_))));
    assert!(err.to_string().contains("element not found"));
    assert_eq!(err.exit_code(), exit::AUTOMATION_FAILED);
    assert_eq!(probe.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_run_fails_when_post_condition_does_not_hold() {
    let probe = Arc::new(Probe::default());
    let config = config(false);

    let err = runner(&probe, true, Behavior::Report("Your username is invalid!"))
        .run(&config, &LoginTask::from_config(&config))
        .await
        .unwrap_err();

    match err {
        RunError::OutcomeNotMet { ref task, ref reason } => {
            assert_eq!(task, "login");
            assert!(reason.contains("Logged In Successfully"));
        }
        ref other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.exit_code(), exit::AUTOMATION_FAILED);
    assert_eq!(probe.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_driver_unavailable_skips_agent() {
    let probe = Arc::new(Probe::default());
    let config = config(false);

    let err = runner(&probe, false, Behavior::Report(CONFIRMED))
        .run(&config, &LoginTask::from_config(&config))
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::DriverUnavailable(_)));
    assert_eq!(err.exit_code(), exit::DRIVER_UNAVAILABLE);
    assert!(err.to_string().contains("Install Chromium"));
    assert_eq!(probe.agents_created.load(Ordering::SeqCst), 0);
    assert_eq!(probe.closes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_close_failure_does_not_mask_success() {
    let probe = Arc::new(Probe::default());
    let config = config(false);
    let runner = TaskRunner::new(
        MockDriver {
            probe: probe.clone(),
            available: true,
            fail_close: true,
        },
        MockAgentFactory {
            probe: probe.clone(),
            behavior: Behavior::Report(CONFIRMED),
        },
    );

    let history = runner
        .run(&config, &LoginTask::from_config(&config))
        .await
        .unwrap();

    assert!(history.is_done);
    assert_eq!(probe.closes.load(Ordering::SeqCst), 1);
}
