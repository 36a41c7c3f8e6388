//! Login-Agent - Main Entry Point
//!
//! Parses the command line, resolves the configuration, and runs the login
//! task through the browser agent. The exit code tells usage, configuration,
//! browser and automation failures apart.

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use login_agent::{
    agent::CommandAgentFactory,
    browser::ChromiumDriver,
    config::{CliOverrides, Configuration, Environment, LoggingLevel},
    exit,
    runner::TaskRunner,
    task::LoginTask,
    NAME, VERSION,
};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const RED: &str = "\x1b[31m";
    pub const BLUE: &str = "\x1b[34m";
}

/// Print the startup banner with version
fn print_banner() {
    println!(
        "{cyan}{bold}login-agent{reset} {dim}v{version} - AI browser agent login runner{reset}\n",
        cyan = colors::CYAN,
        bold = colors::BOLD,
        reset = colors::RESET,
        dim = colors::DIM,
        version = VERSION
    );
}

/// Print configuration summary. Secrets render redacted.
fn print_config_summary(config: &Configuration) {
    println!(
        "{bold}{blue}Configuration:{reset}",
        bold = colors::BOLD,
        blue = colors::BLUE,
        reset = colors::RESET
    );
    for line in config.to_string().lines() {
        println!("  {dim}{}{reset}", line, dim = colors::DIM, reset = colors::RESET);
    }
    println!();
}

/// Build the CLI command parser
fn build_cli() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .author("Login-Agent Team")
        .about("AI-powered browser automation demo: log in to a test site with an LLM agent")
        .after_help(
            "Examples:\n  \
             login-agent                                   Run with settings from the environment / .env\n  \
             login-agent --headless                        Run without a visible browser window\n  \
             login-agent --url https://example.com         Override BASE_URL\n  \
             login-agent --headless --model gpt-4o         Combine options\n\n\
             Environment Variables:\n  \
             OPENAI_API_KEY, BASE_URL, AUTH_USERNAME, AUTH_PASSWORD (required)\n  \
             CHROMIUM_PATH, ANONYMIZED_TELEMETRY, BROWSER_USE_LOGGING_LEVEL,\n  \
             HEADLESS, OPENAI_MODEL, AGENT_COMMAND (optional)",
        )
        .arg(
            Arg::new("headless")
                .long("headless")
                .help("Run browser in headless mode (no visible window)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .help("Override BASE_URL from environment variables"),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .value_name("NAME")
                .help("Override the OpenAI model (default: gpt-4o-mini)"),
        )
}

/// Convert parsed matches into configuration overrides.
///
/// An absent flag means "not overridden".
fn parse_overrides(matches: &ArgMatches) -> CliOverrides {
    CliOverrides {
        headless: matches.get_flag("headless").then_some(true),
        url: matches.get_one::<String>("url").cloned(),
        model: matches.get_one::<String>("model").cloned(),
    }
}

/// Builds the log filter. `RUST_LOG`, when set, takes over from the
/// configured level.
fn tracing_filter(level: LoggingLevel, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level.filter_directive()))
}

/// Initialize the tracing/logging subsystem
fn init_tracing(level: LoggingLevel) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .with(tracing_filter(level, rust_log.as_deref()))
        .init();
}

/// Main application entry point
#[tokio::main]
async fn main() -> ExitCode {
    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() {
                exit::USAGE
            } else {
                exit::SUCCESS
            });
        }
    };

    let overrides = parse_overrides(&matches);
    let env = Environment::from_process();

    let config = match Configuration::resolve(&env, &overrides) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LoggingLevel::default());
            error!("{}", e);
            return ExitCode::from(exit::INVALID_CONFIG);
        }
    };

    init_tracing(config.logging_level());

    if config.logging_level() != LoggingLevel::Result {
        print_banner();
        print_config_summary(&config);
    }

    if !config.anonymized_telemetry() {
        info!("Anonymized telemetry disabled for the agent framework");
    }

    let task = LoginTask::from_config(&config);
    let runner = TaskRunner::new(ChromiumDriver::new(), CommandAgentFactory::new());

    match runner.run(&config, &task).await {
        Ok(history) => {
            println!(
                "{green}{bold}Login succeeded.{reset}",
                green = colors::GREEN,
                bold = colors::BOLD,
                reset = colors::RESET
            );
            if let Some(report) = history.final_result {
                println!("{}", report);
            }
            ExitCode::from(exit::SUCCESS)
        }
        Err(e) => {
            let code = e.exit_code();
            if code == exit::DRIVER_UNAVAILABLE {
                warn!("Check the browser installation or CHROMIUM_PATH");
            }
            eprintln!(
                "{red}{bold}Login failed:{reset} {}",
                e,
                red = colors::RED,
                bold = colors::BOLD,
                reset = colors::RESET
            );
            ExitCode::from(code)
        }
    }
}
