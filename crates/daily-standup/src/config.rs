//! Configuration for a daily-standup run
//!
//! Every option is a command-line flag with an environment variable
//! fallback, so a `.env` file or the scheduler's environment can supply
//! credentials. [`Config::resolve`] turns the parsed flags into the
//! read-only [`RunConfig`] handed to each pipeline stage.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Parser;
use secrecy::SecretString;

/// Default model identifier passed to the inference endpoint
pub const DEFAULT_MODEL: &str = "llama3.2:latest";
/// Default base URL of the local inference endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Default inference timeout in seconds
pub const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 120;
/// Default SMTP relay
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
/// Default SMTP submission port
pub const DEFAULT_SMTP_PORT: u16 = 587;
/// Default SMTP timeout in seconds
pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;

/// Daily Standup - summarize today's commits and post them to Slack
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "daily-standup")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Address the summary email is sent from
    #[arg(long, env = "SENDER_EMAIL")]
    pub sender_email: Option<String>,

    /// App-specific password for the sender account
    #[arg(long, env = "SENDER_PASSWORD", hide_env_values = true)]
    pub sender_password: Option<String>,

    /// Slack channel inbound-email address
    #[arg(long, env = "SLACK_EMAIL")]
    pub slack_email: Option<String>,

    /// Path inside the git repository to summarize
    ///
    /// Defaults to the current working directory.
    #[arg(short, long, env = "REPO_PATH")]
    pub repo: Option<PathBuf>,

    /// Model identifier for the inference endpoint
    ///
    /// Defaults to llama3.2:latest.
    #[arg(short, long, env = "OLLAMA_MODEL")]
    pub model: Option<String>,

    /// Base URL of the Ollama-compatible inference endpoint
    #[arg(long, env = "OLLAMA_URL")]
    pub ollama_url: Option<String>,

    /// Seconds to wait for the inference endpoint before falling back
    #[arg(long, env = "OLLAMA_TIMEOUT_SECS")]
    pub ollama_timeout_secs: Option<u64>,

    /// Number of attempts made against the inference endpoint
    #[arg(long, env = "OLLAMA_ATTEMPTS")]
    pub ollama_attempts: Option<u32>,

    /// SMTP relay host
    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    /// SMTP submission port (STARTTLS)
    #[arg(long, env = "SMTP_PORT")]
    pub smtp_port: Option<u16>,

    /// Seconds to wait on the SMTP relay
    #[arg(long, env = "SMTP_TIMEOUT_SECS")]
    pub smtp_timeout_secs: Option<u64>,

    /// Directory the daily report file is written to
    ///
    /// Defaults to the current working directory.
    #[arg(short, long, env = "STANDUP_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Day to report on (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Only include commits whose author name or email contains this text
    #[arg(short, long, env = "STANDUP_AUTHOR")]
    pub author: Option<String>,

    /// Log the email instead of sending it
    #[arg(short = 'n', long, default_value = "false")]
    pub dry_run: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Inference endpoint settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaSettings {
    /// Base URL, without the `/api/generate` suffix
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Attempts before giving up (at least 1)
    pub attempts: u32,
}

/// Mail relay settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    /// Relay host
    pub host: String,
    /// Submission port
    pub port: u16,
    /// Connection and command timeout
    pub timeout: Duration,
}

/// Fully resolved settings for one pipeline run
#[derive(Debug)]
pub struct RunConfig {
    /// Address the summary email is sent from
    pub sender_email: String,
    /// Credential for the sender account
    pub sender_password: SecretString,
    /// Slack channel inbound-email address
    pub recipient_email: String,
    /// Path inside the repository to summarize
    pub repository_path: PathBuf,
    /// Day being reported on
    pub date: NaiveDate,
    /// Optional author filter
    pub author: Option<String>,
    /// Directory for the daily report file
    pub output_dir: PathBuf,
    /// Inference endpoint settings
    pub ollama: OllamaSettings,
    /// Mail relay settings
    pub smtp: SmtpSettings,
    /// Log the email instead of sending it
    pub dry_run: bool,
}

impl RunConfig {
    /// Model identifier for the inference endpoint
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.ollama.model
    }
}

impl Config {
    /// Get the repository path, using current directory as default
    #[must_use]
    pub fn repo_path(&self) -> Option<PathBuf> {
        self.repo.clone().or_else(|| std::env::current_dir().ok())
    }

    /// Get the day to report on, using the local date as default
    #[must_use]
    pub fn run_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }

    /// Validate the flags and build the settings for one run
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - SENDER_EMAIL or SLACK_EMAIL is missing or blank
    /// - SENDER_PASSWORD is missing or blank outside a dry run
    /// - The repository path doesn't exist
    /// - The output path exists but is not a directory
    pub fn resolve(&self) -> Result<RunConfig, ConfigError> {
        let sender_email = required(&self.sender_email, "SENDER_EMAIL")?;
        // Nothing is sent in a dry run, so no password is needed
        let sender_password = match required(&self.sender_password, "SENDER_PASSWORD") {
            Err(_) if self.dry_run => String::new(),
            other => other?,
        };
        let recipient_email = required(&self.slack_email, "SLACK_EMAIL")?;

        let repository_path = self.repo_path().ok_or(ConfigError::NoWorkingDirectory)?;
        if !repository_path.exists() {
            return Err(ConfigError::RepoNotFound(repository_path));
        }

        let output_dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(ConfigError::OutputNotDirectory(output_dir));
        }

        Ok(RunConfig {
            sender_email,
            sender_password: SecretString::from(sender_password),
            recipient_email,
            repository_path,
            date: self.run_date(),
            author: self.author.clone().filter(|a| !a.trim().is_empty()),
            output_dir,
            ollama: OllamaSettings {
                base_url: self
                    .ollama_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
                model: self
                    .model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                timeout: Duration::from_secs(
                    self.ollama_timeout_secs
                        .unwrap_or(DEFAULT_OLLAMA_TIMEOUT_SECS),
                ),
                attempts: self.ollama_attempts.unwrap_or(1).max(1),
            },
            smtp: SmtpSettings {
                host: self
                    .smtp_host
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                port: self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
                timeout: Duration::from_secs(
                    self.smtp_timeout_secs.unwrap_or(DEFAULT_SMTP_TIMEOUT_SECS),
                ),
            },
            dry_run: self.dry_run,
        })
    }
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::Missing(name))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required option was not supplied
    #[error("Missing required option {0} (set it in the environment or .env)")]
    Missing(&'static str),

    /// No repository path was given and the current directory is unavailable
    #[error("Cannot determine the current working directory")]
    NoWorkingDirectory,

    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepoNotFound(PathBuf),

    /// Output path is not a directory
    #[error("Output path is not a directory: {0}")]
    OutputNotDirectory(PathBuf),
}
