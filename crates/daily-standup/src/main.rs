//! daily-standup: summarize today's commits and post them to Slack
//!
//! Reads the day's commits, asks a local model for a standup summary,
//! saves a dated report file and emails it to a Slack channel address.
//! Meant to be run once a day from a scheduler such as cron.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use daily_standup::config::Config;
use daily_standup::notify::{DryRunNotifier, Notifier, SmtpNotifier};
use daily_standup::pipeline::{Pipeline, RepoSource, exit_code};
use daily_standup::summary::OllamaClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Missing .env is fine, the environment may already be set
    let dotenv = dotenvy::dotenv();

    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    match run(&config).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> anyhow::Result<ExitCode> {
    let run_config = config.resolve().context("invalid configuration")?;

    let source = RepoSource::new(&run_config.repository_path);
    let summarizer =
        OllamaClient::new(run_config.ollama.clone()).context("failed to set up inference client")?;
    let notifier: Box<dyn Notifier> = if run_config.dry_run {
        Box::new(DryRunNotifier)
    } else {
        Box::new(SmtpNotifier::new(
            &run_config.smtp,
            &run_config.sender_email,
            &run_config.sender_password,
        ))
    };

    let pipeline = Pipeline::new(&run_config, &source, &summarizer, notifier.as_ref());
    let result = pipeline.run().await;
    match result {
        Ok(ref outcome) if outcome.is_complete() => {
            info!(
                commits = outcome.report.commit_count(),
                "daily standup complete"
            );
        }
        Ok(ref outcome) => {
            warn!(
                commits = outcome.report.commit_count(),
                states = ?outcome.states,
                "daily standup finished with degraded output"
            );
        }
        Err(ref e) => error!(error = %e, "no commits could be read, aborting"),
    }

    if let Ok(ref outcome) = result {
        println!("{}", outcome.report.summary());
        if let Ok(ref path) = outcome.written {
            println!("\nResults saved to: {}", path.display());
        }
    }

    Ok(exit_code(&result))
}
