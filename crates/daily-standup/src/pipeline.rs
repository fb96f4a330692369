// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! One daily-standup run: extract, summarize, write, notify
//!
//! Only a failed extraction aborts a run. A failed summary is replaced by
//! a marked fallback, a failed write still lets the email go out, and a
//! failed send never touches the written report.
//!
//! # Example
//!
//! ```no_run
//! # async fn run(config: daily_standup::config::RunConfig) -> anyhow::Result<()> {
//! use daily_standup::notify::DryRunNotifier;
//! use daily_standup::pipeline::{Pipeline, RepoSource};
//! use daily_standup::summary::OllamaClient;
//!
//! let source = RepoSource::new(&config.repository_path);
//! let summarizer = OllamaClient::new(config.ollama.clone())?;
//! let outcome = Pipeline::new(&config, &source, &summarizer, &DryRunNotifier)
//!     .run()
//!     .await?;
//! println!("{:?}", outcome.states);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use standup_git::{CommitRecord, DayQuery, GitRepo, RepositoryError};
use tracing::{error, info, warn};

use crate::config::RunConfig;
use crate::notify::{DeliveryError, Notifier, compose};
use crate::report::{Report, ReportError, ReportWriter};
use crate::summary::{GenerationError, Summarizer, fallback_summary};

/// Source of a day's commits
pub trait CommitSource: Send + Sync {
    /// Read the commits matching `query`, newest first
    fn commits(&self, query: &DayQuery) -> Result<Vec<CommitRecord>, RepositoryError>;
}

/// Reads commits from the repository containing a path
#[derive(Debug, Clone)]
pub struct RepoSource {
    path: PathBuf,
}

impl RepoSource {
    /// Create a source for the repository containing `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CommitSource for RepoSource {
    fn commits(&self, query: &DayQuery) -> Result<Vec<CommitRecord>, RepositoryError> {
        GitRepo::discover(&self.path)?.commits_on(query)
    }
}

/// States a run passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing done yet
    Init,
    /// Commits read
    Extracted,
    /// Summary generated
    Summarized,
    /// Summary replaced by fallback text
    SummaryFallback,
    /// Report file written
    Written,
    /// Report file could not be written
    WriteFailed,
    /// Email delivered
    Notified,
    /// Email could not be delivered
    NotifyFailed,
    /// Run finished
    Done,
}

/// What happened during a run that got past extraction
#[derive(Debug)]
pub struct RunOutcome {
    /// States visited, in order
    pub states: Vec<RunState>,
    /// The day's report
    pub report: Report,
    /// Why the summary fell back, if it did
    pub summary_error: Option<GenerationError>,
    /// Where the report was written, or why it was not
    pub written: Result<PathBuf, ReportError>,
    /// Delivery result
    pub delivery: Result<(), DeliveryError>,
}

impl RunOutcome {
    /// True when every stage succeeded
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.summary_error.is_none() && self.written.is_ok() && self.delivery.is_ok()
    }

    /// Whether the run visited `state`
    #[must_use]
    pub fn visited(&self, state: RunState) -> bool {
        self.states.contains(&state)
    }
}

/// Process exit code for the result of [`Pipeline::run`]
///
/// Any run that got past extraction succeeds, however degraded its later
/// stages were. Only a failed extraction is a failure.
#[must_use]
pub fn exit_code(result: &Result<RunOutcome, RepositoryError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Runs the stages of one daily-standup pass in order
pub struct Pipeline<'a> {
    config: &'a RunConfig,
    source: &'a dyn CommitSource,
    summarizer: &'a dyn Summarizer,
    writer: ReportWriter,
    notifier: &'a dyn Notifier,
}

impl<'a> Pipeline<'a> {
    /// Wire the stages together; reports go to `config.output_dir`
    #[must_use]
    pub fn new(
        config: &'a RunConfig,
        source: &'a dyn CommitSource,
        summarizer: &'a dyn Summarizer,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            config,
            source,
            summarizer,
            writer: ReportWriter::new(&config.output_dir),
            notifier,
        }
    }

    fn query(&self) -> DayQuery {
        match self.config.author {
            Some(ref author) => DayQuery::new(self.config.date).by_author(author),
            None => DayQuery::new(self.config.date),
        }
    }

    /// Run every stage once
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the commits cannot be read. Later stage
    /// failures are recorded in the returned [`RunOutcome`] instead.
    pub async fn run(&self) -> Result<RunOutcome, RepositoryError> {
        let mut states = vec![RunState::Init];
        let date = self.config.date;

        info!(%date, repo = %self.config.repository_path.display(), "fetching commits");
        let commits = self.source.commits(&self.query()).map_err(|e| {
            error!(stage = "extract", error = %e, "failed to read commits");
            e
        })?;
        info!(count = commits.len(), "commits found");
        states.push(RunState::Extracted);

        let (summary, summary_error) = match self.summarizer.summarize(&commits).await {
            Ok(summary) => {
                states.push(RunState::Summarized);
                (summary, None)
            }
            Err(e) => {
                warn!(stage = "summarize", error = %e, "summary unavailable, using fallback");
                states.push(RunState::SummaryFallback);
                (fallback_summary(&e), Some(e))
            }
        };

        let report = Report::new(date, commits, summary);

        let written = self.writer.write(&report);
        match written {
            Ok(ref path) => {
                info!(path = %path.display(), "report saved");
                states.push(RunState::Written);
            }
            Err(ref e) => {
                warn!(stage = "write", error = %e, "report not saved, sending email anyway");
                states.push(RunState::WriteFailed);
            }
        }

        let email = compose(
            &self.config.sender_email,
            &self.config.recipient_email,
            &report,
        );
        let delivery = self.notifier.deliver(&email).await;
        match delivery {
            Ok(()) => states.push(RunState::Notified),
            Err(ref e) => {
                warn!(stage = "notify", error = %e, "failed to send summary email");
                states.push(RunState::NotifyFailed);
            }
        }

        states.push(RunState::Done);
        Ok(RunOutcome {
            states,
            report,
            summary_error,
            written,
            delivery,
        })
    }
}
