// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Daily report rendering and persistence
//!
//! One plain-text file per day, named from the date, so a second run on
//! the same day replaces the first run's file.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use standup_git::CommitRecord;
use thiserror::Error;
use tracing::debug;

const HEAVY_RULE_WIDTH: usize = 50;
const LIGHT_RULE_WIDTH: usize = 40;

/// Report writing errors
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report could not be written
    #[error("failed to write report {path}: {source}")]
    Io {
        /// Destination that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Everything recorded about one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    date: NaiveDate,
    commit_count: usize,
    commits: Vec<CommitRecord>,
    summary: String,
}

impl Report {
    /// Assemble a report; the commit count is taken from `commits`
    #[must_use]
    pub fn new(date: NaiveDate, commits: Vec<CommitRecord>, summary: String) -> Self {
        Self {
            date,
            commit_count: commits.len(),
            commits,
            summary,
        }
    }

    /// Day the report covers
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Number of commits in the report
    #[must_use]
    pub fn commit_count(&self) -> usize {
        self.commit_count
    }

    /// Commits, newest first
    #[must_use]
    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    /// Standup summary text
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Render the report in its plain-text layout
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(out, "Commits for {}", self.date.format("%Y-%m-%d"));
        let _ = writeln!(out, "{}", "=".repeat(HEAVY_RULE_WIDTH));
        let _ = writeln!(out, "Total commits: {}\n", self.commit_count);

        if self.commits.is_empty() {
            out.push_str("No commits found for this date.\n");
        }
        for commit in &self.commits {
            let _ = writeln!(out, "Hash: {}", commit.hash);
            let _ = writeln!(out, "Author: {}", commit.author);
            let _ = writeln!(out, "Date: {}", commit.date.format("%Y-%m-%d"));
            let _ = writeln!(out, "Message: {}", commit.message);
            let _ = writeln!(out, "{}", "-".repeat(LIGHT_RULE_WIDTH));
        }

        let _ = writeln!(out, "\nSummary:\n{}", self.summary);
        out
    }
}

/// File name for the report of `date`, e.g. `commits_14-10-26.txt`
#[must_use]
pub fn report_file_name(date: NaiveDate) -> String {
    format!("commits_{}.txt", date.format("%d-%m-%y"))
}

/// Writes rendered reports into a directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// Create a writer targeting `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the report for `date` is written to
    #[must_use]
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(report_file_name(date))
    }

    /// Render and write `report`, replacing any earlier file for the same day
    ///
    /// The text goes to a temporary file in the same directory that is then
    /// renamed over the destination, so readers never see a partial report.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Io` if the directory or file cannot be written.
    pub fn write(&self, report: &Report) -> Result<PathBuf, ReportError> {
        let path = self.path_for(report.date());
        let text = report.render();
        let io_err = |source: std::io::Error| ReportError::Io {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        let mut builder = tempfile::Builder::new();
        builder.prefix(".commits_").suffix(".tmp");
        // Same mode a plain create gives (0666 less umask), not tempfile's 0600
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt as _;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder.tempfile_in(&self.dir).map_err(io_err)?;
        tmp.write_all(text.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;

        debug!(path = %path.display(), bytes = text.len(), "report written");
        Ok(path)
    }

    /// Directory reports are written to
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
