// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Daily commit extraction
//!
//! This module reads the commits authored on one calendar day from a
//! repository using the `git2` crate.

use crate::commit::CommitRecord;
use crate::error::RepositoryError;
use chrono::{Local, NaiveDate, TimeZone};
use git2::{ErrorCode, Repository, Signature, Sort};
use std::path::Path;
use tracing::debug;

/// Which commits to extract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayQuery {
    /// Local calendar date the commits were authored on
    pub date: NaiveDate,
    /// Keep only commits whose author name or email contains this text
    pub author: Option<String>,
}

impl DayQuery {
    /// Create a query for all commits authored on `date`
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self { date, author: None }
    }

    /// Restrict the query to a single author
    #[must_use]
    pub fn by_author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    fn matches_author(&self, signature: &Signature<'_>) -> bool {
        let Some(ref needle) = self.author else {
            return true;
        };
        let needle = needle.to_lowercase();
        [signature.name(), signature.email()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Local calendar date of a git timestamp
fn local_date(time: git2::Time) -> Option<NaiveDate> {
    Local
        .timestamp_opt(time.seconds(), 0)
        .single()
        .map(|dt| dt.date_naive())
}

/// A git repository wrapper for reading daily commits
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the path is not a git repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|_| RepositoryError::NotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Discover and open a git repository containing the given path
    ///
    /// This walks up the directory tree to find a `.git` directory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|_| RepositoryError::NotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Get the working directory path (None for bare repos)
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Read the commits matching `query`, newest first
    ///
    /// An unborn HEAD (a fresh repository or a new orphan branch) yields an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Git` if the history cannot be walked.
    pub fn commits_on(&self, query: &DayQuery) -> Result<Vec<CommitRecord>, RepositoryError> {
        match self.repo.head() {
            Ok(_) => {}
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                debug!(path = %self.repo.path().display(), "HEAD has no commits");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME | Sort::TOPOLOGICAL)?;
        revwalk.push_head()?;

        let mut commits = Vec::new();
        let mut walked = 0usize;

        for oid_result in revwalk {
            let oid = oid_result?;
            let git_commit = self.repo.find_commit(oid)?;
            walked += 1;

            let author = git_commit.author();
            if local_date(author.when()) != Some(query.date) {
                continue;
            }
            if !query.matches_author(&author) {
                continue;
            }

            commits.push(Self::extract_commit(&git_commit, query.date));
        }

        debug!(
            walked,
            matched = commits.len(),
            date = %query.date,
            "walked repository history"
        );
        Ok(commits)
    }

    fn extract_commit(git_commit: &git2::Commit<'_>, date: NaiveDate) -> CommitRecord {
        let message = match git_commit.message() {
            Some(message) => message.trim().to_string(),
            None => String::from_utf8_lossy(git_commit.message_bytes())
                .trim()
                .to_string(),
        };

        CommitRecord {
            hash: CommitRecord::abbreviate(&git_commit.id().to_string()),
            author: String::from_utf8_lossy(git_commit.author().name_bytes()).into_owned(),
            date,
            message,
        }
    }
}
