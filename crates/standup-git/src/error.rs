// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for standup-git

use thiserror::Error;

/// Errors that can occur while reading commits from a repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Error from git2 library
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// No repository at or above the specified path
    #[error("Repository not found: {path}")]
    NotFound {
        /// The path that was searched for a repository
        path: String,
    },
}
