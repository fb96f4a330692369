// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! standup-git: daily commit extraction for daily-standup
//!
//! This library crate reads the commits authored on a single calendar day
//! from a local git repository and normalizes them into [`CommitRecord`]s.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use chrono::Local;
//! use standup_git::{DayQuery, GitRepo};
//!
//! let repo = GitRepo::discover(".").expect("open repo");
//! let commits = repo
//!     .commits_on(&DayQuery::new(Local::now().date_naive()))
//!     .expect("read commits");
//!
//! for c in commits {
//!     println!("{} - {}", c.hash, c.subject());
//! }
//! ```

pub mod commit;
pub mod error;
pub mod repo;

pub use commit::CommitRecord;
pub use error::RepositoryError;
pub use repo::{DayQuery, GitRepo};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::CommitRecord;
    pub use crate::error::RepositoryError;
    pub use crate::repo::{DayQuery, GitRepo};
}
