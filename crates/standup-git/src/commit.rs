//! Commit record type

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of hex characters kept when abbreviating an object id
pub const SHORT_HASH_LEN: usize = 8;

/// A commit as read from the repository for a daily report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Abbreviated commit hash
    pub hash: String,
    /// Author name
    pub author: String,
    /// Local calendar date the commit was authored on
    pub date: NaiveDate,
    /// Full commit message, surrounding whitespace trimmed
    pub message: String,
}

impl CommitRecord {
    /// Abbreviate a full object id to [`SHORT_HASH_LEN`] characters
    #[must_use]
    pub fn abbreviate(sha: &str) -> String {
        sha.chars().take(SHORT_HASH_LEN).collect()
    }

    /// Get the first line of the commit message (subject)
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn sample_commit() -> CommitRecord {
        CommitRecord {
            hash: "1945ab9c".to_string(),
            author: "Test Author".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 17).unwrap(),
            message: "feat(report): add summary section\n\nDetailed description here."
                .to_string(),
        }
    }

    #[test]
    fn test_abbreviate_full_sha() {
        assert_eq!(
            CommitRecord::abbreviate("1945ab9c752534e733c38ba0109dc3b741f0a6eb"),
            "1945ab9c"
        );
    }

    #[test]
    fn test_abbreviate_short_input() {
        assert_eq!(CommitRecord::abbreviate("abc"), "abc");
    }

    #[test]
    fn test_subject_multiline() {
        let commit = sample_commit();
        assert_eq!(commit.subject(), "feat(report): add summary section");
    }

    #[test]
    fn test_subject_empty_message() {
        let mut commit = sample_commit();
        commit.message = String::new();
        assert_eq!(commit.subject(), "");
    }

    #[test]
    fn test_date_serializes_as_iso_date() {
        let json = serde_json::to_string(&sample_commit()).expect("serialize");
        assert!(json.contains("\"date\":\"2026-01-17\""));
    }
}
