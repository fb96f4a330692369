//! daily-standup library
//!
//! This module exports the pipeline stages of daily-standup for use in
//! integration tests and as a library.

pub mod config;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod summary;
