//! tsk - Personal Task Tracking Library
//!
//! This library provides the core functionality for the tsk CLI tool,
//! a single-user task tracker backed by one local JSON file.
//!
//! # Core Concepts
//!
//! - **Tasks**: Title, description, status, priority, optional deadline, tags
//! - **Statuses**: `todo`, `in_progress`, `done` with display markers
//! - **Priorities**: `low`, `medium`, `high` ranked for sorting
//! - **Deadlines**: UTC timestamps with an overdue marker on display
//! - **Store File**: All tasks live in a single JSON document on disk
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `export`: CSV and Markdown rendering of the task collection
//! - `output`: Human and JSON output envelopes
//! - `storage`: JSON file persistence, queries, and sorting
//! - `task`: Task entity, status and priority enums, time parsing

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
