//! Command-line interface for tsk
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command family lives in its own submodule; every mutating command
//! saves the store before reporting success.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::storage::Storage;

mod add;
mod delete;
mod edit;
mod export;
mod list;
mod show;

/// tsk - personal task tracker
///
/// Create, edit, tag, prioritize, schedule, filter, sort, search, and
/// export tasks backed by a single local JSON file.
#[derive(Parser, Debug)]
#[command(name = "tsk")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task file (defaults to the platform data dir)
    #[arg(long, global = true, env = "TSK_FILE")]
    pub file: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List tasks, optionally filtered and sorted
    List {
        /// Only tasks with this status: todo, in_progress, done
        #[arg(long)]
        status: Option<String>,

        /// Only tasks carrying this tag
        #[arg(long)]
        tag: Option<String>,

        /// Sort by: id, created, updated, status, priority
        #[arg(long)]
        sort: Option<String>,
    },

    /// Show one task in full
    Show {
        /// Task id
        id: u64,
    },

    /// Edit title and/or description of a task
    Edit {
        /// Task id
        id: u64,

        /// New title (empty leaves the title unchanged)
        #[arg(long)]
        title: Option<String>,

        /// New description (empty leaves the description unchanged)
        #[arg(long)]
        description: Option<String>,
    },

    /// Change the status of a task
    Status {
        /// Task id
        id: u64,

        /// New status: todo, in_progress, done
        status: String,
    },

    /// Change the priority of a task
    Priority {
        /// Task id
        id: u64,

        /// New priority: low, medium, high
        priority: String,
    },

    /// Set or clear the deadline of a task
    Deadline {
        /// Task id
        id: u64,

        /// Deadline as "DD.MM.YYYY HH:MM" or "DD.MM.YYYY" (defaults to 23:59)
        when: Option<String>,

        /// Remove the deadline
        #[arg(long)]
        clear: bool,
    },

    /// Replace the tags of a task (no tags clears them)
    Tag {
        /// Task id
        id: u64,

        /// Tags to set; "#work", "Work", and "work" are the same tag
        tags: Vec<String>,
    },

    /// Search tasks by title and description
    Search {
        /// Case-insensitive substring to look for
        query: String,
    },

    /// List every tag in use
    Tags,

    /// Delete a task
    Delete {
        /// Task id
        id: u64,
    },

    /// Export all tasks to a file
    Export {
        /// Output format: csv, md, markdown
        format: String,

        /// Output path (defaults next to the working directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Loaded store plus user config, shared by every command.
///
/// `warning` carries the load-time message when an existing task file had
/// to be discarded; commands surface it instead of dropping it.
pub(crate) struct StoreContext {
    pub store: Storage,
    pub config: Config,
    pub warning: Option<String>,
}

/// Resolve the task file (flag/env beats config beats platform default)
/// and load it
pub(crate) fn open_store(file: Option<PathBuf>) -> StoreContext {
    let config = Config::load_user();
    let path = file.unwrap_or_else(|| config.data_path());
    let outcome = Storage::load(path);
    StoreContext {
        store: outcome.storage,
        config,
        warning: outcome.warning,
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Add { title, description } => add::run(add::AddOptions {
                title,
                description,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::List { status, tag, sort } => list::run_list(list::ListOptions {
                status,
                tag,
                sort,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Show { id } => show::run(show::ShowOptions {
                id,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Edit {
                id,
                title,
                description,
            } => edit::run_edit(edit::EditOptions {
                id,
                title,
                description,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Status { id, status } => edit::run_status(edit::StatusOptions {
                id,
                status,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Priority { id, priority } => edit::run_priority(edit::PriorityOptions {
                id,
                priority,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Deadline { id, when, clear } => edit::run_deadline(edit::DeadlineOptions {
                id,
                when,
                clear,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Tag { id, tags } => edit::run_tag(edit::TagOptions {
                id,
                tags,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Search { query } => list::run_search(list::SearchOptions {
                query,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Tags => list::run_tags(list::TagsOptions {
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Delete { id } => delete::run(delete::DeleteOptions {
                id,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Export { format, out } => export::run(export::ExportOptions {
                format,
                out,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}
