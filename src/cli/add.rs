//! `tsk add` command

use std::path::PathBuf;

use crate::cli::open_store;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::TaskRecord;

pub struct AddOptions {
    pub title: String,
    pub description: String,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: AddOptions) -> Result<()> {
    if options.title.trim().is_empty() {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }

    let mut ctx = open_store(options.file);
    let record: TaskRecord = ctx.store.add(options.title, options.description).to_record();
    ctx.store.save()?;

    let mut human = HumanOutput::new(format!("Added task #{}: {}", record.id, record.title));
    human.push_summary("status", record.status.to_string());
    human.push_summary("priority", record.priority.clone());
    if let Some(warning) = &ctx.warning {
        human.push_warning(warning);
    }
    human.push_next_step(format!("tsk show {}", record.id));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &record,
        Some(&human),
    )
}
