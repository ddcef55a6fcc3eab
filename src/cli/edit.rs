//! Field-update commands: `tsk edit`, `tsk status`, `tsk priority`,
//! `tsk deadline`, and `tsk tag`.
//!
//! Each one parses its input first, then looks the task up, mutates it
//! through the entity's own update method, and saves. A bad value never
//! touches the store.

use std::path::PathBuf;

use crate::cli::{open_store, StoreContext};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{format_display_time, parse_deadline, Priority, Status, Task, TaskRecord};

pub struct EditOptions {
    pub id: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let mut ctx = open_store(options.file);
    let record = mutate_task(&mut ctx, options.id, |task| {
        task.update(options.title.as_deref(), options.description.as_deref());
    })?;

    let mut human = HumanOutput::new(format!("Updated task #{}: {}", record.id, record.title));
    push_field_summary(&mut human, &record);
    if let Some(warning) = &ctx.warning {
        human.push_warning(warning);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "edit",
        &record,
        Some(&human),
    )
}

pub struct StatusOptions {
    pub id: u64,
    pub status: String,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_status(options: StatusOptions) -> Result<()> {
    let status: Status = options.status.parse()?;

    let mut ctx = open_store(options.file);
    let record = mutate_task(&mut ctx, options.id, |task| {
        task.update_status(status);
    })?;

    let mut human = HumanOutput::new(format!(
        "Marked task #{} as {} {}",
        record.id,
        status.marker(),
        status
    ));
    if status == Status::Done {
        human.push_next_step(format!("tsk delete {}", record.id));
    }
    if let Some(warning) = &ctx.warning {
        human.push_warning(warning);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "status",
        &record,
        Some(&human),
    )
}

pub struct PriorityOptions {
    pub id: u64,
    pub priority: String,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_priority(options: PriorityOptions) -> Result<()> {
    let priority: Priority = options.priority.parse()?;

    let mut ctx = open_store(options.file);
    let record = mutate_task(&mut ctx, options.id, |task| {
        task.update_priority(priority);
    })?;

    let mut human = HumanOutput::new(format!(
        "Set priority of task #{} to {} {}",
        record.id,
        priority.marker(),
        priority
    ));
    if let Some(warning) = &ctx.warning {
        human.push_warning(warning);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "priority",
        &record,
        Some(&human),
    )
}

pub struct DeadlineOptions {
    pub id: u64,
    pub when: Option<String>,
    pub clear: bool,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_deadline(options: DeadlineOptions) -> Result<()> {
    let deadline = match (&options.when, options.clear) {
        (Some(_), true) => {
            return Err(Error::InvalidArgument(
                "give a deadline or --clear, not both".to_string(),
            ));
        }
        (Some(when), false) => Some(parse_deadline(when)?),
        (None, true) => None,
        (None, false) => {
            return Err(Error::InvalidArgument(
                "deadline required (or use --clear)".to_string(),
            ));
        }
    };

    let mut ctx = open_store(options.file);
    let record = mutate_task(&mut ctx, options.id, |task| {
        task.update_deadline(deadline);
    })?;

    let header = match deadline {
        Some(deadline) => format!(
            "Set deadline of task #{} to {}",
            record.id,
            format_display_time(deadline)
        ),
        None => format!("Cleared deadline of task #{}", record.id),
    };

    let mut human = HumanOutput::new(header);
    if let Some(warning) = &ctx.warning {
        human.push_warning(warning);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "deadline",
        &record,
        Some(&human),
    )
}

pub struct TagOptions {
    pub id: u64,
    pub tags: Vec<String>,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_tag(options: TagOptions) -> Result<()> {
    let mut ctx = open_store(options.file);
    let record = mutate_task(&mut ctx, options.id, |task| {
        task.set_tags(&options.tags);
    })?;

    let header = if record.tags.is_empty() {
        format!("Cleared tags of task #{}", record.id)
    } else {
        format!("Tagged task #{}: {}", record.id, record.tags.join(", "))
    };

    let mut human = HumanOutput::new(header);
    if let Some(warning) = &ctx.warning {
        human.push_warning(warning);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "tag",
        &record,
        Some(&human),
    )
}

/// Look a task up, apply `mutate`, save, and hand back the updated record.
/// An unknown id fails before anything is written.
fn mutate_task<F>(ctx: &mut StoreContext, id: u64, mutate: F) -> Result<TaskRecord>
where
    F: FnOnce(&mut Task),
{
    let record = {
        let task = ctx.store.get_mut(id).ok_or(Error::TaskNotFound(id))?;
        mutate(task);
        task.to_record()
    };
    ctx.store.save()?;
    Ok(record)
}

fn push_field_summary(human: &mut HumanOutput, record: &TaskRecord) {
    if !record.description.is_empty() {
        human.push_summary("description", record.description.clone());
    }
    human.push_summary("status", record.status.to_string());
    human.push_summary("priority", record.priority.clone());
}
