//! `tsk list`, `tsk search`, and `tsk tags` commands

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::cli::open_store;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::{sort_tasks, SortKey};
use crate::task::{format_display_time, Status, Task, TaskRecord, OVERDUE_MARKER};

pub struct ListOptions {
    pub status: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<String>,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    // Parse filter values up front so a bad value fails before any output
    let status = options
        .status
        .as_deref()
        .map(str::parse::<Status>)
        .transpose()?;
    let sort = options
        .sort
        .as_deref()
        .map(str::parse::<SortKey>)
        .transpose()?;

    let ctx = open_store(options.file);

    let mut tasks: Vec<&Task> = match status {
        Some(status) => ctx.store.filter_by_status(status),
        None => ctx.store.list_all().iter().collect(),
    };
    if let Some(tag) = &options.tag {
        tasks.retain(|task| task.has_tag(tag));
    }
    if let Some(key) = sort {
        sort_tasks(&mut tasks, key);
    }

    let records: Vec<TaskRecord> = tasks.iter().map(|task| task.to_record()).collect();

    let header = if tasks.is_empty() {
        "No tasks found".to_string()
    } else if tasks.len() == 1 {
        "1 task".to_string()
    } else {
        format!("{} tasks", tasks.len())
    };

    let now = Utc::now();
    let mut human = HumanOutput::new(header);
    for task in &tasks {
        human.push_detail(format_task_line(task, now));
    }
    if let Some(warning) = &ctx.warning {
        human.push_warning(warning);
    }
    if ctx.store.is_empty() {
        human.push_next_step("tsk add \"<title>\"".to_string());
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list",
        &records,
        Some(&human),
    )
}

pub struct SearchOptions {
    pub query: String,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_search(options: SearchOptions) -> Result<()> {
    let ctx = open_store(options.file);
    let tasks = ctx.store.search(&options.query);
    let records: Vec<TaskRecord> = tasks.iter().map(|task| task.to_record()).collect();

    let header = match tasks.len() {
        0 => format!("No tasks match \"{}\"", options.query),
        1 => format!("1 task matches \"{}\"", options.query),
        n => format!("{} tasks match \"{}\"", n, options.query),
    };

    let now = Utc::now();
    let mut human = HumanOutput::new(header);
    for task in &tasks {
        human.push_detail(format_task_line(task, now));
    }
    if let Some(warning) = &ctx.warning {
        human.push_warning(warning);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "search",
        &records,
        Some(&human),
    )
}

pub struct TagsOptions {
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_tags(options: TagsOptions) -> Result<()> {
    let ctx = open_store(options.file);
    let tags = ctx.store.all_tags();

    let header = if tags.is_empty() {
        "No tags in use".to_string()
    } else {
        format!("Tags ({})", tags.len())
    };

    let mut human = HumanOutput::new(header);
    for tag in &tags {
        human.push_detail(tag.clone());
    }
    if let Some(warning) = &ctx.warning {
        human.push_warning(warning);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "tags",
        &tags,
        Some(&human),
    )
}

/// One task as a single list line: id, markers, title, deadline, tags
pub(crate) fn format_task_line(task: &Task, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "#{} {} {} {}",
        task.id(),
        task.status().marker(),
        task.priority().marker(),
        task.title()
    );
    if let Some(deadline) = task.deadline() {
        if task.is_overdue(now) {
            line.push_str(&format!(
                " (due {} {} overdue)",
                format_display_time(deadline),
                OVERDUE_MARKER
            ));
        } else {
            line.push_str(&format!(" (due {})", format_display_time(deadline)));
        }
    }
    if !task.tags().is_empty() {
        line.push_str(&format!(" [{}]", task.tags().join(", ")));
    }
    line
}
