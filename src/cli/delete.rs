//! `tsk delete` command

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::open_store;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct DeleteOptions {
    pub id: u64,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct DeleteOutput {
    id: u64,
    deleted: bool,
    remaining: usize,
}

pub fn run(options: DeleteOptions) -> Result<()> {
    let mut ctx = open_store(options.file);

    if !ctx.store.delete(options.id) {
        return Err(Error::TaskNotFound(options.id));
    }
    ctx.store.save()?;

    let payload = DeleteOutput {
        id: options.id,
        deleted: true,
        remaining: ctx.store.len(),
    };

    let mut human = HumanOutput::new(format!("Deleted task #{}", options.id));
    human.push_summary("remaining", payload.remaining.to_string());
    if let Some(warning) = &ctx.warning {
        human.push_warning(warning);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "delete",
        &payload,
        Some(&human),
    )
}
