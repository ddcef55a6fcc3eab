//! `tsk show` command

use std::path::PathBuf;

use chrono::Utc;

use crate::cli::open_store;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct ShowOptions {
    pub id: u64,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: ShowOptions) -> Result<()> {
    let ctx = open_store(options.file);
    let task = ctx
        .store
        .get(options.id)
        .ok_or(Error::TaskNotFound(options.id))?;

    if options.json {
        let mut human = HumanOutput::default();
        if let Some(warning) = &ctx.warning {
            human.push_warning(warning);
        }
        return emit_success(
            OutputOptions {
                json: true,
                quiet: options.quiet,
            },
            "show",
            &task.to_record(),
            Some(&human),
        );
    }

    if !options.quiet {
        if let Some(warning) = &ctx.warning {
            eprintln!("warning: {warning}");
        }
        // render() ends with its separator line and a newline
        print!("{}", task.render(Utc::now()));
    }

    Ok(())
}
