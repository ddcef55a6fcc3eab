//! `tsk export` command

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::open_store;
use crate::error::Result;
use crate::export::ExportFormat;
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct ExportOptions {
    pub format: String,
    pub out: Option<PathBuf>,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ExportOutput {
    format: &'static str,
    path: PathBuf,
    tasks: usize,
}

pub fn run(options: ExportOptions) -> Result<()> {
    let format: ExportFormat = options.format.parse()?;

    let ctx = open_store(options.file);
    let out = options.out.unwrap_or_else(|| ctx.config.export_path(format));
    ctx.store.export(format, &out)?;

    let payload = ExportOutput {
        format: format.as_str(),
        path: out.clone(),
        tasks: ctx.store.len(),
    };

    let mut human = HumanOutput::new(format!(
        "Exported {} task(s) to {}",
        payload.tasks,
        out.display()
    ));
    human.push_summary("format", format.to_string());
    if let Some(warning) = &ctx.warning {
        human.push_warning(warning);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "export",
        &payload,
        Some(&human),
    )
}
