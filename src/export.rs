//! Export rendering for tsk
//!
//! Two formats over the same task fields: CSV for spreadsheets and Markdown
//! for pasting into notes. Both render the whole collection in storage
//! order; any filtering happens before export.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::task::{format_display_time, format_record_time, Status, Task};

const CSV_HEADER: &str = "id,title,description,status,priority,deadline,tags,created_at,updated_at";

/// Marker emitted when exporting an empty collection to Markdown
pub const EMPTY_MARKER: &str = "_No tasks yet._";

// =============================================================================
// Export format
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Markdown];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "markdown",
        }
    }

    /// File extension used when the caller gives no output path
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            _ => Err(Error::InvalidValue {
                kind: "export format",
                value: s.to_string(),
                expected: "csv, md, markdown".to_string(),
            }),
        }
    }
}

// =============================================================================
// CSV
// =============================================================================

/// Render tasks as CSV, one row per task after a fixed header.
///
/// Absent deadlines render as the empty string, tags join with `", "`, and
/// timestamps use the stored ISO form. Fields containing a comma, quote, or
/// newline are quoted with doubled inner quotes.
pub fn render_csv(tasks: &[Task]) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');

    for task in tasks {
        let fields = [
            task.id().to_string(),
            task.title().to_string(),
            task.description().to_string(),
            task.status().to_string(),
            task.priority().to_string(),
            task.deadline().map(format_record_time).unwrap_or_default(),
            task.tags().join(", "),
            format_record_time(task.created_at()),
            format_record_time(task.updated_at()),
        ];
        let row: Vec<String> = fields.iter().map(|field| csv_field(field)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// =============================================================================
// Markdown
// =============================================================================

/// Render tasks as a Markdown document grouped by status.
///
/// Groups appear in workflow order (todo, in_progress, done) with empty
/// groups omitted; each task gets a heading with its id, title, and priority
/// marker, followed by description, deadline, and tags when present.
pub fn render_markdown(tasks: &[Task]) -> String {
    let mut out = String::new();
    out.push_str("# Tasks\n\n");

    if tasks.is_empty() {
        out.push_str(EMPTY_MARKER);
        out.push('\n');
        return out;
    }

    for status in Status::ALL {
        let group: Vec<&Task> = tasks.iter().filter(|t| t.status() == status).collect();
        if group.is_empty() {
            continue;
        }

        out.push_str(&format!("## {} {}\n\n", status.marker(), status));
        for task in group {
            out.push_str(&format!(
                "### #{} {} {}\n\n",
                task.id(),
                task.title(),
                task.priority().marker()
            ));
            if !task.description().is_empty() {
                out.push_str(task.description());
                out.push_str("\n\n");
            }
            if let Some(deadline) = task.deadline() {
                out.push_str(&format!("Deadline: {}\n\n", format_display_time(deadline)));
            }
            if !task.tags().is_empty() {
                out.push_str(&format!("Tags: {}\n\n", task.tags().join(", ")));
            }
            out.push_str("---\n\n");
        }
    }

    out
}
