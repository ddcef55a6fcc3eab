//! Task entity for tsk.
//!
//! A task is one user-visible work item: title, free-text description,
//! status, priority, optional deadline, and normalized tags. All mutation
//! goes through the update methods so `updated_at` stays accurate;
//! persistence and export go through [`TaskRecord`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Display form for timestamps and deadlines in human output
const DISPLAY_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";
/// Accepted deadline input forms
const DEADLINE_FORMAT: &str = "%d.%m.%Y %H:%M";
const DEADLINE_DATE_FORMAT: &str = "%d.%m.%Y";
/// Fallback for stored timestamps written without an offset
const NAIVE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Marker attached to an overdue deadline in human output
pub const OVERDUE_MARKER: &str = "\u{23F0}";

// =============================================================================
// Status
// =============================================================================

/// Workflow state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Not started yet
    Todo,
    /// Currently being worked on
    InProgress,
    /// Finished
    Done,
}

impl Status {
    /// All statuses in workflow order
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    /// Canonical wire name, as stored and as accepted from the CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in_progress",
            Status::Done => "done",
        }
    }

    /// Emoji marker used in human output
    pub fn marker(&self) -> &'static str {
        match self {
            Status::Todo => "\u{1F4CB}",
            Status::InProgress => "\u{2699}\u{FE0F}",
            Status::Done => "\u{2705}",
        }
    }

    /// Position in workflow order (todo < in_progress < done)
    pub fn rank(&self) -> u8 {
        match self {
            Status::Todo => 0,
            Status::InProgress => 1,
            Status::Done => 2,
        }
    }

    fn expected() -> String {
        Status::ALL.map(|s| s.as_str()).join(", ")
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(Status::Todo),
            "in_progress" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            _ => Err(Error::InvalidValue {
                kind: "status",
                value: s.to_string(),
                expected: Status::expected(),
            }),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Todo
    }
}

// =============================================================================
// Priority
// =============================================================================

/// Urgency of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// All priorities, lowest first
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Emoji marker used in human output
    pub fn marker(&self) -> &'static str {
        match self {
            Priority::Low => "\u{1F7E2}",
            Priority::Medium => "\u{1F7E1}",
            Priority::High => "\u{1F534}",
        }
    }

    /// Sort rank: high sorts before medium sorts before low
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    fn expected() -> String {
        Priority::ALL.map(|p| p.as_str()).join(", ")
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(Error::InvalidValue {
                kind: "priority",
                value: s.to_string(),
                expected: Priority::expected(),
            }),
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

// =============================================================================
// Task
// =============================================================================

/// One tracked work item.
///
/// Fields are private so every mutation flows through an update method and
/// refreshes `updated_at`. Identifiers are assigned by the store and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    id: u64,
    title: String,
    description: String,
    status: Status,
    priority: Priority,
    deadline: Option<DateTime<Utc>>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Current time at the microsecond precision the record form keeps, so a
/// task compares equal to itself after a save/load round trip.
fn utc_now() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now)
}

impl Task {
    /// Create a task with defaults: todo, medium priority, no deadline, no tags
    pub fn new(id: u64, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = utc_now();
        Task {
            id,
            title: title.into(),
            description: description.into(),
            status: Status::default(),
            priority: Priority::default(),
            deadline: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace title and/or description.
    ///
    /// An absent or empty argument leaves that field unchanged; clearing a
    /// field through this path is intentionally impossible. `updated_at` is
    /// refreshed even when both arguments are skipped.
    pub fn update(&mut self, title: Option<&str>, description: Option<&str>) {
        if let Some(title) = title {
            if !title.is_empty() {
                self.title = title.to_string();
            }
        }
        if let Some(description) = description {
            if !description.is_empty() {
                self.description = description.to_string();
            }
        }
        self.touch();
    }

    pub fn update_status(&mut self, status: Status) {
        self.status = status;
        self.touch();
    }

    pub fn update_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.touch();
    }

    /// Set or clear the deadline
    pub fn update_deadline(&mut self, deadline: Option<DateTime<Utc>>) {
        self.deadline = deadline;
        self.touch();
    }

    /// Replace the whole tag set with the normalized input.
    ///
    /// Entries are trimmed, stripped of a leading `#`, lowercased, and
    /// deduplicated; empty entries are dropped. First-occurrence order is
    /// kept for display. An empty input clears all tags.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for raw in tags {
            if let Some(tag) = normalize_tag(raw.as_ref()) {
                if !normalized.contains(&tag) {
                    normalized.push(tag);
                }
            }
        }
        self.tags = normalized;
        self.touch();
    }

    /// Whether the tag set contains `tag` after normalization
    pub fn has_tag(&self, tag: &str) -> bool {
        match normalize_tag(tag) {
            Some(tag) => self.tags.iter().any(|t| *t == tag),
            None => false,
        }
    }

    /// A task is overdue once its deadline has passed and it is not done
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) => deadline < now && self.status != Status::Done,
            None => false,
        }
    }

    /// Deterministic multi-line summary of all fields.
    ///
    /// `now` drives the overdue marker so callers (and tests) can pin it.
    pub fn render(&self, now: DateTime<Utc>) -> String {
        let mut out = String::new();
        out.push_str(&format!("ID: {}\n", self.id));
        out.push_str(&format!("Title: {}\n", self.title));
        out.push_str(&format!("Description: {}\n", self.description));
        out.push_str(&format!(
            "Status: {} {}\n",
            self.status.marker(),
            self.status
        ));
        out.push_str(&format!(
            "Priority: {} {}\n",
            self.priority.marker(),
            self.priority
        ));
        if let Some(deadline) = self.deadline {
            if self.is_overdue(now) {
                out.push_str(&format!(
                    "Deadline: {} {} OVERDUE!\n",
                    format_display_time(deadline),
                    OVERDUE_MARKER
                ));
            } else {
                out.push_str(&format!("Deadline: {}\n", format_display_time(deadline)));
            }
        }
        if !self.tags.is_empty() {
            out.push_str(&format!("Tags: {}\n", self.tags.join(", ")));
        }
        out.push_str(&format!("Created: {}\n", format_display_time(self.created_at)));
        out.push_str(&format!("Updated: {}\n", format_display_time(self.updated_at)));
        out.push_str(&"-".repeat(40));
        out.push('\n');
        out
    }

    /// Flat serializable form for the store document and exports
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority.as_str().to_string(),
            deadline: self.deadline.map(format_record_time),
            tags: self.tags.clone(),
            created_at: format_record_time(self.created_at),
            updated_at: format_record_time(self.updated_at),
        }
    }

    /// Rebuild a task from its stored form.
    ///
    /// An unrecognized priority string falls back to medium; tags are
    /// re-normalized so hand-edited files cannot smuggle in duplicates.
    /// Malformed timestamps fail the record.
    pub fn from_record(record: TaskRecord) -> Result<Self> {
        let priority = record.priority.parse::<Priority>().unwrap_or_default();
        let deadline = match record.deadline {
            Some(text) => Some(parse_timestamp(&text, "deadline")?),
            None => None,
        };
        let created_at = parse_timestamp(&record.created_at, "created_at")?;
        let updated_at = parse_timestamp(&record.updated_at, "updated_at")?;

        let mut tags: Vec<String> = Vec::new();
        for raw in &record.tags {
            if let Some(tag) = normalize_tag(raw) {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }

        Ok(Task {
            id: record.id,
            title: record.title,
            description: record.description,
            status: record.status,
            priority,
            deadline,
            tags,
            created_at,
            updated_at,
        })
    }

    fn touch(&mut self) {
        self.updated_at = utc_now();
    }
}

// =============================================================================
// Task record (persisted form)
// =============================================================================

/// Stored shape of a task inside the document's `tasks` array.
///
/// `status` is strict (an unknown value fails the record) while `priority`
/// stays a plain string so older or hand-edited files degrade to medium
/// instead of failing. `tags` and `deadline` are optional for the same
/// reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: Status,
    #[serde(default = "default_record_priority")]
    pub priority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn default_record_priority() -> String {
    Priority::default().as_str().to_string()
}

// =============================================================================
// Parsing and formatting helpers
// =============================================================================

/// Normalize one tag: trim, strip a leading `#`, lowercase.
///
/// Returns `None` when nothing is left. Used identically when setting tags
/// and when filtering by tag, so "Work", "#work", and "WORK " all name the
/// same tag.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed).trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Parse a user-entered deadline: `DD.MM.YYYY HH:MM`, or `DD.MM.YYYY` with
/// the time defaulting to 23:59. Interpreted as UTC.
pub fn parse_deadline(text: &str) -> Result<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, DEADLINE_FORMAT) {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DEADLINE_DATE_FORMAT) {
        if let Some(naive) = date.and_hms_opt(23, 59, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(Error::Parse {
        field: "deadline",
        value: text.to_string(),
        expected: "DD.MM.YYYY HH:MM or DD.MM.YYYY",
    })
}

/// Parse a stored timestamp: RFC 3339 (trailing `Z` or explicit offset),
/// falling back to offset-less text read as UTC.
pub fn parse_timestamp(text: &str, field: &'static str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, NAIVE_TIME_FORMAT) {
        return Ok(naive.and_utc());
    }
    Err(Error::Parse {
        field,
        value: text.to_string(),
        expected: "ISO-8601 timestamp",
    })
}

/// Stored timestamp form: RFC 3339, microseconds, `Z` suffix
pub fn format_record_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Human-readable timestamp form used by `render` and the list views
pub fn format_display_time(time: DateTime<Utc>) -> String {
    time.format(DISPLAY_TIME_FORMAT).to_string()
}
