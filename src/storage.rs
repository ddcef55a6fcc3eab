//! Storage layer for tsk
//!
//! The whole task list persists as one JSON document, overwritten on every
//! save:
//!
//! ```text
//! {
//!   "next_id": 4,
//!   "tasks": [ { "id": 1, "title": "...", ... } ]
//! }
//! ```
//!
//! `next_id` stays strictly above every id ever assigned, so deleted ids are
//! never reused, across restarts included. A missing file is the normal
//! first-run state; an unreadable or malformed one degrades to an empty list
//! plus a warning instead of failing startup.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::export::{self, ExportFormat};
use crate::task::{Status, Task, TaskRecord};

// =============================================================================
// Sort keys
// =============================================================================

/// Criteria accepted by [`Storage::sorted`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Ascending by id
    Id,
    /// Ascending by creation time
    Created,
    /// Descending by last update (newest first; the one reversed criterion)
    Updated,
    /// Ascending lexical over the stored status name
    Status,
    /// High before medium before low
    Priority,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Id,
        SortKey::Created,
        SortKey::Updated,
        SortKey::Status,
        SortKey::Priority,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Created => "created",
            SortKey::Updated => "updated",
            SortKey::Status => "status",
            SortKey::Priority => "priority",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(SortKey::Id),
            "created" => Ok(SortKey::Created),
            "updated" => Ok(SortKey::Updated),
            "status" => Ok(SortKey::Status),
            "priority" => Ok(SortKey::Priority),
            _ => Err(Error::InvalidValue {
                kind: "sort key",
                value: s.to_string(),
                expected: SortKey::ALL.map(|k| k.as_str()).join(", "),
            }),
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Id
    }
}

// =============================================================================
// Persisted document
// =============================================================================

/// On-disk shape of the task file. Both keys are required; a document
/// missing either is treated as corrupt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    pub next_id: u64,
    pub tasks: Vec<TaskRecord>,
}

/// Result of [`Storage::load`]: the store plus an optional warning when the
/// existing file had to be discarded.
#[derive(Debug)]
pub struct LoadOutcome {
    pub storage: Storage,
    pub warning: Option<String>,
}

// =============================================================================
// Storage
// =============================================================================

/// Owning collection of tasks plus its backing file.
///
/// Tasks keep insertion order; queries hand out fresh sequences of borrows
/// (or an immutable slice), never the live backing vector.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
    tasks: Vec<Task>,
    next_id: u64,
}

impl Storage {
    /// Empty store bound to `path`, as after a first run
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Storage {
            path: path.into(),
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Load the store from `path`.
    ///
    /// Never fails: a missing file yields the empty store, and a file that
    /// cannot be read or parsed yields the empty store plus a warning
    /// describing what was discarded. `next_id` is clamped above the highest
    /// loaded id so hand-edited counters cannot cause id reuse.
    pub fn load(path: impl Into<PathBuf>) -> LoadOutcome {
        let path = path.into();

        if !path.exists() {
            debug!(path = %path.display(), "no task file yet, starting empty");
            return LoadOutcome {
                storage: Storage::empty(path),
                warning: None,
            };
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                return LoadOutcome {
                    warning: Some(format!(
                        "could not read {}: {}; starting with an empty task list",
                        path.display(),
                        err
                    )),
                    storage: Storage::empty(path),
                };
            }
        };

        let document: StoreDocument = match serde_json::from_str(&content) {
            Ok(document) => document,
            Err(err) => {
                warn!(path = %path.display(), %err, "task file is corrupt, resetting");
                return LoadOutcome {
                    warning: Some(format!(
                        "task file {} is corrupt ({}); starting with an empty task list",
                        path.display(),
                        err
                    )),
                    storage: Storage::empty(path),
                };
            }
        };

        match Storage::from_document(&path, document) {
            Ok(storage) => {
                debug!(
                    path = %path.display(),
                    tasks = storage.tasks.len(),
                    next_id = storage.next_id,
                    "loaded task file"
                );
                LoadOutcome {
                    storage,
                    warning: None,
                }
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "task file is corrupt, resetting");
                LoadOutcome {
                    warning: Some(format!(
                        "task file {} is corrupt ({}); starting with an empty task list",
                        path.display(),
                        err
                    )),
                    storage: Storage::empty(path),
                }
            }
        }
    }

    fn from_document(path: &Path, document: StoreDocument) -> Result<Self> {
        let mut tasks = Vec::with_capacity(document.tasks.len());
        let mut seen = HashSet::new();
        let mut max_id = 0u64;

        for record in document.tasks {
            let task = Task::from_record(record)?;
            if !seen.insert(task.id()) {
                return Err(Error::OperationFailed(format!(
                    "duplicate task id {}",
                    task.id()
                )));
            }
            max_id = max_id.max(task.id());
            tasks.push(task);
        }

        Ok(Storage {
            path: path.to_path_buf(),
            tasks,
            next_id: document.next_id.max(max_id + 1),
        })
    }

    /// Write the whole collection back to the backing file
    pub fn save(&self) -> Result<()> {
        let document = StoreDocument {
            next_id: self.next_id,
            tasks: self.tasks.iter().map(Task::to_record).collect(),
        };
        write_json(&self.path, &document)?;
        debug!(path = %self.path.display(), tasks = self.tasks.len(), "saved task file");
        Ok(())
    }

    /// Backing file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Id the next added task will receive
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Create a task with the next free id and append it
    pub fn add(&mut self, title: impl Into<String>, description: impl Into<String>) -> &Task {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task::new(id, title, description));
        let index = self.tasks.len() - 1;
        &self.tasks[index]
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    /// Remove a task; returns whether anything was removed. The freed id is
    /// never handed out again.
    pub fn delete(&mut self, id: u64) -> bool {
        if let Some(index) = self.tasks.iter().position(|task| task.id() == id) {
            self.tasks.remove(index);
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Queries (storage order, never the live vector)
    // =========================================================================

    /// Every task in storage order
    pub fn list_all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter_by_status(&self, status: Status) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.status() == status)
            .collect()
    }

    /// Tasks carrying `tag`, matched after the same normalization used when
    /// tags are set
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.has_tag(tag)).collect()
    }

    /// Case-insensitive substring match over title and description
    pub fn search(&self, query: &str) -> Vec<&Task> {
        let needle = query.to_lowercase();
        self.tasks
            .iter()
            .filter(|task| {
                task.title().to_lowercase().contains(&needle)
                    || task.description().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// A freshly sorted view; the stored order is untouched. Sorting is
    /// stable, so ties keep insertion order.
    pub fn sorted(&self, key: SortKey) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().collect();
        sort_tasks(&mut tasks, key);
        tasks
    }

    /// Every distinct tag across all tasks, alphabetically
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags = BTreeSet::new();
        for task in &self.tasks {
            for tag in task.tags() {
                tags.insert(tag.clone());
            }
        }
        tags.into_iter().collect()
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Render the full collection in `format` and write it to `path`
    pub fn export(&self, format: ExportFormat, path: &Path) -> Result<()> {
        let content = match format {
            ExportFormat::Csv => export::render_csv(&self.tasks),
            ExportFormat::Markdown => export::render_markdown(&self.tasks),
        };
        write_atomic(path, content.as_bytes())?;
        debug!(path = %path.display(), %format, tasks = self.tasks.len(), "exported tasks");
        Ok(())
    }
}

/// Stable in-place sort used by [`Storage::sorted`] and by callers sorting
/// an already filtered selection
pub fn sort_tasks(tasks: &mut [&Task], key: SortKey) {
    match key {
        SortKey::Id => tasks.sort_by_key(|task| task.id()),
        SortKey::Created => tasks.sort_by_key(|task| task.created_at()),
        SortKey::Updated => {
            tasks.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        }
        SortKey::Status => {
            tasks.sort_by(|a, b| a.status().as_str().cmp(b.status().as_str()));
        }
        SortKey::Priority => tasks.sort_by_key(|task| task.priority().rank()),
    }
}

// =============================================================================
// File I/O helpers (atomic writes for safety)
// =============================================================================

/// Write JSON data atomically (write to temp, then rename)
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    write_atomic(path, json.as_bytes())
}

/// Read JSON data from a file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    let data: T = serde_json::from_str(&content)?;
    Ok(data)
}

/// Write data atomically using temp file + rename.
///
/// The document is either fully replaced or left as it was; readers never
/// see a partial write.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // Create temp file in same directory (for atomic rename)
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    // Atomic rename
    fs::rename(&temp_path, path)?;

    Ok(())
}
