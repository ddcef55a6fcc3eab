use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    /// A `tsk` invocation pinned to this store's task file, with the temp
    /// dir as working directory so relative output paths land there too.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tsk").expect("binary");
        cmd.current_dir(self.dir.path());
        cmd.arg("--file").arg(self.file());
        cmd
    }

    pub fn write_store(&self, contents: &str) -> std::io::Result<()> {
        fs::write(self.file(), contents)
    }

    pub fn read_store(&self) -> Value {
        let contents = fs::read_to_string(self.file()).expect("read task file");
        serde_json::from_str(&contents).expect("parse task file")
    }
}

pub fn parse_stdout(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("parse json output")
}
