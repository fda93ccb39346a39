#![allow(dead_code)]
pub mod builders;

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use umya_spreadsheet::Spreadsheet;

/// Temp directory holding workbooks built for one test.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp workspace"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Build a workbook with the given closure and write it under the
    /// workspace root. The fresh book starts with one sheet named "Sheet1".
    pub fn create_workbook(&self, name: &str, build: impl FnOnce(&mut Spreadsheet)) -> PathBuf {
        let mut book = umya_spreadsheet::new_file();
        build(&mut book);
        let path = self.dir.path().join(name);
        umya_spreadsheet::writer::xlsx::write(&book, &path).expect("failed to write workbook");
        path
    }
}
