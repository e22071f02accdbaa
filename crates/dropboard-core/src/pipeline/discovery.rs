//! File discovery: turns paths named by the user into file handles.
//!
//! Plays the part of a file picker. It does no media type filtering of its
//! own; that is left to [`crate::AcceptFilter`] so rejected files are
//! reported like any other drop.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::source::FileHandle;

/// Collects file handles from files and directories.
#[derive(Debug, Clone, Default)]
pub struct FileDiscovery {
    include_hidden: bool,
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also pick up dotfiles and files inside dot-directories.
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Discover files at each path, in the order the paths are given.
    ///
    /// A file path yields itself. A directory yields every regular file below
    /// it, sorted by path for deterministic submission order. Paths that do
    /// not exist are logged and skipped.
    pub fn discover(&self, paths: &[PathBuf]) -> Vec<FileHandle> {
        let mut handles = Vec::new();
        for path in paths {
            if path.is_file() {
                handles.push(FileHandle::from_path(path));
            } else if path.is_dir() {
                handles.extend(self.walk(path).into_iter().map(FileHandle::from_path));
            } else {
                tracing::warn!("Skipping {:?}: no such file or directory", path);
            }
        }
        handles
    }

    fn walk(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| self.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();

        files.sort();
        files
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}
