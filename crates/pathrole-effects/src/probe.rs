// Resource probes
//
// Existence queries used by the validator. The real filesystem is the default;
// the in-memory probe lets tests describe filesystem state without touching disk.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Read-only existence queries against some store of resources.
///
/// Implementations must not modify anything. A query that cannot be answered
/// returns `Err`, never a guess.
pub trait ResourceProbe: Send + Sync + fmt::Debug {
    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Whether a directory exists at `path`
    fn is_dir(&self, path: &Path) -> io::Result<bool>;
}

/// Probe backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl FsProbe {
    pub fn new() -> Self {
        Self
    }
}

// A path under a regular file cannot exist; that is an answer, not a failure.
fn absent_on_not_found(err: io::Error) -> io::Result<bool> {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Ok(false),
        _ => Err(err),
    }
}

impl ResourceProbe for FsProbe {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists().or_else(absent_on_not_found)
    }

    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        match std::fs::metadata(path) {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(err) => absent_on_not_found(err),
        }
    }
}

/// In-memory probe for tests and dry runs
#[derive(Debug, Default)]
pub struct InMemoryProbe {
    files: RwLock<HashSet<PathBuf>>,
    dirs: RwLock<HashSet<PathBuf>>,
    unreachable: RwLock<HashMap<PathBuf, io::ErrorKind>>,
}

// Every mutation is a single insert or remove, so a poisoned set is still consistent.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryProbe {
    /// Create an empty probe; nothing exists
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; its ancestors become directories
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        self.add_file(path);
        self
    }

    /// Add a directory and its ancestors
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.add_dir(path);
        self
    }

    /// Make every query on `path` fail with `kind`
    pub fn with_unreachable(self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        write_lock(&self.unreachable).insert(path.into(), kind);
        self
    }

    pub fn add_file(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        write_lock(&self.files).insert(path);
    }

    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut dirs = write_lock(&self.dirs);
        for ancestor in path.ancestors().filter(|a| !a.as_os_str().is_empty()) {
            dirs.insert(ancestor.to_path_buf());
        }
    }

    /// Remove a file or directory entry
    pub fn remove(&self, path: &Path) {
        write_lock(&self.files).remove(path);
        write_lock(&self.dirs).remove(path);
    }

    fn check_reachable(&self, path: &Path) -> io::Result<()> {
        let unreachable = read_lock(&self.unreachable);
        match unreachable.get(path) {
            Some(kind) => Err(io::Error::new(*kind, format!("{} is unreachable", path.display()))),
            None => Ok(()),
        }
    }
}

impl ResourceProbe for InMemoryProbe {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        self.check_reachable(path)?;
        let files = read_lock(&self.files);
        if files.contains(path) {
            return Ok(true);
        }
        drop(files);
        self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        self.check_reachable(path)?;
        let dirs = read_lock(&self.dirs);
        Ok(dirs.contains(path))
    }
}
