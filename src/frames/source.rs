use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// Byte provider for frame resources.
///
/// Implementations are called concurrently from the decode pool.
pub trait FrameSource: Send + Sync {
    /// Fetch the encoded bytes for the resource at `path`.
    fn load(&self, path: &str) -> ReelResult<Vec<u8>>;
}

/// Reads frame resources relative to a filesystem root.
#[derive(Clone, Debug)]
pub struct FsFrameSource {
    root: PathBuf,
}

impl FsFrameSource {
    /// Resolve resource paths under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory used when resolving relative resource paths.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FrameSource for FsFrameSource {
    fn load(&self, path: &str) -> ReelResult<Vec<u8>> {
        let norm = normalize_rel_path(path)?;
        let abs = self.root.join(Path::new(&norm));
        std::fs::read(&abs)
            .with_context(|| format!("read frame bytes from '{}'", abs.display()))
            .map_err(ReelError::from)
    }
}

/// In-memory frame resources keyed by normalized path.
#[derive(Clone, Debug, Default)]
pub struct MemoryFrameSource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryFrameSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `path`; later inserts for the same path win.
    pub fn insert(&mut self, path: &str, bytes: Vec<u8>) -> ReelResult<()> {
        self.entries.insert(normalize_rel_path(path)?, bytes);
        Ok(())
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FrameSource for MemoryFrameSource {
    fn load(&self, path: &str) -> ReelResult<Vec<u8>> {
        let norm = normalize_rel_path(path)?;
        self.entries
            .get(&norm)
            .cloned()
            .ok_or_else(|| ReelError::load(format!("no in-memory frame at '{norm}'")))
    }
}

/// Normalize and validate resource paths relative to a source root.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ReelError::validation("frame paths must be relative"));
    }
    if s.is_empty() {
        return Err(ReelError::validation("frame path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::validation("frame paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::validation(
            "frame path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/frames/source.rs"]
mod tests;
