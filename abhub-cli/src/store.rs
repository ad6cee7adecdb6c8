//! JSON file persistence for the idea backlog

use abhub_core::Backlog;
use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stores the whole backlog as one JSON array on disk.
pub struct IdeaStore {
    path: PathBuf,
}

impl IdeaStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the backlog, returning an empty one when no file exists yet.
    pub fn load(&self) -> Result<Backlog> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no data file yet, starting empty");
            return Ok(Backlog::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read ideas from {:?}", self.path))?;
        let backlog = Backlog::from_json(&content)
            .with_context(|| format!("Failed to parse ideas from {:?}", self.path))?;
        debug!(count = backlog.len(), "loaded backlog");
        Ok(backlog)
    }

    /// Write the backlog back. Goes through a sibling temp file and a rename
    /// so a failed write cannot truncate the existing data.
    pub fn save(&self, backlog: &Backlog) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }
        let content = backlog.to_json().context("Failed to serialize ideas")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).with_context(|| format!("Failed to write ideas to {:?}", tmp))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {:?}", self.path))?;
        debug!(count = backlog.len(), path = %self.path.display(), "saved backlog");
        Ok(())
    }
}
