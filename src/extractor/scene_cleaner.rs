use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Removes the files of scenes that fall outside the coverage window.
pub struct SceneCleaner {
    dry_run: bool,
}

impl SceneCleaner {
    pub fn new() -> Self {
        Self { dry_run: false }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Removes every path in `members`, directories recursively. Symlinks are
    /// removed, never followed. Returns the paths that were (or in dry-run
    /// mode would be) removed.
    pub fn remove_scene_files(&self, members: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::with_capacity(members.len());

        for path in members {
            if !self.dry_run {
                remove_path(path)?;
            }
            removed.push(path.clone());
        }

        Ok(removed)
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Default for SceneCleaner {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_path(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path)?;

    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }

    Ok(())
}
