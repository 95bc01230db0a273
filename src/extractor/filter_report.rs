use crate::cli::Operation;
use crate::window::CoverageWindow;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneAction {
    /// Listed on the standard output
    Reported,
    /// Archive unpacked into the data directory
    Extracted,
    /// Every stem-matching file removed
    Deleted,
    /// Left untouched
    Kept,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneOutcome {
    pub stem: String,
    pub cloud_coverage: i64,
    pub matched: bool,
    pub action: SceneAction,
    /// Files removed or extracted for this scene
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterReport {
    pub data_dir: PathBuf,
    pub operation: Operation,
    pub window: CoverageWindow,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub scenes: Vec<SceneOutcome>,
    #[serde(skip)]
    start_time: Instant,
}

impl FilterReport {
    pub fn new(data_dir: PathBuf, operation: Operation, window: CoverageWindow, dry_run: bool) -> Self {
        Self {
            data_dir,
            operation,
            window,
            dry_run,
            started_at: Utc::now(),
            duration: Duration::ZERO,
            scenes: Vec::new(),
            start_time: Instant::now(),
        }
    }

    pub fn record(&mut self, outcome: SceneOutcome) {
        self.scenes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.duration = self.start_time.elapsed();
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn matched_stems(&self) -> Vec<&str> {
        self.scenes
            .iter()
            .filter(|s| s.matched)
            .map(|s| s.stem.as_str())
            .collect()
    }

    pub fn count_action(&self, action: SceneAction) -> usize {
        self.scenes.iter().filter(|s| s.action == action).count()
    }

    pub fn removed_paths(&self) -> Vec<&PathBuf> {
        self.scenes
            .iter()
            .filter(|s| s.action == SceneAction::Deleted)
            .flat_map(|s| s.paths.iter())
            .collect()
    }

    pub fn total_scenes(&self) -> usize {
        self.scenes.len()
    }
}
