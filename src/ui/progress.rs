use crate::ui::output::format_duration;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn create_scene_progress(&self, total_scenes: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total_scenes);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>5}/{len:5} scenes {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message("Reading headers...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn update_scene_progress(pb: &ProgressBar, stem: &str, position: u64) {
    pb.set_position(position);
    pb.set_message(format!("Processing {}", stem));
}

/// Runs `f` with the bar cleared so printed lines do not tear it.
pub fn suspend<F, R>(pb: &ProgressBar, f: F) -> R
where
    F: FnOnce() -> R,
{
    if pb.is_hidden() {
        f()
    } else {
        pb.suspend(f)
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_manager_hides_bars() {
        let manager = ProgressManager::new(false);

        let pb = manager.create_scene_progress(10);
        assert!(pb.is_hidden());
    }

    #[test]
    fn test_update_and_finish() {
        let pb = ProgressBar::hidden();
        pb.set_length(3);

        update_scene_progress(&pb, "SCENE_A.", 2);
        assert_eq!(pb.position(), 2);
        assert_eq!(pb.message(), "Processing SCENE_A.");

        finish_progress_with_summary(&pb, "Processed 3 scenes", Duration::from_secs(2));
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "Processed 3 scenes (completed in 2s)");
    }

    #[test]
    fn test_suspend_returns_value() {
        let pb = ProgressBar::hidden();
        assert_eq!(suspend(&pb, || 42), 42);
    }
}
