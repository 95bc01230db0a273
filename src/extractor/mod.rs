pub mod archive_extractor;
pub mod filter_report;
pub mod scene_cleaner;

pub use archive_extractor::{ArchiveExtractor, ExtractedArchive};
pub use filter_report::{FilterReport, SceneAction, SceneOutcome};
pub use scene_cleaner::SceneCleaner;
