pub mod file_filter;
pub mod scene_scanner;

pub use file_filter::HeaderFilter;
pub use scene_scanner::{Scene, SceneFiles, SceneScanner};
