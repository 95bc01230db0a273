use crate::config::SceneConfig;
use crate::error::{CloudFilterError, Result};
use crate::scanner::file_filter::HeaderFilter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files of one scene as found on disk, before its header is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneFiles {
    pub stem: String,
    pub header_path: PathBuf,
    pub archive_path: PathBuf,
}

impl SceneFiles {
    pub fn new(data_dir: &Path, stem: &str, header_suffix: &str, archive_suffix: &str) -> Self {
        Self {
            stem: stem.to_string(),
            header_path: data_dir.join(format!("{}{}", stem, header_suffix)),
            archive_path: data_dir.join(format!("{}{}", stem, archive_suffix)),
        }
    }

    /// `<data_dir>/<stem>*`, the shell pattern covering every file of the scene.
    pub fn wildcard_pattern(&self) -> PathBuf {
        let parent = self.header_path.parent().unwrap_or_else(|| Path::new(""));
        parent.join(format!("{}*", self.stem))
    }

    pub fn has_archive(&self) -> bool {
        self.archive_path.is_file()
    }
}

/// A scene whose header has been read.
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    #[serde(flatten)]
    pub files: SceneFiles,
    pub cloud_coverage: i64,
}

impl Scene {
    pub fn new(files: SceneFiles, cloud_coverage: i64) -> Self {
        Self {
            files,
            cloud_coverage,
        }
    }

    pub fn stem(&self) -> &str {
        &self.files.stem
    }
}

pub struct SceneScanner {
    filter: HeaderFilter,
    archive_suffix: String,
}

impl SceneScanner {
    pub fn new(config: &SceneConfig) -> Result<Self> {
        Ok(Self {
            filter: HeaderFilter::new(config)?,
            archive_suffix: config.archive_suffix.clone(),
        })
    }

    /// Lists the scenes of `root`, one per header file, in file-name order.
    ///
    /// Only the top level of `root` is scanned and any read error aborts the
    /// scan. Symlinked headers count when they point at a regular file.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<SceneFiles>> {
        let root_path = root.as_ref();
        Self::check_directory(root_path)?;

        let mut scenes = Vec::new();

        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;

            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file || !self.filter.is_header_file(entry.path()) {
                continue;
            }

            let Some(stem) = entry
                .file_name()
                .to_str()
                .and_then(|name| self.filter.stem_of(name))
            else {
                continue;
            };

            scenes.push(SceneFiles::new(
                root_path,
                stem,
                self.filter.header_suffix(),
                &self.archive_suffix,
            ));
        }

        Ok(scenes)
    }

    /// Every entry of `root` whose name starts with `stem`: header, archive,
    /// sidecars and extracted payload directories.
    ///
    /// Entries belonging to a longer stem among `scene_stems` (`S10` when
    /// `stem` is `S1`) are left out. Symlinks are listed, not followed.
    pub fn stem_members<P: AsRef<Path>>(
        &self,
        root: P,
        stem: &str,
        scene_stems: &[String],
    ) -> Result<Vec<PathBuf>> {
        let root_path = root.as_ref();
        Self::check_directory(root_path)?;

        if stem.is_empty() {
            return Err(CloudFilterError::InvalidPath {
                path: format!("empty scene stem in {}", root_path.display()),
            });
        }

        let longer_stems: Vec<&str> = scene_stems
            .iter()
            .map(String::as_str)
            .filter(|other| other.len() > stem.len() && other.starts_with(stem))
            .collect();

        let mut members = Vec::new();
        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            if entry
                .file_name()
                .to_str()
                .is_some_and(|name| {
                    name.starts_with(stem)
                        && !longer_stems.iter().any(|other| name.starts_with(other))
                })
            {
                members.push(entry.into_path());
            }
        }

        Ok(members)
    }

    pub fn get_statistics(&self, scenes: &[SceneFiles]) -> ScanStatistics {
        let missing_archives = scenes
            .iter()
            .filter(|s| !s.has_archive())
            .map(|s| s.stem.clone())
            .collect();

        ScanStatistics {
            total_scenes: scenes.len(),
            missing_archives,
        }
    }

    fn check_directory(root_path: &Path) -> Result<()> {
        if !root_path.exists() {
            return Err(CloudFilterError::InvalidPath {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(CloudFilterError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_scenes: usize,
    pub missing_archives: Vec<String>,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!("Scan Results:\n  Scenes: {}\n", self.total_scenes);

        if !self.missing_archives.is_empty() {
            summary.push_str(&format!(
                "  Without archive: {} ({})\n",
                self.missing_archives.len(),
                self.missing_archives.join(", ")
            ));
        }

        summary
    }
}
