use crate::error::{CloudFilterError, Result};
use flate2::read::GzDecoder;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Component, Path, PathBuf};
use tar::Archive;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Result of extracting (or, in dry-run mode, inspecting) one scene archive.
#[derive(Debug, Clone)]
pub struct ExtractedArchive {
    pub archive_path: PathBuf,
    pub entries: Vec<PathBuf>,
    pub archive_removed: bool,
}

/// Extracts scene archives into the data directory.
///
/// Every entry is validated before the first byte is written: entry paths
/// must be relative and free of `..`, and link targets must resolve inside
/// the target directory without passing through a symlink the archive
/// itself creates. Plain and gzip-compressed tar files are accepted.
pub struct ArchiveExtractor {
    dry_run: bool,
}

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self { dry_run: false }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn extract_scene_archive(&self, archive_path: &Path, target_dir: &Path) -> Result<ExtractedArchive> {
        if !archive_path.is_file() {
            return Err(CloudFilterError::MissingArchive {
                path: archive_path.display().to_string(),
            });
        }

        let entries = self.list_entries(archive_path)?;

        if self.dry_run {
            return Ok(ExtractedArchive {
                archive_path: archive_path.to_path_buf(),
                entries,
                archive_removed: false,
            });
        }

        self.unpack(archive_path, target_dir)?;
        fs::remove_file(archive_path)?;

        Ok(ExtractedArchive {
            archive_path: archive_path.to_path_buf(),
            entries,
            archive_removed: true,
        })
    }

    /// Validated entry paths of an archive, relative to the extraction root.
    pub fn list_entries(&self, archive_path: &Path) -> Result<Vec<PathBuf>> {
        let mut archive = open_archive(archive_path)?;
        let mut entries = Vec::new();
        let mut symlinks = HashSet::new();

        for entry in archive.entries()? {
            let entry = entry?;
            let entry_path = entry.path()?.into_owned();

            let relative = contained_path(&entry_path)
                .filter(|relative| !passes_through_symlink(relative, &symlinks))
                .ok_or_else(|| traversal_error(archive_path, &entry_path))?;

            if let Some(link) = entry.link_name()? {
                let kind = entry.header().entry_type();
                // Symlink targets are relative to the link, hard link targets to the root
                let base = if kind.is_symlink() {
                    relative.parent().map(Path::to_path_buf).unwrap_or_default()
                } else {
                    PathBuf::new()
                };

                if resolve_link(&base, &link, &symlinks).is_none() {
                    return Err(traversal_error(
                        archive_path,
                        Path::new(&format!("{} -> {}", entry_path.display(), link.display())),
                    ));
                }

                if kind.is_symlink() {
                    symlinks.insert(relative.clone());
                }
            }

            if !relative.as_os_str().is_empty() {
                entries.push(relative);
            }
        }

        Ok(entries)
    }

    fn unpack(&self, archive_path: &Path, target_dir: &Path) -> Result<()> {
        let mut archive = open_archive(archive_path)?;
        archive.set_preserve_mtime(true);

        for entry in archive.entries()? {
            let mut entry = entry?;
            let entry_path = entry.path()?.into_owned();

            if !entry.unpack_in(target_dir)? {
                return Err(traversal_error(archive_path, &entry_path));
            }
        }

        Ok(())
    }
}

impl Default for ArchiveExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn open_archive(path: &Path) -> Result<Archive<Box<dyn Read>>> {
    let mut reader = BufReader::new(File::open(path)?);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    let reader: Box<dyn Read> = if is_gzip {
        Box::new(GzDecoder::new(reader))
    } else {
        Box::new(reader)
    };

    Ok(Archive::new(reader))
}

fn traversal_error(archive_path: &Path, entry: &Path) -> CloudFilterError {
    CloudFilterError::PathTraversal {
        archive: archive_path.display().to_string(),
        entry: entry.display().to_string(),
    }
}

/// Entry path with `.` components dropped, or `None` when it is absolute or
/// walks up with `..`.
fn contained_path(path: &Path) -> Option<PathBuf> {
    let mut relative = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(relative)
}

/// True when a proper ancestor of `relative` is one of `symlinks`.
fn passes_through_symlink(relative: &Path, symlinks: &HashSet<PathBuf>) -> bool {
    relative
        .ancestors()
        .skip(1)
        .any(|ancestor| symlinks.contains(ancestor))
}

/// Lexically resolves `target` against `base`, failing once it leaves the root
/// or walks on through one of `symlinks`, whose real target is unknown here.
fn resolve_link(base: &Path, target: &Path, symlinks: &HashSet<PathBuf>) -> Option<PathBuf> {
    let mut parts: Vec<_> = base.components().collect();

    for component in target.components() {
        if !parts.is_empty() && symlinks.contains(&parts.iter().collect::<PathBuf>()) {
            return None;
        }

        match component {
            Component::Normal(_) => parts.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(parts.iter().collect())
}
