use crate::constants::{DEFAULT_IMAGE_PATTERNS, GALLERY_EXTENSIONS};
use crate::error::{AssetError, Result};
use crate::formats::SourceKind;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// An input image found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAsset {
    pub path: PathBuf,
    /// File name without extension.
    pub base_name: String,
    /// Extension as found on disk, without the dot.
    pub extension: String,
    /// Parent directory relative to the source root (empty for top-level files).
    pub relative_dir: PathBuf,
}

impl SourceAsset {
    pub fn from_path(root: &Path, path: &Path) -> Result<Self> {
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| AssetError::UnsupportedFormat(format!("Invalid file name: {:?}", path)))?;
        let extension = path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        let relative_dir = parent
            .strip_prefix(root)
            .map_err(|_| AssetError::OutsideSourceRoot {
                path: path.to_path_buf(),
                root: root.to_path_buf(),
            })?
            .to_path_buf();

        Ok(Self {
            path: path.to_path_buf(),
            base_name,
            extension,
            relative_dir,
        })
    }

    pub fn kind(&self) -> Option<SourceKind> {
        SourceKind::from_extension(&self.extension)
    }

    /// Original file name, e.g. `cat.JPG`.
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.base_name.clone()
        } else {
            format!("{}.{}", self.base_name, self.extension)
        }
    }
}

pub fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p.as_ref()).map_err(AssetError::from))
        .collect()
}

pub fn default_patterns() -> Vec<Pattern> {
    DEFAULT_IMAGE_PATTERNS
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect()
}

pub fn matches_any(path: &Path, patterns: &[Pattern]) -> bool {
    path.file_name()
        .map(|name| {
            let name = name.to_string_lossy();
            patterns
                .iter()
                .any(|p| p.matches_with(&name, MATCH_OPTIONS))
        })
        .unwrap_or(false)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Recursively collects every file under `root` whose name matches one of `patterns`.
///
/// Returns `MissingSourceRoot` when `root` is not a directory. Unreadable
/// entries below the root are skipped with a warning.
pub fn discover(root: &Path, patterns: &[Pattern]) -> Result<Vec<SourceAsset>> {
    if !root.is_dir() {
        return Err(AssetError::MissingSourceRoot(root.to_path_buf()));
    }

    let mut assets = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_entry(|e| !is_hidden(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                crate::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_file() && matches_any(entry.path(), patterns) {
            assets.push(SourceAsset::from_path(root, entry.path())?);
        }
    }

    assets.sort_by(|a, b| a.path.cmp(&b.path));
    crate::verbose!("Discovered {} images under {:?}", assets.len(), root);
    Ok(assets)
}

/// Lists gallery JPEGs sitting directly inside `full_dir`.
///
/// A missing directory is not an error: sites without a gallery simply have nothing to crop.
pub fn discover_gallery(full_dir: &Path) -> Result<Vec<PathBuf>> {
    if !full_dir.is_dir() {
        crate::verbose!("No gallery at {:?}, nothing to crop", full_dir);
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(full_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() && is_gallery_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

pub fn is_gallery_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            GALLERY_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
