use crate::config::SiteLayout;
use crate::constants::STATIC_COPY_STEPS;
use crate::error::{AssetError, Result};
use crate::transform::{ensure_dir, TransformFailure};
use glob::{glob, Pattern};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct CopyReport {
    pub copied: Vec<PathBuf>,
    pub failures: Vec<TransformFailure>,
}

impl CopyReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: CopyReport) {
        self.copied.extend(other.copied);
        self.failures.extend(other.failures);
    }
}

/// Joins a literal directory and a glob pattern, escaping any glob
/// metacharacters in the directory part.
pub fn rooted_pattern(root: &Path, pattern: &str) -> String {
    let root = Pattern::escape(&root.to_string_lossy());
    if pattern.is_empty() {
        root
    } else {
        format!("{}/{}", root.trim_end_matches('/'), pattern)
    }
}

/// Copies every file matched by `pattern` into `dest_dir` unchanged, flattening paths.
///
/// `dest_dir` is only created when something matched.
pub fn copy_matching(pattern: &str, dest_dir: &Path) -> Result<CopyReport> {
    let mut report = CopyReport::default();

    for entry in glob(pattern)? {
        let source = match entry {
            Ok(path) => path,
            Err(e) => {
                crate::warn!("Skipping unreadable match: {}", e);
                continue;
            }
        };
        if !source.is_file() {
            continue;
        }
        let Some(name) = source.file_name() else {
            continue;
        };

        let target = dest_dir.join(name);
        let result = ensure_dir(dest_dir).and_then(|_| fs::copy(&source, &target).map_err(AssetError::from));
        match result {
            Ok(_) => {
                crate::verbose!("Copied {:?} -> {:?}", source, target);
                report.copied.push(target);
            }
            Err(e) => {
                crate::error!("Failed to copy {:?}: {}", source, e);
                report
                    .failures
                    .push(TransformFailure::for_output(&source, target, e));
            }
        }
    }

    Ok(report)
}

/// Copy-as-is steps of the site build: SVG icons, language files, robots and sitemap.
pub fn copy_site_statics(layout: &SiteLayout) -> Result<CopyReport> {
    let mut report = CopyReport::default();
    for (pattern, dest) in STATIC_COPY_STEPS {
        let pattern = rooted_pattern(&layout.source_dir, pattern);
        let dest_dir = if dest.is_empty() {
            layout.build_dir.clone()
        } else {
            layout.build_dir.join(dest)
        };
        report.merge(copy_matching(&pattern, &dest_dir)?);
    }

    crate::info!("📄 Copied {} static files", report.copied.len());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rooted_pattern_escapes_root() {
        assert_eq!(rooted_pattern(Path::new("site/src"), "img/*.svg"), "site/src/img/*.svg");
        assert_eq!(rooted_pattern(Path::new("a[1]"), "*.json"), "a[[]1[]]/*.json");
    }

    #[test]
    fn test_copy_matching_copies_flat() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src/img");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("icon.svg"), b"<svg/>").unwrap();
        fs::write(src.join("logo.png"), b"png").unwrap();
        let dest = temp_dir.path().join("build/img");

        let report = copy_matching(&rooted_pattern(&src, "*.svg"), &dest).unwrap();

        assert_eq!(report.copied, vec![dest.join("icon.svg")]);
        assert_eq!(fs::read(dest.join("icon.svg")).unwrap(), b"<svg/>");
        assert!(!dest.join("logo.png").exists());
    }

    #[test]
    fn test_copy_matching_no_match_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("build/languages");
        let report = copy_matching(&rooted_pattern(temp_dir.path(), "*.json"), &dest).unwrap();
        assert!(report.copied.is_empty());
        assert!(!dest.exists());
    }

    #[test]
    fn test_copy_matching_invalid_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let result = copy_matching("[broken", temp_dir.path());
        assert!(matches!(result, Err(AssetError::Pattern(_))));
    }

    #[test]
    fn test_copy_site_statics() {
        let temp_dir = TempDir::new().unwrap();
        let layout = SiteLayout::from_root(temp_dir.path());
        fs::create_dir_all(layout.source_dir.join("languages")).unwrap();
        fs::create_dir_all(&layout.image_src).unwrap();
        fs::write(layout.source_dir.join("robots.txt"), b"User-agent: *").unwrap();
        fs::write(layout.source_dir.join("languages/es.json"), b"{}").unwrap();
        fs::write(layout.image_src.join("arrow.svg"), b"<svg/>").unwrap();

        let report = copy_site_statics(&layout).unwrap();

        assert!(report.is_complete());
        assert_eq!(report.copied.len(), 3);
        assert!(layout.build_dir.join("robots.txt").is_file());
        assert!(layout.build_dir.join("languages/es.json").is_file());
        assert!(layout.image_dest.join("arrow.svg").is_file());
        assert!(!layout.build_dir.join("sitemap.xml").exists());
    }
}
