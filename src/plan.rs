//! Planning phase: turns discovered sources into derivative targets.
//!
//! Nothing here touches the filesystem, so a plan can be printed as a dry
//! run or inspected in tests before any encoder runs.

use crate::config::ImageOptions;
use crate::constants::PNG_COMPRESSION_LEVEL;
use crate::discovery::SourceAsset;
use crate::error::{AssetError, Result};
use crate::formats::{SourceKind, TargetFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Encoder knobs for a single derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Lossy quality; `None` for lossless outputs.
    pub quality: Option<u8>,
    /// Lossless compression effort, 0-9.
    pub compression_level: Option<u8>,
    pub preserve_alpha: bool,
}

impl EncodeOptions {
    pub fn lossy(quality: u8) -> Self {
        Self {
            quality: Some(quality),
            compression_level: None,
            preserve_alpha: false,
        }
    }

    pub fn lossless_max() -> Self {
        Self {
            quality: None,
            compression_level: Some(PNG_COMPRESSION_LEVEL),
            preserve_alpha: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub dest_dir: PathBuf,
    pub file_name: String,
    pub format: TargetFormat,
    pub options: EncodeOptions,
}

impl OutputSpec {
    pub fn path(&self) -> PathBuf {
        self.dest_dir.join(&self.file_name)
    }
}

/// Every derivative generated from one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformJob {
    pub source: SourceAsset,
    pub kind: SourceKind,
    pub dest_dir: PathBuf,
    pub outputs: Vec<OutputSpec>,
}

/// `<dest_root>/<source parent relative to the source root>`
pub fn destination_dir(asset: &SourceAsset, dest_root: &Path) -> PathBuf {
    dest_root.join(&asset.relative_dir)
}

pub fn plan_job(asset: &SourceAsset, dest_root: &Path, options: &ImageOptions) -> Result<TransformJob> {
    let kind = asset
        .kind()
        .ok_or_else(|| AssetError::UnsupportedFormat(asset.file_name()))?;
    let dest_dir = destination_dir(asset, dest_root);

    let spec = |file_name: String, format: TargetFormat, options: EncodeOptions| OutputSpec {
        dest_dir: dest_dir.clone(),
        file_name,
        format,
        options,
    };

    let outputs = match kind {
        SourceKind::Png => vec![spec(
            format!("{}.png", asset.base_name),
            TargetFormat::Png,
            EncodeOptions::lossless_max(),
        )],
        SourceKind::JpegFamily => vec![
            spec(
                asset.file_name(),
                TargetFormat::Original,
                EncodeOptions::lossy(options.quality),
            ),
            spec(
                format!("{}.webp", asset.base_name),
                TargetFormat::WebP,
                EncodeOptions::lossy(options.quality),
            ),
            spec(
                format!("{}.avif", asset.base_name),
                TargetFormat::Avif,
                EncodeOptions::lossy(options.avif_quality),
            ),
        ],
    };

    Ok(TransformJob {
        source: asset.clone(),
        kind,
        dest_dir,
        outputs,
    })
}

/// Plans every asset; sources that cannot be planned are returned alongside the jobs.
///
/// Sources sharing a directory and base name (`cat.jpg` next to `cat.jpeg` or
/// `cat.JPG`) would write the same WebP and AVIF files. The first one in
/// `assets` order keeps its outputs; later ones are rejected.
pub fn plan_jobs(
    assets: &[SourceAsset],
    dest_root: &Path,
    options: &ImageOptions,
) -> (Vec<TransformJob>, Vec<(PathBuf, AssetError)>) {
    let mut jobs = Vec::with_capacity(assets.len());
    let mut rejected = Vec::new();
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

    for asset in assets {
        let job = match plan_job(asset, dest_root, options) {
            Ok(job) => job,
            Err(e) => {
                rejected.push((asset.path.clone(), e));
                continue;
            }
        };

        let collision = job
            .outputs
            .iter()
            .map(|output| output.path())
            .find_map(|path| claimed.get(&path).map(|owner| (path, owner.clone())));
        if let Some((output, claimed_by)) = collision {
            rejected.push((
                asset.path.clone(),
                AssetError::OutputCollision { output, claimed_by },
            ));
            continue;
        }

        for output in &job.outputs {
            claimed.insert(output.path(), asset.path.clone());
        }
        jobs.push(job);
    }

    (jobs, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(path: &str) -> SourceAsset {
        SourceAsset::from_path(Path::new("src/img"), Path::new(path)).unwrap()
    }

    #[test]
    fn test_plan_jpeg_produces_three_outputs() {
        let job = plan_job(
            &asset("src/img/photos/cat.jpg"),
            Path::new("build/img"),
            &ImageOptions::default(),
        )
        .unwrap();

        assert_eq!(job.kind, SourceKind::JpegFamily);
        assert_eq!(job.dest_dir, PathBuf::from("build/img/photos"));
        let paths: Vec<PathBuf> = job.outputs.iter().map(|o| o.path()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("build/img/photos/cat.jpg"),
                PathBuf::from("build/img/photos/cat.webp"),
                PathBuf::from("build/img/photos/cat.avif"),
            ]
        );
        assert_eq!(job.outputs[0].format, TargetFormat::Original);
        assert_eq!(job.outputs[0].options.quality, Some(80));
        assert_eq!(job.outputs[1].options.quality, Some(80));
        assert!(job.outputs.iter().all(|o| !o.options.preserve_alpha));
    }

    #[test]
    fn test_plan_png_produces_one_lossless_output() {
        let job = plan_job(
            &asset("src/img/logo.png"),
            Path::new("build/img"),
            &ImageOptions::default(),
        )
        .unwrap();

        assert_eq!(job.outputs.len(), 1);
        let out = &job.outputs[0];
        assert_eq!(out.path(), PathBuf::from("build/img/logo.png"));
        assert_eq!(out.format, TargetFormat::Png);
        assert_eq!(out.options, EncodeOptions::lossless_max());
        assert!(out.options.preserve_alpha);
    }

    #[test]
    fn test_plan_keeps_original_extension_case() {
        let job = plan_job(
            &asset("src/img/IMG_0001.JPG"),
            Path::new("build/img"),
            &ImageOptions::default(),
        )
        .unwrap();
        assert_eq!(job.outputs[0].file_name, "IMG_0001.JPG");
        assert_eq!(job.outputs[1].file_name, "IMG_0001.webp");
    }

    #[test]
    fn test_plan_rejects_unsupported_source() {
        let assets = vec![asset("src/img/a.jpg"), asset("src/img/anim.gif")];
        let (jobs, rejected) = plan_jobs(&assets, Path::new("build/img"), &ImageOptions::default());
        assert_eq!(jobs.len(), 1);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].0, PathBuf::from("src/img/anim.gif"));
        assert!(matches!(rejected[0].1, AssetError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_plan_rejects_sources_sharing_outputs() {
        let assets = vec![
            asset("src/img/cat.JPG"),
            asset("src/img/cat.jpeg"),
            asset("src/img/cat.jpg"),
            asset("src/img/cat.png"),
            asset("src/img/other/cat.jpg"),
        ];
        let (jobs, rejected) = plan_jobs(&assets, Path::new("build/img"), &ImageOptions::default());

        let planned: Vec<&Path> = jobs.iter().map(|j| j.source.path.as_path()).collect();
        assert_eq!(
            planned,
            vec![
                Path::new("src/img/cat.JPG"),
                Path::new("src/img/cat.png"),
                Path::new("src/img/other/cat.jpg"),
            ]
        );
        assert_eq!(rejected.len(), 2);
        for (source, error) in &rejected {
            match error {
                AssetError::OutputCollision { output, claimed_by } => {
                    assert_eq!(output, &PathBuf::from("build/img/cat.webp"));
                    assert_eq!(claimed_by, &PathBuf::from("src/img/cat.JPG"));
                }
                other => panic!("unexpected error for {:?}: {other}", source),
            }
        }
    }
}
