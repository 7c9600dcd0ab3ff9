use crate::constants::{
    DEFAULT_AVIF_QUALITY, DEFAULT_IMAGE_PATTERNS, DEFAULT_QUALITY, GALLERY_FULL_SUBDIR,
    GALLERY_THUMB_SUBDIR, IMAGE_SUBDIR, MAX_QUALITY, MIN_QUALITY, SITE_BUILD_DIR,
    SITE_SOURCE_DIR, THUMB_HEIGHT, THUMB_WIDTH,
};
use crate::error::{AssetError, Result};
use std::path::{Path, PathBuf};

fn validate_quality(quality: u8) -> Result<u8> {
    if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        return Err(AssetError::InvalidQuality(quality));
    }
    Ok(quality)
}

/// Settings for the derivative pipeline.
#[derive(Debug, Clone)]
pub struct ImageOptions {
    /// JPEG and WebP quality.
    pub quality: u8,
    pub avif_quality: u8,
    /// Worker cap; `None` means one per CPU.
    pub jobs: Option<usize>,
    /// File name globs used for discovery.
    pub patterns: Vec<String>,
}

impl ImageOptions {
    pub fn new(quality: Option<u8>, avif_quality: Option<u8>, jobs: Option<usize>) -> Result<Self> {
        let quality = validate_quality(quality.unwrap_or(DEFAULT_QUALITY))?;
        let avif_quality = validate_quality(avif_quality.unwrap_or(DEFAULT_AVIF_QUALITY))?;
        if let Some(0) = jobs {
            return Err(AssetError::InvalidJobs(0));
        }

        Ok(Self {
            quality,
            avif_quality,
            jobs,
            patterns: DEFAULT_IMAGE_PATTERNS.iter().map(|p| p.to_string()).collect(),
        })
    }

    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        if !patterns.is_empty() {
            self.patterns = patterns;
        }
        self
    }

    pub fn worker_count(&self) -> usize {
        self.jobs.unwrap_or_else(num_cpus::get).max(1)
    }
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            avif_quality: DEFAULT_AVIF_QUALITY,
            jobs: None,
            patterns: DEFAULT_IMAGE_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Settings for gallery thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropOptions {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

impl CropOptions {
    pub fn new(width: Option<u32>, height: Option<u32>, quality: Option<u8>) -> Result<Self> {
        let width = width.unwrap_or(THUMB_WIDTH);
        let height = height.unwrap_or(THUMB_HEIGHT);
        if width == 0 || height == 0 {
            return Err(AssetError::InvalidDimensions(width, height));
        }
        let quality = validate_quality(quality.unwrap_or(DEFAULT_QUALITY))?;

        Ok(Self {
            width,
            height,
            quality,
        })
    }
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            width: THUMB_WIDTH,
            height: THUMB_HEIGHT,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Conventional project layout: `src/` in, `build/` out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub image_src: PathBuf,
    pub image_dest: PathBuf,
    pub gallery_full: PathBuf,
    pub gallery_thumb: PathBuf,
}

impl SiteLayout {
    pub fn from_root(root: &Path) -> Self {
        let source_dir = root.join(SITE_SOURCE_DIR);
        let build_dir = root.join(SITE_BUILD_DIR);
        let image_src = source_dir.join(IMAGE_SUBDIR);

        Self {
            image_dest: build_dir.join(IMAGE_SUBDIR),
            gallery_full: image_src.join(GALLERY_FULL_SUBDIR),
            gallery_thumb: image_src.join(GALLERY_THUMB_SUBDIR),
            image_src,
            source_dir,
            build_dir,
        }
    }
}
