use crate::config::{CropOptions, ImageOptions, SiteLayout};
use crate::copy::{copy_site_statics, CopyReport};
use crate::error::Result;
use crate::pipeline::{run_images, PipelineReport};
use crate::thumbnail::{crop_gallery, CropReport};
use std::path::Path;
use std::time::Instant;

/// Per-step results of a full site asset build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub crop: CropReport,
    pub images: PipelineReport,
    pub statics: CopyReport,
}

impl BuildReport {
    pub fn failure_count(&self) -> usize {
        self.crop.failures.len() + self.images.failures.len() + self.statics.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Runs the asset steps of a site build in order: gallery thumbnails, image
/// derivatives, then the copy-as-is files.
///
/// Thumbnails land in the source tree, so they are picked up by the image
/// step of the same run.
pub fn run_build(root: &Path, images: &ImageOptions, crop: &CropOptions) -> Result<BuildReport> {
    let start_time = Instant::now();
    let layout = SiteLayout::from_root(root);
    crate::info!("🚀 Building site assets in {:?}", root);

    let crop = crop_gallery(&layout.gallery_full, &layout.gallery_thumb, crop)?;
    let images = run_images(&layout.image_src, &layout.image_dest, images)?;
    let statics = copy_site_statics(&layout)?;

    let report = BuildReport {
        crop,
        images,
        statics,
    };

    if report.is_complete() {
        crate::info!("✅ Site assets built in {:?}", start_time.elapsed());
    } else {
        crate::warn!(
            "Site assets built in {:?} with {} failures",
            start_time.elapsed(),
            report.failure_count()
        );
    }
    Ok(report)
}
