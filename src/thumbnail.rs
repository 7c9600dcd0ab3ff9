use crate::config::CropOptions;
use crate::discovery::discover_gallery;
use crate::encode::{decode_image, encode_jpeg, write_atomic};
use crate::error::Result;
use crate::transform::{ensure_dir, TransformFailure};
use image::imageops::FilterType;
use image::DynamicImage;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct CropReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<TransformFailure>,
}

impl CropReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Scales `img` to cover `width`x`height`, then trims the overflow evenly from
/// both sides so the result is exactly that size.
pub fn center_crop(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    img.resize_to_fill(width, height, FilterType::Lanczos3)
}

pub fn crop_file(input: &Path, output: &Path, options: &CropOptions) -> Result<u64> {
    let bytes = fs::read(input)?;
    let img = decode_image(&bytes)?;
    let thumb = center_crop(&img, options.width, options.height);
    let encoded = encode_jpeg(&thumb, options.quality)?;
    write_atomic(output, &encoded)
}

/// Writes a center-cropped thumbnail into `thumb_dir` for every JPEG directly
/// inside `full_dir`, keeping file names.
///
/// A missing `full_dir` is a successful no-op; an existing one always gets a
/// `thumb_dir`, even when it holds no JPEGs. Files are cropped in parallel;
/// a failing file is logged and reported without stopping the others.
pub fn crop_gallery(full_dir: &Path, thumb_dir: &Path, options: &CropOptions) -> Result<CropReport> {
    if !full_dir.is_dir() {
        crate::verbose!("No gallery at {:?}, nothing to crop", full_dir);
        return Ok(CropReport::default());
    }

    ensure_dir(thumb_dir)?;
    let images = discover_gallery(full_dir)?;
    if images.is_empty() {
        return Ok(CropReport::default());
    }

    crate::info!(
        "✂️  Cropping {} gallery images to {}x{}",
        images.len(),
        options.width,
        options.height
    );

    let results: Vec<(PathBuf, PathBuf, Result<u64>)> = images
        .par_iter()
        .filter_map(|input| {
            let name = input.file_name()?;
            let output = thumb_dir.join(name);
            let result = crop_file(input, &output, options);
            Some((input.clone(), output, result))
        })
        .collect();

    let mut report = CropReport::default();
    for (input, output, result) in results {
        match result {
            Ok(_) => {
                crate::verbose!("Cropped {:?} -> {:?}", input, output);
                report.written.push(output);
            }
            Err(e) => {
                crate::error!("Failed to crop {:?}: {}", input, e);
                report
                    .failures
                    .push(TransformFailure::for_output(&input, output, e));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn test_center_crop_exact_dimensions() {
        let wide = DynamicImage::ImageRgb8(RgbImage::new(1000, 400));
        assert_eq!(center_crop(&wide, 250, 180).dimensions(), (250, 180));

        let tall = DynamicImage::ImageRgb8(RgbImage::new(300, 900));
        assert_eq!(center_crop(&tall, 250, 180).dimensions(), (250, 180));

        let small = DynamicImage::ImageRgb8(RgbImage::new(50, 20));
        assert_eq!(center_crop(&small, 250, 180).dimensions(), (250, 180));
    }

    #[test]
    fn test_center_crop_keeps_the_middle() {
        // Left and right thirds red, middle third green: a square crop of the
        // middle must be green throughout.
        let img = RgbImage::from_fn(300, 100, |x, _| {
            if (100..200).contains(&x) {
                Rgb([0, 255, 0])
            } else {
                Rgb([255, 0, 0])
            }
        });
        let cropped = center_crop(&DynamicImage::ImageRgb8(img), 100, 100).to_rgb8();
        let center = cropped.get_pixel(50, 50);
        assert!(center[1] > 200 && center[0] < 50, "center pixel was {:?}", center);
    }

    #[test]
    fn test_crop_gallery_missing_full_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let full = temp_dir.path().join("gallery/full");
        let thumb = temp_dir.path().join("gallery/thumb");

        let report = crop_gallery(&full, &thumb, &CropOptions::default()).unwrap();
        assert!(report.written.is_empty());
        assert!(report.is_complete());
        assert!(!thumb.exists());
    }

    #[test]
    fn test_crop_gallery_empty_full_still_creates_thumb_dir() {
        let temp_dir = TempDir::new().unwrap();
        let full = temp_dir.path().join("gallery/full");
        let thumb = temp_dir.path().join("gallery/thumb");
        fs::create_dir_all(&full).unwrap();
        fs::write(full.join("readme.txt"), b"no photos yet").unwrap();

        let report = crop_gallery(&full, &thumb, &CropOptions::default()).unwrap();
        assert!(report.written.is_empty());
        assert!(report.is_complete());
        assert!(thumb.is_dir());
    }

    #[test]
    fn test_crop_gallery_writes_thumbs() {
        let temp_dir = TempDir::new().unwrap();
        let full = temp_dir.path().join("gallery/full");
        let thumb = temp_dir.path().join("gallery/thumb");
        fs::create_dir_all(&full).unwrap();
        RgbImage::from_pixel(640, 480, Rgb([10, 20, 30]))
            .save(full.join("dog.jpg"))
            .unwrap();
        RgbImage::from_pixel(200, 600, Rgb([30, 20, 10]))
            .save(full.join("cat.JPG"))
            .unwrap();
        fs::write(full.join("notes.txt"), b"ignored").unwrap();

        let report = crop_gallery(&full, &thumb, &CropOptions::default()).unwrap();

        assert!(report.is_complete());
        assert_eq!(report.written.len(), 2);
        for name in ["dog.jpg", "cat.JPG"] {
            let out = image::open(thumb.join(name)).unwrap();
            assert_eq!(out.dimensions(), (250, 180));
        }
    }

    #[test]
    fn test_crop_gallery_continues_past_bad_file() {
        let temp_dir = TempDir::new().unwrap();
        let full = temp_dir.path().join("full");
        let thumb = temp_dir.path().join("thumb");
        fs::create_dir_all(&full).unwrap();
        RgbImage::from_pixel(300, 300, Rgb([1, 1, 1]))
            .save(full.join("good.jpg"))
            .unwrap();
        fs::write(full.join("bad.jpg"), b"garbage").unwrap();

        let report = crop_gallery(&full, &thumb, &CropOptions::default()).unwrap();

        assert_eq!(report.written, vec![thumb.join("good.jpg")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, full.join("bad.jpg"));
    }
}
