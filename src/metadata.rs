use crate::error::{AssetError, Result};
use crate::formats::SourceKind;
use crate::utils::format_file_size;
use image::{ColorType, ImageDecoder, ImageFormat, ImageReader};
use std::fs;
use std::path::Path;

/// Header-level facts about a source image. Reading them does not decode pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMetadata {
    pub width: u32,
    pub height: u32,
    pub color_type: ColorType,
    pub has_alpha: bool,
    pub format: Option<ImageFormat>,
}

pub fn read_source_metadata(path: &Path) -> Result<SourceMetadata> {
    let wrap = |source: image::ImageError| AssetError::MetadataRead {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| wrap(image::ImageError::IoError(e)))?;
    let format = reader.format();
    let decoder = reader.into_decoder().map_err(wrap)?;
    let (width, height) = decoder.dimensions();
    let color_type = decoder.color_type();

    Ok(SourceMetadata {
        width,
        height,
        color_type,
        has_alpha: color_type.has_alpha(),
        format,
    })
}

pub fn print_image_info(input_path: &Path) -> Result<()> {
    if !input_path.exists() {
        return Err(AssetError::FileNotFound(input_path.to_path_buf()));
    }

    let meta = read_source_metadata(input_path)?;
    let file_size = fs::metadata(input_path)?.len();

    println!("📋 Basic Information:");
    println!("  📁 File: {:?}", input_path);
    println!("  📏 Dimensions: {}x{} pixels", meta.width, meta.height);
    println!("  📦 File size: {} ({} bytes)", format_file_size(file_size), file_size);
    println!("  🎨 Color type: {:?}", meta.color_type);
    println!("  🫥 Alpha channel: {}", if meta.has_alpha { "yes" } else { "no" });
    match meta.format {
        Some(format) => println!("  🎭 Image format: {:?}", format),
        None => println!("  🎭 Image format: unknown"),
    }

    println!("\n💡 Pipeline output:");
    match SourceKind::from_path(input_path) {
        Some(SourceKind::Png) => {
            println!("  🎯 PNG: one lossless derivative, transparency kept");
        }
        Some(SourceKind::JpegFamily) => {
            println!("  🎯 JPEG: re-encoded original plus WebP and AVIF derivatives");
            if meta.has_alpha {
                println!("  ⚠️  Alpha channel will be dropped in the derivatives");
            }
        }
        None => {
            println!("  🎯 Not picked up by the image pipeline (only PNG and JPEG sources are)");
        }
    }

    Ok(())
}
