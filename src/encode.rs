use crate::constants::{AVIF_SPEED, DEFAULT_AVIF_QUALITY, DEFAULT_QUALITY, LIBDEFLATER_MAX_LEVEL, OXIPNG_MAX_PRESET};
use crate::error::{AssetError, Result};
use crate::formats::TargetFormat;
use crate::plan::OutputSpec;
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader};
use oxipng::{Deflaters, Options};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Decodes a source image from bytes already read from disk.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    Ok(img)
}

/// JPEG has no alpha; the alpha channel, if any, is dropped.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
    Ok(buf)
}

/// Lossy WebP through libwebp. Like the JPEG derivative, alpha is dropped.
pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let encoder = webp::Encoder::from_image(&rgb)
        .map_err(|e| AssetError::WebPEncoding(e.to_string()))?;
    Ok(encoder.encode(f32::from(quality)).to_vec())
}

pub fn encode_avif(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = AvifEncoder::new_with_speed_quality(&mut buf, AVIF_SPEED, quality);
    DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
    Ok(buf)
}

/// Lossless PNG recompression at the highest oxipng preset.
///
/// Works on the original file bytes, so pixel data and alpha come through
/// untouched. `force` keeps the output even when it is not smaller.
pub fn optimize_png(source_bytes: &[u8]) -> Result<Vec<u8>> {
    let mut options = Options::from_preset(OXIPNG_MAX_PRESET);
    options.force = true;
    options.optimize_alpha = false;
    options.deflate = Deflaters::Libdeflater {
        compression: LIBDEFLATER_MAX_LEVEL,
    };

    oxipng::optimize_from_memory(source_bytes, &options)
        .map_err(|e| AssetError::PngOptimization(e.to_string()))
}

fn encode_lossy(img: &DynamicImage, format: TargetFormat, quality: Option<u8>) -> Result<Vec<u8>> {
    match format {
        TargetFormat::WebP => encode_webp(img, quality.unwrap_or(DEFAULT_QUALITY)),
        TargetFormat::Avif => encode_avif(img, quality.unwrap_or(DEFAULT_AVIF_QUALITY)),
        _ => encode_jpeg(img, quality.unwrap_or(DEFAULT_QUALITY)),
    }
}

/// Produces the bytes for one derivative.
///
/// Every derivative is built from the source itself, never from another
/// derivative. PNG works on the raw bytes; the lossy formats use `decoded`,
/// falling back to decoding `source_bytes` when it is not supplied.
pub fn encode_derivative(
    source_bytes: &[u8],
    decoded: Option<&DynamicImage>,
    spec: &OutputSpec,
) -> Result<Vec<u8>> {
    let quality = spec.options.quality;
    let encoded = match spec.format {
        TargetFormat::Png => optimize_png(source_bytes),
        lossy => match decoded {
            Some(img) => encode_lossy(img, lossy, quality),
            None => decode_image(source_bytes).and_then(|img| encode_lossy(&img, lossy, quality)),
        },
    };

    encoded.map_err(|e| AssetError::Encode {
        path: spec.path(),
        format: spec.format.to_string(),
        message: e.to_string(),
    })
}

/// Writes `bytes` to `path` through a temp file in the same directory.
///
/// The final path either keeps its previous content or receives the complete
/// new file; readers never observe a partial write.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<u64> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }

    tmp.persist(path).map_err(|e| AssetError::Io(e.error))?;
    Ok(bytes.len() as u64)
}

/// Encodes and writes one derivative, returning the bytes written.
pub fn write_derivative(
    source_bytes: &[u8],
    decoded: Option<&DynamicImage>,
    spec: &OutputSpec,
) -> Result<u64> {
    let bytes = encode_derivative(source_bytes, decoded, spec)?;
    write_atomic(&spec.path(), &bytes)
}
