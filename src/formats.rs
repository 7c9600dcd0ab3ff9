//! Source classification and derivative formats.
//!
//! Sources are classified by extension only (case-insensitive); the decoder
//! sniffs the real container later.
use crate::error::{AssetError, Result};
use image::ImageFormat;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How a source image is handled by the transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Lossless re-encode, one output.
    Png,
    /// JPEG re-encode plus WebP and AVIF, three outputs.
    JpegFamily,
}

impl SourceKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "png" => Some(SourceKind::Png),
            "jpg" | "jpeg" => Some(SourceKind::JpegFamily),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Number of derivatives a source of this kind produces.
    pub fn derivative_count(&self) -> usize {
        match self {
            SourceKind::Png => 1,
            SourceKind::JpegFamily => 3,
        }
    }
}

/// Target format of a single derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    /// Keeps the source extension, encoded as JPEG.
    Original,
    Png,
    Jpeg,
    WebP,
    Avif,
}

impl TargetFormat {
    /// File extension for this format; `None` for `Original`, which reuses the source's.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            TargetFormat::Original => None,
            TargetFormat::Png => Some("png"),
            TargetFormat::Jpeg => Some("jpg"),
            TargetFormat::WebP => Some("webp"),
            TargetFormat::Avif => Some("avif"),
        }
    }

    /// The container actually written to disk.
    pub fn to_image_format(&self) -> ImageFormat {
        match self {
            TargetFormat::Original | TargetFormat::Jpeg => ImageFormat::Jpeg,
            TargetFormat::Png => ImageFormat::Png,
            TargetFormat::WebP => ImageFormat::WebP,
            TargetFormat::Avif => ImageFormat::Avif,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.to_image_format().to_mime_type()
    }

    /// Formats that can carry an alpha channel through the pipeline.
    pub fn supports_alpha(&self) -> bool {
        matches!(self, TargetFormat::Png)
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetFormat::Original => "original",
            TargetFormat::Png => "PNG",
            TargetFormat::Jpeg => "JPEG",
            TargetFormat::WebP => "WebP",
            TargetFormat::Avif => "AVIF",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TargetFormat {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "original" => Ok(TargetFormat::Original),
            "jpeg" | "jpg" => Ok(TargetFormat::Jpeg),
            "png" => Ok(TargetFormat::Png),
            "webp" => Ok(TargetFormat::WebP),
            "avif" => Ok(TargetFormat::Avif),
            "heic" | "heif" | "jxl" | "jpegxl" => Err(AssetError::UnsupportedFormat(format!(
                "{} output is not supported. Use AVIF for modern compression",
                s
            ))),
            _ => Err(AssetError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_source_kind_is_case_insensitive() {
        assert_eq!(SourceKind::from_extension("PNG"), Some(SourceKind::Png));
        assert_eq!(SourceKind::from_extension("png"), Some(SourceKind::Png));
        assert_eq!(SourceKind::from_extension("JPG"), Some(SourceKind::JpegFamily));
        assert_eq!(SourceKind::from_extension("jpeg"), Some(SourceKind::JpegFamily));
        assert_eq!(SourceKind::from_extension("gif"), None);
    }

    #[test]
    fn test_source_kind_from_path() {
        assert_eq!(
            SourceKind::from_path(Path::new("src/img/photos/cat.jpg")),
            Some(SourceKind::JpegFamily)
        );
        assert_eq!(SourceKind::from_path(Path::new("logo.Png")), Some(SourceKind::Png));
        assert_eq!(SourceKind::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_derivative_counts() {
        assert_eq!(SourceKind::Png.derivative_count(), 1);
        assert_eq!(SourceKind::JpegFamily.derivative_count(), 3);
    }

    #[test]
    fn test_target_format_from_str() {
        assert_eq!(TargetFormat::from_str("webp").unwrap(), TargetFormat::WebP);
        assert_eq!(TargetFormat::from_str("AVIF").unwrap(), TargetFormat::Avif);
        assert_eq!(TargetFormat::from_str("jpg").unwrap(), TargetFormat::Jpeg);
        assert!(TargetFormat::from_str("bmp").is_err());

        if let Err(AssetError::UnsupportedFormat(msg)) = TargetFormat::from_str("heic") {
            assert!(msg.contains("AVIF"));
        } else {
            panic!("heic should be rejected");
        }
    }

    #[test]
    fn test_original_writes_jpeg() {
        assert_eq!(TargetFormat::Original.extension(), None);
        assert_eq!(TargetFormat::Original.to_image_format(), ImageFormat::Jpeg);
        assert_eq!(TargetFormat::Avif.mime_type(), "image/avif");
        assert!(TargetFormat::Png.supports_alpha());
        assert!(!TargetFormat::WebP.supports_alpha());
    }
}
