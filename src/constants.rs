pub const DEFAULT_QUALITY: u8 = 80;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Quality the AVIF encoder uses when none is requested, the usual AVIF
/// default rather than the JPEG/WebP one.
pub const DEFAULT_AVIF_QUALITY: u8 = 50;
/// rav1e speed preset (1 = slowest/best, 10 = fastest).
pub const AVIF_SPEED: u8 = 6;

/// zlib-style level recorded for PNG outputs; oxipng is driven at its top preset.
pub const PNG_COMPRESSION_LEVEL: u8 = 9;
pub const OXIPNG_MAX_PRESET: u8 = 6;
pub const LIBDEFLATER_MAX_LEVEL: u8 = 12;

pub const THUMB_WIDTH: u32 = 250;
pub const THUMB_HEIGHT: u32 = 180;

/// Default discovery patterns, matched case-insensitively against file names.
pub const DEFAULT_IMAGE_PATTERNS: &[&str] = &["*.jpg", "*.jpeg", "*.png"];
pub const GALLERY_EXTENSIONS: &[&str] = &["jpg"];

// Conventional site layout, relative to the project root.
pub const SITE_SOURCE_DIR: &str = "src";
pub const SITE_BUILD_DIR: &str = "build";
pub const IMAGE_SUBDIR: &str = "img";
pub const GALLERY_FULL_SUBDIR: &str = "gallery/full";
pub const GALLERY_THUMB_SUBDIR: &str = "gallery/thumb";

/// Copy-as-is steps: (glob relative to the source dir, destination relative to the build dir).
pub const STATIC_COPY_STEPS: &[(&str, &str)] = &[
    ("img/*.svg", "img"),
    ("languages/*.json", "languages"),
    ("robots.txt", ""),
    ("sitemap.xml", ""),
];

/// Keep this much memory free when sizing the worker pool.
pub const MIN_AVAILABLE_MEMORY_MIB: u64 = 256;

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const INFO_PREFIX: &str = "📋";
pub const FOLDER_PREFIX: &str = "📁";
pub const STATS_PREFIX: &str = "📊";
