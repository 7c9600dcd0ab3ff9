use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("WebP encoding error: {0}")]
    WebPEncoding(String),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Invalid worker count: {0}. Must be at least 1")]
    InvalidJobs(usize),

    #[error("Invalid thumbnail dimensions: {0}x{1}. Both sides must be non-zero")]
    InvalidDimensions(u32, u32),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Source root does not exist: {0}")]
    MissingSourceRoot(PathBuf),

    #[error("{path} is not inside source root {root}")]
    OutsideSourceRoot { path: PathBuf, root: PathBuf },

    #[error("Failed to read image metadata from {path}: {source}")]
    MetadataRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode {format} derivative {path}: {message}")]
    Encode {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to create output directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{output} is already produced from {claimed_by}")]
    OutputCollision { output: PathBuf, claimed_by: PathBuf },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0} derivatives or sources failed; see the log for details")]
    IncompleteRun(usize),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),
}

impl AssetError {
    /// Errors that mean "nothing to do" rather than a failed run.
    pub fn is_missing_source(&self) -> bool {
        matches!(self, AssetError::MissingSourceRoot(_))
    }
}

pub type Result<T> = std::result::Result<T, AssetError>;
