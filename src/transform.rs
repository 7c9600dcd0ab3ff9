use crate::encode::{decode_image, write_derivative};
use crate::error::{AssetError, Result};
use crate::formats::SourceKind;
use crate::metadata::read_source_metadata;
use crate::plan::{OutputSpec, TransformJob};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// One thing that went wrong while producing derivatives.
#[derive(Debug)]
pub struct TransformFailure {
    pub source: PathBuf,
    /// The derivative that was lost, or `None` when the whole source was abandoned.
    pub output: Option<PathBuf>,
    pub error: AssetError,
}

impl TransformFailure {
    pub fn for_source(source: &Path, error: AssetError) -> Self {
        Self {
            source: source.to_path_buf(),
            output: None,
            error,
        }
    }

    pub fn for_output(source: &Path, output: PathBuf, error: AssetError) -> Self {
        Self {
            source: source.to_path_buf(),
            output: Some(output),
            error,
        }
    }
}

/// Result of running one job: what got written and what did not.
#[derive(Debug, Default)]
pub struct JobOutcome {
    pub source_size: u64,
    pub written: Vec<(PathBuf, u64)>,
    pub failures: Vec<TransformFailure>,
}

impl JobOutcome {
    fn abandoned(failure: TransformFailure) -> Self {
        Self {
            failures: vec![failure],
            ..Self::default()
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.written.iter().map(|(_, size)| size).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Creates `dir` and any missing parents. An existing directory, including one
/// created concurrently by a sibling job, counts as success.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| AssetError::DirectoryCreationFailed {
        path: dir.to_path_buf(),
        source,
    })
}

/// Runs one job to completion.
///
/// Never fails as a whole: a directory or metadata problem abandons this
/// source, an encoder problem loses only that derivative. Either way the
/// failure is logged and returned in the outcome.
pub fn execute_job(job: &TransformJob) -> JobOutcome {
    let source = &job.source.path;

    if let Err(e) = ensure_dir(&job.dest_dir) {
        crate::error!("Skipping {:?}: {}", source, e);
        return JobOutcome::abandoned(TransformFailure::for_source(source, e));
    }

    let meta = match read_source_metadata(source) {
        Ok(meta) => meta,
        Err(e) => {
            crate::error!("Skipping {:?}: {}", source, e);
            return JobOutcome::abandoned(TransformFailure::for_source(source, e));
        }
    };
    crate::verbose!(
        "Processing file: {:?}, {}x{}, hasAlpha: {}",
        source,
        meta.width,
        meta.height,
        meta.has_alpha
    );

    let bytes = match fs::read(source) {
        Ok(bytes) => bytes,
        Err(e) => {
            let e = AssetError::from(e);
            crate::error!("Skipping {:?}: {}", source, e);
            return JobOutcome::abandoned(TransformFailure::for_source(source, e));
        }
    };

    let results: Vec<(PathBuf, Result<u64>)> = match job.kind {
        SourceKind::Png => job
            .outputs
            .iter()
            .map(|spec| (spec.path(), write_derivative(&bytes, None, spec)))
            .collect(),
        SourceKind::JpegFamily => {
            let decoded = match decode_image(&bytes) {
                Ok(img) => img,
                Err(e) => {
                    crate::error!("Skipping {:?}: {}", source, e);
                    return JobOutcome::abandoned(TransformFailure::for_source(source, e));
                }
            };
            write_concurrently(&bytes, &decoded, &job.outputs)
        }
    };

    let mut outcome = JobOutcome {
        source_size: bytes.len() as u64,
        ..JobOutcome::default()
    };
    for (path, result) in results {
        match result {
            Ok(size) => {
                crate::verbose!("Wrote {:?} ({} bytes)", path, size);
                outcome.written.push((path, size));
            }
            Err(e) => {
                crate::error!("Failed to write {:?}: {}", path, e);
                outcome
                    .failures
                    .push(TransformFailure::for_output(source, path, e));
            }
        }
    }
    outcome
}

fn write_concurrently(
    bytes: &[u8],
    decoded: &image::DynamicImage,
    outputs: &[OutputSpec],
) -> Vec<(PathBuf, Result<u64>)> {
    outputs
        .par_iter()
        .map(|spec| (spec.path(), write_derivative(bytes, Some(decoded), spec)))
        .collect()
}
