use crate::config::ImageOptions;
use crate::constants::{MIN_AVAILABLE_MEMORY_MIB, PROGRESS_BAR_TEMPLATE};
use crate::discovery::{compile_patterns, discover};
use crate::error::{AssetError, Result};
use crate::plan::{plan_jobs, TransformJob};
use crate::transform::{execute_job, JobOutcome, TransformFailure};
use crate::utils::{calculate_compression_ratio, format_file_size};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use sysinfo::System;

/// Completion signal for one run of the image pipeline.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub assets_discovered: usize,
    pub derivatives_written: usize,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub failures: Vec<TransformFailure>,
    pub elapsed: Duration,
}

impl PipelineReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn absorb(&mut self, outcome: JobOutcome) {
        self.bytes_read += outcome.source_size;
        self.bytes_written += outcome.bytes_written();
        self.derivatives_written += outcome.written.len();
        self.failures.extend(outcome.failures);
    }
}

/// Plan for a run: the jobs to execute plus sources rejected while planning.
#[derive(Debug, Default)]
pub struct PipelinePlan {
    pub assets_discovered: usize,
    pub jobs: Vec<TransformJob>,
    pub rejected: Vec<TransformFailure>,
}

impl PipelinePlan {
    pub fn derivative_count(&self) -> usize {
        self.jobs.iter().map(|job| job.outputs.len()).sum()
    }
}

/// Estimates decode memory for an image file without loading it.
///
/// # Returns
/// * `Ok(memory_mib)` - Estimated memory usage in MiB
/// * `Err(AssetError)` - If file metadata cannot be read
pub fn estimate_image_memory_usage(file_path: &Path) -> Result<f64> {
    let metadata = fs::metadata(file_path)?;
    let file_size_mib = metadata.len() as f64 / (1024.0 * 1024.0);

    // Decoded pixels are several times larger than the compressed file, and
    // each JPEG also holds three encoder buffers at once.
    let multiplier = match file_path.extension().and_then(|s| s.to_str()) {
        Some(ext) => match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => 6.0,
            "png" => 3.0,
            _ => 4.0,
        },
        None => 4.0,
    };

    Ok(file_size_mib * multiplier)
}

/// Caps `requested` workers so the average job fits in available memory.
pub fn memory_parallelism_cap(jobs: &[TransformJob], requested: usize) -> usize {
    let baseline = requested.min(jobs.len()).max(1);

    let total_mib: f64 = jobs
        .iter()
        .filter_map(|job| estimate_image_memory_usage(&job.source.path).ok())
        .sum();
    let avg_per_file_mib = ((total_mib / jobs.len().max(1) as f64).ceil() as u64).max(1);

    let mut sys = System::new();
    sys.refresh_memory();
    let available_mem_mib = sys.available_memory() / (1024 * 1024);
    if available_mem_mib == 0 {
        // Some sandboxes report nothing; trust the requested count.
        return baseline;
    }

    let mem_cap = available_mem_mib.saturating_sub(MIN_AVAILABLE_MEMORY_MIB) / avg_per_file_mib;
    (mem_cap as usize).clamp(1, baseline)
}

/// Discovery and planning; writes nothing.
///
/// A missing source root yields an empty plan.
pub fn plan_images(src_root: &Path, dest_root: &Path, options: &ImageOptions) -> Result<PipelinePlan> {
    let patterns = compile_patterns(&options.patterns)?;
    let assets = match discover(src_root, &patterns) {
        Ok(assets) => assets,
        Err(e) if e.is_missing_source() => {
            crate::warn!("{}; nothing to process", e);
            return Ok(PipelinePlan::default());
        }
        Err(e) => return Err(e),
    };

    let (jobs, rejected) = plan_jobs(&assets, dest_root, options);
    let rejected = rejected
        .into_iter()
        .map(|(path, e)| {
            crate::warn!("Not processing {:?}: {}", path, e);
            TransformFailure::for_source(&path, e)
        })
        .collect();

    Ok(PipelinePlan {
        assets_discovered: assets.len(),
        jobs,
        rejected,
    })
}

fn progress_bar(len: usize) -> ProgressBar {
    if !crate::logger::show_progress() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    match ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(_) => pb.set_style(ProgressStyle::default_bar()),
    }
    pb
}

/// Runs every job on a scoped pool of `workers` threads and waits for all of them.
pub fn execute_jobs(jobs: &[TransformJob], workers: usize) -> Result<Vec<JobOutcome>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()?;

    let progress = progress_bar(jobs.len());
    let outcomes: Vec<JobOutcome> = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                let outcome = execute_job(job);
                progress.set_message(job.source.file_name());
                progress.inc(1);
                outcome
            })
            .collect()
    });
    progress.finish_and_clear();

    Ok(outcomes)
}

/// Discovers every image under `src_root` and writes its derivatives under
/// `dest_root`, mirroring the directory structure.
///
/// Only configuration problems return `Err`; per-image failures are logged
/// and collected in the report.
pub fn run_images(src_root: &Path, dest_root: &Path, options: &ImageOptions) -> Result<PipelineReport> {
    let start_time = Instant::now();
    crate::info!("🖼️  Processing images: {:?} -> {:?}", src_root, dest_root);

    let mut plan = plan_images(src_root, dest_root, options)?;
    let mut report = PipelineReport {
        assets_discovered: plan.assets_discovered,
        failures: std::mem::take(&mut plan.rejected),
        ..PipelineReport::default()
    };

    if plan.jobs.is_empty() {
        crate::info!("⚠️  No image files found in {:?}", src_root);
        report.elapsed = start_time.elapsed();
        return Ok(report);
    }

    let workers = memory_parallelism_cap(&plan.jobs, options.worker_count());
    crate::info!(
        "📊 Found {} images, {} derivatives planned, using {} workers",
        plan.jobs.len(),
        plan.derivative_count(),
        workers
    );

    for outcome in execute_jobs(&plan.jobs, workers)? {
        report.absorb(outcome);
    }
    report.elapsed = start_time.elapsed();

    print_summary(&report);
    Ok(report)
}

pub fn print_summary(report: &PipelineReport) {
    crate::info!("\n📊 Image Pipeline Summary:");
    crate::info!("  📁 Sources found: {}", report.assets_discovered);
    crate::info!("  🖼️  Derivatives written: {}", report.derivatives_written);
    crate::info!(
        "  📦 Source size: {} -> output size: {}",
        format_file_size(report.bytes_read),
        format_file_size(report.bytes_written)
    );
    crate::info!(
        "  🎯 Size change: {:.1}%",
        calculate_compression_ratio(report.bytes_read, report.bytes_written)
    );
    crate::info!("  ⏱️  Total time: {:?}", report.elapsed);

    if !report.is_complete() {
        crate::warn!(
            "{} derivatives or sources failed; see the errors above",
            report.failures.len()
        );
    }
}

/// Turns a report with failures into an error, for callers that need a hard signal.
pub fn ensure_complete(report: &PipelineReport) -> Result<()> {
    if report.is_complete() {
        Ok(())
    } else {
        Err(AssetError::IncompleteRun(report.failures.len()))
    }
}
