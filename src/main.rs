use anyhow::{bail, Context, Result};
use clap::Parser;
use site_assets::cli::{Args, Commands};
use site_assets::logger::Verbosity;
use site_assets::metadata::print_image_info;
use site_assets::pipeline::{ensure_complete, plan_images, run_images, PipelinePlan};
use site_assets::{copy_matching, crop_gallery, logger, run_build, CropOptions, ImageOptions};

fn main() -> Result<()> {
    let args = Args::parse();
    logger::set_verbosity(Verbosity::from_flags(args.quiet, args.verbose));

    match args.command {
        Commands::Images {
            src,
            dest,
            quality,
            avif_quality,
            jobs,
            patterns,
            dry_run,
            strict,
        } => {
            let options = ImageOptions::new(quality, avif_quality, jobs)?.with_patterns(patterns);
            if dry_run {
                let plan = plan_images(&src, &dest, &options)
                    .with_context(|| format!("planning images under {:?}", src))?;
                print_plan(&plan);
                return Ok(());
            }

            let report = run_images(&src, &dest, &options)
                .with_context(|| format!("processing images under {:?}", src))?;
            if strict {
                ensure_complete(&report)?;
            }
        }
        Commands::Crop {
            full,
            thumb,
            width,
            height,
            quality,
            strict,
        } => {
            let options = CropOptions::new(width, height, quality)?;
            let report = crop_gallery(&full, &thumb, &options)
                .with_context(|| format!("cropping gallery {:?}", full))?;
            site_assets::info!("✅ {} thumbnails written", report.written.len());
            if strict && !report.is_complete() {
                bail!("{} thumbnails failed", report.failures.len());
            }
        }
        Commands::Copy {
            pattern,
            dest,
            strict,
        } => {
            let report = copy_matching(&pattern, &dest)?;
            site_assets::info!("📄 Copied {} files to {:?}", report.copied.len(), dest);
            if strict && !report.is_complete() {
                bail!("{} files failed to copy", report.failures.len());
            }
        }
        Commands::Build { root, jobs, strict } => {
            let images = ImageOptions::new(None, None, jobs)?;
            let report = run_build(&root, &images, &CropOptions::default())
                .with_context(|| format!("building site assets in {:?}", root))?;
            if strict && !report.is_complete() {
                bail!("{} asset steps failed", report.failure_count());
            }
        }
        Commands::Info { input } => {
            println!("📋 Getting info for: {:?}", input);
            print_image_info(&input)?;
        }
    }

    Ok(())
}

fn print_plan(plan: &PipelinePlan) {
    for job in &plan.jobs {
        println!("{:?}", job.source.path);
        for output in &job.outputs {
            println!("  -> {:?} ({})", output.path(), output.format);
        }
    }
    for rejected in &plan.rejected {
        println!("{:?} skipped: {}", rejected.source, rejected.error);
    }
    println!(
        "📊 {} sources, {} derivatives planned",
        plan.jobs.len(),
        plan.derivative_count()
    );
}
