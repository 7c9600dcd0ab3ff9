use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "site-assets",
    about = "Image asset pipeline for static sites",
    long_about = "site-assets turns a source image tree into web-ready derivatives. \
                  JPEG sources become a re-encoded JPEG plus WebP and AVIF copies, PNG sources \
                  are recompressed losslessly with oxipng, and gallery photos get fixed-size \
                  center-cropped thumbnails.",
    version,
    after_help = "EXAMPLES:\n  \
    site-assets images src/img build/img -q 80\n  \
    site-assets images src/img build/img --dry-run\n  \
    site-assets crop src/img/gallery/full src/img/gallery/thumb\n  \
    site-assets copy \"src/img/*.svg\" build/img\n  \
    site-assets build .\n  \
    site-assets info src/img/logo.png"
)]
pub struct Args {
    #[arg(short = 'Q', long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, global = true, help = "Print every file as it is processed")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Generate image derivatives for a source tree",
        long_about = "Walk SRC recursively and write derivatives under DEST, mirroring the directory \
                      layout. Each JPEG yields <name>.<ext>, <name>.webp and <name>.avif; each PNG \
                      yields one losslessly recompressed <name>.png."
    )]
    Images {
        #[arg(help = "Source image directory")]
        src: PathBuf,

        #[arg(help = "Destination directory")]
        dest: PathBuf,

        #[arg(
            short = 'q',
            long,
            help = "JPEG/WebP quality (1-100, default: 80)"
        )]
        quality: Option<u8>,

        #[arg(long, help = "AVIF quality (1-100, default: 50)")]
        avif_quality: Option<u8>,

        #[arg(
            short = 'j',
            long,
            help = "Number of parallel workers (default: auto)",
            long_help = "Maximum number of images processed at once. \
                         Defaults to the CPU count and is lowered further when memory is tight."
        )]
        jobs: Option<usize>,

        #[arg(
            short = 'p',
            long = "pattern",
            help = "File name glob to include (repeatable, default: *.jpg *.jpeg *.png)"
        )]
        patterns: Vec<String>,

        #[arg(long, help = "Print the planned outputs without writing anything")]
        dry_run: bool,

        #[arg(long, help = "Exit with an error if any derivative failed")]
        strict: bool,
    },

    #[command(
        about = "Center-crop gallery photos into thumbnails",
        long_about = "Write a center-cropped thumbnail into THUMB for every JPEG directly inside FULL. \
                      A missing FULL directory is not an error."
    )]
    Crop {
        #[arg(help = "Directory with full-size gallery JPEGs")]
        full: PathBuf,

        #[arg(help = "Thumbnail output directory")]
        thumb: PathBuf,

        #[arg(short = 'W', long, help = "Thumbnail width in pixels (default: 250)")]
        width: Option<u32>,

        #[arg(short = 'H', long, help = "Thumbnail height in pixels (default: 180)")]
        height: Option<u32>,

        #[arg(short = 'q', long, help = "JPEG quality (1-100, default: 80)")]
        quality: Option<u8>,

        #[arg(long, help = "Exit with an error if any thumbnail failed")]
        strict: bool,
    },

    #[command(about = "Copy files matching a glob into a directory unchanged")]
    Copy {
        #[arg(help = "Glob pattern, e.g. 'src/languages/*.json'")]
        pattern: String,

        #[arg(help = "Destination directory")]
        dest: PathBuf,

        #[arg(long, help = "Exit with an error if any copy failed")]
        strict: bool,
    },

    #[command(
        about = "Run the full asset build for a site project",
        long_about = "Run, in order: gallery thumbnails (src/img/gallery/full -> src/img/gallery/thumb), \
                      image derivatives (src/img -> build/img), and the static copies \
                      (SVG icons, language files, robots.txt, sitemap.xml)."
    )]
    Build {
        #[arg(default_value = ".", help = "Project root containing src/")]
        root: PathBuf,

        #[arg(short = 'j', long, help = "Number of parallel workers (default: auto)")]
        jobs: Option<usize>,

        #[arg(long, help = "Exit with an error if any step reported failures")]
        strict: bool,
    },

    #[command(about = "Show image metadata and what the pipeline will produce from it")]
    Info {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,
    },
}
