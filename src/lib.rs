pub mod cli;
pub mod config;
pub mod constants;
pub mod copy;
pub mod discovery;
pub mod encode;
pub mod error;
pub mod formats;
pub mod logger;
pub mod metadata;
pub mod pipeline;
pub mod plan;
pub mod site;
pub mod thumbnail;
pub mod transform;
pub mod utils;

pub use config::{CropOptions, ImageOptions, SiteLayout};
pub use copy::{copy_matching, copy_site_statics, CopyReport};
pub use discovery::{discover, discover_gallery, SourceAsset};
pub use error::{AssetError, Result};
pub use formats::{SourceKind, TargetFormat};
pub use metadata::{read_source_metadata, SourceMetadata};
pub use pipeline::{plan_images, run_images, PipelinePlan, PipelineReport};
pub use plan::{plan_job, plan_jobs, EncodeOptions, OutputSpec, TransformJob};
pub use site::{run_build, BuildReport};
pub use thumbnail::{crop_gallery, CropReport};
pub use transform::{execute_job, JobOutcome, TransformFailure};
