//! Batch generation, publishing, export and video jobs built on the AI,
//! platform, render and store crates.

pub mod error;
pub mod export;
pub mod orchestrator;
pub mod publish;
pub mod types;
pub mod video;

pub use error::PipelineError;
pub use export::{
    csv_file_name, export_csv, export_zip, zip_file_name, BackgroundLoader, SkippedPin,
    ZipExportReport, CSV_HEADER,
};
pub use orchestrator::{expand_work_items, BatchOrchestrator};
pub use publish::{publish_project, PublishOutcome, PublishStatus};
pub use types::{BatchEvent, BatchRequest, CancelFlag, WorkItem};
pub use video::{generate_pin_video, video_path};
