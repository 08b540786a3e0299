// Library exports for reuse by front ends and other applications
pub mod cli;
pub mod config_file;
pub mod image_processing;
pub mod json_output;
pub mod logging;
pub mod utils;

// Re-export commonly used types
pub use cli::BlurMethod;
pub use image_processing::{
    AugmentationConfig, BatchReport, BlurKind, PipelineConfig, PipelineError, ProcessingConfig,
    ProcessingEngine, Progress, TransformParams,
};
pub use json_output::JsonMessage;
