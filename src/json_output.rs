//! JSON output for GUI integration
//!
//! When --json-progress flag is enabled, all progress and status information
//! is emitted as JSON lines to stdout, suppressing all other output.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::image_processing::{BatchReport, Progress};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage {
    /// Progress update, one per finished item
    Progress {
        current: usize,
        total: usize,
        message: String,
    },
    /// File processing completed
    FileCompleted {
        input_path: String,
        output_path: String,
    },
    /// File processing failed
    FileFailed {
        input_path: String,
        kind: String,
        error: String,
    },
    /// Processing summary
    Summary {
        total_files: usize,
        processed: usize,
        failed: usize,
        duration_secs: f64,
    },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn progress(progress: &Progress) {
        Self::from(progress).emit();
    }

    pub fn file_completed(input_path: &Path, output_path: &Path) {
        Self::FileCompleted {
            input_path: input_path.display().to_string(),
            output_path: output_path.display().to_string(),
        }
        .emit();
    }

    pub fn file_failed(input_path: &Path, kind: &str, error: impl Into<String>) {
        Self::FileFailed {
            input_path: input_path.display().to_string(),
            kind: kind.to_string(),
            error: error.into(),
        }
        .emit();
    }

    /// Per-file results followed by the summary line
    pub fn report(report: &BatchReport) {
        for item in &report.items {
            match &item.result {
                Ok(output_path) => Self::file_completed(&item.input_path, output_path),
                Err(e) => Self::file_failed(&item.input_path, e.kind(), e.to_string()),
            }
        }

        Self::Summary {
            total_files: report.total(),
            processed: report.processed(),
            failed: report.failed(),
            duration_secs: report.duration.as_secs_f64(),
        }
        .emit();
    }
}

impl From<&Progress> for JsonMessage {
    fn from(progress: &Progress) -> Self {
        Self::Progress {
            current: progress.index,
            total: progress.total,
            message: format!("Processed {}", progress.filename),
        }
    }
}
