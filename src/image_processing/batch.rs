use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use super::error::PipelineError;

/// Batch progress tracking shared across workers
pub struct BatchProcessor {
    pub total_files: usize,
    pub processed_count: AtomicUsize,
    pub start_time: Instant,
}

impl BatchProcessor {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            processed_count: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    /// Increment processed count and return current count
    pub fn increment(&self) -> usize {
        self.processed_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Notification sent once per finished item, failed or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// 1-based count of finished items
    pub index: usize,
    pub total: usize,
    pub filename: String,
}

#[derive(Debug)]
pub struct ItemOutcome {
    pub input_path: PathBuf,
    /// Written (or, in dry-run mode, would-be) output path
    pub result: Result<PathBuf, PipelineError>,
}

impl ItemOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-item results in job order
#[derive(Debug)]
pub struct BatchReport {
    pub items: Vec<ItemOutcome>,
    pub duration: Duration,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn processed(&self) -> usize {
        self.items.iter().filter(|item| item.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.processed()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &PipelineError)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().err().map(|e| (&item.input_path, e)))
    }

    /// Percentage of items that were processed successfully
    pub fn success_rate(&self) -> f64 {
        if self.items.is_empty() {
            0.0
        } else {
            (self.processed() as f64 / self.total() as f64) * 100.0
        }
    }
}
