pub mod augment;
pub mod batch;
pub mod error;
pub mod geometry;
pub mod photometric;
pub mod pipeline;
pub mod resize;

use image::{ImageError, ImageFormat, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::utils::has_valid_extension;

pub use augment::{AugmentationConfig, TransformParams};
pub use batch::{BatchProcessor, BatchReport, ItemOutcome, Progress};
pub use error::{PipelineError, PipelineResult};
pub use photometric::BlurKind;
pub use pipeline::{preprocess_path, transform, PipelineConfig, DEFAULT_TARGET_SIZE};

/// Extensions treated as input images when none are configured
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub pipeline: PipelineConfig,
    pub extensions: Vec<String>,
    /// 1 keeps the batch strictly sequential
    pub parallel_jobs: usize,
    /// Base seed for per-item RNGs; drawn from OS entropy when absent
    pub seed: Option<u64>,
    /// Run the pipeline without writing output files
    pub dry_run: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            parallel_jobs: 1,
            seed: None,
            dry_run: false,
        }
    }
}

pub struct ProcessingEngine {
    config: ProcessingConfig,
    pool: Option<rayon::ThreadPool>,
}

impl ProcessingEngine {
    pub fn new(config: ProcessingConfig) -> PipelineResult<Self> {
        config.pipeline.validate()?;

        if config.extensions.is_empty() {
            return Err(PipelineError::Validation(
                "No file extensions specified".to_string(),
            ));
        }

        let pool = if config.parallel_jobs > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.parallel_jobs)
                .build()
                .map_err(|e| {
                    PipelineError::Validation(format!("Failed to initialize thread pool: {}", e))
                })?;
            Some(pool)
        } else {
            None
        };

        Ok(Self { config, pool })
    }

    /// List the image files directly inside `source_dir`, sorted by name
    pub fn discover_images(&self, source_dir: &Path) -> PipelineResult<Vec<PathBuf>> {
        tracing::debug!("Scanning directory: {}", source_dir.display());

        let walker = WalkDir::new(source_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        let mut image_files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| PipelineError::Io {
                path: source_dir.to_path_buf(),
                source: e.into(),
            })?;

            let path = entry.path();
            if entry.file_type().is_file() && has_valid_extension(path, &self.config.extensions) {
                image_files.push(path.to_path_buf());
            }
        }

        tracing::debug!("Found {} image files", image_files.len());
        Ok(image_files)
    }

    /// Reject missing or unusable directories before any work starts
    pub fn validate_directories(&self, source_dir: &Path, output_dir: &Path) -> PipelineResult<()> {
        if source_dir.as_os_str().is_empty() || output_dir.as_os_str().is_empty() {
            return Err(PipelineError::Validation(
                "Please select both a source and a destination directory".to_string(),
            ));
        }
        if !source_dir.exists() {
            return Err(PipelineError::Validation(format!(
                "Source directory does not exist: {}",
                source_dir.display()
            )));
        }
        if !source_dir.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Source path is not a directory: {}",
                source_dir.display()
            )));
        }
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Destination path is not a directory: {}",
                output_dir.display()
            )));
        }
        Ok(())
    }

    /// Preprocess every image in `source_dir` into `output_dir`.
    ///
    /// Items that fail to decode or write are logged and recorded in the
    /// report; only validation problems abort the batch, and they do so before
    /// the first item. `on_progress` is called once per item.
    pub fn process_directory<F>(
        &self,
        source_dir: &Path,
        output_dir: &Path,
        on_progress: F,
    ) -> PipelineResult<BatchReport>
    where
        F: Fn(&Progress) + Send + Sync,
    {
        self.validate_directories(source_dir, output_dir)?;

        let image_files = self.discover_images(source_dir)?;
        if image_files.is_empty() {
            return Err(PipelineError::Validation(format!(
                "No images with extensions {:?} found in {}",
                self.config.extensions,
                source_dir.display()
            )));
        }

        if !self.config.dry_run {
            std::fs::create_dir_all(output_dir).map_err(|source| PipelineError::Io {
                path: output_dir.to_path_buf(),
                source,
            })?;
        }

        self.process_batch(&image_files, output_dir, on_progress)
    }

    /// Process an already discovered job batch
    pub fn process_batch<F>(
        &self,
        image_files: &[PathBuf],
        output_dir: &Path,
        on_progress: F,
    ) -> PipelineResult<BatchReport>
    where
        F: Fn(&Progress) + Send + Sync,
    {
        let base_seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let processor = BatchProcessor::new(image_files.len());

        let run_item = |index: usize, image_path: &PathBuf| -> ItemOutcome {
            let mut rng = StdRng::seed_from_u64(item_seed(base_seed, index));
            let result = self.process_single_image(image_path, output_dir, &mut rng);

            let filename = file_name_of(image_path);
            if let Err(e) = &result {
                tracing::warn!(file = %filename, kind = e.kind(), "Skipping image: {}", e);
            }

            on_progress(&Progress {
                index: processor.increment(),
                total: processor.total_files,
                filename,
            });

            ItemOutcome {
                input_path: image_path.clone(),
                result,
            }
        };

        let items: Vec<ItemOutcome> = match &self.pool {
            Some(pool) => pool.install(|| {
                image_files
                    .par_iter()
                    .enumerate()
                    .map(|(index, path)| run_item(index, path))
                    .collect()
            }),
            None => image_files
                .iter()
                .enumerate()
                .map(|(index, path)| run_item(index, path))
                .collect(),
        };

        let report = BatchReport {
            items,
            duration: processor.elapsed(),
        };
        tracing::info!(
            "Processed {}/{} images in {:?}",
            report.processed(),
            report.total(),
            report.duration
        );
        Ok(report)
    }

    /// Transform one file and save it under the same name in `output_dir`
    pub fn process_single_image<R: Rng + ?Sized>(
        &self,
        image_path: &Path,
        output_dir: &Path,
        rng: &mut R,
    ) -> PipelineResult<PathBuf> {
        let processed = preprocess_path(image_path, &self.config.pipeline, rng)?;

        let file_name = image_path.file_name().ok_or_else(|| {
            PipelineError::Validation(format!("Input has no file name: {}", image_path.display()))
        })?;
        let output_path = output_dir.join(file_name);

        if self.config.dry_run {
            tracing::debug!("Dry run: would write {}", output_path.display());
            return Ok(output_path);
        }

        write_atomically(&processed, &output_path).map_err(|source| PipelineError::Write {
            path: output_path.clone(),
            source,
        })?;

        tracing::debug!("Wrote {}", output_path.display());
        Ok(output_path)
    }
}

/// Encode next to `output_path` and rename into place, so a failed write
/// never leaves a truncated file under the final name.
///
/// The container follows the output extension.
fn write_atomically(img: &RgbImage, output_path: &Path) -> Result<(), ImageError> {
    let format = ImageFormat::from_path(output_path)?;
    let partial_path = partial_path_for(output_path);

    let result = File::create(&partial_path)
        .map_err(ImageError::IoError)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            img.write_to(&mut writer, format)?;
            writer.flush().map_err(ImageError::IoError)
        })
        .and_then(|()| fs::rename(&partial_path, output_path).map_err(ImageError::IoError));

    if result.is_err() {
        let _ = fs::remove_file(&partial_path);
    }
    result
}

/// Hidden sibling `.name.partial` in the same directory as `path`
fn partial_path_for(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".partial");
    path.with_file_name(name)
}

/// Independent seed per job index, so results do not depend on scheduling
fn item_seed(base_seed: u64, index: usize) -> u64 {
    base_seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
