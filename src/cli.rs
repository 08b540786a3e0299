use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

use crate::image_processing::{AugmentationConfig, BlurKind, PipelineConfig};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurMethod {
    /// 3x3 median filter (removes JPEG speckle, keeps edges)
    #[value(name = "median")]
    Median,
    /// 3x3 Gaussian blur
    #[value(name = "gaussian")]
    Gaussian,
    /// No denoising
    #[value(name = "none")]
    None,
}

impl From<BlurMethod> for BlurKind {
    fn from(method: BlurMethod) -> Self {
        match method {
            BlurMethod::Median => BlurKind::Median,
            BlurMethod::Gaussian => BlurKind::Gaussian,
            BlurMethod::None => BlurKind::None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "image-preprocessor",
    about = "Resize, denoise and augment a folder of images for model training",
    long_about = "
Image Preprocessor

Takes every .png/.jpg/.jpeg file in a source folder, resizes it to a fixed square size,
applies a 3x3 denoising blur and a randomized augmentation (horizontal flip, rotation,
zoom with reflect padding, brightness and contrast jitter), then writes the result to the
destination folder under the same file name.

Example Usage:
  # Default 224x224 preprocessing
  image-preprocessor -i ~/dataset/raw -o ~/dataset/train

  # Reproducible run using 4 worker threads
  image-preprocessor -i raw -o train --seed 42 --jobs 4

  # Gaussian denoising with custom ranges from a config file
  image-preprocessor -i raw -o train --blur gaussian --config augment.json

  # Machine-readable progress for a wrapping GUI
  image-preprocessor -i raw -o train --json-progress

  # Dry run: decode and transform, but write nothing
  image-preprocessor -i raw -o train --dry-run --verbose"
)]
pub struct Args {
    /// Source directory containing the images
    #[arg(short = 'i', long = "input", value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Destination directory for processed images (created if missing)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Side length of the square output image [default: 224]
    #[arg(short = 's', long = "size", value_name = "PIXELS")]
    pub size: Option<u32>,

    /// Denoising filter applied after resizing [default: median]
    #[arg(short = 'b', long = "blur", value_name = "METHOD")]
    pub blur: Option<BlurMethod>,

    /// Seed for the augmentation RNG; omit for a different result every run
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,

    /// Number of parallel processing jobs (1 = sequential, 0 = all CPU cores)
    #[arg(short = 'j', long = "jobs", default_value = "1", value_name = "N")]
    pub jobs: usize,

    /// Comma-separated list of image extensions to process
    #[arg(long = "extensions", default_value = "png,jpg,jpeg")]
    pub extensions_str: String,

    /// JSON file with pipeline settings (command-line flags take precedence)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Emit progress as JSON lines on stdout instead of progress bars
    #[arg(long = "json-progress")]
    pub json_progress: bool,

    /// Run the pipeline without writing any files
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Enable verbose output with detailed progress information
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Augmentation ranges, filled from the config file
    #[arg(skip)]
    pub augmentation: Option<AugmentationConfig>,
}

impl Args {
    /// Parse the extensions string into a vector
    pub fn parse_extensions(&self) -> Vec<String> {
        self.extensions_str
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Worker count with 0 resolved to the number of CPU cores
    pub fn parallel_jobs(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get()
        } else {
            self.jobs
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        let defaults = PipelineConfig::default();
        PipelineConfig {
            target_size: self.size.unwrap_or(defaults.target_size),
            blur: self.blur.map(BlurKind::from).unwrap_or(defaults.blur),
            augmentation: self.augmentation.clone().unwrap_or(defaults.augmentation),
        }
    }
}


// Default implementation for tests
#[cfg(test)]
impl Default for Args {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            size: None,
            blur: None,
            seed: None,
            jobs: 1,
            extensions_str: crate::image_processing::DEFAULT_EXTENSIONS.join(","),
            config_file: None,
            json_progress: false,
            dry_run: false,
            verbose: false,
            augmentation: None,
        }
    }
}
