use crate::cli::{Args, BlurMethod};
use crate::image_processing::AugmentationConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings file accepted by `--config`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub target_size: Option<u32>,
    pub blur: Option<BlurMethod>,
    pub seed: Option<u64>,
    pub jobs: Option<usize>,
    pub extensions: Option<String>,
    pub dry_run: Option<bool>,
    pub augmentation: Option<AugmentationConfig>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

impl Args {
    /// Load configuration from a JSON file and merge with command-line arguments
    /// Command-line arguments take precedence over config file values
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let config = ConfigFile::load(&config_path)?;
            self.merge_from_config(config);

            tracing::debug!("Loaded configuration from: {:?}", config_path);
        }
        Ok(())
    }

    fn merge_from_config(&mut self, config: ConfigFile) {
        // Optional flags stay None unless given on the command line
        if self.size.is_none() {
            self.size = config.target_size;
        }
        if self.blur.is_none() {
            self.blur = config.blur;
        }
        if self.seed.is_none() {
            self.seed = config.seed;
        }
        if self.augmentation.is_none() {
            self.augmentation = config.augmentation;
        }

        // Flags with defaults - only apply if still at the default
        if self.jobs == 1 {
            if let Some(jobs) = config.jobs {
                self.jobs = jobs;
            }
        }

        if self.extensions_str == "png,jpg,jpeg" {
            if let Some(ext) = config.extensions {
                self.extensions_str = ext;
            }
        }

        if !self.dry_run {
            self.dry_run = config.dry_run.unwrap_or(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "targetSize": 128,
            "blur": "gaussian",
            "seed": 7,
            "jobs": 4,
            "augmentation": {
                "flipProbability": 0.25,
                "rotationDegrees": [-10, 10],
                "zoom": [0.95, 1.05],
                "brightness": [0.9, 1.1],
                "contrast": [0.9, 1.1]
            }
        }"#;

        let config: ConfigFile = serde_json::from_str(json).unwrap();
        assert_eq!(config.target_size, Some(128));
        assert_eq!(config.blur, Some(BlurMethod::Gaussian));
        assert_eq!(config.jobs, Some(4));

        let augmentation = config.augmentation.unwrap();
        assert_eq!(augmentation.flip_probability, 0.25);
        assert_eq!(augmentation.rotation_degrees, (-10.0, 10.0));
    }

    #[test]
    fn test_command_line_wins() {
        let mut args = Args {
            size: Some(256),
            jobs: 2,
            ..Default::default()
        };

        args.merge_from_config(ConfigFile {
            target_size: Some(128),
            blur: Some(BlurMethod::None),
            seed: Some(3),
            jobs: Some(8),
            ..Default::default()
        });

        assert_eq!(args.size, Some(256));
        assert_eq!(args.jobs, 2);
        assert_eq!(args.blur, Some(BlurMethod::None));
        assert_eq!(args.seed, Some(3));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("augment.json");
        fs::write(&path, r#"{ "seed": 11, "dryRun": true }"#).unwrap();

        let mut args = Args {
            config_file: Some(path),
            ..Default::default()
        };
        args.load_and_merge_config().unwrap();

        assert_eq!(args.seed, Some(11));
        assert!(args.dry_run);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(ConfigFile::load(&path).is_err());
        assert!(ConfigFile::load(&PathBuf::from("/nonexistent/config.json")).is_err());
    }
}
