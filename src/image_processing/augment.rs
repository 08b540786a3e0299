//! Randomized augmentation parameters.
//!
//! Parameters are drawn once per image from an injected RNG, so callers can
//! seed the generator or build a [`TransformParams`] by hand to pin every value.

use rand::Rng;
use serde::Deserialize;

use super::error::{PipelineError, PipelineResult};

/// Sampling ranges for the random augmentation steps
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AugmentationConfig {
    /// Probability of mirroring horizontally (0.0 - 1.0)
    pub flip_probability: f64,
    /// Rotation angle range in degrees, inclusive
    pub rotation_degrees: (f32, f32),
    /// Zoom factor range, inclusive
    pub zoom: (f32, f32),
    /// Brightness multiplier range, inclusive
    pub brightness: (f32, f32),
    /// Contrast multiplier range, inclusive
    pub contrast: (f32, f32),
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            flip_probability: 0.5,
            rotation_degrees: (-15.0, 15.0),
            zoom: (0.9, 1.1),
            brightness: (0.8, 1.2),
            contrast: (0.8, 1.2),
        }
    }
}

impl AugmentationConfig {
    /// Every sample is the identity transform
    pub fn none() -> Self {
        Self {
            flip_probability: 0.0,
            rotation_degrees: (0.0, 0.0),
            zoom: (1.0, 1.0),
            brightness: (1.0, 1.0),
            contrast: (1.0, 1.0),
        }
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if !(0.0..=1.0).contains(&self.flip_probability) {
            return Err(PipelineError::Validation(format!(
                "Flip probability must be between 0 and 1, got: {}",
                self.flip_probability
            )));
        }

        let ranges = [
            ("rotation", self.rotation_degrees, false),
            ("zoom", self.zoom, true),
            ("brightness", self.brightness, true),
            ("contrast", self.contrast, true),
        ];
        for (name, (min, max), positive) in ranges {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(PipelineError::Validation(format!(
                    "Invalid {} range [{}, {}]",
                    name, min, max
                )));
            }
            if positive && min <= 0.0 {
                return Err(PipelineError::Validation(format!(
                    "{} range must be positive, got [{}, {}]",
                    name, min, max
                )));
            }
        }

        Ok(())
    }
}

/// One image's worth of randomly drawn transform values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParams {
    pub flip: bool,
    pub angle_degrees: f32,
    pub zoom: f32,
    pub brightness: f32,
    pub contrast: f32,
}

impl TransformParams {
    pub fn identity() -> Self {
        Self {
            flip: false,
            angle_degrees: 0.0,
            zoom: 1.0,
            brightness: 1.0,
            contrast: 1.0,
        }
    }

    /// Draw each parameter independently from its range.
    ///
    /// The config must have passed [`AugmentationConfig::validate`].
    pub fn sample<R: Rng + ?Sized>(config: &AugmentationConfig, rng: &mut R) -> Self {
        Self {
            flip: rng.random_bool(config.flip_probability),
            angle_degrees: sample_range(rng, config.rotation_degrees),
            zoom: sample_range(rng, config.zoom),
            brightness: sample_range(rng, config.brightness),
            contrast: sample_range(rng, config.contrast),
        }
    }
}

fn sample_range<R: Rng + ?Sized>(rng: &mut R, (min, max): (f32, f32)) -> f32 {
    if min == max {
        min
    } else {
        rng.random_range(min..=max)
    }
}
