use image::{ImageReader, RgbImage};
use rand::Rng;
use std::path::Path;

use super::augment::{AugmentationConfig, TransformParams};
use super::error::{PipelineError, PipelineResult};
use super::geometry::{flip_horizontal, rotate_about_center, zoom_crop_or_pad};
use super::photometric::{adjust_brightness, adjust_contrast, denoise, BlurKind};
use super::resize::resize_exact;

/// Side length of the square output
pub const DEFAULT_TARGET_SIZE: u32 = 224;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub target_size: u32,
    pub blur: BlurKind,
    pub augmentation: AugmentationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            blur: BlurKind::default(),
            augmentation: AugmentationConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> PipelineResult<()> {
        if self.target_size == 0 || self.target_size > 4096 {
            return Err(PipelineError::Validation(format!(
                "Target size must be between 1 and 4096 pixels, got: {}",
                self.target_size
            )));
        }
        self.augmentation.validate()
    }
}

/// Decode a file into an 8-bit RGB buffer.
///
/// The format is detected from the file contents, not the extension.
pub fn load_rgb(path: &Path) -> PipelineResult<RgbImage> {
    let decode_error = |source: image::ImageError| PipelineError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_error(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_error)?;

    Ok(img.to_rgb8())
}

/// Run the fixed step sequence on a decoded image.
///
/// Deterministic for a given `params`: resize, denoise, flip, rotate,
/// zoom with crop-or-pad, brightness, contrast.
pub fn transform(
    img: &RgbImage,
    config: &PipelineConfig,
    params: &TransformParams,
) -> PipelineResult<RgbImage> {
    let size = config.target_size;

    let resized = resize_exact(img, size, size)?;
    let mut current = denoise(&resized, config.blur);

    if params.flip {
        flip_horizontal(&mut current);
    }

    let rotated = rotate_about_center(&current, params.angle_degrees);
    let mut current = zoom_crop_or_pad(&rotated, params.zoom)?;

    adjust_brightness(&mut current, params.brightness);
    adjust_contrast(&mut current, params.contrast);

    Ok(current)
}

/// Decode `path`, draw fresh parameters from `rng`, and transform.
pub fn preprocess_path<R: Rng + ?Sized>(
    path: &Path,
    config: &PipelineConfig,
    rng: &mut R,
) -> PipelineResult<RgbImage> {
    let img = load_rgb(path)?;
    let params = TransformParams::sample(&config.augmentation, rng);

    tracing::trace!(
        path = %path.display(),
        flip = params.flip,
        angle = params.angle_degrees,
        zoom = params.zoom,
        brightness = params.brightness,
        contrast = params.contrast,
        "sampled transform parameters"
    );

    transform(&img, config, &params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x * 3 + y) % 256) as u8])
        })
    }

    #[test]
    fn test_output_is_always_target_size() {
        let config = PipelineConfig::default();
        let mut rng = StdRng::seed_from_u64(11);

        for (w, h) in [(640, 480), (120, 900), (224, 224), (33, 17), (1000, 1000)] {
            let img = create_test_image(w, h);
            for _ in 0..3 {
                let params = TransformParams::sample(&config.augmentation, &mut rng);
                let out = transform(&img, &config, &params).unwrap();
                assert_eq!(out.dimensions(), (224, 224), "input {}x{} {:?}", w, h, params);
            }
        }
    }

    #[test]
    fn test_extreme_parameters_keep_shape() {
        let config = PipelineConfig::default();
        let img = create_test_image(300, 200);

        for zoom in [0.9, 1.1] {
            for angle in [-15.0, 15.0] {
                let params = TransformParams {
                    flip: true,
                    angle_degrees: angle,
                    zoom,
                    brightness: 1.2,
                    contrast: 0.8,
                };
                let out = transform(&img, &config, &params).unwrap();
                assert_eq!(out.dimensions(), (224, 224));
            }
        }
    }

    #[test]
    fn test_identity_params_only_resize_and_blur() {
        let config = PipelineConfig {
            blur: BlurKind::None,
            ..Default::default()
        };
        let img = create_test_image(224, 224);

        let out = transform(&img, &config, &TransformParams::identity()).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_flip_mirrors_unflipped_baseline() {
        let config = PipelineConfig {
            blur: BlurKind::None,
            ..Default::default()
        };
        let img = create_test_image(224, 224);

        let baseline = transform(&img, &config, &TransformParams::identity()).unwrap();
        let flipped = transform(
            &img,
            &config,
            &TransformParams {
                flip: true,
                ..TransformParams::identity()
            },
        )
        .unwrap();

        assert_eq!(flipped, image::imageops::flip_horizontal(&baseline));
    }

    #[test]
    fn test_pinned_params_are_reproducible() {
        let config = PipelineConfig::default();
        let img = create_test_image(400, 250);
        let params = TransformParams {
            flip: true,
            angle_degrees: 7.5,
            zoom: 0.93,
            brightness: 1.1,
            contrast: 0.9,
        };

        let a = transform(&img, &config, &params).unwrap();
        let b = transform(&img, &config, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_repeated_runs_differ_in_pixels_not_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        create_test_image(180, 120).save(&path).unwrap();

        let config = PipelineConfig::default();
        let first = preprocess_path(&path, &config, &mut StdRng::seed_from_u64(1)).unwrap();
        let second = preprocess_path(&path, &config, &mut StdRng::seed_from_u64(2)).unwrap();

        assert_eq!(first.dimensions(), (224, 224));
        assert_eq!(second.dimensions(), (224, 224));
        assert_ne!(first, second);
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        let result = preprocess_path(&path, &PipelineConfig::default(), &mut rand::rng());
        assert!(matches!(result, Err(PipelineError::Decode { .. })));
    }

    #[test]
    fn test_format_detected_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        create_test_image(40, 30)
            .save_with_format(&path, image::ImageFormat::Jpeg)
            .unwrap();

        let img = load_rgb(&path).unwrap();
        assert_eq!(img.dimensions(), (40, 30));
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let result = load_rgb(Path::new("/nonexistent/nowhere.png"));
        assert!(matches!(result, Err(PipelineError::Decode { .. })));
    }

    #[test]
    fn test_config_validation() {
        assert!(PipelineConfig::default().validate().is_ok());
        let zero = PipelineConfig {
            target_size: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(PipelineError::Validation(_))));
    }
}
