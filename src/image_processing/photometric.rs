//! Denoising and brightness/contrast adjustments.

use image::RgbImage;
use imageproc::filter;

/// Sigma used for the Gaussian variant; matches a 3x3 kernel
const GAUSSIAN_SIGMA_3X3: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlurKind {
    /// 3x3 median filter
    #[default]
    Median,
    /// 3x3 Gaussian blur
    Gaussian,
    /// Skip denoising
    None,
}

/// Suppress compression artifacts before geometric distortion
pub fn denoise(img: &RgbImage, kind: BlurKind) -> RgbImage {
    match kind {
        BlurKind::Median => filter::median_filter(img, 1, 1),
        BlurKind::Gaussian => filter::gaussian_blur_f32(img, GAUSSIAN_SIGMA_3X3),
        BlurKind::None => img.clone(),
    }
}

#[inline]
fn clamp_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Multiply every channel by `factor`, clipping to the valid range
pub fn adjust_brightness(img: &mut RgbImage, factor: f32) {
    if factor == 1.0 {
        return;
    }

    for pixel in img.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = clamp_channel(*channel as f32 * factor);
        }
    }
}

/// Rounded mean luma (ITU-R 601) of the whole image
pub fn mean_luma(img: &RgbImage) -> f32 {
    let count = (img.width() as u64 * img.height() as u64) as f64;
    if count == 0.0 {
        return 0.0;
    }

    let sum: f64 = img
        .pixels()
        .map(|p| 0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64)
        .sum();

    (sum / count).round() as f32
}

/// Scale each channel's distance from the image's mean luma by `factor`
pub fn adjust_contrast(img: &mut RgbImage, factor: f32) {
    if factor == 1.0 {
        return;
    }

    let mean = mean_luma(img);
    for pixel in img.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = clamp_channel(mean + factor * (*channel as f32 - mean));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn two_tone() -> RgbImage {
        RgbImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                Rgb([100, 100, 100])
            } else {
                Rgb([200, 200, 200])
            }
        })
    }

    fn noisy(size: u32) -> RgbImage {
        RgbImage::from_fn(size, size, |x, y| {
            Rgb([((x * 37 + y * 11) % 256) as u8, ((x * y) % 256) as u8, (x ^ y) as u8])
        })
    }

    #[test]
    fn test_brightness_scales_and_clips() {
        let mut img = RgbImage::from_pixel(2, 2, Rgb([100, 250, 0]));
        adjust_brightness(&mut img, 1.2);
        assert_eq!(*img.get_pixel(0, 0), Rgb([120, 255, 0]));

        let mut img = RgbImage::from_pixel(2, 2, Rgb([100, 250, 0]));
        adjust_brightness(&mut img, 0.8);
        assert_eq!(*img.get_pixel(1, 1), Rgb([80, 200, 0]));
    }

    #[test]
    fn test_contrast_stretches_about_mean() {
        let mut img = two_tone();
        assert_eq!(mean_luma(&img), 150.0);

        adjust_contrast(&mut img, 2.0);
        assert_eq!(*img.get_pixel(0, 0), Rgb([50, 50, 50]));
        assert_eq!(*img.get_pixel(3, 1), Rgb([250, 250, 250]));
    }

    #[test]
    fn test_contrast_of_flat_image_is_noop() {
        let mut img = RgbImage::from_pixel(5, 5, Rgb([90, 90, 90]));
        adjust_contrast(&mut img, 0.8);
        assert_eq!(*img.get_pixel(2, 2), Rgb([90, 90, 90]));
    }

    #[test]
    fn test_unit_factors_are_identity() {
        let original = noisy(32);
        let mut img = original.clone();
        adjust_brightness(&mut img, 1.0);
        adjust_contrast(&mut img, 1.0);
        assert_eq!(img, original);
    }

    #[test]
    fn test_denoise_keeps_dimensions() {
        let img = noisy(17);
        for kind in [BlurKind::Median, BlurKind::Gaussian, BlurKind::None] {
            assert_eq!(denoise(&img, kind).dimensions(), (17, 17));
        }
        assert_eq!(denoise(&img, BlurKind::None), img);
    }

    #[test]
    fn test_median_removes_isolated_speck() {
        let mut img = RgbImage::from_pixel(9, 9, Rgb([40, 40, 40]));
        img.put_pixel(4, 4, Rgb([255, 255, 255]));
        let cleaned = denoise(&img, BlurKind::Median);
        assert_eq!(*cleaned.get_pixel(4, 4), Rgb([40, 40, 40]));
    }
}
