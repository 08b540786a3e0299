use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;

use super::error::{PipelineError, PipelineResult};

/// Hard resize to exact dimensions with bilinear convolution.
///
/// Aspect ratio is not preserved. The result depends only on the input pixels
/// and the target size.
pub fn resize_exact(img: &RgbImage, width: u32, height: u32) -> PipelineResult<RgbImage> {
    let (src_width, src_height) = img.dimensions();

    if src_width == width && src_height == height {
        return Ok(img.clone());
    }

    if src_width == 0 || src_height == 0 {
        return Err(PipelineError::Resize("Source image has zero size".to_string()));
    }
    if width == 0 || height == 0 {
        return Err(PipelineError::Resize(format!(
            "Target size {}x{} has a zero dimension",
            width, height
        )));
    }

    let src_image = Image::from_vec_u8(src_width, src_height, img.as_raw().clone(), PixelType::U8x3)
        .map_err(|e| PipelineError::Resize(e.to_string()))?;

    let mut dst_image = Image::new(width, height, PixelType::U8x3);

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    let mut resizer = Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| PipelineError::Resize(e.to_string()))?;

    RgbImage::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
        PipelineError::Resize(format!("Resizer returned a short buffer for {}x{}", width, height))
    })
}

/// Crop an image to specified dimensions
pub fn crop_image(img: &RgbImage, x: u32, y: u32, width: u32, height: u32) -> PipelineResult<RgbImage> {
    let (img_width, img_height) = img.dimensions();

    if x + width > img_width || y + height > img_height {
        return Err(PipelineError::Resize(format!(
            "Crop dimensions exceed image bounds: crop({},{},{}x{}) on {}x{} image",
            x, y, width, height, img_width, img_height
        )));
    }

    Ok(image::imageops::crop_imm(img, x, y, width, height).to_image())
}

/// Extract the centered `width`x`height` region
pub fn center_crop(img: &RgbImage, width: u32, height: u32) -> PipelineResult<RgbImage> {
    let (src_width, src_height) = img.dimensions();
    let x = src_width.saturating_sub(width) / 2;
    let y = src_height.saturating_sub(height) / 2;
    crop_image(img, x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_test_image(width: u32, height: u32) -> RgbImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn test_crop_image() {
        let img = create_test_image(100, 100);
        let cropped = crop_image(&img, 10, 10, 50, 50).unwrap();

        assert_eq!(cropped.dimensions(), (50, 50));
        assert_eq!(img.get_pixel(15, 15), cropped.get_pixel(5, 5));
    }

    #[test]
    fn test_crop_bounds_validation() {
        let img = create_test_image(50, 50);

        assert!(crop_image(&img, 10, 10, 50, 50).is_err());
        assert!(crop_image(&img, 10, 10, 40, 40).is_ok());
    }

    #[test]
    fn test_center_crop_takes_middle() {
        let img = create_test_image(246, 246);
        let cropped = center_crop(&img, 224, 224).unwrap();

        assert_eq!(cropped.dimensions(), (224, 224));
        assert_eq!(cropped.get_pixel(0, 0), img.get_pixel(11, 11));
    }

    #[test]
    fn test_resize_exact_ignores_aspect_ratio() {
        for (w, h) in [(640, 480), (100, 300), (50, 50), (1, 7)] {
            let img = create_test_image(w, h);
            let resized = resize_exact(&img, 224, 224).unwrap();
            assert_eq!(resized.dimensions(), (224, 224));
        }
    }

    #[test]
    fn test_resize_is_deterministic() {
        let img = create_test_image(317, 181);
        let first = resize_exact(&img, 224, 224).unwrap();
        let second = resize_exact(&img, 224, 224).unwrap();

        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_resize_same_size_is_copy() {
        let img = create_test_image(224, 224);
        let resized = resize_exact(&img, 224, 224).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_rejects_zero_target() {
        let img = create_test_image(10, 10);
        assert!(matches!(resize_exact(&img, 0, 10), Err(PipelineError::Resize(_))));
    }
}
