//! Geometric augmentation steps: flip, rotation and zoom with crop-or-pad.

use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{self, Interpolation};

use super::error::PipelineResult;
use super::resize::{center_crop, resize_exact};

/// Fill for canvas areas uncovered by rotation
const ROTATION_FILL: Rgb<u8> = Rgb([0, 0, 0]);

pub fn flip_horizontal(img: &mut RgbImage) {
    image::imageops::flip_horizontal_in_place(img);
}

/// Rotate about the image center keeping the canvas size.
///
/// Positive angles rotate counter-clockwise. Corners uncovered by the rotation
/// are filled with black.
pub fn rotate_about_center(img: &RgbImage, angle_degrees: f32) -> RgbImage {
    if angle_degrees.abs() < f32::EPSILON {
        return img.clone();
    }

    // imageproc rotates clockwise for positive theta
    geometric_transformations::rotate_about_center(
        img,
        -angle_degrees.to_radians(),
        Interpolation::Bilinear,
        ROTATION_FILL,
    )
}

/// How the zoom step reaches the target size again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomPlan {
    /// Zoomed side is larger; take the centered `size` window
    Crop { zoomed: u32 },
    /// Zoomed side is smaller; reflect-pad `before` and `after` pixels on each axis
    Pad { zoomed: u32, before: u32, after: u32 },
    /// Zoom rounds back to the same size
    Unchanged,
}

pub fn plan_zoom(size: u32, zoom: f32) -> ZoomPlan {
    let zoomed = ((size as f32) * zoom).round().max(1.0) as u32;

    if zoomed > size {
        ZoomPlan::Crop { zoomed }
    } else if zoomed < size {
        let before = (size - zoomed) / 2;
        let after = size - zoomed - before;
        ZoomPlan::Pad { zoomed, before, after }
    } else {
        ZoomPlan::Unchanged
    }
}

/// Scale a square `size`x`size` image by `zoom`, then center-crop or reflect-pad
/// back to `size`x`size`.
pub fn zoom_crop_or_pad(img: &RgbImage, zoom: f32) -> PipelineResult<RgbImage> {
    let (width, height) = img.dimensions();
    let size = width.max(height);

    match plan_zoom(size, zoom) {
        ZoomPlan::Unchanged => Ok(img.clone()),
        ZoomPlan::Crop { zoomed } => {
            let scaled = resize_exact(img, zoomed, zoomed)?;
            center_crop(&scaled, size, size)
        }
        ZoomPlan::Pad { zoomed, before, after } => {
            let scaled = resize_exact(img, zoomed, zoomed)?;
            Ok(reflect_pad(&scaled, before, after, before, after))
        }
    }
}

/// Mirror index `i` into `0..len`, repeating the edge pixel (`cba|abc|cba`).
fn reflect_index(i: i64, len: i64) -> u32 {
    let period = 2 * len;
    let m = i.rem_euclid(period);
    if m < len {
        m as u32
    } else {
        (period - 1 - m) as u32
    }
}

/// Pad by mirroring the border pixels outward.
///
/// Pads wider than the image keep reflecting, so every output pixel is taken
/// from the source.
pub fn reflect_pad(img: &RgbImage, top: u32, bottom: u32, left: u32, right: u32) -> RgbImage {
    let (width, height) = img.dimensions();
    let out_width = width + left + right;
    let out_height = height + top + bottom;

    if width == 0 || height == 0 {
        return RgbImage::new(out_width, out_height);
    }

    RgbImage::from_fn(out_width, out_height, |x, y| {
        let src_x = reflect_index(x as i64 - left as i64, width as i64);
        let src_y = reflect_index(y as i64 - top as i64, height as i64);
        *img.get_pixel(src_x, src_y)
    })
}
