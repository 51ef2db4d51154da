//! Image preprocessing for ImageNet-style classifiers (MobileNetV2 and friends).
//!
//! The model expects:
//! - Input: a center-cropped square resized to `image_size × image_size`
//! - Normalization: per-channel `(pixel/255 - mean) / std` with ImageNet statistics
//! - Channel order: RGB
//! - Tensor layout: NCHW [batch, channels, height, width]

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use ndarray::Array4;

use crate::error::PipelineError;

/// Number of color channels (RGB).
const CHANNELS: usize = 3;

/// ImageNet per-channel mean.
const NORM_MEAN: [f32; CHANNELS] = [0.485, 0.456, 0.406];

/// ImageNet per-channel std.
const NORM_STD: [f32; CHANNELS] = [0.229, 0.224, 0.225];

/// Preprocess an image for classifier inference.
///
/// Crops the largest centered square, resizes it, converts to RGB and
/// normalizes. Fails with `Decode` when the image has no pixels to work with.
pub fn preprocess(image: &DynamicImage, image_size: u32) -> Result<Array4<f32>, PipelineError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || image_size == 0 {
        return Err(PipelineError::Decode {
            message: format!(
                "Cannot convert {width}x{height} image to {image_size}x{image_size} RGB tensor"
            ),
        });
    }

    let side = width.min(height);
    let cropped = image.crop_imm((width - side) / 2, (height - side) / 2, side, side);
    let resized = cropped.resize_exact(image_size, image_size, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let size = image_size as usize;
    let plane = size * size;
    let mut data = vec![0.0f32; CHANNELS * plane];
    for (i, pixel) in rgb.as_raw().chunks_exact(CHANNELS).enumerate() {
        for (c, &val) in pixel.iter().enumerate() {
            data[c * plane + i] = (val as f32 / 255.0 - NORM_MEAN[c]) / NORM_STD[c];
        }
    }

    Array4::from_shape_vec((1, CHANNELS, size, size), data).map_err(|e| PipelineError::Decode {
        message: format!("Failed to shape input tensor: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, RgbaImage};

    #[test]
    fn test_preprocess_shape() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        let tensor = preprocess(&img, 224).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_preprocess_normalization() {
        // White: (1.0 - 0.485) / 0.229 ≈ 2.249 in the red plane
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([255, 255, 255])));
        let tensor = preprocess(&img, 8).unwrap();
        assert!((tensor[[0, 0, 0, 0]] - 2.2489).abs() < 0.01);

        // Black: (0.0 - 0.406) / 0.225 ≈ -1.804 in the blue plane
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([0, 0, 0])));
        let tensor = preprocess(&img, 8).unwrap();
        assert!((tensor[[0, 2, 3, 3]] - (-1.8044)).abs() < 0.01);
    }

    #[test]
    fn test_preprocess_center_crops_wide_image() {
        // Left and right thirds red, middle third green: the crop keeps only green.
        let mut img = RgbImage::from_pixel(300, 100, Rgb([255, 0, 0]));
        for x in 100..200 {
            for y in 0..100 {
                img.put_pixel(x, y, Rgb([0, 255, 0]));
            }
        }
        let tensor = preprocess(&DynamicImage::ImageRgb8(img), 16).unwrap();
        let red_max = tensor
            .slice(ndarray::s![0, 0, .., ..])
            .iter()
            .cloned()
            .fold(f32::NEG_INFINITY, f32::max);
        // Red channel everywhere is 0 -> (0 - 0.485) / 0.229
        assert!((red_max - (-2.1179)).abs() < 0.05);
    }

    #[test]
    fn test_preprocess_drops_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(20, 20));
        let tensor = preprocess(&img, 8).unwrap();
        assert_eq!(tensor.shape()[1], 3);
    }

    #[test]
    fn test_preprocess_rejects_empty_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert!(matches!(
            preprocess(&img, 224),
            Err(PipelineError::Decode { .. })
        ));
    }
}
