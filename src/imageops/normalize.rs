use image::{imageops::FilterType, DynamicImage, GrayImage};

use crate::config::DimensionBounds;

/// Result of normalizing an input image against model dimension constraints.
#[derive(Debug)]
pub struct Normalized {
    pub image: DynamicImage,
    pub original: (u32, u32),
    pub resized: bool,
}

impl Normalized {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// Compute the dimensions an image must be resized to, or `None` when it
/// already satisfies the bounds.
///
/// Below-minimum inputs are scaled up with the shorter-side-first rule: the
/// shorter side is brought to the minimum, then the other side is re-checked
/// and bumped again if rounding left it short. Above-maximum inputs are
/// scaled to fit inside the bound, never upscaled. When both bounds could
/// apply the minimum wins, matching the upstream model's hard requirement.
pub fn target_dimensions(width: u32, height: u32, bounds: &DimensionBounds) -> Option<(u32, u32)> {
    if let Some(min) = bounds.min {
        if width < min || height < min {
            let aspect = width as f64 / height as f64;
            let (mut target_w, mut target_h);
            if width < height {
                target_w = min as f64;
                target_h = (target_w / aspect).round();
                if target_h < min as f64 {
                    target_h = min as f64;
                    target_w = (target_h * aspect).round();
                }
            } else {
                target_h = min as f64;
                target_w = (target_h * aspect).round();
                if target_w < min as f64 {
                    target_w = min as f64;
                    target_h = (target_w / aspect).round();
                }
            }
            return Some((target_w as u32, target_h as u32));
        }
    }

    if let Some(max) = bounds.max {
        if width > max || height > max {
            let scale = (max as f64 / width as f64).min(max as f64 / height as f64);
            let target_w = ((width as f64 * scale).round() as u32).max(1);
            let target_h = ((height as f64 * scale).round() as u32).max(1);
            return Some((target_w, target_h));
        }
    }

    None
}

/// Resize an input image to satisfy the bounds, recording the original
/// dimensions so output can later be restored to them.
pub fn normalize(image: DynamicImage, bounds: &DimensionBounds) -> Normalized {
    let original = (image.width(), image.height());
    match target_dimensions(original.0, original.1, bounds) {
        Some((width, height)) => {
            log::info!(
                "Resizing image {}x{} -> {}x{} to meet model constraints",
                original.0,
                original.1,
                width,
                height
            );
            Normalized {
                image: image.resize_exact(width, height, FilterType::Lanczos3),
                original,
                resized: true,
            }
        }
        None => Normalized {
            image,
            original,
            resized: false,
        },
    }
}

/// Bring the mask to the (resized) image dimensions. Only called when the
/// image actually changed size; nearest-neighbor keeps the mask binary.
pub fn resize_mask_to(mask: &GrayImage, dimensions: (u32, u32)) -> GrayImage {
    image::imageops::resize(mask, dimensions.0, dimensions.1, FilterType::Nearest)
}

/// Resize a generated output back to the caller's original input dimensions.
pub fn restore(image: DynamicImage, original: (u32, u32)) -> DynamicImage {
    if (image.width(), image.height()) == original {
        return image;
    }
    image.resize_exact(original.0, original.1, FilterType::Lanczos3)
}
