use image::{GrayImage, Luma};

use crate::canvas::mapper::PixelRect;
use crate::error::Result;

/// Single mask convention across the crate: white marks the region the model
/// regenerates, black is preserved.
pub const MASK_EDIT: u8 = 255;
pub const MASK_KEEP: u8 = 0;

pub const MIN_BRUSH_RADIUS: u32 = 5;
pub const MAX_BRUSH_RADIUS: u32 = 50;
pub const DEFAULT_BRUSH_RADIUS: u32 = 20;

/// Off-screen mask bitmap. Supports freehand brush strokes and rectangular
/// fills; a fresh canvas per image prevents mask bleed-through between
/// unrelated images.
#[derive(Debug, Clone)]
pub struct MaskCanvas {
    mask: GrayImage,
    brush_radius: u32,
    painted: bool,
}

impl MaskCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            mask: GrayImage::from_pixel(width, height, Luma([MASK_KEEP])),
            brush_radius: DEFAULT_BRUSH_RADIUS,
            painted: false,
        }
    }

    pub fn with_brush_radius(mut self, radius: u32) -> Self {
        self.set_brush_radius(radius);
        self
    }

    pub fn set_brush_radius(&mut self, radius: u32) {
        self.brush_radius = radius.clamp(MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS);
    }

    pub fn brush_radius(&self) -> u32 {
        self.brush_radius
    }

    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    pub fn height(&self) -> u32 {
        self.mask.height()
    }

    /// Pointer-down: stamp a filled brush disc.
    pub fn paint_point(&mut self, x: f64, y: f64) {
        stamp_disc(&mut self.mask, x, y, self.brush_radius as f64);
        self.painted = true;
    }

    /// Pointer-move while pressed: connect the previous point with a stroked
    /// segment plus a disc at the new point, so fast movement leaves no gaps.
    pub fn paint_stroke(&mut self, from: (f64, f64), to: (f64, f64)) {
        let radius = self.brush_radius as f64;
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = (dx * dx + dy * dy).sqrt();
        // Stamp spacing of half a radius keeps the segment solid.
        let steps = ((length / (radius / 2.0).max(1.0)).ceil() as u32).max(1);
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            stamp_disc(&mut self.mask, from.0 + dx * t, from.1 + dy * t, radius);
        }
        self.painted = true;
    }

    /// Fill a mapped selection rectangle as the edit region.
    pub fn fill_rect(&mut self, rect: &PixelRect) {
        let x_end = rect.x.saturating_add(rect.width).min(self.mask.width());
        let y_end = rect.y.saturating_add(rect.height).min(self.mask.height());
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                self.mask.put_pixel(x, y, Luma([MASK_EDIT]));
            }
        }
        if rect.width > 0 && rect.height > 0 {
            self.painted = true;
        }
    }

    /// True once any painting occurred since creation or the last clear.
    pub fn has_selection(&self) -> bool {
        self.painted
    }

    /// Reset to an all-keep bitmap.
    pub fn clear(&mut self) {
        for pixel in self.mask.pixels_mut() {
            *pixel = Luma([MASK_KEEP]);
        }
        self.painted = false;
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.mask
    }

    pub fn into_mask(self) -> GrayImage {
        self.mask
    }

    /// Emit the bitmap as a PNG data URI, the form the generation API takes.
    pub fn to_data_uri(&self) -> Result<String> {
        crate::imageops::encode_data_uri(&image::DynamicImage::ImageLuma8(self.mask.clone()))
    }
}

/// One-shot rectangular mask: keep everywhere, edit inside `rect`.
pub fn rect_mask(width: u32, height: u32, rect: &PixelRect) -> GrayImage {
    let mut canvas = MaskCanvas::new(width, height);
    canvas.fill_rect(rect);
    canvas.into_mask()
}

fn stamp_disc(mask: &mut GrayImage, cx: f64, cy: f64, radius: f64) {
    let x_min = ((cx - radius).floor().max(0.0)) as u32;
    let y_min = ((cy - radius).floor().max(0.0)) as u32;
    let x_max = ((cx + radius).ceil().min(mask.width() as f64 - 1.0)).max(0.0) as u32;
    let y_max = ((cy + radius).ceil().min(mask.height() as f64 - 1.0)).max(0.0) as u32;

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            if dx * dx + dy * dy <= radius * radius {
                mask.put_pixel(x, y, Luma([MASK_EDIT]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(mask: &GrayImage, x: u32, y: u32) -> u8 {
        mask.get_pixel(x, y)[0]
    }

    #[test]
    fn test_new_canvas_is_all_keep() {
        let canvas = MaskCanvas::new(64, 32);
        assert!(!canvas.has_selection());
        assert!(canvas.as_image().pixels().all(|p| p[0] == MASK_KEEP));
    }

    #[test]
    fn test_paint_point_stamps_disc() {
        let mut canvas = MaskCanvas::new(100, 100).with_brush_radius(10);
        canvas.paint_point(50.0, 50.0);

        assert!(canvas.has_selection());
        assert_eq!(pixel(canvas.as_image(), 50, 50), MASK_EDIT);
        assert_eq!(pixel(canvas.as_image(), 58, 50), MASK_EDIT);
        // Outside the radius stays untouched.
        assert_eq!(pixel(canvas.as_image(), 75, 50), MASK_KEEP);
    }

    #[test]
    fn test_stroke_leaves_no_gap_between_distant_points() {
        let mut canvas = MaskCanvas::new(200, 40).with_brush_radius(5);
        canvas.paint_point(10.0, 20.0);
        canvas.paint_stroke((10.0, 20.0), (190.0, 20.0));

        // Every column along the stroke path must be covered.
        for x in 10..=190 {
            assert_eq!(pixel(canvas.as_image(), x, 20), MASK_EDIT, "gap at x={}", x);
        }
    }

    #[test]
    fn test_brush_radius_clamped_to_allowed_range() {
        let mut canvas = MaskCanvas::new(10, 10);
        canvas.set_brush_radius(2);
        assert_eq!(canvas.brush_radius(), MIN_BRUSH_RADIUS);
        canvas.set_brush_radius(500);
        assert_eq!(canvas.brush_radius(), MAX_BRUSH_RADIUS);
    }

    #[test]
    fn test_rect_mask_polarity() {
        let rect = PixelRect {
            x: 4,
            y: 4,
            width: 8,
            height: 8,
        };
        let mask = rect_mask(32, 32, &rect);
        assert_eq!(pixel(&mask, 0, 0), MASK_KEEP);
        assert_eq!(pixel(&mask, 5, 5), MASK_EDIT);
        assert_eq!(pixel(&mask, 11, 11), MASK_EDIT);
        assert_eq!(pixel(&mask, 12, 12), MASK_KEEP);
    }

    #[test]
    fn test_fill_rect_overhanging_edge_is_clipped() {
        let mut canvas = MaskCanvas::new(16, 16);
        canvas.fill_rect(&PixelRect {
            x: 12,
            y: 12,
            width: 10,
            height: 10,
        });
        assert_eq!(pixel(canvas.as_image(), 15, 15), MASK_EDIT);
    }

    #[test]
    fn test_clear_resets_between_images() {
        let mut canvas = MaskCanvas::new(50, 50);
        canvas.paint_point(25.0, 25.0);
        canvas.clear();

        assert!(!canvas.has_selection());
        assert!(canvas.as_image().pixels().all(|p| p[0] == MASK_KEEP));
    }
}
