use serde::{Deserialize, Serialize};

/// A user-drawn rectangle in display (CSS pixel) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Selection {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalize a drag gesture into a selection with non-negative extent,
    /// whichever direction the pointer moved.
    pub fn from_drag(start: (f64, f64), current: (f64, f64)) -> Self {
        Self {
            x: start.0.min(current.0),
            y: start.1.min(current.1),
            width: (current.0 - start.0).abs(),
            height: (current.1 - start.1).abs(),
        }
    }

    /// Clamp the selection into the container, shrinking it where it
    /// overhangs an edge.
    pub fn clamp_to(&self, bounds: &DisplaySize) -> Self {
        let x = self.x.clamp(0.0, bounds.width);
        let y = self.y.clamp(0.0, bounds.height);
        Self {
            x,
            y,
            width: self.width.min(bounds.width - x),
            height: self.height.min(bounds.height - y),
        }
    }
}

/// Rendered size of the image element on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An integer rectangle in true image-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Maps display-space coordinates to true pixel coordinates with independent
/// X/Y scale factors. Identity when the rendered size equals the bitmap size.
#[derive(Debug, Clone, Copy)]
pub struct ScaleMap {
    scale_x: f64,
    scale_y: f64,
    target: (u32, u32),
}

impl ScaleMap {
    pub fn new(displayed: DisplaySize, natural: (u32, u32)) -> Self {
        Self {
            scale_x: natural.0 as f64 / displayed.width,
            scale_y: natural.1 as f64 / displayed.height,
            target: natural,
        }
    }

    /// Compose with a later normalization resize: selections mapped through
    /// the result land in the resized image's pixel space.
    pub fn then_resize(mut self, resized: (u32, u32)) -> Self {
        self.scale_x *= resized.0 as f64 / self.target.0 as f64;
        self.scale_y *= resized.1 as f64 / self.target.1 as f64;
        self.target = resized;
        self
    }

    pub fn scale_factors(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// Map to integer pixel coordinates. Pure scaling with rounding; any
    /// clipping to the bitmap happens where the mask is rasterized.
    pub fn to_pixels(&self, selection: &Selection) -> PixelRect {
        PixelRect {
            x: (selection.x * self.scale_x).round() as u32,
            y: (selection.y * self.scale_y).round() as u32,
            width: (selection.width * self.scale_x).round() as u32,
            height: (selection.height * self.scale_y).round() as u32,
        }
    }

    /// Inverse mapping, used to place pixel-space results back on screen.
    pub fn to_display(&self, rect: &PixelRect) -> Selection {
        Selection {
            x: rect.x as f64 / self.scale_x,
            y: rect.y as f64 / self.scale_y,
            width: rect.width as f64 / self.scale_x,
            height: rect.height as f64 / self.scale_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_when_displayed_equals_natural() {
        let map = ScaleMap::new(DisplaySize::new(800.0, 600.0), (800, 600));
        let rect = map.to_pixels(&Selection::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(
            rect,
            PixelRect {
                x: 10,
                y: 20,
                width: 30,
                height: 40
            }
        );
    }

    #[test]
    fn test_upload_scenario_factor_four() {
        // 2000x500 bitmap rendered at 500x125: both axes scale by 4.
        let map = ScaleMap::new(DisplaySize::new(500.0, 125.0), (2000, 500));
        let rect = map.to_pixels(&Selection::new(100.0, 50.0, 200.0, 100.0));
        assert_eq!(
            rect,
            PixelRect {
                x: 400,
                y: 200,
                width: 800,
                height: 400
            }
        );
    }

    #[test]
    fn test_round_trip_within_one_pixel() {
        let map = ScaleMap::new(DisplaySize::new(333.0, 217.0), (1280, 720));
        let selection = Selection::new(12.5, 34.25, 101.75, 55.5);
        let rect = map.to_pixels(&selection);
        let back = map.to_display(&rect);
        let (sx, sy) = map.scale_factors();
        assert!((back.x - selection.x).abs() <= 1.0 / sx.min(1.0));
        assert!((back.y - selection.y).abs() <= 1.0 / sy.min(1.0));
        assert!((back.width - selection.width).abs() <= 1.0 / sx.min(1.0));
        assert!((back.height - selection.height).abs() <= 1.0 / sy.min(1.0));
    }

    #[test]
    fn test_then_resize_composes_scales() {
        // Selection taken on a 500x125 render of a 2000x500 image that was
        // later normalized down to 1000x250.
        let map = ScaleMap::new(DisplaySize::new(500.0, 125.0), (2000, 500)).then_resize((1000, 250));
        let rect = map.to_pixels(&Selection::new(100.0, 50.0, 200.0, 100.0));
        assert_eq!(
            rect,
            PixelRect {
                x: 200,
                y: 100,
                width: 400,
                height: 200
            }
        );
    }

    #[test]
    fn test_overhanging_selection_maps_unclipped() {
        // The mapper scales, it does not clip; rasterization clips.
        let map = ScaleMap::new(DisplaySize::new(100.0, 100.0), (200, 200));
        let rect = map.to_pixels(&Selection::new(90.0, 90.0, 50.0, 50.0));
        assert_eq!(
            rect,
            PixelRect {
                x: 180,
                y: 180,
                width: 100,
                height: 100
            }
        );

        let mask = crate::canvas::rect_mask(200, 200, &rect);
        assert_eq!(mask.get_pixel(199, 199)[0], crate::canvas::MASK_EDIT);
        assert_eq!(mask.get_pixel(179, 179)[0], crate::canvas::MASK_KEEP);
    }

    #[test]
    fn test_from_drag_normalizes_direction() {
        let selection = Selection::from_drag((50.0, 60.0), (10.0, 20.0));
        assert_eq!(selection.x, 10.0);
        assert_eq!(selection.y, 20.0);
        assert_eq!(selection.width, 40.0);
        assert_eq!(selection.height, 40.0);
    }

    #[test]
    fn test_clamp_to_container() {
        let bounds = DisplaySize::new(500.0, 300.0);
        let clamped = Selection::new(450.0, -10.0, 100.0, 100.0).clamp_to(&bounds);
        assert_eq!(clamped.x, 450.0);
        assert_eq!(clamped.y, 0.0);
        assert_eq!(clamped.width, 50.0);
        assert!(clamped.y + clamped.height <= 300.0);
    }
}
