use glam::Vec2;

/// Horizontal span of the normalized cursor (left edge -1.5, right edge 1.5).
const CURSOR_SPAN_X: f32 = 3.0;
/// Vertical span of the normalized cursor (bottom -1, top 1).
const CURSOR_SPAN_Y: f32 = 2.0;

/// Window dimensions, clamped pixel ratio, and normalized cursor.
///
/// Width and height are logical pixels. A zero dimension is accepted; the
/// cursor then divides by zero and comes out non-finite.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    width: f32,
    height: f32,
    pixel_ratio: f32,
    max_pixel_ratio: f32,
    cursor: Vec2,
}

impl ViewportState {
    pub fn new(max_pixel_ratio: f32) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            pixel_ratio: 1.0,
            max_pixel_ratio,
            cursor: Vec2::ZERO,
        }
    }

    /// Store new dimensions and the device pixel ratio, capped at the
    /// configured maximum. Non-positive or non-finite ratios count as 1.
    pub fn recompute(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        self.pixel_ratio = ratio.min(self.max_pixel_ratio);
    }

    /// Convert a pointer position in logical pixels into the normalized
    /// range about the viewport center, y pointing up.
    pub fn update_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Vec2::new(
            (x / self.width - 0.5) * CURSOR_SPAN_X,
            -(y / self.height - 0.5) * CURSOR_SPAN_Y,
        );
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Width over height, 1.0 for a degenerate viewport.
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Render buffer size in physical pixels, never below 1x1.
    pub fn buffer_size(&self) -> (u32, u32) {
        let w = (self.width * self.pixel_ratio).round().max(1.0) as u32;
        let h = (self.height * self.pixel_ratio).round().max(1.0) as u32;
        (w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(w: f32, h: f32, ratio: f32) -> ViewportState {
        let mut vp = ViewportState::new(2.0);
        vp.recompute(w, h, ratio);
        vp
    }

    #[test]
    fn pixel_ratio_is_capped_at_two() {
        assert_eq!(viewport(800.0, 600.0, 3.0).pixel_ratio(), 2.0);
        assert_eq!(viewport(800.0, 600.0, 2.0).pixel_ratio(), 2.0);
        assert_eq!(viewport(800.0, 600.0, 1.25).pixel_ratio(), 1.25);
    }

    #[test]
    fn bogus_pixel_ratio_falls_back_to_one() {
        assert_eq!(viewport(800.0, 600.0, 0.0).pixel_ratio(), 1.0);
        assert_eq!(viewport(800.0, 600.0, -2.0).pixel_ratio(), 1.0);
        assert_eq!(viewport(800.0, 600.0, f32::NAN).pixel_ratio(), 1.0);
    }

    #[test]
    fn cursor_maps_corners_and_center() {
        let mut vp = viewport(800.0, 600.0, 1.0);

        vp.update_cursor(400.0, 300.0);
        assert_eq!(vp.cursor(), Vec2::ZERO);

        vp.update_cursor(0.0, 0.0);
        assert_eq!(vp.cursor(), Vec2::new(-1.5, 1.0));

        vp.update_cursor(800.0, 600.0);
        assert_eq!(vp.cursor(), Vec2::new(1.5, -1.0));
    }

    #[test]
    fn cursor_stays_in_range_for_in_window_points() {
        let mut vp = viewport(1280.0, 720.0, 2.0);
        for i in 0..=20 {
            for j in 0..=20 {
                let x = 1280.0 * i as f32 / 20.0;
                let y = 720.0 * j as f32 / 20.0;
                vp.update_cursor(x, y);
                let c = vp.cursor();
                assert!((-1.5..=1.5).contains(&c.x), "x out of range: {c:?}");
                assert!((-1.0..=1.0).contains(&c.y), "y out of range: {c:?}");
            }
        }
    }

    #[test]
    fn zero_viewport_yields_non_finite_cursor() {
        let mut vp = viewport(0.0, 0.0, 1.0);
        vp.update_cursor(10.0, 10.0);
        assert!(!vp.cursor().is_finite());
        assert_eq!(vp.aspect(), 1.0);
        assert_eq!(vp.buffer_size(), (1, 1));
    }

    #[test]
    fn buffer_size_scales_by_pixel_ratio() {
        assert_eq!(viewport(800.0, 600.0, 1.5).buffer_size(), (1200, 900));
        assert_eq!(viewport(800.0, 600.0, 3.0).buffer_size(), (1600, 1200));
    }
}
