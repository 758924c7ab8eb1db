use sequoia_shared::WorldRect;

use crate::config::VIEW_PAN_EPSILON;

/// Screen-space rectangle; same corner layout as [`WorldRect`].
pub type ScreenRect = WorldRect;

/// Viewport manages the pan/zoom transformation from world coordinates to screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

const MIN_SCALE: f64 = 0.05;
const MAX_SCALE: f64 = 8.0;
const ZOOM_SENSITIVITY: f64 = 0.001;

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub const fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            scale,
        }
    }

    /// Convert world coordinates to screen coordinates.
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        (
            wx * self.scale + self.offset_x,
            wy * self.scale + self.offset_y,
        )
    }

    /// Convert screen coordinates to world coordinates.
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.offset_x) / self.scale,
            (sy - self.offset_y) / self.scale,
        )
    }

    /// Transform both corners of a world rectangle, keeping corner order.
    pub fn transform_rect(&self, rect: &WorldRect) -> ScreenRect {
        let (x1, y1) = self.world_to_screen(rect.x1, rect.y1);
        let (x2, y2) = self.world_to_screen(rect.x2, rect.y2);
        ScreenRect::new(x1, y1, x2, y2)
    }

    /// World-space rectangle currently covered by a `width` x `height` screen.
    pub fn visible_world_rect(&self, width: f64, height: f64) -> WorldRect {
        let (x1, y1) = self.screen_to_world(0.0, 0.0);
        let (x2, y2) = self.screen_to_world(width, height);
        WorldRect::new(x1, y1, x2, y2)
    }

    /// Zoom toward a focus point (screen coordinates).
    pub fn zoom_at(&mut self, delta: f64, screen_x: f64, screen_y: f64) {
        let factor = (-delta * ZOOM_SENSITIVITY).exp();
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / self.scale;

        // Adjust offset so the point under the cursor stays fixed
        self.offset_x = screen_x - (screen_x - self.offset_x) * ratio;
        self.offset_y = screen_y - (screen_y - self.offset_y) * ratio;
        self.scale = new_scale;
    }

    /// Pan by screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Fit the viewport to show the given world-coordinate bounds with padding.
    pub fn fit_bounds(&mut self, bounds: WorldRect, canvas_w: f64, canvas_h: f64) {
        let world_w = bounds.right() - bounds.left();
        let world_h = bounds.bottom() - bounds.top();

        if world_w <= 0.0 || world_h <= 0.0 || canvas_w <= 0.0 || canvas_h <= 0.0 {
            return;
        }

        let padding = 0.05;
        let scale_x = canvas_w / (world_w * (1.0 + padding * 2.0));
        let scale_y = canvas_h / (world_h * (1.0 + padding * 2.0));
        self.scale = scale_x.min(scale_y).clamp(MIN_SCALE, MAX_SCALE);

        let (center_x, center_y) = bounds.midpoint();
        self.offset_x = canvas_w / 2.0 - center_x * self.scale;
        self.offset_y = canvas_h / 2.0 - center_y * self.scale;
    }
}

/// The view a frame was built for: transform plus surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub viewport: Viewport,
    pub width: u32,
    pub height: u32,
}

impl ViewState {
    /// True when culling could differ between the two views.
    pub fn differs_from(&self, other: &ViewState) -> bool {
        self.viewport.scale != other.viewport.scale
            || (self.viewport.offset_x - other.viewport.offset_x).abs() > VIEW_PAN_EPSILON
            || (self.viewport.offset_y - other.viewport.offset_y).abs() > VIEW_PAN_EPSILON
            || self.width != other.width
            || self.height != other.height
    }
}

#[cfg(test)]
mod tests {
    use sequoia_shared::WorldRect;

    use super::{ViewState, Viewport};

    fn view(scale: f64, x: f64, y: f64, w: u32, h: u32) -> ViewState {
        ViewState {
            viewport: Viewport::new(scale, x, y),
            width: w,
            height: h,
        }
    }

    #[test]
    fn world_screen_roundtrip() {
        let vp = Viewport::new(2.0, 10.0, -5.0);
        let (sx, sy) = vp.world_to_screen(3.0, 4.0);
        assert_eq!((sx, sy), (16.0, 3.0));
        assert_eq!(vp.screen_to_world(sx, sy), (3.0, 4.0));
    }

    #[test]
    fn transform_rect_keeps_corner_order() {
        let vp = Viewport::new(0.5, 100.0, 50.0);
        let r = vp.transform_rect(&WorldRect::new(0.0, 0.0, 100.0, 200.0));
        assert_eq!(r, WorldRect::new(100.0, 50.0, 150.0, 150.0));
    }

    #[test]
    fn zoom_keeps_focus_point_fixed() {
        let mut vp = Viewport::new(1.0, 0.0, 0.0);
        let before = vp.screen_to_world(400.0, 300.0);
        vp.zoom_at(-500.0, 400.0, 300.0);
        let after = vp.screen_to_world(400.0, 300.0);
        assert!(vp.scale > 1.0);
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn fit_bounds_centers_world() {
        let mut vp = Viewport::default();
        vp.fit_bounds(WorldRect::new(0.0, 0.0, 1000.0, 1000.0), 800.0, 800.0);
        let (cx, cy) = vp.world_to_screen(500.0, 500.0);
        assert!((cx - 400.0).abs() < 1e-9);
        assert!((cy - 400.0).abs() < 1e-9);
    }

    #[test]
    fn sub_pixel_pans_do_not_count() {
        let a = view(1.0, 0.0, 0.0, 800, 600);
        assert!(!a.differs_from(&view(1.0, 0.05, -0.05, 800, 600)));
        assert!(a.differs_from(&view(1.02, 0.0, 0.0, 800, 600)));
        assert!(a.differs_from(&view(1.0, 0.0, 0.2, 800, 600)));
        assert!(a.differs_from(&view(1.0, 0.0, 0.0, 801, 600)));
    }

    #[test]
    fn tiny_zoom_steps_count() {
        // At world x = 1000 a 0.005 scale step shifts geometry by 5 px.
        let a = view(0.8, 0.0, 0.0, 800, 600);
        assert!(a.differs_from(&view(0.795, 0.0, 0.0, 800, 600)));
    }

    #[test]
    fn pan_moves_offset_in_screen_pixels() {
        let mut vp = Viewport::new(2.0, 10.0, 20.0);
        vp.pan(-5.0, 3.0);
        assert_eq!(vp.world_to_screen(0.0, 0.0), (5.0, 23.0));
    }
}
