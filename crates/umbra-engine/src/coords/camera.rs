use super::{Vec2, Viewport};

/// Orthographic 2D camera.
///
/// `center` is the world point shown at the middle of the viewport. `zoom`
/// scales world units to logical pixels (`2.0` shows everything twice as large).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2d {
    pub center: Vec2,
    pub zoom: f32,
}

impl Default for Camera2d {
    fn default() -> Self {
        Self { center: Vec2::zero(), zoom: 1.0 }
    }
}

impl Camera2d {
    #[inline]
    pub const fn new(center: Vec2, zoom: f32) -> Self {
        Self { center, zoom }
    }

    /// Half of the visible world extent on each axis.
    #[inline]
    pub fn half_extent(&self, viewport: Viewport) -> Vec2 {
        let zoom = if self.zoom > 0.0 { self.zoom } else { 1.0 };
        Vec2::new(viewport.width.max(1.0), viewport.height.max(1.0)) * (0.5 / zoom)
    }

    /// Maps a world position to clip space (`[-1, 1]` on both axes, +Y up).
    #[inline]
    pub fn to_clip(&self, point: Vec2, viewport: Viewport) -> Vec2 {
        let h = self.half_extent(viewport);
        let d = point - self.center;
        Vec2::new(d.x / h.x, d.y / h.y)
    }

    /// Maps a world direction to clip space; translation does not apply.
    #[inline]
    pub fn direction_to_clip(&self, dir: Vec2, viewport: Viewport) -> Vec2 {
        let h = self.half_extent(viewport);
        Vec2::new(dir.x / h.x, dir.y / h.y)
    }

    /// Inverse of [`to_clip`](Self::to_clip).
    #[inline]
    pub fn clip_to_world(&self, clip: Vec2, viewport: Viewport) -> Vec2 {
        let h = self.half_extent(viewport);
        self.center + Vec2::new(clip.x * h.x, clip.y * h.y)
    }

    /// Converts a logical-pixel cursor position (top-left origin, +Y down) to world space.
    pub fn screen_to_world(&self, screen: Vec2, viewport: Viewport) -> Vec2 {
        let w = viewport.width.max(1.0);
        let h = viewport.height.max(1.0);
        let clip = Vec2::new(screen.x / w * 2.0 - 1.0, 1.0 - screen.y / h * 2.0);
        self.clip_to_world(clip, viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn center_maps_to_origin() {
        let cam = Camera2d::new(Vec2::new(10.0, -4.0), 1.0);
        let vp = Viewport::new(200.0, 100.0);
        assert!(close(cam.to_clip(cam.center, vp), Vec2::zero()));
    }

    #[test]
    fn viewport_edges_map_to_unit_clip() {
        let cam = Camera2d::default();
        let vp = Viewport::new(200.0, 100.0);
        assert!(close(cam.to_clip(Vec2::new(100.0, 50.0), vp), Vec2::new(1.0, 1.0)));
        assert!(close(cam.to_clip(Vec2::new(-100.0, -50.0), vp), Vec2::new(-1.0, -1.0)));
    }

    #[test]
    fn zoom_shrinks_visible_extent() {
        let cam = Camera2d::new(Vec2::zero(), 2.0);
        let vp = Viewport::new(200.0, 100.0);
        assert!(close(cam.to_clip(Vec2::new(50.0, 25.0), vp), Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn directions_ignore_translation() {
        let cam = Camera2d::new(Vec2::new(300.0, 300.0), 1.0);
        let vp = Viewport::new(200.0, 100.0);
        assert!(close(cam.direction_to_clip(Vec2::new(100.0, 0.0), vp), Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn screen_corners_round_trip_through_clip() {
        let cam = Camera2d::new(Vec2::new(5.0, 5.0), 1.0);
        let vp = Viewport::new(200.0, 100.0);
        let top_left = cam.screen_to_world(Vec2::zero(), vp);
        assert!(close(cam.to_clip(top_left, vp), Vec2::new(-1.0, 1.0)));
    }
}
