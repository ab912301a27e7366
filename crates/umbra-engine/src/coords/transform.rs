use super::Vec2;

/// Translation + rotation + uniform-per-axis scale for placing shadow casters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform2d {
    pub translation: Vec2,
    /// Counter-clockwise rotation in radians.
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform2d {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2d {
    pub const IDENTITY: Transform2d = Transform2d {
        translation: Vec2::zero(),
        rotation: 0.0,
        scale: Vec2::splat(1.0),
    };

    #[inline]
    pub fn from_translation(translation: Vec2) -> Self {
        Self { translation, ..Self::IDENTITY }
    }

    #[inline]
    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    #[inline]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Applies scale, then rotation, then translation.
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let scaled = Vec2::new(p.x * self.scale.x, p.y * self.scale.y);
        scaled.rotated(self.rotation) + self.translation
    }
}
