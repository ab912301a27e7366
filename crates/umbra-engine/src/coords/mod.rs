//! Coordinate and geometry types shared by the lighting model and renderers.
//!
//! Canonical CPU space:
//! - World units, origin at the camera-independent world origin
//! - +X right, +Y up
//!
//! `Camera2d` maps world positions to clip space; shaders receive clip-space
//! positions directly.

mod camera;
mod transform;
mod vec2;
mod viewport;

pub use camera::Camera2d;
pub use transform::Transform2d;
pub use vec2::Vec2;
pub use viewport::Viewport;
