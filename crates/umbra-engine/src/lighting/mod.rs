//! CPU-side lighting model.
//!
//! Every GPU pass has a pure-function counterpart here so expected pixels can be
//! computed without a device. The renderer in `crate::render::lighting` feeds the
//! same types (`LightUniform`, `MaskVertex`, `FramePlan`) to wgpu.
//!
//! Accumulator channel layout while lights are in flight:
//! - R: shadow mask of the light being processed (1.0 = fully lit)
//! - G/B/A: accumulated light RGB, parked one channel to the right
//!
//! The final light un-parks G/B/A back into RGB and sets alpha to 1.0.

mod accumulator;
mod caster;
mod color;
mod error;
mod light;
mod occlusion;
mod plan;
mod reference;
mod shading;
mod shadow_geometry;

pub use accumulator::ChannelRing;
pub use caster::{Occluder, ShadowCaster};
pub use color::Rgba;
pub use error::LightingError;
pub use light::{LightSource, LightUniform};
pub use occlusion::{resolve_mask, segments_intersect, visibility_at};
pub use plan::{FramePlan, Pass};
pub use reference::shade_point;
pub use shading::{
    composite, light_accumulate, light_contribution, shadow_mask_fragment, shadow_mask_vertex,
    write_red, MaskVarying,
};
pub use shadow_geometry::{build_shadow_volume, MaskVertex};
