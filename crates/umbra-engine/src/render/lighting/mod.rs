//! Shadow-mask lighting passes.
//!
//! Per frame, for `n` lights:
//! 1. clear accumulator A to `(1, ambient.rgb)`
//! 2. for each light: shadow mask into A (red only), accumulate A -> B, swap
//! 3. composite scene + accumulator onto the output target
//!
//! The pass order comes from `lighting::FramePlan` and is validated before
//! anything is recorded. Passes recorded into one encoder execute in order,
//! which is the only barrier the accumulator chain needs.

mod common;
mod composite;
mod config;
mod light_accum;
mod renderer;
mod shadow_mask;
mod targets;

pub use composite::CompositePass;
pub use config::{LightingConfig, MaskBlend};
pub use light_accum::LightAccumPass;
pub use renderer::{LightingFrame, LightingRenderer};
pub use shadow_mask::ShadowMaskPass;
pub use targets::AccumulationTargets;

/// WGSL sources, exposed for validation and for hosts that build their own pipelines.
pub mod shaders {
    pub const SHADOW_MASK_WGSL: &str = include_str!("shaders/shadow_mask.wgsl");
    pub const LIGHT_ACCUM_WGSL: &str = include_str!("shaders/light_accum.wgsl");
    pub const FULLSCREEN_WGSL: &str = include_str!("shaders/fullscreen.wgsl");
    pub const COMPOSITE_WGSL: &str = include_str!("shaders/composite.wgsl");

    /// The composite fragment stage linked with the fullscreen vertex stage.
    pub fn composite_module_source() -> String {
        format!("{FULLSCREEN_WGSL}\n{COMPOSITE_WGSL}")
    }
}
