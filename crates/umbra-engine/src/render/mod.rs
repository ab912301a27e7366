//! GPU rendering subsystem.
//!
//! Renderers record wgpu passes into a caller-owned command encoder. Each
//! renderer is responsible for its own GPU resources (pipelines, buffers,
//! intermediate targets) and recreates them lazily when formats or sizes change.
//!
//! Convention:
//! - CPU geometry arrives already in clip space (see `coords::Camera2d`).
//! - Intermediate targets match the surface size in physical pixels.

mod ctx;
pub mod lighting;

pub use ctx::{RenderCtx, RenderTarget};
