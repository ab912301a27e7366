//! Umbra engine crate.
//!
//! 2D lighting with shadow masks: a CPU model of every pass (`lighting`), the
//! wgpu passes themselves (`render::lighting`), and the platform + GPU runtime
//! used to host them.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod lighting;
pub mod render;
