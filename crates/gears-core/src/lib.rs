//! Core of the spinning gears smoke test
//!
//! - [`gear`] - procedural gear mesh generation
//! - [`mesh`] - generated mesh data and bounds
//! - [`scene`] - gear instances, view transform and the animation driver
//! - [`render`] - draw-call boundary consumed by a rasterizer
//! - [`golden`] - golden-image frame capture and comparison
//! - [`config`] - RON scene configuration
//! - [`stl`] - STL export of a posed scene

pub mod config;
pub mod constants;
pub mod gear;
pub mod golden;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod stl;

pub use config::{ConfigError, GearSpec, SceneConfig};
pub use gear::{GearBuilder, GearParams, gear, generate_gear_mesh};
pub use golden::{
    FailReason, FrameRate, FrameRateCounter, FrameStatus, GoldenConfig, GoldenError,
    GoldenHarness, GoldenMode, Verdict,
};
pub use mesh::{BoundingBox, GearMesh, GearVertex};
pub use render::{CountingRenderer, DrawCall, GearRenderer};
pub use scene::{
    Animation, AnimationConfig, GearInstance, Projection, Scene, ViewParams, ViewportConfig,
    run_frames,
};
pub use stl::StlError;
