//! Global constants for gears-core

/// Vertices emitted per tooth
pub const VERTICES_PER_TOOTH: usize = 40;

/// Triangles emitted per tooth
pub const TRIANGLES_PER_TOOTH: usize = 22;

/// Index entries emitted per tooth (3 per triangle)
pub const INDICES_PER_TOOTH: usize = TRIANGLES_PER_TOOTH * 3;

/// Largest tooth count whose vertices fit in a 16-bit index
pub const MAX_TEETH: u32 = (u16::MAX as u32 + 1) / VERTICES_PER_TOOTH as u32;

/// Material colors of the three classic gears (RGBA)
pub mod colors {
    pub const RED: [f32; 4] = [0.8, 0.1, 0.0, 1.0];
    pub const GREEN: [f32; 4] = [0.0, 0.8, 0.2, 1.0];
    pub const BLUE: [f32; 4] = [0.2, 0.2, 1.0, 1.0];
}

/// Animation defaults
pub mod animation {
    /// Rotation speed of the driving gear
    pub const DEGREES_PER_SECOND: f32 = 70.0;
    /// Nominal frame timestep in seconds
    pub const TIMESTEP: f32 = 0.01666;
    /// Accumulator wrap point in degrees
    pub const WRAP_DEGREES: f32 = 3600.0;
}

/// View and projection defaults
pub mod view {
    pub const ROT_X: f32 = 20.0;
    pub const ROT_Y: f32 = 30.0;
    pub const ROT_Z: f32 = 0.0;
    pub const DISTANCE: f32 = 40.0;
    pub const WIDTH: u32 = 600;
    pub const HEIGHT: u32 = 600;
    pub const NEAR: f32 = 5.0;
    pub const FAR: f32 = 200.0;
    pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];
}

/// Golden-image harness defaults
pub mod golden {
    pub const DIR: &str = "golden_images";
    pub const APP_NAME: &str = "glesgears";
    /// Frames between two captured images
    pub const INTERVAL: u64 = 60;
    /// Index of the last image written in generate mode
    pub const MAX_IMAGES: u64 = 10;
    /// Seconds between two frame-rate reports
    pub const FPS_REPORT_SECONDS: f64 = 5.0;
}
