//! Gear scene: instances, view and projection, frame loop

mod animation;

use std::ops::ControlFlow;

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use crate::constants::view;
use crate::gear::generate_gear_mesh;
use crate::mesh::{BoundingBox, GearMesh};
use crate::render::{DrawCall, GearRenderer};

pub use animation::{Animation, AnimationConfig};

/// One gear in the scene, owning its mesh
#[derive(Debug, Clone)]
pub struct GearInstance {
    pub name: String,
    mesh: GearMesh,
    /// Translation of the gear center
    pub position: Vec3,
    /// Instance rotation is `rotation_scale * angle + rotation_offset` degrees
    pub rotation_scale: f32,
    pub rotation_offset: f32,
}

impl GearInstance {
    pub fn new(name: impl Into<String>, mesh: GearMesh, position: Vec3) -> Self {
        Self {
            name: name.into(),
            mesh,
            position,
            rotation_scale: 1.0,
            rotation_offset: 0.0,
        }
    }

    pub fn with_rotation(mut self, scale: f32, offset: f32) -> Self {
        self.rotation_scale = scale;
        self.rotation_offset = offset;
        self
    }

    pub fn mesh(&self) -> &GearMesh {
        &self.mesh
    }

    /// Rotation about Z, in degrees, for a scene angle
    pub fn rotation_degrees(&self, angle: f32) -> f32 {
        self.rotation_scale * angle + self.rotation_offset
    }

    /// Translation followed by rotation about the gear axis
    pub fn model_matrix(&self, angle: f32) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_z(self.rotation_degrees(angle).to_radians())
    }
}

/// Camera orientation around the scene, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewParams {
    pub rot_x: f32,
    pub rot_y: f32,
    pub rot_z: f32,
    /// Distance from the eye to the scene origin
    pub distance: f32,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            rot_x: view::ROT_X,
            rot_y: view::ROT_Y,
            rot_z: view::ROT_Z,
            distance: view::DISTANCE,
        }
    }
}

impl ViewParams {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
            * Mat4::from_rotation_x(self.rot_x.to_radians())
            * Mat4::from_rotation_y(self.rot_y.to_radians())
            * Mat4::from_rotation_z(self.rot_z.to_radians())
    }
}

/// Render target size and clip planes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
    pub near: f32,
    pub far: f32,
    /// Background clear color (RGBA)
    pub clear_color: [f32; 4],
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: view::WIDTH,
            height: view::HEIGHT,
            near: view::NEAR,
            far: view::FAR,
            clear_color: view::CLEAR_COLOR,
        }
    }
}

impl ViewportConfig {
    /// Size of one RGBA8 frame in bytes
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Projection matrices
pub struct Projection;

impl Projection {
    /// Perspective matrix for the given clip volume (OpenGL conventions)
    pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let x = 2.0 * near / (right - left);
        let y = 2.0 * near / (top - bottom);
        let a = (right + left) / (right - left);
        let b = (top + bottom) / (top - bottom);
        let c = -(far + near) / (far - near);
        let d = -(2.0 * far * near) / (far - near);
        Mat4::from_cols(
            Vec4::new(x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, y, 0.0, 0.0),
            Vec4::new(a, b, c, -1.0),
            Vec4::new(0.0, 0.0, d, 0.0),
        )
    }

    /// Unit-width frustum with the height scaled by the aspect ratio
    pub fn for_viewport(viewport: &ViewportConfig) -> Mat4 {
        let h = viewport.height as f32 / viewport.width as f32;
        Self::frustum(-1.0, 1.0, -h, h, viewport.near, viewport.far)
    }
}

/// Gears, view and viewport of one rendering session
#[derive(Debug, Clone)]
pub struct Scene {
    gears: Vec<GearInstance>,
    pub view: ViewParams,
    pub viewport: ViewportConfig,
}

impl Default for Scene {
    fn default() -> Self {
        Self::classic()
    }
}

impl Scene {
    /// Create an empty scene
    pub fn new(view: ViewParams, viewport: ViewportConfig) -> Self {
        Self {
            gears: Vec::new(),
            view,
            viewport,
        }
    }

    /// The three interlocking red, green and blue gears
    pub fn classic() -> Self {
        Self::from_config(&SceneConfig::default())
    }

    /// Build every gear mesh described by the configuration
    pub fn from_config(config: &SceneConfig) -> Self {
        let mut scene = Self::new(config.view, config.viewport);
        for spec in &config.gears {
            let mesh = generate_gear_mesh(&spec.params, spec.color);
            scene.add_gear(
                GearInstance::new(spec.name.clone(), mesh, Vec3::from(spec.position))
                    .with_rotation(spec.rotation_scale, spec.rotation_offset),
            );
        }
        tracing::info!(
            "Scene built: {} gears, {} triangles",
            scene.gears.len(),
            scene.triangle_count()
        );
        scene
    }

    pub fn add_gear(&mut self, gear: GearInstance) {
        self.gears.push(gear);
    }

    pub fn gears(&self) -> &[GearInstance] {
        &self.gears
    }

    pub fn triangle_count(&self) -> usize {
        self.gears.iter().map(|g| g.mesh().triangle_count()).sum()
    }

    pub fn projection(&self) -> Mat4 {
        Projection::for_viewport(&self.viewport)
    }

    /// Issue one frame of draw calls at the given scene angle
    pub fn render<R: GearRenderer + ?Sized>(&self, angle: f32, renderer: &mut R) {
        let view = self.view.view_matrix();
        renderer.begin_frame(self.projection(), self.viewport.clear_color);
        for gear in &self.gears {
            renderer.draw(&DrawCall::new(gear.mesh(), gear.model_matrix(angle), view));
        }
        renderer.end_frame();
    }

    /// World-space bounds of all gears at the given angle (view not applied)
    pub fn bounds(&self, angle: f32) -> BoundingBox {
        self.gears
            .iter()
            .map(|g| g.mesh().bounds().transform(&g.model_matrix(angle)))
            .fold(BoundingBox::empty(), |acc, b| acc.union(&b))
    }
}

/// Run the frame loop: advance, render, then hand the frame to `on_frame`
///
/// `on_frame` receives the zero-based frame number and the angle just drawn;
/// returning [`ControlFlow::Break`] stops the loop. With `max_frames == None`
/// the loop only ends on a break. Returns the number of frames rendered.
pub fn run_frames<R, F>(
    scene: &Scene,
    animation: &mut Animation,
    renderer: &mut R,
    max_frames: Option<u64>,
    mut on_frame: F,
) -> u64
where
    R: GearRenderer + ?Sized,
    F: FnMut(u64, f32) -> ControlFlow<()>,
{
    let mut frame = 0;
    while max_frames.is_none_or(|max| frame < max) {
        let angle = animation.advance();
        scene.render(angle, renderer);
        let flow = on_frame(frame, angle);
        frame += 1;
        if flow.is_break() {
            break;
        }
    }
    frame
}
