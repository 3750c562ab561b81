//! Draw-call boundary between the scene and a rasterizer
//!
//! The scene never talks to a graphics API. Each frame it hands a
//! [`GearRenderer`] one [`DrawCall`] per gear; the renderer uploads
//! [`GearMesh::vertex_bytes`] / [`GearMesh::index_bytes`] however it likes.

use glam::Mat4;

use crate::mesh::GearMesh;

/// One gear instance to rasterize
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    /// Borrowed mesh (never mutated by the renderer)
    pub mesh: &'a GearMesh,
    /// Gear placement and rotation about Z
    pub model: Mat4,
    /// Scene view transform
    pub view: Mat4,
    /// Material color (RGBA)
    pub color: [f32; 4],
}

impl<'a> DrawCall<'a> {
    pub fn new(mesh: &'a GearMesh, model: Mat4, view: Mat4) -> Self {
        Self {
            mesh,
            model,
            view,
            color: mesh.color(),
        }
    }

    pub fn model_view(&self) -> Mat4 {
        self.view * self.model
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }
}

/// Consumer of per-frame draw calls
pub trait GearRenderer {
    /// Start a frame: clear the target and set the projection
    fn begin_frame(&mut self, projection: Mat4, clear_color: [f32; 4]);

    /// Rasterize one gear
    fn draw(&mut self, call: &DrawCall<'_>);

    /// Finish the frame (before present/swap)
    fn end_frame(&mut self) {}
}

/// Renderer that only counts what it is asked to draw
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CountingRenderer {
    pub frames: u64,
    pub draw_calls: u64,
    pub triangles: u64,
    /// Model-view matrices of the most recent frame
    pub last_frame: Vec<Mat4>,
}

impl GearRenderer for CountingRenderer {
    fn begin_frame(&mut self, _projection: Mat4, _clear_color: [f32; 4]) {
        self.last_frame.clear();
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        self.draw_calls += 1;
        self.triangles += call.triangle_count() as u64;
        self.last_frame.push(call.model_view());
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}
