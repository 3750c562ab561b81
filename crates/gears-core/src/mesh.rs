//! Generated gear mesh data

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

use crate::constants::{INDICES_PER_TOOTH, TRIANGLES_PER_TOOTH, VERTICES_PER_TOOTH};

/// Interleaved vertex record (position followed by normal)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GearVertex {
    /// Vertex position in gear-local space.
    pub position: [f32; 3],
    /// Vertex normal vector.
    pub normal: [f32; 3],
}

impl GearVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Triangulated gear wheel with a uniform material color
///
/// Built once by [`crate::gear::generate_gear_mesh`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GearMesh {
    pub(crate) vertices: Vec<GearVertex>,
    pub(crate) indices: Vec<u16>,
    pub(crate) color: [f32; 4],
    pub(crate) teeth: u32,
}

impl GearMesh {
    /// Tooth count the mesh was built for
    pub fn teeth(&self) -> u32 {
        self.teeth
    }

    pub fn vertices(&self) -> &[GearVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Material color (RGBA)
    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of index entries (three per triangle)
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Expected buffer sizes for a tooth count: (vertices, index entries)
    pub fn expected_sizes(teeth: u32) -> (usize, usize) {
        let teeth = teeth as usize;
        (teeth * VERTICES_PER_TOOTH, teeth * INDICES_PER_TOOTH)
    }

    /// Expected triangle count for a tooth count
    pub fn expected_triangles(teeth: u32) -> usize {
        teeth as usize * TRIANGLES_PER_TOOTH
    }

    /// Iterate over triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Positions as a parallel array
    pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    /// Normals as a parallel array (slot k describes position k)
    pub fn normals(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.vertices.iter().map(|v| v.normal)
    }

    /// Raw interleaved vertex data for buffer upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw 16-bit index data for buffer upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Axis-aligned bounds of all vertex positions
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.positions().map(Vec3::from))
    }
}

/// Axis-aligned box around gear geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Inverted box that any point or union replaces
    pub fn empty() -> Self {
        Self {
            min: Vec3::INFINITY,
            max: Vec3::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::empty(), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        })
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box enclosing this one after an affine transform
    pub fn transform(&self, transform: &Mat4) -> BoundingBox {
        if self.is_empty() {
            return *self;
        }
        let center = transform.transform_point3((self.min + self.max) * 0.5);
        let half = (self.max - self.min) * 0.5;
        let linear = Mat3::from_mat4(*transform);
        let abs = Mat3::from_cols(linear.x_axis.abs(), linear.y_axis.abs(), linear.z_axis.abs());
        let extent = abs * half;
        BoundingBox {
            min: center - extent,
            max: center + extent,
        }
    }
}
