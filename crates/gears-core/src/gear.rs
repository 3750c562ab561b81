//! Procedural gear wheel mesh generation
//!
//! Each tooth occupies one angular pitch `2π / teeth`, split into four steps
//! `da`. The profile is a straight-line approximation: the tooth root sits at
//! `outer_radius - tooth_depth / 2`, the tip at `outer_radius + tooth_depth / 2`.
//!
//! Per tooth the generator appends 40 vertices and 22 triangles, in this order:
//! front face, front tooth flank, back face, back tooth flank, four outward
//! faces, inner bore.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::constants::{INDICES_PER_TOOTH, MAX_TEETH, VERTICES_PER_TOOTH};
use crate::mesh::{GearMesh, GearVertex};

/// Geometric parameters of a gear wheel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearParams {
    /// Radius of the bore
    pub inner_radius: f32,
    /// Radius at the middle of the teeth
    pub outer_radius: f32,
    /// Thickness along the rotation axis (faces at ±width/2)
    pub width: f32,
    /// Number of teeth
    pub teeth: u32,
    /// Radial depth of a tooth
    pub tooth_depth: f32,
}

impl Default for GearParams {
    fn default() -> Self {
        Self {
            inner_radius: 1.0,
            outer_radius: 4.0,
            width: 1.0,
            teeth: 20,
            tooth_depth: 0.7,
        }
    }
}

impl GearParams {
    pub fn new(
        inner_radius: f32,
        outer_radius: f32,
        width: f32,
        teeth: u32,
        tooth_depth: f32,
    ) -> Self {
        Self {
            inner_radius,
            outer_radius,
            width,
            teeth,
            tooth_depth,
        }
    }
}

/// Generate a gear mesh
///
/// # Arguments
/// * `inner_radius` - radius of the hole at the center
/// * `outer_radius` - radius at the center of the teeth
/// * `width` - width of the gear
/// * `teeth` - number of teeth
/// * `tooth_depth` - depth of a tooth
/// * `color` - material color (RGBA)
pub fn gear(
    inner_radius: f32,
    outer_radius: f32,
    width: f32,
    teeth: u32,
    tooth_depth: f32,
    color: [f32; 4],
) -> GearMesh {
    generate_gear_mesh(
        &GearParams::new(inner_radius, outer_radius, width, teeth, tooth_depth),
        color,
    )
}

/// Generate a gear mesh from parameters
///
/// Parameters are not validated: degenerate radii or a negative tooth depth
/// produce degenerate geometry with the usual buffer sizes. `teeth == 0`
/// yields an empty mesh.
///
/// # Panics
/// If `params.teeth` exceeds [`MAX_TEETH`] (indices are 16-bit).
pub fn generate_gear_mesh(params: &GearParams, color: [f32; 4]) -> GearMesh {
    let teeth = params.teeth;
    assert!(
        teeth <= MAX_TEETH,
        "gear with {teeth} teeth exceeds the 16-bit index range (max {MAX_TEETH})"
    );

    let r0 = params.inner_radius;
    let r1 = params.outer_radius - params.tooth_depth / 2.0;
    let r2 = params.outer_radius + params.tooth_depth / 2.0;
    let da = TAU / teeth as f32 / 4.0;
    let front = params.width * 0.5;
    let back = -params.width * 0.5;

    let mut builder = GearBuilder::with_teeth(teeth);

    for i in 0..teeth {
        let ta = i as f32 * TAU / teeth as f32;
        let t = ToothAngles::new(ta, da);
        let at = |r: f32, step: usize, z: f32| t.point(r, step, z);

        // Slanted flank directions
        let mut u1 = r2 * t.cos[1] - r1 * t.cos[0];
        let mut v1 = r2 * t.sin[1] - r1 * t.sin[0];
        let len = (u1 * u1 + v1 * v1).sqrt();
        u1 /= len;
        v1 /= len;
        let u2 = r1 * t.cos[3] - r2 * t.cos[2];
        let v2 = r1 * t.sin[3] - r2 * t.sin[2];

        let radial = [t.cos[0], t.sin[0], 0.0];

        // Front face
        builder.emit_ring_face(
            [
                at(r0, 0, front),
                at(r1, 0, front),
                at(r0, 2, front),
                at(r1, 2, front),
                at(r0, 4, front),
                at(r1, 4, front),
            ],
            [0.0, 0.0, 1.0],
        );

        // Front sides of teeth
        builder.emit_face(
            [
                at(r1, 0, front),
                at(r2, 1, front),
                at(r1, 3, front),
                at(r2, 2, front),
            ],
            [0.0, 0.0, 1.0],
        );

        // Back face
        builder.emit_ring_face(
            [
                at(r0, 0, back),
                at(r1, 0, back),
                at(r0, 2, back),
                at(r1, 2, back),
                at(r0, 4, back),
                at(r1, 4, back),
            ],
            [0.0, 0.0, -1.0],
        );

        // Back sides of teeth (reversed corner order)
        builder.emit_face(
            [
                at(r1, 3, back),
                at(r2, 2, back),
                at(r1, 0, back),
                at(r2, 1, back),
            ],
            [0.0, 0.0, -1.0],
        );

        // Outward faces of teeth
        builder.emit_face(
            [
                at(r1, 0, front),
                at(r1, 0, back),
                at(r2, 1, front),
                at(r2, 1, back),
            ],
            [v1, -u1, 0.0],
        );
        builder.emit_face(
            [
                at(r2, 1, front),
                at(r2, 1, back),
                at(r2, 2, front),
                at(r2, 2, back),
            ],
            radial,
        );
        builder.emit_face(
            [
                at(r2, 2, front),
                at(r2, 2, back),
                at(r1, 3, front),
                at(r1, 3, back),
            ],
            [v2, -u2, 0.0],
        );
        builder.emit_face(
            [
                at(r1, 3, front),
                at(r1, 3, back),
                at(r1, 4, front),
                at(r1, 4, back),
            ],
            radial,
        );

        // Inside radius cylinder: near and far edges carry their own normal
        let near = [-t.cos[0], -t.sin[0], 0.0];
        let far = [-t.cos[4], -t.sin[4], 0.0];
        let a = builder.emit_vertex(at(r0, 0, back), near);
        let b = builder.emit_vertex(at(r0, 0, front), near);
        let c = builder.emit_vertex(at(r0, 4, back), far);
        let d = builder.emit_vertex(at(r0, 4, front), far);
        builder.emit_quad([a, b, c, d]);
    }

    let mesh = builder.finish(teeth, color);
    tracing::debug!(
        "Generated gear: {} teeth, {} vertices, {} indices",
        teeth,
        mesh.vertex_count(),
        mesh.index_count()
    );
    mesh
}

/// Cosine and sine at `ta + k * da` for `k` in `0..=4`
struct ToothAngles {
    cos: [f32; 5],
    sin: [f32; 5],
}

impl ToothAngles {
    fn new(ta: f32, da: f32) -> Self {
        let angle = |k: usize| ta + k as f32 * da;
        Self {
            cos: std::array::from_fn(|k| angle(k).cos()),
            sin: std::array::from_fn(|k| angle(k).sin()),
        }
    }

    fn point(&self, r: f32, step: usize, z: f32) -> [f32; 3] {
        [r * self.cos[step], r * self.sin[step], z]
    }
}

/// Accumulates vertices and triangles for one mesh
///
/// Every vertex is emitted together with its normal, so slot `k` of the
/// vertex buffer always pairs the position and normal that were passed in
/// the same call.
#[derive(Debug, Default)]
pub struct GearBuilder {
    vertices: Vec<GearVertex>,
    indices: Vec<u16>,
}

impl GearBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with buffers reserved for a gear of `teeth` teeth
    pub fn with_teeth(teeth: u32) -> Self {
        let teeth = teeth as usize;
        Self {
            vertices: Vec::with_capacity(teeth * VERTICES_PER_TOOTH),
            indices: Vec::with_capacity(teeth * INDICES_PER_TOOTH),
        }
    }

    /// Append one vertex and return its index
    ///
    /// # Panics
    /// If the vertex would not be addressable by a 16-bit index.
    pub fn emit_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u16 {
        let index = self.vertices.len();
        assert!(
            index <= u16::MAX as usize,
            "gear mesh exceeds the 16-bit index range"
        );
        self.vertices.push(GearVertex::new(position, normal));
        index as u16
    }

    pub fn emit_triangle(&mut self, i0: u16, i1: u16, i2: u16) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Split a quad into `(a, b, c)` and `(b, d, c)`
    ///
    /// Corners are ordered first-near, second-near, first-far, second-far.
    pub fn emit_quad(&mut self, [a, b, c, d]: [u16; 4]) {
        self.emit_triangle(a, b, c);
        self.emit_triangle(b, d, c);
    }

    /// Emit a flat-shaded quad
    pub fn emit_face(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) -> [u16; 4] {
        let quad = corners.map(|corner| self.emit_vertex(corner, normal));
        self.emit_quad(quad);
        quad
    }

    /// Emit a flat-shaded strip of two quads sharing the middle edge
    fn emit_ring_face(&mut self, corners: [[f32; 3]; 6], normal: [f32; 3]) -> [u16; 6] {
        let ix = corners.map(|corner| self.emit_vertex(corner, normal));
        self.emit_quad([ix[0], ix[1], ix[2], ix[3]]);
        self.emit_quad([ix[2], ix[3], ix[4], ix[5]]);
        ix
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn finish(self, teeth: u32, color: [f32; 4]) -> GearMesh {
        GearMesh {
            vertices: self.vertices,
            indices: self.indices,
            color,
            teeth,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::constants::{TRIANGLES_PER_TOOTH, colors};

    fn classic() -> GearMesh {
        gear(1.0, 4.0, 1.0, 20, 0.7, colors::RED)
    }

    fn tooth(mesh: &GearMesh, i: usize) -> &[GearVertex] {
        &mesh.vertices()[i * VERTICES_PER_TOOTH..(i + 1) * VERTICES_PER_TOOTH]
    }

    fn cross_z(mesh: &GearMesh, tri: [u16; 3]) -> f32 {
        let [a, b, c] = tri.map(|i| mesh.vertices()[i as usize].position);
        (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
    }

    #[test]
    fn test_classic_gear_sizes() {
        let mesh = classic();
        assert_eq!(mesh.vertex_count(), 800);
        assert_eq!(mesh.index_count(), 1320);
        assert_eq!(mesh.triangle_count(), 440);
        assert_eq!(mesh.teeth(), 20);
        assert_eq!(mesh.color(), colors::RED);
    }

    #[test]
    fn test_first_vertex() {
        let mesh = classic();
        assert_eq!(mesh.vertices()[0].position, [1.0, 0.0, 0.5]);
        assert_eq!(mesh.vertices()[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_counts_per_tooth_count() {
        for teeth in [1, 2, 3, 7, 10, 20, 64] {
            let mesh = gear(0.5, 2.0, 2.0, teeth, 0.7, colors::GREEN);
            let (vertices, indices) = GearMesh::expected_sizes(teeth);
            assert_eq!(mesh.vertex_count(), vertices);
            assert_eq!(mesh.index_count(), indices);
            assert_eq!(mesh.triangle_count(), teeth as usize * TRIANGLES_PER_TOOTH);
        }
    }

    #[test]
    fn test_zero_teeth_is_empty() {
        let mesh = gear(1.0, 4.0, 1.0, 0, 0.7, colors::RED);
        assert!(mesh.is_empty());
        assert_eq!(mesh.index_count(), 0);
    }

    #[test]
    fn test_single_tooth() {
        let mesh = gear(1.0, 4.0, 1.0, 1, 0.7, colors::RED);
        assert_eq!(mesh.vertex_count(), 40);
        assert_eq!(mesh.triangle_count(), 22);
        assert!(mesh.indices().iter().all(|&i| (i as usize) < 40));
    }

    #[test]
    fn test_indices_never_reference_later_teeth() {
        let mesh = classic();
        for (t, tri) in mesh.triangles().enumerate() {
            let tooth_index = t / TRIANGLES_PER_TOOTH;
            let first = tooth_index * VERTICES_PER_TOOTH;
            let last = first + VERTICES_PER_TOOTH;
            for i in tri {
                assert!((first..last).contains(&(i as usize)), "triangle {t} uses {i}");
            }
        }
    }

    #[test]
    fn test_triangles_have_distinct_corners() {
        let mesh = gear(1.3, 2.0, 0.5, 10, 0.7, colors::BLUE);
        for [a, b, c] in mesh.triangles() {
            assert!(a != b && b != c && a != c);
        }
    }

    #[test]
    fn test_flat_faces_share_one_normal() {
        let mesh = classic();
        let flat_ranges = [0..6, 6..10, 10..16, 16..20, 20..24, 24..28, 28..32, 32..36];
        for i in 0..20 {
            let vertices = tooth(&mesh, i);
            for range in flat_ranges.clone() {
                let normal = vertices[range.start].normal;
                assert!(vertices[range].iter().all(|v| v.normal == normal));
            }
            assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
            assert_eq!(vertices[6].normal, [0.0, 0.0, 1.0]);
            assert_eq!(vertices[10].normal, [0.0, 0.0, -1.0]);
            assert_eq!(vertices[16].normal, [0.0, 0.0, -1.0]);
        }
    }

    #[test]
    fn test_bore_normals_point_inward_per_edge() {
        let teeth = 20;
        let mesh = classic();
        let da = TAU / teeth as f32 / 4.0;
        for i in 0..teeth as usize {
            let bore = &tooth(&mesh, i)[36..40];
            let ta = i as f32 * TAU / teeth as f32;
            let near = [-ta.cos(), -ta.sin(), 0.0];
            let far = [-(ta + 4.0 * da).cos(), -(ta + 4.0 * da).sin(), 0.0];
            assert_eq!(bore[0].normal, bore[1].normal);
            assert_eq!(bore[2].normal, bore[3].normal);
            assert_ne!(bore[0].normal, bore[2].normal);
            for k in 0..3 {
                assert_abs_diff_eq!(bore[0].normal[k], near[k], epsilon = 1e-6);
                assert_abs_diff_eq!(bore[2].normal[k], far[k], epsilon = 1e-6);
            }
            // Bore vertices sit on the inner radius
            for v in bore {
                let [x, y, _] = v.position;
                assert_abs_diff_eq!((x * x + y * y).sqrt(), 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_leading_flank_normal_is_unit_and_perpendicular() {
        let mesh = classic();
        for i in 0..20 {
            let face = &tooth(&mesh, i)[20..24];
            let [nx, ny, nz] = face[0].normal;
            assert_abs_diff_eq!((nx * nx + ny * ny).sqrt(), 1.0, epsilon = 1e-5);
            assert_eq!(nz, 0.0);
            let edge = [
                face[2].position[0] - face[0].position[0],
                face[2].position[1] - face[0].position[1],
            ];
            assert_abs_diff_eq!(nx * edge[0] + ny * edge[1], 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_trailing_flank_normal_is_unnormalized_edge() {
        let mesh = classic();
        let face = &tooth(&mesh, 0)[28..32];
        let u2 = face[2].position[0] - face[0].position[0];
        let v2 = face[2].position[1] - face[0].position[1];
        let [nx, ny, _] = face[0].normal;
        assert_abs_diff_eq!(nx, v2, epsilon = 1e-5);
        assert_abs_diff_eq!(ny, -u2, epsilon = 1e-5);
    }

    #[test]
    fn test_front_vertices_have_back_mirror() {
        let width = 2.0;
        let mesh = gear(0.5, 2.0, width, 10, 0.7, colors::GREEN);
        let positions: Vec<[f32; 3]> = mesh.positions().collect();
        let front: Vec<_> = positions.iter().filter(|p| p[2] == width / 2.0).collect();
        assert!(!front.is_empty());
        for p in front {
            assert!(
                positions
                    .iter()
                    .any(|q| q[0] == p[0] && q[1] == p[1] && q[2] == -width / 2.0),
                "no mirror for {p:?}"
            );
        }
    }

    #[test]
    fn test_tooth_tip_reaches_outer_radius_plus_half_depth() {
        let mesh = classic();
        let tip = tooth(&mesh, 0)[24].position;
        assert_abs_diff_eq!((tip[0] * tip[0] + tip[1] * tip[1]).sqrt(), 4.35, epsilon = 1e-5);
        let bounds = mesh.bounds();
        assert_abs_diff_eq!(bounds.min.z, -0.5);
        assert_abs_diff_eq!(bounds.max.z, 0.5);
    }

    #[test]
    fn test_flank_winding() {
        let mesh = classic();
        let tris: Vec<[u16; 3]> = mesh.triangles().collect();
        for i in 0..20 {
            let base = i * TRIANGLES_PER_TOOTH;
            // Front face and front flank wind counter-clockwise seen from +Z
            for t in [base, base + 1, base + 4, base + 5] {
                assert!(cross_z(&mesh, tris[t]) > 0.0);
            }
            // Back flank is reversed
            for t in [base + 10, base + 11] {
                assert!(cross_z(&mesh, tris[t]) < 0.0);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let a = classic();
        let b = classic();
        assert_eq!(a.vertex_bytes(), b.vertex_bytes());
        assert_eq!(a.indices(), b.indices());
    }

    #[test]
    fn test_degenerate_parameters_do_not_fail() {
        let inverted = gear(4.0, 1.0, 1.0, 5, 0.7, colors::RED);
        assert_eq!(inverted.vertex_count(), 200);
        let negative_depth = gear(1.0, 4.0, 1.0, 5, -2.0, colors::RED);
        assert_eq!(negative_depth.triangle_count(), 110);
        let flat = gear(1.0, 4.0, 0.0, 5, 0.0, colors::RED);
        assert_eq!(flat.index_count(), 330);
    }

    #[test]
    fn test_largest_addressable_gear() {
        let mesh = gear(1.0, 4.0, 1.0, MAX_TEETH, 0.01, colors::RED);
        assert_eq!(mesh.vertex_count(), MAX_TEETH as usize * VERTICES_PER_TOOTH);
        assert!(mesh.vertex_count() <= u16::MAX as usize + 1);
    }

    #[test]
    #[should_panic(expected = "16-bit index range")]
    fn test_too_many_teeth_panics() {
        gear(1.0, 4.0, 1.0, MAX_TEETH + 1, 0.7, colors::RED);
    }

    #[test]
    fn test_builder_quad_diagonal() {
        let mut builder = GearBuilder::new();
        let quad = builder.emit_face(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
            [0.0, 0.0, 1.0],
        );
        assert_eq!(quad, [0, 1, 2, 3]);
        assert_eq!(builder.vertex_count(), 4);
        let mesh = builder.finish(0, colors::RED);
        assert_eq!(mesh.indices(), &[0, 1, 2, 1, 3, 2]);
    }
}
