//! STL export of gear meshes

use std::io::Write;
use std::path::Path;

use glam::{Mat4, Vec3};

use crate::mesh::GearMesh;
use crate::scene::Scene;

/// Triangles of one mesh with `transform` applied
pub fn mesh_triangles(mesh: &GearMesh, transform: &Mat4) -> Vec<stl_io::Triangle> {
    let positions: Vec<Vec3> = mesh
        .positions()
        .map(|p| transform.transform_point3(Vec3::from(p)))
        .collect();

    mesh.triangles()
        .map(|[a, b, c]| {
            let v0 = positions[a as usize];
            let v1 = positions[b as usize];
            let v2 = positions[c as usize];
            stl_io::Triangle {
                normal: stl_io::Normal::new(face_normal(v0, v1, v2).to_array()),
                vertices: [
                    stl_io::Vertex::new(v0.to_array()),
                    stl_io::Vertex::new(v1.to_array()),
                    stl_io::Vertex::new(v2.to_array()),
                ],
            }
        })
        .collect()
}

/// Triangles of every gear posed at `angle`
pub fn scene_triangles(scene: &Scene, angle: f32) -> Vec<stl_io::Triangle> {
    scene
        .gears()
        .iter()
        .flat_map(|gear| mesh_triangles(gear.mesh(), &gear.model_matrix(angle)))
        .collect()
}

fn face_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v1 - v0).cross(v2 - v0).try_normalize().unwrap_or(Vec3::Z)
}

/// Write triangles as binary STL
pub fn write_stl<W: Write>(writer: &mut W, triangles: &[stl_io::Triangle]) -> Result<(), StlError> {
    stl_io::write_stl(writer, triangles.iter()).map_err(|e| StlError::Write(e.to_string()))
}

/// Save a single untransformed mesh
pub fn save_mesh_stl(mesh: &GearMesh, path: impl AsRef<Path>) -> Result<(), StlError> {
    save_triangles(&mesh_triangles(mesh, &Mat4::IDENTITY), path.as_ref())
}

/// Save the scene posed at `angle`
pub fn save_scene_stl(scene: &Scene, angle: f32, path: impl AsRef<Path>) -> Result<(), StlError> {
    save_triangles(&scene_triangles(scene, angle), path.as_ref())
}

fn save_triangles(triangles: &[stl_io::Triangle], path: &Path) -> Result<(), StlError> {
    let mut file = std::fs::File::create(path).map_err(|e| StlError::Io(e.to_string()))?;
    write_stl(&mut file, triangles)?;
    tracing::info!("Wrote {} triangles to {}", triangles.len(), path.display());
    Ok(())
}

/// STL-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum StlError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Write error: {0}")]
    Write(String),
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::constants::colors;
    use crate::gear::gear;

    #[test]
    fn test_mesh_triangle_count() {
        let mesh = gear(1.0, 4.0, 1.0, 20, 0.7, colors::RED);
        assert_eq!(mesh_triangles(&mesh, &Mat4::IDENTITY).len(), 440);
    }

    #[test]
    fn test_front_face_normal_points_up() {
        let mesh = gear(1.0, 4.0, 1.0, 20, 0.7, colors::RED);
        let triangles = mesh_triangles(&mesh, &Mat4::IDENTITY);
        let n = triangles[0].normal;
        assert!((n[2] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_triangle_gets_fallback_normal() {
        let mesh = gear(1.0, 1.0, 0.0, 3, 0.0, colors::RED);
        let triangles = mesh_triangles(&mesh, &Mat4::IDENTITY);
        // Zero width collapses the outward faces
        let n = triangles[12].normal;
        assert_eq!([n[0], n[1], n[2]], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_binary_stl_size() {
        let triangles = scene_triangles(&Scene::classic(), 0.0);
        assert_eq!(triangles.len(), 880);
        let mut out = Cursor::new(Vec::new());
        write_stl(&mut out, &triangles).unwrap();
        // 80-byte header, triangle count, 50 bytes per triangle
        assert_eq!(out.into_inner().len(), 84 + 50 * 880);
    }

    #[test]
    fn test_save_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gear.stl");
        let mesh = gear(0.5, 2.0, 2.0, 10, 0.7, colors::GREEN);
        save_mesh_stl(&mesh, &path).unwrap();
        let mut file = std::fs::File::open(&path).unwrap();
        let read = stl_io::read_stl(&mut file).unwrap();
        assert_eq!(read.faces.len(), 220);
    }
}
