use nalgebra as na;
use na::vector;

use crate::scene::Mesh;
use crate::util::{normalize, Vector3f};

/// One normal per mesh vertex, indexed like `Mesh::vertices`.
pub type VertexNormals = Vec<Vector3f>;

/// Estimates vertex normals by summing the unnormalized face normals of all triangles touching a
/// vertex, and normalizing the sum.
///
/// Larger faces weigh more. The sign follows the winding of the triangles, nothing is flipped.
/// Vertices without a non-degenerate face end up with a zero normal.
pub fn compute_vertex_normals(mesh: &Mesh) -> VertexNormals {
    let mut normals: VertexNormals = vec![vector![0.0, 0.0, 0.0]; mesh.vertices.len()];
    for triangle in &mesh.triangles {
        let [i0, i1, i2] = *triangle;
        let v0 = mesh.vertices[i0];
        let edge_1 = mesh.vertices[i1] - v0;
        let edge_2 = mesh.vertices[i2] - v0;
        let face_normal = edge_1.cross(&edge_2);
        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;
    }

    return normals.into_iter().map(normalize).collect();
}
