use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use obj::{load_obj, Obj, Position};

use super::Mesh;
use crate::util::Vector3f;

/// Loads positions and triangles of a Wavefront OBJ file. Normals and texture coordinates in the
/// file are ignored, the pipeline estimates its own normals.
pub fn load_obj_mesh(path: &Path) -> Result<Mesh> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let model: Obj<Position, u32> = load_obj(BufReader::new(file))
        .map_err(|err| anyhow!("failed to parse OBJ {}: {}", path.display(), err))?;

    if model.indices.len() % 3 != 0 {
        bail!(
            "{} has {} indices, not a triangle list",
            path.display(),
            model.indices.len()
        );
    }
    let vertices = model
        .vertices
        .iter()
        .map(|vertex| Vector3f::from(vertex.position))
        .collect();
    let triangles = model
        .indices
        .chunks_exact(3)
        .map(|face| [face[0] as usize, face[1] as usize, face[2] as usize])
        .collect();

    return Ok(Mesh::new(vertices, triangles));
}
