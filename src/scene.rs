//! Inputs of a render pass and their loading from disk.

mod loader;
mod wavefront;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::camera::Camera;
use crate::util::Vector3f;

pub use loader::{load_camera, load_lighting, load_mesh, parse_camera, parse_lighting, parse_mesh};
pub use wavefront::load_obj_mesh;

/// Triangle mesh - vertex positions and triangles as triples of 0-based vertex indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<Vector3f>,
    pub triangles: Vec<[usize; 3]>,
}

impl Mesh {
    /// Indices are not checked here, see `validate`.
    pub fn new(vertices: Vec<Vector3f>, triangles: Vec<[usize; 3]>) -> Self {
        return Self { vertices, triangles };
    }

    /// Checks that every triangle references existing vertices. The pipeline indexes without
    /// checks, so meshes from outside have to pass this first.
    pub fn validate(&self) -> Result<()> {
        for (i, triangle) in self.triangles.iter().enumerate() {
            for index in triangle {
                if *index >= self.vertices.len() {
                    bail!(
                        "triangle {} references vertex {}, but the mesh has {} vertices",
                        i,
                        index,
                        self.vertices.len()
                    );
                }
            }
        }
        return Ok(());
    }
}

/// Parameters of the single point light and of the object material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingParams {
    pub iamb: Vector3f, // Ambient color.
    pub ka: f32,        // Ambient coefficient.
    pub il: Vector3f,   // Light color.
    pub pl: Vector3f,   // Light position in world space.
    pub kd: Vector3f,   // Diffuse coefficient per channel.
    pub od: Vector3f,   // Object diffuse color per channel.
    pub ks: f32,        // Specular coefficient.
    pub eta: f32,       // Specular exponent.
}

/// Where the three scene files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenePaths {
    pub mesh: PathBuf,
    pub camera: PathBuf,
    pub lighting: PathBuf,
}

impl Default for ScenePaths {
    fn default() -> Self {
        return Self {
            mesh: PathBuf::from("assets/mesh.txt"),
            camera: PathBuf::from("assets/camera.txt"),
            lighting: PathBuf::from("assets/lighting.txt"),
        };
    }
}

/// Immutable snapshot of everything a render pass reads. Reloading builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub mesh: Mesh,
    pub camera: Camera,
    pub lighting: LightingParams,
}

impl Scene {
    pub fn load(paths: &ScenePaths) -> Result<Self> {
        let mesh = load_mesh(&paths.mesh)?;
        let camera = load_camera(&paths.camera)?;
        let lighting = load_lighting(&paths.lighting)?;
        return Ok(Self { mesh, camera, lighting });
    }
}

/// Reads a whole text file, naming it in the error.
fn read_text(path: &Path) -> Result<String> {
    return std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()));
}
