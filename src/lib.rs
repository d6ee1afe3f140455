//! CPU rendering of a triangle mesh lit by a single point light: vertex normals, camera
//! transform, perspective projection, z-buffered barycentric rasterization and per-pixel Phong
//! shading, all done by hand.

pub mod camera;
pub mod frame;
pub mod logging;
pub mod normals;
pub mod projection;
pub mod raster;
pub mod render;
pub mod scene;
pub mod shader;
pub mod util;

// Re-export commonly used types
pub use camera::{Camera, CameraBasis};
pub use frame::{Color, FrameBuffer, PixelSink};
pub use render::{render, render_into, render_with, RenderConfig};
pub use scene::{LightingParams, Mesh, Scene, ScenePaths};
