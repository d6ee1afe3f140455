//! Render pass: geometry stages for the whole mesh, then rasterization into a frame.

use std::cmp::min;
use std::sync::{mpsc, Arc};
use std::time;

use threadpool::ThreadPool;

use crate::camera::{transform_normals, world_to_view, Camera};
use crate::frame::{Color, FrameBuffer, PixelSink};
use crate::normals::compute_vertex_normals;
use crate::projection::{perspective_projection, to_normalized, to_screen};
use crate::raster::{fill_triangle, RasterTriangle, ZBuffer};
use crate::scene::{LightingParams, Mesh};
use crate::shader::PhongShader;

/// Frame constants of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    // Number of bands rendered in parallel, 1 renders on the calling thread.
    pub threads: usize,
}

impl RenderConfig {
    pub fn new(width: u32, height: u32) -> Self {
        return Self {
            width,
            height,
            background: Color::BLACK,
            threads: 1,
        };
    }
}

/// Mesh after all per-vertex stages: triangles in screen and view space plus the shader with the
/// light already moved to view space.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFrame {
    pub triangles: Vec<RasterTriangle>,
    pub shader: PhongShader,
}

/// Runs normals, camera transform and projection for every vertex once.
pub fn prepare(mesh: &Mesh, camera: &Camera, lighting: &LightingParams, width: u32, height: u32) -> PreparedFrame {
    let normals = compute_vertex_normals(mesh);
    let (view_points, basis) = world_to_view(&mesh.vertices, camera);
    let view_normals = transform_normals(&normals, &basis);
    let projected = perspective_projection(&view_points, camera.d);
    let normalized = to_normalized(&projected, camera.hx, camera.hy);
    let screen = to_screen(&normalized, width, height);
    let light_view_position = basis.point_to_view(lighting.pl);

    let triangles = mesh
        .triangles
        .iter()
        .map(|indices| RasterTriangle {
            screen: indices.map(|i| screen[i]),
            view: indices.map(|i| view_points[i]),
            normals: indices.map(|i| view_normals[i]),
        })
        .collect();

    return PreparedFrame {
        triangles,
        shader: PhongShader::new(*lighting, light_view_position),
    };
}

/// Renders the mesh into a new width x height frame on a black background.
pub fn render(mesh: &Mesh, camera: &Camera, lighting: &LightingParams, width: u32, height: u32) -> FrameBuffer {
    return render_with(mesh, camera, lighting, &RenderConfig::new(width, height));
}

/// Renders the mesh into a new frame, splitting the rows over `config.threads` workers.
/// The result does not depend on the number of workers.
pub fn render_with(mesh: &Mesh, camera: &Camera, lighting: &LightingParams, config: &RenderConfig) -> FrameBuffer {
    let time_begin = time::Instant::now();
    let prepared = prepare(mesh, camera, lighting, config.width, config.height);
    let mut frame = FrameBuffer::new(config.width, config.height);
    let workers = config.threads.max(1);
    if workers == 1 || config.height < 2 {
        draw(&mut frame, &prepared, config.background);
    } else {
        draw_bands(&mut frame, prepared, config.background, workers);
    }
    log::debug!(
        "Rendered {} triangles at {}x{} with {} workers in {:.2}ms",
        mesh.triangles.len(),
        config.width,
        config.height,
        workers,
        time_begin.elapsed().as_secs_f32() * 1000.0
    );
    return frame;
}

/// Clears the sink to the background and renders the mesh into it on the calling thread.
pub fn render_into<S>(sink: &mut S, mesh: &Mesh, camera: &Camera, lighting: &LightingParams, background: Color)
where
    S: PixelSink + ?Sized,
{
    let prepared = prepare(mesh, camera, lighting, sink.width(), sink.height());
    draw(sink, &prepared, background);
}

/// One z-buffer for the rows of the sink, triangles in input order.
fn draw<S>(sink: &mut S, prepared: &PreparedFrame, background: Color)
where
    S: PixelSink + ?Sized,
{
    sink.clear(background);
    let (first_row, last_row) = sink.row_span();
    let mut zbuffer = ZBuffer::for_rows(sink.width(), first_row, last_row - first_row);
    for triangle in &prepared.triangles {
        fill_triangle(sink, &mut zbuffer, triangle, &prepared.shader);
    }
}

/// Horizontal slice of the frame, owned by one worker.
struct Band {
    full_height: u32,
    first_row: u32,
    pixels: FrameBuffer,
}

impl Band {
    fn new(width: u32, full_height: u32, first_row: u32, rows: u32) -> Self {
        return Self {
            full_height,
            first_row,
            pixels: FrameBuffer::new(width, rows),
        };
    }

    fn rows(&self) -> u32 {
        return self.pixels.height();
    }
}

impl PixelSink for Band {
    fn width(&self) -> u32 {
        return self.pixels.width();
    }

    fn height(&self) -> u32 {
        return self.full_height;
    }

    fn row_span(&self) -> (u32, u32) {
        return (self.first_row, self.first_row + self.rows());
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.pixels.set_pixel(x, y - self.first_row, color);
    }

    fn clear(&mut self, color: Color) {
        self.pixels.clear(color);
    }
}

/// Every band sees every triangle in input order, so each pixel goes through the same depth tests
/// as in a single threaded pass.
fn draw_bands(frame: &mut FrameBuffer, prepared: PreparedFrame, background: Color, workers: usize) {
    let width = frame.width();
    let height = frame.height();
    let rows_per_band = (height + workers as u32 - 1) / workers as u32;
    let spans: Vec<(u32, u32)> = (0..height)
        .step_by(rows_per_band as usize)
        .map(|first_row| (first_row, min(rows_per_band, height - first_row)))
        .collect();

    let prepared = Arc::new(prepared);
    let pool = ThreadPool::new(workers);
    let (tx, rx) = mpsc::channel::<Band>();
    for &(first_row, rows) in &spans {
        let tx = tx.clone();
        let prepared = Arc::clone(&prepared);
        pool.execute(move || {
            let mut band = Band::new(width, height, first_row, rows);
            draw(&mut band, &prepared, background);
            // Nobody to report to if the receiving side is gone.
            let _ = tx.send(band);
        });
    }
    drop(tx);

    let mut done = vec![false; spans.len()];
    for band in rx.iter() {
        done[(band.first_row / rows_per_band) as usize] = true;
        frame
            .rows_mut(band.first_row, band.rows())
            .copy_from_slice(band.pixels.as_pixel_data());
    }

    // Only a panicked worker leaves a band behind.
    for (&(first_row, rows), _) in spans.iter().zip(done).filter(|(_, done)| !done) {
        log::warn!("Band at row {} was not rendered by a worker, rendering it in place", first_row);
        let mut band = Band::new(width, height, first_row, rows);
        draw(&mut band, &prepared, background);
        frame
            .rows_mut(first_row, rows)
            .copy_from_slice(band.pixels.as_pixel_data());
    }
}
