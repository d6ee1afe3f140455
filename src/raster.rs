use std::cmp::{max, min};

use nalgebra as na;
use na::{vector, Vector2};

use crate::frame::PixelSink;
use crate::projection::ScreenVertex;
use crate::shader::FragmentShader;
use crate::util::{normalize, Vector3f};

/// Barycentric coordinates reported for a triangle with zero area on screen. Negative, so every
/// inside test fails.
pub const DEGENERATE_BARYCENTRIC: Vector3f = vector![-1.0, -1.0, -1.0];

/// Depth per pixel for a band of rows, smaller is closer.
/// Starts out at infinity, i.e. nothing drawn yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ZBuffer {
    width: u32,
    first_row: u32,
    rows: u32,
    depth: Vec<f32>,
}

impl ZBuffer {
    /// Buffer covering a whole width x height surface.
    pub fn new(width: u32, height: u32) -> Self {
        return Self::for_rows(width, 0, height);
    }

    /// Buffer covering only the rows [first_row, first_row + rows), addressed with absolute
    /// coordinates.
    pub fn for_rows(width: u32, first_row: u32, rows: u32) -> Self {
        return Self {
            width,
            first_row,
            rows,
            depth: vec![f32::INFINITY; width as usize * rows as usize],
        };
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        return self.depth[self.index(x, y)];
    }

    pub fn set(&mut self, x: u32, y: u32, z: f32) {
        let index = self.index(x, y);
        self.depth[index] = z;
    }

    /// Half-open range of rows the buffer covers.
    pub fn row_span(&self) -> (u32, u32) {
        return (self.first_row, self.first_row + self.rows);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        return x as usize + (y - self.first_row) as usize * self.width as usize;
    }
}

/// Everything the rasterizer needs about one triangle, per vertex: pixel position, view space
/// position and view space normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterTriangle {
    pub screen: [ScreenVertex; 3],
    pub view: [Vector3f; 3],
    pub normals: [Vector3f; 3],
}

/// Barycentric coordinates (alpha, beta, gamma) of p in the triangle p0, p1, p2.
/// `DEGENERATE_BARYCENTRIC` if the triangle has no area.
pub fn barycentric(p: Vector2<f32>, p0: Vector2<f32>, p1: Vector2<f32>, p2: Vector2<f32>) -> Vector3f {
    let denominator = (p1.y - p2.y) * (p0.x - p2.x) + (p2.x - p1.x) * (p0.y - p2.y);
    if denominator == 0.0 {
        return DEGENERATE_BARYCENTRIC;
    }
    let alpha = ((p1.y - p2.y) * (p.x - p2.x) + (p2.x - p1.x) * (p.y - p2.y)) / denominator;
    let beta = ((p2.y - p0.y) * (p.x - p2.x) + (p0.x - p2.x) * (p.y - p2.y)) / denominator;
    let gamma = 1.0 - alpha - beta;
    return Vector3f::new(alpha, beta, gamma);
}

/// Draws a triangle with per-pixel depth test and shading.
///
/// Only pixels of the bounding box that are inside both the surface and its row span are
/// visited. Edges are inclusive, and a pixel is overwritten only by something strictly closer,
/// so on ties the first triangle drawn wins.
pub fn fill_triangle<S, F>(surface: &mut S, zbuffer: &mut ZBuffer, triangle: &RasterTriangle, shader: &F)
where
    S: PixelSink + ?Sized,
    F: FragmentShader + ?Sized,
{
    let [a, b, c] = triangle.screen;
    let (first_row, last_row) = surface.row_span();
    debug_assert_eq!((first_row, last_row), zbuffer.row_span());

    // Bounding box clamped to the surface.
    let x_min = max(min(min(a.x, b.x), c.x), 0);
    let x_max = min(max(max(a.x, b.x), c.x), surface.width() as i32 - 1);
    let y_min = max(min(min(a.y, b.y), c.y), first_row as i32);
    let y_max = min(max(max(a.y, b.y), c.y), last_row as i32 - 1);

    let p0 = Vector2::new(a.x as f32, a.y as f32);
    let p1 = Vector2::new(b.x as f32, b.y as f32);
    let p2 = Vector2::new(c.x as f32, c.y as f32);
    let [v0, v1, v2] = triangle.view;
    let [n0, n1, n2] = triangle.normals;

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let bar = barycentric(Vector2::new(x as f32, y as f32), p0, p1, p2);
            if bar.x < 0.0 || bar.y < 0.0 || bar.z < 0.0 {
                // If any of the coordinates are negative, point is not in the triangle, so skipping it.
                continue;
            }
            let z = bar.x * a.z + bar.y * b.z + bar.z * c.z;
            let (px, py) = (x as u32, y as u32);
            // Strictly closer only, a NaN depth never passes.
            if z < zbuffer.get(px, py) {
                zbuffer.set(px, py, z);
                let position = v0 * bar.x + v1 * bar.y + v2 * bar.z;
                let normal = normalize(n0 * bar.x + n1 * bar.y + n2 * bar.z);
                surface.set_pixel(px, py, shader.shade(position, normal));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Color, FrameBuffer};
    use approx::assert_relative_eq;

    /// Paints every fragment one color, remembers nothing.
    struct Flat(Color);

    impl FragmentShader for Flat {
        fn shade(&self, _position: Vector3f, _normal: Vector3f) -> Color {
            return self.0;
        }
    }

    fn triangle(points: [(i32, i32); 3], z: f32) -> RasterTriangle {
        let screen = points.map(|(x, y)| ScreenVertex { x, y, z });
        return RasterTriangle {
            screen,
            view: screen.map(|s| vector![s.x as f32, s.y as f32, z]),
            normals: [vector![0.0, 0.0, -1.0]; 3],
        };
    }

    fn covered(frame: &FrameBuffer, color: Color) -> usize {
        return frame.as_pixel_data().chunks(3).filter(|p| *p == [color.r, color.g, color.b]).count();
    }

    #[test]
    fn barycentric_inside_sums_to_one() {
        let (p0, p1, p2) = (vector![0.0, 0.0], vector![10.0, 0.0], vector![0.0, 10.0]);
        for p in [vector![1.0, 1.0], vector![3.0, 5.0], vector![2.5, 0.5]] {
            let bar = barycentric(p, p0, p1, p2);
            assert!(bar.x >= 0.0 && bar.y >= 0.0 && bar.z >= 0.0);
            assert_relative_eq!(bar.x + bar.y + bar.z, 1.0);
        }
        let bar = barycentric(vector![2.0, 3.0], p0, p1, p2);
        assert_relative_eq!(bar, vector![0.5, 0.2, 0.3], max_relative = 1e-6);
    }

    #[test]
    fn barycentric_at_vertices_and_outside() {
        let (p0, p1, p2) = (vector![0.0, 0.0], vector![10.0, 0.0], vector![0.0, 10.0]);
        assert_eq!(barycentric(p0, p0, p1, p2), vector![1.0, 0.0, 0.0]);
        assert_eq!(barycentric(p1, p0, p1, p2), vector![0.0, 1.0, 0.0]);
        let outside = barycentric(vector![8.0, 8.0], p0, p1, p2);
        assert!(outside.x < 0.0);
    }

    #[test]
    fn barycentric_degenerate() {
        let colinear = barycentric(vector![1.0, 1.0], vector![0.0, 0.0], vector![1.0, 1.0], vector![2.0, 2.0]);
        assert_eq!(colinear, DEGENERATE_BARYCENTRIC);
        let coincident = barycentric(vector![3.0, 3.0], vector![3.0, 3.0], vector![3.0, 3.0], vector![3.0, 3.0]);
        assert_eq!(coincident, DEGENERATE_BARYCENTRIC);
    }

    #[test]
    fn fills_inclusive_edges() {
        let mut frame = FrameBuffer::new(8, 8);
        let mut zbuffer = ZBuffer::new(8, 8);
        fill_triangle(&mut frame, &mut zbuffer, &triangle([(0, 0), (4, 0), (0, 4)], 1.0), &Flat(Color::WHITE));
        // Pixels with x + y <= 4: 5 + 4 + 3 + 2 + 1.
        assert_eq!(covered(&frame, Color::WHITE), 15);
        assert_eq!(frame.get_pixel(4, 0), Color::WHITE);
        assert_eq!(frame.get_pixel(0, 4), Color::WHITE);
        assert_eq!(frame.get_pixel(1, 3), Color::WHITE);
        assert_eq!(frame.get_pixel(2, 3), Color::BLACK);
        assert_eq!(zbuffer.get(1, 1), 1.0);
        assert_eq!(zbuffer.get(4, 4), f32::INFINITY);
    }

    #[test]
    fn degenerate_triangle_draws_nothing() {
        let mut frame = FrameBuffer::new(8, 8);
        let mut zbuffer = ZBuffer::new(8, 8);
        fill_triangle(&mut frame, &mut zbuffer, &triangle([(1, 1), (4, 4), (6, 6)], 1.0), &Flat(Color::WHITE));
        assert_eq!(covered(&frame, Color::WHITE), 0);
    }

    #[test]
    fn closer_triangle_wins_in_any_order() {
        let near = triangle([(0, 0), (7, 0), (0, 7)], 1.0);
        let far = triangle([(0, 0), (7, 0), (7, 7)], 2.0);
        let red = Flat(Color::new(255, 0, 0));
        let blue = Flat(Color::new(0, 0, 255));

        let mut first = FrameBuffer::new(8, 8);
        let mut zbuffer = ZBuffer::new(8, 8);
        fill_triangle(&mut first, &mut zbuffer, &near, &red);
        fill_triangle(&mut first, &mut zbuffer, &far, &blue);

        let mut second = FrameBuffer::new(8, 8);
        let mut zbuffer = ZBuffer::new(8, 8);
        fill_triangle(&mut second, &mut zbuffer, &far, &blue);
        fill_triangle(&mut second, &mut zbuffer, &near, &red);

        assert_eq!(first, second);
        assert_eq!(first.get_pixel(5, 1), Color::new(255, 0, 0));
        assert_eq!(first.get_pixel(6, 5), Color::new(0, 0, 255));
    }

    #[test]
    fn equal_depth_keeps_first_writer() {
        let shape = triangle([(0, 0), (7, 0), (0, 7)], 1.0);
        let mut frame = FrameBuffer::new(8, 8);
        let mut zbuffer = ZBuffer::new(8, 8);
        fill_triangle(&mut frame, &mut zbuffer, &shape, &Flat(Color::WHITE));
        fill_triangle(&mut frame, &mut zbuffer, &shape, &Flat(Color::new(1, 2, 3)));
        assert_eq!(covered(&frame, Color::new(1, 2, 3)), 0);
    }

    #[test]
    fn nan_depth_is_never_visible() {
        let mut frame = FrameBuffer::new(8, 8);
        let mut zbuffer = ZBuffer::new(8, 8);
        fill_triangle(&mut frame, &mut zbuffer, &triangle([(0, 0), (4, 0), (0, 4)], f32::NAN), &Flat(Color::WHITE));
        assert_eq!(covered(&frame, Color::WHITE), 0);
        assert_eq!(zbuffer.get(1, 1), f32::INFINITY);
    }

    #[test]
    fn clamps_to_surface() {
        let mut frame = FrameBuffer::new(4, 4);
        let mut zbuffer = ZBuffer::new(4, 4);
        fill_triangle(&mut frame, &mut zbuffer, &triangle([(-10, -10), (20, -10), (-10, 20)], 1.0), &Flat(Color::WHITE));
        assert_eq!(covered(&frame, Color::WHITE), 16);
    }

    #[test]
    fn zbuffer_band_uses_absolute_rows() {
        let mut zbuffer = ZBuffer::for_rows(4, 10, 2);
        assert_eq!(zbuffer.row_span(), (10, 12));
        zbuffer.set(3, 11, 0.5);
        assert_eq!(zbuffer.get(3, 11), 0.5);
        assert_eq!(zbuffer.get(3, 10), f32::INFINITY);
    }
}
