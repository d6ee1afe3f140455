use crate::util::Vector3f;

/// Point on the screen - x, y give the pixel and z is the view space depth of the point,
/// kept for interpolation and the depth test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub x: i32,
    pub y: i32,
    pub z: f32,
}

/// Perspective divide onto the plane at distance d: (d * x / z, d * y / z, z).
/// Points with z exactly 0 keep their x, y unscaled.
pub fn perspective_projection(view_points: &[Vector3f], d: f32) -> Vec<Vector3f> {
    return view_points
        .iter()
        .map(|p| {
            if p.z == 0.0 {
                return Vector3f::new(p.x, p.y, p.z);
            }
            return Vector3f::new(d * p.x / p.z, d * p.y / p.z, p.z);
        })
        .collect();
}

/// Scales the projection plane window [-hx, hx] x [-hy, hy] to [-1, 1] x [-1, 1].
pub fn to_normalized(projected: &[Vector3f], hx: f32, hy: f32) -> Vec<Vector3f> {
    return projected
        .iter()
        .map(|p| Vector3f::new(p.x / hx, p.y / hy, p.z))
        .collect();
}

/// Maps normalized coordinates to pixels with (0, 0) in the top left corner, y grows downwards.
pub fn to_screen(normalized: &[Vector3f], width: u32, height: u32) -> Vec<ScreenVertex> {
    let half_width = width as f32 / 2.0;
    let half_height = height as f32 / 2.0;
    return normalized
        .iter()
        .map(|p| ScreenVertex {
            x: ((p.x + 1.0) * half_width).floor() as i32,
            y: ((1.0 - p.y) * half_height).floor() as i32,
            z: p.z,
        })
        .collect();
}
