use crate::util::{normalize, Vector3f};

/// Camera in world space.
///
/// `n` and `v` must not be parallel, otherwise the right axis of the basis is zero. Nothing here
/// checks it, loaders do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub n: Vector3f,  // View direction.
    pub v: Vector3f,  // Up hint, expected to be orthogonal to n.
    pub d: f32,       // Distance to the projection plane.
    pub hx: f32,      // Half width of the projection plane.
    pub hy: f32,      // Half height of the projection plane.
    pub c: Vector3f,  // Eye position.
}

impl Camera {
    /// True if the right axis can't be built, i.e. n and v are parallel or one of them is zero.
    pub fn is_degenerate(&self) -> bool {
        return self.v.cross(&self.n).norm_squared() == 0.0;
    }
}

/// Camera frame, built for one particular camera.
///
/// Orthonormal only when the camera's up hint is orthogonal to its view direction; the
/// transform uses the axes as they come.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub u: Vector3f,      // Right.
    pub v: Vector3f,      // Up.
    pub n: Vector3f,      // Forward.
    pub origin: Vector3f, // Eye position in world space.
}

impl CameraBasis {
    pub fn new(camera: &Camera) -> Self {
        let n = normalize(camera.n);
        let v = normalize(camera.v);
        let u = normalize(v.cross(&n));
        return Self { u, v, n, origin: camera.c };
    }

    /// Coordinates of a direction in the basis, no translation.
    pub fn direction_to_view(&self, d: Vector3f) -> Vector3f {
        return Vector3f::new(d.dot(&self.u), d.dot(&self.v), d.dot(&self.n));
    }

    /// World point to view space, eye at the origin.
    pub fn point_to_view(&self, p: Vector3f) -> Vector3f {
        return self.direction_to_view(p - self.origin);
    }
}

/// Transforms world space points to view space, also returning the basis used, so normals and
/// the light can be moved into the same frame.
pub fn world_to_view(points: &[Vector3f], camera: &Camera) -> (Vec<Vector3f>, CameraBasis) {
    let basis = CameraBasis::new(camera);
    let view_points = points.iter().map(|p| basis.point_to_view(*p)).collect();
    return (view_points, basis);
}

/// Rotates normals into view space. Renormalized, since a non-orthonormal basis or float drift
/// changes their length.
pub fn transform_normals(normals: &[Vector3f], basis: &CameraBasis) -> Vec<Vector3f> {
    return normals
        .iter()
        .map(|normal| normalize(basis.direction_to_view(*normal)))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::vector;

    fn looking_along_z() -> Camera {
        return Camera {
            n: vector![0.0, 0.0, 1.0],
            v: vector![0.0, 1.0, 0.0],
            d: 1.0,
            hx: 1.0,
            hy: 1.0,
            c: vector![0.0, 0.0, 0.0],
        };
    }

    #[test]
    fn basis_axes() {
        let basis = CameraBasis::new(&looking_along_z());
        assert_eq!(basis.u, vector![1.0, 0.0, 0.0]);
        assert_eq!(basis.v, vector![0.0, 1.0, 0.0]);
        assert_eq!(basis.n, vector![0.0, 0.0, 1.0]);
    }

    #[test]
    fn identity_frame_keeps_points() {
        let points = [vector![1.0, 2.0, 3.0], vector![-4.0, 0.5, 9.0]];
        let (view_points, _) = world_to_view(&points, &looking_along_z());
        assert_eq!(view_points, points.to_vec());
    }

    #[test]
    fn eye_translation_and_rotation() {
        // Eye at (0, -10, 0) looking along +y with +z up.
        let camera = Camera {
            n: vector![0.0, 2.0, 0.0],
            v: vector![0.0, 0.0, 3.0],
            d: 1.0,
            hx: 1.0,
            hy: 1.0,
            c: vector![0.0, -10.0, 0.0],
        };
        let (view_points, basis) = world_to_view(&[vector![1.0, 0.0, 2.0]], &camera);
        assert_eq!(basis.u, vector![-1.0, 0.0, 0.0]);
        assert_relative_eq!(view_points[0], vector![-1.0, 2.0, 10.0]);
    }

    #[test]
    fn normals_are_renormalized() {
        let basis = CameraBasis::new(&looking_along_z());
        let normals = transform_normals(&[vector![0.0, 0.0, -5.0], vector![0.0, 0.0, 0.0]], &basis);
        assert_eq!(normals[0], vector![0.0, 0.0, -1.0]);
        assert_eq!(normals[1], vector![0.0, 0.0, 0.0]);
    }

    #[test]
    fn parallel_up_hint_is_degenerate() {
        let mut camera = looking_along_z();
        assert!(!camera.is_degenerate());
        camera.v = vector![0.0, 0.0, -2.0];
        assert!(camera.is_degenerate());
        let basis = CameraBasis::new(&camera);
        assert_eq!(basis.u, vector![0.0, 0.0, 0.0]);
    }
}
