use crate::frame::Color;
use crate::scene::LightingParams;
use crate::util::{clamp, normalize, Vector3f};

/// Computes the color of a visible fragment from its interpolated view space position and unit
/// normal. The eye sits at the view space origin.
pub trait FragmentShader {
    fn shade(&self, position: Vector3f, normal: Vector3f) -> Color;
}

/// Phong illumination by a single point light, everything in view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongShader {
    pub lighting: LightingParams,
    pub light_view_position: Vector3f,
}

impl PhongShader {
    pub fn new(lighting: LightingParams, light_view_position: Vector3f) -> Self {
        return Self { lighting, light_view_position };
    }
}

impl FragmentShader for PhongShader {
    fn shade(&self, position: Vector3f, normal: Vector3f) -> Color {
        return shade(position, normal, &self.lighting, self.light_view_position);
    }
}

/// Phong color at view space point p with unit normal n:
/// Iamb * Ka + Il * Kd * (n.l) * Od + Il * Ks * (r.v)^eta, clamped to [0, 255] and truncated.
///
/// Nothing is skipped for back lit points: diffuse drops to zero, ambient and specular are
/// evaluated as usual.
pub fn shade(p: Vector3f, n: Vector3f, lighting: &LightingParams, light_view_position: Vector3f) -> Color {
    let ambient = lighting.iamb * lighting.ka;

    let l = normalize(light_view_position - p);
    let n_dot_l = n.dot(&l);
    let diffuse = lighting
        .il
        .component_mul(&lighting.kd)
        .component_mul(&lighting.od)
        * n_dot_l.max(0.0);

    // Direction to the eye.
    let v = normalize(-p);
    let r = n * (2.0 * n_dot_l) - l;
    let r_dot_v = r.dot(&v).max(0.0);
    let specular = lighting.il * (lighting.ks * r_dot_v.powf(lighting.eta));

    return to_color(ambient + diffuse + specular);
}

/// Clamps intensities into [0, 255] and truncates them to rgb8.
fn to_color(intensity: Vector3f) -> Color {
    let clamped = clamp(intensity, 0.0, 255.0);
    return Color::new(clamped.x as u8, clamped.y as u8, clamped.z as u8);
}

/// Lighting with every coefficient zero and a white light at the origin, tests switch on the
/// terms they need.
#[cfg(test)]
pub(crate) fn dark_lighting() -> LightingParams {
    return LightingParams {
        iamb: Vector3f::zeros(),
        ka: 0.0,
        il: Vector3f::repeat(255.0),
        pl: Vector3f::zeros(),
        kd: Vector3f::zeros(),
        od: Vector3f::zeros(),
        ks: 0.0,
        eta: 1.0,
    };
}
