use nalgebra as na;
use na::Vector3;

/// Vector3 storing 3 f32, the only vector type the pipeline works with.
pub type Vector3f = Vector3<f32>;

/// Upper bound on Newton iterations, reached only for non-finite input.
const SQRT_MAX_ITERATIONS: u32 = 128;

/// Square root by Newton's method.
///
/// Starts from x / 2 and iterates until the estimate stops decreasing, so large inputs take more
/// steps instead of stopping short. Non-positive input gives 0.
pub fn newton_sqrt(x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    let mut guess = x / 2.0;
    // First step may overshoot upwards (x < 4), after it the sequence is monotonically decreasing.
    guess = (guess + x / guess) / 2.0;
    for _ in 0..SQRT_MAX_ITERATIONS {
        let next = (guess + x / guess) / 2.0;
        if next >= guess {
            break;
        }
        guess = next;
    }
    return guess;
}

/// Norm of a Vector3.
pub fn norm(v: Vector3f) -> f32 {
    return newton_sqrt(v.dot(&v));
}

/// Unit vector in the direction of v.
/// A zero vector is returned as is, so degenerate geometry never aborts rendering.
pub fn normalize(v: Vector3f) -> Vector3f {
    let length = norm(v);
    if length == 0.0 {
        return v;
    }
    return v / length;
}

/// Component-wise clamp of v into [lo, hi].
pub fn clamp(v: Vector3f, lo: f32, hi: f32) -> Vector3f {
    return v.map(|c| c.max(lo).min(hi));
}
