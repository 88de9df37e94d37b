use crate::foundation::core::{Quat, Vec3};
use crate::foundation::math::{align_hemisphere, normalize_quat_or_identity};

/// Interpolation contract for animated value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        a.lerp(*b, t)
    }
}

impl Lerp for Quat {
    /// Spherical interpolation along the shorter arc; the result is always unit length.
    fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        let a = normalize_quat_or_identity(*a);
        let b = align_hemisphere(a, normalize_quat_or_identity(*b));
        normalize_quat_or_identity(a.slerp(b, t))
    }
}
