use crate::foundation::core::{Quat, Vec3};

/// Lengths at or below this are treated as degenerate.
pub(crate) const DEGENERATE_EPS: f32 = 1e-8;

/// Fallback normal for faces whose normal cannot be computed.
pub(crate) const DEFAULT_NORMAL: Vec3 = Vec3::Y;

/// Normalize `q`, substituting identity for zero-length or non-finite input.
pub(crate) fn normalize_quat_or_identity(q: Quat) -> Quat {
    let len_sq = q.length_squared();
    if !len_sq.is_finite() || len_sq <= DEGENERATE_EPS {
        return Quat::IDENTITY;
    }
    q * len_sq.sqrt().recip()
}

/// Normalize `v`, falling back to [`DEFAULT_NORMAL`] when the result is not finite.
pub(crate) fn normal_or_default(v: Vec3) -> Vec3 {
    let n = v.normalize();
    if n.is_finite() { n } else { DEFAULT_NORMAL }
}

/// Flip `b` onto the same hemisphere as `a` so interpolation takes the short arc.
pub(crate) fn align_hemisphere(a: Quat, b: Quat) -> Quat {
    if a.dot(b) < 0.0 { -b } else { b }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
