use crate::foundation::core::{Mat3, Mat4, Quat, Vec3};
use crate::foundation::math::{DEGENERATE_EPS, normalize_quat_or_identity};
use crate::transform::lerp::Lerp;

/// Translation, rotation and scale of a node relative to its parent.
///
/// `Trs` is a plain value: every operation returns a new transform. The matrix form is
/// `T * R * S` acting on column vectors, and [`Trs::decompose`] inverts [`Trs::to_matrix`]
/// under that same convention.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Trs {
    /// Offset applied after rotation and scale.
    pub translation: Vec3,
    /// Rotation, unit length outside of transient interpolation results.
    pub rotation: Quat,
    /// Per-axis scale factor.
    pub scale: Vec3,
}

impl Default for Trs {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Trs {
    /// Zero translation, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Build a transform from its three components.
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Pure rotation.
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Pure scale.
    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    pub(crate) fn unit_rotation(&self) -> Quat {
        normalize_quat_or_identity(self.rotation)
    }

    /// Compose `self` (parent) with `child` analytically, without going through matrices.
    ///
    /// Matches [`Trs::compose_matrix`] whenever the product is representable as a TRS, which
    /// is always the case when the parent's scale is uniform. Both rotations are normalized
    /// first, so the result's rotation is unit length.
    pub fn compose(&self, child: &Trs) -> Trs {
        let rotation = self.unit_rotation();
        Trs {
            translation: self.translation + rotation * (self.scale * child.translation),
            rotation: rotation * child.unit_rotation(),
            scale: self.scale * child.scale,
        }
    }

    /// Compose `self` (parent) with `child` by multiplying their matrices and decomposing.
    pub fn compose_matrix(&self, child: &Trs) -> Trs {
        Trs::decompose(self.to_matrix() * child.to_matrix())
    }

    /// Homogeneous matrix of this transform.
    pub fn to_matrix(&self) -> Mat4 {
        let r = Mat3::from_quat(self.unit_rotation());
        Mat4::from_cols(
            (r.x_axis * self.scale.x).extend(0.0),
            (r.y_axis * self.scale.y).extend(0.0),
            (r.z_axis * self.scale.z).extend(0.0),
            self.translation.extend(1.0),
        )
    }

    /// Split an affine matrix into translation, rotation and scale.
    ///
    /// Each basis column is normalized by its own length before the rotation is extracted, so
    /// non-uniform scale still yields a unit quaternion. Zero-length columns report a zero scale
    /// on that axis and do not poison the rotation. Mirrored bases put the reflection on X.
    pub fn decompose(m: Mat4) -> Trs {
        let translation = m.w_axis.truncate();
        let mut cols = [
            m.x_axis.truncate(),
            m.y_axis.truncate(),
            m.z_axis.truncate(),
        ];
        let fallback = [Vec3::X, Vec3::Y, Vec3::Z];
        let mut scale = [0.0f32; 3];
        for i in 0..3 {
            let len = cols[i].length();
            if len.is_finite() && len > DEGENERATE_EPS {
                scale[i] = len;
                cols[i] /= len;
            } else {
                cols[i] = fallback[i];
            }
        }
        if Mat3::from_cols(cols[0], cols[1], cols[2]).determinant() < 0.0 {
            scale[0] = -scale[0];
            cols[0] = -cols[0];
        }

        Trs {
            translation,
            rotation: rotation_from_basis(cols[0], cols[1], cols[2]),
            scale: Vec3::from_array(scale),
        }
    }

    /// Interpolate translation and scale linearly and rotation along the short arc.
    pub fn lerp(&self, other: &Trs, t: f32) -> Trs {
        <Trs as Lerp>::lerp(self, other, t)
    }

    /// Map a point from this transform's local space into its parent space.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.translation + self.unit_rotation() * (self.scale * p)
    }

    /// Rotate a normal into parent space. Scale and translation do not apply to normals.
    pub fn transform_normal(&self, n: Vec3) -> Vec3 {
        self.unit_rotation() * n
    }

    /// `true` when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

impl Lerp for Trs {
    fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        Trs {
            translation: <Vec3 as Lerp>::lerp(&a.translation, &b.translation, t),
            rotation: <Quat as Lerp>::lerp(&a.rotation, &b.rotation, t),
            scale: <Vec3 as Lerp>::lerp(&a.scale, &b.scale, t),
        }
    }
}

/// Quaternion of an orthonormal basis given as columns.
///
/// Branches on the trace, then on the largest diagonal term, so the divisor never
/// approaches zero.
fn rotation_from_basis(c0: Vec3, c1: Vec3, c2: Vec3) -> Quat {
    let (m00, m10, m20) = (c0.x, c0.y, c0.z);
    let (m01, m11, m21) = (c1.x, c1.y, c1.z);
    let (m02, m12, m22) = (c2.x, c2.y, c2.z);

    let trace = m00 + m11 + m22;
    let q = if trace >= 0.0 {
        let s = (trace + 1.0).sqrt() * 2.0;
        Quat::from_xyzw((m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s)
    } else if m00 >= m11 && m00 >= m22 {
        let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
        Quat::from_xyzw(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
    } else if m11 > m22 {
        let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
        Quat::from_xyzw((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
    } else {
        let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
        Quat::from_xyzw((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
    };
    normalize_quat_or_identity(q)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/trs.rs"]
mod tests;
