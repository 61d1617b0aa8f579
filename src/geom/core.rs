use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Vec2
// ─────────────────────────────────────────────────────────────────────────────

/// Two-component vector, used for texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from(arr: [f64; 2]) -> Self {
        Self::new(arr[0], arr[1])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

/// Three-component vector used for positions, directions and scales alike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// All components set to one.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// Unit vector along the X axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector along the Y axis (world up).
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector along the Z axis (forward).
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a Vec3 from an array.
    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Convert to an array.
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[must_use]
    pub const fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len.is_finite() && len > 0.0 {
            Some(Self::new(self.x / len, self.y / len, self.z / len))
        } else {
            None
        }
    }

    /// Unit vector in the same direction, or zero when the vector is shorter
    /// than [`Tolerance::DEFAULT`].
    ///
    /// Reflections through a zero normal are the identity, so frame transport
    /// relies on this to stay stable when two samples coincide.
    #[must_use]
    pub fn normalize_or_zero(self) -> Self {
        let len = self.length();
        if len.is_finite() && len > Tolerance::DEFAULT.eps {
            self / len
        } else {
            Self::ZERO
        }
    }

    /// Reflect this vector off the plane with the given normal.
    ///
    /// `normal` is expected to be unit length or zero.
    #[must_use]
    pub fn reflect(self, normal: Self) -> Self {
        self - normal * (2.0 * self.dot(normal))
    }

    /// Unsigned angle in degrees between two vectors, 0 when either is degenerate.
    #[must_use]
    pub fn angle_degrees(self, rhs: Self) -> f64 {
        let denominator = (self.length_squared() * rhs.length_squared()).sqrt();
        if denominator < 1e-15 {
            return 0.0;
        }
        let cos = (self.dot(rhs) / denominator).clamp(-1.0, 1.0);
        cos.acos().to_degrees()
    }

    /// Angle in degrees from `self` to `rhs`, signed by the rotation sense
    /// around `axis`. A zero triple product counts as positive.
    #[must_use]
    pub fn signed_angle_degrees(self, rhs: Self, axis: Self) -> f64 {
        let unsigned = self.angle_degrees(rhs);
        let sign = axis.dot(self.cross(rhs));
        if sign < 0.0 { -unsigned } else { unsigned }
    }

    /// Linear interpolation between two vectors.
    /// Returns `self * (1 - t) + rhs * t`.
    #[must_use]
    pub fn lerp(self, rhs: Self, t: f64) -> Self {
        Self::new(
            self.x + (rhs.x - self.x) * t,
            self.y + (rhs.y - self.y) * t,
            self.z + (rhs.z - self.z) * t,
        )
    }

    /// Component-wise product.
    #[must_use]
    pub const fn mul_elem(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self - other).length()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn min(self, rhs: Self) -> Self {
        Self::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, rhs: Self) -> Self {
        Self::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self * rhs.x, self * rhs.y, self * rhs.z)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Quat
// ─────────────────────────────────────────────────────────────────────────────

/// Unit quaternion rotation.
///
/// Conventions: a rotation built by [`Quat::look_rotation`] maps +Z onto the
/// forward direction and +Y onto the (orthogonalized) up direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `radians` around `axis`. A degenerate axis yields the identity.
    #[must_use]
    pub fn from_axis_angle(axis: Vec3, radians: f64) -> Self {
        let Some(axis) = axis.normalized() else {
            return Self::IDENTITY;
        };
        let (s, c) = (radians * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    #[must_use]
    pub fn from_axis_angle_degrees(axis: Vec3, degrees: f64) -> Self {
        Self::from_axis_angle(axis, degrees.to_radians())
    }

    /// Euler rotation in degrees, applied around Z, then X, then Y.
    #[must_use]
    pub fn from_euler_degrees(euler: Vec3) -> Self {
        let qx = Self::from_axis_angle_degrees(Vec3::X, euler.x);
        let qy = Self::from_axis_angle_degrees(Vec3::Y, euler.y);
        let qz = Self::from_axis_angle_degrees(Vec3::Z, euler.z);
        qy * qx * qz
    }

    /// Shortest-arc rotation taking direction `from` onto direction `to`.
    #[must_use]
    pub fn from_rotation_arc(from: Vec3, to: Vec3) -> Self {
        let (Some(from), Some(to)) = (from.normalized(), to.normalized()) else {
            return Self::IDENTITY;
        };
        let dot = from.dot(to);
        if dot >= 1.0 - Tolerance::TIGHT.eps {
            return Self::IDENTITY;
        }
        if dot <= -1.0 + Tolerance::TIGHT.eps {
            // Half turn around the part of +Y (or +X) perpendicular to `from`.
            let axis = (Vec3::Y - from * from.y)
                .normalized()
                .filter(|_| from.y.abs() < 1.0 - Tolerance::LOOSE.eps)
                .unwrap_or_else(|| (Vec3::X - from * from.x).normalize_or_zero());
            return Self::from_axis_angle(axis, std::f64::consts::PI);
        }
        let axis = from.cross(to);
        Self::new(axis.x, axis.y, axis.z, 1.0 + dot).normalize()
    }

    /// Rotation whose +Z axis points along `forward` and whose +Y axis lies in
    /// the plane spanned by `forward` and `up`.
    ///
    /// A zero `forward` gives the identity. When `up` is parallel to `forward`
    /// the shortest arc from +Z is used instead.
    #[must_use]
    pub fn look_rotation(forward: Vec3, up: Vec3) -> Self {
        let Some(forward) = forward.normalized() else {
            return Self::IDENTITY;
        };
        let right = up.cross(forward);
        if right.length_squared() <= Tolerance::ZERO_LENGTH.eps {
            return Self::from_rotation_arc(Vec3::Z, forward);
        }
        let right = right.normalize_or_zero();
        let up = forward.cross(right);
        Self::from_basis(right, up, forward)
    }

    /// Quaternion from an orthonormal basis (the columns of a rotation matrix).
    #[must_use]
    pub fn from_basis(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Self {
        let (m00, m01, m02) = (x_axis.x, y_axis.x, z_axis.x);
        let (m10, m11, m12) = (x_axis.y, y_axis.y, z_axis.y);
        let (m20, m21, m22) = (x_axis.z, y_axis.z, z_axis.z);
        let trace = m00 + m11 + m22;
        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new((m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s)
        } else if m00 > m11 && m00 > m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
            Self::new(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
        } else if m11 > m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
            Self::new((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
            Self::new((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
        };
        q.normalize()
    }

    #[must_use]
    pub fn normalize(self) -> Self {
        let len = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt();
        if len.is_finite() && len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
        } else {
            Self::IDENTITY
        }
    }

    #[must_use]
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let q = Vec3::new(self.x, self.y, self.z);
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }

    #[must_use]
    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quat {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

impl Mul<Vec3> for Quat {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        self.rotate(rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transform
// ─────────────────────────────────────────────────────────────────────────────

/// Affine placement of a path frame: columns are the scaled local axes plus
/// the translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    axes: [Vec3; 3],
    translation: Vec3,
}

impl Transform {
    /// Translation · rotation · scale.
    #[must_use]
    pub fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            axes: [
                rotation.rotate(Vec3::X) * scale.x,
                rotation.rotate(Vec3::Y) * scale.y,
                rotation.rotate(Vec3::Z) * scale.z,
            ],
            translation,
        }
    }

    #[must_use]
    pub const fn translation(self) -> Vec3 {
        self.translation
    }

    /// Map a point from frame space into world space.
    #[must_use]
    pub fn apply_point(self, p: Vec3) -> Vec3 {
        let [x, y, z] = self.axes;
        self.translation + x * p.x + y * p.y + z * p.z
    }

    /// The 4x4 matrix in column-major order.
    #[must_use]
    pub fn to_cols_array(self) -> [f64; 16] {
        let [x, y, z] = self.axes;
        let t = self.translation;
        [
            x.x, x.y, x.z, 0.0, //
            y.x, y.y, y.z, 0.0, //
            z.x, z.y, z.z, 0.0, //
            t.x, t.y, t.z, 1.0,
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BBox
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BBox {
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let mut iter = points.iter().copied();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::new(min, max))
    }

    /// Center point of the bounding box.
    #[must_use]
    pub fn center(self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Size (dimensions) of the bounding box.
    #[must_use]
    pub fn size(self) -> Vec3 {
        self.max - self.min
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Tolerance configuration for geometric comparisons.
///
/// - `Tolerance::DEFAULT` - General comparisons and direction normalization (1e-9)
/// - `Tolerance::ZERO_LENGTH` - Degenerate cross products (1e-12)
/// - `Tolerance::LOOSE` - Coarse comparisons, e.g. sampled geometry (1e-6)
/// - `Tolerance::TIGHT` - Near-parallel direction checks (1e-12)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Default geometric tolerance (1e-9).
    pub const DEFAULT: Self = Self { eps: 1e-9 };

    /// Tolerance for detecting zero-length/degenerate vectors (1e-12).
    pub const ZERO_LENGTH: Self = Self { eps: 1e-12 };

    /// Loose tolerance for coarse comparisons (1e-6).
    pub const LOOSE: Self = Self { eps: 1e-6 };

    /// Tight tolerance for precise comparisons (1e-12).
    pub const TIGHT: Self = Self { eps: 1e-12 };
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
