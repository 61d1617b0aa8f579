//! Control points and tangent handles.
//!
//! A [`ControlPoint`] is a plain value: the owning [`BezierPath`](super::BezierPath)
//! hands out shared references and applies every edit through its own setters,
//! so derived tangents and frames never go stale.

use serde::{Deserialize, Serialize};

use super::Vec3;

/// How a tangent handle gets its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CurveType {
    /// Fitted from the neighbouring points.
    #[default]
    Auto,
    /// One third of the way towards the neighbouring point.
    Linear,
    /// Authored directly.
    Free,
}

impl CurveType {
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Auto),
            1 => Some(Self::Linear),
            2 => Some(Self::Free),
            _ => None,
        }
    }

    /// Connection type that fits a tangent switching to this curve type.
    #[must_use]
    pub const fn preferred_connection_type(self, current: ConnectionType) -> ConnectionType {
        match self {
            Self::Auto => ConnectionType::Connected,
            Self::Linear => ConnectionType::Broken,
            Self::Free => current,
        }
    }
}

/// Constraint between the two tangents of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectionType {
    /// Tangents move independently.
    Broken,
    /// Opposite directions, independent lengths.
    #[default]
    Connected,
    /// Opposite directions, equal lengths.
    Mirrored,
}

impl ConnectionType {
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Broken),
            1 => Some(Self::Connected),
            2 => Some(Self::Mirrored),
            _ => None,
        }
    }
}

/// Which scale components are authored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScaleInputType {
    /// One value drives all three axes.
    #[default]
    Float,
    /// X and Y are independent, Z is locked to 1.
    Vector2,
    Vector3,
}

impl ScaleInputType {
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Float),
            1 => Some(Self::Vector2),
            2 => Some(Self::Vector3),
            _ => None,
        }
    }

    /// Project a scale onto the components this mode keeps.
    #[must_use]
    pub const fn normalize(self, scale: Vec3) -> Vec3 {
        match self {
            Self::Float => Vec3::new(scale.x, scale.x, scale.x),
            Self::Vector2 => Vec3::new(scale.x, scale.y, 1.0),
            Self::Vector3 => scale,
        }
    }
}

/// Absolute position of a tangent handle and the rule that places it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TangentHandle {
    pub position: Vec3,
    pub curve_type: CurveType,
}

impl TangentHandle {
    #[must_use]
    pub const fn new(position: Vec3, curve_type: CurveType) -> Self {
        Self { position, curve_type }
    }
}

/// An authored anchor of the path.
///
/// `smart_up_vector` is derived by the frame pass and is not serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub position: Vec3,
    pub in_tangent: TangentHandle,
    pub out_tangent: TangentHandle,
    pub connection_type: ConnectionType,
    /// Degrees, added to the path roll.
    pub roll: f64,
    /// Multiplied component-wise with the path scale.
    pub scale: Vec3,
    #[serde(skip, default = "default_up")]
    pub(crate) smart_up_vector: Vec3,
}

const fn default_up() -> Vec3 {
    Vec3::Y
}

impl ControlPoint {
    /// Point with auto tangents one unit away along ∓X.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            in_tangent: TangentHandle::new(position - Vec3::X, CurveType::Auto),
            out_tangent: TangentHandle::new(position + Vec3::X, CurveType::Auto),
            connection_type: CurveType::Auto.preferred_connection_type(ConnectionType::Broken),
            roll: 0.0,
            scale: Vec3::ONE,
            smart_up_vector: default_up(),
        }
    }

    #[must_use]
    pub fn in_tangent_offset(&self) -> Vec3 {
        self.in_tangent.position - self.position
    }

    #[must_use]
    pub fn out_tangent_offset(&self) -> Vec3 {
        self.out_tangent.position - self.position
    }

    /// Twist-minimized up vector propagated along the path.
    #[must_use]
    pub const fn smart_up_vector(&self) -> Vec3 {
        self.smart_up_vector
    }

    /// Both tangent handles are authored.
    #[must_use]
    pub fn tangents_free(&self) -> bool {
        self.in_tangent.curve_type == CurveType::Free && self.out_tangent.curve_type == CurveType::Free
    }

    /// Move the point, carrying both tangents along.
    pub(crate) fn translate_to(&mut self, position: Vec3) {
        let delta = position - self.position;
        self.position = position;
        self.in_tangent.position += delta;
        self.out_tangent.position += delta;
    }
}

impl Default for ControlPoint {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
