//! Objects pinned to a point on a path.

use serde::{Deserialize, Serialize};

use super::{PathQuery, Quat, Vec3};

/// How an attachment's location along the path is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MeasurementUnit {
    #[default]
    Time,
    Distance,
}

impl MeasurementUnit {
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Time),
            1 => Some(Self::Distance),
            _ => None,
        }
    }
}

/// Placement of an object on a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathAttachment {
    pub unit: MeasurementUnit,
    /// Arc length from the first point, used with [`MeasurementUnit::Distance`].
    pub distance: f64,
    /// Global parameter in `[0, 1]`, used with [`MeasurementUnit::Time`].
    pub time: f64,
    pub copy_rotation: bool,
    /// Euler angles in degrees, applied after the path rotation.
    pub additional_rotation: Vec3,
    pub copy_scale: bool,
    pub additional_scale: Vec3,
}

impl Default for PathAttachment {
    fn default() -> Self {
        Self {
            unit: MeasurementUnit::Time,
            distance: 0.0,
            time: 0.0,
            copy_rotation: false,
            additional_rotation: Vec3::ZERO,
            copy_scale: false,
            additional_scale: Vec3::ONE,
        }
    }
}

/// Resolved transform parts; rotation and scale are only present when copied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttachmentPose {
    pub position: Vec3,
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,
}

impl PathAttachment {
    /// Global parameter this attachment sits at on `path`.
    #[must_use]
    pub fn time_on(&self, path: &impl PathQuery) -> f64 {
        match self.unit {
            MeasurementUnit::Distance => path.distance_to_time(self.distance),
            MeasurementUnit::Time => self.time.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn resolve(&self, path: &impl PathQuery) -> AttachmentPose {
        let t = self.time_on(path);
        AttachmentPose {
            position: path.position_at_time(t),
            rotation: self
                .copy_rotation
                .then(|| path.rotation_at_time(t) * Quat::from_euler_degrees(self.additional_rotation)),
            scale: self
                .copy_scale
                .then(|| path.scale_at_time(t).mul_elem(self.additional_scale)),
        }
    }
}
