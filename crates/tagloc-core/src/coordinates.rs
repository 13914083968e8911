//! Cartesian, spherical and legacy polar coordinates.
//!
//! Cartesian coordinates are metres relative to the camera: `x` to the
//! camera's right, `y` vertical and `z` forward. The spherical and legacy
//! polar forms are pure views derived from a Cartesian position.

use serde::{Deserialize, Serialize};

use crate::{Pt2, Real, Vec3};

/// Position relative to the camera, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cartesian {
    /// Lateral offset, positive to the camera's right.
    pub x: Real,
    /// Vertical offset.
    pub y: Real,
    /// Forward distance from the camera.
    pub z: Real,
}

impl Cartesian {
    pub fn new(x: Real, y: Real, z: Real) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance from the camera.
    pub fn norm(&self) -> Real {
        self.to_vec3().norm()
    }

    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Multiply every component by `factor`.
    pub fn scaled(&self, factor: Real) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn to_spherical(&self) -> Spherical {
        cartesian_to_spherical(self)
    }

    pub fn to_legacy_polar(&self) -> LegacyPolar {
        cartesian_to_legacy_polar(self)
    }
}

impl From<Vec3> for Cartesian {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Angle pair plus distance.
///
/// `rot_x` is the elevation `atan2(y, z)`, `rot_y` the azimuth `atan2(x, z)`.
/// This is not the textbook spherical system; both angles are measured from
/// the camera's forward axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Spherical {
    pub rot_x: Real,
    pub rot_y: Real,
    pub dist: Real,
}

/// Angle convention kept for older consumers.
///
/// `polar_x = atan2(z, x)`, `polar_y = atan2(z, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LegacyPolar {
    pub polar_x: Real,
    pub polar_y: Real,
    pub dist: Real,
}

/// A location in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub x: Real,
    pub y: Real,
}

impl PixelCoordinate {
    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }
}

impl From<Pt2> for PixelCoordinate {
    fn from(p: Pt2) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<PixelCoordinate> for Pt2 {
    fn from(p: PixelCoordinate) -> Self {
        Pt2::new(p.x, p.y)
    }
}

/// Convert a Cartesian position into the spherical view.
pub fn cartesian_to_spherical(c: &Cartesian) -> Spherical {
    Spherical {
        rot_x: c.y.atan2(c.z),
        rot_y: c.x.atan2(c.z),
        dist: c.norm(),
    }
}

/// Convert a Cartesian position into the legacy polar view.
pub fn cartesian_to_legacy_polar(c: &Cartesian) -> LegacyPolar {
    LegacyPolar {
        polar_x: c.z.atan2(c.x),
        polar_y: c.z.atan2(c.y),
        dist: c.norm(),
    }
}
