//! Types exchanged with the marker detector and the camera.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{homography_from_rows, HomographyMatrix, Real};

/// Image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// One marker as reported by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Marker id decoded from the tag.
    pub id: u32,
    /// Decode confidence in `[0, 1]`.
    pub certainty: Real,
    /// Row-major homography from the canonical square to pixels.
    pub homography: [[Real; 3]; 3],
    /// Corner pixels in the detector's native order.
    ///
    /// Carried through for callers that want the detector's own corners;
    /// localisation recomputes corners from `homography`.
    #[serde(default)]
    pub pixel_corners: Vec<[Real; 2]>,
}

impl RawDetection {
    pub fn new(id: u32, certainty: Real, homography: &HomographyMatrix) -> Self {
        Self {
            id,
            certainty,
            homography: crate::homography_to_rows(homography),
            pixel_corners: Vec::new(),
        }
    }

    pub fn homography_matrix(&self) -> HomographyMatrix {
        homography_from_rows(&self.homography)
    }
}
