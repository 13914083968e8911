//! Token assembly: one detection in, one fully described marker out.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};
use tagloc_core::{
    marker_footprint, Cartesian, GeometryError, HomographyMatrix, LegacyPolar, MarkerSizeTable,
    PixelCoordinate, RawDetection, Real, Spherical,
};
use tagloc_model::{DistanceModel, ModelError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Metric position of a marker in all reported coordinate systems.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Localization {
    pub cartesian: Cartesian,
    pub spherical: Spherical,
    pub legacy_polar: LegacyPolar,
}

impl Localization {
    pub fn from_cartesian(cartesian: Cartesian) -> Self {
        Self {
            cartesian,
            spherical: cartesian.to_spherical(),
            legacy_polar: cartesian.to_legacy_polar(),
        }
    }
}

/// A detected marker.
///
/// Tokens compare and hash by `id` only, so a set of tokens holds at most one
/// token per marker id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: u32,
    pub certainty: Real,
    /// Counter-clockwise from the marker's own bottom-left corner.
    pub pixel_corners: [PixelCoordinate; 4],
    pub pixel_centre: PixelCoordinate,
    #[serde(with = "homography_rows")]
    pub homography: HomographyMatrix,
    /// Present only when the token was built with a distance model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localization: Option<Localization>,
}

impl Token {
    pub fn localization(&self) -> Option<&Localization> {
        self.localization.as_ref()
    }

    pub fn cartesian(&self) -> Option<Cartesian> {
        self.localization.map(|l| l.cartesian)
    }

    /// Straight-line distance to the camera, in metres.
    pub fn distance(&self) -> Option<Real> {
        self.localization.map(|l| l.spherical.dist)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token: {}, certainty: {}", self.id, self.certainty)
    }
}

/// Assemble a token from a raw detection.
///
/// Without a `model` the token carries only pixel geometry. With one, the
/// marker's size is looked up in `sizes` (falling back to the table default)
/// and the model's estimate is scaled accordingly.
pub fn build_token(
    detection: &RawDetection,
    model: Option<&DistanceModel>,
    sizes: &MarkerSizeTable,
) -> Result<Token, TokenError> {
    let homography = detection.homography_matrix();
    let footprint = marker_footprint(&homography)?;
    let localization = model
        .map(|m| m.estimate_for_id(&homography, detection.id, sizes))
        .transpose()?
        .map(Localization::from_cartesian);

    Ok(Token {
        id: detection.id,
        certainty: detection.certainty,
        pixel_corners: footprint.corners,
        pixel_centre: footprint.centre,
        homography,
        localization,
    })
}

/// Serialize homographies as nested rows, matching the detector interface.
mod homography_rows {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use tagloc_core::{homography_from_rows, homography_to_rows, HomographyMatrix, Real};

    pub fn serialize<S: Serializer>(h: &HomographyMatrix, s: S) -> Result<S::Ok, S::Error> {
        homography_to_rows(h).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<HomographyMatrix, D::Error> {
        let rows = <[[Real; 3]; 3]>::deserialize(d)?;
        Ok(homography_from_rows(&rows))
    }
}
