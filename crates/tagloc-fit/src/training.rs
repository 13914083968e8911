//! Training examples derived from calibration photographs.

use log::warn;
use serde::{Deserialize, Serialize};
use tagloc_core::{HomographyMatrix, RawDetection, Real, Resolution};

use crate::TrainingError;

/// One calibration photograph as seen by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPhoto {
    /// Image file name, used in diagnostics.
    pub image: String,
    /// True forward distance of the marker (metres).
    pub z: Real,
    /// True lateral offset of the marker, camera-right positive (metres).
    #[serde(default)]
    pub x: Real,
    /// Size of the photograph in pixels.
    pub resolution: Resolution,
    /// Everything the detector found in the photograph.
    #[serde(default)]
    pub detections: Vec<RawDetection>,
}

/// Homography of the reference marker plus its true position.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub homography: HomographyMatrix,
    pub resolution: Resolution,
    pub z_distance: Real,
    pub x_offset: Real,
}

impl TrainingExample {
    pub fn new(
        homography: HomographyMatrix,
        resolution: Resolution,
        z_distance: Real,
        x_offset: Real,
    ) -> Self {
        Self {
            homography,
            resolution,
            z_distance,
            x_offset,
        }
    }

    /// Build an example from the detections of one photograph, which must
    /// contain exactly one marker.
    pub fn from_detections(
        image: &str,
        detections: &[RawDetection],
        resolution: Resolution,
        z_distance: Real,
        x_offset: Real,
    ) -> Result<Self, TrainingError> {
        match detections {
            [single] => Ok(Self::new(
                single.homography_matrix(),
                resolution,
                z_distance,
                x_offset,
            )),
            [] => Err(TrainingError::NoMarker {
                image: image.to_string(),
            }),
            many => Err(TrainingError::MultipleMarkers {
                image: image.to_string(),
                count: many.len(),
            }),
        }
    }

    pub fn from_photo(photo: &CalibrationPhoto) -> Result<Self, TrainingError> {
        Self::from_detections(
            &photo.image,
            &photo.detections,
            photo.resolution,
            photo.z,
            photo.x,
        )
    }
}

/// Usable examples plus the photographs that were rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    pub examples: Vec<TrainingExample>,
    pub skipped: Vec<TrainingError>,
}

/// Convert photographs into examples, skipping (and logging) unusable ones.
pub fn collect_training_examples<'a, I>(photos: I) -> TrainingSet
where
    I: IntoIterator<Item = &'a CalibrationPhoto>,
{
    let mut set = TrainingSet::default();
    for photo in photos {
        match TrainingExample::from_photo(photo) {
            Ok(example) => set.examples.push(example),
            Err(err) => {
                warn!("skipping calibration photo: {err}");
                set.skipped.push(err);
            }
        }
    }
    set
}
