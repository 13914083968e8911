//! Marker localisation from a calibrated distance model.

use std::sync::Arc;

use tagloc_core::{Cartesian, HomographyMatrix, MarkerSize, MarkerSizeTable, Real};

use crate::{CalibrationRecord, ModelError};

/// A calibration record bound to the name it was loaded under.
#[derive(Debug, Clone)]
pub struct DistanceModel {
    name: String,
    record: Arc<CalibrationRecord>,
}

impl DistanceModel {
    /// Bind `record` to `name`, rejecting records that do not match the
    /// current feature layout.
    pub fn new(
        name: impl Into<String>,
        record: Arc<CalibrationRecord>,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        record.validate(&name)?;
        Ok(Self { name, record })
    }

    /// For records the registry has already validated.
    pub(crate) fn validated(name: &str, record: Arc<CalibrationRecord>) -> Self {
        Self {
            name: name.to_string(),
            record,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record(&self) -> &Arc<CalibrationRecord> {
        &self.record
    }

    /// Position of a marker with the calibrated physical size.
    pub fn estimate_raw(&self, h: &HomographyMatrix) -> Cartesian {
        self.record.predict_raw(h)
    }

    /// Position of a marker of physical size `size`.
    ///
    /// The raw estimate is scaled by `size / marker_size`: a marker twice as
    /// large producing the same image is twice as far away.
    pub fn estimate(
        &self,
        h: &HomographyMatrix,
        id: u32,
        size: MarkerSize,
    ) -> Result<Cartesian, ModelError> {
        if !size.is_square() {
            return Err(ModelError::NonSquareMarker {
                id,
                width: size.width,
                height: size.height,
            });
        }
        let raw = self.estimate_raw(h);
        let scale = self.size_ratio(size.width);
        Ok(if scale == 1.0 { raw } else { raw.scaled(scale) })
    }

    /// Position of marker `id`, sized from `sizes` (or the table default).
    pub fn estimate_for_id(
        &self,
        h: &HomographyMatrix,
        id: u32,
        sizes: &MarkerSizeTable,
    ) -> Result<Cartesian, ModelError> {
        self.estimate(h, id, sizes.size_of(id))
    }

    fn size_ratio(&self, actual: Real) -> Real {
        if actual == self.record.marker_size {
            1.0
        } else {
            actual / self.record.marker_size
        }
    }
}
