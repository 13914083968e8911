//! Calibration manifests: the photographs of one fitting session.
//!
//! ```json
//! {
//!   "version": 2,
//!   "marker_size": 0.25,
//!   "files": [
//!     { "image": "100cm.jpg", "z": 1.0, "x": 0.0,
//!       "resolution": { "width": 1280, "height": 720 },
//!       "detections": [ { "id": 23, "certainty": 0.9, "homography": [[...], [...], [...]] } ] }
//!   ]
//! }
//! ```

use std::{fs, path::Path};

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use tagloc_core::Real;

use crate::{
    collect_training_examples, fit_calibration_with, CalibrationPhoto, FitConfig, FitReport,
    TrainingSet,
};

/// Manifest version understood by this crate.
pub const MANIFEST_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationManifest {
    pub version: u32,
    /// Side length of the reference marker (metres). Absent in version 1.
    #[serde(default)]
    pub marker_size: Option<Real>,
    #[serde(default)]
    pub files: Vec<CalibrationPhoto>,
}

impl CalibrationManifest {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(json).context("malformed calibration manifest")?;
        manifest.check_version()?;
        Ok(manifest)
    }

    fn check_version(&self) -> Result<()> {
        match self.version {
            MANIFEST_VERSION => {}
            1 => bail!(
                "calibration manifest version 1 has no marker size; add `marker_size` (metres) and set `version` to {MANIFEST_VERSION}"
            ),
            v => bail!("unsupported calibration manifest version {v} (expected {MANIFEST_VERSION})"),
        }
        ensure!(
            self.marker_size.is_some(),
            "calibration manifest is missing `marker_size`"
        );
        Ok(())
    }

    /// Reference marker size; present once the version check has passed.
    pub fn marker_size(&self) -> Result<Real> {
        self.marker_size
            .context("calibration manifest is missing `marker_size`")
    }
}

pub fn load_manifest(path: &Path) -> Result<CalibrationManifest> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    CalibrationManifest::from_json_str(&json)
        .with_context(|| format!("invalid manifest {}", path.display()))
}

/// Training examples of a manifest; unusable photographs are skipped.
pub fn training_examples_from_manifest(manifest: &CalibrationManifest) -> TrainingSet {
    collect_training_examples(&manifest.files)
}

/// Fit every usable photograph of `manifest`.
pub fn fit_manifest(manifest: &CalibrationManifest, config: &FitConfig) -> Result<FitReport> {
    let marker_size = manifest.marker_size()?;
    let set = training_examples_from_manifest(manifest);
    let mut report = fit_calibration_with(&set.examples, marker_size, config).with_context(|| {
        format!(
            "fitting failed ({} usable of {} photographs)",
            set.examples.len(),
            manifest.files.len()
        )
    })?;
    report.examples_skipped = set.skipped.len();
    Ok(report)
}
