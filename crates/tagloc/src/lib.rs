//! Fiducial marker localisation.
//!
//! `tagloc` turns a single marker detection (id, certainty and the homography
//! mapping the canonical marker square `[-1, 1]²` to image pixels) into a
//! [`Token`]: the marker's pixel footprint plus, when a calibrated distance
//! model is available, its metric position relative to the camera.
//!
//! ```no_run
//! use tagloc::{Localizer, LocalizerConfig};
//! use tagloc::core::{RawDetection, Resolution};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = LocalizerConfig::from_file("localizer.json".as_ref())?;
//! let localizer = Localizer::new(&config);
//!
//! let detections: Vec<RawDetection> = /* from the marker detector */
//! # vec![];
//! let tokens = localizer.build_tokens(&detections, Resolution::new(1280, 720), Some("c270"))?;
//! for token in &tokens {
//!     println!("{token}: {:?}", token.distance());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - **[`core`]**: coordinates, pixel geometry, marker sizes, synthetic scenes
//! - **[`model`]**: distance models, calibration records and their on-disk format
//! - **[`fit`]**: fitting calibration records from calibration photographs
//!
//! Token assembly and the [`Localizer`] live at the crate root.

mod localizer;
mod token;

pub use localizer::*;
pub use token::*;

/// Coordinates, pixel geometry, marker sizes and synthetic marker scenes.
pub mod core {
    pub use tagloc_core::*;
}

/// Distance models, calibration records, blob format and model registry.
pub mod model {
    pub use tagloc_model::*;
}

/// Calibration fitting from training photographs.
pub mod fit {
    pub use tagloc_fit::*;
}

/// Convenient re-exports for common use cases.
pub mod prelude {
    pub use crate::{build_token, Localization, Localizer, LocalizerConfig, Token, TokenError};
    pub use tagloc_core::{Cartesian, MarkerSize, MarkerSizeTable, RawDetection, Resolution};
    pub use tagloc_fit::{fit_calibration, FitReport, TrainingExample};
    pub use tagloc_model::{CalibrationRecord, DistanceModel, ModelError, ModelRegistry};
}
