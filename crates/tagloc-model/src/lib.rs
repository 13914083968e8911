//! Homography distance models for `tagloc`.
//!
//! A distance model maps a marker homography to a metric offset along one
//! axis. Two fitted components (lateral `x` and forward `z`) together with the
//! camera resolution and the reference marker size form a
//! [`CalibrationRecord`], which is persisted as a compressed, versioned blob
//! and served to callers through a [`ModelRegistry`].
//!
//! # Modules
//!
//! - \[`features`\]: the fixed 90-element feature layout shared with the fitter.
//! - \[`blob`\]: on-disk format (`bincode` payload, `lz4` compression).
//! - \[`registry`\]: per-(name, resolution) cache of loaded records.

mod component;
mod engine;
mod error;
mod record;
mod registry;

pub mod blob;
pub mod features;

pub use component::*;
pub use engine::*;
pub use error::*;
pub use features::{homography_to_feature_vector, FEATURE_LEN};
pub use record::*;
pub use registry::*;
