//! Core geometry primitives for `tagloc`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Mat3`, `Pt2`, ...),
//! - the coordinate model (Cartesian, spherical and legacy polar views),
//! - pixel-space geometry derived from a marker homography,
//! - marker sizing tables and the detector/camera interface types,
//! - deterministic synthetic marker scenes for tests and benchmarks.
//!
//! Marker homographies map the canonical marker square `[-1, 1]²` to image
//! pixels: `pixel ~ H · [u, v, 1]ᵀ`.

/// Coordinate representations and conversions.
mod coordinates;
/// Detector and camera interface types.
mod detection;
/// Pixel geometry extracted from marker homographies.
mod geometry;
/// Marker sizes and per-id lookup.
mod marker;
/// Linear algebra type aliases and helpers.
mod math;
/// Deterministic synthetic marker scenes.
///
/// Builds the homographies a pinhole camera would observe for square markers
/// placed at known offsets. Used across the workspace tests.
pub mod synthetic;

pub use coordinates::*;
pub use detection::*;
pub use geometry::*;
pub use marker::*;
pub use math::*;
