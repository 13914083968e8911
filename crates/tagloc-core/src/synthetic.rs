//! Synthetic marker scenes.
//!
//! Markers are square, upright (no tilt about the camera's x axis) and may be
//! yawed about the vertical axis and turned in-plane in 90° steps. The camera
//! is an ideal pinhole with the principal point at the image centre.
//!
//! Noise helpers avoid `thread_rng` and any dependency on the internal
//! algorithm of `rand` RNGs, so generated scenes are stable across versions
//! and platforms.

use crate::{
    normalize_homography, rotate_marker_quarter_turns, HomographyMatrix, Mat3, Real, Resolution,
};

/// Ideal pinhole camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinholeCamera {
    /// Focal length in pixels.
    pub focal_px: Real,
    pub resolution: Resolution,
}

impl PinholeCamera {
    pub fn new(focal_px: Real, resolution: Resolution) -> Self {
        Self {
            focal_px,
            resolution,
        }
    }

    /// Principal point at the image centre.
    pub fn principal_point(&self) -> (Real, Real) {
        (
            self.resolution.width as Real / 2.0,
            self.resolution.height as Real / 2.0,
        )
    }

    /// Homography observed for a marker at `placement`, scaled so `H[2,2] == 1`.
    pub fn marker_homography(&self, placement: &MarkerPlacement) -> HomographyMatrix {
        let f = self.focal_px;
        let (cx, cy) = self.principal_point();
        let s = placement.side / 2.0;
        let (sin, cos) = placement.yaw.sin_cos();
        let (x, z) = (placement.x, placement.z);

        // Marker point (u, v) sits at (x + s·u·cos, s·v, z + s·u·sin) in the camera frame.
        let h = Mat3::new(
            f * s * cos + cx * s * sin,
            0.0,
            f * x + cx * z,
            cy * s * sin,
            f * s,
            cy * z,
            s * sin,
            0.0,
            z,
        );
        normalize_homography(&rotate_marker_quarter_turns(&h, placement.quarter_turns))
    }
}

/// Where a synthetic marker sits relative to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPlacement {
    /// Lateral offset of the marker centre (metres, camera-right positive).
    pub x: Real,
    /// Forward distance of the marker centre (metres).
    pub z: Real,
    /// Marker side length (metres).
    pub side: Real,
    /// Rotation about the vertical axis (radians).
    pub yaw: Real,
    /// In-plane rotation in 90° steps.
    pub quarter_turns: u8,
}

impl MarkerPlacement {
    /// Marker facing the camera squarely.
    pub fn facing(x: Real, z: Real, side: Real) -> Self {
        Self {
            x,
            z,
            side,
            yaw: 0.0,
            quarter_turns: 0,
        }
    }

    pub fn with_yaw(mut self, yaw: Real) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_quarter_turns(mut self, quarter_turns: u8) -> Self {
        self.quarter_turns = quarter_turns % 4;
        self
    }
}

/// Deterministic relative perturbation of homography entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomographyNoise {
    /// Base seed controlling the pseudo-random sequence.
    pub seed: u64,
    /// Maximum relative perturbation applied to each entry.
    pub max_rel: Real,
}

impl Default for HomographyNoise {
    fn default() -> Self {
        Self {
            seed: 0,
            max_rel: 0.0,
        }
    }
}

impl HomographyNoise {
    /// Deterministic sample in `[-1, 1)` for a `(view_idx, entry_idx)` key.
    #[inline]
    pub fn sample(&self, view_idx: usize, entry_idx: usize) -> Real {
        let key = mix_key(self.seed, view_idx, entry_idx);
        (u64_to_unit_f64(splitmix64(key)) - 0.5) * 2.0
    }

    /// Perturb every entry of `h` by at most `max_rel` of its magnitude.
    pub fn apply(&self, view_idx: usize, h: &HomographyMatrix) -> HomographyMatrix {
        let max_rel = self.max_rel.abs();
        if max_rel == 0.0 {
            return *h;
        }
        let mut out = *h;
        for (entry_idx, value) in out.iter_mut().enumerate() {
            *value *= 1.0 + max_rel * self.sample(view_idx, entry_idx);
        }
        out
    }
}

// Key mixing and SplitMix64 follow the calibration toolbox's synthetic noise helpers.
#[inline]
fn mix_key(seed: u64, view_idx: usize, entry_idx: usize) -> u64 {
    seed ^ (view_idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (entry_idx as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9)
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[inline]
fn u64_to_unit_f64(x: u64) -> Real {
    // Top 53 bits as a double in [0, 1).
    let mantissa = x >> 11;
    (mantissa as Real) * (1.0 / ((1u64 << 53) as Real))
}
