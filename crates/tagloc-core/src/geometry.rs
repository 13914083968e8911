//! Pixel-space features of a detected marker.
//!
//! A marker homography maps the canonical square `[-1, 1]²` into the image.
//! Projecting the square's corners and origin yields the marker's pixel
//! corners and centre:
//!
//! ```text
//! x' = (h00·u + h01·v + h02) / (h20·u + h21·v + h22)
//! y' = (h10·u + h11·v + h12) / (h20·u + h21·v + h22)
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{HomographyMatrix, Mat3, PixelCoordinate, Real, Vec3};

/// Errors raised while projecting through a homography.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// The homogeneous coordinate of the projected point is exactly zero.
    #[error("homography maps marker point ({u}, {v}) to infinity (zero homogeneous coordinate)")]
    PointAtInfinity { u: Real, v: Real },
}

/// Corners of the canonical marker square in detector order.
pub const CANONICAL_CORNERS: [(Real, Real); 4] = [(-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0), (1.0, -1.0)];

/// Pixel corners and centre of one marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerFootprint {
    /// Corners counter-clockwise from the marker's own bottom-left corner.
    pub corners: [PixelCoordinate; 4],
    /// Image of the marker origin.
    pub centre: PixelCoordinate,
}

/// Project a point of the canonical marker square into the image.
pub fn project_marker_point(
    h: &HomographyMatrix,
    u: Real,
    v: Real,
) -> Result<PixelCoordinate, GeometryError> {
    let p = h * Vec3::new(u, v, 1.0);
    if p.z == 0.0 {
        return Err(GeometryError::PointAtInfinity { u, v });
    }
    Ok(PixelCoordinate::new(p.x / p.z, p.y / p.z))
}

/// Pixel corners of the marker.
///
/// The detector's canonical order starts at `(-1, -1)`; the list is rotated
/// by one so that index 0 is the marker's bottom-left corner `(-1, 1)`.
/// Consumers index corners positionally, so this order is fixed.
pub fn pixel_corners(h: &HomographyMatrix) -> Result<[PixelCoordinate; 4], GeometryError> {
    let mut corners = [PixelCoordinate::default(); 4];
    for (slot, &(u, v)) in corners.iter_mut().zip(CANONICAL_CORNERS.iter()) {
        *slot = project_marker_point(h, u, v)?;
    }
    corners.rotate_left(1);
    Ok(corners)
}

/// Pixel position of the marker centre.
pub fn pixel_centre(h: &HomographyMatrix) -> Result<PixelCoordinate, GeometryError> {
    project_marker_point(h, 0.0, 0.0)
}

/// Corners and centre in one pass.
pub fn marker_footprint(h: &HomographyMatrix) -> Result<MarkerFootprint, GeometryError> {
    Ok(MarkerFootprint {
        corners: pixel_corners(h)?,
        centre: pixel_centre(h)?,
    })
}

/// Homography of the same marker turned in-plane by `quarter_turns × 90°`.
///
/// Composes `H` with a rotation of the canonical square `(u, v) -> (-v, u)`.
/// Each quarter turn shifts [`pixel_corners`] right by one position and
/// leaves [`pixel_centre`] unchanged.
pub fn rotate_marker_quarter_turns(h: &HomographyMatrix, quarter_turns: u8) -> HomographyMatrix {
    let quarter = Mat3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
    let mut out = *h;
    for _ in 0..(quarter_turns % 4) {
        out *= quarter;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_px(a: PixelCoordinate, b: PixelCoordinate, tol: Real) {
        assert!(
            (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol,
            "pixels differ: {:?} vs {:?} (tol={})",
            a,
            b,
            tol
        );
    }

    fn scale_translate(s: Real, tx: Real, ty: Real) -> Mat3 {
        Mat3::new(s, 0.0, tx, 0.0, s, ty, 0.0, 0.0, 1.0)
    }

    #[test]
    fn centre_is_translation() {
        let h = scale_translate(50.0, 640.0, 360.0);
        let c = pixel_centre(&h).unwrap();
        assert_eq!(c, PixelCoordinate::new(640.0, 360.0));
    }

    #[test]
    fn corners_start_at_bottom_left_and_run_counter_clockwise() {
        let h = scale_translate(10.0, 100.0, 200.0);
        let corners = pixel_corners(&h).unwrap();
        let expected = [
            PixelCoordinate::new(90.0, 210.0),
            PixelCoordinate::new(110.0, 210.0),
            PixelCoordinate::new(110.0, 190.0),
            PixelCoordinate::new(90.0, 190.0),
        ];
        for (c, e) in corners.iter().zip(expected.iter()) {
            approx_px(*c, *e, 1e-12);
        }
    }

    #[test]
    fn perspective_division_is_applied() {
        let h = Mat3::new(10.0, 0.0, 100.0, 0.0, 10.0, 50.0, 0.0, 0.0, 2.0);
        let c = pixel_centre(&h).unwrap();
        approx_px(c, PixelCoordinate::new(50.0, 25.0), 1e-12);

        let tilted = Mat3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.5, 0.0, 1.0);
        let p = project_marker_point(&tilted, 1.0, 1.0).unwrap();
        approx_px(p, PixelCoordinate::new(1.0 / 1.5, 1.0 / 1.5), 1e-12);
    }

    #[test]
    fn zero_homogeneous_coordinate_is_an_error() {
        let h = Mat3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(
            pixel_centre(&h),
            Err(GeometryError::PointAtInfinity { u: 0.0, v: 0.0 })
        );

        // Corners with u == 1 have w == 0; (1, 1) is projected first.
        let h = Mat3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -1.0);
        assert!(matches!(
            pixel_corners(&h),
            Err(GeometryError::PointAtInfinity { u, v }) if u == 1.0 && v == 1.0
        ));
    }

    #[test]
    fn quarter_turns_shift_corners_and_keep_centre() {
        let h = Mat3::new(42.0, 3.0, 512.0, -2.0, 40.0, 300.0, 1e-4, 2e-4, 1.0);
        let base = marker_footprint(&h).unwrap();

        for k in 1..4u8 {
            let turned = marker_footprint(&rotate_marker_quarter_turns(&h, k)).unwrap();
            approx_px(turned.centre, base.centre, 1e-9);

            let mut expected = base.corners;
            expected.rotate_right(k as usize);
            for (c, e) in turned.corners.iter().zip(expected.iter()) {
                approx_px(*c, *e, 1e-9);
            }
        }

        assert_eq!(rotate_marker_quarter_turns(&h, 4), h);
    }
}
