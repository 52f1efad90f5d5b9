//! Graphics rendering functions
//!
//! Straight-line and marker drawing used to annotate labeled images:
//! - Lines between fractional endpoints (truncated to pixel positions)
//! - Square dots centered on a pixel
//!
//! All rendering clips silently at the image border.

use super::GrayImageMut;
use crate::error::Result;

/// Generate the pixels of a line using Bresenham's integer algorithm.
///
/// The line connects `(r0, c0)` to `(r1, c1)` with 8-connectivity and
/// includes both endpoints. Coordinates are `(row, col)`.
pub fn generate_line_points(r0: i32, c0: i32, r1: i32, c1: i32) -> Vec<(i32, i32)> {
    if r0 == r1 && c0 == c1 {
        return vec![(r0, c0)];
    }

    let dr = (r1 - r0).abs();
    let dc = (c1 - c0).abs();
    let sr = if r1 > r0 { 1i32 } else { -1 };
    let sc = if c1 > c0 { 1i32 } else { -1 };

    let npts = dr.max(dc) + 1;
    let mut points = Vec::with_capacity(npts as usize);

    let mut r = r0;
    let mut c = c0;

    if dc >= dr {
        // Step along columns (more horizontal)
        let mut err = dc / 2;
        for _ in 0..npts {
            points.push((r, c));
            err -= dr;
            if err < 0 {
                r += sr;
                err += dc;
            }
            c += sc;
        }
    } else {
        // Step along rows (more vertical)
        let mut err = dr / 2;
        for _ in 0..npts {
            points.push((r, c));
            err -= dc;
            if err < 0 {
                c += sc;
                err += dr;
            }
            r += sr;
        }
    }

    points
}

/// Generate a line whose endpoints are shifted by `(dr, dc)`.
///
/// Used to build thick strokes out of parallel one-pixel lines.
pub fn generate_offset_line_points(
    r0: i32,
    c0: i32,
    r1: i32,
    c1: i32,
    dr: i32,
    dc: i32,
) -> Vec<(i32, i32)> {
    generate_line_points(r0 + dr, c0 + dc, r1 + dr, c1 + dc)
}

/// Truncate a fractional coordinate toward zero.
#[inline]
fn truncate(v: f64) -> i32 {
    v as i32
}

impl GrayImageMut {
    /// Set every in-bounds point to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ValueOutOfRange`] if `value` exceeds the
    /// image's maximum gray level.
    pub fn render_points(&mut self, points: &[(i32, i32)], value: u32) -> Result<()> {
        self.check_value(value)?;

        let rows = self.rows() as i32;
        let cols = self.cols() as i32;
        for &(r, c) in points {
            if r < 0 || r >= rows || c < 0 || c >= cols {
                continue;
            }
            self.set_pixel_unchecked(r as u32, c as u32, value);
        }
        Ok(())
    }

    /// Render a line between fractional endpoints.
    ///
    /// Endpoints are truncated toward zero before rasterizing; pixels
    /// outside the image are clipped.
    pub fn render_line(&mut self, r0: f64, c0: f64, r1: f64, c1: f64, value: u32) -> Result<()> {
        let points = generate_line_points(truncate(r0), truncate(c0), truncate(r1), truncate(c1));
        self.render_points(&points, value)
    }

    /// Render a filled square of side `2 * half_size + 1` centered on
    /// the pixel containing `(row, col)`.
    pub fn render_dot(&mut self, row: f64, col: f64, half_size: u32, value: u32) -> Result<()> {
        let r = truncate(row);
        let c = truncate(col);
        let h = half_size as i32;
        let points: Vec<(i32, i32)> = (r - h..=r + h)
            .flat_map(|pr| (c - h..=c + h).map(move |pc| (pr, pc)))
            .collect();
        self.render_points(&points, value)
    }
}
