//! Second-moment shape analysis of labeled objects
//!
//! Every distinct non-zero gray value in a labeled image is one object.
//! A single raster pass buckets integer coordinate sums by label; the
//! descriptors are then derived per label:
//!
//! - centroid `(sum_row / area, sum_col / area)`
//! - central moments `a`, `b`, `c` (row variance, covariance, column variance)
//! - orientation `theta = atan2(2b, a - c) / 2`, the angle of the axis of
//!   least inertia measured from the row axis
//! - `Emin` and `Emax`, the second moments about the axes at `theta` and
//!   `theta + 90°`
//! - roundness `Emin / Emax`
//!
//! Central moments are formed from exact integer numerators
//! (`n * sum(r^2) - sum(r)^2`), so translating an object does not change
//! them at all.

use crate::descriptor::{DescriptorStore, ObjectDescriptor};
use crate::error::{RegionError, RegionResult};
use log::{debug, info};
use objrec_core::{GrayImage, generate_offset_line_points};
use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, PI};

/// Raw integer moment accumulators for one label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectMoments {
    /// Pixel count
    pub area: u64,
    pub sum_row: u64,
    pub sum_col: u64,
    pub sum_row_row: u128,
    pub sum_row_col: u128,
    pub sum_col_col: u128,
}

impl ObjectMoments {
    /// Add one pixel at `(row, col)`.
    pub fn accumulate(&mut self, row: u32, col: u32) {
        let r = row as u64;
        let c = col as u64;
        self.area += 1;
        self.sum_row += r;
        self.sum_col += c;
        self.sum_row_row += (r * r) as u128;
        self.sum_row_col += (r * c) as u128;
        self.sum_col_col += (c * c) as u128;
    }

    /// Centroid `(row, col)`, or `None` for an empty accumulator.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.area == 0 {
            return None;
        }
        let n = self.area as f64;
        Some((self.sum_row as f64 / n, self.sum_col as f64 / n))
    }

    /// Central second moments normalized by area.
    pub fn central_moments(&self) -> Option<CentralMoments> {
        if self.area == 0 {
            return None;
        }
        let n = self.area as i128;
        let sr = self.sum_row as i128;
        let sc = self.sum_col as i128;
        let n2 = (self.area as f64) * (self.area as f64);

        let a = n * self.sum_row_row as i128 - sr * sr;
        let b = n * self.sum_row_col as i128 - sr * sc;
        let c = n * self.sum_col_col as i128 - sc * sc;

        Some(CentralMoments {
            a: a as f64 / n2,
            b: b as f64 / n2,
            c: c as f64 / n2,
        })
    }

    /// Full descriptor for this object, `None` if it has no pixels.
    pub fn describe(&self, label: u32) -> Option<ObjectDescriptor> {
        let (center_row, center_column) = self.centroid()?;
        let moments = self.central_moments()?;
        let theta = moments.orientation();
        let (emin, emax) = moments.inertia(theta);
        let roundness = if emax == 0.0 { 0.0 } else { emin / emax };

        Some(ObjectDescriptor {
            label,
            center_row,
            center_column,
            min_inertia: emin,
            area: self.area,
            roundness,
            orientation_deg: theta.to_degrees(),
        })
    }
}

/// Central second moments of one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentralMoments {
    /// Row variance
    pub a: f64,
    /// Row/column covariance
    pub b: f64,
    /// Column variance
    pub c: f64,
}

impl CentralMoments {
    /// Angle of the axis of least inertia from the row axis, radians in
    /// `(-pi/2, pi/2]`.
    ///
    /// Objects with no preferred direction (`b == 0` and `a == c`, such as a
    /// square or a single pixel) report 0.
    pub fn orientation(&self) -> f64 {
        if self.b == 0.0 && self.a == self.c {
            return 0.0;
        }
        let theta = 0.5 * (2.0 * self.b).atan2(self.a - self.c);
        if theta <= -FRAC_PI_2 { theta + PI } else { theta }
    }

    /// `(Emin, Emax)` about the axes at `theta` and `theta + 90°`.
    ///
    /// Both are clamped at 0.
    pub fn inertia(&self, theta: f64) -> (f64, f64) {
        let (sin, cos) = theta.sin_cos();
        let sin2 = (2.0 * theta).sin();
        let emin = self.a * sin * sin - self.b * sin2 + self.c * cos * cos;
        let emax = self.a * cos * cos + self.b * sin2 + self.c * sin * sin;
        (emin.max(0.0), emax.max(0.0))
    }
}

/// Accumulate moments for every non-zero label in one pass.
pub fn label_moments(image: &GrayImage) -> BTreeMap<u32, ObjectMoments> {
    let mut objects: BTreeMap<u32, ObjectMoments> = BTreeMap::new();
    for row in 0..image.rows() {
        for (col, &label) in image.row_data(row).iter().enumerate() {
            if label != 0 {
                objects.entry(label).or_default().accumulate(row, col as u32);
            }
        }
    }
    objects
}

/// Describe every object of a labeled image, in ascending label order.
pub fn analyze_objects(image: &GrayImage) -> Vec<ObjectDescriptor> {
    let descriptors: Vec<ObjectDescriptor> = label_moments(image)
        .iter()
        .filter_map(|(&label, moments)| moments.describe(label))
        .collect();

    for d in &descriptors {
        debug!(
            "object {}: center ({:.3}, {:.3}) area {} emin {:.4} roundness {:.4} theta {:.2}",
            d.label, d.center_row, d.center_column, d.area, d.min_inertia, d.roundness, d.orientation_deg
        );
    }
    descriptors
}

/// Options for drawing orientation axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRenderOptions {
    /// Axis length in pixels from the centroid
    pub length: f64,
    /// Extra parallel strokes on each side of the axis
    pub thickness: u32,
    /// Gray value of the drawn axis
    pub value: u32,
}

impl Default for AxisRenderOptions {
    fn default() -> Self {
        Self {
            length: 30.0,
            thickness: 1,
            value: 128,
        }
    }
}

/// Draw each object's principal axis onto a copy of `image`.
///
/// The axis starts at the centroid and runs `length` pixels along the
/// orientation. Parallel strokes at perpendicular offsets `-thickness..=thickness`
/// widen it. The copy's maximum gray level is raised to `value` if needed.
pub fn render_orientation_axes(
    image: &GrayImage,
    descriptors: &[ObjectDescriptor],
    options: &AxisRenderOptions,
) -> RegionResult<GrayImage> {
    if !options.length.is_finite() || options.length < 0.0 {
        return Err(RegionError::InvalidParameters(format!(
            "axis length must be finite and non-negative, got {}",
            options.length
        )));
    }

    let mut out = image.to_mut();
    if out.max_gray() < options.value {
        out.set_max_gray(options.value)?;
    }

    let t = options.thickness as i32;
    for d in descriptors {
        let (sin, cos) = d.orientation_rad().sin_cos();
        let r0 = d.center_row as i32;
        let c0 = d.center_column as i32;
        let r1 = (d.center_row + options.length * cos) as i32;
        let c1 = (d.center_column + options.length * sin) as i32;

        for k in -t..=t {
            let dr = (-(k as f64) * sin) as i32;
            let dc = ((k as f64) * cos) as i32;
            let points = generate_offset_line_points(r0, c0, r1, c1, dr, dc);
            out.render_points(&points, options.value)?;
        }
    }

    Ok(out.into())
}

/// Descriptors of a labeled image with its annotated rendering
#[derive(Debug, Clone)]
pub struct ObjectAnalysis {
    pub store: DescriptorStore,
    pub annotated: GrayImage,
}

/// Describe all objects and draw their orientation axes.
pub fn describe_objects(
    image: &GrayImage,
    options: &AxisRenderOptions,
) -> RegionResult<ObjectAnalysis> {
    let descriptors = analyze_objects(image);
    let annotated = render_orientation_axes(image, &descriptors, options)?;
    info!("described {} objects", descriptors.len());
    Ok(ObjectAnalysis {
        store: DescriptorStore::from(descriptors),
        annotated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moments_of(pixels: &[(u32, u32)]) -> ObjectMoments {
        let mut m = ObjectMoments::default();
        for &(r, c) in pixels {
            m.accumulate(r, c);
        }
        m
    }

    #[test]
    fn test_empty_has_no_descriptor() {
        let m = ObjectMoments::default();
        assert!(m.centroid().is_none());
        assert!(m.describe(1).is_none());
    }

    #[test]
    fn test_single_pixel() {
        let d = moments_of(&[(4, 7)]).describe(9).unwrap();
        assert_eq!((d.center_row, d.center_column), (4.0, 7.0));
        assert_eq!(d.area, 1);
        assert_eq!(d.min_inertia, 0.0);
        assert_eq!(d.roundness, 0.0);
        assert_eq!(d.orientation_deg, 0.0);
    }

    #[test]
    fn test_horizontal_bar_points_along_columns() {
        let d = moments_of(&[(3, 1), (3, 2), (3, 3), (3, 4)]).describe(1).unwrap();
        assert!((d.orientation_deg - 90.0).abs() < 1e-9);
        assert!(d.min_inertia.abs() < 1e-12);
        assert!(d.roundness.abs() < 1e-12);
    }

    #[test]
    fn test_vertical_bar_points_along_rows() {
        let d = moments_of(&[(1, 3), (2, 3), (3, 3)]).describe(1).unwrap();
        assert_eq!(d.orientation_deg, 0.0);
        assert_eq!(d.roundness, 0.0);
    }

    #[test]
    fn test_diagonal_orientation() {
        let d = moments_of(&[(0, 0), (1, 1), (2, 2), (3, 3)]).describe(1).unwrap();
        assert!((d.orientation_deg - 45.0).abs() < 1e-9);
        let d = moments_of(&[(0, 3), (1, 2), (2, 1), (3, 0)]).describe(1).unwrap();
        assert!((d.orientation_deg + 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_central_moments_translation_exact() {
        let shape = [(0, 0), (0, 1), (1, 0), (2, 0), (2, 3)];
        let moved: Vec<(u32, u32)> = shape.iter().map(|&(r, c)| (r + 1000, c + 517)).collect();
        assert_eq!(
            moments_of(&shape).central_moments(),
            moments_of(&moved).central_moments()
        );
    }

    #[test]
    fn test_inertia_ordering() {
        let m = moments_of(&[(0, 0), (0, 1), (0, 2), (1, 1), (2, 4)])
            .central_moments()
            .unwrap();
        let (emin, emax) = m.inertia(m.orientation());
        assert!(emin <= emax);
    }

    #[test]
    fn test_label_moments_buckets_by_value() {
        let image = GrayImage::from_vec(2, 3, 255, vec![5, 5, 0, 0, 9, 9]).unwrap();
        let objects = label_moments(&image);
        assert_eq!(objects.keys().copied().collect::<Vec<_>>(), vec![5, 9]);
        assert_eq!(objects[&5].area, 2);
        assert_eq!(objects[&9].sum_col, 3);
    }

    #[test]
    fn test_render_axes_raises_max_gray() {
        let image = GrayImage::from_vec(1, 1, 1, vec![1]).unwrap();
        let d = analyze_objects(&image);
        let out = render_orientation_axes(&image, &d, &AxisRenderOptions::default()).unwrap();
        assert_eq!(out.max_gray(), 128);
        assert_eq!(out.get_pixel(0, 0), Some(128));
        // source untouched
        assert_eq!(image.get_pixel(0, 0), Some(1));
    }

    #[test]
    fn test_render_axes_rejects_bad_length() {
        let image = GrayImage::new(2, 2, 255).unwrap();
        let options = AxisRenderOptions {
            length: f64::NAN,
            ..Default::default()
        };
        assert!(render_orientation_axes(&image, &[], &options).is_err());
    }
}
