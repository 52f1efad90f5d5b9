//! Threshold matching of observed objects against stored descriptors
//!
//! An observed object matches a stored one when all three hold:
//!
//! - `|observed.area - stored.area| < area_tolerance * stored.area`
//! - `|observed.roundness - stored.roundness| < roundness_tolerance`
//! - `|observed.orientation - stored.orientation| < orientation_tolerance_deg`
//!
//! The area bound scales with the stored object, so `compare(a, b)` and
//! `compare(b, a)` can disagree. Orientations are compared as plain
//! numbers; -89° and 89° are 178° apart.

use crate::descriptor::{DescriptorStore, ObjectDescriptor};
use crate::error::{RegionError, RegionResult};
use crate::moments::analyze_objects;
use log::{debug, info};
use objrec_core::GrayImage;

/// Matching thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// Allowed area difference as a fraction of the stored area
    pub area_tolerance: f64,
    /// Allowed absolute roundness difference
    pub roundness_tolerance: f64,
    /// Allowed absolute orientation difference in degrees
    pub orientation_tolerance_deg: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            area_tolerance: 0.15,
            roundness_tolerance: 0.2,
            orientation_tolerance_deg: 10.0,
        }
    }
}

impl MatchOptions {
    /// Check that every tolerance is finite and non-negative.
    pub fn validate(&self) -> RegionResult<()> {
        for (name, value) in [
            ("area_tolerance", self.area_tolerance),
            ("roundness_tolerance", self.roundness_tolerance),
            ("orientation_tolerance_deg", self.orientation_tolerance_deg),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RegionError::InvalidParameters(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Options for the match indicator drawn at each matched object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerOptions {
    /// Length of the orientation line from the centroid
    pub length: f64,
    /// Half size of the square dot at the centroid
    pub dot_half_size: u32,
    /// Gray value of the indicator
    pub value: u32,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            length: 10.0,
            dot_half_size: 1,
            value: 128,
        }
    }
}

/// One observed object that matched one stored descriptor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectMatch {
    pub observed: ObjectDescriptor,
    pub stored: ObjectDescriptor,
}

/// Output of a recognition run
#[derive(Debug, Clone)]
pub struct Recognition {
    /// Input image with an indicator drawn at every match
    pub image: GrayImage,
    /// Every (observed, stored) pair that matched
    pub matches: Vec<ObjectMatch>,
}

/// Compares descriptors under a fixed set of thresholds
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectMatcher {
    options: MatchOptions,
    marker: MarkerOptions,
}

impl ObjectMatcher {
    /// Create a matcher, validating the thresholds.
    pub fn new(options: MatchOptions) -> RegionResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            marker: MarkerOptions::default(),
        })
    }

    /// Replace the indicator drawing options.
    pub fn with_marker(mut self, marker: MarkerOptions) -> Self {
        self.marker = marker;
        self
    }

    /// The matching thresholds.
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Whether `observed` matches `stored`.
    pub fn compare(&self, observed: &ObjectDescriptor, stored: &ObjectDescriptor) -> bool {
        let area_diff = (observed.area as f64 - stored.area as f64).abs();
        let roundness_diff = (observed.roundness - stored.roundness).abs();
        let orientation_diff = (observed.orientation_deg - stored.orientation_deg).abs();

        let matched = area_diff < self.options.area_tolerance * stored.area as f64
            && roundness_diff < self.options.roundness_tolerance
            && orientation_diff < self.options.orientation_tolerance_deg;

        debug!(
            "compare observed {} vs stored {}: darea {} dround {:.4} dtheta {:.2} -> {}",
            observed.label, stored.label, area_diff, roundness_diff, orientation_diff, matched
        );
        matched
    }

    /// Every (observed, stored) pair that matches.
    ///
    /// Observed objects are visited in order and each is checked against
    /// the whole store.
    pub fn find_matches(
        &self,
        observed: &[ObjectDescriptor],
        store: &DescriptorStore,
    ) -> Vec<ObjectMatch> {
        let mut matches = Vec::new();
        for obs in observed {
            for stored in store {
                if self.compare(obs, stored) {
                    matches.push(ObjectMatch {
                        observed: *obs,
                        stored: *stored,
                    });
                }
            }
        }
        matches
    }

    /// Analyze a labeled image, match its objects and draw an indicator
    /// at each match.
    ///
    /// The indicator is a line of `marker.length` pixels from the centroid
    /// along the observed orientation plus a square dot on the centroid.
    pub fn recognize(&self, labeled: &GrayImage, store: &DescriptorStore) -> RegionResult<Recognition> {
        let observed = analyze_objects(labeled);
        let matches = self.find_matches(&observed, store);

        let mut image = labeled.to_mut();
        if image.max_gray() < self.marker.value {
            image.set_max_gray(self.marker.value)?;
        }
        for m in &matches {
            let d = &m.observed;
            let (sin, cos) = d.orientation_rad().sin_cos();
            image.render_line(
                d.center_row,
                d.center_column,
                d.center_row + self.marker.length * cos,
                d.center_column + self.marker.length * sin,
                self.marker.value,
            )?;
            image.render_dot(
                d.center_row,
                d.center_column,
                self.marker.dot_half_size,
                self.marker.value,
            )?;
        }

        info!(
            "{} observed objects, {} stored descriptors, {} matches",
            observed.len(),
            store.len(),
            matches.len()
        );
        Ok(Recognition {
            image: image.into(),
            matches,
        })
    }
}

/// Match the objects of a labeled image against a store with default
/// indicator drawing.
pub fn recognize_objects(
    labeled: &GrayImage,
    store: &DescriptorStore,
    options: &MatchOptions,
) -> RegionResult<Recognition> {
    ObjectMatcher::new(*options)?.recognize(labeled, store)
}
