//! Two-pass connected-component labeling
//!
//! Pass 1 scans row-major and gives each foreground pixel a provisional
//! label taken from its already-visited left and top neighbors, recording
//! equivalences in a [`DisjointSets`] when the two disagree. Pass 2
//! rewrites every provisional label to `offset + find(label)`. The result
//! is 4-connected: two foreground pixels share a canonical label iff a
//! chain of foreground pixels joins them through edge neighbors.
//!
//! [`Labeling::to_image`] rescales the canonical labels into `[1, 255]`
//! for storage as an 8-bit gray image. With more than 255 components, or
//! sparse canonical values, distinct components can land on the same gray
//! value; that loss is inherent to the 8-bit output.

use crate::error::{RegionError, RegionResult};
use crate::union_find::DisjointSets;
use log::{debug, info};
use objrec_core::{GrayImage, GrayImageMut};

/// Gray value the largest canonical label maps to.
const NORMALIZED_MAX: u32 = 255;

/// Options for component labeling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelOptions {
    /// Constant added to every union-find root to form the canonical label
    pub offset: u32,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self { offset: 20 }
    }
}

/// Result of labeling a binary image
#[derive(Debug, Clone)]
pub struct Labeling {
    rows: u32,
    cols: u32,
    /// Row-major canonical labels (0 = background)
    labels: Vec<u32>,
    provisional_count: u32,
    component_count: u32,
    offset: u32,
}

impl Labeling {
    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Canonical labels in row-major order, 0 for background.
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Canonical label at `(row, col)`, or `None` outside the image.
    pub fn label_at(&self, row: u32, col: u32) -> Option<u32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.labels[row as usize * self.cols as usize + col as usize])
    }

    /// Number of provisional labels handed out by pass 1.
    ///
    /// An upper bound on the component count.
    pub fn provisional_count(&self) -> u32 {
        self.provisional_count
    }

    /// Number of distinct connected components.
    pub fn component_count(&self) -> u32 {
        self.component_count
    }

    /// Offset applied to union-find roots.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Largest canonical label present, 0 if there is no foreground.
    pub fn max_label(&self) -> u32 {
        self.labels.iter().copied().max().unwrap_or(0)
    }

    /// Canonical labels as an image whose gray range is the largest label.
    pub fn canonical_image(&self) -> RegionResult<GrayImage> {
        Ok(GrayImage::from_vec(
            self.rows,
            self.cols,
            self.max_label().max(1),
            self.labels.clone(),
        )?)
    }

    /// Rescale canonical labels into `[1, 255]` for an 8-bit image.
    ///
    /// Each label becomes `round(label * 255 / max_label)` where
    /// `max_label` is the largest canonical label present, raised to 1 if
    /// the rounding would reach background. Background stays 0.
    pub fn to_image(&self) -> RegionResult<GrayImage> {
        let mut image = GrayImageMut::new(self.rows, self.cols, NORMALIZED_MAX)?;
        let max_label = self.max_label() as u64;
        if max_label == 0 {
            return Ok(image.into());
        }

        for row in 0..self.rows {
            let start = row as usize * self.cols as usize;
            let src = &self.labels[start..start + self.cols as usize];
            for (dst, &label) in image.row_data_mut(row).iter_mut().zip(src) {
                if label > 0 {
                    *dst = normalize_label(label as u64, max_label);
                }
            }
        }

        debug!(
            "normalized {} components against max label {}",
            self.component_count, max_label
        );
        Ok(image.into())
    }
}

/// `round(label * 255 / max_label)` in exact integer arithmetic, at least 1.
fn normalize_label(label: u64, max_label: u64) -> u32 {
    let scaled = (2 * label * NORMALIZED_MAX as u64 + max_label) / (2 * max_label);
    (scaled as u32).max(1)
}

/// Label the 4-connected foreground components of a binary image.
///
/// Any non-zero pixel is foreground.
pub fn label_components(image: &GrayImage, options: &LabelOptions) -> RegionResult<Labeling> {
    let rows = image.rows();
    let cols = image.cols();
    let width = cols as usize;
    let npixels = rows as usize * width;

    let mut labels = vec![0u32; npixels];
    let mut sets = DisjointSets::new(npixels + 1);
    let mut next_label: u32 = 1;

    // Pass 1: provisional labels and equivalences
    for row in 0..rows {
        let src = image.row_data(row);
        let base = row as usize * width;
        for col in 0..width {
            if src[col] == 0 {
                continue;
            }
            let left = if col > 0 { labels[base + col - 1] } else { 0 };
            let top = if row > 0 { labels[base - width + col] } else { 0 };

            labels[base + col] = match (left, top) {
                (0, 0) => {
                    let label = next_label;
                    next_label = next_label
                        .checked_add(1)
                        .ok_or(RegionError::LabelOverflow(label as u64, options.offset))?;
                    label
                }
                (l, 0) => l,
                (0, t) => t,
                (l, t) if l == t => l,
                (l, t) => {
                    let left_root = sets.find(l as usize);
                    let top_root = sets.find(t as usize);
                    sets.union(left_root, top_root);
                    l.min(t)
                }
            };
        }
    }

    let provisional_count = next_label - 1;
    if provisional_count as u64 + options.offset as u64 > u32::MAX as u64 {
        return Err(RegionError::LabelOverflow(
            provisional_count as u64,
            options.offset,
        ));
    }

    // Pass 2: canonical labels
    for label in labels.iter_mut().filter(|l| **l > 0) {
        *label = options.offset + sets.find(*label as usize) as u32;
    }

    let component_count = (1..=provisional_count as usize)
        .filter(|&l| sets.is_root(l))
        .count() as u32;

    info!(
        "labeled {}x{} image: {} provisional labels, {} components",
        rows, cols, provisional_count, component_count
    );

    Ok(Labeling {
        rows,
        cols,
        labels,
        provisional_count,
        component_count,
        offset: options.offset,
    })
}

/// Label a binary image and return the normalized 8-bit label image.
pub fn label_image(image: &GrayImage) -> RegionResult<GrayImage> {
    label_components(image, &LabelOptions::default())?.to_image()
}
