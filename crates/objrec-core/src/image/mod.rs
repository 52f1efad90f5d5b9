//! GrayImage - the raster container
//!
//! A `GrayImage` is a `rows × cols` grid of non-negative integer
//! intensities together with a declared maximum gray level. Binary
//! images use any non-zero value as foreground; labeled images store a
//! component id per pixel.
//!
//! # Pixel layout
//!
//! - Pixels are stored row-major, one `u32` per pixel
//! - Coordinates are `(row, col)` with `(0, 0)` at the top-left
//!
//! # Ownership model
//!
//! `GrayImage` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to [`GrayImageMut`] via
//! [`GrayImage::try_into_mut`] or [`GrayImage::to_mut`], then convert
//! back with `Into<GrayImage>`.

mod access;
pub mod graphics;

pub use graphics::{generate_line_points, generate_offset_line_points};

use crate::error::{Error, Result};
use std::sync::Arc;

/// Default maximum gray level for 8-bit images.
pub const DEFAULT_MAX_GRAY: u32 = 255;

/// Internal image data
#[derive(Debug, Clone, PartialEq, Eq)]
struct ImageData {
    /// Number of rows
    rows: u32,
    /// Number of columns
    cols: u32,
    /// Declared maximum gray level
    max_gray: u32,
    /// Row-major pixel values
    data: Vec<u32>,
}

impl ImageData {
    fn zeroed(rows: u32, cols: u32, max_gray: u32) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimension { rows, cols });
        }
        let len = (rows as usize)
            .checked_mul(cols as usize)
            .ok_or(Error::InvalidDimension { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            max_gray,
            data: vec![0; len],
        })
    }
}

/// Immutable grayscale image
///
/// # Examples
///
/// ```
/// use objrec_core::GrayImage;
///
/// let image = GrayImage::new(48, 64, 255).unwrap();
/// assert_eq!(image.rows(), 48);
/// assert_eq!(image.cols(), 64);
/// assert_eq!(image.get_pixel(0, 0), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    inner: Arc<ImageData>,
}

impl GrayImage {
    /// Allocate a zero-filled image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if `rows` or `cols` is 0.
    pub fn new(rows: u32, cols: u32, max_gray: u32) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(ImageData::zeroed(rows, cols, max_gray)?),
        })
    }

    /// Build an image from row-major pixel values.
    ///
    /// # Errors
    ///
    /// Fails if the data length does not match `rows * cols`, or if any
    /// value exceeds `max_gray`.
    pub fn from_vec(rows: u32, cols: u32, max_gray: u32, data: Vec<u32>) -> Result<Self> {
        let mut image = ImageData::zeroed(rows, cols, max_gray)?;
        if data.len() != image.data.len() {
            return Err(Error::InvalidParameter(format!(
                "expected {} pixels for {}x{} image, got {}",
                image.data.len(),
                rows,
                cols,
                data.len()
            )));
        }
        if let Some(&value) = data.iter().find(|&&v| v > max_gray) {
            return Err(Error::ValueOutOfRange { value, max_gray });
        }
        image.data = data;
        Ok(Self {
            inner: Arc::new(image),
        })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> u32 {
        self.inner.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> u32 {
        self.inner.cols
    }

    /// Declared maximum gray level.
    #[inline]
    pub fn max_gray(&self) -> u32 {
        self.inner.max_gray
    }

    /// Raw row-major pixel data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Pixel values of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`.
    #[inline]
    pub fn row_data(&self, row: u32) -> &[u32] {
        let start = row as usize * self.inner.cols as usize;
        &self.inner.data[start..start + self.inner.cols as usize]
    }

    /// Check if two images have the same dimensions.
    pub fn sizes_equal(&self, other: &GrayImage) -> bool {
        self.inner.rows == other.inner.rows && self.inner.cols == other.inner.cols
    }

    /// Largest pixel value present in the image.
    pub fn max_value(&self) -> u32 {
        self.inner.data.iter().copied().max().unwrap_or(0)
    }

    /// Number of non-zero pixels.
    pub fn count_foreground(&self) -> usize {
        self.inner.data.iter().filter(|&&v| v != 0).count()
    }

    /// Create a zero-filled image with the same dimensions and gray range.
    pub fn create_template(&self) -> Self {
        Self {
            inner: Arc::new(ImageData {
                rows: self.inner.rows,
                cols: self.inner.cols,
                max_gray: self.inner.max_gray,
                data: vec![0; self.inner.data.len()],
            }),
        }
    }

    /// Number of strong references to the shared pixel buffer.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Try to take exclusive ownership of the pixel data.
    ///
    /// Succeeds only if this is the sole reference; otherwise the image
    /// is handed back unchanged.
    pub fn try_into_mut(self) -> std::result::Result<GrayImageMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(inner) => Ok(GrayImageMut { inner }),
            Err(inner) => Err(GrayImage { inner }),
        }
    }

    /// Create a mutable copy of this image.
    pub fn to_mut(&self) -> GrayImageMut {
        GrayImageMut {
            inner: (*self.inner).clone(),
        }
    }
}

/// Mutable grayscale image
///
/// Allows modification of pixel data. Convert back to an immutable
/// [`GrayImage`] using `Into<GrayImage>`.
#[derive(Debug)]
pub struct GrayImageMut {
    inner: ImageData,
}

impl GrayImageMut {
    /// Allocate a zero-filled mutable image.
    pub fn new(rows: u32, cols: u32, max_gray: u32) -> Result<Self> {
        Ok(Self {
            inner: ImageData::zeroed(rows, cols, max_gray)?,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> u32 {
        self.inner.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> u32 {
        self.inner.cols
    }

    /// Declared maximum gray level.
    #[inline]
    pub fn max_gray(&self) -> u32 {
        self.inner.max_gray
    }

    /// Change the declared gray-level range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueOutOfRange`] if a pixel already exceeds the
    /// new maximum.
    pub fn set_max_gray(&mut self, max_gray: u32) -> Result<()> {
        if let Some(&value) = self.inner.data.iter().find(|&&v| v > max_gray) {
            return Err(Error::ValueOutOfRange { value, max_gray });
        }
        self.inner.max_gray = max_gray;
        Ok(())
    }

    /// Raw row-major pixel data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Mutable access to one row.
    ///
    /// Values written here bypass the gray-range check.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`.
    #[inline]
    pub fn row_data_mut(&mut self, row: u32) -> &mut [u32] {
        let cols = self.inner.cols as usize;
        let start = row as usize * cols;
        &mut self.inner.data[start..start + cols]
    }

    /// Set every pixel to `value`.
    pub fn fill(&mut self, value: u32) -> Result<()> {
        self.check_value(value)?;
        self.inner.data.fill(value);
        Ok(())
    }

    fn check_value(&self, value: u32) -> Result<()> {
        if value > self.inner.max_gray {
            return Err(Error::ValueOutOfRange {
                value,
                max_gray: self.inner.max_gray,
            });
        }
        Ok(())
    }
}

impl From<GrayImageMut> for GrayImage {
    fn from(image: GrayImageMut) -> Self {
        GrayImage {
            inner: Arc::new(image.inner),
        }
    }
}
