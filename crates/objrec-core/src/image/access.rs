//! Pixel access functions
//!
//! Bounds-checked getters and setters plus unchecked variants for hot
//! loops that have already validated their coordinates.

use super::{GrayImage, GrayImageMut};
use crate::error::{Error, Result};

impl GrayImage {
    /// Get the pixel value at `(row, col)`.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    pub fn get_pixel(&self, row: u32, col: u32) -> Option<u32> {
        if row >= self.inner.rows || col >= self.inner.cols {
            return None;
        }
        Some(self.get_pixel_unchecked(row, col))
    }

    /// Get a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if the computed index lies outside the buffer.
    #[inline]
    pub fn get_pixel_unchecked(&self, row: u32, col: u32) -> u32 {
        self.inner.data[row as usize * self.inner.cols as usize + col as usize]
    }
}

impl GrayImageMut {
    /// Get the pixel value at `(row, col)`.
    pub fn get_pixel(&self, row: u32, col: u32) -> Option<u32> {
        if row >= self.inner.rows || col >= self.inner.cols {
            return None;
        }
        Some(self.get_pixel_unchecked(row, col))
    }

    /// Get a pixel value without bounds checking.
    #[inline]
    pub fn get_pixel_unchecked(&self, row: u32, col: u32) -> u32 {
        self.inner.data[row as usize * self.inner.cols as usize + col as usize]
    }

    /// Set the pixel value at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] for coordinates outside the image
    /// and [`Error::ValueOutOfRange`] if `value` exceeds the declared
    /// maximum gray level.
    pub fn set_pixel(&mut self, row: u32, col: u32, value: u32) -> Result<()> {
        if row >= self.inner.rows || col >= self.inner.cols {
            return Err(Error::OutOfBounds {
                row,
                col,
                rows: self.inner.rows,
                cols: self.inner.cols,
            });
        }
        self.check_value(value)?;
        self.set_pixel_unchecked(row, col, value);
        Ok(())
    }

    /// Set a pixel value without bounds or range checking.
    ///
    /// # Panics
    ///
    /// Panics if the computed index lies outside the buffer.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, row: u32, col: u32, value: u32) {
        let cols = self.inner.cols as usize;
        self.inner.data[row as usize * cols + col as usize] = value;
    }
}
