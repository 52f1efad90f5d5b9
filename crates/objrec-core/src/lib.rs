//! objrec-core - basic data structures for object recognition
//!
//! This crate provides the raster container shared by every stage of the
//! pipeline:
//!
//! - [`GrayImage`] / [`GrayImageMut`] - grayscale image (immutable / mutable)
//! - Line and marker rendering used for annotation
//! - [`Error`] / [`Result`] - the core error type

pub mod error;
pub mod image;

pub use error::{Error, Result};
pub use image::{
    DEFAULT_MAX_GRAY, GrayImage, GrayImageMut, generate_line_points, generate_offset_line_points,
};
