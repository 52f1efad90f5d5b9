//! objrec - object recognition in binary images
//!
//! A three-stage pipeline:
//!
//! 1. Label the 4-connected foreground components of a binary image
//! 2. Describe every labeled object by its second moments (centroid,
//!    orientation, minimum inertia, roundness)
//! 3. Match objects of a new labeled image against stored descriptors
//!
//! # Example
//!
//! ```
//! use objrec::GrayImage;
//! use objrec::region::{analyze_objects, label_image};
//!
//! let binary = GrayImage::from_vec(2, 4, 1, vec![1, 1, 0, 1, 1, 1, 0, 1]).unwrap();
//! let labeled = label_image(&binary).unwrap();
//! let objects = analyze_objects(&labeled);
//! assert_eq!(objects.len(), 2);
//! assert_eq!(objects[0].area + objects[1].area, 6);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use objrec_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use objrec_io as io;
pub use objrec_region as region;
