//! objrec-region - labeling, shape analysis and matching
//!
//! This crate implements the three stages of the recognition pipeline:
//!
//! - **Labeling**: two-pass 4-connected component labeling backed by a
//!   union-find structure ([`label_components`], [`label_image`])
//! - **Shape analysis**: centroid, orientation, minimum inertia and
//!   roundness of every labeled object ([`analyze_objects`],
//!   [`describe_objects`])
//! - **Matching**: threshold comparison of observed objects against a
//!   [`DescriptorStore`] ([`ObjectMatcher`], [`recognize_objects`])
//!
//! # Quick Start
//!
//! ```
//! use objrec_core::GrayImage;
//! use objrec_region::{AxisRenderOptions, MatchOptions, describe_objects, label_image, recognize_objects};
//!
//! let binary = GrayImage::from_vec(3, 3, 1, vec![1, 1, 0, 1, 1, 0, 0, 0, 0]).unwrap();
//! let labeled = label_image(&binary).unwrap();
//!
//! let analysis = describe_objects(&labeled, &AxisRenderOptions::default()).unwrap();
//! assert_eq!(analysis.store.len(), 1);
//!
//! let result = recognize_objects(&labeled, &analysis.store, &MatchOptions::default()).unwrap();
//! assert_eq!(result.matches.len(), 1);
//! ```

pub mod descriptor;
mod error;
pub mod label;
pub mod matcher;
pub mod moments;
pub mod union_find;

pub use error::{RegionError, RegionResult};

pub use descriptor::{DescriptorStore, ObjectDescriptor};
pub use label::{LabelOptions, Labeling, label_components, label_image};
pub use matcher::{
    MarkerOptions, MatchOptions, ObjectMatch, ObjectMatcher, Recognition, recognize_objects,
};
pub use moments::{
    AxisRenderOptions, CentralMoments, ObjectAnalysis, ObjectMoments, analyze_objects,
    describe_objects, label_moments, render_orientation_axes,
};
pub use union_find::DisjointSets;

// Re-export core for convenience
pub use objrec_core;
