//! objrec-test - Regression test framework for objrec
//!
//! Supports three modes, selected by the `REGTEST_MODE` environment
//! variable:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files (default)
//! - **Display**: Run tests without comparison
//!
//! # Usage
//!
//! ```ignore
//! use objrec_test::{RegParams, image_from_ascii};
//!
//! let mut rp = RegParams::new("label");
//! let image = image_from_ascii(&["##.", "..#"]).unwrap();
//! rp.compare_values(3.0, image.count_foreground() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! Fixtures are drawn as ASCII art instead of shipped as binary files.

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use objrec_core::GrayImage;

/// Build an image from ASCII art, one string per row.
///
/// `.` and `0` are background, `#` is 1, and the digits `1`-`9` are their
/// own values. The maximum gray level is the largest value present, at
/// least 1. Every row must have the same length.
pub fn image_from_ascii(rows: &[&str]) -> TestResult<GrayImage> {
    let cols = rows.first().map_or(0, |r| r.chars().count());
    let mut data = Vec::with_capacity(rows.len() * cols);

    for (row, line) in rows.iter().enumerate() {
        if line.chars().count() != cols {
            return Err(TestError::Fixture {
                row,
                message: format!("expected {} columns, found {}", cols, line.chars().count()),
            });
        }
        for ch in line.chars() {
            let value = match ch {
                '.' => 0,
                '#' => 1,
                '0'..='9' => ch as u32 - '0' as u32,
                other => {
                    return Err(TestError::Fixture {
                        row,
                        message: format!("unexpected character {other:?}"),
                    });
                }
            };
            data.push(value);
        }
    }

    let max_gray = data.iter().copied().max().unwrap_or(0).max(1);
    Ok(GrayImage::from_vec(
        rows.len() as u32,
        cols as u32,
        max_gray,
        data,
    )?)
}

/// Path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // objrec-test lives at crates/objrec-test
    format!("{}/../..", manifest_dir)
}

/// Path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
