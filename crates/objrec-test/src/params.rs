//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::{golden_dir, regout_dir};
use objrec_core::GrayImage;
use objrec_io::ImageFormat;
use std::fs;
use std::path::Path;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Generate golden files
    Generate,
    /// Compare with golden files (default)
    #[default]
    Compare,
    /// Display mode - run without comparison
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "generate" => Self::Generate,
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the running check index, the mode and every
/// recorded failure. Each check bumps the index, so golden files are
/// named `<test>_golden.<index>.<ext>`.
pub struct RegParams {
    /// Name of the test (e.g., "label")
    pub test_name: String,
    index: usize,
    /// Test mode (generate, compare, or display)
    pub mode: RegTestMode,
    success: bool,
    failures: Vec<String>,
}

impl RegParams {
    /// Create regression test parameters configured from `REGTEST_MODE`.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        let _ = fs::create_dir_all(golden_dir());
        let _ = fs::create_dir_all(regout_dir());

        eprintln!();
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether running in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values within `delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta || diff.is_nan() {
            self.fail(format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Compare two images for equal size and identical pixels.
    pub fn compare_image(&mut self, image1: &GrayImage, image2: &GrayImage) -> bool {
        self.index += 1;

        if !image1.sizes_equal(image2) {
            self.fail(format!(
                "Failure in {}_reg: image comparison for index {} - size mismatch ({}x{} vs {}x{})",
                self.test_name,
                self.index,
                image1.rows(),
                image1.cols(),
                image2.rows(),
                image2.cols()
            ));
            return false;
        }

        for row in 0..image1.rows() {
            let r1 = image1.row_data(row);
            let r2 = image2.row_data(row);
            if let Some(col) = r1.iter().zip(r2).position(|(a, b)| a != b) {
                self.fail(format!(
                    "Failure in {}_reg: image comparison for index {} - pixel mismatch at ({}, {})",
                    self.test_name, self.index, row, col
                ));
                return false;
            }
        }

        true
    }

    /// Compare two byte strings.
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 != data2 {
            self.fail(format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 sizes: {} vs {}",
                self.test_name,
                self.index,
                data1.len(),
                data2.len()
            ));
            false
        } else {
            true
        }
    }

    /// Write an image to the regout directory and check it against its
    /// golden file.
    pub fn write_image_and_check(&mut self, image: &GrayImage, format: ImageFormat) -> TestResult<()> {
        self.index += 1;

        let local_path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            format.extension()
        );

        objrec_io::write_image(image, &local_path, format).map_err(|e| TestError::ImageWrite {
            path: local_path.clone(),
            message: e.to_string(),
        })?;

        self.check_file(&local_path)
    }

    /// Write raw data to the regout directory and check it against its
    /// golden file.
    pub fn write_data_and_check(&mut self, data: &[u8], ext: &str) -> TestResult<()> {
        self.index += 1;

        let local_path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            ext
        );

        fs::write(&local_path, data)?;
        self.check_file(&local_path)
    }

    /// Check a regout file against its golden counterpart.
    ///
    /// Generate mode copies the file to golden. Compare mode compares
    /// bytes, falling back to a pixel comparison for images; a missing
    /// golden file is created from the local file. Display mode does
    /// nothing.
    fn check_file(&mut self, local_path: &str) -> TestResult<()> {
        let ext = Path::new(local_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        let golden_path = format!(
            "{}/{}_golden.{:02}.{}",
            golden_dir(),
            self.test_name,
            self.index,
            ext
        );

        match self.mode {
            RegTestMode::Generate => {
                fs::copy(local_path, &golden_path)?;
                eprintln!("Generated: {}", golden_path);
            }
            RegTestMode::Compare => {
                if !Path::new(&golden_path).exists() {
                    fs::copy(local_path, &golden_path)?;
                    eprintln!("Golden file missing, created: {}", golden_path);
                    return Ok(());
                }

                let local_data = fs::read(local_path)?;
                let golden_data = fs::read(&golden_path)?;

                if local_data != golden_data && !same_image_files(local_path, &golden_path) {
                    self.fail(format!(
                        "Failure in {}_reg, index {}: comparing {} with {}",
                        self.test_name, self.index, local_path, golden_path
                    ));
                }
            }
            RegTestMode::Display => {}
        }

        Ok(())
    }

    /// Report results; `true` if every check passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Whether every check so far passed
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Recorded failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

/// Whether two files decode to the same image.
fn same_image_files(path1: &str, path2: &str) -> bool {
    match (objrec_io::read_image(path1), objrec_io::read_image(path2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
