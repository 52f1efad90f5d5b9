//! objrec-cli - command-line stages of the pipeline
//!
//! Each binary is a thin wrapper around one `run_*` function here:
//!
//! | binary | arguments |
//! |--------|-----------|
//! | `objrec-label` | `<binary image> <labeled image>` |
//! | `objrec-describe` | `<labeled image> <descriptions> <annotated image>` |
//! | `objrec-recognize` | `<labeled image> <descriptions> <annotated image>` |
//!
//! Input images may be PBM, PGM or PNG. Output images are PNG when the
//! path ends in `.png` and binary PGM otherwise. Nothing is written until
//! a stage has computed all of its outputs, and every file is replaced
//! atomically.

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, error, info};
use objrec_core::GrayImage;
use objrec_io::ImageFormat;
use objrec_region::{
    AxisRenderOptions, DescriptorStore, LabelOptions, Labeling, MatchOptions, ObjectAnalysis,
    Recognition, describe_objects, label_components, recognize_objects,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit status for usage and runtime errors.
pub const EXIT_FAILURE: u8 = 1;

/// Label the connected components of a binary image
#[derive(Parser, Debug)]
#[command(name = "objrec-label", version)]
#[command(about = "Label the 4-connected foreground components of a binary image", long_about = None)]
pub struct LabelArgs {
    /// Binary input image (PBM, PGM or PNG)
    pub input: PathBuf,

    /// Labeled output image
    pub output: PathBuf,

    /// Value added to every component root to form its label
    #[arg(long, default_value_t = LabelOptions::default().offset)]
    pub offset: u32,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Describe the objects of a labeled image
#[derive(Parser, Debug)]
#[command(name = "objrec-describe", version)]
#[command(about = "Compute shape descriptors for every object of a labeled image", long_about = None)]
pub struct DescribeArgs {
    /// Labeled input image
    pub input: PathBuf,

    /// Descriptor file to write
    pub descriptions: PathBuf,

    /// Output image with orientation axes drawn
    pub output: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Recognize stored objects in a labeled image
#[derive(Parser, Debug)]
#[command(name = "objrec-recognize", version)]
#[command(about = "Match the objects of a labeled image against stored descriptors", long_about = None)]
pub struct RecognizeArgs {
    /// Labeled input image
    pub input: PathBuf,

    /// Descriptor file to match against
    pub descriptions: PathBuf,

    /// Output image with a marker on every match
    pub output: PathBuf,

    /// Allowed area difference as a fraction of the stored area
    #[arg(long, default_value_t = MatchOptions::default().area_tolerance)]
    pub area_tolerance: f64,

    /// Allowed absolute roundness difference
    #[arg(long, default_value_t = MatchOptions::default().roundness_tolerance)]
    pub roundness_tolerance: f64,

    /// Allowed absolute orientation difference in degrees
    #[arg(long, default_value_t = MatchOptions::default().orientation_tolerance_deg)]
    pub orientation_tolerance: f64,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl RecognizeArgs {
    /// Matching thresholds selected on the command line.
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            area_tolerance: self.area_tolerance,
            roundness_tolerance: self.roundness_tolerance,
            orientation_tolerance_deg: self.orientation_tolerance,
        }
    }
}

/// Parse command-line arguments, exiting with [`EXIT_FAILURE`] on a usage
/// error. Help and version requests exit successfully.
pub fn parse_args<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.use_stderr() {
                let _ = e.print();
                std::process::exit(EXIT_FAILURE as i32);
            }
            e.exit()
        }
    }
}

/// Initialize logging to stderr.
///
/// The level defaults to `info`, or `debug` with `verbose`; `RUST_LOG`
/// refines it further.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

/// Turn a stage result into the process exit status, logging any error
/// with its full context chain.
pub fn finish<T>(result: Result<T>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn read_input(path: &Path) -> Result<GrayImage> {
    objrec_io::read_image(path).with_context(|| format!("failed to read image {}", path.display()))
}

fn write_output(image: &GrayImage, path: &Path) -> Result<()> {
    objrec_io::write_image(image, path, ImageFormat::from_path(path))
        .with_context(|| format!("failed to write image {}", path.display()))
}

/// Stage 1: label a binary image and write the normalized label image.
pub fn run_label(input: &Path, output: &Path, options: &LabelOptions) -> Result<Labeling> {
    let binary = read_input(input)?;
    let labeling = label_components(&binary, options).context("labeling failed")?;
    let labeled = labeling.to_image().context("label normalization failed")?;
    write_output(&labeled, output)?;
    info!(
        "{} -> {}: {} components",
        input.display(),
        output.display(),
        labeling.component_count()
    );
    Ok(labeling)
}

/// Stage 2: describe every object, writing the descriptor file and the
/// annotated image. Either both files are written or neither is.
pub fn run_describe(
    input: &Path,
    descriptions: &Path,
    output: &Path,
    options: &AxisRenderOptions,
) -> Result<ObjectAnalysis> {
    let labeled = read_input(input)?;
    let analysis = describe_objects(&labeled, options).context("object description failed")?;
    let text = analysis
        .store
        .write_to_bytes()
        .context("failed to serialize descriptors")?;
    let encoded = objrec_io::write_image_mem(&analysis.annotated, ImageFormat::from_path(output))
        .with_context(|| format!("failed to encode image {}", output.display()))?;

    objrec_io::write_files_atomic(&[(descriptions, text.as_slice()), (output, encoded.as_slice())])
        .with_context(|| {
            format!(
                "failed to write {} and {}",
                descriptions.display(),
                output.display()
            )
        })?;
    info!(
        "{}: {} objects -> {}",
        input.display(),
        analysis.store.len(),
        descriptions.display()
    );
    Ok(analysis)
}

/// Stage 3: match the objects of a labeled image against a descriptor
/// file and write the annotated image.
pub fn run_recognize(
    input: &Path,
    descriptions: &Path,
    output: &Path,
    options: &MatchOptions,
) -> Result<Recognition> {
    let labeled = read_input(input)?;
    let store = DescriptorStore::read_from_file(descriptions)
        .with_context(|| format!("failed to read descriptors {}", descriptions.display()))?;
    let recognition =
        recognize_objects(&labeled, &store, options).context("recognition failed")?;
    write_output(&recognition.image, output)?;
    info!(
        "{}: {} matches against {}",
        input.display(),
        recognition.matches.len(),
        descriptions.display()
    );
    Ok(recognition)
}
