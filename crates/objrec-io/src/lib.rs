//! objrec-io - image I/O for objrec
//!
//! Reads and writes the raster images consumed and produced by the
//! pipeline stages.
//!
//! # Supported formats
//!
//! | Format | Read | Write | Feature |
//! |--------|------|-------|---------|
//! | PBM (P1, P4) | yes | no | `pnm` |
//! | PGM (P2, P5) | yes | P5 | `pnm` |
//! | PNG (grayscale) | yes | yes | `png-format` |
//!
//! File writes are atomic: the image is encoded in memory, written to a
//! temporary file next to the destination, and renamed into place, so a
//! failed write never leaves a truncated file behind.

mod error;
mod format;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

use log::{debug, warn};
use objrec_core::GrayImage;
use std::io::{Cursor, Write};
use std::path::Path;

/// Read an image from a file, detecting the format from its contents.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<GrayImage> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let image = read_image_mem(&data)?;
    debug!(
        "read {}: {}x{} max gray {}",
        path.display(),
        image.rows(),
        image.cols(),
        image.max_gray()
    );
    Ok(image)
}

/// Decode an image held in memory.
pub fn read_image_mem(data: &[u8]) -> IoResult<GrayImage> {
    match detect_format_from_bytes(data)? {
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::decode_pnm(data),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(Cursor::new(data)),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not enabled",
            other
        ))),
    }
}

/// Encode an image into a byte vector.
pub fn write_image_mem(image: &GrayImage, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(image, &mut buf)?,
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(image, &mut buf)?,
        #[allow(unreachable_patterns)]
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "{:?} support not enabled",
                other
            )));
        }
    }
    Ok(buf)
}

/// Write an image to a file atomically.
pub fn write_image<P: AsRef<Path>>(image: &GrayImage, path: P, format: ImageFormat) -> IoResult<()> {
    let path = path.as_ref();
    let data = write_image_mem(image, format)?;
    write_file_atomic(path, &data)?;
    debug!(
        "wrote {} ({:?}, {} bytes)",
        path.display(),
        format,
        data.len()
    );
    Ok(())
}

/// Replace the contents of `path` with `data` atomically.
///
/// The bytes go to a temporary file in the destination directory which
/// is then renamed over `path`. On failure the destination is left
/// untouched.
pub fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> IoResult<()> {
    let path = path.as_ref();
    let tmp = stage_file(path, data)?;
    tmp.persist(path).map_err(|e| IoError::Io(e.error))?;
    Ok(())
}

/// Write several files so that either all of them appear or none does.
///
/// Every temporary file is created, written and synced before the first
/// rename, so a missing or unwritable directory fails with nothing in
/// place. If a later rename fails, the destinations already renamed are
/// removed.
pub fn write_files_atomic<P: AsRef<Path>>(files: &[(P, &[u8])]) -> IoResult<()> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, data) in files {
        let path = path.as_ref();
        staged.push((path, stage_file(path, data)?));
    }

    let mut written: Vec<&Path> = Vec::with_capacity(staged.len());
    for (path, tmp) in staged {
        if let Err(e) = tmp.persist(path) {
            for done in &written {
                if let Err(remove_err) = std::fs::remove_file(done) {
                    warn!("failed to remove {}: {}", done.display(), remove_err);
                }
            }
            return Err(IoError::Io(e.error));
        }
        written.push(path);
    }
    debug!("wrote {} files", written.len());
    Ok(())
}

fn stage_file(path: &Path, data: &[u8]) -> IoResult<tempfile::NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}
