//! Object descriptors and their text store
//!
//! # Format
//!
//! One record per line, seven whitespace-separated fields:
//!
//! ```text
//! label center_row center_column min_inertia area roundness orientation_deg
//! ```
//!
//! `label` and `area` are unsigned integers, the rest are decimal floats
//! written with enough digits to round-trip exactly. Blank lines are
//! skipped. Reading stops at the first line that is not a complete
//! record; everything before it is kept.

use crate::error::{RegionError, RegionResult};
use log::{debug, warn};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Maximum input size in bytes.
const MAX_INPUT_SIZE: usize = 100_000_000;

/// Number of fields in one record.
const FIELD_COUNT: usize = 7;

/// Shape summary of one labeled object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectDescriptor {
    /// Gray value of the object in the labeled image
    pub label: u32,
    /// Centroid row
    pub center_row: f64,
    /// Centroid column
    pub center_column: f64,
    /// Minimum second moment about an axis through the centroid (Emin)
    pub min_inertia: f64,
    /// Pixel count
    pub area: u64,
    /// Emin / Emax, in `[0, 1]`
    pub roundness: f64,
    /// Major-axis angle from the row axis, degrees in `(-90, 90]`
    pub orientation_deg: f64,
}

impl ObjectDescriptor {
    /// Orientation in radians.
    pub fn orientation_rad(&self) -> f64 {
        self.orientation_deg.to_radians()
    }

    fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != FIELD_COUNT {
            return None;
        }
        Some(Self {
            label: fields[0].parse().ok()?,
            center_row: fields[1].parse().ok()?,
            center_column: fields[2].parse().ok()?,
            min_inertia: fields[3].parse().ok()?,
            area: fields[4].parse().ok()?,
            roundness: fields[5].parse().ok()?,
            orientation_deg: fields[6].parse().ok()?,
        })
    }

    fn write_line(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(
            writer,
            "{} {} {} {} {} {} {}",
            self.label,
            self.center_row,
            self.center_column,
            self.min_inertia,
            self.area,
            self.roundness,
            self.orientation_deg
        )
    }
}

/// Ordered collection of descriptors
///
/// Labels are not required to be unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorStore {
    descriptors: Vec<ObjectDescriptor>,
}

impl DescriptorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor.
    pub fn push(&mut self, descriptor: ObjectDescriptor) {
        self.descriptors.push(descriptor);
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptor at `index`.
    pub fn get(&self, index: usize) -> Option<&ObjectDescriptor> {
        self.descriptors.get(index)
    }

    /// Descriptors in insertion order.
    pub fn descriptors(&self) -> &[ObjectDescriptor] {
        &self.descriptors
    }

    /// Iterate over descriptors in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ObjectDescriptor> {
        self.descriptors.iter()
    }

    /// Read a store from a reader.
    pub fn read_from_reader(reader: &mut impl Read) -> RegionResult<Self> {
        let buf = read_limited(reader)?;
        Self::read_from_bytes(&buf)
    }

    /// Read a store from a file.
    pub fn read_from_file(path: impl AsRef<Path>) -> RegionResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::read_from_reader(&mut BufReader::new(file))
    }

    /// Read a store from a byte slice.
    ///
    /// Lines are decoded one at a time, so a line that is not valid UTF-8
    /// stops reading like any other malformed record.
    pub fn read_from_bytes(data: &[u8]) -> RegionResult<Self> {
        let mut store = Self::new();
        for (lineno, raw) in data.split(|&b| b == b'\n').enumerate() {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let parsed = match std::str::from_utf8(raw) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => ObjectDescriptor::parse_line(line),
                Err(_) => None,
            };
            match parsed {
                Some(descriptor) => store.push(descriptor),
                None => {
                    warn!(
                        "descriptor line {} is not a complete record; keeping {} earlier records",
                        lineno + 1,
                        store.len()
                    );
                    break;
                }
            }
        }

        debug!("read {} descriptors", store.len());
        Ok(store)
    }

    /// Write the store to a writer.
    pub fn write_to_writer(&self, writer: &mut impl Write) -> RegionResult<()> {
        for descriptor in &self.descriptors {
            descriptor.write_line(writer)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the store to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> RegionResult<()> {
        let file = std::fs::File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_to_writer(&mut writer)
    }

    /// Write the store to a byte vector.
    pub fn write_to_bytes(&self) -> RegionResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to_writer(&mut buf)?;
        Ok(buf)
    }
}

impl From<Vec<ObjectDescriptor>> for DescriptorStore {
    fn from(descriptors: Vec<ObjectDescriptor>) -> Self {
        Self { descriptors }
    }
}

impl FromIterator<ObjectDescriptor> for DescriptorStore {
    fn from_iter<I: IntoIterator<Item = ObjectDescriptor>>(iter: I) -> Self {
        Self {
            descriptors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DescriptorStore {
    type Item = ObjectDescriptor;
    type IntoIter = std::vec::IntoIter<ObjectDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.into_iter()
    }
}

impl<'a> IntoIterator for &'a DescriptorStore {
    type Item = &'a ObjectDescriptor;
    type IntoIter = std::slice::Iter<'a, ObjectDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

fn read_limited(reader: &mut impl Read) -> RegionResult<Vec<u8>> {
    let mut buf = Vec::new();
    reader
        .take((MAX_INPUT_SIZE + 1) as u64)
        .read_to_end(&mut buf)?;
    if buf.len() > MAX_INPUT_SIZE {
        return Err(RegionError::InvalidData(format!(
            "input exceeds {MAX_INPUT_SIZE} bytes"
        )));
    }
    Ok(buf)
}
