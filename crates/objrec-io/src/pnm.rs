//! PNM (Portable Any Map) format support
//!
//! Reads PBM (P1 ASCII, P4 binary) and PGM (P2 ASCII, P5 binary) and
//! writes binary PGM (P5). Color variants (P3/P6) and PAM (P7) are not
//! supported.
//!
//! PBM pixels are 1 for black, which the pipeline treats as foreground;
//! the resulting image has a maximum gray level of 1.

use crate::{IoError, IoResult};
use objrec_core::{GrayImage, GrayImageMut};
use std::io::{Read, Write};

/// Largest maxval allowed by the PGM specification.
const PGM_MAX_MAXVAL: u32 = 65535;

/// PNM header fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PnmHeader {
    /// Magic digit: 1, 2, 4 or 5
    kind: u8,
    cols: u32,
    rows: u32,
    maxval: u32,
}

/// Byte cursor over header text with `#` comment handling.
struct HeaderScanner<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> HeaderScanner<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while self.pos < self.data.len() {
            let b = self.data[self.pos];
            if b == b'#' {
                while self.pos < self.data.len() && self.data[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Parse the next unsigned decimal token.
    fn next_uint(&mut self, what: &str) -> IoResult<u32> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(IoError::InvalidData(format!("PNM: missing {}", what)));
        }
        // Digits only, so the slice is valid UTF-8
        let text = std::str::from_utf8(&self.data[start..self.pos])
            .map_err(|e| IoError::InvalidData(format!("PNM: {}", e)))?;
        text.parse::<u32>()
            .map_err(|e| IoError::InvalidData(format!("PNM: bad {} '{}': {}", what, text, e)))
    }

    /// Parse the next single `0`/`1` digit of a P1 raster.
    fn next_bit(&mut self) -> IoResult<u32> {
        self.skip_whitespace_and_comments();
        match self.data.get(self.pos) {
            Some(b'0') => {
                self.pos += 1;
                Ok(0)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(1)
            }
            _ => Err(IoError::InvalidData(
                "PBM: truncated or invalid ASCII raster".to_string(),
            )),
        }
    }

    /// Consume the single whitespace byte separating header and raster.
    fn consume_raster_separator(&mut self) -> IoResult<()> {
        match self.data.get(self.pos) {
            Some(b) if b.is_ascii_whitespace() => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(IoError::InvalidData(
                "PNM: missing whitespace before raster".to_string(),
            )),
        }
    }

    fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

fn read_header(scanner: &mut HeaderScanner<'_>) -> IoResult<PnmHeader> {
    let magic = scanner.data.get(..2).ok_or_else(|| {
        IoError::InvalidData("PNM: file too short for magic number".to_string())
    })?;
    let kind = match magic {
        b"P1" => 1,
        b"P2" => 2,
        b"P4" => 4,
        b"P5" => 5,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNM variant {}",
                String::from_utf8_lossy(other)
            )));
        }
    };
    scanner.pos = 2;

    let cols = scanner.next_uint("width")?;
    let rows = scanner.next_uint("height")?;
    let maxval = if kind == 1 || kind == 4 {
        1
    } else {
        scanner.next_uint("maxval")?
    };
    if maxval == 0 || maxval > PGM_MAX_MAXVAL {
        return Err(IoError::InvalidData(format!(
            "PGM: maxval {} outside 1..={}",
            maxval, PGM_MAX_MAXVAL
        )));
    }

    Ok(PnmHeader {
        kind,
        cols,
        rows,
        maxval,
    })
}

/// Read a PBM/PGM image from a reader.
///
/// # Returns
/// A `GrayImage` whose maximum gray level is the file's maxval (1 for PBM).
pub fn read_pnm<R: Read>(mut reader: R) -> IoResult<GrayImage> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    decode_pnm(&data)
}

/// Decode a PBM/PGM image held in memory.
pub fn decode_pnm(data: &[u8]) -> IoResult<GrayImage> {
    let mut scanner = HeaderScanner::new(data);
    let header = read_header(&mut scanner)?;
    let mut image = GrayImageMut::new(header.rows, header.cols, header.maxval)?;

    match header.kind {
        1 => {
            for r in 0..header.rows {
                for c in 0..header.cols {
                    let bit = scanner.next_bit()?;
                    image.set_pixel_unchecked(r, c, bit);
                }
            }
        }
        2 => {
            for r in 0..header.rows {
                for c in 0..header.cols {
                    let value = scanner.next_uint("sample")?;
                    image.set_pixel(r, c, value)?;
                }
            }
        }
        4 => {
            scanner.consume_raster_separator()?;
            let raster = scanner.remaining();
            let bytes_per_row = header.cols.div_ceil(8) as usize;
            check_raster_len(raster, bytes_per_row, header.rows)?;
            for r in 0..header.rows {
                let row_start = r as usize * bytes_per_row;
                for c in 0..header.cols {
                    let byte = raster[row_start + (c / 8) as usize];
                    let bit = (byte >> (7 - (c % 8))) & 1;
                    image.set_pixel_unchecked(r, c, bit as u32);
                }
            }
        }
        5 => {
            scanner.consume_raster_separator()?;
            let raster = scanner.remaining();
            let sample_bytes = if header.maxval > 255 { 2 } else { 1 };
            let bytes_per_row = header.cols as usize * sample_bytes;
            check_raster_len(raster, bytes_per_row, header.rows)?;
            for r in 0..header.rows {
                let row_start = r as usize * bytes_per_row;
                for c in 0..header.cols {
                    let idx = row_start + c as usize * sample_bytes;
                    let value = if sample_bytes == 2 {
                        ((raster[idx] as u32) << 8) | raster[idx + 1] as u32
                    } else {
                        raster[idx] as u32
                    };
                    image.set_pixel(r, c, value)?;
                }
            }
        }
        _ => unreachable!("kind validated by read_header"),
    }

    Ok(image.into())
}

fn check_raster_len(raster: &[u8], bytes_per_row: usize, rows: u32) -> IoResult<()> {
    let needed = bytes_per_row * rows as usize;
    if raster.len() < needed {
        return Err(IoError::InvalidData(format!(
            "PNM: raster truncated ({} of {} bytes)",
            raster.len(),
            needed
        )));
    }
    Ok(())
}

/// Write a `GrayImage` as binary PGM (P5) to a writer.
///
/// The image's maximum gray level becomes the maxval; samples are one
/// byte when it is at most 255 and two big-endian bytes otherwise.
pub fn write_pnm<W: Write>(image: &GrayImage, mut writer: W) -> IoResult<()> {
    let maxval = image.max_gray().max(1);
    if maxval > PGM_MAX_MAXVAL {
        return Err(IoError::EncodeError(format!(
            "PGM cannot store maximum gray level {}",
            maxval
        )));
    }

    write!(writer, "P5\n{} {}\n{}\n", image.cols(), image.rows(), maxval)?;

    let sample_bytes = if maxval > 255 { 2 } else { 1 };
    let mut row_buf = Vec::with_capacity(image.cols() as usize * sample_bytes);
    for r in 0..image.rows() {
        row_buf.clear();
        for &value in image.row_data(r) {
            if sample_bytes == 2 {
                row_buf.push((value >> 8) as u8);
            }
            row_buf.push(value as u8);
        }
        writer.write_all(&row_buf)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_ascii_pgm_with_comments() {
        let data = b"P2\n# made by hand\n3 2 # cols rows\n9\n0 1 2\n3 4 9\n";
        let image = decode_pnm(data).unwrap();
        assert_eq!(image.rows(), 2);
        assert_eq!(image.cols(), 3);
        assert_eq!(image.max_gray(), 9);
        assert_eq!(image.data(), &[0, 1, 2, 3, 4, 9]);
    }

    #[test]
    fn test_read_pnm_from_reader() {
        let reader = std::io::Cursor::new(b"P2\n2 1\n5\n5 0\n".to_vec());
        let image = read_pnm(reader).unwrap();
        assert_eq!(image.max_gray(), 5);
        assert_eq!(image.data(), &[5, 0]);
    }

    #[test]
    fn test_read_ascii_pbm_without_separators() {
        let image = decode_pnm(b"P1\n3 2\n010\n110\n").unwrap();
        assert_eq!(image.max_gray(), 1);
        assert_eq!(image.data(), &[0, 1, 0, 1, 1, 0]);
    }

    #[test]
    fn test_read_binary_pbm() {
        // 10 columns -> 2 bytes per row
        let mut data = b"P4\n10 1\n".to_vec();
        data.extend_from_slice(&[0b1000_0001, 0b0100_0000]);
        let image = decode_pnm(&data).unwrap();
        assert_eq!(image.data(), &[1, 0, 0, 0, 0, 0, 0, 1, 0, 1]);
    }

    #[test]
    fn test_binary_pgm_roundtrip() {
        let image = GrayImage::from_vec(2, 2, 255, vec![0, 21, 128, 255]).unwrap();
        let mut buf = Vec::new();
        write_pnm(&image, &mut buf).unwrap();
        assert!(buf.starts_with(b"P5\n2 2\n255\n"));
        assert_eq!(decode_pnm(&buf).unwrap(), image);
    }

    #[test]
    fn test_sixteen_bit_roundtrip() {
        let image = GrayImage::from_vec(1, 3, 1000, vec![0, 300, 1000]).unwrap();
        let mut buf = Vec::new();
        write_pnm(&image, &mut buf).unwrap();
        assert_eq!(buf.len(), b"P5\n3 1\n1000\n".len() + 6);
        assert_eq!(decode_pnm(&buf).unwrap(), image);
    }

    #[test]
    fn test_rejects_sample_above_maxval() {
        assert!(decode_pnm(b"P2\n1 1\n5\n6\n").is_err());
    }

    #[test]
    fn test_rejects_truncated_raster() {
        let err = decode_pnm(b"P5\n4 4\n255\n\x00\x01").unwrap_err();
        assert!(matches!(err, IoError::InvalidData(_)));
    }

    #[test]
    fn test_rejects_color_variants() {
        assert!(matches!(
            decode_pnm(b"P6\n1 1\n255\n\x00\x00\x00"),
            Err(IoError::UnsupportedFormat(_))
        ));
    }
}
