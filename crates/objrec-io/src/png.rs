//! PNG image format support
//!
//! Grayscale only. Bit depths 1, 2, 4, 8 and 16 are read; the image's
//! maximum gray level becomes `2^depth - 1`. On write the smallest of
//! 1, 8 or 16 bits that holds the declared maximum gray level is used.

use crate::{IoError, IoResult};
use objrec_core::{GrayImage, GrayImageMut};
use png::{BitDepth, ColorType, Decoder, Encoder};
use std::io::{BufRead, Seek, Write};

/// Read a grayscale PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<GrayImage> {
    let decoder = Decoder::new(reader);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    if color_type != ColorType::Grayscale {
        return Err(IoError::UnsupportedFormat(format!(
            "PNG color type {:?} (grayscale required)",
            color_type
        )));
    }

    let bits = bit_depth as u32;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let mut image = GrayImageMut::new(height, width, (1u32 << bits) - 1)?;

    for row in 0..height {
        let row_start = row as usize * bytes_per_row;
        for col in 0..width {
            let value = if bits == 16 {
                let idx = row_start + col as usize * 2;
                ((data[idx] as u32) << 8) | data[idx + 1] as u32
            } else {
                let per_byte = 8 / bits;
                let byte = data[row_start + (col / per_byte) as usize];
                let shift = 8 - bits * (col % per_byte + 1);
                ((byte >> shift) as u32) & ((1 << bits) - 1)
            };
            image.set_pixel_unchecked(row, col, value);
        }
    }

    Ok(image.into())
}

/// Write a grayscale PNG image
pub fn write_png<W: Write>(image: &GrayImage, writer: W) -> IoResult<()> {
    let width = image.cols();
    let height = image.rows();

    let bit_depth = match image.max_gray() {
        0..=1 => BitDepth::One,
        2..=255 => BitDepth::Eight,
        256..=65535 => BitDepth::Sixteen,
        other => {
            return Err(IoError::EncodeError(format!(
                "PNG cannot store maximum gray level {}",
                other
            )));
        }
    };

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(bit_depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let bytes_per_row = match bit_depth {
        BitDepth::One => width.div_ceil(8),
        BitDepth::Sixteen => width * 2,
        _ => width,
    } as usize;

    let mut data = vec![0u8; bytes_per_row * height as usize];

    for row in 0..height {
        let row_start = row as usize * bytes_per_row;
        for (col, &val) in image.row_data(row).iter().enumerate() {
            match bit_depth {
                BitDepth::One => {
                    if val != 0 {
                        data[row_start + col / 8] |= 1 << (7 - (col % 8));
                    }
                }
                BitDepth::Sixteen => {
                    let idx = row_start + col * 2;
                    data[idx] = (val >> 8) as u8;
                    data[idx + 1] = val as u8;
                }
                _ => data[row_start + col] = val as u8,
            }
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}
