//! # Monochrome PCX Encoder
//!
//! EPL and FingerPrint printers store graphics uploaded as ZSoft PCX files.
//! This encoder writes the smallest variant they accept: version 5,
//! run-length encoded, one plane of one bit per pixel.
//!
//! ## File Layout
//!
//! | Offset | Size | Field | Value |
//! |--------|------|-------|-------|
//! | 0 | 1 | Manufacturer | `0x0A` |
//! | 1 | 1 | Version | `5` |
//! | 2 | 1 | Encoding | `1` (RLE) |
//! | 3 | 1 | Bits per pixel | `1` |
//! | 4 | 8 | Window xmin, ymin, xmax, ymax | u16 LE |
//! | 12 | 4 | Horizontal / vertical DPI | u16 LE |
//! | 16 | 48 | 16-color palette | black, white, zeros |
//! | 64 | 1 | Reserved | `0` |
//! | 65 | 1 | Planes | `1` |
//! | 66 | 2 | Bytes per line | even, u16 LE |
//! | 68 | 2 | Palette info | `1` |
//! | 70 | 58 | Screen size + filler | zeros |
//!
//! ## Pixel Convention
//!
//! Bit 1 selects palette entry 1 (white), bit 0 selects black. The image width
//! is padded to a whole byte (and to an even byte count per line) with
//! white pixels.
//!
//! ## Run-Length Encoding
//!
//! ```text
//! run of n (2..=63) equal bytes  ->  (0xC0 | n) byte
//! single byte >= 0xC0            ->  0xC1 byte
//! single byte <  0xC0            ->  byte
//! ```
//!
//! Runs never cross scanlines.

use image::RgbaImage;

use super::is_dark;

const MANUFACTURER: u8 = 0x0A;
const VERSION: u8 = 5;
const ENCODING_RLE: u8 = 1;
const HEADER_LEN: usize = 128;
const MAX_RUN: usize = 63;

/// Resolution written into the header when none is known.
pub const DEFAULT_DPI: u16 = 203;

/// Encode an RGBA image as a 1-bit PCX file.
///
/// ## Example
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use labelrender::raster::pcx;
///
/// let img = RgbaImage::from_pixel(16, 2, Rgba([0, 0, 0, 255]));
/// let bytes = pcx::encode(&img, 203);
/// assert_eq!(bytes[0], 0x0A);
/// // each 2-byte scanline of black compresses to one run: C2 00
/// assert_eq!(&bytes[128..], &[0xC2, 0x00, 0xC2, 0x00]);
/// ```
pub fn encode(image: &RgbaImage, dpi: u16) -> Vec<u8> {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let bytes_per_line = bytes_per_line(width);

    let mut out = Vec::with_capacity(HEADER_LEN + bytes_per_line * height);
    write_header(&mut out, width, height, bytes_per_line, dpi);

    let mut line = vec![0u8; bytes_per_line];
    for y in 0..height {
        line.fill(0xFF);
        for x in 0..width {
            if is_dark(image.get_pixel(x as u32, y as u32)) {
                line[x / 8] &= !(1 << (7 - (x % 8)));
            }
        }
        write_rle(&mut out, &line);
    }
    out
}

/// Bytes per scanline: whole bytes, rounded up to an even count.
fn bytes_per_line(width: usize) -> usize {
    let bytes = width.div_ceil(8);
    bytes + bytes % 2
}

fn write_header(out: &mut Vec<u8>, width: usize, height: usize, bytes_per_line: usize, dpi: u16) {
    let u16_le = |v: usize| (v.min(u16::MAX as usize) as u16).to_le_bytes();

    out.push(MANUFACTURER);
    out.push(VERSION);
    out.push(ENCODING_RLE);
    out.push(1); // bits per pixel
    out.extend_from_slice(&[0, 0, 0, 0]); // xmin, ymin
    out.extend_from_slice(&u16_le(width.saturating_sub(1)));
    out.extend_from_slice(&u16_le(height.saturating_sub(1)));
    out.extend_from_slice(&dpi.to_le_bytes());
    out.extend_from_slice(&dpi.to_le_bytes());

    let mut palette = [0u8; 48];
    palette[3..6].copy_from_slice(&[0xFF, 0xFF, 0xFF]);
    out.extend_from_slice(&palette);

    out.push(0); // reserved
    out.push(1); // planes
    out.extend_from_slice(&u16_le(bytes_per_line));
    out.extend_from_slice(&1u16.to_le_bytes()); // palette info: color/bw
    out.resize(HEADER_LEN, 0);
}

fn write_rle(out: &mut Vec<u8>, line: &[u8]) {
    let mut i = 0;
    while i < line.len() {
        let byte = line[i];
        let mut run = 1;
        while i + run < line.len() && line[i + run] == byte && run < MAX_RUN {
            run += 1;
        }
        if run > 1 || byte >= 0xC0 {
            out.push(0xC0 | run as u8);
        }
        out.push(byte);
        i += run;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_header_fields() {
        let img = RgbaImage::from_pixel(20, 3, Rgba([255, 255, 255, 255]));
        let bytes = encode(&img, 300);
        assert_eq!(&bytes[0..4], &[0x0A, 5, 1, 1]);
        assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 19);
        assert_eq!(u16::from_le_bytes([bytes[10], bytes[11]]), 2);
        assert_eq!(u16::from_le_bytes([bytes[12], bytes[13]]), 300);
        assert_eq!(bytes[65], 1);
        // 20 px -> 3 bytes -> padded to 4
        assert_eq!(u16::from_le_bytes([bytes[66], bytes[67]]), 4);
        assert_eq!(&bytes[19..22], &[0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_white_pads_with_white() {
        let img = RgbaImage::from_pixel(4, 1, Rgba([255, 255, 255, 255]));
        let bytes = encode(&img, DEFAULT_DPI);
        // 2 bytes of 0xFF -> one run
        assert_eq!(&bytes[HEADER_LEN..], &[0xC2, 0xFF]);
    }

    #[test]
    fn test_black_pixels_clear_bits() {
        let mut img = RgbaImage::from_pixel(8, 1, Rgba([255, 255, 255, 255]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        let bytes = encode(&img, DEFAULT_DPI);
        // 0x7F is below 0xC0 and written raw, then the 0xFF pad byte needs a count
        assert_eq!(&bytes[HEADER_LEN..], &[0x7F, 0xC1, 0xFF]);
    }

    #[test]
    fn test_rle_splits_long_runs() {
        let mut out = Vec::new();
        write_rle(&mut out, &[0u8; 70]);
        assert_eq!(out, vec![0xFF, 0x00, 0xC7, 0x00]);
    }

    #[test]
    fn test_bytes_per_line_is_even() {
        assert_eq!(bytes_per_line(1), 2);
        assert_eq!(bytes_per_line(16), 2);
        assert_eq!(bytes_per_line(17), 4);
    }
}
