//! # Monochrome Raster Encoding
//!
//! Converts RGBA pixel buffers into the 1-bit packed rows printers expect.
//!
//! ## Bit Packing
//!
//! Each row is `ceil(width / 8)` bytes, most significant bit first:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = dark (print), 0 = light, unless the output is inverted
//!
//! ```text
//! width = 10, all black:   11111111 11000000   = FF C0
//!                                    ^^^^^^ padding, always 0
//! ```
//!
//! ## Thresholding
//!
//! Every channel is composited over white with integer math, the three
//! channels are averaged, and anything below 200 counts as dark:
//!
//! ```text
//! c' = c·A/255 + 255·(255-A)/255
//! dark = (r' + g' + b') / 3 < 200
//! ```
//!
//! ## Backend Variants
//!
//! | Backend | Post-processing |
//! |---------|-----------------|
//! | EPL | direct writes are inverted (0 = print) |
//! | ZPL | none |
//! | FingerPrint | raw buffers get a `40 00` prefix; PCX uploads lose their extended palette |

pub mod pcx;
pub mod source;

pub use source::{EmbeddedImageSource, ImageSource};

use image::{Rgba, RgbaImage};

/// Average intensity below which a composited pixel prints.
pub const THRESHOLD: u32 = 200;

/// Prefix of raw raster buffers sent to FingerPrint printers.
pub const FINGERPRINT_RASTER_PREFIX: [u8; 2] = [0x40, 0x00];

/// Size of the 256-color VGA palette appended to some PCX files.
const EXTENDED_PALETTE_LEN: usize = 768;

/// Marker byte that precedes the extended PCX palette.
const EXTENDED_PALETTE_MARKER: u8 = 12;

/// Size of a PCX file header.
const PCX_HEADER_LEN: usize = 128;

/// A packed monochrome bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub data: Vec<u8>,
    pub bytes_per_row: usize,
    pub rows: usize,
}

impl Raster {
    /// Total bytes of the packed image, excluding any prefix.
    pub fn len(&self) -> usize {
        self.bytes_per_row * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the packed data with `prefix` in front.
    pub fn prefixed(&self, prefix: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(prefix.len() + self.data.len());
        out.extend_from_slice(prefix);
        out.extend_from_slice(&self.data);
        out
    }
}

/// Whether a pixel prints after compositing over white.
#[inline]
pub fn is_dark(pixel: &Rgba<u8>) -> bool {
    let [r, g, b, a] = pixel.0;
    let a = a as u32;
    let composite = |c: u8| c as u32 * a / 255 + 255 * (255 - a) / 255;
    (composite(r) + composite(g) + composite(b)) / 3 < THRESHOLD
}

/// Pack an RGBA image into rows of MSB-first bits.
///
/// With `invert` every pixel bit is complemented. Padding bits past the
/// image width stay 0 either way.
///
/// ## Example
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use labelrender::raster::encode;
///
/// let black = RgbaImage::from_pixel(10, 1, Rgba([0, 0, 0, 255]));
/// let raster = encode(&black, false);
/// assert_eq!(raster.data, vec![0xFF, 0xC0]);
/// assert_eq!(raster.bytes_per_row, 2);
/// ```
pub fn encode(image: &RgbaImage, invert: bool) -> Raster {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let bytes_per_row = width.div_ceil(8);
    let mut data = Vec::with_capacity(bytes_per_row * height);

    for y in 0..height {
        for octet in 0..bytes_per_row {
            let mut value = 0u8;
            let mut valid = 0u8;
            for i in 0..8 {
                let x = octet * 8 + i;
                if x >= width {
                    break;
                }
                let bit = 1 << (7 - i);
                valid |= bit;
                if is_dark(image.get_pixel(x as u32, y as u32)) {
                    value |= bit;
                }
            }
            if invert {
                value ^= valid;
            }
            data.push(value);
        }
    }

    Raster {
        data,
        bytes_per_row,
        rows: height,
    }
}

/// Drop a trailing 256-color palette from a PCX file.
///
/// The palette is only removed when the marker byte sits exactly where the
/// palette would start and that position lies past the header. Anything
/// else is returned unchanged.
pub fn strip_extended_palette(mut pcx: Vec<u8>) -> Vec<u8> {
    let Some(index) = (pcx.len()).checked_sub(1 + EXTENDED_PALETTE_LEN) else {
        return pcx;
    };
    if index < PCX_HEADER_LEN {
        return pcx;
    }
    if pcx[index] == EXTENDED_PALETTE_MARKER {
        pcx.truncate(index);
    }
    pcx
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn test_white_row_is_zero() {
        let img = RgbaImage::from_pixel(10, 1, WHITE);
        let raster = encode(&img, false);
        assert_eq!(raster.data, vec![0x00, 0x00]);
        assert_eq!(raster.bytes_per_row, 2);
        assert_eq!(raster.rows, 1);
    }

    #[test]
    fn test_black_row_leaves_padding_unset() {
        let img = RgbaImage::from_pixel(10, 1, BLACK);
        assert_eq!(encode(&img, false).data, vec![0xFF, 0xC0]);
    }

    #[test]
    fn test_invert_keeps_padding_unset() {
        let img = RgbaImage::from_pixel(10, 1, WHITE);
        assert_eq!(encode(&img, true).data, vec![0xFF, 0xC0]);

        let img = RgbaImage::from_pixel(10, 1, BLACK);
        assert_eq!(encode(&img, true).data, vec![0x00, 0x00]);
    }

    #[test]
    fn test_transparent_pixels_are_background() {
        let img = RgbaImage::from_pixel(8, 1, Rgba([0, 0, 0, 0]));
        assert_eq!(encode(&img, false).data, vec![0x00]);
    }

    #[test]
    fn test_threshold_boundary() {
        // average 199 prints, 200 does not
        assert!(is_dark(&Rgba([199, 199, 199, 255])));
        assert!(!is_dark(&Rgba([200, 200, 200, 255])));
        // half-transparent black: 0 + 255*127/255 = 127 -> dark
        assert!(is_dark(&Rgba([0, 0, 0, 128])));
    }

    #[test]
    fn test_msb_first_rows_top_to_bottom() {
        let mut img = RgbaImage::from_pixel(8, 2, WHITE);
        img.put_pixel(0, 0, BLACK);
        img.put_pixel(7, 1, BLACK);
        assert_eq!(encode(&img, false).data, vec![0x80, 0x01]);
    }

    #[test]
    fn test_prefixed() {
        let img = RgbaImage::from_pixel(8, 1, BLACK);
        let raster = encode(&img, false);
        assert_eq!(raster.prefixed(&FINGERPRINT_RASTER_PREFIX), vec![0x40, 0x00, 0xFF]);
        assert_eq!(raster.len(), 1);
    }

    #[test]
    fn test_strip_palette_with_marker() {
        let mut pcx = vec![0u8; 200];
        pcx.push(EXTENDED_PALETTE_MARKER);
        pcx.extend(std::iter::repeat(0xAA).take(768));
        let stripped = strip_extended_palette(pcx);
        assert_eq!(stripped.len(), 200);
    }

    #[test]
    fn test_strip_palette_without_marker_passes_through() {
        let pcx = vec![0u8; 200 + 1 + 768];
        assert_eq!(strip_extended_palette(pcx.clone()), pcx);
    }

    #[test]
    fn test_strip_palette_inside_header_passes_through() {
        // index = 127 would land inside the 128-byte header
        let mut pcx = vec![0u8; 127];
        pcx.push(EXTENDED_PALETTE_MARKER);
        pcx.extend(std::iter::repeat(0).take(768));
        assert_eq!(strip_extended_palette(pcx.clone()), pcx);

        // exactly at the header boundary it is trimmed
        let mut pcx = vec![0u8; 128];
        pcx.push(EXTENDED_PALETTE_MARKER);
        pcx.extend(std::iter::repeat(0).take(768));
        assert_eq!(strip_extended_palette(pcx).len(), 128);
    }

    #[test]
    fn test_strip_palette_short_buffer() {
        assert_eq!(strip_extended_palette(vec![1, 2, 3]), vec![1, 2, 3]);
    }
}
