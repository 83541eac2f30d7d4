//! # FingerPrint Command Formatters
//!
//! Honeywell/Intermec FingerPrint statements. Every statement is a line of
//! its own; string arguments are double-quoted.
//!
//! ## Statement Summary
//!
//! | Statement | Format | Purpose |
//! |-----------|--------|---------|
//! | `PP` | `PP {x},{y}` | print position (PRPOS) |
//! | `DIR` | `DIR {1-4}` | print direction |
//! | `AN` | `AN {1-9}` | alignment of the next object |
//! | `PL` | `PL {length},{weight}` | line (PRLINE) |
//! | `PX` | `PX {height},{width},{weight}` | box outline (PRBOX) |
//! | `FT` | `FT "{font}",{height},{slant}` | font selection |
//! | `PT` | `PT "{text}"` | print text (PRTXT) |
//! | `NI` / `II` | | normal / inverse image |
//! | `PM` | `PM "{name}"` | print stored image (PRIMAGE) |
//! | `IMAGE LOAD` | `IMAGE LOAD {skip},"{name}",{bytes},""` | upload image |
//! | `REMOVE IMAGE` | `REMOVE IMAGE "{name}"` | delete stored image |
//! | `PRBUF` | `PRBUF {bytes}` | print raw raster buffer |
//! | `BT` / `BM` / `BH` / `BR` / `PB` | | barcode type, magnification, height, ratio, print |
//! | `NASC` | `NASC {n}` | character set |
//! | `IMMEDIATE ON` / `VERBOFF` / `INPUT OFF` | | session control |
//! | `PF` | `PF {copies}` | print and feed |
//!
//! ## Coordinates
//!
//! Origin bottom-left with y growing upwards. `DIR 1` prints left to
//! right; each further direction turns the object a quarter counter-clockwise.

use std::str::FromStr;

use crate::encoding::{TextEncoding, normalize_name};
use crate::error::RenderError;
use crate::geometry::RotationSector;
use crate::raster::{FINGERPRINT_RASTER_PREFIX, Raster};

// ============================================================================
// PARAMETER ENUMS
// ============================================================================

/// Print direction (`DIR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftToRight = 1,
    TopToBottom = 2,
    RightToLeft = 3,
    BottomToTop = 4,
}

impl Direction {
    /// Direction of text drawn under a rotation sector.
    ///
    /// | Sector | Direction |
    /// |--------|-----------|
    /// | 0 | 1 |
    /// | 1 | 4 |
    /// | 2 | 3 |
    /// | 3 | 2 |
    pub fn from_sector(sector: RotationSector) -> Self {
        match (4 - sector.value()) % 4 + 1 {
            1 => Direction::LeftToRight,
            2 => Direction::TopToBottom,
            3 => Direction::RightToLeft,
            _ => Direction::BottomToTop,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_odd(self) -> bool {
        self.code() % 2 == 1
    }
}

/// Anchor point of the next object (`AN`), laid out like a numeric keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    BottomLeft = 1,
    BottomMiddle = 2,
    BottomRight = 3,
    BaselineLeft = 4,
    BaselineMiddle = 5,
    BaselineRight = 6,
    TopLeft = 7,
    TopMiddle = 8,
    TopRight = 9,
}

/// Barcode types (`BT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodeType {
    Code128,
    Code128A,
    Code128B,
    Code128C,
    Ean128,
    Interleaved2Of5,
    Code39,
    Code39FullAscii,
    Code39WithChecksum,
}

impl BarcodeType {
    pub fn name(self) -> &'static str {
        match self {
            BarcodeType::Code128 => "CODE128",
            BarcodeType::Code128A => "CODE128A",
            BarcodeType::Code128B => "CODE128B",
            BarcodeType::Code128C => "CODE128C",
            BarcodeType::Ean128 => "EAN128",
            BarcodeType::Interleaved2Of5 => "INT2OF5",
            BarcodeType::Code39 => "CODE39",
            BarcodeType::Code39FullAscii => "CODE39A",
            BarcodeType::Code39WithChecksum => "CODE39C",
        }
    }
}

// ============================================================================
// CHARACTER SETS
// ============================================================================

/// # Character Set (`NASC`)
///
/// | Name | `NASC` |
/// |------|--------|
/// | `utf8` (default) | 8 |
/// | `dos850`, `dos852`, `dos855`, `dos857` | page number |
/// | `windows1250` - `windows1254`, `windows1257` | page number |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterSet {
    #[default]
    Utf8,
    Dos850,
    Dos852,
    Dos855,
    Dos857,
    Windows1250,
    Windows1251,
    Windows1252,
    Windows1253,
    Windows1254,
    Windows1257,
}

impl CharacterSet {
    pub const ALL: [CharacterSet; 11] = [
        CharacterSet::Utf8,
        CharacterSet::Dos850,
        CharacterSet::Dos852,
        CharacterSet::Dos855,
        CharacterSet::Dos857,
        CharacterSet::Windows1250,
        CharacterSet::Windows1251,
        CharacterSet::Windows1252,
        CharacterSet::Windows1253,
        CharacterSet::Windows1254,
        CharacterSet::Windows1257,
    ];

    pub fn code(self) -> u16 {
        match self {
            CharacterSet::Utf8 => 8,
            CharacterSet::Dos850 => 850,
            CharacterSet::Dos852 => 852,
            CharacterSet::Dos855 => 855,
            CharacterSet::Dos857 => 857,
            CharacterSet::Windows1250 => 1250,
            CharacterSet::Windows1251 => 1251,
            CharacterSet::Windows1252 => 1252,
            CharacterSet::Windows1253 => 1253,
            CharacterSet::Windows1254 => 1254,
            CharacterSet::Windows1257 => 1257,
        }
    }

    pub fn encoding(self) -> TextEncoding {
        match self {
            CharacterSet::Utf8 => TextEncoding::Utf8,
            CharacterSet::Dos850 | CharacterSet::Dos852 | CharacterSet::Dos855 | CharacterSet::Dos857 => {
                TextEncoding::Dos(self.code())
            }
            _ => TextEncoding::Windows(self.code()),
        }
    }

    pub fn name(self) -> String {
        self.encoding().config_name()
    }
}

impl FromStr for CharacterSet {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        CharacterSet::ALL
            .into_iter()
            .find(|set| set.name() == wanted)
            .ok_or_else(|| RenderError::Config(format!("unknown FingerPrint character set '{}'", s)))
    }
}

// ============================================================================
// SESSION CONTROL
// ============================================================================

/// Execute each statement as soon as it is received.
pub fn immediate_on() -> String {
    "IMMEDIATE ON".to_string()
}

/// Stop echoing received statements.
pub fn verb_off() -> String {
    "VERBOFF".to_string()
}

/// Leave the input mode started by `VERBOFF`.
pub fn input_off() -> String {
    "INPUT OFF".to_string()
}

pub fn select_character_set(set: CharacterSet) -> String {
    format!("NASC {}", set.code())
}

/// # Print Feed (PF)
pub fn print_feed(copies: u32) -> String {
    format!("PF {}", copies)
}

// ============================================================================
// LAYOUT
// ============================================================================

pub fn position(x: i32, y: i32) -> String {
    format!("PP {},{}", x, y)
}

pub fn direction(direction: Direction) -> String {
    format!("DIR {}", direction.code())
}

pub fn align(alignment: Alignment) -> String {
    format!("AN {}", alignment as u8)
}

pub fn normal_image() -> String {
    "NI".to_string()
}

pub fn invert_image() -> String {
    "II".to_string()
}

// ============================================================================
// GRAPHICS
// ============================================================================

/// # Line (PL)
///
/// A solid bar `length` along the print direction and `weight` across it.
pub fn line(length: i32, weight: i32) -> String {
    format!("PL {},{}", length, weight)
}

/// # Box (PX)
///
/// Note the field order: height comes before width.
///
/// ```
/// use labelrender::backend::fingerprint::commands::rect_box;
/// assert_eq!(rect_box(40, 20, 2), "PX 20,40,2");
/// ```
pub fn rect_box(width: i32, height: i32, weight: i32) -> String {
    format!("PX {},{},{}", height, width, weight)
}

/// Delete a stored image; harmless when it does not exist.
pub fn remove_image(name: &str) -> String {
    format!("REMOVE IMAGE \"{}\"", name)
}

/// # Image Load
///
/// Announces `total_bytes` of image data following on the next line.
/// `skip` is the number of bytes after the statement's line feed the
/// printer discards before the data starts, one less than the length of
/// the line terminator.
pub fn image_load(skip: usize, name: &str, total_bytes: usize) -> String {
    format!("IMAGE LOAD {},\"{}\",{},\"\"", skip, name, total_bytes)
}

/// # Print Image (PM)
pub fn print_image(name: &str) -> String {
    format!("PM \"{}\"", name)
}

/// # Print Buffer (PRBUF)
///
/// Raw raster data follows; it starts with the `0x40 0x00` marker.
pub fn print_buffer(total_bytes: usize) -> String {
    format!("PRBUF {}", total_bytes)
}

/// Binary payload that follows `PRBUF`: the marker, then the packed rows.
///
/// Pair with [`print_buffer`] using the payload's length.
pub fn print_buffer_data(raster: &Raster) -> Vec<u8> {
    raster.prefixed(&FINGERPRINT_RASTER_PREFIX)
}

// ============================================================================
// TEXT
// ============================================================================

/// # Font (FT)
///
/// `slant` is in degrees, 0 for upright.
pub fn font(name: &str, height: i32, slant: i32) -> String {
    format!("FT \"{}\",{},{}", name, height, slant)
}

/// # Print Text (PT)
pub fn print_text(text: &str) -> String {
    format!("PT \"{}\"", text)
}

// ============================================================================
// BARCODES
// ============================================================================

pub fn barcode_type(barcode: BarcodeType) -> String {
    format!("BT \"{}\"", barcode.name())
}

/// Narrow bar width in dots.
pub fn barcode_magnify(narrow: u32) -> String {
    format!("BM {}", narrow)
}

pub fn barcode_height(height: i32) -> String {
    format!("BH {}", height)
}

/// # Bar Ratio (BR)
pub fn barcode_ratio(wide: u32, narrow: u32) -> String {
    format!("BR {},{}", wide, narrow)
}

/// # Print Bar Code (PB)
pub fn print_barcode(data: &str) -> String {
    format!("PB \"{}\"", data)
}
