//! # ZPL Command Formatters
//!
//! Pure functions producing ZPL II command strings. Field commands that
//! place something on the label end with `^FS` (field separator); the
//! positioning command (`^FO`/`^FT`) is a separate line before them.
//!
//! ## Command Summary
//!
//! | Command | Format | Purpose |
//! |---------|--------|---------|
//! | `^XA` / `^XZ` | | start / end of label format |
//! | `^CI` | `^CI{n}` | character set |
//! | `^LH` | `^LH{x},{y}` | label home |
//! | `^PO` | `^PO{N\|I}` | print orientation |
//! | `^FO` | `^FO{x},{y}` | field origin (top-left of the field) |
//! | `^FT` | `^FT{x},{y}` | field typeset (baseline / bottom-left) |
//! | `^FR` | `^FR` | field reverse print |
//! | `^GB` | `^GB{w},{h},{t},{B\|W}^FS` | graphic box |
//! | `^A` | `^A{font}{o},{h},{w}^FD{text}^FS` | scalable font text |
//! | `~DG` | `~DGR:{name},{total},{row},{hex}` | download graphic to RAM |
//! | `^XG` | `^XGR:{name},1,1^FS` | recall graphic |
//! | `^GF` | `^GFA,{total},{total},{row},{hex}` | inline graphic field |
//! | `^BY` | `^BY{module},{ratio},{h}` | barcode field defaults |
//! | `^B3` / `^BC` / `^B2` / `^B0` | | Code 39 / Code 128 / I2of5 / Aztec |

use std::str::FromStr;

use crate::encoding::{TextEncoding, normalize_name};
use crate::error::RenderError;
use crate::geometry::RotationSector;

// ============================================================================
// PARAMETER ENUMS
// ============================================================================

#[inline]
fn yes_no(flag: bool) -> char {
    if flag { 'Y' } else { 'N' }
}

/// Graphic box line color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineColor {
    Black,
    White,
}

impl LineColor {
    fn code(self) -> char {
        match self {
            LineColor::Black => 'B',
            LineColor::White => 'W',
        }
    }
}

/// Field rotation, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldOrientation {
    #[default]
    Normal,
    Rotated90,
    Inverted180,
    Bottom270,
}

impl FieldOrientation {
    pub fn from_sector(sector: RotationSector) -> Self {
        match sector.value() {
            0 => FieldOrientation::Normal,
            1 => FieldOrientation::Rotated90,
            2 => FieldOrientation::Inverted180,
            _ => FieldOrientation::Bottom270,
        }
    }

    fn code(self) -> char {
        match self {
            FieldOrientation::Normal => 'N',
            FieldOrientation::Rotated90 => 'R',
            FieldOrientation::Inverted180 => 'I',
            FieldOrientation::Bottom270 => 'B',
        }
    }
}

/// Whole-label print orientation (`^PO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintOrientation {
    #[default]
    Normal,
    Inverted,
}

impl PrintOrientation {
    fn code(self) -> char {
        match self {
            PrintOrientation::Normal => 'N',
            PrintOrientation::Inverted => 'I',
        }
    }
}

/// Code 128 subset mode (`^BC` field 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Code128Mode {
    /// Subset chosen by invocation codes in the data (`>9`, `>:`, `>;`).
    #[default]
    NoSelectedMode,
    UccCase,
    Automatic,
    UccEan,
}

impl Code128Mode {
    fn code(self) -> char {
        match self {
            Code128Mode::NoSelectedMode => 'N',
            Code128Mode::UccCase => 'U',
            Code128Mode::Automatic => 'A',
            Code128Mode::UccEan => 'D',
        }
    }
}

/// Interpretation line options shared by the linear barcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interpretation {
    pub print: bool,
    pub above: bool,
}

impl Interpretation {
    pub const NONE: Self = Self { print: false, above: false };
    pub const BELOW: Self = Self { print: true, above: false };
}

// ============================================================================
// CHARACTER SETS
// ============================================================================

/// # Character Set (`^CI`)
///
/// | Name | `^CI` | Encoding |
/// |------|-------|----------|
/// | `dos850` | 13 | CP850 |
/// | `windows1252` | 27 | windows-1252 |
/// | `utf8` (default) | 28 | UTF-8 |
/// | `utf16be` | 29 | UTF-16BE |
/// | `utf16le` | 30 | UTF-16LE |
/// | `windows1250` | 31 | windows-1250 |
/// | `windows1251` | 33 | windows-1251 |
/// | `windows1253` | 34 | windows-1253 |
/// | `windows1254` | 35 | windows-1254 |
/// | `windows1255` | 36 | windows-1255 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterSet {
    Dos850,
    Windows1252,
    #[default]
    Utf8,
    Utf16BigEndian,
    Utf16LittleEndian,
    Windows1250,
    Windows1251,
    Windows1253,
    Windows1254,
    Windows1255,
}

impl CharacterSet {
    pub const ALL: [CharacterSet; 10] = [
        CharacterSet::Dos850,
        CharacterSet::Windows1252,
        CharacterSet::Utf8,
        CharacterSet::Utf16BigEndian,
        CharacterSet::Utf16LittleEndian,
        CharacterSet::Windows1250,
        CharacterSet::Windows1251,
        CharacterSet::Windows1253,
        CharacterSet::Windows1254,
        CharacterSet::Windows1255,
    ];

    pub fn code(self) -> u8 {
        match self {
            CharacterSet::Dos850 => 13,
            CharacterSet::Windows1252 => 27,
            CharacterSet::Utf8 => 28,
            CharacterSet::Utf16BigEndian => 29,
            CharacterSet::Utf16LittleEndian => 30,
            CharacterSet::Windows1250 => 31,
            CharacterSet::Windows1251 => 33,
            CharacterSet::Windows1253 => 34,
            CharacterSet::Windows1254 => 35,
            CharacterSet::Windows1255 => 36,
        }
    }

    pub fn encoding(self) -> TextEncoding {
        match self {
            CharacterSet::Dos850 => TextEncoding::Dos(850),
            CharacterSet::Windows1252 => TextEncoding::Windows(1252),
            CharacterSet::Utf8 => TextEncoding::Utf8,
            CharacterSet::Utf16BigEndian => TextEncoding::Utf16Be,
            CharacterSet::Utf16LittleEndian => TextEncoding::Utf16Le,
            CharacterSet::Windows1250 => TextEncoding::Windows(1250),
            CharacterSet::Windows1251 => TextEncoding::Windows(1251),
            CharacterSet::Windows1253 => TextEncoding::Windows(1253),
            CharacterSet::Windows1254 => TextEncoding::Windows(1254),
            CharacterSet::Windows1255 => TextEncoding::Windows(1255),
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
            .ok_or_else(|| RenderError::Config(format!("unknown ZPL character set '{}'", s)))
    }
}

// ============================================================================
// FORMAT CONTROL
// ============================================================================

pub fn start_format() -> String {
    "^XA".to_string()
}

pub fn end_format() -> String {
    "^XZ".to_string()
}

pub fn change_international_font(set: CharacterSet) -> String {
    format!("^CI{}", set.code())
}

/// # Label Home (^LH)
///
/// Shifts the origin of every following field.
pub fn label_home(x: i32, y: i32) -> String {
    format!("^LH{},{}", x, y)
}

pub fn print_orientation(orientation: PrintOrientation) -> String {
    format!("^PO{}", orientation.code())
}

// ============================================================================
// FIELD POSITIONING
// ============================================================================

/// # Field Origin (^FO)
///
/// Positions the upper-left corner of the next field.
pub fn field_origin(x: i32, y: i32) -> String {
    format!("^FO{},{}", x, y)
}

/// # Field Typeset (^FT)
///
/// Positions the next field by its baseline (text) or lower-left corner
/// (graphics and barcodes). Every translator uses this one.
pub fn field_typeset(x: i32, y: i32) -> String {
    format!("^FT{},{}", x, y)
}

/// # Field Reverse Print (^FR)
pub fn field_reverse() -> String {
    "^FR".to_string()
}

// ============================================================================
// GRAPHICS
// ============================================================================

/// # Graphic Box (^GB)
///
/// A box of `width` x `height` with border `thickness`. A zero width or
/// height collapses to the thickness, which is how lines are drawn.
///
/// ```
/// use labelrender::backend::zpl::commands::{graphic_box, LineColor};
/// assert_eq!(graphic_box(100, 0, 3, LineColor::Black), "^GB100,0,3,B^FS");
/// ```
pub fn graphic_box(width: i32, height: i32, thickness: i32, color: LineColor) -> String {
    format!("^GB{},{},{},{}^FS", width, height, thickness, color.code())
}

/// # Download Graphic (~DG)
///
/// Stores a bitmap in printer RAM as `R:{name}.GRF`. Set bits print.
pub fn download_graphics(name: &str, data: &[u8], bytes_per_row: usize) -> String {
    format!("~DGR:{},{},{},{}", name, data.len(), bytes_per_row, hex::encode_upper(data))
}

/// # Recall Graphic (^XG)
pub fn recall_graphic(name: &str) -> String {
    format!("^XGR:{},1,1^FS", name)
}

/// # Graphic Field (^GF)
///
/// Inline ASCII-hex bitmap; binary and total byte counts are equal.
pub fn graphic_field(data: &[u8], bytes_per_row: usize) -> String {
    format!(
        "^GFA,{},{},{},{}",
        data.len(),
        data.len(),
        bytes_per_row,
        hex::encode_upper(data)
    )
}

// ============================================================================
// TEXT
// ============================================================================

/// # Scalable/Bitmapped Font (^A) with Field Data
///
/// `width` 0 keeps the font's aspect ratio.
pub fn font(name: &str, orientation: FieldOrientation, height: i32, width: i32, text: &str) -> String {
    format!("^A{}{},{},{}^FD{}^FS", name, orientation.code(), height, width, text)
}

// ============================================================================
// BARCODES
// ============================================================================

/// # Bar Code Field Default (^BY)
///
/// The wide-to-narrow ratio is rounded to one decimal, half to even.
///
/// ```
/// use labelrender::backend::zpl::commands::barcode_field_default;
/// assert_eq!(barcode_field_default(2, 3.0, 80), "^BY2,3,80");
/// assert_eq!(barcode_field_default(3, 7.0 / 3.0, 80), "^BY3,2.3,80");
/// ```
pub fn barcode_field_default(module_width: u32, ratio: f32, height: i32) -> String {
    let ratio = (ratio * 10.0).round_ties_even() / 10.0;
    format!("^BY{},{},{}", module_width, ratio, height)
}

/// # Code 39 (^B3)
pub fn code39(
    orientation: FieldOrientation,
    mod43_check: bool,
    height: i32,
    interpretation: Interpretation,
    content: &str,
) -> String {
    format!(
        "^B3{},{},{},{},{}^FD{}^FS",
        orientation.code(),
        yes_no(mod43_check),
        height,
        yes_no(interpretation.print),
        yes_no(interpretation.above),
        content
    )
}

/// # Code 128 (^BC)
pub fn code128(
    orientation: FieldOrientation,
    height: i32,
    interpretation: Interpretation,
    ucc_check_digit: bool,
    mode: Code128Mode,
    content: &str,
) -> String {
    format!(
        "^BC{},{},{},{},{},{}^FD{}^FS",
        orientation.code(),
        height,
        yes_no(interpretation.print),
        yes_no(interpretation.above),
        yes_no(ucc_check_digit),
        mode.code(),
        content
    )
}

/// # Interleaved 2 of 5 (^B2)
pub fn interleaved_2_of_5(
    orientation: FieldOrientation,
    height: i32,
    interpretation: Interpretation,
    mod10_check: bool,
    content: &str,
) -> String {
    format!(
        "^B2{},{},{},{},{}^FD{}^FS",
        orientation.code(),
        height,
        yes_no(interpretation.print),
        yes_no(interpretation.above),
        yes_no(mod10_check),
        content
    )
}

/// # Aztec (^B0)
///
/// | Field | Meaning |
/// |-------|---------|
/// | magnification | 1-10 |
/// | eci | extended channel interpretation |
/// | size | error control / symbol size, 0 for default |
/// | menu | menu symbol indicator |
/// | symbols | structured append count |
pub fn aztec(
    orientation: FieldOrientation,
    magnification: u32,
    eci: bool,
    size: u32,
    menu: bool,
    symbols: u32,
    content: &str,
) -> String {
    format!(
        "^B0{},{},{},{},{},{}^FD{}^FS",
        orientation.code(),
        magnification,
        yes_no(eci),
        size,
        yes_no(menu),
        symbols,
        content
    )
}
