//! # EPL Command Formatters
//!
//! Pure functions producing single EPL2 command lines. Coordinates are in
//! dots from the top-left corner of the label.
//!
//! ## Command Summary
//!
//! | Command | Format | Purpose |
//! |---------|--------|---------|
//! | `N` | `N` | clear image buffer |
//! | `R` | `R{x},{y}` | reference point |
//! | `Z` | `Z{T\|B}` | print direction |
//! | `I` | `I{bits},{page},{country}` | character set |
//! | `P` | `P{n}` | print n labels |
//! | `LO`/`LW` | `{x},{y},{w},{h}` | black/white line (box) |
//! | `LS` | `LS{x},{y},{t},{xEnd},{yEnd}` | diagonal line |
//! | `X` | `X{x},{y},{t},{xEnd},{yEnd}` | box outline |
//! | `A` | `A{x},{y},{rot},{font},{hm},{vm},{N\|R},"{text}"` | text |
//! | `B` | `B{x},{y},{rot},{sel},{narrow},{wide},{h},{B\|N},"{data}"` | barcode |
//! | `GK`/`GM`/`GG` | `"{name}"` | delete/store/print stored graphic |
//! | `GW` | `GW{x},{y},{bytes},{rows}` | direct graphic write |

use std::str::FromStr;

use crate::encoding::{TextEncoding, normalize_name};
use crate::error::RenderError;

// ============================================================================
// PARAMETER ENUMS
// ============================================================================

/// Print direction (`Z` command).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintOrientation {
    /// Print from the top of the image buffer.
    #[default]
    Top,
    Bottom,
}

impl PrintOrientation {
    fn code(self) -> char {
        match self {
            PrintOrientation::Top => 'T',
            PrintOrientation::Bottom => 'B',
        }
    }
}

/// Text reverse flag (`A` command).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReverseImage {
    #[default]
    Normal,
    /// White text on the black background already printed below it.
    Reverse,
}

impl ReverseImage {
    fn code(self) -> char {
        match self {
            ReverseImage::Normal => 'N',
            ReverseImage::Reverse => 'R',
        }
    }
}

/// Human-readable line under a barcode (`B` command).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintHumanReadable {
    Yes,
    #[default]
    No,
}

impl PrintHumanReadable {
    fn code(self) -> char {
        match self {
            PrintHumanReadable::Yes => 'B',
            PrintHumanReadable::No => 'N',
        }
    }
}

/// Barcode selection (`B` command, field 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodeSelection {
    Code128Auto,
    Code128A,
    Code128B,
    Code128C,
    Interleaved2Of5,
    Interleaved2Of5Mod10,
    Interleaved2Of5HumanReadableCheck,
    Code39,
    Code39CheckDigit,
}

impl BarcodeSelection {
    pub fn code(self) -> &'static str {
        match self {
            BarcodeSelection::Code128Auto => "1",
            BarcodeSelection::Code128A => "1A",
            BarcodeSelection::Code128B => "1B",
            BarcodeSelection::Code128C => "1C",
            BarcodeSelection::Interleaved2Of5 => "2",
            BarcodeSelection::Interleaved2Of5Mod10 => "2C",
            BarcodeSelection::Interleaved2Of5HumanReadableCheck => "2D",
            BarcodeSelection::Code39 => "3",
            BarcodeSelection::Code39CheckDigit => "3C",
        }
    }
}

// ============================================================================
// CODE PAGES
// ============================================================================

/// # Printer Code Page (`I` command)
///
/// | Name | Wire code | Encoding |
/// |------|-----------|----------|
/// | `dos850` (default) | 1 | CP850 |
/// | `dos852` | 2 | CP852 |
/// | `dos860` | 3 | CP860 |
/// | `dos863` | 4 | CP863 |
/// | `dos865` | 5 | CP865 |
/// | `dos857` | 6 | CP857 |
/// | `dos861` | 7 | CP861 |
/// | `dos862` | 8 | CP862 |
/// | `dos855` | 9 | CP855 |
/// | `dos866` | 10 | CP866 |
/// | `dos737` | 11 | CP737 |
/// | `dos869` | 13 | CP869 |
/// | `windows1252` | A | windows-1252 |
/// | `windows1250` | B | windows-1250 |
/// | `windows1251` | C | windows-1251 |
/// | `windows1253` | D | windows-1253 |
/// | `windows1254` | E | windows-1254 |
/// | `windows1255` | F | windows-1255 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodePage {
    #[default]
    Dos850,
    Dos852,
    Dos860,
    Dos863,
    Dos865,
    Dos857,
    Dos861,
    Dos862,
    Dos855,
    Dos866,
    Dos737,
    Dos869,
    Windows1250,
    Windows1251,
    Windows1252,
    Windows1253,
    Windows1254,
    Windows1255,
}

impl CodePage {
    pub const ALL: [CodePage; 18] = [
        CodePage::Dos850,
        CodePage::Dos852,
        CodePage::Dos860,
        CodePage::Dos863,
        CodePage::Dos865,
        CodePage::Dos857,
        CodePage::Dos861,
        CodePage::Dos862,
        CodePage::Dos855,
        CodePage::Dos866,
        CodePage::Dos737,
        CodePage::Dos869,
        CodePage::Windows1250,
        CodePage::Windows1251,
        CodePage::Windows1252,
        CodePage::Windows1253,
        CodePage::Windows1254,
        CodePage::Windows1255,
    ];

    /// Value of the `I` command's code page field.
    pub fn code(self) -> &'static str {
        match self {
            CodePage::Dos850 => "1",
            CodePage::Dos852 => "2",
            CodePage::Dos860 => "3",
            CodePage::Dos863 => "4",
            CodePage::Dos865 => "5",
            CodePage::Dos857 => "6",
            CodePage::Dos861 => "7",
            CodePage::Dos862 => "8",
            CodePage::Dos855 => "9",
            CodePage::Dos866 => "10",
            CodePage::Dos737 => "11",
            CodePage::Dos869 => "13",
            CodePage::Windows1252 => "A",
            CodePage::Windows1250 => "B",
            CodePage::Windows1251 => "C",
            CodePage::Windows1253 => "D",
            CodePage::Windows1254 => "E",
            CodePage::Windows1255 => "F",
        }
    }

    pub fn encoding(self) -> TextEncoding {
        match self {
            CodePage::Dos850 => TextEncoding::Dos(850),
            CodePage::Dos852 => TextEncoding::Dos(852),
            CodePage::Dos860 => TextEncoding::Dos(860),
            CodePage::Dos863 => TextEncoding::Dos(863),
            CodePage::Dos865 => TextEncoding::Dos(865),
            CodePage::Dos857 => TextEncoding::Dos(857),
            CodePage::Dos861 => TextEncoding::Dos(861),
            CodePage::Dos862 => TextEncoding::Dos(862),
            CodePage::Dos855 => TextEncoding::Dos(855),
            CodePage::Dos866 => TextEncoding::Dos(866),
            CodePage::Dos737 => TextEncoding::Dos(737),
            CodePage::Dos869 => TextEncoding::Dos(869),
            CodePage::Windows1250 => TextEncoding::Windows(1250),
            CodePage::Windows1251 => TextEncoding::Windows(1251),
            CodePage::Windows1252 => TextEncoding::Windows(1252),
            CodePage::Windows1253 => TextEncoding::Windows(1253),
            CodePage::Windows1254 => TextEncoding::Windows(1254),
            CodePage::Windows1255 => TextEncoding::Windows(1255),
        }
    }

    pub fn name(self) -> String {
        self.encoding().config_name()
    }
}

impl FromStr for CodePage {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        CodePage::ALL
            .into_iter()
            .find(|page| page.name() == wanted)
            .ok_or_else(|| RenderError::Config(format!("unknown EPL code page '{}'", s)))
    }
}

// ============================================================================
// GRAPHICS
// ============================================================================

/// # Direct Graphic Write (GW)
///
/// Followed by `bytes_per_row * rows` bytes of raw bitmap data, where a 0
/// bit prints and a 1 bit does not.
///
/// ```
/// use labelrender::backend::epl::commands::graphic_direct_write;
/// assert_eq!(graphic_direct_write(10, 20, 4, 32), "GW10,20,4,32");
/// ```
pub fn graphic_direct_write(x: i32, y: i32, bytes_per_row: usize, rows: usize) -> String {
    format!("GW{},{},{},{}", x, y, bytes_per_row, rows)
}

/// # Delete Stored Graphic (GK)
pub fn delete_graphics(name: &str) -> String {
    format!("GK\"{}\"", name)
}

/// # Store Graphic (GM)
///
/// Followed by `length` bytes of PCX data.
pub fn store_graphics(name: &str, length: usize) -> String {
    format!("GM\"{}\"{}", name, length)
}

/// # Print Stored Graphic (GG)
pub fn print_graphics(x: i32, y: i32, name: &str) -> String {
    format!("GG{},{},\"{}\"", x, y, name)
}

// ============================================================================
// LINES AND BOXES
// ============================================================================

/// # Line Draw Black (LO)
///
/// Draws a filled black rectangle `width` x `height` dots.
pub fn line_draw_black(x: i32, y: i32, width: i32, height: i32) -> String {
    format!("LO{},{},{},{}", x, y, width, height)
}

/// # Line Draw White (LW)
///
/// Same as `LO`, but clears dots instead.
pub fn line_draw_white(x: i32, y: i32, width: i32, height: i32) -> String {
    format!("LW{},{},{},{}", x, y, width, height)
}

/// # Line Draw Diagonal (LS)
///
/// ## Parameters
///
/// | Field | Meaning |
/// |-------|---------|
/// | x, y | start point |
/// | thickness | line thickness in dots |
/// | x_end, y_end | end point |
pub fn line_draw_diagonal(x: i32, y: i32, thickness: i32, x_end: i32, y_end: i32) -> String {
    format!("LS{},{},{},{},{}", x, y, thickness, x_end, y_end)
}

/// # Draw Box (X)
///
/// ```
/// use labelrender::backend::epl::commands::draw_box;
/// assert_eq!(draw_box(19, 19, 4, 101, 61), "X19,19,4,101,61");
/// ```
pub fn draw_box(x: i32, y: i32, thickness: i32, x_end: i32, y_end: i32) -> String {
    format!("X{},{},{},{},{}", x, y, thickness, x_end, y_end)
}

// ============================================================================
// TEXT AND BARCODES
// ============================================================================

/// # ASCII Text (A)
///
/// ## Parameters
///
/// | Field | Values |
/// |-------|--------|
/// | rotation | 0-3, clockwise quarter turns |
/// | font | 1-5 resident fonts |
/// | horizontal multiplier | 1-6, 8 |
/// | vertical multiplier | 1-9 |
/// | reverse | `N` normal, `R` reverse |
///
/// ```
/// use labelrender::backend::epl::commands::{ascii_text, ReverseImage};
/// assert_eq!(
///     ascii_text(20, 40, 0, 3, 2, 2, ReverseImage::Normal, "Hi"),
///     "A20,40,0,3,2,2,N,\"Hi\""
/// );
/// ```
#[allow(clippy::too_many_arguments)]
pub fn ascii_text(
    x: i32,
    y: i32,
    rotation: u8,
    font: u32,
    horizontal_multiplier: u32,
    vertical_multiplier: u32,
    reverse: ReverseImage,
    text: &str,
) -> String {
    format!(
        "A{},{},{},{},{},{},{},\"{}\"",
        x,
        y,
        rotation,
        font,
        horizontal_multiplier,
        vertical_multiplier,
        reverse.code(),
        text
    )
}

/// # Bar Code (B)
#[allow(clippy::too_many_arguments)]
pub fn barcode(
    x: i32,
    y: i32,
    rotation: u8,
    selection: BarcodeSelection,
    narrow: u32,
    wide: u32,
    height: i32,
    readable: PrintHumanReadable,
    content: &str,
) -> String {
    format!(
        "B{},{},{},{},{},{},{},{},\"{}\"",
        x,
        y,
        rotation,
        selection.code(),
        narrow,
        wide,
        height,
        readable.code(),
        content
    )
}

// ============================================================================
// SETUP
// ============================================================================

/// # Set Reference Point (R)
pub fn set_reference_point(x: i32, y: i32) -> String {
    format!("R{},{}", x, y)
}

/// # Print Direction (Z)
pub fn print_direction(orientation: PrintOrientation) -> String {
    format!("Z{}", orientation.code())
}

/// # Print (P)
pub fn print(copies: u32) -> String {
    format!("P{}", copies)
}

/// # Character Set Selection (I)
///
/// `bits` is the data width: 8 for all supported code pages.
pub fn character_set_selection(bits: u8, code_page: CodePage, country_code: u16) -> String {
    format!("I{},{},{}", bits, code_page.code(), country_code)
}

/// # Clear Image Buffer (N)
pub fn clear_image_buffer() -> String {
    "N".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphics() {
        assert_eq!(delete_graphics("ABCD1234"), "GK\"ABCD1234\"");
        assert_eq!(store_graphics("ABCD1234", 300), "GM\"ABCD1234\"300");
        assert_eq!(print_graphics(5, 6, "ABCD1234"), "GG5,6,\"ABCD1234\"");
    }

    #[test]
    fn test_lines() {
        assert_eq!(line_draw_black(1, 2, 3, 4), "LO1,2,3,4");
        assert_eq!(line_draw_white(1, 2, 3, 4), "LW1,2,3,4");
        assert_eq!(line_draw_diagonal(1, 2, 3, 4, 5), "LS1,2,3,4,5");
    }

    #[test]
    fn test_text_reverse() {
        assert_eq!(
            ascii_text(1, 2, 3, 4, 1, 1, ReverseImage::Reverse, "x"),
            "A1,2,3,4,1,1,R,\"x\""
        );
    }

    #[test]
    fn test_barcode() {
        assert_eq!(
            barcode(10, 20, 1, BarcodeSelection::Code128Auto, 2, 6, 50, PrintHumanReadable::No, "123"),
            "B10,20,1,1,2,6,50,N,\"123\""
        );
        assert_eq!(
            barcode(0, 0, 0, BarcodeSelection::Code39CheckDigit, 1, 3, 10, PrintHumanReadable::Yes, "A"),
            "B0,0,0,3C,1,3,10,B,\"A\""
        );
    }

    #[test]
    fn test_setup() {
        assert_eq!(set_reference_point(0, 0), "R0,0");
        assert_eq!(print_direction(PrintOrientation::Top), "ZT");
        assert_eq!(print_direction(PrintOrientation::Bottom), "ZB");
        assert_eq!(print(2), "P2");
        assert_eq!(clear_image_buffer(), "N");
        assert_eq!(character_set_selection(8, CodePage::Dos850, 850), "I8,1,850");
        assert_eq!(character_set_selection(8, CodePage::Windows1252, 1), "I8,A,1");
    }

    #[test]
    fn test_code_page_names() {
        assert_eq!("dos850".parse::<CodePage>().unwrap(), CodePage::Dos850);
        assert_eq!("Windows-1251".parse::<CodePage>().unwrap(), CodePage::Windows1251);
        assert_eq!(CodePage::Dos866.name(), "dos866");
        assert!("utf8".parse::<CodePage>().is_err());
        for page in CodePage::ALL {
            assert_eq!(page.name().parse::<CodePage>().unwrap(), page);
        }
    }
}
