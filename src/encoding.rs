//! # Text Encoding
//!
//! Converts Unicode strings into the byte encoding a printer was told to
//! expect (EPL `I` command, ZPL `^CI`, FingerPrint `NASC`).
//!
//! | Family | Examples | Encoder |
//! |--------|----------|---------|
//! | DOS (OEM) | 737, 850, 852, 866 | `oem_cp` tables |
//! | Windows | 1250 - 1257 | `encoding_rs` |
//! | Unicode | UTF-8, UTF-16 BE/LE | std |
//!
//! ASCII (U+0000-U+007F) passes through unchanged for the single-byte
//! families. Characters a code page cannot represent are replaced with `?`
//! and logged.

use encoding_rs::Encoding;
use oem_cp::code_table::ENCODING_TABLE_CP_MAP;
use std::fmt;

/// Byte encoding of the text segments of a command stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// UTF-16 big endian, no byte order mark.
    Utf16Be,
    /// UTF-16 little endian, no byte order mark.
    Utf16Le,
    /// IBM/DOS OEM code page, e.g. `Dos(850)`.
    Dos(u16),
    /// Windows ANSI code page, e.g. `Windows(1252)`.
    Windows(u16),
}

impl TextEncoding {
    /// Encode `s`, replacing unmappable characters with `?`.
    pub fn encode(&self, s: &str) -> Vec<u8> {
        match *self {
            TextEncoding::Utf8 => s.as_bytes().to_vec(),
            TextEncoding::Utf16Be => s.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            TextEncoding::Utf16Le => s.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            TextEncoding::Dos(page) => encode_dos(s, page),
            TextEncoding::Windows(page) => encode_windows(s, page),
        }
    }

    /// Lowercase name used in configuration files: `dos850`, `windows1252`, `utf8`.
    pub fn config_name(&self) -> String {
        match self {
            TextEncoding::Utf8 => "utf8".to_string(),
            TextEncoding::Utf16Be => "utf16be".to_string(),
            TextEncoding::Utf16Le => "utf16le".to_string(),
            TextEncoding::Dos(page) => format!("dos{}", page),
            TextEncoding::Windows(page) => format!("windows{}", page),
        }
    }
}

/// Fold a user-supplied code page name for comparison with
/// [`TextEncoding::config_name`]: `"Windows-1252"` becomes `"windows1252"`.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(['-', '_', ' '], "")
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "UTF-8"),
            TextEncoding::Utf16Be => write!(f, "UTF-16BE"),
            TextEncoding::Utf16Le => write!(f, "UTF-16LE"),
            TextEncoding::Dos(page) => write!(f, "CP{}", page),
            TextEncoding::Windows(page) => write!(f, "windows-{}", page),
        }
    }
}

fn unmapped(ch: char, encoding: TextEncoding) -> u8 {
    log::warn!(
        "{}: unmapped character '{}' (U+{:04X}), replacing with '?'",
        encoding,
        ch,
        ch as u32
    );
    b'?'
}

fn encode_dos(s: &str, page: u16) -> Vec<u8> {
    let table = ENCODING_TABLE_CP_MAP.get(&page);
    if table.is_none() {
        log::warn!("no table for code page {}, only ASCII will be encoded", page);
    }

    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        if ch.is_ascii() {
            out.push(ch as u8);
        } else if let Some(byte) = table.and_then(|t| t.get(&ch)) {
            out.push(*byte);
        } else {
            out.push(unmapped(ch, TextEncoding::Dos(page)));
        }
    }
    out
}

fn windows_encoding(page: u16) -> Option<&'static Encoding> {
    let encoding = match page {
        874 => encoding_rs::WINDOWS_874,
        1250 => encoding_rs::WINDOWS_1250,
        1251 => encoding_rs::WINDOWS_1251,
        1252 => encoding_rs::WINDOWS_1252,
        1253 => encoding_rs::WINDOWS_1253,
        1254 => encoding_rs::WINDOWS_1254,
        1255 => encoding_rs::WINDOWS_1255,
        1256 => encoding_rs::WINDOWS_1256,
        1257 => encoding_rs::WINDOWS_1257,
        1258 => encoding_rs::WINDOWS_1258,
        _ => return None,
    };
    Some(encoding)
}

fn encode_windows(s: &str, page: u16) -> Vec<u8> {
    let encoding = windows_encoding(page);
    if encoding.is_none() {
        log::warn!("unknown windows code page {}, only ASCII will be encoded", page);
    }

    let mut out = Vec::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for ch in s.chars() {
        if ch.is_ascii() {
            out.push(ch as u8);
            continue;
        }
        match encoding {
            Some(encoding) => {
                // encoding_rs substitutes HTML entities for unmappable input
                let (bytes, _, had_errors) = encoding.encode(ch.encode_utf8(&mut buf));
                if had_errors {
                    out.push(unmapped(ch, TextEncoding::Windows(page)));
                } else {
                    out.extend_from_slice(&bytes);
                }
            }
            None => out.push(unmapped(ch, TextEncoding::Windows(page))),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        for encoding in [TextEncoding::Dos(850), TextEncoding::Windows(1252), TextEncoding::Utf8] {
            assert_eq!(encoding.encode("N\r\nP1"), b"N\r\nP1".to_vec());
        }
    }

    #[test]
    fn test_dos_850() {
        // é = 0x82, ü = 0x81, ß = 0xE1 in CP850
        assert_eq!(TextEncoding::Dos(850).encode("éüß"), vec![0x82, 0x81, 0xE1]);
    }

    #[test]
    fn test_dos_866_cyrillic() {
        // А = 0x80 in CP866
        assert_eq!(TextEncoding::Dos(866).encode("А"), vec![0x80]);
    }

    #[test]
    fn test_windows_1252() {
        assert_eq!(TextEncoding::Windows(1252).encode("é€"), vec![0xE9, 0x80]);
    }

    #[test]
    fn test_windows_1251() {
        assert_eq!(TextEncoding::Windows(1251).encode("Ж"), vec![0xC6]);
    }

    #[test]
    fn test_unmapped_becomes_question_mark() {
        assert_eq!(TextEncoding::Dos(850).encode("a☃b"), b"a?b".to_vec());
        assert_eq!(TextEncoding::Windows(1252).encode("a☃b"), b"a?b".to_vec());
    }

    #[test]
    fn test_utf16_without_bom() {
        assert_eq!(TextEncoding::Utf16Be.encode("Aé"), vec![0x00, 0x41, 0x00, 0xE9]);
        assert_eq!(TextEncoding::Utf16Le.encode("Aé"), vec![0x41, 0x00, 0xE9, 0x00]);
    }

    #[test]
    fn test_utf8() {
        assert_eq!(TextEncoding::Utf8.encode("é"), vec![0xC3, 0xA9]);
    }

    #[test]
    fn test_display() {
        assert_eq!(TextEncoding::Dos(850).to_string(), "CP850");
        assert_eq!(TextEncoding::Windows(1250).to_string(), "windows-1250");
    }

    #[test]
    fn test_config_names() {
        assert_eq!(TextEncoding::Dos(850).config_name(), "dos850");
        assert_eq!(TextEncoding::Utf16Le.config_name(), "utf16le");
        assert_eq!(normalize_name(" Windows-1252 "), "windows1252");
        assert_eq!(normalize_name("UTF_8"), "utf8");
    }
}
