//! # Output Container
//!
//! A render pass appends command segments to three independent buffers:
//!
//! | Section | Content |
//! |---------|---------|
//! | Header | setup directives and one-time resource uploads |
//! | Body | per-node drawing commands |
//! | Footer | print and feed directives |
//!
//! Translators may add to the header while the body is being produced (an
//! image is uploaded the first time it is drawn). Serialization order is
//! fixed regardless: header, then body, then footer.
//!
//! ## Wire Format
//!
//! ```text
//! Text("N")          ->  encode("N") + line ending
//! Binary([0x0A ..])  ->  0A .. + line ending
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

use crate::encoding::TextEncoding;

/// Line terminator written after every segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Crlf,
    Lf,
}

impl Default for LineEnding {
    /// The platform terminator.
    fn default() -> Self {
        if cfg!(windows) { LineEnding::Crlf } else { LineEnding::Lf }
    }
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }

    /// Number of characters in the terminator.
    pub fn char_count(self) -> usize {
        self.as_str().len()
    }
}

/// One atomic emitted unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Binary(Vec<u8>),
}

impl Segment {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Segment::Text(text) => Some(text),
            Segment::Binary(_) => None,
        }
    }
}

impl From<String> for Segment {
    fn from(text: String) -> Self {
        Segment::Text(text)
    }
}

impl From<&str> for Segment {
    fn from(text: &str) -> Self {
        Segment::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Segment {
    fn from(bytes: Vec<u8>) -> Self {
        Segment::Binary(bytes)
    }
}

/// Header, body and footer of one command stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    pub header: Vec<Segment>,
    pub body: Vec<Segment>,
    pub footer: Vec<Segment>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// All segments in serialization order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.header.iter().chain(&self.body).chain(&self.footer)
    }

    /// Serialize to the byte stream sent to the printer.
    pub fn write_to<W: Write>(&self, out: &mut W, encoding: TextEncoding, line_ending: LineEnding) -> io::Result<()> {
        let terminator = encoding.encode(line_ending.as_str());
        for segment in self.segments() {
            match segment {
                Segment::Text(text) => out.write_all(&encoding.encode(text))?,
                Segment::Binary(bytes) => out.write_all(bytes)?,
            }
            out.write_all(&terminator)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self, encoding: TextEncoding, line_ending: LineEnding) -> Vec<u8> {
        let mut out = Vec::new();
        // Vec<u8> as Write never fails
        let _ = self.write_to(&mut out, encoding, line_ending);
        out
    }
}

/// The text segments only, one per line. Binary blocks are left out.
impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for text in self.segments().filter_map(Segment::as_text) {
            writeln!(f, "{}", text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialization_order_is_fixed() {
        let mut c = Container::new();
        c.body.push("BODY".into());
        c.footer.push("FOOT".into());
        c.header.push("HEAD".into());
        c.body.push(vec![0x01, 0x02].into());
        assert_eq!(
            c.to_bytes(TextEncoding::Utf8, LineEnding::Crlf),
            b"HEAD\r\nBODY\r\n\x01\x02\r\nFOOT\r\n".to_vec()
        );
    }

    #[test]
    fn test_empty_text_is_a_bare_line_ending() {
        let mut c = Container::new();
        c.body.push("".into());
        c.body.push("N".into());
        assert_eq!(c.to_bytes(TextEncoding::Utf8, LineEnding::Lf), b"\nN\n".to_vec());
    }

    #[test]
    fn test_text_uses_encoding() {
        let mut c = Container::new();
        c.body.push("é".into());
        assert_eq!(c.to_bytes(TextEncoding::Dos(850), LineEnding::Lf), vec![0x82, b'\n']);
    }

    #[test]
    fn test_line_ending_follows_encoding() {
        let mut c = Container::new();
        c.body.push("A".into());
        assert_eq!(
            c.to_bytes(TextEncoding::Utf16Le, LineEnding::Lf),
            vec![b'A', 0x00, b'\n', 0x00]
        );
    }

    #[test]
    fn test_display_skips_binary() {
        let mut c = Container::new();
        c.header.push("GK\"X\"".into());
        c.header.push(vec![0xFF].into());
        c.body.push("GG1,2,\"X\"".into());
        assert_eq!(c.to_string(), "GK\"X\"\nGG1,2,\"X\"\n");
    }

    #[test]
    fn test_line_ending_lengths() {
        assert_eq!(LineEnding::Crlf.char_count(), 2);
        assert_eq!(LineEnding::Lf.char_count(), 1);
    }
}
