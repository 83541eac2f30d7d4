//! # Barcode Hints
//!
//! The element tree has no barcode kind, so an `image` element can carry a
//! barcode payload in its custom attributes instead of pixels. Every
//! backend's image translator checks for a hint first.
//!
//! | Attribute | Meaning | Default |
//! |-----------|---------|---------|
//! | `data-barcode` | content to encode (non-empty turns the hint on) | - |
//! | `data-barcode-type` | symbology, see [`Symbology`] | `code128` |
//! | `data-barcode-narrow` | narrow bar width in dots | 2 |
//! | `data-barcode-wide` | wide bar width in dots | 6 |
//! | `data-barcode-readable` | `true` prints the human-readable line | `false` |
//!
//! The bar height is always the transformed height of the image box.

use std::str::FromStr;

use crate::document::Node;
use crate::error::{RenderError, Result};

pub const BARCODE_ATTRIBUTE: &str = "data-barcode";
pub const BARCODE_TYPE_ATTRIBUTE: &str = "data-barcode-type";
pub const BARCODE_NARROW_ATTRIBUTE: &str = "data-barcode-narrow";
pub const BARCODE_WIDE_ATTRIBUTE: &str = "data-barcode-wide";
pub const BARCODE_READABLE_ATTRIBUTE: &str = "data-barcode-readable";

pub const DEFAULT_NARROW_BAR: u32 = 2;
pub const DEFAULT_WIDE_BAR: u32 = 6;

/// Barcode symbologies every backend can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Symbology {
    /// Code 128 with automatic subset selection.
    #[default]
    Code128,
    Code128A,
    Code128B,
    Code128C,
    Interleaved2Of5,
    /// Interleaved 2 of 5 with a mod 10 check digit.
    Interleaved2Of5Mod10,
    Code39,
    /// Code 39 with a mod 43 check digit.
    Code39Check,
}

impl FromStr for Symbology {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "code128" => Ok(Symbology::Code128),
            "code128a" => Ok(Symbology::Code128A),
            "code128b" => Ok(Symbology::Code128B),
            "code128c" => Ok(Symbology::Code128C),
            "i2of5" => Ok(Symbology::Interleaved2Of5),
            "i2of5-mod10" => Ok(Symbology::Interleaved2Of5Mod10),
            "code39" => Ok(Symbology::Code39),
            "code39-check" => Ok(Symbology::Code39Check),
            other => Err(RenderError::InvalidArgument(format!("unknown barcode type '{}'", other))),
        }
    }
}

/// A barcode requested through an image element's attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeHint {
    pub content: String,
    pub symbology: Symbology,
    pub narrow: u32,
    pub wide: u32,
    pub readable: bool,
}

impl BarcodeHint {
    /// Read the hint from a node, `None` without a `data-barcode` value.
    pub fn from_node(node: &Node<'_>) -> Result<Option<Self>> {
        let Some(content) = node.attribute(BARCODE_ATTRIBUTE) else {
            return Ok(None);
        };

        let symbology = match node.attribute(BARCODE_TYPE_ATTRIBUTE) {
            Some(raw) => raw.parse()?,
            None => Symbology::default(),
        };
        let narrow = bar_width(node, BARCODE_NARROW_ATTRIBUTE, DEFAULT_NARROW_BAR)?;
        let wide = bar_width(node, BARCODE_WIDE_ATTRIBUTE, DEFAULT_WIDE_BAR)?;
        let readable = node
            .attribute(BARCODE_READABLE_ATTRIBUTE)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));

        Ok(Some(BarcodeHint {
            content: content.to_string(),
            symbology,
            narrow,
            wide,
            readable,
        }))
    }
}

fn bar_width(node: &Node<'_>, attribute: &str, default: u32) -> Result<u32> {
    match node.attribute(attribute) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            RenderError::InvalidArgument(format!("{} on '{}' must be a whole number, got '{}'", attribute, node.id(), raw))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ComputedStyle, Document, Element};

    fn hint(element: &Element) -> Result<Option<BarcodeHint>> {
        let doc = Document::default();
        BarcodeHint::from_node(&Node::new(element, None, &doc, ComputedStyle::default()))
    }

    #[test]
    fn test_plain_images_have_no_hint() {
        let image = Element::image(0.0, 0.0, 10.0, 10.0, None);
        assert_eq!(hint(&image).unwrap(), None);
        let image = image.with_attribute(BARCODE_ATTRIBUTE, "");
        assert_eq!(hint(&image).unwrap(), None);
    }

    #[test]
    fn test_defaults() {
        let image = Element::image(0.0, 0.0, 10.0, 10.0, None).with_attribute(BARCODE_ATTRIBUTE, "12345");
        assert_eq!(
            hint(&image).unwrap(),
            Some(BarcodeHint {
                content: "12345".into(),
                symbology: Symbology::Code128,
                narrow: 2,
                wide: 6,
                readable: false,
            })
        );
    }

    #[test]
    fn test_all_attributes() {
        let image = Element::image(0.0, 0.0, 10.0, 10.0, None)
            .with_attribute(BARCODE_ATTRIBUTE, "0042")
            .with_attribute(BARCODE_TYPE_ATTRIBUTE, "i2of5-mod10")
            .with_attribute(BARCODE_NARROW_ATTRIBUTE, "3")
            .with_attribute(BARCODE_WIDE_ATTRIBUTE, "9")
            .with_attribute(BARCODE_READABLE_ATTRIBUTE, "TRUE");
        let hint = hint(&image).unwrap().unwrap();
        assert_eq!(hint.symbology, Symbology::Interleaved2Of5Mod10);
        assert_eq!((hint.narrow, hint.wide, hint.readable), (3, 9, true));
    }

    #[test]
    fn test_invalid_attributes_are_errors() {
        let image = Element::image(0.0, 0.0, 10.0, 10.0, None)
            .with_attribute(BARCODE_ATTRIBUTE, "1")
            .with_attribute(BARCODE_TYPE_ATTRIBUTE, "qr");
        assert!(matches!(hint(&image), Err(RenderError::InvalidArgument(_))));

        let image = Element::image(0.0, 0.0, 10.0, 10.0, None)
            .with_attribute(BARCODE_ATTRIBUTE, "1")
            .with_attribute(BARCODE_NARROW_ATTRIBUTE, "wide");
        assert!(hint(&image).is_err());
    }
}
