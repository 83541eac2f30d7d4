//! # Label Document Model
//!
//! A read-only element tree (groups, lines, rectangles, text, paths, images)
//! that is both the Rust API and the JSON input format.
//!
//! ```
//! use labelrender::document::{Document, Element, Paint};
//!
//! let doc = Document::new("label-1", vec![
//!     Element::rect(10.0, 10.0, 40.0, 20.0).with_stroke(Paint::BLACK, 2.0),
//!     Element::text(12.0, 40.0, "Hello").with_font_size(24.0),
//! ]);
//!
//! let json = serde_json::to_string(&doc).unwrap();
//! let back: Document = serde_json::from_str(&json).unwrap();
//! assert_eq!(doc, back);
//! ```
//!
//! While walking the tree the renderer hands translators a [`Node`]: the
//! element plus the context a translator may need (parent element, owning
//! document, inherited style).

pub mod types;

pub use types::*;

/// Custom attribute holding a line-spacing override (`"150%"` or `"1.5"`).
pub const LINE_SPACING_ATTRIBUTE: &str = "linespacing";

/// Custom attribute holding a line-height override; wins over `linespacing`.
pub const LINE_HEIGHT_ATTRIBUTE: &str = "line-height";

/// An element visited during a render pass, together with its context.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    pub element: &'a Element,
    pub parent: Option<&'a Element>,
    pub document: &'a Document,
    pub style: ComputedStyle,
}

impl<'a> Node<'a> {
    pub fn new(
        element: &'a Element,
        parent: Option<&'a Element>,
        document: &'a Document,
        style: ComputedStyle,
    ) -> Self {
        Self {
            element,
            parent,
            document,
            style,
        }
    }

    #[inline]
    pub fn kind(&self) -> &'a ElementKind {
        &self.element.kind
    }

    #[inline]
    pub fn id(&self) -> &'a str {
        &self.element.id
    }

    /// Non-empty custom attribute of the element itself.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.element.attribute(name)
    }

    /// Text content of a `text` or `tspan` node.
    pub fn text(&self) -> Option<&'a TextContent> {
        match &self.element.kind {
            ElementKind::Text(content) | ElementKind::TextSpan(content) => Some(content),
            _ => None,
        }
    }

    /// Line-height factor applied to text anchors.
    ///
    /// Read from the text element itself, or from the parent when the node
    /// is a span inside a text element. `line-height` overrides
    /// `linespacing`; without either the factor is `1.0`.
    pub fn line_height_factor(&self) -> f32 {
        let text = match (&self.element.kind, self.parent) {
            (ElementKind::Text(_), _) => self.element,
            (_, Some(parent)) if matches!(parent.kind, ElementKind::Text(_)) => parent,
            _ => return 1.0,
        };

        let mut factor = 1.0;
        for name in [LINE_SPACING_ATTRIBUTE, LINE_HEIGHT_ATTRIBUTE] {
            if let Some(raw) = text.attribute(name) {
                match parse_percentage(raw) {
                    Some(value) => factor = value,
                    None => log::warn!("ignoring unparsable {} '{}' on '{}'", name, raw, text.id),
                }
            }
        }
        factor
    }
}

/// Parse `"150%"` as `1.5` and `"1.5"` as `1.5`.
///
/// Trailing whitespace is ignored. Returns `None` for anything else.
pub fn parse_percentage(raw: &str) -> Option<f32> {
    let s = raw.trim_end_matches([' ', '\t', '\r', '\n']);
    match s.strip_suffix('%') {
        Some(number) => number.trim().parse::<f32>().ok().map(|v| v / 100.0),
        None => s.trim().parse::<f32>().ok(),
    }
}
