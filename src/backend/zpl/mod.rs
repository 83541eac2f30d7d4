//! # ZPL Backend
//!
//! Zebra Programming Language II, for the Zebra industrial and desktop
//! lines.
//!
//! ## Stream Layout
//!
//! ```text
//! [uploads]      ~DGR:... one line per stored image, before the format
//! ^XA            start of label format
//! ^CI{n}         character set
//! ^LH18,8        label home
//! ^PON           print orientation normal
//! ...            ^FT + field command per element
//! ^XZ            end of label format
//! ```
//!
//! ## Geometry
//!
//! Origin top-left, y down. Rectangles grow outwards by half the stroke
//! width on every side.

pub mod commands;
pub mod translators;

use self::commands::{CharacterSet, PrintOrientation};
use self::translators::{ImageTranslator, LineTranslator, PathTranslator, RectTranslator, TextTranslator};
use super::{Frame, Renderer};
use crate::config::{Backend, RenderConfig};
use crate::document::ElementTag;
use crate::error::Result;
use crate::geometry::{Transformer, ViewProfile};
use crate::render::TranslatorTable;

/// Share of the stroke width a rectangle grows by on each side.
pub const RECT_OUTSET: f32 = 0.5;

/// Label home offset in dots.
pub const LABEL_HOME: (i32, i32) = (18, 8);

/// Format lines of a ZPL label.
pub fn frame(character_set: CharacterSet) -> Frame {
    Frame {
        header: Vec::new(),
        header_after_walk: false,
        body_prefix: vec![
            commands::start_format(),
            commands::change_international_font(character_set),
            commands::label_home(LABEL_HOME.0, LABEL_HOME.1),
            commands::print_orientation(PrintOrientation::Normal),
        ],
        body_suffix: Vec::new(),
        footer: vec![commands::end_format()],
    }
}

/// Build the ZPL renderer for `config`.
pub fn renderer(config: &RenderConfig) -> Result<Renderer> {
    let character_set = match config.code_page.as_deref() {
        Some(name) => name.parse()?,
        None => CharacterSet::default(),
    };
    let transformer = Transformer::new(
        ViewProfile::TOP_LEFT,
        RECT_OUTSET,
        config.output_width,
        config.output_height,
    );

    let mut translators = TranslatorTable::new();
    translators
        .register(ElementTag::Line, LineTranslator::new(transformer))
        .register(ElementTag::Rect, RectTranslator::new(transformer))
        .register(ElementTag::Text, TextTranslator::new(transformer))
        .register(ElementTag::TextSpan, TextTranslator::new(transformer))
        .register(ElementTag::Path, PathTranslator::new(transformer))
        .register(ElementTag::Image, ImageTranslator::new(transformer, config.image_mode));

    log::debug!("ZPL renderer: character set {} (^CI{})", character_set.name(), character_set.code());

    Ok(Renderer {
        backend: Backend::Zpl,
        transformer,
        translators,
        frame: frame(character_set),
        encoding: character_set.encoding(),
        line_ending: config.line_ending,
        image_suffix: "",
        magnification: config.magnification(),
        rotation: config.rotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Element, Paint};
    use crate::encoding::TextEncoding;
    use crate::raster::EmbeddedImageSource;
    use crate::render::LineEnding;
    use pretty_assertions::assert_eq;

    fn config() -> RenderConfig {
        RenderConfig {
            line_ending: LineEnding::Lf,
            ..RenderConfig::new(Backend::Zpl)
        }
    }

    #[test]
    fn test_empty_label() {
        let container = renderer(&config())
            .unwrap()
            .translate(&Document::default(), &EmbeddedImageSource::new())
            .unwrap();
        assert_eq!(container.to_string(), "^XA\n^CI28\n^LH18,8\n^PON\n^XZ\n");
    }

    #[test]
    fn test_frame_wraps_body() {
        let doc = Document::new(
            "doc",
            vec![Element::line(0.0, 10.0, 48.0, 10.0).with_stroke(Paint::BLACK, 1.0)],
        );
        let container = renderer(&config())
            .unwrap()
            .translate(&doc, &EmbeddedImageSource::new())
            .unwrap();
        // 96 -> 203 dpi
        assert_eq!(
            container.to_string(),
            "^XA\n^CI28\n^LH18,8\n^PON\n^FT0,21\n^GB101,0,2,B^FS\n^XZ\n"
        );
    }

    #[test]
    fn test_character_set_selection() {
        let config = RenderConfig {
            code_page: Some("windows-1250".into()),
            ..config()
        };
        let renderer = renderer(&config).unwrap();
        assert_eq!(renderer.encoding(), TextEncoding::Windows(1250));
        assert_eq!(renderer.frame.body_prefix[1], "^CI31");
    }
}
