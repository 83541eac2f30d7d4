//! # FingerPrint Backend
//!
//! Honeywell (Intermec) FingerPrint, the BASIC-like command language of the
//! PM and PC series.
//!
//! ## Stream Layout
//!
//! ```text
//! IMMEDIATE ON               execute statements as they arrive
//! NASC {n}                   character set
//! [uploads]                  REMOVE IMAGE / IMAGE LOAD + PCX bytes
//! VERBOFF
//! ...                        PP / DIR / AN + statement per element
//! INPUT OFF
//! PF {copies}                print and feed
//!                            (empty line)
//! ```
//!
//! ## Geometry
//!
//! Origin bottom-left, y up: the view flips the document's y axis and
//! shifts it by the output height. Rectangles grow outwards by half the
//! stroke width. Stored images are named with a `.PCX` suffix.

pub mod commands;
pub mod translators;

use self::commands::CharacterSet;
use self::translators::{ImageTranslator, LineTranslator, PathTranslator, RectTranslator, TextTranslator};
use super::{Frame, Renderer};
use crate::config::{Backend, RenderConfig};
use crate::document::ElementTag;
use crate::error::Result;
use crate::geometry::{Transformer, ViewProfile};
use crate::render::TranslatorTable;

/// Share of the stroke width a rectangle grows by on each side.
pub const RECT_OUTSET: f32 = 0.5;

/// Suffix of stored image names.
pub const IMAGE_SUFFIX: &str = ".PCX";

/// Session lines of a FingerPrint job.
pub fn frame(character_set: CharacterSet, copies: u32) -> Frame {
    Frame {
        header: vec![commands::immediate_on(), commands::select_character_set(character_set)],
        header_after_walk: false,
        body_prefix: vec![commands::verb_off()],
        body_suffix: vec![commands::input_off()],
        footer: vec![commands::print_feed(copies), String::new()],
    }
}

/// Build the FingerPrint renderer for `config`.
pub fn renderer(config: &RenderConfig) -> Result<Renderer> {
    let character_set = match config.code_page.as_deref() {
        Some(name) => name.parse()?,
        None => CharacterSet::default(),
    };
    let transformer = Transformer::new(
        ViewProfile::BOTTOM_LEFT,
        RECT_OUTSET,
        config.output_width,
        config.output_height,
    );
    let dpi = config.destination_dpi.round() as u16;

    let mut translators = TranslatorTable::new();
    translators
        .register(ElementTag::Line, LineTranslator::new(transformer))
        .register(ElementTag::Rect, RectTranslator::new(transformer))
        .register(ElementTag::Text, TextTranslator::new(transformer, config.bold_weight_threshold))
        .register(ElementTag::TextSpan, TextTranslator::new(transformer, config.bold_weight_threshold))
        .register(ElementTag::Path, PathTranslator::new(transformer))
        .register(
            ElementTag::Image,
            ImageTranslator::new(transformer, config.image_mode, dpi, config.line_ending),
        );

    log::debug!(
        "FingerPrint renderer: character set {} (NASC {}), bold above weight {}",
        character_set.name(),
        character_set.code(),
        config.bold_weight_threshold
    );

    Ok(Renderer {
        backend: Backend::FingerPrint,
        transformer,
        translators,
        frame: frame(character_set, config.copies),
        encoding: character_set.encoding(),
        line_ending: config.line_ending,
        image_suffix: IMAGE_SUFFIX,
        magnification: config.magnification(),
        rotation: config.rotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Element, ImageRef, Paint};
    use crate::encoding::TextEncoding;
    use crate::geometry::RotationSector;
    use crate::raster::EmbeddedImageSource;
    use crate::render::{LineEnding, Segment};
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;

    fn config() -> RenderConfig {
        RenderConfig {
            line_ending: LineEnding::Lf,
            ..RenderConfig::new(Backend::FingerPrint)
        }
    }

    #[test]
    fn test_empty_job() {
        let container = renderer(&config())
            .unwrap()
            .translate(&Document::default(), &EmbeddedImageSource::new())
            .unwrap();
        assert_eq!(container.to_string(), "IMMEDIATE ON\nNASC 8\nVERBOFF\nINPUT OFF\nPF 1\n\n");
    }

    #[test]
    fn test_uploads_follow_header_lines() {
        let source = |_: &ImageRef, w: u32, h: u32, _: RotationSector| Some(RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255])));
        let doc = Document::new("doc", vec![Element::image(0.0, 0.0, 8.0, 8.0, None).with_id("i")]);
        let container = renderer(&config()).unwrap().translate(&doc, &source).unwrap();

        assert_eq!(container.header[0], Segment::from("IMMEDIATE ON"));
        assert_eq!(container.header[1], Segment::from("NASC 8"));
        let Some(Segment::Text(load)) = container.header.get(3) else {
            panic!("expected IMAGE LOAD, got {:?}", container.header);
        };
        // LF endings leave nothing to skip
        assert!(load.starts_with("IMAGE LOAD 0,\""));
        assert!(matches!(container.header[4], Segment::Binary(_)));
        assert_eq!(container.body.last(), Some(&Segment::from("INPUT OFF")));
    }

    #[test]
    fn test_character_set_and_copies() {
        let config = RenderConfig {
            code_page: Some("dos852".into()),
            copies: 4,
            ..config()
        };
        let renderer = renderer(&config).unwrap();
        assert_eq!(renderer.encoding(), TextEncoding::Dos(852));
        assert_eq!(renderer.frame.header[1], "NASC 852");
        assert_eq!(renderer.frame.footer[0], "PF 4");
    }

    #[test]
    fn test_view_flips_y() {
        let doc = Document::new("doc", vec![Element::line(0.0, 0.0, 48.0, 0.0).with_stroke(Paint::BLACK, 1.0)]);
        let container = renderer(&config())
            .unwrap()
            .translate(&doc, &EmbeddedImageSource::new())
            .unwrap();
        // the document's top edge is the top of the 1296 dot canvas
        assert_eq!(container.body[1], Segment::from("PP 0,1296"));
    }
}
