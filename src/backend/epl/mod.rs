//! # EPL Backend
//!
//! Eltron Programming Language (EPL2), as spoken by Zebra desktop printers
//! such as the LP 2844.
//!
//! ## Stream Layout
//!
//! ```text
//! [uploads]                 GK/GK/GM + PCX bytes, one set per stored image
//! R0,0                      reference point
//! ZT                        print from the top
//! I8,{page},{country}       character set
//!                           (empty line)
//! N                         clear image buffer
//! ...                       one or more commands per element
//! P{copies}                 print
//!                           (empty line)
//! ```
//!
//! The setup lines go into the header after the walk, so uploads made
//! while translating come first.
//!
//! ## Geometry
//!
//! Origin top-left, y down. Rectangles grow outwards by a quarter of the
//! stroke width on every side.

pub mod commands;
pub mod translators;

use self::commands::{CodePage, PrintOrientation};
use self::translators::{ImageTranslator, LineTranslator, PathTranslator, RectTranslator, TextTranslator};
use super::{Frame, Renderer};
use crate::config::{Backend, RenderConfig};
use crate::document::ElementTag;
use crate::error::Result;
use crate::geometry::{Transformer, ViewProfile};
use crate::render::{FontTable, TranslatorTable};

/// Share of the stroke width a rectangle grows by on each side.
pub const RECT_OUTSET: f32 = 0.25;

/// Data width of the `I` command.
const CHARACTER_BITS: u8 = 8;

/// Setup and trailer lines of an EPL label.
pub fn frame(code_page: CodePage, country_code: u16, copies: u32) -> Frame {
    Frame {
        header: vec![
            commands::set_reference_point(0, 0),
            commands::print_direction(PrintOrientation::Top),
            commands::character_set_selection(CHARACTER_BITS, code_page, country_code),
        ],
        header_after_walk: true,
        body_prefix: vec![String::new(), commands::clear_image_buffer()],
        body_suffix: Vec::new(),
        footer: vec![commands::print(copies), String::new()],
    }
}

/// Build the EPL renderer for `config`.
pub fn renderer(config: &RenderConfig) -> Result<Renderer> {
    let code_page = match config.code_page.as_deref() {
        Some(name) => name.parse()?,
        None => CodePage::default(),
    };
    let transformer = Transformer::new(
        ViewProfile::TOP_LEFT,
        RECT_OUTSET,
        config.output_width,
        config.output_height,
    );
    let fonts = FontTable::EPL.with_max_upper_overlap(config.max_upper_font_overlap);
    let dpi = config.destination_dpi.round() as u16;

    let mut translators = TranslatorTable::new();
    translators
        .register(ElementTag::Line, LineTranslator::new(transformer))
        .register(ElementTag::Rect, RectTranslator::new(transformer))
        .register(ElementTag::Text, TextTranslator::new(transformer, fonts))
        .register(ElementTag::TextSpan, TextTranslator::new(transformer, fonts))
        .register(ElementTag::Path, PathTranslator::new(transformer))
        .register(ElementTag::Image, ImageTranslator::new(transformer, config.image_mode, dpi));

    log::debug!("EPL renderer: code page {}, country {}", code_page.name(), config.country_code);

    Ok(Renderer {
        backend: Backend::Epl,
        transformer,
        translators,
        frame: frame(code_page, config.country_code, config.copies),
        encoding: code_page.encoding(),
        line_ending: config.line_ending,
        image_suffix: "",
        magnification: config.magnification(),
        rotation: config.rotation,
    })
}
