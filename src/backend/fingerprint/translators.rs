//! FingerPrint element translators.
//!
//! Every object is a `PP`/`DIR`/`AN` preamble followed by the drawing
//! statement. Device y grows upwards, so the smaller y of a box is its
//! bottom edge.
//!
//! | Element | Statements |
//! |---------|------------|
//! | line | `PL` when axis-aligned; diagonals are rejected |
//! | rect | `PL` for visible fill, else `PX` for a stroke |
//! | text, tspan | `FT` + `PT`, `II` when white |
//! | path | `PL` per straight segment |
//! | image | barcode statements for hints, else `PM` of a stored PCX |

use super::commands::{self, Alignment, BarcodeType, Direction};
use crate::backend::barcode::{BarcodeHint, Symbology};
use crate::backend::image::{ImagePlacement, wants_direct_write};
use crate::config::ImageMode;
use crate::document::{ElementKind, FontStyle, LineShape, Node, PathSegment};
use crate::error::{RenderError, Result};
use crate::geometry::{DeviceBounds, Matrix, TextMetrics, Transformer};
use crate::raster::{self, pcx};
use crate::render::{LineEnding, RenderPass, Segment, Translator};

const BACKEND: &str = "FingerPrint";

pub const REGULAR_FONT: &str = "Swiss 721 BT";
pub const BOLD_FONT: &str = "Swiss 721 Bold BT";

/// Slant in degrees for italic text.
pub const ITALIC_SLANT: i32 = 20;

/// `PP x,y` / `DIR 1` / `AN 7` / `PL length,weight` for an axis-aligned run.
fn line_statements(bounds: &DeviceBounds) -> [Segment; 4] {
    let stroke_width = bounds.stroke_width as i32;
    let or_stroke = |length: i32| if length == 0 { stroke_width } else { length };
    [
        commands::position(bounds.start_x as i32, bounds.start_y as i32).into(),
        commands::direction(Direction::LeftToRight).into(),
        commands::align(Alignment::TopLeft).into(),
        commands::line(
            or_stroke((bounds.end_x - bounds.start_x) as i32),
            or_stroke((bounds.end_y - bounds.start_y) as i32),
        )
        .into(),
    ]
}

// ============================================================================
// LINE
// ============================================================================

pub struct LineTranslator {
    transformer: Transformer,
}

impl LineTranslator {
    pub fn new(transformer: Transformer) -> Self {
        Self { transformer }
    }
}

impl Translator for LineTranslator {
    fn translate(&self, node: &Node<'_>, source: &Matrix, view: &Matrix, pass: &mut RenderPass<'_>) -> Result<()> {
        let ElementKind::Line(line) = node.kind() else {
            return Ok(());
        };
        let bounds = self.transformer.line(line, node.style.stroke_width, source, view);
        let length = (bounds.end_x - bounds.start_x) as i32;
        let weight = (bounds.end_y - bounds.start_y) as i32;
        if bounds.is_diagonal() || (length != 0 && weight != 0) {
            return Err(RenderError::diagonal(
                BACKEND,
                "line",
                (bounds.start_x, bounds.start_y),
                (bounds.end_x, bounds.end_y),
            ));
        }
        pass.container.body.extend(line_statements(&bounds));
        Ok(())
    }
}

// ============================================================================
// RECT
// ============================================================================

pub struct RectTranslator {
    transformer: Transformer,
}

impl RectTranslator {
    pub fn new(transformer: Transformer) -> Self {
        Self { transformer }
    }
}

impl Translator for RectTranslator {
    fn translate(&self, node: &Node<'_>, source: &Matrix, view: &Matrix, pass: &mut RenderPass<'_>) -> Result<()> {
        let ElementKind::Rect(rect) = node.kind() else {
            return Ok(());
        };
        let filled = node.style.fill.is_visible_ink();
        if !filled && node.style.stroke.is_none() {
            return Ok(());
        }

        let bounds = self.transformer.rect(rect, node.style.stroke_width, source, view);
        let x = bounds.start_x as i32;
        let y = bounds.start_y as i32;
        let width = bounds.end_x as i32 - x;
        let height = bounds.end_y as i32 - y;

        let body = &mut pass.container.body;
        body.push(commands::position(x, y).into());
        body.push(commands::direction(Direction::LeftToRight).into());
        body.push(commands::align(Alignment::TopLeft).into());
        // a visible fill wins; the outline is only drawn for unfilled boxes
        if filled {
            body.push(commands::line(width, height).into());
        } else {
            body.push(commands::rect_box(width, height, bounds.stroke_width as i32).into());
        }
        Ok(())
    }
}

// ============================================================================
// TEXT
// ============================================================================

pub struct TextTranslator {
    transformer: Transformer,
    bold_weight_threshold: u16,
}

impl TextTranslator {
    pub fn new(transformer: Transformer, bold_weight_threshold: u16) -> Self {
        Self {
            transformer,
            bold_weight_threshold,
        }
    }
}

/// FingerPrint strings are double-quoted and have no escape.
fn sanitize(text: &str) -> String {
    text.replace('"', "'")
}

impl Translator for TextTranslator {
    fn translate(&self, node: &Node<'_>, source: &Matrix, view: &Matrix, pass: &mut RenderPass<'_>) -> Result<()> {
        let Some(content) = node.text() else {
            return Ok(());
        };
        let text = sanitize(content.text.as_deref().unwrap_or_default());
        if text.trim().is_empty() {
            return Ok(());
        }

        let style = &node.style;
        let direction = Direction::from_sector(self.transformer.rotation_sector(source, view));
        let (mut x, y) = content.anchor();
        if direction.is_odd() {
            x -= TextMetrics::anchor_offset(style.font_size, node.line_height_factor());
        }
        let (x, y) = self.transformer.transform_point(x, y, source, view);

        let font_name = if style.font_weight > self.bold_weight_threshold {
            BOLD_FONT
        } else {
            REGULAR_FONT
        };
        let slant = match style.font_style {
            FontStyle::Italic => ITALIC_SLANT,
            FontStyle::Normal | FontStyle::Oblique => 0,
        };

        let body = &mut pass.container.body;
        body.push(commands::position(x as i32, y as i32).into());
        body.push(commands::direction(direction).into());
        body.push(commands::align(Alignment::BaselineLeft).into());
        body.push(
            if style.fill.is_white() {
                commands::invert_image()
            } else {
                commands::normal_image()
            }
            .into(),
        );
        // character height is given in the document's own units
        body.push(commands::font(font_name, style.font_size as i32, slant).into());
        body.push(commands::print_text(&text).into());
        Ok(())
    }
}

// ============================================================================
// PATH
// ============================================================================

/// Straight path segments only; curves and arcs are skipped.
pub struct PathTranslator {
    transformer: Transformer,
}

impl PathTranslator {
    pub fn new(transformer: Transformer) -> Self {
        Self { transformer }
    }
}

impl Translator for PathTranslator {
    fn translate(&self, node: &Node<'_>, source: &Matrix, view: &Matrix, pass: &mut RenderPass<'_>) -> Result<()> {
        let ElementKind::Path(path) = node.kind() else {
            return Ok(());
        };
        for segment in &path.segments {
            let PathSegment::Line { start, end } = *segment else {
                continue;
            };
            let line = LineShape {
                x1: start.0,
                y1: start.1,
                x2: end.0,
                y2: end.1,
            };
            let bounds = self.transformer.line(&line, node.style.stroke_width, source, view);
            pass.container.body.extend(line_statements(&bounds));
        }
        Ok(())
    }
}

// ============================================================================
// IMAGE
// ============================================================================

pub struct ImageTranslator {
    transformer: Transformer,
    mode: ImageMode,
    dpi: u16,
    line_ending: LineEnding,
}

impl ImageTranslator {
    pub fn new(transformer: Transformer, mode: ImageMode, dpi: u16, line_ending: LineEnding) -> Self {
        Self {
            transformer,
            mode,
            dpi,
            line_ending,
        }
    }

    fn barcode_type(symbology: Symbology) -> BarcodeType {
        match symbology {
            Symbology::Code128 => BarcodeType::Code128,
            Symbology::Code128A => BarcodeType::Code128A,
            Symbology::Code128B => BarcodeType::Code128B,
            Symbology::Code128C => BarcodeType::Code128C,
            // the check digit variant has no type of its own
            Symbology::Interleaved2Of5 | Symbology::Interleaved2Of5Mod10 => BarcodeType::Interleaved2Of5,
            Symbology::Code39 => BarcodeType::Code39,
            Symbology::Code39Check => BarcodeType::Code39WithChecksum,
        }
    }

    fn barcode(hint: &BarcodeHint, placement: &ImagePlacement) -> Vec<String> {
        vec![
            commands::position(placement.horizontal_start, placement.vertical_start),
            commands::direction(Direction::from_sector(placement.sector)),
            commands::align(Alignment::BottomLeft),
            commands::barcode_type(Self::barcode_type(hint.symbology)),
            commands::barcode_magnify(hint.narrow),
            commands::barcode_height(placement.device.alignment_height as i32),
            commands::print_barcode(&hint.content),
        ]
    }
}

impl Translator for ImageTranslator {
    fn translate(&self, node: &Node<'_>, source: &Matrix, view: &Matrix, pass: &mut RenderPass<'_>) -> Result<()> {
        let ElementKind::Image(image) = node.kind() else {
            return Ok(());
        };
        let mut placement = ImagePlacement::new(
            self.transformer.image(image, source, view),
            self.transformer.rotation_sector(source, view),
        );
        if placement.sector.is_odd() {
            placement.horizontal_start += placement.device.alignment_height as i32;
        }

        if let Some(hint) = BarcodeHint::from_node(node)? {
            pass.container
                .body
                .extend(Self::barcode(&hint, &placement).into_iter().map(Into::into));
            return Ok(());
        }

        if wants_direct_write(node, self.mode) {
            return Err(RenderError::Unsupported {
                backend: BACKEND,
                operation: "direct raster write",
            });
        }

        let dpi = self.dpi;
        let skip = self.line_ending.char_count() - 1;
        let stored = placement.resolve_stored(node, image, pass, |name, pixels| {
            let pcx = raster::strip_extended_palette(pcx::encode(&pixels, dpi));
            vec![
                commands::remove_image(name).into(),
                commands::image_load(skip, name, pcx.len()).into(),
                Segment::Binary(pcx),
            ]
        })?;
        let Some(name) = stored else {
            return Ok(());
        };

        let direction = if placement.sector.is_odd() {
            Direction::RightToLeft
        } else {
            Direction::BottomToTop
        };
        let body = &mut pass.container.body;
        body.push(commands::position(placement.horizontal_start, placement.vertical_start).into());
        body.push(commands::direction(direction).into());
        body.push(commands::align(Alignment::TopLeft).into());
        body.push(commands::normal_image().into());
        body.push(commands::print_image(&name).into());
        Ok(())
    }
}
