//! ZPL element translators.
//!
//! Every field is positioned with `^FT`, so boxes and images are anchored
//! at their lower-left corner.
//!
//! | Element | Commands |
//! |---------|----------|
//! | line | `^GB` with a zero side; diagonals are rejected |
//! | rect | filled `^GB` for visible fill, else outlined `^GB` for a stroke |
//! | text, tspan | `^A0` scalable font, `^FR` when white |
//! | path | `^GB` per straight segment |
//! | image | `^BY` + barcode for hints, else `^XG` (stored) or `^GF` (direct) |

use super::commands::{self, Code128Mode, FieldOrientation, Interpretation, LineColor};
use crate::backend::barcode::{BarcodeHint, Symbology};
use crate::backend::image::{ImagePlacement, wants_direct_write};
use crate::config::ImageMode;
use crate::document::{ElementKind, LineShape, Node, PathSegment};
use crate::error::{RenderError, Result};
use crate::geometry::{DeviceImage, Matrix, TextMetrics, Transformer};
use crate::raster;
use crate::render::{RenderPass, Translator};

const BACKEND: &str = "ZPL";

/// Resident scalable font.
const SCALABLE_FONT: &str = "0";

/// Smallest character height `^A0` is given.
const MIN_FONT_HEIGHT: f32 = 10.0;

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
        let width = (bounds.end_x - bounds.start_x) as i32;
        let height = (bounds.end_y - bounds.start_y) as i32;
        if bounds.is_diagonal() || (width != 0 && height != 0) {
            return Err(RenderError::diagonal(
                BACKEND,
                "line",
                (bounds.start_x, bounds.start_y),
                (bounds.end_x, bounds.end_y),
            ));
        }
        let color = if node.style.stroke.is_white() {
            LineColor::White
        } else {
            LineColor::Black
        };

        let body = &mut pass.container.body;
        body.push(commands::field_typeset(bounds.start_x as i32, bounds.start_y as i32).into());
        body.push(commands::graphic_box(width, height, bounds.stroke_width as i32, color).into());
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

        if node.style.fill.is_visible_ink() {
            // a solid box is one border as thick as the box itself
            let diagonal = LineShape {
                x1: rect.x,
                y1: rect.y,
                x2: rect.x + rect.width,
                y2: rect.y + rect.height,
            };
            let bounds = self.transformer.line(&diagonal, node.style.stroke_width, source, view);
            let across = (bounds.end_x - bounds.start_x) as i32;
            let down = (bounds.end_y - bounds.start_y) as i32;
            let (width, height, thickness) = if self.transformer.rotation_sector(source, view).is_odd() {
                (0, down, across)
            } else {
                (across, 0, down)
            };

            let body = &mut pass.container.body;
            body.push(commands::field_typeset(bounds.start_x as i32, bounds.end_y as i32).into());
            body.push(commands::graphic_box(width, height, thickness, LineColor::Black).into());
        } else if !node.style.stroke.is_none() {
            let bounds = self.transformer.rect(rect, node.style.stroke_width, source, view);
            let body = &mut pass.container.body;
            body.push(commands::field_typeset(bounds.start_x as i32, bounds.end_y as i32).into());
            body.push(
                commands::graphic_box(
                    (bounds.end_x - bounds.start_x) as i32,
                    (bounds.end_y - bounds.start_y) as i32,
                    bounds.stroke_width as i32,
                    LineColor::Black,
                )
                .into(),
            );
        }
        Ok(())
    }
}

// ============================================================================
// TEXT
// ============================================================================

pub struct TextTranslator {
    transformer: Transformer,
}

impl TextTranslator {
    pub fn new(transformer: Transformer) -> Self {
        Self { transformer }
    }
}

/// `^` starts a command anywhere in the stream, so it cannot appear in field data.
fn sanitize(text: &str) -> String {
    text.replace('^', "")
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

        let (x, y) = content.anchor();
        let line_height_factor = node.line_height_factor();
        let metrics = TextMetrics {
            x,
            y,
            font_size: node.style.font_size,
            line_height_factor,
        };
        let device = self.transformer.text(&metrics, source, view);
        let sector = self.transformer.rotation_sector(source, view);

        // ^FT anchors the baseline; move the lifted anchor back down along
        // the text's own vertical axis
        let offset = TextMetrics::anchor_offset(device.font_size, line_height_factor);
        let (mut x, mut y) = (device.x, device.y);
        match sector.value() {
            0 => y += offset,
            1 => x -= offset,
            2 => y -= offset,
            _ => x += offset,
        }

        let body = &mut pass.container.body;
        body.push(commands::field_typeset(x as i32, y as i32).into());
        if node.style.fill.is_white() {
            body.push(commands::field_reverse().into());
        }
        body.push(
            commands::font(
                SCALABLE_FONT,
                FieldOrientation::from_sector(sector),
                device.font_size.max(MIN_FONT_HEIGHT) as i32,
                0,
                &text,
            )
            .into(),
        );
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
            let body = &mut pass.container.body;
            body.push(commands::field_typeset(bounds.start_x as i32, bounds.end_y as i32).into());
            body.push(
                commands::graphic_box(
                    (bounds.end_x - bounds.start_x) as i32,
                    (bounds.end_y - bounds.start_y) as i32,
                    bounds.stroke_width as i32,
                    LineColor::Black,
                )
                .into(),
            );
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
}

impl ImageTranslator {
    pub fn new(transformer: Transformer, mode: ImageMode) -> Self {
        Self { transformer, mode }
    }

    /// Move the box down by its own height so `^FT` lands on the top-left corner.
    fn typeset_origin(mut device: DeviceImage) -> DeviceImage {
        let height = device.end_y - device.start_y;
        device.start_y += height;
        device.end_y += height;
        device
    }

    fn barcode(hint: &BarcodeHint, placement: &ImagePlacement) -> Vec<String> {
        let height = placement.device.alignment_height as i32;
        let mut x = placement.horizontal_start;
        if placement.sector.is_odd() {
            x += height;
        }
        let orientation = FieldOrientation::from_sector(placement.sector);
        let interpretation = if hint.readable {
            Interpretation::BELOW
        } else {
            Interpretation::NONE
        };
        let ratio = hint.wide as f32 / hint.narrow.max(1) as f32;

        let code = match hint.symbology {
            Symbology::Code128 => commands::code128(
                orientation,
                height,
                interpretation,
                false,
                Code128Mode::Automatic,
                &hint.content,
            ),
            Symbology::Code128A | Symbology::Code128B | Symbology::Code128C => {
                let start = match hint.symbology {
                    Symbology::Code128A => ">9",
                    Symbology::Code128B => ">:",
                    _ => ">;",
                };
                commands::code128(
                    orientation,
                    height,
                    interpretation,
                    false,
                    Code128Mode::NoSelectedMode,
                    &format!("{}{}", start, hint.content),
                )
            }
            Symbology::Interleaved2Of5 | Symbology::Interleaved2Of5Mod10 => commands::interleaved_2_of_5(
                orientation,
                height,
                interpretation,
                hint.symbology == Symbology::Interleaved2Of5Mod10,
                &hint.content,
            ),
            Symbology::Code39 | Symbology::Code39Check => commands::code39(
                orientation,
                hint.symbology == Symbology::Code39Check,
                height,
                interpretation,
                &hint.content,
            ),
        };

        vec![
            commands::field_typeset(x, placement.vertical_start),
            commands::barcode_field_default(hint.narrow, ratio, height),
            code,
        ]
    }
}

impl Translator for ImageTranslator {
    fn translate(&self, node: &Node<'_>, source: &Matrix, view: &Matrix, pass: &mut RenderPass<'_>) -> Result<()> {
        let ElementKind::Image(image) = node.kind() else {
            return Ok(());
        };
        let placement = ImagePlacement::new(
            Self::typeset_origin(self.transformer.image(image, source, view)),
            self.transformer.rotation_sector(source, view),
        );
        let origin = commands::field_typeset(placement.horizontal_start, placement.vertical_start);

        if let Some(hint) = BarcodeHint::from_node(node)? {
            pass.container
                .body
                .extend(Self::barcode(&hint, &placement).into_iter().map(Into::into));
            return Ok(());
        }

        if wants_direct_write(node, self.mode) {
            let Some(pixels) = placement.load(image, pass) else {
                return Ok(());
            };
            let raster = raster::encode(&pixels, false);
            pass.container.body.push(origin.into());
            pass.container
                .body
                .push(commands::graphic_field(&raster.data, raster.bytes_per_row).into());
            return Ok(());
        }

        let stored = placement.resolve_stored(node, image, pass, |name, pixels| {
            let raster = raster::encode(&pixels, false);
            vec![commands::download_graphics(name, &raster.data, raster.bytes_per_row).into()]
        })?;
        if let Some(name) = stored {
            pass.container.body.push(origin.into());
            pass.container.body.push(commands::recall_graphic(&name).into());
        }
        Ok(())
    }
}
