//! EPL element translators.
//!
//! | Element | Commands |
//! |---------|----------|
//! | line | `LO`/`LW` when axis-aligned, `LS` otherwise |
//! | rect | `LO` for visible fill, then `X` for a stroke |
//! | text, tspan | `A` with the closest resident font |
//! | path | `LO` per straight segment |
//! | image | `B` for barcode hints, else `GG` (stored) or `GW` (direct) |

use super::commands::{self, BarcodeSelection, PrintHumanReadable, ReverseImage};
use crate::backend::barcode::{BarcodeHint, Symbology};
use crate::backend::image::{ImagePlacement, wants_direct_write};
use crate::config::ImageMode;
use crate::document::{ElementKind, LineShape, Node, Paint, PathSegment};
use crate::error::Result;
use crate::geometry::{DeviceBounds, Matrix, TextMetrics, Transformer};
use crate::raster::{self, pcx};
use crate::render::{FontTable, RenderPass, Segment, Translator};

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

    /// Commands for a device-space line.
    ///
    /// Axis-aligned lines become boxes one stroke thick; a diagonal line is
    /// drawn with `LS`, whose fourth and fifth fields are the end point.
    pub fn commands(bounds: &DeviceBounds, stroke: &Paint) -> String {
        let x = bounds.start_x as i32;
        let y = bounds.start_y as i32;
        let stroke_width = bounds.stroke_width as i32;

        let (mut horizontal, mut vertical) = if bounds.is_diagonal() {
            (stroke_width, bounds.end_x as i32)
        } else {
            (
                (bounds.end_x - bounds.start_x) as i32,
                (bounds.end_y - bounds.start_y) as i32,
            )
        };

        if horizontal == 0 || vertical == 0 {
            if horizontal == 0 {
                horizontal = stroke_width;
            }
            if vertical == 0 {
                vertical = stroke_width;
            }
            if stroke.is_white() {
                commands::line_draw_white(x, y, horizontal, vertical)
            } else {
                commands::line_draw_black(x, y, horizontal, vertical)
            }
        } else {
            commands::line_draw_diagonal(x, y, horizontal, vertical, bounds.end_y as i32)
        }
    }
}

impl Translator for LineTranslator {
    fn translate(&self, node: &Node<'_>, source: &Matrix, view: &Matrix, pass: &mut RenderPass<'_>) -> Result<()> {
        let ElementKind::Line(line) = node.kind() else {
            return Ok(());
        };
        let bounds = self.transformer.line(line, node.style.stroke_width, source, view);
        pass.container.body.push(Self::commands(&bounds, &node.style.stroke).into());
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
        let bounds = self.transformer.rect(rect, node.style.stroke_width, source, view);
        let x = bounds.start_x as i32;
        let y = bounds.start_y as i32;
        let x_end = bounds.end_x as i32;
        let y_end = bounds.end_y as i32;

        // fill and stroke are independent: a filled, stroked box emits both
        if node.style.fill.is_visible_ink() {
            pass.container
                .body
                .push(commands::line_draw_black(x, y, x_end - x, y_end - y).into());
        }
        if !node.style.stroke.is_none() {
            pass.container
                .body
                .push(commands::draw_box(x, y, bounds.stroke_width as i32, x_end, y_end).into());
        }
        Ok(())
    }
}

// ============================================================================
// TEXT
// ============================================================================

pub struct TextTranslator {
    transformer: Transformer,
    fonts: FontTable,
}

impl TextTranslator {
    pub fn new(transformer: Transformer, fonts: FontTable) -> Self {
        Self { transformer, fonts }
    }
}

/// EPL strings are double-quoted and have no escape.
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

        let (x, y) = content.anchor();
        let metrics = TextMetrics {
            x,
            y,
            font_size: node.style.font_size,
            line_height_factor: node.line_height_factor(),
        };
        let device = self.transformer.text(&metrics, source, view);
        let sector = self.transformer.rotation_sector(source, view);
        let font = self.fonts.select(device.font_size)?;
        let reverse = if node.style.fill.is_white() {
            ReverseImage::Reverse
        } else {
            ReverseImage::Normal
        };

        pass.container.body.push(
            commands::ascii_text(
                device.x as i32,
                device.y as i32,
                sector.value(),
                font.font,
                font.horizontal_multiplier,
                font.vertical_multiplier,
                reverse,
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
            let stroke_width = bounds.stroke_width as i32;
            let or_stroke = |length: i32| if length == 0 { stroke_width } else { length };

            pass.container.body.push(
                commands::line_draw_black(
                    bounds.start_x as i32,
                    bounds.start_y as i32,
                    or_stroke((bounds.end_x - bounds.start_x) as i32),
                    or_stroke((bounds.end_y - bounds.start_y) as i32),
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
    dpi: u16,
}

impl ImageTranslator {
    pub fn new(transformer: Transformer, mode: ImageMode, dpi: u16) -> Self {
        Self { transformer, mode, dpi }
    }

    fn selection(symbology: Symbology) -> BarcodeSelection {
        match symbology {
            Symbology::Code128 => BarcodeSelection::Code128Auto,
            Symbology::Code128A => BarcodeSelection::Code128A,
            Symbology::Code128B => BarcodeSelection::Code128B,
            Symbology::Code128C => BarcodeSelection::Code128C,
            Symbology::Interleaved2Of5 => BarcodeSelection::Interleaved2Of5,
            Symbology::Interleaved2Of5Mod10 => BarcodeSelection::Interleaved2Of5Mod10,
            Symbology::Code39 => BarcodeSelection::Code39,
            Symbology::Code39Check => BarcodeSelection::Code39CheckDigit,
        }
    }

    fn barcode(&self, hint: &BarcodeHint, placement: &ImagePlacement) -> String {
        let height = placement.device.alignment_height as i32;
        let mut x = placement.horizontal_start;
        if placement.sector.is_odd() {
            x += height;
        }
        let readable = if hint.readable {
            PrintHumanReadable::Yes
        } else {
            PrintHumanReadable::No
        };
        commands::barcode(
            x,
            placement.vertical_start,
            placement.sector.value(),
            Self::selection(hint.symbology),
            hint.narrow,
            hint.wide,
            height,
            readable,
            &hint.content,
        )
    }
}

impl Translator for ImageTranslator {
    fn translate(&self, node: &Node<'_>, source: &Matrix, view: &Matrix, pass: &mut RenderPass<'_>) -> Result<()> {
        let ElementKind::Image(image) = node.kind() else {
            return Ok(());
        };
        let placement = ImagePlacement::new(
            self.transformer.image(image, source, view),
            self.transformer.rotation_sector(source, view),
        );

        if let Some(hint) = BarcodeHint::from_node(node)? {
            pass.container.body.push(self.barcode(&hint, &placement).into());
            return Ok(());
        }

        if wants_direct_write(node, self.mode) {
            let Some(pixels) = placement.load(image, pass) else {
                return Ok(());
            };
            // GW expects 0 bits to print
            let raster = raster::encode(&pixels, true);
            pass.container.body.push(
                commands::graphic_direct_write(
                    placement.horizontal_start,
                    placement.vertical_start,
                    raster.bytes_per_row,
                    raster.rows,
                )
                .into(),
            );
            pass.container.body.push(Segment::Binary(raster.data));
            return Ok(());
        }

        let dpi = self.dpi;
        let stored = placement.resolve_stored(node, image, pass, |name, pixels| {
            let pcx = pcx::encode(&pixels, dpi);
            vec![
                commands::delete_graphics(name).into(),
                commands::delete_graphics(name).into(),
                commands::store_graphics(name, pcx.len()).into(),
                Segment::Binary(pcx),
            ]
        })?;
        if let Some(name) = stored {
            pass.container.body.push(
                commands::print_graphics(placement.horizontal_start, placement.vertical_start, &name).into(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::barcode::{BARCODE_ATTRIBUTE, BARCODE_TYPE_ATTRIBUTE};
    use crate::backend::image::DIRECT_WRITE_ATTRIBUTE;
    use crate::document::{ComputedStyle, Document, Element, ElementTag, ImageRef, Transform};
    use crate::geometry::{DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH, RotationSector, ViewProfile, ViewRotation};
    use crate::raster::ImageSource;
    use crate::render::{Container, ImageCache, TranslatorTable, walk};
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;

    fn transformer() -> Transformer {
        Transformer::new(ViewProfile::TOP_LEFT, 0.25, DEFAULT_OUTPUT_WIDTH, DEFAULT_OUTPUT_HEIGHT)
    }

    fn black_square(_: &ImageRef, width: u32, height: u32, _: RotationSector) -> Option<RgbaImage> {
        Some(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])))
    }

    fn table(mode: ImageMode) -> TranslatorTable {
        let t = transformer();
        let mut table = TranslatorTable::new();
        table
            .register(ElementTag::Line, LineTranslator::new(t))
            .register(ElementTag::Rect, RectTranslator::new(t))
            .register(ElementTag::Text, TextTranslator::new(t, FontTable::EPL))
            .register(ElementTag::Path, PathTranslator::new(t))
            .register(ElementTag::Image, ImageTranslator::new(t, mode, 203));
        table
    }

    fn run(children: Vec<Element>, magnification: f32, source: &dyn ImageSource, mode: ImageMode) -> Container {
        let doc = Document::new("doc", children);
        let view = transformer().view_matrix(magnification, ViewRotation::Normal);
        let mut pass = RenderPass::new(source, ImageCache::new());
        walk(&doc, &table(mode), &view, &mut pass).unwrap();
        pass.container
    }

    fn body(container: &Container) -> Vec<&str> {
        container.body.iter().filter_map(Segment::as_text).collect()
    }

    #[test]
    fn test_horizontal_line_becomes_box() {
        let line = Element::line(10.0, 20.0, 110.0, 20.0).with_stroke(Paint::BLACK, 3.0);
        let out = run(vec![line], 1.0, &black_square, ImageMode::Store);
        assert_eq!(body(&out), vec!["LO10,20,100,3"]);
    }

    #[test]
    fn test_white_vertical_line() {
        let line = Element::line(10.0, 20.0, 10.0, 70.0).with_stroke(Paint::WHITE, 2.0);
        let out = run(vec![line], 1.0, &black_square, ImageMode::Store);
        assert_eq!(body(&out), vec!["LW10,20,2,50"]);
    }

    #[test]
    fn test_diagonal_line() {
        let bounds = DeviceBounds {
            start_x: 10.0,
            start_y: 20.0,
            end_x: 50.0,
            end_y: 80.0,
            stroke_width: 2.0,
        };
        assert_eq!(LineTranslator::commands(&bounds, &Paint::BLACK), "LS10,20,2,50,80");
    }

    #[test]
    fn test_rect_fill_and_stroke() {
        let rect = Element::rect(10.0, 10.0, 40.0, 20.0)
            .with_fill(Paint::BLACK)
            .with_stroke(Paint::BLACK, 4.0);
        let out = run(vec![rect], 1.0, &black_square, ImageMode::Store);
        // outset by a quarter stroke on every side
        assert_eq!(body(&out), vec!["LO9,9,42,22", "X9,9,4,51,31"]);
    }

    #[test]
    fn test_white_rect_with_stroke_draws_box_only() {
        let rect = Element::rect(10.0, 10.0, 40.0, 20.0)
            .with_fill(Paint::WHITE)
            .with_stroke(Paint::BLACK, 2.0);
        let out = run(vec![rect], 2.0, &black_square, ImageMode::Store);
        assert_eq!(body(&out), vec!["X19,19,4,101,61"]);
    }

    #[test]
    fn test_text() {
        let text = Element::text(20.0, 60.0, "Say \"hi\"").with_font_size(24.0);
        let out = run(vec![text], 1.0, &black_square, ImageMode::Store);
        assert_eq!(body(&out), vec!["A20,36,0,4,1,1,N,\"Say 'hi'\""]);
    }

    #[test]
    fn test_turned_text() {
        let text = Element::text(100.0, 50.0, "up")
            .with_font_size(24.0)
            .with_transform(Transform::Rotate { angle: 90.0, cx: 200.0, cy: 200.0 });
        let out = run(vec![text], 1.0, &black_square, ImageMode::Store);
        // the lifted anchor (100, 26) turns to (374, 100), sector 1
        assert_eq!(body(&out), vec!["A374,100,1,4,1,1,N,\"up\""]);
    }

    #[test]
    fn test_white_text_is_reversed() {
        let text = Element::text(0.0, 40.0, "x").with_font_size(24.0).with_fill(Paint::WHITE);
        let out = run(vec![text], 1.0, &black_square, ImageMode::Store);
        assert_eq!(body(&out), vec!["A0,16,0,4,1,1,R,\"x\""]);
    }

    #[test]
    fn test_blank_text_is_skipped() {
        let out = run(vec![Element::text(0.0, 40.0, "  ")], 1.0, &black_square, ImageMode::Store);
        assert!(out.body.is_empty());
    }

    #[test]
    fn test_tiny_text_is_an_error() {
        let doc = Document::new("doc", vec![Element::text(0.0, 40.0, "x").with_font_size(4.0)]);
        let view = transformer().view_matrix(1.0, ViewRotation::Normal);
        let mut pass = RenderPass::new(&black_square, ImageCache::new());
        let err = walk(&doc, &table(ImageMode::Store), &view, &mut pass).unwrap_err();
        assert!(matches!(err, crate::error::RenderError::FontSizeOutOfRange { .. }));
    }

    #[test]
    fn test_path_lines_only() {
        let path = Element::path(vec![
            PathSegment::Move { start: (0.0, 0.0), end: (10.0, 10.0) },
            PathSegment::Line { start: (10.0, 10.0), end: (60.0, 10.0) },
            PathSegment::Quadratic { start: (60.0, 10.0), control: (70.0, 0.0), end: (80.0, 10.0) },
            PathSegment::Line { start: (80.0, 10.0), end: (80.0, 40.0) },
        ])
        .with_stroke(Paint::BLACK, 2.0);
        let out = run(vec![path], 1.0, &black_square, ImageMode::Store);
        assert_eq!(body(&out), vec!["LO10,10,50,2", "LO80,10,2,30"]);
    }

    #[test]
    fn test_stored_image_uploads_once() {
        let image = Element::image(10.0, 10.0, 16.0, 8.0, None).with_id("logo");
        let out = run(vec![image.clone(), image], 1.0, &black_square, ImageMode::Store);

        let name = ImageCache::new().variable_name(&ImageCache::key(RotationSector::NONE, "logo", "doc"));
        let Segment::Binary(pcx) = &out.header[3] else {
            panic!("expected PCX bytes, got {:?}", out.header[3]);
        };
        assert_eq!(pcx[0], 0x0A);
        assert_eq!(out.header.len(), 4);
        assert_eq!(
            out.header[..3].to_vec(),
            vec![
                Segment::Text(format!("GK\"{}\"", name)),
                Segment::Text(format!("GK\"{}\"", name)),
                Segment::Text(format!("GM\"{}\"{}", name, pcx.len())),
            ]
        );
        let recall = format!("GG10,10,\"{}\"", name);
        assert_eq!(body(&out), vec![recall.as_str(), recall.as_str()]);
    }

    #[test]
    fn test_missing_image_emits_nothing() {
        let none = |_: &ImageRef, _: u32, _: u32, _: RotationSector| -> Option<RgbaImage> { None };
        let out = run(vec![Element::image(0.0, 0.0, 8.0, 8.0, None)], 1.0, &none, ImageMode::Store);
        assert!(out.header.is_empty());
        assert!(out.body.is_empty());
    }

    #[test]
    fn test_direct_write_image() {
        let image = Element::image(4.0, 6.0, 10.0, 2.0, None).with_attribute(DIRECT_WRITE_ATTRIBUTE, "true");
        let out = run(vec![image], 1.0, &black_square, ImageMode::Store);
        assert!(out.header.is_empty());
        assert_eq!(out.body[0], Segment::from("GW4,6,2,2"));
        // black inverted to 0 bits, padding stays 0
        assert_eq!(out.body[1], Segment::Binary(vec![0x00, 0x00, 0x00, 0x00]));
    }

    #[test]
    fn test_barcode_hint() {
        let image = Element::image(10.0, 20.0, 100.0, 50.0, None)
            .with_attribute(BARCODE_ATTRIBUTE, "12345678")
            .with_attribute(BARCODE_TYPE_ATTRIBUTE, "i2of5");
        let out = run(vec![image], 1.0, &black_square, ImageMode::Store);
        assert_eq!(body(&out), vec!["B10,20,0,2,2,6,50,N,\"12345678\""]);
        assert!(out.header.is_empty());
    }

    #[test]
    fn test_turned_barcode_shifts_by_height() {
        let image = Element::image(10.0, 20.0, 100.0, 50.0, None)
            .with_attribute(BARCODE_ATTRIBUTE, "12345678")
            .with_attribute(BARCODE_TYPE_ATTRIBUTE, "i2of5")
            .with_transform(Transform::Rotate { angle: 90.0, cx: 200.0, cy: 200.0 });
        let out = run(vec![image], 1.0, &black_square, ImageMode::Store);
        // corners land on (330, 10)..(380, 110)
        assert_eq!(body(&out), vec!["B380,10,1,2,2,6,50,N,\"12345678\""]);
    }

    #[test]
    fn test_barcode_selection_covers_all_symbologies() {
        assert_eq!(ImageTranslator::selection(Symbology::Code39Check).code(), "3C");
        assert_eq!(ImageTranslator::selection(Symbology::Interleaved2Of5Mod10).code(), "2C");
        assert_eq!(ImageTranslator::selection(Symbology::Code128C).code(), "1C");
    }

    #[test]
    fn test_other_kinds_are_ignored() {
        let doc = Document::default();
        let element = Element::group(vec![]);
        let node = Node::new(&element, None, &doc, ComputedStyle::default());
        let mut pass = RenderPass::new(&black_square, ImageCache::new());
        let view = Matrix::IDENTITY;
        LineTranslator::new(transformer())
            .translate(&node, &Matrix::IDENTITY, &view, &mut pass)
            .unwrap();
        assert!(pass.container.body.is_empty());
    }
}
