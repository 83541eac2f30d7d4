//! # Render Tests
//!
//! End-to-end checks through the public API: JSON documents and configs in,
//! printer command streams out.
//!
//! ## Test Coverage
//!
//! - **Frames**: the fixed setup and trailer lines of each backend
//! - **Geometry**: magnification, page rotation, invisible subtrees
//! - **Images**: one upload per distinct bitmap and rotation
//! - **Errors**: geometry a backend cannot draw aborts the render

use image::{Rgba, RgbaImage};
use labelrender::config::{Backend, RenderConfig};
use labelrender::document::{Document, Element, ImageRef, Paint, Transform};
use labelrender::geometry::{RotationSector, ViewRotation};
use labelrender::raster::{EmbeddedImageSource, ImageSource};
use labelrender::render::{LineEnding, Segment};
use labelrender::{RenderError, Renderer, render};
use pretty_assertions::assert_eq;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Config with LF endings and a 1:1 source to device scale.
fn config(backend: Backend) -> RenderConfig {
    RenderConfig {
        source_dpi: 203.0,
        destination_dpi: 203.0,
        line_ending: LineEnding::Lf,
        ..RenderConfig::new(backend)
    }
}

fn black(_: &ImageRef, width: u32, height: u32, _: RotationSector) -> Option<RgbaImage> {
    Some(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])))
}

fn text_of(document: &Document, config: &RenderConfig, source: &dyn ImageSource) -> String {
    Renderer::for_config(config)
        .unwrap()
        .translate(document, source)
        .unwrap()
        .to_string()
}

// ============================================================================
// FRAMES
// ============================================================================

#[test]
fn test_empty_document_frames() {
    let doc = Document::default();
    let source = EmbeddedImageSource::new();

    assert_eq!(
        text_of(&doc, &config(Backend::Epl), &source),
        "R0,0\nZT\nI8,1,850\n\nN\nP1\n\n"
    );
    assert_eq!(
        text_of(&doc, &config(Backend::Zpl), &source),
        "^XA\n^CI28\n^LH18,8\n^PON\n^XZ\n"
    );
    assert_eq!(
        text_of(&doc, &config(Backend::FingerPrint), &source),
        "IMMEDIATE ON\nNASC 8\nVERBOFF\nINPUT OFF\nPF 1\n\n"
    );
}

#[test]
fn test_crlf_bytes() {
    let cfg = RenderConfig {
        line_ending: LineEnding::Crlf,
        ..config(Backend::Zpl)
    };
    let bytes = render(&Document::default(), &cfg, &EmbeddedImageSource::new()).unwrap();
    assert_eq!(bytes, b"^XA\r\n^CI28\r\n^LH18,8\r\n^PON\r\n^XZ\r\n".to_vec());
}

// ============================================================================
// GEOMETRY
// ============================================================================

#[test]
fn test_white_rect_at_double_magnification() {
    let doc = Document::new(
        "doc",
        vec![
            Element::rect(10.0, 10.0, 40.0, 20.0)
                .with_fill(Paint::WHITE)
                .with_stroke(Paint::BLACK, 2.0),
        ],
    );
    let cfg = RenderConfig {
        source_dpi: 100.0,
        destination_dpi: 200.0,
        ..config(Backend::Epl)
    };
    let container = Renderer::for_config(&cfg)
        .unwrap()
        .translate(&doc, &EmbeddedImageSource::new())
        .unwrap();

    // one box, no fill: corners doubled, thickness doubled, grown by a quarter stroke
    let body: Vec<&str> = container.body.iter().filter_map(Segment::as_text).collect();
    assert_eq!(body, vec!["", "N", "X19,19,4,101,61"]);
}

#[test]
fn test_hidden_subtree_emits_nothing() {
    let doc = Document::new(
        "doc",
        vec![
            Element::group(vec![
                Element::line(0.0, 0.0, 50.0, 0.0).with_stroke(Paint::BLACK, 1.0),
                Element::text(0.0, 40.0, "gone").with_font_size(24.0),
            ])
            .hidden(),
        ],
    );
    for backend in [Backend::Epl, Backend::Zpl, Backend::FingerPrint] {
        let empty = text_of(&Document::default(), &config(backend), &black);
        assert_eq!(text_of(&doc, &config(backend), &black), empty, "{}", backend);
    }
}

#[test]
fn test_page_rotation_turns_text() {
    let doc = Document::new("doc", vec![Element::text(100.0, 100.0, "up").with_font_size(20.0)]);
    let cfg = RenderConfig {
        rotation: ViewRotation::Rotate90,
        ..config(Backend::Zpl)
    };
    let out = text_of(&doc, &cfg, &EmbeddedImageSource::new());

    // (x, y) lands on (816 - y, x); the lifted anchor (100, 80) becomes
    // (736, 100) and moves back by the font size along the turned axis
    assert!(out.contains("^FT716,100\n^A0R,20,0^FDup^FS\n"), "{}", out);
}

#[test]
fn test_group_transforms_compose() {
    let doc = Document::new(
        "doc",
        vec![
            Element::group(vec![
                Element::line(0.0, 0.0, 10.0, 0.0)
                    .with_stroke(Paint::BLACK, 1.0)
                    .with_transform(Transform::Scale { x: 2.0, y: None }),
            ])
            .with_transform(Transform::Translate { x: 5.0, y: 7.0 }),
        ],
    );
    let out = text_of(&doc, &config(Backend::Epl), &black);
    assert!(out.contains("\nLO5,7,20,2\n"), "{}", out);
}

#[test]
fn test_diagonal_line_fails_on_zpl_only() {
    let doc = Document::new("doc", vec![Element::line(0.0, 0.0, 40.0, 30.0).with_stroke(Paint::BLACK, 1.0)]);
    let source = EmbeddedImageSource::new();

    let err = render(&doc, &config(Backend::Zpl), &source).unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedGeometry { .. }));
    assert!(err.to_string().contains("ZPL"));

    let out = text_of(&doc, &config(Backend::Epl), &source);
    assert!(out.contains("\nLS0,0,1,40,30\n"), "{}", out);
}

// ============================================================================
// IMAGES
// ============================================================================

#[test]
fn test_repeated_image_is_uploaded_once() {
    let logo = Element::image(10.0, 10.0, 16.0, 16.0, None).with_id("logo");
    let doc = Document::new("doc", vec![logo.clone(), Element::group(vec![logo.clone()]), logo]);

    let zpl = text_of(&doc, &config(Backend::Zpl), &black);
    assert_eq!(zpl.matches("~DGR:").count(), 1);
    assert_eq!(zpl.matches("^XGR:").count(), 3);

    let epl = text_of(&doc, &config(Backend::Epl), &black);
    assert_eq!(epl.matches("GM\"").count(), 1);
    assert_eq!(epl.matches("\nGG").count(), 3);

    let fingerprint = text_of(&doc, &config(Backend::FingerPrint), &black);
    assert_eq!(fingerprint.matches("IMAGE LOAD").count(), 1);
    assert_eq!(fingerprint.matches("PM \"").count(), 3);
}

#[test]
fn test_rotated_copy_is_a_separate_upload() {
    let logo = Element::image(10.0, 10.0, 16.0, 16.0, None).with_id("logo");
    let turned = logo
        .clone()
        .with_transform(Transform::Rotate { angle: 90.0, cx: 18.0, cy: 18.0 });
    let doc = Document::new("doc", vec![logo, turned]);

    let zpl = text_of(&doc, &config(Backend::Zpl), &black);
    assert_eq!(zpl.matches("~DGR:").count(), 2);
}

#[test]
fn test_stored_images_precede_the_format() {
    let doc = Document::new("doc", vec![Element::image(0.0, 0.0, 8.0, 8.0, None)]);
    let out = text_of(&doc, &config(Backend::Zpl), &black);
    assert!(out.starts_with("~DGR:"), "{}", out);
    assert!(out.find("~DGR:") < out.find("^XA"));
}

// ============================================================================
// JSON INPUT
// ============================================================================

#[test]
fn test_json_document_and_config() {
    let doc: Document = serde_json::from_str(
        r##"{
            "id": "label",
            "children": [
                {"type": "line", "x1": 0, "y1": 20, "x2": 100, "y2": 20, "stroke": "#000000", "stroke_width": 2},
                {"type": "text", "x": [10], "y": [50], "text": "Hi", "font_size": 24}
            ]
        }"##,
    )
    .unwrap();
    let cfg = RenderConfig::from_json(
        r#"{"backend": "epl", "source_dpi": 203, "destination_dpi": 203, "line_ending": "lf", "copies": 2}"#,
    )
    .unwrap();

    let bytes = render(&doc, &cfg, &EmbeddedImageSource::new()).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "R0,0\nZT\nI8,1,850\n\nN\nLO0,20,100,2\nA10,26,0,4,1,1,N,\"Hi\"\nP2\n\n"
    );
}

#[test]
fn test_invalid_rotation_in_config() {
    let err = RenderConfig::from_json(r#"{"rotation": 45}"#).unwrap_err();
    assert!(matches!(err, RenderError::Json(_)));
}
