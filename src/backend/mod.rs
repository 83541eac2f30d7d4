//! # Printer Backends
//!
//! One module per printer command language. Each backend supplies data to
//! the same pipeline instead of overriding it:
//!
//! | Part | EPL | ZPL | FingerPrint |
//! |------|-----|-----|-------------|
//! | View profile | top-left | top-left | bottom-left (Y flipped) |
//! | Rect outset (x stroke) | 0.25 | 0.5 | 0.5 |
//! | Header lines | after the walk | none | before the walk |
//! | Stored image suffix | - | - | `.PCX` |
//! | Default text encoding | CP850 | UTF-8 | UTF-8 |
//!
//! ```text
//! RenderConfig ──► backend::renderer() ──► Renderer { transformer, translators, frame }
//!                                               │
//! Document ─────────────────────────────► translate() ──► Container ──► bytes
//! ```
//!
//! ## Example
//!
//! ```
//! use labelrender::backend::render;
//! use labelrender::config::{Backend, RenderConfig};
//! use labelrender::document::{Document, Element, Paint};
//! use labelrender::raster::EmbeddedImageSource;
//!
//! let doc = Document::new("label", vec![
//!     Element::rect(10.0, 10.0, 40.0, 20.0)
//!         .with_fill(Paint::None)
//!         .with_stroke(Paint::BLACK, 2.0),
//! ]);
//! let mut config = RenderConfig::new(Backend::Zpl);
//! config.line_ending = labelrender::render::LineEnding::Lf;
//!
//! let bytes = render(&doc, &config, &EmbeddedImageSource::new()).unwrap();
//! assert!(String::from_utf8(bytes).unwrap().starts_with("^XA\n"));
//! ```

pub mod barcode;
pub mod epl;
pub mod fingerprint;
pub mod image;
pub mod zpl;

use crate::config::{Backend, RenderConfig};
use crate::document::Document;
use crate::encoding::TextEncoding;
use crate::error::Result;
use crate::geometry::{Matrix, Transformer, ViewRotation};
use crate::raster::ImageSource;
use crate::render::{Container, ImageCache, LineEnding, RenderPass, Segment, TranslatorTable, walk};

/// Fixed lines a backend wraps around the translated elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Header lines, placed before or after the image uploads.
    pub header: Vec<String>,
    /// Append the header lines after the walk, behind any uploads.
    pub header_after_walk: bool,
    pub body_prefix: Vec<String>,
    pub body_suffix: Vec<String>,
    pub footer: Vec<String>,
}

/// A fully configured render pipeline for one backend.
///
/// Built once per configuration and reusable for any number of documents;
/// every [`translate`](Renderer::translate) call gets a fresh container and
/// image cache.
pub struct Renderer {
    pub(crate) backend: Backend,
    pub(crate) transformer: Transformer,
    pub(crate) translators: TranslatorTable,
    pub(crate) frame: Frame,
    pub(crate) encoding: TextEncoding,
    pub(crate) line_ending: LineEnding,
    pub(crate) image_suffix: &'static str,
    pub(crate) magnification: f32,
    pub(crate) rotation: ViewRotation,
}

impl Renderer {
    /// Build the renderer for `config.backend`.
    pub fn for_config(config: &RenderConfig) -> Result<Self> {
        config.validate()?;
        match config.backend {
            Backend::Epl => epl::renderer(config),
            Backend::Zpl => zpl::renderer(config),
            Backend::FingerPrint => fingerprint::renderer(config),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    /// View matrix for the configured magnification and rotation.
    pub fn view_matrix(&self) -> Matrix {
        self.transformer.view_matrix(self.magnification, self.rotation)
    }

    /// Translate a document into header, body and footer segments.
    pub fn translate(&self, document: &Document, image_source: &dyn ImageSource) -> Result<Container> {
        let view = self.view_matrix();
        let mut pass = RenderPass::new(image_source, ImageCache::with_suffix(self.image_suffix));

        if !self.frame.header_after_walk {
            pass.container.header.extend(lines(&self.frame.header));
        }
        pass.container.body.extend(lines(&self.frame.body_prefix));

        walk(document, &self.translators, &view, &mut pass)?;

        pass.container.body.extend(lines(&self.frame.body_suffix));
        if self.frame.header_after_walk {
            pass.container.header.extend(lines(&self.frame.header));
        }
        pass.container.footer.extend(lines(&self.frame.footer));

        log::debug!(
            "{} translation of '{}': {} header, {} body, {} footer segments, {} stored images",
            self.backend,
            document.id,
            pass.container.header.len(),
            pass.container.body.len(),
            pass.container.footer.len(),
            pass.images.len()
        );
        Ok(pass.container)
    }

    /// Translate and serialize a document to printer bytes.
    pub fn render(&self, document: &Document, image_source: &dyn ImageSource) -> Result<Vec<u8>> {
        let container = self.translate(document, image_source)?;
        Ok(container.to_bytes(self.encoding, self.line_ending))
    }
}

fn lines(lines: &[String]) -> impl Iterator<Item = Segment> + '_ {
    lines.iter().map(|line| Segment::Text(line.clone()))
}

/// Build a renderer for `config` and render one document.
pub fn render(document: &Document, config: &RenderConfig, image_source: &dyn ImageSource) -> Result<Vec<u8>> {
    Renderer::for_config(config)?.render(document, image_source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Element, Paint};
    use crate::raster::EmbeddedImageSource;
    use pretty_assertions::assert_eq;

    fn config(backend: Backend) -> RenderConfig {
        RenderConfig {
            line_ending: LineEnding::Lf,
            ..RenderConfig::new(backend)
        }
    }

    #[test]
    fn test_for_config_picks_backend() {
        for backend in [Backend::Epl, Backend::Zpl, Backend::FingerPrint] {
            let renderer = Renderer::for_config(&config(backend)).unwrap();
            assert_eq!(renderer.backend(), backend);
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut bad = config(Backend::Zpl);
        bad.destination_dpi = -1.0;
        assert!(Renderer::for_config(&bad).is_err());

        let mut bad = config(Backend::Epl);
        bad.code_page = Some("klingon".into());
        assert!(Renderer::for_config(&bad).is_err());
    }

    #[test]
    fn test_renderer_is_reusable() {
        let renderer = Renderer::for_config(&config(Backend::Zpl)).unwrap();
        let doc = Document::new("a", vec![Element::line(0.0, 0.0, 10.0, 0.0).with_stroke(Paint::BLACK, 1.0)]);
        let first = renderer.translate(&doc, &EmbeddedImageSource::new()).unwrap();
        let second = renderer.translate(&doc, &EmbeddedImageSource::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_encodes_with_line_ending() {
        let mut cfg = config(Backend::Epl);
        cfg.line_ending = LineEnding::Crlf;
        let bytes = render(&Document::default(), &cfg, &EmbeddedImageSource::new()).unwrap();
        assert_eq!(bytes, b"R0,0\r\nZT\r\nI8,1,850\r\n\r\nN\r\nP1\r\n\r\n".to_vec());
    }
}
