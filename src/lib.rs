//! # labelrender - Vector Labels to Thermal Printer Commands
//!
//! labelrender turns a vector element tree (lines, rectangles, text, paths,
//! images and groups with nested transforms) into the command stream of a
//! thermal label printer. It provides:
//!
//! - **Three backends**: EPL2, ZPL II and FingerPrint
//! - **One geometry engine**: per-backend view profiles, magnification and
//!   page rotation, quarter-turn rotation sectors
//! - **Resource caching**: each distinct bitmap is uploaded once per render
//! - **Exact wire formats**: pure command formatters per backend
//!
//! ## Quick Start
//!
//! ```
//! use labelrender::{Backend, RenderConfig, render};
//! use labelrender::document::{Document, Element, Paint};
//! use labelrender::raster::EmbeddedImageSource;
//!
//! let doc = Document::new("shipping-label", vec![
//!     Element::rect(10.0, 10.0, 300.0, 120.0)
//!         .with_fill(Paint::None)
//!         .with_stroke(Paint::BLACK, 2.0),
//!     Element::text(20.0, 60.0, "FRAGILE").with_font_size(32.0),
//! ]);
//!
//! let config = RenderConfig::new(Backend::Zpl);
//! let bytes = render(&doc, &config, &EmbeddedImageSource::new())?;
//! assert!(bytes.starts_with(b"^XA"));
//! # Ok::<(), labelrender::RenderError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`document`] | Element tree, styles and transforms (JSON-serializable) |
//! | [`geometry`] | Affine matrices and the device transformer |
//! | [`render`] | Output container, tree walker, image cache, EPL font table |
//! | [`backend`] | EPL, ZPL and FingerPrint translators and command formatters |
//! | [`raster`] | Bitmap packing, PCX encoding and image sources |
//! | [`encoding`] | Code page encoders for text segments |
//! | [`config`] | Render configuration and printer presets |
//! | [`error`] | Error types |
//!
//! ## Pipeline
//!
//! ```text
//! Document ──► walk (source matrix per node) ──► Translator per element kind
//!                                                   │
//!                     Container { header, body, footer } ◄─┘
//!                                   │
//!                                   ▼
//!                     bytes (code page + line ending)
//! ```

pub mod backend;
pub mod config;
pub mod document;
pub mod encoding;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod render;

// Re-exports for convenience
pub use backend::{Renderer, render};
pub use config::{Backend, RenderConfig};
pub use error::RenderError;
