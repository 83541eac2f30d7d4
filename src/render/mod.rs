//! # Rendering Pipeline
//!
//! The backend-independent half of a render:
//!
//! ```text
//! Document ──► walker ──► Translator (per kind) ──► Container ──► bytes
//!                 │              │
//!                 │              └── ImageCache (one upload per bitmap)
//!                 └── source transform, inherited style
//! ```
//!
//! ## Modules
//!
//! - [`container`]: header/body/footer segment buffers and serialization
//! - [`walker`]: depth-first traversal and the translator table
//! - [`image_cache`]: pass-scoped image identity to variable name map
//! - [`font`]: bitmap font selection heuristic

pub mod container;
pub mod font;
pub mod image_cache;
pub mod walker;

pub use container::{Container, LineEnding, Segment};
pub use font::{FontSelection, FontTable};
pub use image_cache::ImageCache;
pub use walker::{RenderPass, Translator, TranslatorTable, walk};
