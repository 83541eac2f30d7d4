//! # Render Configuration
//!
//! Everything a render pass needs besides the document itself.
//!
//! ## JSON Form
//!
//! ```json
//! {
//!   "backend": "zpl",
//!   "source_dpi": 96,
//!   "destination_dpi": 203,
//!   "rotation": 90,
//!   "code_page": "utf8",
//!   "line_ending": "crlf"
//! }
//! ```
//!
//! Every field is optional; missing fields take the defaults below.
//!
//! | Field | Default | Used by |
//! |-------|---------|---------|
//! | `backend` | `epl` | all |
//! | `output_width` x `output_height` | 816 x 1296 dots | all |
//! | `source_dpi` / `destination_dpi` | 96 / 203 | all |
//! | `rotation` | 0 | all |
//! | `code_page` | per backend | all |
//! | `country_code` | 850 | EPL |
//! | `max_upper_font_overlap` | 2 | EPL |
//! | `bold_weight_threshold` | 400 | FingerPrint |
//! | `image_mode` | `store` | all |
//! | `line_ending` | platform | all |
//! | `copies` | 1 | EPL, FingerPrint |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{RenderError, Result};
use crate::geometry::{DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH, ViewRotation};
use crate::render::LineEnding;

/// Target printer command language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Eltron Programming Language
    #[default]
    Epl,
    /// Zebra Programming Language
    Zpl,
    /// Intermec/Honeywell FingerPrint
    #[value(name = "fingerprint")]
    FingerPrint,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Epl => write!(f, "EPL"),
            Backend::Zpl => write!(f, "ZPL"),
            Backend::FingerPrint => write!(f, "FingerPrint"),
        }
    }
}

/// How raster images reach the printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    /// Upload each distinct bitmap once, recall it by name.
    #[default]
    Store,
    /// Write every image inline, uncached.
    Direct,
}

pub const DEFAULT_SOURCE_DPI: f32 = 96.0;
pub const DEFAULT_DESTINATION_DPI: f32 = 203.0;
pub const DEFAULT_COUNTRY_CODE: u16 = 850;
pub const DEFAULT_MAX_UPPER_FONT_OVERLAP: f32 = 2.0;
pub const DEFAULT_BOLD_WEIGHT_THRESHOLD: u16 = 400;

/// Settings for one render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub backend: Backend,
    pub output_width: u32,
    pub output_height: u32,
    pub source_dpi: f32,
    pub destination_dpi: f32,
    pub rotation: ViewRotation,
    /// Backend-specific code page name, e.g. `dos850` or `utf8`.
    pub code_page: Option<String>,
    pub country_code: u16,
    pub max_upper_font_overlap: f32,
    pub bold_weight_threshold: u16,
    pub image_mode: ImageMode,
    pub line_ending: LineEnding,
    pub copies: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            output_width: DEFAULT_OUTPUT_WIDTH,
            output_height: DEFAULT_OUTPUT_HEIGHT,
            source_dpi: DEFAULT_SOURCE_DPI,
            destination_dpi: DEFAULT_DESTINATION_DPI,
            rotation: ViewRotation::default(),
            code_page: None,
            country_code: DEFAULT_COUNTRY_CODE,
            max_upper_font_overlap: DEFAULT_MAX_UPPER_FONT_OVERLAP,
            bold_weight_threshold: DEFAULT_BOLD_WEIGHT_THRESHOLD,
            image_mode: ImageMode::default(),
            line_ending: LineEnding::default(),
            copies: 1,
        }
    }
}

impl RenderConfig {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            ..Default::default()
        }
    }

    /// Destination DPI over source DPI.
    pub fn magnification(&self) -> f32 {
        self.destination_dpi / self.source_dpi
    }

    /// Fail early on values no backend can work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.source_dpi > 0.0 && self.destination_dpi > 0.0) {
            return Err(RenderError::Config(format!(
                "dpi must be positive (source {}, destination {})",
                self.source_dpi, self.destination_dpi
            )));
        }
        if self.output_width == 0 || self.output_height == 0 {
            return Err(RenderError::Config(format!(
                "output size must be positive ({}x{})",
                self.output_width, self.output_height
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

// ============================================================================
// PRINTER PROFILES
// ============================================================================

/// # Printer Profile
///
/// Hardware presets for common label printers. A profile fixes the backend,
/// the resolution and a 4 x 6 inch label; everything else keeps its default.
///
/// ```
/// use labelrender::config::{Backend, PrinterProfile};
///
/// let config = PrinterProfile::ZEBRA_ZT410_300.config();
/// assert_eq!(config.backend, Backend::Zpl);
/// assert_eq!(config.destination_dpi, 300.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrinterProfile {
    /// Short name used on the command line.
    pub id: &'static str,
    pub name: &'static str,
    pub backend: Backend,
    pub dpi: u16,
    /// Label width in dots.
    pub width_dots: u32,
    /// Label height in dots.
    pub height_dots: u32,
}

impl PrinterProfile {
    /// Zebra LP 2844, EPL desktop printer, 203 dpi.
    pub const ZEBRA_LP2844: Self = Self {
        id: "lp2844",
        name: "Zebra LP 2844",
        backend: Backend::Epl,
        dpi: 203,
        width_dots: 812,
        height_dots: 1218,
    };

    /// Zebra GK420d, ZPL desktop printer, 203 dpi.
    pub const ZEBRA_GK420D: Self = Self {
        id: "gk420d",
        name: "Zebra GK420d",
        backend: Backend::Zpl,
        dpi: 203,
        width_dots: 812,
        height_dots: 1218,
    };

    /// Zebra ZT410, ZPL industrial printer, 300 dpi.
    pub const ZEBRA_ZT410_300: Self = Self {
        id: "zt410-300",
        name: "Zebra ZT410 (300 dpi)",
        backend: Backend::Zpl,
        dpi: 300,
        width_dots: 1200,
        height_dots: 1800,
    };

    /// Intermec PC43t, FingerPrint desktop printer, 203 dpi.
    pub const INTERMEC_PC43T: Self = Self {
        id: "pc43t",
        name: "Intermec PC43t",
        backend: Backend::FingerPrint,
        dpi: 203,
        width_dots: 812,
        height_dots: 1218,
    };

    pub const ALL: [Self; 4] = [
        Self::ZEBRA_LP2844,
        Self::ZEBRA_GK420D,
        Self::ZEBRA_ZT410_300,
        Self::INTERMEC_PC43T,
    ];

    /// Look a profile up by its short name, case-insensitively.
    pub fn find(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id.eq_ignore_ascii_case(id))
    }

    /// Render configuration preset for this printer.
    pub fn config(&self) -> RenderConfig {
        RenderConfig {
            backend: self.backend,
            output_width: self.width_dots,
            output_height: self.height_dots,
            destination_dpi: self.dpi as f32,
            ..Default::default()
        }
    }

    /// Dots per millimeter.
    #[inline]
    pub fn dots_per_mm(&self) -> f32 {
        self.dpi as f32 / 25.4
    }
}
