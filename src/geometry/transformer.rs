//! # Affine Transform Engine
//!
//! Maps document geometry into device dots. Two matrices are always in play:
//!
//! - **source**: accumulated ancestor transforms of the current node,
//!   document-local, rebuilt (never mutated) on the way down the tree
//! - **view**: device calibration for the whole pass (DPI scaling, page
//!   rotation, origin flip)
//!
//! Points go through `source` first and `view` second.
//!
//! ## View Profiles
//!
//! Each backend describes its device coordinate system as data: a base
//! device matrix plus, per page rotation, an optional rotation (applied
//! before the scale) and an origin shift (applied after everything, in
//! multiples of the output width/height).
//!
//! | Profile | Device | 0° | 90° | 180° | 270° |
//! |---------|--------|----|-----|------|------|
//! | top-left | identity | - | R90, +W | R180, -W -H | R270, +H |
//! | bottom-left | flip Y | +H | R270 | R180, +W | R90, +W +H |
//!
//! ## Rotation Sectors
//!
//! The vector `(10, 0)` is pushed through both matrices and its angle is
//! quantized to quarter turns:
//!
//! ```text
//!   sector = round_half_even(atan2(y, x) in [0°, 360°) / 90°) mod 4
//! ```
//!
//! Scale factors never change the sector, only rotation does.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Matrix;
use crate::document::{ImageRef, LineShape, RectShape};
use crate::error::{RenderError, Result};

// ============================================================================
// ROTATION
// ============================================================================

/// Requested page rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum ViewRotation {
    #[default]
    Normal,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl ViewRotation {
    pub fn degrees(self) -> u16 {
        match self {
            ViewRotation::Normal => 0,
            ViewRotation::Rotate90 => 90,
            ViewRotation::Rotate180 => 180,
            ViewRotation::Rotate270 => 270,
        }
    }

    fn index(self) -> usize {
        (self.degrees() / 90) as usize
    }
}

impl TryFrom<u16> for ViewRotation {
    type Error = RenderError;

    fn try_from(degrees: u16) -> Result<Self> {
        match degrees % 360 {
            0 => Ok(ViewRotation::Normal),
            90 => Ok(ViewRotation::Rotate90),
            180 => Ok(ViewRotation::Rotate180),
            270 => Ok(ViewRotation::Rotate270),
            other => Err(RenderError::Config(format!(
                "rotation must be a multiple of 90 degrees, got {}",
                other
            ))),
        }
    }
}

impl From<ViewRotation> for u16 {
    fn from(rotation: ViewRotation) -> u16 {
        rotation.degrees()
    }
}

/// Quarter-turn class (0-3) of the combined source and view transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RotationSector(u8);

impl RotationSector {
    pub const NONE: Self = Self(0);

    /// Wraps `value % 4`.
    pub const fn new(value: u8) -> Self {
        Self(value % 4)
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Sectors 1 and 3 swap the device width and height axes.
    #[inline]
    pub const fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }
}

impl fmt::Display for RotationSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// VIEW PROFILES
// ============================================================================

/// How one page rotation is laid onto the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewStep {
    /// Rotation applied to document coordinates before scaling.
    pub rotate: Option<f32>,
    /// Final origin shift as multiples of (output width, output height).
    pub shift: (f32, f32),
}

impl ViewStep {
    const fn new(rotate: Option<f32>, shift: (f32, f32)) -> Self {
        Self { rotate, shift }
    }
}

/// Device coordinate system of a backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewProfile {
    pub device: Matrix,
    /// Indexed by [`ViewRotation`]: 0°, 90°, 180°, 270°.
    pub steps: [ViewStep; 4],
}

impl ViewProfile {
    /// Origin top-left, y grows downwards (EPL, ZPL).
    pub const TOP_LEFT: Self = Self {
        device: Matrix::IDENTITY,
        steps: [
            ViewStep::new(None, (0.0, 0.0)),
            ViewStep::new(Some(90.0), (1.0, 0.0)),
            ViewStep::new(Some(180.0), (-1.0, -1.0)),
            ViewStep::new(Some(270.0), (0.0, 1.0)),
        ],
    };

    /// Origin bottom-left, y grows upwards (FingerPrint).
    pub const BOTTOM_LEFT: Self = Self {
        device: Matrix::FLIP_Y,
        steps: [
            ViewStep::new(None, (0.0, 1.0)),
            ViewStep::new(Some(270.0), (0.0, 0.0)),
            ViewStep::new(Some(180.0), (1.0, 0.0)),
            ViewStep::new(Some(90.0), (1.0, 1.0)),
        ],
    };
}

// ============================================================================
// DEVICE GEOMETRY
// ============================================================================

/// Line or box bounds in device space, `start <= end` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceBounds {
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
    pub stroke_width: f32,
}

impl DeviceBounds {
    /// Both axes differ by at least half a dot.
    pub fn is_diagonal(&self) -> bool {
        (self.start_y - self.end_y).abs() >= 0.5 && (self.start_x - self.end_x).abs() >= 0.5
    }

    fn outset(mut self, amount: f32) -> Self {
        self.start_x -= amount;
        self.end_x += amount;
        self.start_y -= amount;
        self.end_y += amount;
        self
    }
}

/// Image placement in device space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceImage {
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
    /// Transformed (truncated) image width, the raster width to request.
    pub alignment_width: f32,
    /// Transformed (truncated) image height, the raster height to request.
    pub alignment_height: f32,
}

/// Text anchor in device space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceText {
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
}

/// Raw text metrics read from a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub line_height_factor: f32,
}

impl TextMetrics {
    /// `font_size / factor`, or the plain font size when the factor is not positive.
    pub fn anchor_offset(font_size: f32, line_height_factor: f32) -> f32 {
        if line_height_factor > 0.0 {
            font_size / line_height_factor
        } else {
            font_size
        }
    }
}

#[inline]
fn ordered(a: f32, b: f32) -> (f32, f32) {
    if b < a { (b, a) } else { (a, b) }
}

// ============================================================================
// TRANSFORMER
// ============================================================================

/// Default output canvas width in device dots.
pub const DEFAULT_OUTPUT_WIDTH: u32 = 816;

/// Default output canvas height in device dots.
pub const DEFAULT_OUTPUT_HEIGHT: u32 = 1296;

/// The geometry engine shared by every backend.
///
/// Backend differences are carried as data: the [`ViewProfile`] and the
/// fraction of the stroke width by which rectangles grow outwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformer {
    profile: ViewProfile,
    rect_outset: f32,
    output_width: u32,
    output_height: u32,
}

impl Transformer {
    pub fn new(profile: ViewProfile, rect_outset: f32, output_width: u32, output_height: u32) -> Self {
        Self {
            profile,
            rect_outset,
            output_width,
            output_height,
        }
    }

    pub fn output_width(&self) -> u32 {
        self.output_width
    }

    pub fn output_height(&self) -> u32 {
        self.output_height
    }

    /// Build the view matrix for a magnification (destination DPI / source DPI)
    /// and a page rotation.
    pub fn view_matrix(&self, magnification: f32, rotation: ViewRotation) -> Matrix {
        let step = self.profile.steps[rotation.index()];
        let mut view = self
            .profile
            .device
            .prepend(&Matrix::scale(magnification, magnification));
        if let Some(degrees) = step.rotate {
            view = view.prepend(&Matrix::rotate(degrees));
        }
        let (wx, hy) = step.shift;
        if wx != 0.0 || hy != 0.0 {
            view = view.append(&Matrix::translate(
                wx * self.output_width as f32,
                hy * self.output_height as f32,
            ));
        }
        view
    }

    /// Apply `source`, then `view`, to a point.
    #[inline]
    pub fn transform_point(&self, x: f32, y: f32, source: &Matrix, view: &Matrix) -> (f32, f32) {
        let (x, y) = source.apply(x, y);
        view.apply(x, y)
    }

    /// Apply `source`, then `view`, to a vector (translation ignored).
    #[inline]
    pub fn transform_vector(&self, x: f32, y: f32, source: &Matrix, view: &Matrix) -> (f32, f32) {
        let (x, y) = source.apply_vector(x, y);
        view.apply_vector(x, y)
    }

    /// Length of `(length, 0)` after both transforms, truncated to whole dots.
    pub fn transform_length(&self, length: f32, source: &Matrix, view: &Matrix) -> f32 {
        let (x, y) = self.transform_vector(length, 0.0, source, view);
        let norm = (x as f64).hypot(y as f64);
        norm.trunc() as f32
    }

    pub fn rotation_sector(&self, source: &Matrix, view: &Matrix) -> RotationSector {
        let (x, y) = self.transform_vector(10.0, 0.0, source, view);
        let mut degrees = (y as f64).atan2(x as f64).to_degrees();
        if degrees < 0.0 {
            degrees += 360.0;
        }
        let quarter = (degrees / 90.0).round_ties_even() as i64;
        RotationSector::new(quarter.rem_euclid(4) as u8)
    }

    fn corners(&self, x1: f32, y1: f32, x2: f32, y2: f32, source: &Matrix, view: &Matrix) -> (f32, f32, f32, f32) {
        let (sx, sy) = self.transform_point(x1, y1, source, view);
        let (ex, ey) = self.transform_point(x2, y2, source, view);
        let (sx, ex) = ordered(sx, ex);
        let (sy, ey) = ordered(sy, ey);
        (sx, sy, ex, ey)
    }

    /// Line end points in device space (no stroke bias).
    pub fn line(&self, line: &LineShape, stroke_width: f32, source: &Matrix, view: &Matrix) -> DeviceBounds {
        let (start_x, start_y, end_x, end_y) = self.corners(line.x1, line.y1, line.x2, line.y2, source, view);
        DeviceBounds {
            start_x,
            start_y,
            end_x,
            end_y,
            stroke_width: self.transform_length(stroke_width, source, view),
        }
    }

    /// Rectangle outline in device space, grown outwards by the backend's
    /// share of the stroke width.
    pub fn rect(&self, rect: &RectShape, stroke_width: f32, source: &Matrix, view: &Matrix) -> DeviceBounds {
        let (start_x, start_y, end_x, end_y) = self.corners(
            rect.x,
            rect.y,
            rect.x + rect.width,
            rect.y + rect.height,
            source,
            view,
        );
        let stroke_width = self.transform_length(stroke_width, source, view);
        DeviceBounds {
            start_x,
            start_y,
            end_x,
            end_y,
            stroke_width,
        }
        .outset(stroke_width * self.rect_outset)
    }

    /// Image placement in device space.
    pub fn image(&self, image: &ImageRef, source: &Matrix, view: &Matrix) -> DeviceImage {
        let (start_x, start_y, end_x, end_y) = self.corners(
            image.x,
            image.y,
            image.x + image.width,
            image.y + image.height,
            source,
            view,
        );
        DeviceImage {
            start_x,
            start_y,
            end_x,
            end_y,
            alignment_width: self.transform_length(image.width, source, view),
            alignment_height: self.transform_length(image.height, source, view),
        }
    }

    /// Text anchor in device space.
    ///
    /// The anchor is lifted by `font_size / line_height_factor` in document
    /// space before projection, and the font size is transformed as a length.
    pub fn text(&self, metrics: &TextMetrics, source: &Matrix, view: &Matrix) -> DeviceText {
        let y = metrics.y - TextMetrics::anchor_offset(metrics.font_size, metrics.line_height_factor);
        let (x, y) = self.transform_point(metrics.x, y, source, view);
        DeviceText {
            x,
            y,
            font_size: self.transform_length(metrics.font_size, source, view),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
