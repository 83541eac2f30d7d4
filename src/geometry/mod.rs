//! # Geometry
//!
//! Affine matrices and the transform engine that projects document
//! geometry into device dots.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`matrix`] | 2×3 affine matrix and its composition rules |
//! | [`transformer`] | Point/vector/length projection, rotation sectors, shape transforms |

pub mod matrix;
pub mod transformer;

pub use matrix::Matrix;
pub use transformer::{
    DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH, DeviceBounds, DeviceImage, DeviceText, RotationSector,
    TextMetrics, Transformer, ViewProfile, ViewRotation,
};
