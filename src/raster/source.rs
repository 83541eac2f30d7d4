//! # Image Sources
//!
//! The renderer never decodes images itself. It asks an [`ImageSource`] for
//! an RGBA buffer of a given device size, already rotated to the device
//! orientation. `None` means "no image for this node" and is not an error:
//! the translators then emit nothing for that node.
//!
//! [`EmbeddedImageSource`] is the default implementation: it reads `data:`
//! URIs (or bare base64) from the image's `href`, decodes them with the
//! `image` crate, fits them into the requested box and rotates them.
//!
//! ## Fitting
//!
//! ```text
//! box ratio ≈ image ratio (within 0.5)  ->  stretch to the box
//! otherwise                             ->  scale to fit, center, transparent margins
//! ```
//!
//! ## Rotation
//!
//! | Sector | Rotation (clockwise) |
//! |--------|----------------------|
//! | 0 | none |
//! | 1 | 90° |
//! | 2 | 180° |
//! | 3 | 270° |

use base64::Engine;
use image::{RgbaImage, imageops, imageops::FilterType};

use crate::document::ImageRef;
use crate::geometry::RotationSector;

/// Produces device-ready pixel buffers for image nodes.
pub trait ImageSource: Send + Sync {
    /// Pixels for `image` at `width` x `height` device dots (before
    /// rotation), rotated clockwise by `sector` quarter turns.
    fn load(&self, image: &ImageRef, width: u32, height: u32, sector: RotationSector) -> Option<RgbaImage>;
}

impl<F> ImageSource for F
where
    F: Fn(&ImageRef, u32, u32, RotationSector) -> Option<RgbaImage> + Send + Sync,
{
    fn load(&self, image: &ImageRef, width: u32, height: u32, sector: RotationSector) -> Option<RgbaImage> {
        self(image, width, height, sector)
    }
}

/// Decodes base64 image data embedded in the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedImageSource {
    pub filter: Option<FilterType>,
}

impl EmbeddedImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn decode(href: &str) -> Option<RgbaImage> {
        let payload = match href.strip_prefix("data:") {
            Some(rest) => {
                let (meta, data) = rest.split_once(',')?;
                if !meta.ends_with(";base64") {
                    log::warn!("unsupported data URI encoding '{}'", meta);
                    return None;
                }
                data
            }
            None => href,
        };
        let bytes = match base64::engine::general_purpose::STANDARD.decode(payload.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("image data is not valid base64: {}", e);
                return None;
            }
        };
        match image::load_from_memory(&bytes) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                log::warn!("failed to decode embedded image: {}", e);
                None
            }
        }
    }
}

impl ImageSource for EmbeddedImageSource {
    fn load(&self, image: &ImageRef, width: u32, height: u32, sector: RotationSector) -> Option<RgbaImage> {
        if width == 0 || height == 0 {
            return None;
        }
        let decoded = Self::decode(image.href.as_deref()?)?;
        let fitted = fit(&decoded, width, height, self.filter.unwrap_or(FilterType::Triangle));
        Some(rotate(fitted, sector))
    }
}

/// Scale `src` into a `width` x `height` box, preserving its aspect ratio
/// unless it is already close to the box's.
pub fn fit(src: &RgbaImage, width: u32, height: u32, filter: FilterType) -> RgbaImage {
    if src.width() == 0 || src.height() == 0 {
        return RgbaImage::new(width, height);
    }
    let box_ratio = width as f32 / height as f32;
    let image_ratio = src.width() as f32 / src.height() as f32;

    if (box_ratio - image_ratio).abs() < 0.5 {
        return imageops::resize(src, width, height, filter);
    }

    let (fit_width, fit_height) = if box_ratio < image_ratio {
        (width, (width as f32 / image_ratio) as u32)
    } else {
        ((height as f32 * image_ratio) as u32, height)
    };
    let fit_width = fit_width.max(1);
    let fit_height = fit_height.max(1);
    let x = (width.saturating_sub(fit_width)) / 2;
    let y = (height.saturating_sub(fit_height)) / 2;

    let scaled = imageops::resize(src, fit_width, fit_height, filter);
    let mut canvas = RgbaImage::new(width, height);
    imageops::overlay(&mut canvas, &scaled, x as i64, y as i64);
    canvas
}

/// Rotate clockwise by the sector's quarter turns.
pub fn rotate(image: RgbaImage, sector: RotationSector) -> RgbaImage {
    match sector.value() {
        1 => imageops::rotate90(&image),
        2 => imageops::rotate180(&image),
        3 => imageops::rotate270(&image),
        _ => image,
    }
}
