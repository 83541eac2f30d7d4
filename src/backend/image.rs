//! Image placement and upload helpers shared by the image translators.

use image::RgbaImage;

use crate::config::ImageMode;
use crate::document::{ImageRef, Node};
use crate::error::Result;
use crate::geometry::{DeviceImage, RotationSector};
use crate::raster::ImageSource;
use crate::render::{ImageCache, RenderPass, Segment};

/// Custom attribute forcing an uncached inline raster write for one image.
pub const DIRECT_WRITE_ATTRIBUTE: &str = "data-direct-write";

/// Device position and raster size of one image element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub device: DeviceImage,
    pub sector: RotationSector,
    pub horizontal_start: i32,
    pub vertical_start: i32,
}

impl ImagePlacement {
    pub fn new(device: DeviceImage, sector: RotationSector) -> Self {
        Self {
            device,
            sector,
            horizontal_start: device.start_x as i32,
            vertical_start: device.start_y as i32,
        }
    }

    /// Raster size to request from the image source, before rotation.
    pub fn raster_size(&self) -> (u32, u32) {
        (
            self.device.alignment_width.max(0.0) as u32,
            self.device.alignment_height.max(0.0) as u32,
        )
    }

    /// Ask the pass's image source for device pixels.
    pub fn load(&self, image: &ImageRef, pass: &RenderPass<'_>) -> Option<RgbaImage> {
        let (width, height) = self.raster_size();
        pass.image_source.load(image, width, height, self.sector)
    }

    /// Resolve the stored variable name, uploading the bitmap on first use.
    ///
    /// `store` turns the fresh name and the pixels into header segments.
    /// `None` means the source had no pixels and nothing must be printed.
    pub fn resolve_stored<F>(
        &self,
        node: &Node<'_>,
        image: &ImageRef,
        pass: &mut RenderPass<'_>,
        store: F,
    ) -> Result<Option<String>>
    where
        F: FnOnce(&str, RgbaImage) -> Vec<Segment>,
    {
        let key = ImageCache::key(self.sector, node.id(), &node.document.id);
        let (width, height) = self.raster_size();
        let sector = self.sector;
        let source = pass.image_source;
        pass.images.resolve(&key, &mut pass.container, |name| {
            Ok(source.load(image, width, height, sector).map(|pixels| store(name, pixels)))
        })
    }
}

/// Whether an image should bypass the cache and be written inline.
pub fn wants_direct_write(node: &Node<'_>, mode: ImageMode) -> bool {
    mode == ImageMode::Direct
        || node
            .attribute(DIRECT_WRITE_ATTRIBUTE)
            .is_some_and(|v| !v.eq_ignore_ascii_case("false"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ComputedStyle, Document, Element};

    #[test]
    fn test_placement_truncates_start() {
        let device = DeviceImage {
            start_x: 10.9,
            start_y: -3.7,
            end_x: 40.0,
            end_y: 20.0,
            alignment_width: 30.0,
            alignment_height: 23.0,
        };
        let p = ImagePlacement::new(device, RotationSector::NONE);
        assert_eq!((p.horizontal_start, p.vertical_start), (10, -3));
        assert_eq!(p.raster_size(), (30, 23));
    }

    #[test]
    fn test_direct_write_selection() {
        let doc = Document::default();
        let plain = Element::image(0.0, 0.0, 1.0, 1.0, None);
        let forced = plain.clone().with_attribute(DIRECT_WRITE_ATTRIBUTE, "true");
        let off = plain.clone().with_attribute(DIRECT_WRITE_ATTRIBUTE, "false");
        fn node<'a>(element: &'a Element, doc: &'a Document) -> Node<'a> {
            Node::new(element, None, doc, ComputedStyle::default())
        }

        assert!(!wants_direct_write(&node(&plain, &doc), ImageMode::Store));
        assert!(wants_direct_write(&node(&plain, &doc), ImageMode::Direct));
        assert!(wants_direct_write(&node(&forced, &doc), ImageMode::Store));
        assert!(!wants_direct_write(&node(&off, &doc), ImageMode::Store));
    }
}
