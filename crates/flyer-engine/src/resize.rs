//! Background scaling onto the flyer canvas.
//!
//! Background art ships at print resolution and is stretched to the
//! canvas the same way a 2D canvas `drawImage(img, 0, 0, w, h)` call does.

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

/// Filter used for background scaling. Fixed so output is reproducible.
pub const BACKGROUND_FILTER: FilterType = FilterType::Triangle;

/// Stretch an image to exactly `width` x `height` (aspect ratio is not kept).
///
/// Returns the pixels unchanged if the image already matches.
pub fn stretch_to_canvas(img: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    let (orig_w, orig_h) = (img.width(), img.height());

    if (orig_w, orig_h) == (width, height) {
        debug!(width, height, "Background already at canvas size, skipping resize");
        return img.to_rgba8();
    }

    debug!(
        orig_w,
        orig_h,
        new_width = width,
        new_height = height,
        "Scaling background to canvas"
    );

    img.resize_exact(width, height, BACKGROUND_FILTER).to_rgba8()
}
