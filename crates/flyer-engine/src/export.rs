//! PNG export for downloads.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::FlyerError;

/// Encode a rendered flyer as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, FlyerError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(buf)
}

/// File name offered when downloading the flyer for `page_type`.
pub fn download_file_name(page_type: &str) -> String {
    format!("{page_type}-flyer.png")
}
