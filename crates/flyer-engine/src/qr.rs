//! QR code rasterization for flyer overlays.

use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode};

use crate::FlyerError;

/// Error correction used for flyers unless configured otherwise.
pub const DEFAULT_EC_LEVEL: EcLevel = EcLevel::L;

const DARK: u8 = 0;
const LIGHT: u8 = 255;

/// Parse an error correction level name (`L`, `M`, `Q`, `H`).
pub fn parse_ec_level(s: &str) -> Option<EcLevel> {
    match s.trim().to_ascii_uppercase().as_str() {
        "L" => Some(EcLevel::L),
        "M" => Some(EcLevel::M),
        "Q" => Some(EcLevel::Q),
        "H" => Some(EcLevel::H),
        _ => None,
    }
}

/// Render `data` as a `size` x `size` black-on-white QR bitmap.
///
/// Each module becomes a nearest-neighbour block of `size / modules`
/// pixels with floored offsets, so the code fills the square exactly even
/// when the scale is fractional. No quiet zone is drawn.
pub fn render_qr(data: &str, size: u32, ec_level: EcLevel) -> Result<GrayImage, FlyerError> {
    if size == 0 {
        return Err(FlyerError::ZeroQrSize);
    }

    let code = QrCode::with_error_correction_level(data.as_bytes(), ec_level)?;
    let modules = code.to_colors();
    let module_count = code.width();

    let scale = f64::from(size) / module_count as f64;
    let block = scale.ceil() as u32;

    tracing::debug!(module_count, size, scale, "Rasterizing QR modules");

    let mut img = GrayImage::from_pixel(size, size, Luma([LIGHT]));

    for (i, color) in modules.iter().enumerate() {
        let x = (i % module_count) as f64;
        let y = (i / module_count) as f64;
        let value = if *color == Color::Dark { DARK } else { LIGHT };

        for dy in 0..block {
            for dx in 0..block {
                let px = (x * scale + f64::from(dx)).floor() as u32;
                let py = (y * scale + f64::from(dy)).floor() as u32;
                if px < size && py < size {
                    img.put_pixel(px, py, Luma([value]));
                }
            }
        }
    }

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark_pixels(img: &GrayImage) -> usize {
        img.pixels().filter(|p| p[0] == DARK).count()
    }

    #[test]
    fn render_qr_is_square_at_requested_size() {
        let img = render_qr("https://example.com", 267, DEFAULT_EC_LEVEL).unwrap();
        assert_eq!(img.dimensions(), (267, 267));
    }

    #[test]
    fn dark_pixels_match_encoder_modules_at_integer_scale() {
        let url = "https://example.com/resources/xseries";
        let code = QrCode::with_error_correction_level(url.as_bytes(), DEFAULT_EC_LEVEL).unwrap();
        let dark_modules = code.to_colors().iter().filter(|c| **c == Color::Dark).count();
        let scale = 4u32;
        let size = code.width() as u32 * scale;

        let img = render_qr(url, size, DEFAULT_EC_LEVEL).unwrap();
        assert_eq!(dark_pixels(&img), dark_modules * (scale * scale) as usize);
    }

    #[test]
    fn each_module_maps_to_its_block() {
        let url = "https://example.com";
        let code = QrCode::with_error_correction_level(url.as_bytes(), DEFAULT_EC_LEVEL).unwrap();
        let width = code.width();
        let colors = code.to_colors();
        let scale = 3u32;
        let img = render_qr(url, width as u32 * scale, DEFAULT_EC_LEVEL).unwrap();

        for (i, color) in colors.iter().enumerate() {
            let px = (i % width) as u32 * scale + 1;
            let py = (i / width) as u32 * scale + 1;
            let expected = if *color == Color::Dark { DARK } else { LIGHT };
            assert_eq!(img.get_pixel(px, py)[0], expected);
        }
    }

    #[test]
    fn fractional_scale_leaves_no_gaps() {
        let img = render_qr("https://example.com/a", 267, DEFAULT_EC_LEVEL).unwrap();
        assert!(img.pixels().all(|p| p[0] == DARK || p[0] == LIGHT));
        // Finder pattern corner is always dark.
        assert_eq!(img.get_pixel(0, 0)[0], DARK);
        assert_eq!(img.get_pixel(266, 0)[0], DARK);
        assert_eq!(img.get_pixel(0, 266)[0], DARK);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            render_qr("x", 0, DEFAULT_EC_LEVEL),
            Err(FlyerError::ZeroQrSize)
        ));
    }

    #[test]
    fn oversized_payload_fails_to_encode() {
        let data = "x".repeat(8000);
        assert!(matches!(
            render_qr(&data, 267, EcLevel::H),
            Err(FlyerError::QrEncode(_))
        ));
    }

    #[test]
    fn parses_ec_levels() {
        assert_eq!(parse_ec_level("l"), Some(EcLevel::L));
        assert_eq!(parse_ec_level(" H "), Some(EcLevel::H));
        assert_eq!(parse_ec_level("Z"), None);
    }
}
