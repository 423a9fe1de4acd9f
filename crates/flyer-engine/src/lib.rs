//! Flyer rendering for the Linkz resource pages.
//!
//! Resolves a page `type` to its template, rasterizes a QR code for the
//! destination URL, and composites it onto the template's background art.
//! Everything here is synchronous and free of I/O; loading the background
//! and delivering the result is the caller's job.

pub mod breadcrumb;
pub mod compose;
pub mod export;
pub mod qr;
pub mod resize;
pub mod template;

pub use breadcrumb::{Breadcrumb, resource_label};
pub use compose::compose_flyer;
pub use export::{download_file_name, encode_png};
pub use qr::{DEFAULT_EC_LEVEL, parse_ec_level, render_qr};
pub use template::{QrPlacement, TemplateDescriptor, TemplateError, resolve_template};

pub use qrcode::EcLevel;

use image::{DynamicImage, RgbaImage};
use tracing::debug;

/// Flyer canvas width in pixels (background art is scaled to this).
pub const CANVAS_WIDTH: u32 = 650;

/// Flyer canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 522;

/// Unified error type for the flyer-engine crate.
#[derive(Debug, thiserror::Error)]
pub enum FlyerError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("destination URL is empty")]
    EmptyUrl,

    #[error("QR encode error: {0}")]
    QrEncode(#[from] qrcode::types::QrError),

    #[error("QR target size must be non-zero")]
    ZeroQrSize,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Render a complete flyer: QR for `url` composited onto `background`.
///
/// `url` is trimmed first; an empty result is rejected.
pub fn render_flyer(
    template: &TemplateDescriptor,
    background: &DynamicImage,
    url: &str,
    ec_level: EcLevel,
) -> Result<RgbaImage, FlyerError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(FlyerError::EmptyUrl);
    }

    let qr = render_qr(url, template.qr.size, ec_level)?;
    debug!(
        template = %template.id,
        qr_size = template.qr.size,
        "QR rendered, compositing flyer"
    );
    Ok(compose_flyer(background, template, &qr))
}
