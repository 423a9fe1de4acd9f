//! Flyer composition: background, white QR backing, QR overlay.

use image::{DynamicImage, GrayImage, Rgba, RgbaImage, imageops};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::resize::stretch_to_canvas;
use crate::template::TemplateDescriptor;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Composite `qr` onto `background` using the template's geometry.
///
/// The background is stretched to the canvas, the QR rectangle is filled
/// white so low-contrast art cannot bleed through, then the QR is copied
/// in unsmoothed. Pixels outside the canvas are clipped.
pub fn compose_flyer(
    background: &DynamicImage,
    template: &TemplateDescriptor,
    qr: &GrayImage,
) -> RgbaImage {
    let (width, height) = template.canvas_size();
    let mut canvas = stretch_to_canvas(background, width, height);

    let placement = template.qr;
    draw_filled_rect_mut(
        &mut canvas,
        Rect::at(placement.x as i32, placement.y as i32).of_size(placement.size, placement.size),
        WHITE,
    );

    let qr_rgba = DynamicImage::ImageLuma8(qr.clone()).to_rgba8();
    imageops::replace(&mut canvas, &qr_rgba, placement.x.into(), placement.y.into());

    canvas
}
