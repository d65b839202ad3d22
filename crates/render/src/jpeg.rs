//! JPEG encoding of Cairo surfaces

use cairo::ImageSurface;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::error::RenderError;

/// JPEG quality used for every frame
pub const JPEG_QUALITY: u8 = 85;

/// Encode an `Rgb24` image surface as JPEG.
///
/// The surface must not have a live `Context` attached.
pub fn encode_surface(surface: &ImageSurface, quality: u8) -> Result<Vec<u8>, RenderError> {
    let width = surface.width();
    let height = surface.height();
    if width <= 0 || height <= 0 {
        return Err(RenderError::InvalidSize { width, height });
    }

    let stride = surface.stride() as usize;
    let (w, h) = (width as usize, height as usize);
    let mut rgb = Vec::with_capacity(w * h * 3);

    surface.with_data(|data| {
        for row in data.chunks(stride).take(h) {
            for px in row[..w * 4].chunks_exact(4) {
                // Rgb24 pixels are native-endian 0x00RRGGBB words
                let word = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
                rgb.extend_from_slice(&[(word >> 16) as u8, (word >> 8) as u8, word as u8]);
            }
        }
    })?;

    let mut out = Vec::with_capacity(w * h / 8);
    JpegEncoder::new_with_quality(&mut out, quality).encode(
        &rgb,
        width as u32,
        height as u32,
        ExtendedColorType::Rgb8,
    )?;
    Ok(out)
}
