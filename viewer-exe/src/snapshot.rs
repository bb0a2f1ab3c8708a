use std::error::Error;
use std::path::Path;

use image::{RgbaImage, imageops};
use render_trait::PixelBuffer;

/// Copy the frame out to an RGBA image, blown up `scale` times with nearest
/// neighbour sampling so the pixels stay square
pub fn frame_to_image(buffer: &impl PixelBuffer, scale: usize) -> Result<RgbaImage, Box<dyn Error>> {
    let size = buffer.size();
    let (width, height) = (size.width_usize() as u32, size.height_usize() as u32);
    let image = RgbaImage::from_raw(width, height, buffer.buf().to_vec())
        .ok_or("frame buffer is smaller than its size")?;
    if scale <= 1 {
        return Ok(image);
    }
    let scale = scale as u32;
    Ok(imageops::resize(
        &image,
        width * scale,
        height * scale,
        imageops::FilterType::Nearest,
    ))
}

pub fn save_png(
    buffer: &impl PixelBuffer,
    scale: usize,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let image = frame_to_image(buffer, scale)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
