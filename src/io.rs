// Save the canvas as PNG and open images back into a canvas.
// Visual: nothing on screen changes on save; on load the window shows the file.

use std::path::Path;

use image::ImageFormat;

use crate::buffer::PixelBuffer;
use crate::error::Error;

/// Write `buffer` as a lossless PNG. The extension of `path` is not consulted.
pub fn save_png(buffer: &PixelBuffer, path: &Path) -> Result<(), Error> {
    buffer
        .to_image()
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| Error::Persistence { path: path.to_path_buf(), source })
}

/// Decode any image format the `image` crate knows, dropping alpha.
pub fn load_image(path: &Path) -> Result<PixelBuffer, Error> {
    let img = image::open(path)
        .map_err(|source| Error::Persistence { path: path.to_path_buf(), source })?;
    let rgb = img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(Error::InvalidDimensions { width: rgb.width() as usize, height: rgb.height() as usize });
    }
    Ok(PixelBuffer::from_image(&rgb))
}
