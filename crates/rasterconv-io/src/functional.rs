use std::path::Path;

use rasterconv_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate
/// (jpeg, png, bmp, tga, ...). The image keeps the channel count of the file:
/// grayscale gives 1 channel, grayscale with alpha 2, RGB 3 and RGBA 4. Samples
/// wider than 8 bits are converted to 8 bits.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<Image<u8>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let (channels, data) = match img.color() {
        image::ColorType::L8 | image::ColorType::L16 => (1, img.into_luma8().into_raw()),
        image::ColorType::La8 | image::ColorType::La16 => (2, img.into_luma_alpha8().into_raw()),
        image::ColorType::Rgb8 | image::ColorType::Rgb16 | image::ColorType::Rgb32F => {
            (3, img.into_rgb8().into_raw())
        }
        image::ColorType::Rgba8 | image::ColorType::Rgba16 | image::ColorType::Rgba32F => {
            (4, img.into_rgba8().into_raw())
        }
        color => return Err(IoError::UnsupportedImageFormat(color)),
    };

    Ok(Image::new(size, channels, data)?)
}

/// Writes the given image to a PNG file.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG image.
/// * `image` - The image with 1, 2, 3 or 4 channels.
pub fn write_image_png(file_path: impl AsRef<Path>, image: &Image<u8>) -> Result<(), IoError> {
    let color = match image.num_channels() {
        1 => image::ColorType::L8,
        2 => image::ColorType::La8,
        3 => image::ColorType::Rgb8,
        4 => image::ColorType::Rgba8,
        n => return Err(IoError::UnsupportedChannelCount(n)),
    };

    let [width, height]: [u32; 2] = image.size().into();

    image::save_buffer_with_format(
        file_path,
        image.as_slice(),
        width,
        height,
        color,
        image::ImageFormat::Png,
    )?;

    Ok(())
}
