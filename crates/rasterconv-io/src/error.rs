/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] rasterconv_image::ImageError),

    /// Error to decode or encode the image.
    #[error("Failed to decode or encode the image. {0}")]
    ImageCodecError(#[from] image::ImageError),

    /// The decoded color type has no 8-bit equivalent.
    #[error("Unsupported image format: {0:?}")]
    UnsupportedImageFormat(image::ColorType),

    /// The image has a number of channels that can not be encoded.
    #[error("Unsupported number of channels: {0}")]
    UnsupportedChannelCount(usize),
}
