/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the image width or height is zero.
    #[error("Invalid image size: width and height must be > 0, got {0}x{1}")]
    InvalidImageSize(usize, usize),

    /// Error when the number of channels is zero.
    #[error("Invalid number of channels: {0}")]
    InvalidChannelCount(usize),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the pixel buffer could not be allocated.
    #[error("Failed to allocate {0} bytes for the image buffer")]
    AllocationFailed(usize),

    /// Error when the pixel index is out of bounds.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when two images do not share size and channel count.
    #[error("Image size mismatch: {0}x{1}x{2} vs {3}x{4}x{5}")]
    SizeMismatch(usize, usize, usize, usize, usize, usize),
}
