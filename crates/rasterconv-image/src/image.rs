use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use rasterconv_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.width as u32, size.height as u32]
    }
}

/// Number of samples needed to store an image, or `None` on overflow.
fn num_samples(size: ImageSize, channels: usize) -> Option<usize> {
    size.width.checked_mul(size.height)?.checked_mul(channels)
}

fn check_dims(size: ImageSize, channels: usize) -> Result<(), ImageError> {
    if size.width == 0 || size.height == 0 {
        return Err(ImageError::InvalidImageSize(size.width, size.height));
    }
    if channels == 0 {
        return Err(ImageError::InvalidChannelCount(channels));
    }
    Ok(())
}

/// Represents an image with interleaved pixel data.
///
/// The samples are stored row-major with the channels of a pixel adjacent to each
/// other, so the sample at column `x`, row `y` and channel `c` lives at
/// [`Image::offset`]`(x, y, c) = (y * width + x) * channels + c`.
///
/// The dimensions are validated once at construction; afterwards the buffer length
/// always equals `width * height * channels`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T> {
    size: ImageSize,
    channels: usize,
    data: Vec<T>,
}

impl<T> Image<T> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `channels` - The number of samples per pixel.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If any dimension is zero or the length of the pixel data does not match the
    /// image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rasterconv_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     3,
    ///     vec![0u8; 10 * 20 * 3],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, channels: usize, data: Vec<T>) -> Result<Self, ImageError> {
        check_dims(size, channels)?;

        // check if the data length matches the image size
        let expected = num_samples(size, channels).unwrap_or(usize::MAX);
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// Create a new image with the given size, filled with `val`.
    ///
    /// The buffer is reserved fallibly, so running out of memory is reported as
    /// [`ImageError::AllocationFailed`] instead of aborting the process.
    ///
    /// # Examples
    ///
    /// ```
    /// use rasterconv_image::{Image, ImageSize};
    ///
    /// let image = Image::from_size_val([10, 20].into(), 1, 7u8).unwrap();
    ///
    /// assert_eq!(image.as_slice().len(), 200);
    /// assert!(image.as_slice().iter().all(|&v| v == 7));
    /// ```
    pub fn from_size_val(size: ImageSize, channels: usize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        check_dims(size, channels)?;

        let len = num_samples(size, channels).ok_or(ImageError::AllocationFailed(usize::MAX))?;
        let num_bytes = len.saturating_mul(std::mem::size_of::<T>());

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| ImageError::AllocationFailed(num_bytes))?;
        data.resize(len, val);

        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        self.channels
    }

    /// Number of samples in one row of the image, `width * channels`.
    pub fn row_stride(&self) -> usize {
        self.size.width * self.channels
    }

    /// Index of the sample at column `x`, row `y` and channel `c` in the buffer.
    ///
    /// No bounds checking is done here; callers validate coordinates at the boundary.
    #[inline(always)]
    pub fn offset(&self, x: usize, y: usize, c: usize) -> usize {
        (y * self.size.width + x) * self.channels + c
    }

    fn check_index(&self, x: usize, y: usize, c: usize) -> Result<(), ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }
        if c >= self.channels {
            return Err(ImageError::ChannelIndexOutOfBounds(c, self.channels));
        }
        Ok(())
    }

    /// Get a reference to a sample, or `None` if the coordinates are out of bounds.
    pub fn get(&self, x: usize, y: usize, c: usize) -> Option<&T> {
        self.check_index(x, y, c).ok()?;
        self.data.get(self.offset(x, y, c))
    }

    /// Set the value of a sample.
    ///
    /// # Errors
    ///
    /// If the pixel or channel index is out of bounds, an error is returned.
    pub fn set(&mut self, x: usize, y: usize, c: usize, val: T) -> Result<(), ImageError> {
        self.check_index(x, y, c)?;
        let idx = self.offset(x, y, c);
        self.data[idx] = val;
        Ok(())
    }

    /// Check that `other` has the same size and number of channels.
    pub fn check_same_shape<U>(&self, other: &Image<U>) -> Result<(), ImageError> {
        if self.size != other.size || self.channels != other.channels {
            return Err(ImageError::SizeMismatch(
                self.width(),
                self.height(),
                self.channels,
                other.width(),
                other.height(),
                other.channels,
            ));
        }
        Ok(())
    }

    /// Get the pixel data of the image as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data of the image as a mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return the pixel buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get a channel of the image.
    ///
    /// # Errors
    ///
    /// If the channel index is out of bounds, an error is returned.
    pub fn channel(&self, channel: usize) -> Result<Image<T>, ImageError>
    where
        T: Copy,
    {
        if channel >= self.channels {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, self.channels));
        }

        let channel_data = self
            .data
            .iter()
            .skip(channel)
            .step_by(self.channels)
            .copied()
            .collect();

        Image::new(self.size, 1, channel_data)
    }
}
