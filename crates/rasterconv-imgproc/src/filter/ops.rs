use rasterconv_image::{Image, ImageError};

use super::{Kernel3x3, KernelType};
use crate::parallel::{self, ExecutionStrategy, ParallelError, RowRange};

/// An error type for the filter operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// Error with the source or destination image, including allocation failures.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error spawning or configuring the workers.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}

/// Round to the nearest integer and wrap into `u8`.
///
/// Out of range values wrap modulo 256, they are not saturated.
#[inline(always)]
fn wrap_to_u8(value: f64) -> u8 {
    value.round() as i64 as u8
}

/// Compute one output sample, assuming `x`, `y` and `ch` are inside `src`.
#[inline(always)]
fn sample_pixel_unchecked(
    src: &Image<u8>,
    x: usize,
    y: usize,
    ch: usize,
    kernel: &Kernel3x3,
) -> u8 {
    debug_assert!(x < src.width() && y < src.height() && ch < src.num_channels());

    let data = src.as_slice();

    // replicate the border pixels for the out of bounds neighbours
    let cols = [x.saturating_sub(1), x, (x + 1).min(src.width() - 1)];
    let rows = [y.saturating_sub(1), y, (y + 1).min(src.height() - 1)];

    let mut sum = 0.0f64;
    for (kernel_row, &row) in kernel.0.iter().zip(rows.iter()) {
        for (&weight, &col) in kernel_row.iter().zip(cols.iter()) {
            let val = unsafe { *data.get_unchecked(src.offset(col, row, ch)) };
            sum += weight * val as f64;
        }
    }

    wrap_to_u8(sum)
}

/// Compute the convolved value of one sample of an image.
///
/// The 3x3 neighbourhood is centered at `(x, y)`; neighbours outside the image reuse
/// the nearest edge pixel. The weighted sum is accumulated in `f64`, rounded to the
/// nearest integer and wrapped modulo 256.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `x` - The column of the sample.
/// * `y` - The row of the sample.
/// * `ch` - The channel of the sample.
/// * `kernel` - The 3x3 kernel.
///
/// # Errors
///
/// If the coordinates are outside the image, an error is returned.
///
/// # Example
///
/// ```
/// use rasterconv_image::Image;
/// use rasterconv_imgproc::filter::{sample_pixel, KernelType};
///
/// let image = Image::new([2, 1].into(), 1, vec![10u8, 20]).unwrap();
///
/// let val = sample_pixel(&image, 0, 0, 0, KernelType::Edge.kernel()).unwrap();
///
/// // 4 * 10 - 10 - 10 - 10 - 20
/// assert_eq!(val, (-10i32) as u8);
/// ```
pub fn sample_pixel(
    src: &Image<u8>,
    x: usize,
    y: usize,
    ch: usize,
    kernel: &Kernel3x3,
) -> Result<u8, ImageError> {
    if x >= src.width() || y >= src.height() {
        return Err(ImageError::PixelIndexOutOfBounds(
            x,
            y,
            src.width(),
            src.height(),
        ));
    }
    if ch >= src.num_channels() {
        return Err(ImageError::ChannelIndexOutOfBounds(ch, src.num_channels()));
    }
    Ok(sample_pixel_unchecked(src, x, y, ch, kernel))
}

/// Convolve the rows of `range`, `dst_rows` holds exactly those rows.
fn convolve_rows(src: &Image<u8>, dst_rows: &mut [u8], kernel: &Kernel3x3, range: RowRange) {
    let channels = src.num_channels();
    dst_rows
        .chunks_exact_mut(src.row_stride())
        .zip(range.rows())
        .for_each(|(dst_row, y)| {
            dst_row
                .chunks_exact_mut(channels)
                .enumerate()
                .for_each(|(x, dst_pixel)| {
                    dst_pixel.iter_mut().enumerate().for_each(|(ch, dst_val)| {
                        *dst_val = sample_pixel_unchecked(src, x, y, ch, kernel);
                    });
                });
        });
}

/// Convolve a range of rows of an image.
///
/// This is the work done by a single worker: every sample of the rows in `range` is
/// computed with [`sample_pixel`] and written to `dst_rows`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst_rows` - The destination rows, length `range.len() * W * C`.
/// * `kernel` - The 3x3 kernel.
/// * `range` - The rows to compute.
///
/// # Errors
///
/// If the range goes past the image or `dst_rows` has the wrong length, an error is
/// returned.
pub fn convolve3x3_rows(
    src: &Image<u8>,
    dst_rows: &mut [u8],
    kernel: &Kernel3x3,
    range: RowRange,
) -> Result<(), ImageError> {
    if range.start > range.end || range.end > src.height() {
        return Err(ImageError::PixelIndexOutOfBounds(
            0,
            range.end,
            src.width(),
            src.height(),
        ));
    }

    let expected = range.len() * src.row_stride();
    if dst_rows.len() != expected {
        return Err(ImageError::InvalidChannelShape(dst_rows.len(), expected));
    }

    convolve_rows(src, dst_rows, kernel, range);

    Ok(())
}

/// Convolve an image with a 3x3 kernel into a preallocated destination.
///
/// The rows are partitioned across the workers of `strategy`, each worker writes
/// only its own rows, and the call blocks until all of them are done.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_type` - The kernel to apply.
/// * `strategy` - How many workers to use and where to run them.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn convolve3x3_into(
    src: &Image<u8>,
    dst: &mut Image<u8>,
    kernel_type: KernelType,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    src.check_same_shape(&*dst)?;

    let kernel = kernel_type.kernel();
    let num_workers = strategy.num_workers();

    log::debug!(
        "convolving {}x{}x{} image with {} kernel on {} workers",
        src.width(),
        src.height(),
        src.num_channels(),
        kernel_type,
        num_workers,
    );

    parallel::par_for_each_row_range(
        dst.as_slice_mut(),
        src.row_stride(),
        src.height(),
        strategy,
        |range, dst_rows| convolve_rows(src, dst_rows, kernel, range),
    )?;

    Ok(())
}

/// Convolve an image with a 3x3 kernel.
///
/// Allocates a destination with the same size and channels as `src` and fills it
/// with [`convolve3x3_into`].
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel_type` - The kernel to apply.
/// * `strategy` - How many workers to use and where to run them.
///
/// # Returns
///
/// The convolved image.
///
/// # Example
///
/// ```
/// use rasterconv_image::Image;
/// use rasterconv_imgproc::{filter::{convolve3x3, KernelType}, parallel::ExecutionStrategy};
///
/// let image = Image::from_size_val([4, 4].into(), 1, 100u8).unwrap();
///
/// let blurred = convolve3x3(&image, KernelType::Blur, ExecutionStrategy::Fixed(2)).unwrap();
///
/// assert!(blurred.as_slice().iter().all(|&v| v == 100));
/// ```
pub fn convolve3x3(
    src: &Image<u8>,
    kernel_type: KernelType,
    strategy: ExecutionStrategy,
) -> Result<Image<u8>, FilterError> {
    let mut dst = Image::from_size_val(src.size(), src.num_channels(), 0u8)?;
    convolve3x3_into(src, &mut dst, kernel_type, strategy)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_3x3() -> Result<Image<u8>, ImageError> {
        Image::new([3, 3].into(), 1, vec![10, 20, 30, 40, 50, 60, 70, 80, 90])
    }

    #[test]
    fn test_wrap_to_u8() {
        assert_eq!(wrap_to_u8(0.0), 0);
        assert_eq!(wrap_to_u8(255.0), 255);
        assert_eq!(wrap_to_u8(256.0), 0);
        assert_eq!(wrap_to_u8(290.0), 34);
        assert_eq!(wrap_to_u8(-1.0), 255);
        assert_eq!(wrap_to_u8(-40.0), 216);
        assert_eq!(wrap_to_u8(27.5), 28);
        assert_eq!(wrap_to_u8(36.4), 36);
        assert_eq!(wrap_to_u8(36.6), 37);
    }

    #[test]
    fn test_identity_ramp() -> Result<(), FilterError> {
        let src = ramp_3x3()?;
        let dst = convolve3x3(&src, KernelType::Identity, ExecutionStrategy::Serial)?;
        assert_eq!(dst.as_slice(), src.as_slice());
        Ok(())
    }

    #[test]
    fn test_blur_rounds_to_nearest() -> Result<(), FilterError> {
        let src = ramp_3x3()?;
        let dst = convolve3x3(&src, KernelType::Blur, ExecutionStrategy::Serial)?;

        // e.g. the top right corner averages to 36.67
        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                23, 30, 37,
                43, 50, 57,
                63, 70, 77,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_rounds_half_away() -> Result<(), FilterError> {
        let src = ramp_3x3()?;
        let dst = convolve3x3(&src, KernelType::GaussianBlur, ExecutionStrategy::Serial)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                20, 28, 35,
                43, 50, 58,
                65, 73, 80,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_edge_wraps_negative() -> Result<(), FilterError> {
        let src = ramp_3x3()?;
        let dst = convolve3x3(&src, KernelType::Edge, ExecutionStrategy::Serial)?;

        // -40, -30, -20 and -10 wrap around instead of clamping to zero
        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                216, 226, 236,
                246, 0, 10,
                20, 30, 40,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_sharpen() -> Result<(), FilterError> {
        let src = ramp_3x3()?;
        let dst = convolve3x3(&src, KernelType::Sharpen, ExecutionStrategy::Serial)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                226, 246, 10,
                30, 50, 70,
                90, 110, 130,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_emboss_wraps_overflow() -> Result<(), FilterError> {
        let src = ramp_3x3()?;
        let dst = convolve3x3(&src, KernelType::Emboss, ExecutionStrategy::Serial)?;

        // 290 and 270 wrap around instead of saturating at 255
        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                130, 170, 150,
                250, 34, 14,
                190, 230, 210,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_sample_pixel_replicates_corner() -> Result<(), ImageError> {
        let src = ramp_3x3()?;

        // only the top left neighbour weight is set, which falls outside the image
        let top_left = Kernel3x3([[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        assert_eq!(sample_pixel(&src, 0, 0, 0, &top_left)?, 10);

        let bottom_right = Kernel3x3([[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(sample_pixel(&src, 2, 2, 0, &bottom_right)?, 90);
        assert_eq!(sample_pixel(&src, 0, 0, 0, &bottom_right)?, 50);

        Ok(())
    }

    #[test]
    fn test_sample_pixel_out_of_bounds() -> Result<(), ImageError> {
        let src = ramp_3x3()?;
        let kernel = KernelType::Identity.kernel();
        assert_eq!(
            sample_pixel(&src, 3, 0, 0, kernel),
            Err(ImageError::PixelIndexOutOfBounds(3, 0, 3, 3))
        );
        assert_eq!(
            sample_pixel(&src, 0, 0, 1, kernel),
            Err(ImageError::ChannelIndexOutOfBounds(1, 1))
        );
        Ok(())
    }

    #[test]
    fn test_convolve_rows_subset() -> Result<(), ImageError> {
        let src = ramp_3x3()?;
        let mut dst_rows = vec![0u8; 3];
        convolve3x3_rows(
            &src,
            &mut dst_rows,
            KernelType::Sharpen.kernel(),
            RowRange { start: 1, end: 2 },
        )?;
        assert_eq!(dst_rows, vec![30, 50, 70]);

        let res = convolve3x3_rows(
            &src,
            &mut dst_rows,
            KernelType::Sharpen.kernel(),
            RowRange { start: 0, end: 2 },
        );
        assert_eq!(res, Err(ImageError::InvalidChannelShape(3, 6)));

        let res = convolve3x3_rows(
            &src,
            &mut dst_rows,
            KernelType::Sharpen.kernel(),
            RowRange { start: 3, end: 4 },
        );
        assert_eq!(res, Err(ImageError::PixelIndexOutOfBounds(0, 4, 3, 3)));
        Ok(())
    }

    #[test]
    fn test_convolve_into_shape_mismatch() -> Result<(), ImageError> {
        let src = ramp_3x3()?;
        let mut dst = Image::from_size_val([3, 3].into(), 3, 0u8)?;
        let res = convolve3x3_into(&src, &mut dst, KernelType::Blur, ExecutionStrategy::Serial);
        assert_eq!(
            res,
            Err(FilterError::Image(ImageError::SizeMismatch(3, 3, 1, 3, 3, 3)))
        );
        Ok(())
    }

    #[test]
    fn test_convolve_fixed_zero_workers() -> Result<(), ImageError> {
        let src = ramp_3x3()?;
        let res = convolve3x3(&src, KernelType::Blur, ExecutionStrategy::Fixed(0));
        assert_eq!(
            res,
            Err(FilterError::Parallel(ParallelError::InvalidThreadCount(0)))
        );
        Ok(())
    }

    #[test]
    fn test_single_pixel() -> Result<(), FilterError> {
        let src = Image::new([1, 1].into(), 2, vec![7u8, 200])?;
        let dst = convolve3x3(&src, KernelType::Sharpen, ExecutionStrategy::Fixed(8))?;
        // all neighbours are the pixel itself, the weights sum to one
        assert_eq!(dst.as_slice(), &[7, 200]);

        let dst = convolve3x3(&src, KernelType::Edge, ExecutionStrategy::Fixed(8))?;
        assert_eq!(dst.as_slice(), &[0, 0]);
        Ok(())
    }
}
