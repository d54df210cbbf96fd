#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use rasterconv_image as image;

#[doc(inline)]
pub use rasterconv_imgproc as imgproc;

#[doc(inline)]
pub use rasterconv_io as io;
