//! Filter operations
//!
//! This module provides the 3x3 convolution used to filter raster images.

/// Filter kernels
pub mod kernels;
pub use kernels::{Kernel3x3, KernelType};

/// Filter operations
mod ops;
pub use ops::*;
