use std::{convert::Infallible, fmt, str::FromStr};

/// A 3x3 convolution kernel stored row-major, indexed as `kernel[dy][dx]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel3x3(pub [[f64; 3]; 3]);

impl Kernel3x3 {
    /// Get the weights of the kernel.
    pub fn weights(&self) -> &[[f64; 3]; 3] {
        &self.0
    }

    /// Sum of all the weights of the kernel.
    pub fn weight_sum(&self) -> f64 {
        self.0.iter().flatten().sum()
    }
}

/// Laplacian edge detection kernel.
pub const EDGE: Kernel3x3 = Kernel3x3([[0.0, -1.0, 0.0], [-1.0, 4.0, -1.0], [0.0, -1.0, 0.0]]);

/// Sharpening kernel.
pub const SHARPEN: Kernel3x3 = Kernel3x3([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]]);

/// Box blur kernel.
pub const BLUR: Kernel3x3 = Kernel3x3([
    [1.0 / 9.0, 1.0 / 9.0, 1.0 / 9.0],
    [1.0 / 9.0, 1.0 / 9.0, 1.0 / 9.0],
    [1.0 / 9.0, 1.0 / 9.0, 1.0 / 9.0],
]);

/// Gaussian blur kernel.
pub const GAUSSIAN_BLUR: Kernel3x3 = Kernel3x3([
    [1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0],
    [1.0 / 8.0, 1.0 / 4.0, 1.0 / 8.0],
    [1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0],
]);

/// Emboss kernel.
pub const EMBOSS: Kernel3x3 = Kernel3x3([[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]]);

/// Identity kernel, copies the image.
pub const IDENTITY: Kernel3x3 = Kernel3x3([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]);

/// The supported convolution kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KernelType {
    /// Edge detection.
    Edge,
    /// Sharpen.
    Sharpen,
    /// Box blur.
    Blur,
    /// Gaussian blur.
    GaussianBlur,
    /// Emboss.
    Emboss,
    /// Identity, leaves the image untouched.
    #[default]
    Identity,
}

impl KernelType {
    /// All the kernel types, in catalog order.
    pub const ALL: [KernelType; 6] = [
        KernelType::Edge,
        KernelType::Sharpen,
        KernelType::Blur,
        KernelType::GaussianBlur,
        KernelType::Emboss,
        KernelType::Identity,
    ];

    /// Get the weights of the kernel.
    pub fn kernel(self) -> &'static Kernel3x3 {
        match self {
            KernelType::Edge => &EDGE,
            KernelType::Sharpen => &SHARPEN,
            KernelType::Blur => &BLUR,
            KernelType::GaussianBlur => &GAUSSIAN_BLUR,
            KernelType::Emboss => &EMBOSS,
            KernelType::Identity => &IDENTITY,
        }
    }

    /// Resolve a kernel from its command line name.
    ///
    /// Unknown names resolve to [`KernelType::Identity`].
    ///
    /// # Example
    ///
    /// ```
    /// use rasterconv_imgproc::filter::KernelType;
    ///
    /// assert_eq!(KernelType::from_name("gauss"), KernelType::GaussianBlur);
    /// assert_eq!(KernelType::from_name("median"), KernelType::Identity);
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name {
            "edge" => KernelType::Edge,
            "sharpen" => KernelType::Sharpen,
            "blur" => KernelType::Blur,
            "gauss" => KernelType::GaussianBlur,
            "emboss" => KernelType::Emboss,
            _ => KernelType::Identity,
        }
    }

    /// The command line name of the kernel.
    pub fn name(self) -> &'static str {
        match self {
            KernelType::Edge => "edge",
            KernelType::Sharpen => "sharpen",
            KernelType::Blur => "blur",
            KernelType::GaussianBlur => "gauss",
            KernelType::Emboss => "emboss",
            KernelType::Identity => "identity",
        }
    }
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(KernelType::from_name(s))
    }
}

/// Look up the weights for a kernel selector, absent selectors give the identity.
pub fn lookup(kernel_type: Option<KernelType>) -> &'static Kernel3x3 {
    kernel_type.unwrap_or_default().kernel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_weights() {
        assert_eq!(KernelType::Edge.kernel().weights()[1], [-1.0, 4.0, -1.0]);
        assert_eq!(KernelType::Sharpen.kernel().weights()[1][1], 5.0);
        assert_eq!(KernelType::Emboss.kernel().weights()[0], [-2.0, -1.0, 0.0]);
        assert_eq!(KernelType::Identity.kernel(), &IDENTITY);
    }

    #[test]
    fn test_kernel_weight_sum() {
        assert_eq!(EDGE.weight_sum(), 0.0);
        assert_eq!(SHARPEN.weight_sum(), 1.0);
        assert_eq!(GAUSSIAN_BLUR.weight_sum(), 1.0);
        assert_eq!(EMBOSS.weight_sum(), 1.0);
        assert_eq!(IDENTITY.weight_sum(), 1.0);
        assert!((BLUR.weight_sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_kernel_names() {
        for kernel_type in KernelType::ALL {
            assert_eq!(KernelType::from_name(kernel_type.name()), kernel_type);
            assert_eq!(kernel_type.to_string().parse::<KernelType>(), Ok(kernel_type));
        }
        assert_eq!(KernelType::from_name("Blur"), KernelType::Identity);
        assert_eq!(KernelType::from_name(""), KernelType::Identity);
    }

    #[test]
    fn test_lookup_default() {
        assert_eq!(lookup(None), &IDENTITY);
        assert_eq!(lookup(Some(KernelType::Blur)), &BLUR);
    }
}
