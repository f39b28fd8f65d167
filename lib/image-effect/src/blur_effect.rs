use crate::{Effect, Frame, ImageEffectError, ImageEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::filter::{
    bilateral::{GaussianEuclideanColorDistance, bilateral_filter},
    box_filter, gaussian_blur_f32, median_filter,
};

fn check_kernel_size(name: &str, ksize: u32) -> ImageEffectResult<()> {
    if ksize == 0 || ksize % 2 == 0 {
        return Err(ImageEffectError::InvalidParameter(format!(
            "{name} kernel size must be odd and positive, got {ksize}"
        )));
    }
    Ok(())
}

/// Run a single-channel filter over each plane of a color image.
fn per_channel(img: &RgbImage, filter: impl Fn(&GrayImage) -> GrayImage) -> RgbImage {
    let (width, height) = img.dimensions();
    let planes: Vec<GrayImage> = (0..3)
        .map(|c| filter(&GrayImage::from_fn(width, height, |x, y| Luma([img.get_pixel(x, y)[c]]))))
        .collect();

    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            planes[0].get_pixel(x, y)[0],
            planes[1].get_pixel(x, y)[0],
            planes[2].get_pixel(x, y)[0],
        ])
    })
}

/// Normalized box filter (averaging)
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BoxBlurConfig {
    #[derivative(Default(value = "5"))]
    ksize: u32,
}

impl BoxBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for BoxBlurConfig {
    fn apply(&self, frame: &Frame) -> ImageEffectResult<Frame> {
        check_kernel_size("box blur", self.ksize)?;
        let radius = self.ksize / 2;
        let filter = |plane: &GrayImage| box_filter(plane, radius, radius);

        Ok(match frame {
            Frame::Rgb(img) => Frame::Rgb(per_channel(img, filter)),
            Frame::Hsv(img) => Frame::Hsv(per_channel(img, filter)),
            Frame::Gray(img) => Frame::Gray(filter(img)),
        })
    }
}

/// Gaussian blur configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GaussianBlurConfig {
    #[derivative(Default(value = "5"))]
    ksize: u32,

    /// Zero or negative derives sigma from `ksize`.
    #[derivative(Default(value = "0.0"))]
    sigma: f32,
}

impl GaussianBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effective_sigma(&self) -> f32 {
        if self.sigma > 0.0 {
            self.sigma
        } else {
            0.3 * ((self.ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
        }
    }
}

impl Effect for GaussianBlurConfig {
    fn apply(&self, frame: &Frame) -> ImageEffectResult<Frame> {
        check_kernel_size("gaussian blur", self.ksize)?;
        let sigma = self.effective_sigma();

        Ok(match frame {
            Frame::Rgb(img) => Frame::Rgb(gaussian_blur_f32(img, sigma)),
            Frame::Hsv(img) => Frame::Hsv(gaussian_blur_f32(img, sigma)),
            Frame::Gray(img) => Frame::Gray(gaussian_blur_f32(img, sigma)),
        })
    }
}

/// Median blur configuration (using imageproc)
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct MedianBlurConfig {
    #[derivative(Default(value = "5"))]
    ksize: u32,
}

impl MedianBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for MedianBlurConfig {
    fn apply(&self, frame: &Frame) -> ImageEffectResult<Frame> {
        check_kernel_size("median blur", self.ksize)?;
        let radius = self.ksize / 2;

        Ok(match frame {
            Frame::Rgb(img) => Frame::Rgb(median_filter(img, radius, radius)),
            Frame::Hsv(img) => Frame::Hsv(median_filter(img, radius, radius)),
            Frame::Gray(img) => Frame::Gray(median_filter(img, radius, radius)),
        })
    }
}

/// Edge preserving bilateral filter
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BilateralConfig {
    /// Neighbourhood diameter in pixels.
    #[derivative(Default(value = "9"))]
    diameter: u32,

    #[derivative(Default(value = "75.0"))]
    sigma_color: f32,

    #[derivative(Default(value = "75.0"))]
    sigma_space: f32,
}

impl BilateralConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for BilateralConfig {
    fn apply(&self, frame: &Frame) -> ImageEffectResult<Frame> {
        if self.sigma_color <= 0.0 || self.sigma_space <= 0.0 {
            return Err(ImageEffectError::InvalidParameter(format!(
                "bilateral sigmas must be positive, got color={} space={}",
                self.sigma_color, self.sigma_space
            )));
        }

        let radius = u8::try_from((self.diameter / 2).max(1)).map_err(|_| {
            ImageEffectError::InvalidParameter(format!(
                "bilateral diameter {} is too large",
                self.diameter
            ))
        })?;
        let distance = GaussianEuclideanColorDistance::new(self.sigma_color);

        Ok(match frame {
            Frame::Rgb(img) => Frame::Rgb(bilateral_filter(img, radius, self.sigma_space, distance)),
            Frame::Hsv(img) => Frame::Hsv(bilateral_filter(img, radius, self.sigma_space, distance)),
            Frame::Gray(img) => {
                Frame::Gray(bilateral_filter(img, radius, self.sigma_space, distance))
            }
        })
    }
}
