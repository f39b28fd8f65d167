use crate::{ColorSpace, Effect, Frame, ImageEffectError, ImageEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::{GrayImage, ImageBuffer, Luma, Primitive};
use imageproc::{
    edges::canny,
    gradients::{horizontal_sobel, vertical_sobel},
};

pub type GradientImage = ImageBuffer<Luma<i16>, Vec<i16>>;
pub type FloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

fn expect_gray<'a>(effect: &'static str, frame: &'a Frame) -> ImageEffectResult<&'a GrayImage> {
    match frame {
        Frame::Gray(img) => Ok(img),
        other => Err(ImageEffectError::UnsupportedFrame {
            effect,
            expected: ColorSpace::Gray,
            actual: other.color_space(),
        }),
    }
}

/// Canny edge detection configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct CannyConfig {
    #[derivative(Default(value = "100.0"))]
    low_threshold: f32,

    #[derivative(Default(value = "255.0"))]
    high_threshold: f32,
}

impl CannyConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for CannyConfig {
    fn apply(&self, frame: &Frame) -> ImageEffectResult<Frame> {
        let img = expect_gray("canny", frame)?;
        if self.low_threshold > self.high_threshold {
            return Err(ImageEffectError::InvalidParameter(format!(
                "canny thresholds out of order: {} > {}",
                self.low_threshold, self.high_threshold
            )));
        }

        Ok(Frame::Gray(canny(img, self.low_threshold, self.high_threshold)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SobelAxis {
    /// First derivative along x.
    X,
    /// First derivative along y.
    Y,
}

/// Signed 16-bit Sobel derivative.
pub fn sobel_gradient(img: &GrayImage, axis: SobelAxis) -> GradientImage {
    match axis {
        SobelAxis::X => horizontal_sobel(img),
        SobelAxis::Y => vertical_sobel(img),
    }
}

/// Sobel derivative scaled back to 8-bit magnitude
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SobelConfig {
    #[derivative(Default(value = "SobelAxis::X"))]
    axis: SobelAxis,
}

impl SobelConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for SobelConfig {
    fn apply(&self, frame: &Frame) -> ImageEffectResult<Frame> {
        let img = expect_gray("sobel", frame)?;
        Ok(Frame::Gray(convert_scale_abs(&sobel_gradient(img, self.axis))))
    }
}

// Border index mirrored without repeating the edge pixel (`gfedcb|abcdefgh|gfedcba`).
fn reflect_101(i: i64, len: u32) -> u32 {
    let len = len as i64;
    if len == 1 {
        return 0;
    }

    let mut i = i;
    while i < 0 || i >= len {
        i = if i < 0 { -i } else { 2 * len - 2 - i };
    }
    i as u32
}

/// Laplacian with a 32-bit float accumulator.
///
/// `ksize == 1` uses the 4-neighbour kernel, `ksize == 3` the 3x3 aperture
/// `[2 0 2; 0 -8 0; 2 0 2]`.
// Hand-rolled: imageproc kernels clamp at the border, this needs reflect-101.
pub fn laplacian(img: &GrayImage, ksize: u32) -> ImageEffectResult<FloatImage> {
    let kernel: [f32; 9] = match ksize {
        1 => [0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0],
        3 => [2.0, 0.0, 2.0, 0.0, -8.0, 0.0, 2.0, 0.0, 2.0],
        _ => {
            return Err(ImageEffectError::InvalidParameter(format!(
                "laplacian ksize must be 1 or 3, got {ksize}"
            )));
        }
    };

    let (width, height) = img.dimensions();
    Ok(FloatImage::from_fn(width, height, |x, y| {
        let mut sum = 0.0f32;
        for ky in -1i64..=1 {
            for kx in -1i64..=1 {
                let px = reflect_101(x as i64 + kx, width);
                let py = reflect_101(y as i64 + ky, height);
                let ki = ((ky + 1) * 3 + (kx + 1)) as usize;
                sum += img.get_pixel(px, py)[0] as f32 * kernel[ki];
            }
        }
        Luma([sum])
    }))
}

/// Laplacian edge configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct LaplacianConfig {
    #[derivative(Default(value = "3"))]
    ksize: u32,
}

impl LaplacianConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for LaplacianConfig {
    fn apply(&self, frame: &Frame) -> ImageEffectResult<Frame> {
        let img = expect_gray("laplacian", frame)?;
        Ok(Frame::Gray(convert_scale_abs(&laplacian(img, self.ksize)?)))
    }
}

/// Absolute value saturated to `u8`.
pub fn convert_scale_abs<S>(img: &ImageBuffer<Luma<S>, Vec<S>>) -> GrayImage
where
    S: Primitive + Into<f32>,
{
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let v: f32 = img.get_pixel(x, y)[0].into();
        Luma([v.abs().round().min(255.0) as u8])
    })
}

/// `alpha * a + beta * b + gamma` over two gray frames, saturated to `u8`.
pub fn add_weighted(
    a: &Frame,
    alpha: f32,
    b: &Frame,
    beta: f32,
    gamma: f32,
) -> ImageEffectResult<Frame> {
    let a = expect_gray("add_weighted", a)?;
    let b = expect_gray("add_weighted", b)?;
    if a.dimensions() != b.dimensions() {
        return Err(ImageEffectError::SizeMismatch(
            a.width(),
            a.height(),
            b.width(),
            b.height(),
        ));
    }

    Ok(Frame::Gray(GrayImage::from_fn(a.width(), a.height(), |x, y| {
        let v = a.get_pixel(x, y)[0] as f32 * alpha + b.get_pixel(x, y)[0] as f32 * beta + gamma;
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })))
}
