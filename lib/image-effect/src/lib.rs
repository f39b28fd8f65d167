pub mod base_effect;
pub mod blur_effect;
pub mod frame;
pub mod stylized_effect;

pub use frame::{ColorSpace, Frame};

pub type ImageEffectResult<T> = Result<T, ImageEffectError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageEffectError {
    #[error("Unsupported frame: {effect} expects {expected:?}, got {actual:?}")]
    UnsupportedFrame {
        effect: &'static str,
        expected: ColorSpace,
        actual: ColorSpace,
    },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Size mismatch: {0}x{1} vs {2}x{3}")]
    SizeMismatch(u32, u32, u32, u32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub trait Effect {
    fn apply(&self, frame: &Frame) -> ImageEffectResult<Frame>;
}

#[derive(Debug, Clone)]
pub enum ImageEffect {
    // Base effects
    Grayscale(base_effect::GrayscaleConfig),
    Resize(base_effect::ResizeConfig),
    Hsv(base_effect::HsvConfig),

    // Blur effects
    BoxBlur(blur_effect::BoxBlurConfig),
    GaussianBlur(blur_effect::GaussianBlurConfig),
    MedianBlur(blur_effect::MedianBlurConfig),
    Bilateral(blur_effect::BilateralConfig),

    // Stylized effects
    Canny(stylized_effect::CannyConfig),
    Sobel(stylized_effect::SobelConfig),
    Laplacian(stylized_effect::LaplacianConfig),
}

impl Effect for ImageEffect {
    fn apply(&self, frame: &Frame) -> ImageEffectResult<Frame> {
        match self {
            // Base effects
            ImageEffect::Grayscale(config) => config.apply(frame),
            ImageEffect::Resize(config) => config.apply(frame),
            ImageEffect::Hsv(config) => config.apply(frame),

            // Blur effects
            ImageEffect::BoxBlur(config) => config.apply(frame),
            ImageEffect::GaussianBlur(config) => config.apply(frame),
            ImageEffect::MedianBlur(config) => config.apply(frame),
            ImageEffect::Bilateral(config) => config.apply(frame),

            // Stylized effects
            ImageEffect::Canny(config) => config.apply(frame),
            ImageEffect::Sobel(config) => config.apply(frame),
            ImageEffect::Laplacian(config) => config.apply(frame),
        }
    }
}

/// Apply `effects` in order, each one consuming the previous output.
pub fn chain(frame: &Frame, effects: &[ImageEffect]) -> ImageEffectResult<Frame> {
    let mut current = frame.clone();
    for effect in effects {
        log::trace!("apply {effect:?} to {:?} frame", current.color_space());
        current = effect.apply(&current)?;
    }
    Ok(current)
}
