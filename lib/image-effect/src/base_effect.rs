use crate::{ColorSpace, Effect, Frame, ImageEffectError, ImageEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::{GrayImage, Luma, Rgb, RgbImage, imageops};

/// Grayscale effect configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GrayscaleConfig {
    #[derivative(Default(value = "GrayscaleMode::Luminance"))]
    mode: GrayscaleMode,
}

impl GrayscaleConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrayscaleMode {
    Average,
    Luminance,
}

impl GrayscaleMode {
    fn luma(self, pixel: &Rgb<u8>) -> u8 {
        let [r, g, b] = pixel.0;
        match self {
            GrayscaleMode::Average => ((r as u32 + g as u32 + b as u32 + 1) / 3) as u8,
            // ITU-R BT.601
            GrayscaleMode::Luminance => {
                (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
                    .round()
                    .clamp(0.0, 255.0) as u8
            }
        }
    }
}

impl Effect for GrayscaleConfig {
    fn apply(&self, frame: &Frame) -> ImageEffectResult<Frame> {
        match frame {
            Frame::Rgb(img) => Ok(Frame::Gray(GrayImage::from_fn(
                img.width(),
                img.height(),
                |x, y| Luma([self.mode.luma(img.get_pixel(x, y))]),
            ))),
            Frame::Gray(img) => Ok(Frame::Gray(img.clone())),
            Frame::Hsv(_) => Err(ImageEffectError::UnsupportedFrame {
                effect: "grayscale",
                expected: ColorSpace::Rgb,
                actual: ColorSpace::Hsv,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFilter {
    Nearest,
    Linear,
    Cubic,
    Lanczos,
}

impl From<ResizeFilter> for imageops::FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => imageops::FilterType::Nearest,
            ResizeFilter::Linear => imageops::FilterType::Triangle,
            ResizeFilter::Cubic => imageops::FilterType::CatmullRom,
            ResizeFilter::Lanczos => imageops::FilterType::Lanczos3,
        }
    }
}

/// Resize to an exact size, ignoring aspect ratio.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ResizeConfig {
    #[derivative(Default(value = "640"))]
    width: u32,

    #[derivative(Default(value = "480"))]
    height: u32,

    #[derivative(Default(value = "ResizeFilter::Cubic"))]
    filter: ResizeFilter,
}

impl ResizeConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for ResizeConfig {
    fn apply(&self, frame: &Frame) -> ImageEffectResult<Frame> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageEffectError::InvalidParameter(format!(
                "resize target {}x{}",
                self.width, self.height
            )));
        }

        let filter = self.filter.into();
        Ok(match frame {
            Frame::Rgb(img) => Frame::Rgb(imageops::resize(img, self.width, self.height, filter)),
            Frame::Hsv(img) => Frame::Hsv(imageops::resize(img, self.width, self.height, filter)),
            Frame::Gray(img) => {
                Frame::Gray(imageops::resize(img, self.width, self.height, filter))
            }
        })
    }
}

/// RGB to 8-bit HSV conversion
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct HsvConfig {}

impl HsvConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

fn rgb_to_hsv(pixel: &Rgb<u8>) -> Rgb<u8> {
    let [r, g, b] = pixel.0.map(|c| c as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let saturation = if max == 0.0 { 0.0 } else { 255.0 * delta / max };

    let mut hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };

    if hue < 0.0 {
        hue += 360.0;
    }

    // Half degrees so hue fits a byte
    let hue = (hue / 2.0).round() % 180.0;

    Rgb([hue as u8, saturation.round() as u8, max as u8])
}

impl Effect for HsvConfig {
    fn apply(&self, frame: &Frame) -> ImageEffectResult<Frame> {
        match frame {
            Frame::Rgb(img) => Ok(Frame::Hsv(RgbImage::from_fn(
                img.width(),
                img.height(),
                |x, y| rgb_to_hsv(img.get_pixel(x, y)),
            ))),
            Frame::Hsv(img) => Ok(Frame::Hsv(img.clone())),
            Frame::Gray(_) => Err(ImageEffectError::UnsupportedFrame {
                effect: "hsv",
                expected: ColorSpace::Rgb,
                actual: ColorSpace::Gray,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(r: u8, g: u8, b: u8) -> Frame {
        Frame::Rgb(RgbImage::from_pixel(4, 4, Rgb([r, g, b])))
    }

    #[test]
    fn test_grayscale_luminance_weights() {
        let out = GrayscaleConfig::new().apply(&solid(255, 0, 0)).unwrap();
        let Frame::Gray(gray) = out else {
            panic!("expected gray frame");
        };
        assert_eq!(gray.get_pixel(0, 0)[0], 76);

        let out = GrayscaleConfig::new().apply(&solid(0, 255, 0)).unwrap();
        let Frame::Gray(gray) = out else {
            panic!("expected gray frame");
        };
        assert_eq!(gray.get_pixel(0, 0)[0], 150);
    }

    #[test]
    fn test_grayscale_average() {
        let out = GrayscaleConfig::new()
            .with_mode(GrayscaleMode::Average)
            .apply(&solid(30, 60, 90))
            .unwrap();
        let Frame::Gray(gray) = out else {
            panic!("expected gray frame");
        };
        assert_eq!(gray.get_pixel(3, 3)[0], 60);
    }

    #[test]
    fn test_grayscale_rejects_hsv() {
        let hsv = Frame::Hsv(RgbImage::new(2, 2));
        assert!(matches!(
            GrayscaleConfig::new().apply(&hsv),
            Err(ImageEffectError::UnsupportedFrame { .. })
        ));
    }

    #[test]
    fn test_resize_default_is_vga() {
        let frame = Frame::Gray(GrayImage::new(1920, 1080));
        let out = ResizeConfig::new().apply(&frame).unwrap();
        assert_eq!(out.dimensions(), (640, 480));
        assert_eq!(out.channels(), 1);
    }

    #[test]
    fn test_resize_upscale_keeps_kind() {
        let out = ResizeConfig::new()
            .with_filter(ResizeFilter::Nearest)
            .apply(&solid(1, 2, 3))
            .unwrap();
        assert_eq!(out.color_space(), ColorSpace::Rgb);
        assert_eq!(out.dimensions(), (640, 480));
    }

    #[test]
    fn test_resize_rejects_zero_size() {
        let out = ResizeConfig::new().with_width(0).apply(&solid(1, 2, 3));
        assert!(matches!(out, Err(ImageEffectError::InvalidParameter(_))));
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(rgb_to_hsv(&Rgb([255, 0, 0])), Rgb([0, 255, 255]));
        assert_eq!(rgb_to_hsv(&Rgb([0, 255, 0])), Rgb([60, 255, 255]));
        assert_eq!(rgb_to_hsv(&Rgb([0, 0, 255])), Rgb([120, 255, 255]));
        assert_eq!(rgb_to_hsv(&Rgb([128, 128, 128])), Rgb([0, 0, 128]));
        assert_eq!(rgb_to_hsv(&Rgb([0, 0, 0])), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_hsv_effect_tags_frame() {
        let out = HsvConfig::new().apply(&solid(255, 255, 0)).unwrap();
        assert_eq!(out.color_space(), ColorSpace::Hsv);
        let Frame::Hsv(hsv) = out else {
            panic!("expected hsv frame");
        };
        assert_eq!(hsv.get_pixel(0, 0), &Rgb([30, 255, 255]));
    }
}
