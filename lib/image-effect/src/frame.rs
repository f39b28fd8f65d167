//! The in-memory image value every effect consumes and produces.

use image::{DynamicImage, GrayImage, ImageReader, RgbImage, RgbaImage};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Rgb,
    Gray,
    Hsv,
}

/// An 8-bit image tagged with its color space.
///
/// `Hsv` uses the OpenCV 8-bit layout: hue in `[0, 180)`, saturation and
/// value in `[0, 255]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Rgb(RgbImage),
    Gray(GrayImage),
    Hsv(RgbImage),
}

impl Frame {
    /// Decode by content, not by extension: a cached `.jpg` may hold a PNG.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, image::ImageError> {
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(Self::from(img))
    }

    pub fn width(&self) -> u32 {
        match self {
            Frame::Rgb(img) | Frame::Hsv(img) => img.width(),
            Frame::Gray(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Frame::Rgb(img) | Frame::Hsv(img) => img.height(),
            Frame::Gray(img) => img.height(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn channels(&self) -> u8 {
        match self {
            Frame::Rgb(_) | Frame::Hsv(_) => 3,
            Frame::Gray(_) => 1,
        }
    }

    pub fn color_space(&self) -> ColorSpace {
        match self {
            Frame::Rgb(_) => ColorSpace::Rgb,
            Frame::Gray(_) => ColorSpace::Gray,
            Frame::Hsv(_) => ColorSpace::Hsv,
        }
    }

    /// Raw bytes exactly as stored, so an HSV frame is shown channel for
    /// channel the way a BGR viewer would show it.
    pub fn to_display_rgba(&self) -> RgbaImage {
        match self {
            Frame::Rgb(img) | Frame::Hsv(img) => DynamicImage::ImageRgb8(img.clone()).to_rgba8(),
            Frame::Gray(img) => DynamicImage::ImageLuma8(img.clone()).to_rgba8(),
        }
    }

    /// Encode by file extension. Gray frames stay single channel.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        match self {
            Frame::Rgb(img) | Frame::Hsv(img) => img.save(path),
            Frame::Gray(img) => img.save(path),
        }
    }
}

impl From<DynamicImage> for Frame {
    fn from(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageRgb8(rgb) => Frame::Rgb(rgb),
            other => Frame::Rgb(other.to_rgb8()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn test_frame_metadata() {
        let rgb = Frame::Rgb(RgbImage::new(20, 10));
        assert_eq!(rgb.dimensions(), (20, 10));
        assert_eq!(rgb.channels(), 3);
        assert_eq!(rgb.color_space(), ColorSpace::Rgb);

        let gray = Frame::Gray(GrayImage::new(7, 3));
        assert_eq!(gray.channels(), 1);
        assert_eq!(gray.color_space(), ColorSpace::Gray);
    }

    #[test]
    fn test_decoded_gray_becomes_rgb() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([9])));
        let frame = Frame::from(img);
        match frame {
            Frame::Rgb(rgb) => assert_eq!(rgb.get_pixel(1, 1), &Rgb([9, 9, 9])),
            other => panic!("unexpected frame {:?}", other.color_space()),
        }
    }

    #[test]
    fn test_open_sniffs_content() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("download.jpg");
        RgbImage::from_pixel(3, 2, Rgb([1, 2, 3])).save_with_format(&path, image::ImageFormat::Png)?;

        let frame = Frame::open(&path)?;
        assert_eq!(frame.dimensions(), (3, 2));
        Ok(())
    }

    #[test]
    fn test_gray_roundtrip_on_disk_keeps_one_channel() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("gray.png");
        Frame::Gray(GrayImage::from_pixel(5, 4, Luma([128]))).save(&path)?;

        let decoded = image::open(&path)?;
        assert_eq!(decoded.color().channel_count(), 1);
        assert_eq!((decoded.width(), decoded.height()), (5, 4));
        Ok(())
    }
}
