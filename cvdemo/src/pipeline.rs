//! The four demo pipelines and the dispatcher that picks one of them.

use crate::viewer::Viewer;
use anyhow::{Context, Result};
use image_effect::{
    Effect, Frame, ImageEffect, ImageEffectResult,
    base_effect::{GrayscaleConfig, HsvConfig, ResizeConfig},
    blur_effect::{BilateralConfig, BoxBlurConfig, GaussianBlurConfig, MedianBlurConfig},
    chain,
    stylized_effect::{CannyConfig, LaplacianConfig, SobelAxis, SobelConfig, add_weighted},
};
use log::{info, warn};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Selection {
    Basic = 1,
    ColorSpace = 2,
    Filtering = 3,
    EdgeDetection = 4,
}

impl Selection {
    pub fn describe(self) -> &'static str {
        match self {
            Selection::Basic => "basic image operating",
            Selection::ColorSpace => "color space changing",
            Selection::Filtering => "image filtering",
            Selection::EdgeDetection => "edge detection",
        }
    }

    /// Titles of the views this pipeline produces, in display order.
    pub fn titles(self) -> &'static [&'static str] {
        match self {
            Selection::Basic => &["original", "gray", "resize"],
            Selection::ColorSpace => &["original", "gray", "hsv"],
            Selection::Filtering => &["original", "blur", "gaussian", "median", "bilateral"],
            Selection::EdgeDetection => &[
                "original",
                "no filter",
                "use filter",
                "sobel - abs_x",
                "sobel - abs_y",
                "sobel",
                "laplace",
            ],
        }
    }

    /// The view written to disk after the key press, if any.
    pub fn persisted_view(self) -> Option<&'static str> {
        match self {
            Selection::Basic => Some("resize"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub title: &'static str,
    pub frame: Frame,
}

impl View {
    fn new(title: &'static str, frame: Frame) -> Self {
        Self { title, frame }
    }
}

fn vga() -> ImageEffect {
    ImageEffect::Resize(ResizeConfig::new())
}

fn gray() -> ImageEffect {
    ImageEffect::Grayscale(GrayscaleConfig::new())
}

fn basic(src: &Frame) -> ImageEffectResult<Vec<View>> {
    let gray_frame = gray().apply(src)?;
    let resized = vga().apply(&gray_frame)?;

    Ok(vec![
        View::new("original", src.clone()),
        View::new("gray", gray_frame),
        View::new("resize", resized),
    ])
}

fn color_space(src: &Frame) -> ImageEffectResult<Vec<View>> {
    let gray_frame = chain(src, &[gray(), vga()])?;
    let hsv_frame = chain(src, &[ImageEffect::Hsv(HsvConfig::new()), vga()])?;

    Ok(vec![
        View::new("original", src.clone()),
        View::new("gray", gray_frame),
        View::new("hsv", hsv_frame),
    ])
}

fn filtering(src: &Frame) -> ImageEffectResult<Vec<View>> {
    let resized = vga().apply(src)?;
    let blur = BoxBlurConfig::new().apply(&resized)?;
    let gaussian = GaussianBlurConfig::new().apply(&resized)?;
    let median = MedianBlurConfig::new().apply(&resized)?;
    let bilateral = BilateralConfig::new().apply(&resized)?;

    Ok(vec![
        View::new("original", resized),
        View::new("blur", blur),
        View::new("gaussian", gaussian),
        View::new("median", median),
        View::new("bilateral", bilateral),
    ])
}

fn edge_detection(src: &Frame) -> ImageEffectResult<Vec<View>> {
    let resized = chain(src, &[gray(), vga()])?;
    let no_filter = CannyConfig::new().apply(&resized)?;
    let use_filter = chain(
        &resized,
        &[
            ImageEffect::GaussianBlur(GaussianBlurConfig::new()),
            ImageEffect::Canny(CannyConfig::new()),
        ],
    )?;

    let abs_x = SobelConfig::new().apply(&use_filter)?;
    let abs_y = SobelConfig::new().with_axis(SobelAxis::Y).apply(&use_filter)?;
    let sobel = add_weighted(&abs_x, 0.5, &abs_y, 0.5, 0.0)?;
    let laplace = LaplacianConfig::new().apply(&use_filter)?;

    Ok(vec![
        View::new("original", resized),
        View::new("no filter", no_filter),
        View::new("use filter", use_filter),
        View::new("sobel - abs_x", abs_x),
        View::new("sobel - abs_y", abs_y),
        View::new("sobel", sobel),
        View::new("laplace", laplace),
    ])
}

pub fn build_views(selection: Selection, src: &Frame) -> ImageEffectResult<Vec<View>> {
    match selection {
        Selection::Basic => basic(src),
        Selection::ColorSpace => color_space(src),
        Selection::Filtering => filtering(src),
        Selection::EdgeDetection => edge_detection(src),
    }
}

/// Run the pipeline picked by `example`, show its views and block until a
/// key is pressed. Unknown values only log a warning.
pub fn run(
    example: u8,
    src: &Frame,
    viewer: &mut dyn Viewer,
    output: &Path,
) -> Result<Option<Selection>> {
    let Ok(selection) = Selection::try_from(example) else {
        warn!("No matched any sample case!");
        return Ok(None);
    };

    info!("Case {example}: {}", selection.describe());
    let views = build_views(selection, src)
        .with_context(|| format!("case {example} pipeline failed"))?;

    for view in &views {
        viewer.show(view)?;
    }
    viewer.wait_key()?;

    let persisted = selection
        .persisted_view()
        .and_then(|title| views.iter().find(|v| v.title == title));
    if let Some(view) = persisted {
        view.frame
            .save(output)
            .with_context(|| format!("write {} failed", output.display()))?;
        info!("Saved `{}` to {}", view.title, output.display());
    }

    Ok(Some(selection))
}
