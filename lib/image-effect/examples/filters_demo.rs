/// Blur and edge filters example
/// Writes every filter output for a synthetic test card into tmp/
use image::{Rgb, RgbImage};
use image_effect::{
    Effect, Frame, ImageEffect,
    base_effect::{GrayscaleConfig, ResizeConfig},
    blur_effect::{BilateralConfig, BoxBlurConfig, GaussianBlurConfig, MedianBlurConfig},
    stylized_effect::{CannyConfig, LaplacianConfig, SobelAxis, SobelConfig},
};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let card = RgbImage::from_fn(800, 600, |x, y| {
        if (x / 50 + y / 50) % 2 == 0 {
            Rgb([(x * 255 / 800) as u8, 40, 200])
        } else {
            Rgb([240, (y * 255 / 600) as u8, 20])
        }
    });
    let img = ResizeConfig::new().apply(&Frame::Rgb(card))?;
    let gray = GrayscaleConfig::new().apply(&img)?;

    let color_effects = [
        ("blur", ImageEffect::BoxBlur(BoxBlurConfig::new())),
        ("gaussian", ImageEffect::GaussianBlur(GaussianBlurConfig::new())),
        ("median", ImageEffect::MedianBlur(MedianBlurConfig::new())),
        ("bilateral", ImageEffect::Bilateral(BilateralConfig::new())),
    ];

    let gray_effects = [
        ("canny", ImageEffect::Canny(CannyConfig::new())),
        ("sobel_x", ImageEffect::Sobel(SobelConfig::new())),
        ("sobel_y", ImageEffect::Sobel(SobelConfig::new().with_axis(SobelAxis::Y))),
        ("laplace", ImageEffect::Laplacian(LaplacianConfig::new())),
    ];

    for (name, effect) in color_effects {
        effect.apply(&img)?.save(output_dir.join(format!("{name}.png")))?;
        println!("✓ Generated {name}.png");
    }

    for (name, effect) in gray_effects {
        effect.apply(&gray)?.save(output_dir.join(format!("{name}.png")))?;
        println!("✓ Generated {name}.png");
    }

    println!("\n✓ All filters applied successfully!");
    println!("  Images saved to: tmp/");

    Ok(())
}
