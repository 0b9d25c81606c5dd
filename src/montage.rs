//! Horizontal stitching of rendered charts into one image.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

use crate::chart::theme::Rgb;
use crate::path::format_path_for_display;
use crate::styling::warn;

/// Stitch `inputs` left to right into `out`.
///
/// Missing inputs are warned about and skipped. Every image is rescaled,
/// keeping its aspect ratio, to the height of the tallest one. Returns
/// `Ok(false)` without writing anything when no input exists.
pub fn stitch_horizontal(inputs: &[PathBuf], out: &Path, background: Rgb) -> Result<bool> {
    let mut images: Vec<DynamicImage> = Vec::new();
    for path in inputs {
        if !path.is_file() {
            warn(format!(
                "Missing montage input {}, skipping",
                format_path_for_display(path)
            ));
            continue;
        }
        let img =
            image::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        images.push(img);
    }

    if images.is_empty() {
        warn("No montage inputs found; nothing stitched");
        return Ok(false);
    }

    let height = images.iter().map(DynamicImage::height).max().unwrap_or(0);
    let resized: Vec<RgbaImage> = images
        .iter()
        .map(|img| scale_to_height(img, height))
        .collect();
    let width = resized.iter().map(RgbaImage::width).sum();

    let Rgb(r, g, b) = background;
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]));
    let mut x = 0i64;
    for img in &resized {
        imageops::overlay(&mut canvas, img, x, 0);
        x += i64::from(img.width());
    }

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    canvas
        .save(out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    log::info!(
        "Stitched {} images into {} ({width}x{height})",
        resized.len(),
        out.display()
    );
    Ok(true)
}

fn scale_to_height(img: &DynamicImage, height: u32) -> RgbaImage {
    if img.height() == height {
        return img.to_rgba8();
    }
    let width = (u64::from(img.width()) * u64::from(height))
        .div_ceil(u64::from(img.height().max(1)))
        .max(1) as u32;
    img.resize_exact(width, height, FilterType::Lanczos3)
        .to_rgba8()
}
