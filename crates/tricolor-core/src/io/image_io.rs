use std::path::Path;

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};

use crate::channel::CompositeImage;
use crate::error::Result;

/// Output image encoding for a composite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageKind {
    /// 8-bit RGB PNG.
    #[default]
    Png,
    /// 16-bit RGB TIFF.
    Tiff,
}

impl ImageKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Tiff => "tiff",
        }
    }

    /// Pick the encoding from a file extension, defaulting to PNG.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tiff" | "tif") => Self::Tiff,
            _ => Self::Png,
        }
    }
}

/// Save a composite as 8-bit RGB PNG.
pub fn save_composite_png(image: &CompositeImage, path: &Path) -> Result<()> {
    let data = image.data();
    let img = RgbImage::from_fn(image.width() as u32, image.height() as u32, |x, y| {
        let (row, col) = (y as usize, x as usize);
        Rgb([
            to_u8(data[[row, col, 0]]),
            to_u8(data[[row, col, 1]]),
            to_u8(data[[row, col, 2]]),
        ])
    });
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a composite as 16-bit RGB TIFF.
pub fn save_composite_tiff(image: &CompositeImage, path: &Path) -> Result<()> {
    let data = image.data();
    let img: ImageBuffer<Rgb<u16>, Vec<u16>> =
        ImageBuffer::from_fn(image.width() as u32, image.height() as u32, |x, y| {
            let (row, col) = (y as usize, x as usize);
            Rgb([
                to_u16(data[[row, col, 0]]),
                to_u16(data[[row, col, 1]]),
                to_u16(data[[row, col, 2]]),
            ])
        });
    img.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save a composite, choosing the encoding from the file extension.
pub fn save_composite_image(image: &CompositeImage, path: &Path) -> Result<()> {
    match ImageKind::from_path(path) {
        ImageKind::Tiff => save_composite_tiff(image, path),
        ImageKind::Png => save_composite_png(image, path),
    }
}

fn to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn to_u16(v: f64) -> u16 {
    (v.clamp(0.0, 1.0) * 65535.0).round() as u16
}
