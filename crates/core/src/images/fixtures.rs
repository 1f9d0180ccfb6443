//! Generated images for tests.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Deterministic RGB gradient with a noisy blue channel.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = u8::try_from(x * 255 / width.max(1)).unwrap_or(u8::MAX);
        let g = u8::try_from(y * 255 / height.max(1)).unwrap_or(u8::MAX);
        let b = u8::try_from((x * 7919 + y * 104_729) % 251).unwrap_or(u8::MAX);
        Rgb([r, g, b])
    });
    DynamicImage::ImageRgb8(img)
}

fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    gradient(width, height)
        .write_to(&mut buf, format)
        .expect("fixture should encode");
    buf.into_inner()
}

/// PNG encoded gradient.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encoded(width, height, ImageFormat::Png)
}

/// JPEG encoded gradient.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encoded(width, height, ImageFormat::Jpeg)
}

/// GIF encoded gradient, a valid image the store refuses.
pub fn gif_bytes(width: u32, height: u32) -> Vec<u8> {
    encoded(width, height, ImageFormat::Gif)
}
