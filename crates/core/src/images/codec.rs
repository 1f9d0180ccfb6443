//! Decode, resize, and re-encode stored images.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use super::error::ImageError;
use super::format::ImageKind;

/// Upper bound on output pixels for a resize request.
pub const MAX_PIXELS: u64 = 100_000_000;

/// Quality used when re-encoding JPEG output.
pub const JPEG_QUALITY: u8 = 75;

/// Parses a client supplied width; absent means zero (no resize).
///
/// Anything but a non-negative decimal integer is `InvalidWidth`.
pub fn parse_width(raw: Option<&str>) -> Result<u32, ImageError> {
    match raw {
        None => Ok(0),
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ImageError::InvalidWidth(raw.to_string())),
    }
}

/// Computes output dimensions for a resize to `target_width`.
///
/// Height keeps the source aspect ratio, rounded to the nearest pixel and
/// never below one. A `target_width` of zero keeps the source dimensions.
#[must_use]
pub fn target_dimensions(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    if target_width == 0 || width == 0 {
        return (width, height);
    }
    let scaled = (u64::from(height) * u64::from(target_width) + u64::from(width) / 2)
        / u64::from(width);
    let scaled = u32::try_from(scaled).unwrap_or(u32::MAX).max(1);
    (target_width, scaled)
}

/// Scales `img` to `width`, preserving aspect ratio with Lanczos3 resampling.
///
/// A width of zero returns the image unscaled.
pub fn resize(img: &DynamicImage, width: u32) -> Result<DynamicImage, ImageError> {
    if width == 0 {
        return Ok(img.clone());
    }

    let (target_w, target_h) = target_dimensions(img.width(), img.height(), width);
    if u64::from(target_w) * u64::from(target_h) > MAX_PIXELS {
        return Err(ImageError::InvalidWidth(format!(
            "{width} (output {target_w}x{target_h} exceeds {MAX_PIXELS} pixels)"
        )));
    }

    Ok(img.resize_exact(target_w, target_h, FilterType::Lanczos3))
}

/// Decodes `data`, accepting only JPEG and PNG content.
pub fn decode(data: &[u8]) -> Result<(DynamicImage, ImageKind), ImageError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(ImageError::StorageRead)?;

    let kind = match reader.format() {
        Some(ImageFormat::Jpeg) => ImageKind::Jpeg,
        Some(ImageFormat::Png) => ImageKind::Png,
        Some(other) => {
            return Err(ImageError::invalid_format(
                other.to_mime_type().to_string(),
            ));
        }
        None => return Err(ImageError::invalid_format("unknown")),
    };

    let img = reader.decode().map_err(ImageError::Decode)?;
    Ok((img, kind))
}

/// Encodes `img` as `kind`.
pub fn encode(img: &DynamicImage, kind: ImageKind) -> Result<Vec<u8>, ImageError> {
    let mut buf = Cursor::new(Vec::new());

    match kind {
        ImageKind::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
            img.to_rgb8()
                .write_with_encoder(encoder)
                .map_err(ImageError::Encode)?;
        }
        ImageKind::Png => {
            img.write_to(&mut buf, ImageFormat::Png)
                .map_err(ImageError::Encode)?;
        }
    }

    Ok(buf.into_inner())
}

/// Decodes stored bytes, optionally resizes, and re-encodes in the same format.
pub fn transcode(data: &[u8], width: u32) -> Result<Vec<u8>, ImageError> {
    let (img, kind) = decode(data)?;
    let img = resize(&img, width)?;
    encode(&img, kind)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Output width is exact and height tracks the source ratio within one pixel.
        #[test]
        fn prop_target_dimensions_keep_ratio(
            width in 1u32..5000,
            height in 1u32..5000,
            target in 1u32..5000,
        ) {
            let (w, h) = target_dimensions(width, height, target);
            prop_assert_eq!(w, target);
            prop_assert!(h >= 1);
            // |h / target - height / width| <= 1 / target, cross-multiplied
            let lhs = u64::from(h) * u64::from(width);
            let rhs = u64::from(height) * u64::from(target);
            prop_assert!(lhs.abs_diff(rhs) <= u64::from(width));
        }
    }
}
