// ABOUTME: Best-effort meal photo transcoder bounding payload size before upload
// ABOUTME: EXIF orientation, longest-edge downscale, smaller of WebP and JPEG, original on failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Image Transcoder
//!
//! Pure and synchronous. The bounded image is encoded as lossless WebP and as
//! baseline JPEG and the smaller payload is sent. Transcoding never fails a
//! request: a decode error, or both encoders failing, yields the original
//! bytes with their sniffed MIME type.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, ImageResult};
use tracing::{debug, warn};

/// Longest edge after downscaling
pub const MAX_EDGE_PX: u32 = 768;
/// JPEG quality for the baseline encoder
pub const JPEG_QUALITY: u8 = 65;

const WEBP_MIME: &str = "image/webp";
const JPEG_MIME: &str = "image/jpeg";

/// Image bytes ready to inline in a model request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodedImage {
    /// Encoded payload
    pub data: Bytes,
    /// MIME type of `data`
    pub mime_type: String,
    /// Whether `data` is the caller's original input
    pub passthrough: bool,
}

impl TranscodedImage {
    /// The caller's bytes unchanged, with a sniffed MIME type
    #[must_use]
    pub fn original(input: &[u8]) -> Self {
        let mime_type = image::guess_format(input)
            .map_or(JPEG_MIME, |format| format.to_mime_type())
            .to_owned();
        Self {
            data: Bytes::copy_from_slice(input),
            mime_type,
            passthrough: true,
        }
    }
}

/// Normalize orientation, bound the size, and re-encode
#[must_use]
pub fn transcode(input: &[u8]) -> TranscodedImage {
    let image = match decode_oriented(input) {
        Ok(image) => shrink(image),
        Err(e) => {
            warn!(error = %e, bytes = input.len(), "Image decode failed, sending original");
            return TranscodedImage::original(input);
        }
    };

    let webp = encode_webp(&image)
        .inspect_err(|e| debug!(error = %e, "WebP encode failed"))
        .ok()
        .map(|data| (data, WEBP_MIME));
    let jpeg = encode_jpeg(&image)
        .inspect_err(|e| debug!(error = %e, "JPEG encode failed"))
        .ok()
        .map(|data| (data, JPEG_MIME));

    let Some((data, mime_type)) = webp
        .into_iter()
        .chain(jpeg)
        .min_by_key(|(data, _)| data.len())
    else {
        warn!("No encoder succeeded, sending original");
        return TranscodedImage::original(input);
    };

    debug!(
        before = input.len(),
        after = data.len(),
        mime_type,
        "Transcoded image"
    );
    TranscodedImage {
        data: Bytes::from(data),
        mime_type: mime_type.to_owned(),
        passthrough: false,
    }
}

fn decode_oriented(input: &[u8]) -> ImageResult<DynamicImage> {
    let mut decoder = ImageReader::new(Cursor::new(input))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

/// Downscale so the longest edge is at most [`MAX_EDGE_PX`]; never upscales
fn shrink(image: DynamicImage) -> DynamicImage {
    if image.width().max(image.height()) <= MAX_EDGE_PX {
        return image;
    }
    image.resize(MAX_EDGE_PX, MAX_EDGE_PX, FilterType::Triangle)
}

fn encode_webp(image: &DynamicImage) -> ImageResult<Vec<u8>> {
    let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
    let mut buffer = Vec::new();
    rgba.write_with_encoder(WebPEncoder::new_lossless(&mut buffer))?;
    Ok(buffer)
}

fn encode_jpeg(image: &DynamicImage) -> ImageResult<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buffer = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY))?;
    Ok(buffer)
}
