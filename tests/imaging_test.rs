// ABOUTME: Tests for meal photo transcoding before upload
// ABOUTME: Checks size bounds, output formats and passthrough of undecodable input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use pierre_food_lens::imaging::{transcode, JPEG_QUALITY, MAX_EDGE_PX};

fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            u8::try_from((x * 7 + y) % 256).unwrap(),
            u8::try_from((y * 3) % 256).unwrap(),
            u8::try_from((x ^ y) % 256).unwrap(),
        ])
    });
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buffer), format)
        .unwrap();
    buffer
}

/// Camera-like noise that lossless codecs cannot compress well
fn noisy_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x9E37_79B9;
    let img = RgbImage::from_fn(width, height, |_, _| {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    });
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, 95))
        .unwrap();
    buffer
}

#[test]
fn test_noisy_photo_never_larger_than_jpeg_at_same_size() {
    let input = noisy_jpeg(2000, 1500);

    let out = transcode(&input);

    let bounded = image::load_from_memory(&input)
        .unwrap()
        .resize(MAX_EDGE_PX, MAX_EDGE_PX, FilterType::Triangle);
    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(bounded.to_rgb8())
        .write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY))
        .unwrap();

    assert!(!out.passthrough);
    assert!(
        out.data.len() <= jpeg.len(),
        "sent {} bytes as {}, JPEG would be {}",
        out.data.len(),
        out.mime_type,
        jpeg.len()
    );
    let decoded = image::load_from_memory(&out.data).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (MAX_EDGE_PX, 576));
}

#[test]
fn test_portrait_photo_bounded_on_long_edge() {
    let out = transcode(&encoded(600, 1200, ImageFormat::Png));

    let decoded = image::load_from_memory(&out.data).unwrap();
    assert_eq!(decoded.height(), MAX_EDGE_PX);
    assert_eq!(decoded.width(), 384);
}

#[test]
fn test_output_is_webp_or_jpeg() {
    let out = transcode(&encoded(1024, 768, ImageFormat::Png));

    assert!(!out.passthrough);
    assert!(
        out.mime_type == "image/webp" || out.mime_type == "image/jpeg",
        "unexpected {}",
        out.mime_type
    );
    assert_eq!(
        image::guess_format(&out.data).unwrap().to_mime_type(),
        out.mime_type
    );
}

#[test]
fn test_jpeg_input_is_accepted() {
    let out = transcode(&encoded(900, 900, ImageFormat::Jpeg));
    let decoded = image::load_from_memory(&out.data).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (MAX_EDGE_PX, MAX_EDGE_PX));
}

#[test]
fn test_truncated_image_passes_through_with_sniffed_mime() {
    let mut png = encoded(32, 32, ImageFormat::Png);
    png.truncate(40);

    let out = transcode(&png);

    assert!(out.passthrough);
    assert_eq!(out.data.as_ref(), png.as_slice());
    assert_eq!(out.mime_type, "image/png");
}
