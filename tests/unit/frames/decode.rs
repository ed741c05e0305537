use std::io::Cursor;

use super::*;

fn encode(img: image::RgbaImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50, 200, 128]).unwrap();
    let frame = decode_frame(&encode(img, image::ImageFormat::Png)).unwrap();
    assert_eq!((frame.width, frame.height), (1, 1));
    assert_eq!(
        frame.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_opaque_pixels_unchanged() {
    let img = image::RgbaImage::from_raw(2, 1, vec![9, 8, 7, 255, 1, 2, 3, 255]).unwrap();
    let frame = decode_frame(&encode(img, image::ImageFormat::Png)).unwrap();
    assert_eq!(frame.rgba8_premul.as_slice(), &[9, 8, 7, 255, 1, 2, 3, 255]);
}

#[test]
fn decode_transparent_pixels_zeroed() {
    let img = image::RgbaImage::from_raw(1, 1, vec![200, 200, 200, 0]).unwrap();
    let frame = decode_frame(&encode(img, image::ImageFormat::Png)).unwrap();
    assert_eq!(frame.rgba8_premul.as_slice(), &[0, 0, 0, 0]);
}

#[test]
fn decode_garbage_is_an_error() {
    assert!(decode_frame(b"definitely not an image").is_err());
}
