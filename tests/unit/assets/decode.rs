use std::io::Cursor;

use super::*;

fn png_bytes(rgba: Vec<u8>, w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_frame_png_dimensions_and_premul() {
    let buf = png_bytes(vec![100u8, 50u8, 200u8, 128u8], 1, 1);

    let prepared = decode_frame(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn fully_transparent_pixels_are_zeroed() {
    let buf = png_bytes(vec![10u8, 20, 30, 0], 1, 1);
    let prepared = decode_frame(&buf).unwrap();
    assert_eq!(prepared.rgba8_premul.as_slice(), &[0, 0, 0, 0]);
}

#[test]
fn garbage_bytes_are_asset_errors() {
    let err = decode_frame(b"not an image").unwrap_err();
    assert!(matches!(err, ReelError::Asset(_)));
}

#[test]
fn missing_file_is_asset_error() {
    let err = load_frame_file(Path::new("definitely/missing/frame_000.png")).unwrap_err();
    assert!(matches!(err, ReelError::Asset(_)));
    assert!(err.to_string().contains("frame_000.png"));
}

#[test]
fn from_premul_checks_length() {
    assert!(PreparedFrame::from_premul(2, 1, vec![0; 8]).is_ok());
    assert!(PreparedFrame::from_premul(2, 1, vec![0; 4]).is_err());
    assert!(PreparedFrame::from_premul(0, 1, vec![]).is_err());
}
