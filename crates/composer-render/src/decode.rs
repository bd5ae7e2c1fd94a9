//! Decoding embedded image sources into RGBA pixels.

use crate::renderer::{RenderResult, RendererError};
use composer_core::element::ImageProps;
use kurbo::Rect;

/// Straight-alpha RGBA8 pixels of a decoded image.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode the data URL carried by `props`.
pub fn decode_image(props: &ImageProps) -> RenderResult<DecodedImage> {
    let data = props
        .data()
        .ok_or_else(|| RendererError::ImageDecode("source is not an embedded data URL".to_string()))?;
    let decoded = ::image::load_from_memory(&data).map_err(|e| RendererError::ImageDecode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(RendererError::ImageDecode("empty image".to_string()));
    }
    Ok(DecodedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Source rectangle that fills a `box_w`×`box_h` box without distortion,
/// cropping the overflowing axis around the center.
pub fn cover_crop(image_w: f64, image_h: f64, box_w: f64, box_h: f64) -> Rect {
    let full = Rect::new(0.0, 0.0, image_w, image_h);
    if image_w <= 0.0 || image_h <= 0.0 || box_w <= 0.0 || box_h <= 0.0 {
        return full;
    }
    let scale = (box_w / image_w).max(box_h / image_h);
    let (w, h) = (box_w / scale, box_h / scale);
    Rect::from_center_size(full.center(), (w, h))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn png_props(width: u32, height: u32) -> ImageProps {
        let img = ::image::RgbaImage::from_pixel(width, height, ::image::Rgba([0, 128, 255, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ::image::ImageFormat::Png).unwrap();
        ImageProps::from_bytes("image/png", &out.into_inner(), "fixture.png")
    }

    #[test]
    fn test_decode_embedded_png() {
        let decoded = decode_image(&png_props(4, 3)).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 3));
        assert_eq!(decoded.rgba.len(), 4 * 3 * 4);
        assert_eq!(&decoded.rgba[0..4], &[0, 128, 255, 255]);
    }

    #[test]
    fn test_decode_failures() {
        let remote = ImageProps {
            src: "https://example.com/a.png".into(),
            original_file_name: None,
            file_size: None,
        };
        assert!(decode_image(&remote).is_err());
        let corrupt = ImageProps::from_bytes("image/png", b"garbage", "bad.png");
        assert!(matches!(decode_image(&corrupt), Err(RendererError::ImageDecode(_))));
    }

    #[test]
    fn test_cover_crop() {
        // Wide image into a square box keeps full height, crops the sides
        let crop = cover_crop(200.0, 100.0, 50.0, 50.0);
        assert_eq!(crop, Rect::new(50.0, 0.0, 150.0, 100.0));
        // Matching aspect uses the whole image
        assert_eq!(cover_crop(100.0, 50.0, 200.0, 100.0), Rect::new(0.0, 0.0, 100.0, 50.0));
    }
}
