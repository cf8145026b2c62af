#![allow(dead_code)]

use std::io::Cursor;

use comicpage_pdf::{ComicRequest, ImageHandle, RenderOptions, TextMeasure};

/// Every character is `char_width` wide at any size.
pub struct FixedWidth {
    pub char_width: f32,
}

impl TextMeasure for FixedWidth {
    fn text_width(&self, text: &str, _font_size: f32) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb(color));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

pub fn translucent_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 128]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([30, 90, 160]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    out.into_inner()
}

pub fn png_handles(count: usize) -> Vec<ImageHandle> {
    (0..count)
        .map(|i| {
            let label = format!("frame_{}.png", i + 1);
            ImageHandle::from_bytes(label, png_bytes(64, 48, [40, 120, 200]))
        })
        .collect()
}

pub fn request(images: Vec<ImageHandle>, story: &str, options: RenderOptions) -> ComicRequest {
    ComicRequest {
        title: "My Comic Story".to_string(),
        story: story.to_string(),
        images,
        options,
    }
}

pub fn options_with(panel_count: usize, style: &str) -> RenderOptions {
    RenderOptions {
        panel_count: Some(panel_count),
        layout_style: style.to_string(),
        ..RenderOptions::default()
    }
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}
