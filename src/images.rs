use std::borrow::Cow;
use std::io::Cursor;
use std::path::PathBuf;

use image::{ColorType, ImageFormat, ImageReader};

use crate::error::Error;

enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// An image produced upstream, referenced by path or held in memory.
/// Nothing is read until `dimensions` or `decode` is called.
pub struct ImageHandle {
    label: String,
    source: ImageSource,
}

pub(crate) enum PixelData {
    /// DCT data embedded as-is.
    Jpeg { data: Vec<u8>, grayscale: bool },
    /// Deflated 8-bit RGB, with a deflated alpha plane when any pixel is translucent.
    Raw {
        rgb: Vec<u8>,
        alpha: Option<Vec<u8>>,
    },
}

pub struct DecodedImage {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub(crate) pixels: PixelData,
}

impl ImageHandle {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            label: path.display().to_string(),
            source: ImageSource::Path(path),
        }
    }

    pub fn from_bytes(label: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            source: ImageSource::Bytes(data),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn bytes(&self) -> Result<Cow<'_, [u8]>, Error> {
        match &self.source {
            ImageSource::Bytes(data) => Ok(Cow::Borrowed(data)),
            ImageSource::Path(path) => std::fs::read(path).map(Cow::Owned).map_err(|e| {
                Error::Image(format!("{}: {e}", path.display()))
            }),
        }
    }

    /// Pixel size from the image header, without decoding the pixel data.
    pub fn dimensions(&self) -> Result<(u32, u32), Error> {
        let data = self.bytes()?;
        let reader = ImageReader::new(Cursor::new(data.as_ref())).with_guessed_format()?;
        let dims = reader.into_dimensions()?;
        Ok(dims)
    }

    pub fn decode(&self) -> Result<DecodedImage, Error> {
        let data = self.bytes()?;
        let reader = ImageReader::new(Cursor::new(data.as_ref())).with_guessed_format()?;
        let format = reader.format();
        let decoded = reader
            .decode()
            .map_err(|e| Error::Image(format!("{}: {e}", self.label)))?;
        let (w, h) = (decoded.width(), decoded.height());
        if w == 0 || h == 0 {
            return Err(Error::Image(format!("{}: image has no pixels", self.label)));
        }

        let passthrough = format == Some(ImageFormat::Jpeg)
            && matches!(decoded.color(), ColorType::Rgb8 | ColorType::L8);
        let pixels = if passthrough {
            PixelData::Jpeg {
                grayscale: decoded.color() == ColorType::L8,
                data: data.into_owned(),
            }
        } else {
            let rgba = decoded.to_rgba8();
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);
            let rgb_data: Vec<u8> = rgba
                .pixels()
                .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                .collect();
            let alpha = has_alpha.then(|| {
                let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6)
            });
            PixelData::Raw {
                rgb: miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6),
                alpha,
            }
        };

        log::debug!("Decoded {} ({w}x{h}, {:?})", self.label, format);

        Ok(DecodedImage {
            pixel_width: w,
            pixel_height: h,
            pixels,
        })
    }
}
