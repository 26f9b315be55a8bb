use std::io::Cursor;

use image::{codecs::jpeg::JpegEncoder, io::Reader as ImageReader, DynamicImage, ImageFormat};

use crate::Result;

/// Output kind of a page, recognized from the entry name suffix.
///
/// Checks are case-sensitive and run in order: `.jpg` or `jpeg`, then `.png`.
/// The `jpeg` check deliberately has no dot boundary, so a name like `xjpeg`
/// classifies as a jpeg page too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Jpeg,
    Png,
}

impl PageKind {
    #[must_use]
    pub fn from_entry_name(name: &str) -> Option<Self> {
        if name.ends_with(".jpg") || name.ends_with("jpeg") {
            Some(Self::Jpeg)
        } else if name.ends_with(".png") {
            Some(Self::Png)
        } else {
            None
        }
    }
}

/// A decoded page image
#[derive(Debug, PartialEq)]
pub struct Image {
    dynamic_image: DynamicImage,
}

impl Image {
    /// Decodes an image from its raw bytes, guessing the actual format from
    /// the content rather than from the entry name
    ///
    /// ## Errors
    ///
    /// Fails if the format can't be guessed or the image can't be decoded
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;

        Ok(Self {
            dynamic_image: reader.decode()?,
        })
    }

    /// Re-encodes the image as `kind`.
    ///
    /// Jpeg output is flattened to 3-channel rgb (dropping any alpha,
    /// grayscale or indexed mode) and encoded at `quality`. Png output keeps
    /// the decoded color type and ignores `quality`.
    ///
    /// ## Errors
    ///
    /// Fails if the image can't be encoded
    pub fn recompress(&self, kind: PageKind, quality: u8) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());

        match kind {
            PageKind::Jpeg => {
                let rgb = self.dynamic_image.to_rgb8();
                JpegEncoder::new_with_quality(&mut out, quality).encode_image(&rgb)?;
            }
            PageKind::Png => self.dynamic_image.write_to(&mut out, ImageFormat::Png)?,
        }

        Ok(out.into_inner())
    }
}
