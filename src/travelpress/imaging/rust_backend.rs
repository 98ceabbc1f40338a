use super::backend::{ImageBackend, ImagingError};
use super::calculations::{jpeg_name, scaled_dimensions};
use super::{CompressParams, ImageFile};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

/// Production backend built on the `image` crate.
///
/// Decodes any supported input format, downsamples with Lanczos3 when the
/// image is wider than `max_width`, and writes a baseline JPEG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImageBackend for RustBackend {
    fn compress(
        &self,
        file: &ImageFile,
        params: &CompressParams,
    ) -> Result<ImageFile, ImagingError> {
        let img = image::load_from_memory(&file.bytes)
            .map_err(|e| ImagingError::Decode(e.to_string()))?;

        let (w, h) = scaled_dimensions(img.width(), img.height(), params.max_width);
        let img = if (w, h) != (img.width(), img.height()) {
            img.resize_exact(w, h, FilterType::Lanczos3)
        } else {
            img
        };

        // JPEG has no alpha channel.
        let rgb = img.to_rgb8();
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, params.jpeg_quality())
            .encode_image(&rgb)
            .map_err(|e| ImagingError::Encode(e.to_string()))?;

        if out.is_empty() {
            return Err(ImagingError::Encode("encoder produced no data".into()));
        }

        Ok(ImageFile::new(jpeg_name(&file.name), out))
    }
}
