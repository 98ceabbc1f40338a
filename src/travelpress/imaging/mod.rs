//! Image preparation before upload: decode, downscale, recompress.
//!
//! The module separates *what* to do from *how* to do it:
//!
//! - [`calculations`]: pure dimension math, no I/O.
//! - [`backend`]: the [`ImageBackend`] trait, plus a `MockBackend` under `#[cfg(test)]`.
//! - [`rust_backend`]: [`RustBackend`], the production implementation on the `image` crate.
//!
//! [`compress_or_original`] is the pipeline policy the publisher uses: a file that
//! cannot be decoded fails the block, a file that cannot be re-encoded is uploaded as-is.

pub mod backend;
pub mod calculations;
pub mod rust_backend;

pub use backend::{ImageBackend, ImagingError};
pub use calculations::scaled_dimensions;
pub use rust_backend::RustBackend;

use crate::error::{PressError, Result};
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_WIDTH: u32 = 2000;
pub const DEFAULT_QUALITY: f32 = 0.78;

/// A raw, user-selected image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(PressError::Io)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self { name, bytes })
    }

    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0 / 1024.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressParams {
    pub max_width: u32,
    /// 0.0..=1.0
    pub quality: f32,
}

impl Default for CompressParams {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl CompressParams {
    /// Encoder quality on the 1..=100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality.clamp(0.01, 1.0) * 100.0).round() as u8
    }
}

pub fn compress_or_original(
    backend: &dyn ImageBackend,
    file: &ImageFile,
    params: &CompressParams,
) -> Result<ImageFile> {
    match backend.compress(file, params) {
        Ok(compressed) => {
            tracing::debug!(
                name = %file.name,
                before = file.bytes.len(),
                after = compressed.bytes.len(),
                "Compressed image"
            );
            Ok(compressed)
        }
        Err(ImagingError::Decode(reason)) => Err(PressError::Decode {
            name: file.name.clone(),
            reason,
        }),
        Err(ImagingError::Encode(reason)) => {
            tracing::warn!(name = %file.name, %reason, "Compression failed, using original file");
            Ok(file.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::backend::MockBackend;
    use super::*;

    #[test]
    fn jpeg_quality_scale() {
        assert_eq!(CompressParams::default().jpeg_quality(), 78);
        let p = CompressParams {
            max_width: 10,
            quality: 1.5,
        };
        assert_eq!(p.jpeg_quality(), 100);
    }

    #[test]
    fn encode_failure_falls_back_to_original() {
        let backend = MockBackend::failing_encode();
        let file = ImageFile::new("beach.png", vec![1, 2, 3]);
        let out = compress_or_original(&backend, &file, &CompressParams::default()).unwrap();
        assert_eq!(out, file);
    }

    #[test]
    fn decode_failure_is_fatal() {
        let backend = MockBackend::failing_decode();
        let file = ImageFile::new("beach.png", vec![1, 2, 3]);
        let err = compress_or_original(&backend, &file, &CompressParams::default()).unwrap_err();
        assert!(matches!(err, PressError::Decode { ref name, .. } if name == "beach.png"));
    }

    #[test]
    fn success_returns_compressed_file() {
        let backend = MockBackend::new();
        let file = ImageFile::new("beach.png", vec![1, 2, 3]);
        let out = compress_or_original(&backend, &file, &CompressParams::default()).unwrap();
        assert_eq!(out.name, "beach.jpg");
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn read_takes_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("falls.jpg");
        std::fs::write(&path, b"abc").unwrap();
        let file = ImageFile::read(&path).unwrap();
        assert_eq!(file.name, "falls.jpg");
        assert_eq!(file.bytes, b"abc");
    }
}
