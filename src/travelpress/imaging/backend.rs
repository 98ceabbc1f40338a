use super::{CompressParams, ImageFile};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImagingError {
    /// The bytes are not an image we can read.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The image was read but could not be written back out.
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Turns a raw image file into an upload-ready one.
pub trait ImageBackend {
    fn compress(&self, file: &ImageFile, params: &CompressParams)
    -> Result<ImageFile, ImagingError>;
}

#[cfg(test)]
pub use mock::MockBackend;

#[cfg(test)]
mod mock {
    use super::*;
    use crate::imaging::calculations::jpeg_name;
    use std::cell::Cell;

    #[derive(Clone, Copy)]
    enum Mode {
        Ok,
        FailDecode,
        FailEncode,
    }

    /// Deterministic backend: halves the payload instead of touching pixels.
    pub struct MockBackend {
        mode: Mode,
        calls: Cell<usize>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self {
                mode: Mode::Ok,
                calls: Cell::new(0),
            }
        }

        pub fn failing_decode() -> Self {
            Self {
                mode: Mode::FailDecode,
                ..Self::new()
            }
        }

        pub fn failing_encode() -> Self {
            Self {
                mode: Mode::FailEncode,
                ..Self::new()
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.get()
        }
    }

    impl ImageBackend for MockBackend {
        fn compress(
            &self,
            file: &ImageFile,
            _params: &CompressParams,
        ) -> Result<ImageFile, ImagingError> {
            self.calls.set(self.calls.get() + 1);
            match self.mode {
                Mode::Ok => Ok(ImageFile::new(
                    jpeg_name(&file.name),
                    file.bytes[..file.bytes.len() / 2].to_vec(),
                )),
                Mode::FailDecode => Err(ImagingError::Decode("not an image".into())),
                Mode::FailEncode => Err(ImagingError::Encode("encoder exploded".into())),
            }
        }
    }
}
