use super::{FileUploader, UploadError, UploadedImage};
use crate::imaging::ImageFile;
use std::cell::RefCell;

/// In-process uploader.
///
/// Uses `RefCell` for interior mutability since publishing is single-threaded,
/// which lets [`FileUploader::upload`] take `&self` like the network client.
#[derive(Default)]
pub struct MemoryUploader {
    uploads: RefCell<Vec<ImageFile>>,
    // (successful uploads allowed before failing, error to fail with)
    failure: RefCell<Option<(usize, UploadError)>>,
}

impl MemoryUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every upload fails with `err`.
    pub fn fail_with(&self, err: UploadError) {
        self.fail_after(0, err);
    }

    /// Let `successes` uploads through, then fail every later one with `err`.
    pub fn fail_after(&self, successes: usize, err: UploadError) {
        *self.failure.borrow_mut() = Some((successes, err));
    }

    pub fn clear_failure(&self) {
        *self.failure.borrow_mut() = None;
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.borrow().len()
    }

    pub fn uploaded(&self) -> Vec<ImageFile> {
        self.uploads.borrow().clone()
    }
}

impl FileUploader for MemoryUploader {
    fn upload(
        &self,
        file: &ImageFile,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<UploadedImage, UploadError> {
        let done = self.uploads.borrow().len();
        if let Some((successes, err)) = self.failure.borrow().as_ref() {
            if done >= *successes {
                return Err(err.clone());
            }
        }

        on_progress(50);
        self.uploads.borrow_mut().push(file.clone());
        on_progress(100);

        Ok(UploadedImage {
            url: format!("memory://uploads/{}/{}", done + 1, file.name),
        })
    }
}
