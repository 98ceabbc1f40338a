//! # Hosted File Uploads
//!
//! The [`FileUploader`] trait is the seam between the publisher and whatever hosts
//! article images. An upload takes one prepared [`ImageFile`] and yields the durable
//! URL the image block will carry.
//!
//! ## Failure Cases
//!
//! Network failures, non-2xx statuses, unparseable bodies and bodies without a URL
//! are distinct [`UploadError`] variants, but each one reads as a plain
//! "upload failed" reason for the user. Nothing is retried here; the publisher
//! aborts the whole publish on the first failure.
//!
//! ## Implementations
//!
//! - [`cloudinary::CloudinaryUploader`]: multipart POST with an unsigned upload preset.
//! - [`memory::MemoryUploader`]: in-process, with failure injection for tests.
//! - [`DisabledUploader`]: refuses every upload, for installs without an image host.

use crate::imaging::ImageFile;
use serde::Deserialize;
use thiserror::Error;

pub mod cloudinary;
pub mod memory;

pub use cloudinary::CloudinaryUploader;
pub use memory::MemoryUploader;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Network error during image upload: {0}")]
    Network(String),

    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    #[error("Invalid upload response: {0}")]
    MalformedResponse(String),

    #[error("Upload response is missing secure_url")]
    MissingUrl,

    #[error("Image uploads are not configured (set cloud-name and upload-preset)")]
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
}

pub trait FileUploader {
    /// Upload one file. `on_progress` receives whole percentages (0..=100)
    /// whenever the total size is known.
    fn upload(
        &self,
        file: &ImageFile,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<UploadedImage, UploadError>;
}

/// Used when no upload service is configured. Every upload fails.
pub struct DisabledUploader;

impl FileUploader for DisabledUploader {
    fn upload(
        &self,
        _file: &ImageFile,
        _on_progress: &mut dyn FnMut(u8),
    ) -> Result<UploadedImage, UploadError> {
        Err(UploadError::NotConfigured)
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Classify an upload endpoint's reply.
pub fn interpret_response(status: u16, body: &str) -> Result<UploadedImage, UploadError> {
    if (200..300).contains(&status) {
        let resp: UploadResponse = serde_json::from_str(body)
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;
        return match resp.secure_url {
            Some(url) if !url.is_empty() => Ok(UploadedImage { url }),
            _ => Err(UploadError::MissingUrl),
        };
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| format!("Upload failed with status {}", status));
    Err(UploadError::Status { status, message })
}

/// Whole-number percentage, clamped to 100.
pub(crate) fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((sent.min(total) as f64 * 100.0 / total as f64).round()) as u8
}
