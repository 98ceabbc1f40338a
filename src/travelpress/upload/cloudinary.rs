use super::{FileUploader, UploadError, UploadedImage, interpret_response, percent};
use crate::imaging::ImageFile;
use reqwest::blocking::{Client, multipart};
use std::io::{self, Cursor, Read};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";
const USER_AGENT: &str = concat!("travelpress/", env!("CARGO_PKG_VERSION"));
const TIMEOUT_SECS: u64 = 120;
const PROGRESS_POLL: Duration = Duration::from_millis(50);

/// Uploads to a Cloudinary-style endpoint with an unsigned upload preset.
pub struct CloudinaryUploader {
    client: Client,
    endpoint: String,
    upload_preset: String,
}

impl CloudinaryUploader {
    pub fn new(cloud_name: &str, upload_preset: &str) -> Result<Self, UploadError> {
        Self::with_endpoint(
            format!("{}/{}/image/upload", API_BASE, cloud_name),
            upload_preset,
        )
    }

    /// Point at an arbitrary multipart endpoint (self-hosted or test servers).
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        upload_preset: &str,
    ) -> Result<Self, UploadError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| UploadError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            upload_preset: upload_preset.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn send(&self, file: &ImageFile, progress: Sender<u8>) -> Result<UploadedImage, UploadError> {
        let total = file.bytes.len() as u64;
        let reader = ProgressReader {
            inner: Cursor::new(file.bytes.clone()),
            sent: 0,
            total,
            last: None,
            progress,
        };
        let part = multipart::Part::reader_with_length(reader, total).file_name(file.name.clone());
        let form = multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| UploadError::Network(e.to_string()))?;
        interpret_response(status, &body)
    }
}

impl FileUploader for CloudinaryUploader {
    fn upload(
        &self,
        file: &ImageFile,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<UploadedImage, UploadError> {
        tracing::debug!(name = %file.name, bytes = file.bytes.len(), endpoint = %self.endpoint, "Uploading image");

        // The request runs on a scoped worker so progress can be forwarded
        // to the caller's callback while the body streams.
        let (tx, rx) = mpsc::channel();
        let result = thread::scope(|s| {
            let worker = s.spawn(move || self.send(file, tx));
            // The body may outlive the request inside the client, so the
            // channel alone does not signal completion.
            loop {
                match rx.recv_timeout(PROGRESS_POLL) {
                    Ok(pct) => on_progress(pct),
                    Err(RecvTimeoutError::Timeout) if !worker.is_finished() => {}
                    Err(_) => break,
                }
            }
            for pct in rx.try_iter() {
                on_progress(pct);
            }
            worker
                .join()
                .unwrap_or_else(|_| Err(UploadError::Network("upload worker panicked".into())))
        });

        match &result {
            Ok(up) => tracing::info!(name = %file.name, url = %up.url, "Image uploaded"),
            Err(e) => tracing::warn!(name = %file.name, error = %e, "Image upload failed"),
        }
        result
    }
}

struct ProgressReader {
    inner: Cursor<Vec<u8>>,
    sent: u64,
    total: u64,
    last: Option<u8>,
    progress: Sender<u8>,
}

impl Read for ProgressReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.sent += n as u64;
        let pct = percent(self.sent, self.total);
        if self.last != Some(pct) {
            self.last = Some(pct);
            // Receiver gone means the caller stopped listening; keep streaming.
            let _ = self.progress.send(pct);
        }
        Ok(n)
    }
}
