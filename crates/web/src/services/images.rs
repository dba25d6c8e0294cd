//! Cloudinary image storage.
//!
//! Uploads are signed server-side: the request parameters are sorted,
//! joined as `key=value&...`, suffixed with the API secret and hashed.
//! The account must be set to SHA-256 signatures.

use axum::body::Bytes;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::CloudinaryConfig;
use crate::models::NewImage;

/// Cloudinary API base URL.
const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// File extensions the upload endpoint accepts.
pub const ALLOWED_FORMATS: [&str; 3] = ["jpeg", "png", "jpg"];

/// Errors that can occur when talking to Cloudinary.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The file's extension is not an allowed image format.
    #[error("{0} is not an allowed image type (jpeg, png, jpg)")]
    UnsupportedFormat(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

impl ImageError {
    /// Whether the failure was caused by the uploaded file itself.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_))
    }
}

/// A file received from a multipart form, not yet uploaded.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadFile {
    /// Lowercased extension, if the file name has one.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// Reject anything that isn't an allowed image format.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::UnsupportedFormat` naming the file.
    pub fn check_format(&self) -> Result<(), ImageError> {
        match self.extension() {
            Some(ext) if ALLOWED_FORMATS.contains(&ext.as_str()) => Ok(()),
            _ => Err(ImageError::UnsupportedFormat(self.file_name.clone())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Cloudinary upload API client.
#[derive(Clone)]
pub struct CloudinaryClient {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: SecretString,
    folder: String,
}

impl std::fmt::Debug for CloudinaryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryClient")
            .field("cloud_name", &self.cloud_name)
            .field("folder", &self.folder)
            .finish_non_exhaustive()
    }
}

impl CloudinaryClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CloudinaryConfig) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            folder: config.folder.clone(),
        })
    }

    /// Upload a batch of files, returning them in the order given.
    ///
    /// Every file's format is checked before any upload starts.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::UnsupportedFormat` if any file is rejected, or
    /// the first upload failure.
    pub async fn upload_all(&self, files: &[UploadFile]) -> Result<Vec<NewImage>, ImageError> {
        for file in files {
            file.check_format()?;
        }

        let mut images = Vec::with_capacity(files.len());
        for file in files {
            images.push(self.upload(file).await?);
        }
        Ok(images)
    }

    /// Upload a single file into the configured folder.
    ///
    /// # Errors
    ///
    /// Returns error if the format is rejected or the API call fails.
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name))]
    pub async fn upload(&self, file: &UploadFile) -> Result<NewImage, ImageError> {
        file.check_format()?;

        let timestamp = Utc::now().timestamp().to_string();
        let allowed = ALLOWED_FORMATS.join(",");
        let signature = self.sign(&[
            ("allowed_formats", allowed.as_str()),
            ("folder", self.folder.as_str()),
            ("timestamp", timestamp.as_str()),
        ]);

        let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.folder.clone())
            .text("allowed_formats", allowed)
            .text("signature", signature);

        let response = self
            .client
            .post(format!("{API_BASE}/{}/image/upload", self.cloud_name))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ImageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadResponse = response.json().await?;
        tracing::info!(public_id = %uploaded.public_id, "Uploaded image");

        Ok(NewImage {
            url: uploaded.secure_url,
            filename: uploaded.public_id,
        })
    }

    /// Destroy an asset by public id.
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails.
    #[tracing::instrument(skip(self))]
    pub async fn destroy(&self, public_id: &str) -> Result<(), ImageError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", timestamp.as_str())]);

        let params = [
            ("public_id", public_id),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.api_key.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .client
            .post(format!("{API_BASE}/{}/image/destroy", self.cloud_name))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ImageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: DestroyResponse = response.json().await?;
        if body.result != "ok" {
            tracing::warn!(public_id, result = %body.result, "Cloudinary did not destroy image");
        }
        Ok(())
    }

    /// Destroy several assets, logging failures instead of returning them.
    pub async fn destroy_all_best_effort(&self, public_ids: &[String]) {
        for public_id in public_ids {
            if let Err(e) = self.destroy(public_id).await {
                tracing::warn!(public_id = %public_id, error = %e, "Failed to destroy image");
            }
        }
    }

    fn sign(&self, params: &[(&str, &str)]) -> String {
        sign_params(params, &self.api_secret)
    }
}

/// Compute a Cloudinary request signature.
fn sign_params(params: &[(&str, &str)], secret: &SecretString) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by_key(|(k, _)| *k);

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let digest = Sha256::digest(format!("{joined}{}", secret.expose_secret()).as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn file(name: &str) -> UploadFile {
        UploadFile {
            file_name: name.to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: Bytes::from_static(b"\xff\xd8\xff"),
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(file("tent.JPG").extension().as_deref(), Some("jpg"));
        assert_eq!(file("archive.tar.png").extension().as_deref(), Some("png"));
        assert_eq!(file("noext").extension(), None);
        assert_eq!(file("trailing.").extension(), None);
    }

    #[test]
    fn test_check_format() {
        assert!(file("a.jpeg").check_format().is_ok());
        assert!(file("a.png").check_format().is_ok());
        assert!(file("a.jpg").check_format().is_ok());

        let err = file("a.gif").check_format().unwrap_err();
        assert!(err.is_user_error());
        assert!(err.to_string().contains("a.gif"));
    }

    #[test]
    fn test_sign_params_sorts_and_appends_secret() {
        let secret = SecretString::from("abcd");
        let signature = sign_params(&[("timestamp", "1315060510"), ("public_id", "sample")], &secret);

        let expected = hex::encode(Sha256::digest(b"public_id=sample&timestamp=1315060510abcd"));
        assert_eq!(signature, expected);
    }

    #[test]
    fn test_sign_params_skips_empty_values() {
        let secret = SecretString::from("s");
        assert_eq!(
            sign_params(&[("folder", ""), ("timestamp", "1")], &secret),
            sign_params(&[("timestamp", "1")], &secret)
        );
    }
}
