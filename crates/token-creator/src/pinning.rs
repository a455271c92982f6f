//! Image pinning for the token's metadata URI.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::PinError;

/// Largest accepted image, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const PINATA_UPLOAD_URL: &str = "https://uploads.pinata.cloud/v3/files";

/// Content identifier returned by a pinning service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedFile {
    pub cid: String,
}

#[async_trait]
pub trait PinningService: Send + Sync {
    async fn pin(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<PinnedFile, PinError>;
}

/// Checks that a pinned file is publicly retrievable.
#[async_trait]
pub trait UrlProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Result<(), PinError>;
}

#[async_trait]
impl UrlProbe for reqwest::Client {
    async fn probe(&self, url: &str) -> Result<(), PinError> {
        let resp = self
            .get(url)
            .send()
            .await
            .map_err(|_| PinError::NotRetrievable { url: url.to_string() })?;
        if !resp.status().is_success() {
            warn!(status = %resp.status(), "pinned file not retrievable");
            return Err(PinError::NotRetrievable { url: url.to_string() });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Gateway URLs
// ---------------------------------------------------------------------------

/// A dedicated IPFS gateway, optionally access-controlled by a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gateway {
    pub domain: String,
    pub access_token: Option<String>,
}

impl Gateway {
    /// `https://{domain}/ipfs/{cid}`, plus `?pinataGatewayToken=` when a
    /// token is set.
    pub fn file_url(&self, cid: &str) -> String {
        let base = format!("https://{}/ipfs/{cid}", self.domain);
        match self.access_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => format!("{base}?pinataGatewayToken={token}"),
            None => base,
        }
    }
}

// ---------------------------------------------------------------------------
// Pinata
// ---------------------------------------------------------------------------

/// [`PinningService`] backed by Pinata's v3 upload API.
pub struct PinataClient {
    client: reqwest::Client,
    jwt: String,
    upload_url: String,
}

#[derive(Deserialize)]
struct PinataUploadResponse {
    data: PinataFile,
}

#[derive(Deserialize)]
struct PinataFile {
    cid: String,
}

impl PinataClient {
    pub fn new(client: reqwest::Client, jwt: impl Into<String>) -> Result<Self, PinError> {
        let jwt = jwt.into();
        if jwt.is_empty() {
            return Err(PinError::NotConfigured);
        }
        Ok(Self {
            client,
            jwt,
            upload_url: PINATA_UPLOAD_URL.to_string(),
        })
    }

    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = url.into();
        self
    }
}

impl std::fmt::Debug for PinataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinataClient")
            .field("upload_url", &self.upload_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PinningService for PinataClient {
    async fn pin(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<PinnedFile, PinError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("network", "public");

        let resp = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.jwt)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json::<PinataUploadResponse>()
            .await?;

        Ok(PinnedFile { cid: resp.data.cid })
    }
}

// ---------------------------------------------------------------------------
// Upload workflow
// ---------------------------------------------------------------------------

/// Validates, pins and verifies a token image, producing the URL to use as
/// the token URI.
pub struct ImageUploader {
    pinning: Box<dyn PinningService>,
    probe: Box<dyn UrlProbe>,
    gateway: Gateway,
}

impl ImageUploader {
    pub fn new(
        pinning: Box<dyn PinningService>,
        probe: Box<dyn UrlProbe>,
        gateway: Gateway,
    ) -> Self {
        Self {
            pinning,
            probe,
            gateway,
        }
    }

    pub async fn upload(&self, bytes: Vec<u8>, content_type: &str) -> Result<String, PinError> {
        check_image(bytes.len(), content_type)?;

        let file_name = image_file_name(content_type);
        debug!(size = bytes.len(), content_type, "pinning image");
        let pinned = self.pinning.pin(&file_name, content_type, bytes).await?;

        let url = self.gateway.file_url(&pinned.cid);
        self.probe.probe(&url).await?;
        info!(cid = %pinned.cid, "image pinned");
        Ok(url)
    }
}

/// Reject files over [`MAX_IMAGE_BYTES`] and non-`image/*` types.
pub fn check_image(size: usize, content_type: &str) -> Result<(), PinError> {
    if size > MAX_IMAGE_BYTES {
        return Err(PinError::ImageTooLarge { size });
    }
    if !content_type.starts_with("image/") {
        return Err(PinError::NotAnImage {
            content_type: content_type.to_string(),
        });
    }
    Ok(())
}

fn image_file_name(content_type: &str) -> String {
    let subtype = content_type
        .trim_start_matches("image/")
        .split(['+', ';'])
        .next()
        .unwrap_or_default();
    if subtype.is_empty() {
        "token-image".to_string()
    } else {
        format!("token-image.{subtype}")
    }
}
