//! Image validation and asset transfer

use crate::error::StoreError;
use crate::remote::{check, read_json, RemoteStore};
use morel_core::wire::AssetRow;
use thiserror::Error;

/// Upper bound on an uploaded image.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// MIME types accepted for item images.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Why an image was refused before or during upload.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Not one of [`ALLOWED_IMAGE_TYPES`].
    #[error("Please select a valid image file (JPEG, PNG, WebP, or GIF)")]
    InvalidType,

    /// Larger than [`MAX_IMAGE_BYTES`].
    #[error("Image file must be less than 10MB")]
    TooLarge,

    /// The transfer itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Pre-flight check mirroring the server's limits, so most refusals never
/// leave the process. Type is checked before size.
pub fn validate_image(file_name: &str, len: usize) -> Result<(), UploadError> {
    let mime = mime_guess::from_path(file_name).first_or_octet_stream();
    if !ALLOWED_IMAGE_TYPES.contains(&mime.essence_str()) {
        return Err(UploadError::InvalidType);
    }
    if len > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge);
    }
    Ok(())
}

/// Validate and upload one image; returns the public URL it was stored under.
pub async fn upload_image(
    store: &RemoteStore,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<String, UploadError> {
    validate_image(file_name, bytes.len())?;
    let mime = mime_guess::from_path(file_name).first_or_octet_stream();
    let request = store.authorized(
        store
            .client()
            .post(store.url("/api/assets"))
            .query(&[("name", file_name)])
            .header("Content-Type", mime.as_ref())
            .body(bytes),
    );
    let response = check(request.send().await.map_err(StoreError::from)?).await?;
    let asset: AssetRow = read_json(response).await?;
    Ok(asset.url)
}

/// Remove a previously uploaded image by its public URL.
///
/// URLs outside the asset base (hand-pasted external images) are left alone
/// and report success.
pub async fn delete_image(store: &RemoteStore, url: &str) -> Result<(), UploadError> {
    if !url.contains("/assets/") {
        return Ok(());
    }
    let request = store.authorized(
        store
            .client()
            .delete(store.url("/api/assets"))
            .query(&[("url", url)]),
    );
    check(request.send().await.map_err(StoreError::from)?).await?;
    Ok(())
}
