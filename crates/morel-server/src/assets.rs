//! Uploaded image storage: naming, limits, serving, deletion

use crate::routes::{empty_response, error_response, json_response, require_auth, ResponseBody};
use crate::state::ServerState;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response, StatusCode};
use morel_core::wire::AssetRow;
use percent_encoding::percent_decode_str;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// MIME types accepted for uploads.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Store one uploaded image and answer with its public URL.
///
/// The declared `Content-Type` is checked against the allow-list, falling
/// back to a guess from the `name` query parameter's extension; then the
/// body is checked against the configured size cap.
pub async fn upload(
    state: &Arc<ServerState>,
    req: Request<Incoming>,
) -> Result<Response<ResponseBody>, hyper::Error> {
    if let Some(denied) = require_auth(state, &req).await {
        return Ok(denied);
    }
    let name = query_param(req.uri().query(), "name").unwrap_or_default();
    let declared = req
        .headers()
        .get("Content-Type")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());
    let body = req.into_body().collect().await?.to_bytes();

    let mime = match declared {
        Some(declared) => essence(&declared).to_string(),
        None => mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    };
    if !ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Ok(error_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Please select a valid image file (JPEG, PNG, WebP, or GIF)",
        ));
    }
    if body.len() > state.config.max_upload_bytes {
        return Ok(error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "Image file must be less than 10MB",
        ));
    }

    let file_name = stored_name(&name, chrono::Utc::now().timestamp_millis());
    let path = Path::new(&state.config.asset_dir).join(&file_name);
    match fs::write(&path, &body).await {
        Ok(()) => {
            tracing::info!("stored asset {file_name} ({} bytes)", body.len());
            Ok(json_response(
                StatusCode::CREATED,
                &AssetRow {
                    url: format!("/assets/{file_name}"),
                },
            ))
        }
        Err(err) => {
            tracing::error!("asset write failed: {err}");
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
            ))
        }
    }
}

/// Serve one stored image.
pub async fn serve(state: &ServerState, method: &Method, file: &str) -> Response<ResponseBody> {
    if method != Method::GET {
        return error_response(StatusCode::NOT_FOUND, "No such route");
    }
    let decoded = match percent_decode_str(file).decode_utf8() {
        Ok(decoded) => decoded.to_string(),
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid path encoding"),
    };
    // Stored names are flat; anything path-like is hostile.
    if decoded.is_empty() || decoded.contains("..") || decoded.contains('/') {
        return error_response(StatusCode::BAD_REQUEST, "Invalid asset name");
    }
    let path = Path::new(&state.config.asset_dir).join(&decoded);
    match fs::read(&path).await {
        Ok(contents) => {
            let mime = mime_guess::from_path(&path)
                .first_or_octet_stream()
                .to_string();
            Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", mime)
                .header("Content-Length", contents.len())
                .header("Cache-Control", "public, max-age=3600")
                .body(Full::new(Bytes::from(contents)).boxed())
                .unwrap()
        }
        Err(_) => error_response(StatusCode::NOT_FOUND, "No such asset"),
    }
}

/// Remove one stored image by its public URL.
///
/// URLs outside the asset base are skipped successfully, so callers can
/// hand in whatever an item's image field holds. Removal is idempotent.
pub async fn remove(state: &Arc<ServerState>, req: &Request<Incoming>) -> Response<ResponseBody> {
    if let Some(denied) = require_auth(state, req).await {
        return denied;
    }
    let url = query_param(req.uri().query(), "url").unwrap_or_default();
    let Some(file_name) = stored_file_name(&url) else {
        return empty_response(StatusCode::NO_CONTENT);
    };
    let path = Path::new(&state.config.asset_dir).join(file_name);
    match fs::remove_file(&path).await {
        Ok(()) => empty_response(StatusCode::NO_CONTENT),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            empty_response(StatusCode::NO_CONTENT)
        }
        Err(err) => {
            tracing::error!("asset removal failed: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

/// Storage name for an upload: lowercased stem with non-alphanumerics
/// hyphenated, a millisecond timestamp for uniqueness, the extension kept.
fn stored_name(original: &str, millis: i64) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("image");
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("bin");
    let slug: String = stem
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("{slug}-{millis}.{ext}")
}

/// The flat file name of a URL under the asset base; `None` for external
/// URLs and anything path-like.
fn stored_file_name(url: &str) -> Option<&str> {
    let (_, name) = url.rsplit_once("/assets/")?;
    if name.is_empty() || name.contains('/') || name.contains("..") {
        return None;
    }
    Some(name)
}

/// One decoded value from a query string, with `+` treated as space.
fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    for pair in query?.split('&') {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        if k == key {
            let v = v.replace('+', " ");
            return percent_decode_str(&v)
                .decode_utf8()
                .ok()
                .map(|decoded| decoded.to_string());
        }
    }
    None
}

fn essence(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_name_slugs_the_stem_and_keeps_the_extension() {
        assert_eq!(
            stored_name("Golden Teachers.png", 1700000000000),
            "golden-teachers-1700000000000.png"
        );
        assert_eq!(
            stored_name("IMG_2024 (1).JPG", 1700000000000),
            "img-2024--1--1700000000000.JPG"
        );
    }

    #[test]
    fn test_stored_name_defaults() {
        assert_eq!(stored_name("caps", 7), "caps-7.bin");
        assert_eq!(stored_name("", 7), "image-7.bin");
    }

    #[test]
    fn test_stored_file_name_accepts_only_the_asset_base() {
        assert_eq!(
            stored_file_name("http://127.0.0.1:8420/assets/caps-7.png"),
            Some("caps-7.png")
        );
        assert_eq!(stored_file_name("/assets/caps-7.png"), Some("caps-7.png"));
        assert_eq!(stored_file_name("https://example.com/caps.png"), None);
        assert_eq!(stored_file_name("/assets/nested/caps.png"), None);
        assert_eq!(stored_file_name("/assets/../morel.db"), None);
        assert_eq!(stored_file_name("/assets/"), None);
    }

    #[test]
    fn test_query_param_decoding() {
        assert_eq!(
            query_param(Some("name=Golden+Teachers.png"), "name").as_deref(),
            Some("Golden Teachers.png")
        );
        assert_eq!(
            query_param(Some("name=caps%202.png&other=x"), "name").as_deref(),
            Some("caps 2.png")
        );
        assert_eq!(query_param(Some("other=x"), "name"), None);
        assert_eq!(query_param(None, "name"), None);
    }

    #[test]
    fn test_content_type_params_are_ignored() {
        assert_eq!(essence("image/png; charset=binary"), "image/png");
        assert_eq!(essence("image/png"), "image/png");
    }
}
