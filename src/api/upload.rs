//! Client for the CSV upload endpoint.

use serde::Deserialize;

use crate::http_client;

/// Error text shown when the server supplies no usable detail message.
pub const UPLOAD_FALLBACK_ERROR: &str = "File upload failed. Please try again.";

const MAX_UPLOAD_RESPONSE_BYTES: usize = 64 * 1024;

/// Server record describing a processed upload.
///
/// The server may attach bookkeeping fields (id, upload date); only the
/// recorded filename is consumed here.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    /// Filename as recorded by the server.
    pub filename: String,
}

/// Errors from the upload call.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The server rejected the upload with a user-facing explanation.
    #[error("{detail}")]
    Rejected {
        /// Verbatim `detail` string from the response body.
        detail: String,
    },
    /// Non-2xx response without a usable `detail` field.
    #[error("Server error: HTTP {code}")]
    Status {
        /// HTTP status code.
        code: u16,
    },
    /// The request never completed.
    #[error("HTTP error: {0}")]
    Transport(String),
    /// A 2xx response that could not be understood.
    #[error("Invalid response: {0}")]
    Json(String),
}

impl UploadError {
    /// Message shown to the user: server detail verbatim, else the fixed fallback.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { detail } => detail.clone(),
            _ => UPLOAD_FALLBACK_ERROR.to_string(),
        }
    }
}

/// POST the payload to `{base_url}/upload-csv/` as the sole `file` part of a
/// multipart form.
pub fn upload_csv(
    base_url: &str,
    file_name: &str,
    payload: &[u8],
) -> Result<UploadResponse, UploadError> {
    let url = format!("{}/upload-csv/", base_url.trim_end_matches('/'));
    let (boundary, body) = encode_multipart(file_name, payload);
    let request = http_client::agent()
        .post(&url)
        .set("Accept", "application/json")
        .set(
            "Content-Type",
            &format!("multipart/form-data; boundary={boundary}"),
        );
    let response = match request.send_bytes(&body) {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            let body =
                http_client::read_body_text(response, MAX_UPLOAD_RESPONSE_BYTES).unwrap_or_default();
            return Err(match error_detail(&body) {
                Some(detail) => UploadError::Rejected { detail },
                None => UploadError::Status { code },
            });
        }
        Err(ureq::Error::Transport(err)) => return Err(UploadError::Transport(err.to_string())),
    };
    let body = http_client::read_body_text(response, MAX_UPLOAD_RESPONSE_BYTES)
        .map_err(|err| UploadError::Json(err.to_string()))?;
    parse_upload_response(&body)
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body.trim()).ok()?;
    parsed.detail.filter(|detail| !detail.trim().is_empty())
}

fn parse_upload_response(body: &str) -> Result<UploadResponse, UploadError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(UploadError::Json("Empty response body".to_string()));
    }
    serde_json::from_str(trimmed).map_err(|err| UploadError::Json(format!("{err}: {trimmed}")))
}

/// Assemble a single-part `multipart/form-data` body for the CSV payload.
fn encode_multipart(file_name: &str, payload: &[u8]) -> (String, Vec<u8>) {
    let boundary = pick_boundary(payload);
    let name = sanitized_filename(file_name);
    let mut body = Vec::with_capacity(payload.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n").as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (boundary, body)
}

/// Grow the marker until it cannot occur inside the payload.
fn pick_boundary(payload: &[u8]) -> String {
    let mut boundary = String::from("------------stocklens-form");
    while contains_bytes(payload, boundary.as_bytes()) {
        boundary.push('-');
    }
    boundary
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack.windows(needle.len()).any(|window| window == needle)
}

/// Keep the display name safe inside a quoted header value.
fn sanitized_filename(name: &str) -> String {
    name.chars()
        .map(|ch| if ch == '"' || ch.is_control() { '_' } else { ch })
        .collect()
}
