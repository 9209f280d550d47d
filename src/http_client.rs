//! Shared HTTP client and bounded response-body helpers.

use std::io::{self, Read};
use std::sync::OnceLock;

/// Return the process-wide HTTP agent.
///
/// No timeouts are configured; calls rely on default network stack behavior.
pub(crate) fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| ureq::AgentBuilder::new().build())
}

/// Read a response body as UTF-8 text, enforcing a maximum byte size.
pub(crate) fn read_body_text(response: ureq::Response, max_bytes: usize) -> io::Result<String> {
    if let Some(declared) = declared_length(&response) {
        if declared > max_bytes as u64 {
            return Err(too_large(declared));
        }
    }
    let mut reader = response.into_reader().take(max_bytes as u64 + 1);
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    if text.len() > max_bytes {
        return Err(too_large(text.len() as u64));
    }
    Ok(text)
}

fn declared_length(response: &ureq::Response) -> Option<u64> {
    response.header("Content-Length")?.parse().ok()
}

fn too_large(bytes: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Response body too large: {bytes} bytes"),
    )
}
