//! Client for the inventory summary endpoint.

use serde::Deserialize;

use crate::http_client;

const MAX_SUMMARY_RESPONSE_BYTES: usize = 64 * 1024;

/// Aggregate counts of item status changes, computed server-side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InventorySummary {
    /// Items that first appeared in the latest upload.
    pub new_items_count: u64,
    /// Items that disappeared since the previous upload.
    pub sold_items_count: u64,
    /// Items unchanged in inventory for three or more months.
    pub aging_items_count: u64,
    /// Items present and unchanged.
    pub unchanged_items_count: u64,
}

/// Outcome of a successful summary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryFetch {
    /// The server returned the four counts.
    Data(InventorySummary),
    /// The server has no data yet.
    Empty,
}

/// Errors from the summary call.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Non-2xx response.
    #[error("Server error: HTTP {code}")]
    Status {
        /// HTTP status code.
        code: u16,
    },
    /// The request never completed.
    #[error("HTTP error: {0}")]
    Transport(String),
    /// The response body could not be read.
    #[error("Invalid response: {0}")]
    Body(String),
}

/// GET `{base_url}/inventory-changes/` and classify the response.
///
/// Any 2xx body lacking the expected count fields (including an empty body)
/// is reported as [`SummaryFetch::Empty`] rather than an error.
pub fn fetch_summary(base_url: &str) -> Result<SummaryFetch, FetchError> {
    let url = format!("{}/inventory-changes/", base_url.trim_end_matches('/'));
    let response = match http_client::agent()
        .get(&url)
        .set("Accept", "application/json")
        .call()
    {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _response)) => return Err(FetchError::Status { code }),
        Err(ureq::Error::Transport(err)) => return Err(FetchError::Transport(err.to_string())),
    };
    let body = http_client::read_body_text(response, MAX_SUMMARY_RESPONSE_BYTES)
        .map_err(|err| FetchError::Body(err.to_string()))?;
    Ok(classify_summary_body(&body))
}

fn classify_summary_body(body: &str) -> SummaryFetch {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return SummaryFetch::Empty;
    }
    match serde_json::from_str::<InventorySummary>(trimmed) {
        Ok(summary) => SummaryFetch::Data(summary),
        Err(err) => {
            tracing::debug!("Summary body without count fields treated as no data: {err}");
            SummaryFetch::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    #[test]
    fn classifies_full_body_as_data() {
        let body = r#"{
            "new_items_count": 5,
            "sold_items_count": 2,
            "aging_items_count": 1,
            "unchanged_items_count": 10
        }"#;
        let SummaryFetch::Data(summary) = classify_summary_body(body) else {
            panic!("expected data");
        };
        assert_eq!(summary.new_items_count, 5);
        assert_eq!(summary.sold_items_count, 2);
        assert_eq!(summary.aging_items_count, 1);
        assert_eq!(summary.unchanged_items_count, 10);
    }

    #[test]
    fn empty_body_means_no_data_yet() {
        assert_eq!(classify_summary_body(""), SummaryFetch::Empty);
        assert_eq!(classify_summary_body("  \n"), SummaryFetch::Empty);
    }

    #[test]
    fn body_without_count_fields_means_no_data_yet() {
        assert_eq!(classify_summary_body(r#"{"detail": "pending"}"#), SummaryFetch::Empty);
        assert_eq!(classify_summary_body("not json"), SummaryFetch::Empty);
    }

    #[test]
    fn fetch_round_trip_returns_counts() {
        let body = r#"{"new_items_count":5,"sold_items_count":2,"aging_items_count":1,"unchanged_items_count":10}"#;
        let url = serve_once(format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        ));
        let fetched = fetch_summary(&url).unwrap();
        assert!(matches!(fetched, SummaryFetch::Data(summary) if summary.unchanged_items_count == 10));
    }

    #[test]
    fn fetch_with_empty_response_is_empty_state() {
        let url = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n".to_string());
        assert_eq!(fetch_summary(&url).unwrap(), SummaryFetch::Empty);
    }

    #[test]
    fn non_2xx_is_a_fetch_error() {
        let body = r#"{"detail": "No inventory data found to calculate changes."}"#;
        let url = serve_once(format!(
            "HTTP/1.1 404 Not Found\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        ));
        let err = fetch_summary(&url).unwrap_err();
        assert!(matches!(err, FetchError::Status { code: 404 }));
    }
}
