use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::header::{HeaderValue, ACCEPT, USER_AGENT};
use reqwest::RequestBuilder;

const USER_AGENT_VALUE: &str = concat!("calc-mcp-gateway/", env!("CARGO_PKG_VERSION"));

static SEQ: AtomicU64 = AtomicU64::new(0);

/// `calc-<unix millis, hex>-<per-process sequence>`; unique within a process
/// even when two calls land in the same millisecond.
pub fn generate_request_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    format!("calc-{millis:x}-{seq}")
}

/// Correlation id, user agent and JSON accept header for outbound calls.
/// Returns the builder together with the request id it carries.
pub fn add_standard_headers(
    builder: RequestBuilder,
    request_id: Option<String>,
) -> (RequestBuilder, String) {
    let rid = request_id.unwrap_or_else(generate_request_id);
    let builder = builder
        .header("x-request-id", rid.as_str())
        .header(USER_AGENT, USER_AGENT_VALUE)
        .header(ACCEPT, HeaderValue::from_static("application/json"));
    (builder, rid)
}
