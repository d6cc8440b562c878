//! Projects a cache record onto the response a client receives.

use bytes::Bytes;

use crate::model::CacheRecord;

pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Framing and hop-by-hop headers (RFC 7230, section 6.1) are owned by the
/// server and never copied from a record.
const NEVER_FORWARDED: &[&str] = &[
    "connection",
    "content-length",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Response rendered from a cache record. The status is always 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Forwarded headers, named with the allow-list casing.
    pub headers: Vec<(String, String)>,
    pub content_type: String,
    pub body: Bytes,
}

/// Builds the outward response for `record`, forwarding only headers named in `allowed`.
pub fn project(record: &CacheRecord, allowed: &[String]) -> Projection {
    let mut headers = Vec::new();
    for name in allowed {
        if is_never_forwarded(name) {
            continue;
        }
        if let Some(values) = record.header(name) {
            headers.extend(values.iter().map(|v| (name.clone(), v.clone())));
        }
    }

    let content_type = match record.header("content-type") {
        Some(values) if !values.is_empty() => values.join(", "),
        _ => DEFAULT_CONTENT_TYPE.to_string(),
    };

    Projection {
        headers,
        content_type,
        body: record.body.clone(),
    }
}

fn is_never_forwarded(name: &str) -> bool {
    NEVER_FORWARDED.iter().any(|h| h.eq_ignore_ascii_case(name))
}
