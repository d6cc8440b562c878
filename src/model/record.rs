//! Persisted cache record.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

/// Freshness window of every record, counted from the completed fetch.
pub const CACHE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Unit persisted per cache key: expiry, response headers and raw body.
///
/// Header names are lower case. The body is base64 in the JSON encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub expire_at: DateTime<Utc>,
    pub headers: BTreeMap<String, Vec<String>>,
    #[serde(serialize_with = "encode_body", deserialize_with = "decode_body")]
    pub body: Bytes,
}

impl CacheRecord {
    /// Builds a record from an upstream response, lower-casing header names.
    /// Values of headers whose names differ only by case are merged in order.
    pub fn from_response<I, K, V>(headers: I, body: Bytes, expire_at: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in headers {
            map.entry(name.as_ref().to_ascii_lowercase())
                .or_default()
                .push(value.into());
        }
        Self {
            expire_at,
            headers: map,
            body,
        }
    }

    /// Returns the expiry for a record whose fetch completed at `now`.
    pub fn expiry_from(now: DateTime<Utc>) -> DateTime<Utc> {
        now + chrono::Duration::from_std(CACHE_TTL).unwrap_or_else(|_| chrono::Duration::hours(2))
    }

    /// A record is fresh only while its expiry is strictly after `now`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_at > now
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_json(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }
}

fn encode_body<S: Serializer>(body: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(body))
}

fn decode_body<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
    let raw = <Option<String>>::deserialize(deserializer)?.unwrap_or_default();
    STANDARD
        .decode(raw.as_bytes())
        .map(Bytes::from)
        .map_err(serde::de::Error::custom)
}
