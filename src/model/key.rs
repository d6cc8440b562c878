//! Cache key derivation.

use std::fmt;
use std::fmt::Write;

const SEPARATOR: char = '-';

/// Deterministic, filesystem-safe identifier of a (group, subscription) pair.
///
/// Both components are escaped before joining: ASCII alphanumerics and `_`
/// are kept as is, every other byte (the separator included) becomes `%XX`.
/// Escaped components never contain the separator, so distinct pairs can
/// not collide, and the key never contains path separators or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(group: &str, subscribe: &str) -> Self {
        let mut key = String::with_capacity(group.len() + subscribe.len() + 1);
        escape_into(&mut key, group);
        key.push(SEPARATOR);
        escape_into(&mut key, subscribe);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the cache file holding the record for this key.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn escape_into(out: &mut String, component: &str) {
    for byte in component.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' {
            out.push(byte as char);
        } else {
            let _ = write!(out, "%{:02X}", byte);
        }
    }
}
