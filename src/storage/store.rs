//! File-backed store of cache records, one JSON file per key.

use chrono::Utc;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::model::{CacheKey, CacheRecord};

const TMP_SUFFIX: &str = ".tmp";

/// Reads and writes cache records under a single directory.
///
/// Readers never observe a half-written record: a record is serialized in
/// memory, written to a sibling temp file and renamed over the final path.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the record for `key`.
    pub fn path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Returns a fresh record for `key`.
    ///
    /// A missing file, an undecodable file and an expired record are all
    /// reported as `Ok(None)`. Only other I/O failures are errors.
    pub async fn read(&self, key: &CacheKey) -> io::Result<Option<CacheRecord>> {
        let path = self.path(key);
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let record = match CacheRecord::from_json(&data) {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    component = "storage",
                    event = "decode_failed",
                    key = %key,
                    error = %e,
                    "cache record is corrupt, treating as miss"
                );
                return Ok(None);
            }
        };

        if !record.is_fresh_at(Utc::now()) {
            debug!(
                component = "storage",
                event = "expired",
                key = %key,
                expire_at = %record.expire_at,
                "cache record expired"
            );
            return Ok(None);
        }

        Ok(Some(record))
    }

    /// Persists `record` for `key`, replacing any previous record atomically.
    pub async fn write(&self, key: &CacheKey, record: &CacheRecord) -> io::Result<()> {
        let data = record.to_json().map_err(io::Error::from)?;

        fs::create_dir_all(&self.dir).await?;

        let path = self.path(key);
        let tmp_path = self.dir.join(format!("{}{}", key.file_name(), TMP_SUFFIX));

        if let Err(e) = fs::write(&tmp_path, &data).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e);
        }

        debug!(
            component = "storage",
            event = "written",
            key = %key,
            bytes = data.len(),
            "cache record written"
        );

        Ok(())
    }
}
