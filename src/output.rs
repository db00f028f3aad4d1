//! Conversion result.

use crate::error::RedocError;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// A rendered PDF plus the metadata the service reported for it.
///
/// Only produced by a successful decode; immutable afterwards. Serialises to
/// JSON without the payload bytes.
#[derive(Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    #[serde(skip)]
    payload: Vec<u8>,
    transaction_id: String,
    total_pages: u32,
    total_time_ms: u64,
    metadata: serde_json::Value,
}

impl fmt::Debug for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionResult")
            .field("payload", &format_args!("<{} bytes>", self.payload.len()))
            .field("transaction_id", &self.transaction_id)
            .field("total_pages", &self.total_pages)
            .field("total_time_ms", &self.total_time_ms)
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl ConversionResult {
    pub(crate) fn new(
        payload: Vec<u8>,
        transaction_id: String,
        total_pages: u32,
        total_time_ms: u64,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            payload,
            transaction_id,
            total_pages,
            total_time_ms,
            metadata,
        }
    }

    /// The PDF bytes exactly as received.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Opaque id the service assigned to this conversion.
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Server-side processing time in milliseconds.
    pub fn total_time_ms(&self) -> u64 {
        self.total_time_ms
    }

    /// Structured CFDI metadata extracted by the service.
    pub fn metadata(&self) -> &serde_json::Value {
        &self.metadata
    }

    /// Write the PDF to `path`.
    ///
    /// Uses atomic write (temp file in the same directory + rename) so a
    /// failed write never leaves a truncated PDF behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RedocError> {
        let path = path.as_ref();
        let write_failed = |source: std::io::Error| RedocError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(write_failed)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_failed)?;
        tmp.write_all(&self.payload).map_err(write_failed)?;
        tmp.persist(path).map_err(|e| write_failed(e.error))?;

        debug!("Wrote {} bytes to {}", self.payload.len(), path.display());
        Ok(())
    }
}
