//! Error type for the redoc-cfdi2pdf library.
//!
//! Every failure is fatal for the call that produced it: a conversion either
//! yields a complete [`crate::output::ConversionResult`] or one
//! [`RedocError`]. Nothing is retried or defaulted inside the library, so the
//! caller sees the exact reason and decides whether another attempt is worth it
//! (e.g. on `ConversionFailed { status: 503 }`).

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the redoc-cfdi2pdf library.
#[derive(Debug, Error)]
pub enum RedocError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Neither a path, a string nor a byte buffer was given to the source.
    #[error("No {what} content configured.\nCall from_file, from_string or from_bytes first.")]
    NoSourceConfigured { what: &'static str },

    /// The configured path does not exist.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The path exists but could not be read (permissions, directory, I/O error).
    #[error("File is not readable: '{path}': {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Remote errors ─────────────────────────────────────────────────────
    /// The conversion service answered with anything other than HTTP 200.
    #[error("Failed to convert CFDI to PDF: HTTP {status}")]
    ConversionFailed { status: u16 },

    /// HTTP 200, but a required response header is missing or unparsable.
    #[error("Malformed response from conversion service: header '{header}' {detail}")]
    MalformedResponse { header: &'static str, detail: String },

    /// The request never produced an HTTP status (DNS, TLS, connect, timeout).
    #[error("Request to '{url}' failed: {reason}\nCheck your internet connection.")]
    TransportFailed { url: String, reason: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RedocError {
    pub(crate) fn malformed(header: &'static str, detail: impl Into<String>) -> Self {
        RedocError::MalformedResponse {
            header,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_failed_display() {
        let e = RedocError::ConversionFailed { status: 404 };
        assert!(e.to_string().contains("HTTP 404"), "got: {e}");
    }

    #[test]
    fn malformed_display_names_header() {
        let e = RedocError::malformed("X-redoc-pdf-Total-Pages", "is missing");
        let msg = e.to_string();
        assert!(msg.contains("X-redoc-pdf-Total-Pages"));
        assert!(msg.contains("is missing"));
    }

    #[test]
    fn no_source_display() {
        let e = RedocError::NoSourceConfigured { what: "addenda" };
        assert!(e.to_string().contains("addenda"));
    }

    #[test]
    fn unreadable_keeps_io_source() {
        use std::error::Error as _;
        let e = RedocError::FileUnreadable {
            path: PathBuf::from("/tmp/x.xml"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/tmp/x.xml"));
    }
}
