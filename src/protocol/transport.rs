//! HTTP transport: send a [`ConversionRequest`], get status + headers + body.
//!
//! [`Transport`] is the seam between the protocol and the network. The
//! default [`HttpTransport`] uses a blocking `reqwest` client; each `send` is
//! one synchronous round-trip bounded by the configured timeout. Connection
//! pooling lives inside the `reqwest` client and is shared by clones of
//! [`crate::client::RedocClient`].

use crate::error::RedocError;
use crate::protocol::request::{ConversionRequest, PartBody};
use reqwest::blocking::multipart::{Form, Part};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Sends one conversion request and returns the raw response.
///
/// Implementations only report failures that prevent an HTTP status from
/// being obtained; every status, including errors, is returned as `Ok`.
pub trait Transport: Send + Sync {
    fn send(&self, request: &ConversionRequest) -> Result<TransportResponse, RedocError>;
}

/// Raw HTTP response. Header names are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    pub fn insert_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Header value, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// [`Transport`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64) -> Result<Self, RedocError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                RedocError::InvalidConfig(format!("Failed to build HTTP client: {e}"))
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ConversionRequest) -> Result<TransportResponse, RedocError> {
        let failed = |e: reqwest::Error| RedocError::TransportFailed {
            url: request.url.clone(),
            reason: if e.is_timeout() {
                format!("timed out: {e}")
            } else {
                e.to_string()
            },
        };

        let mut form = Form::new();
        for part in &request.parts {
            form = match &part.body {
                PartBody::File {
                    filename,
                    content_type,
                    bytes,
                } => {
                    let file = Part::bytes(bytes.clone())
                        .file_name(*filename)
                        .mime_str(content_type)
                        .map_err(failed)?;
                    form.part(part.name, file)
                }
                PartBody::Text(text) => form.text(part.name, text.clone()),
            };
        }

        let mut builder = self.client.post(&request.url).multipart(form);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        debug!("POST {}", request.url);
        let response = builder.send().map_err(failed)?;

        let mut out = TransportResponse::new(response.status().as_u16(), Vec::new());
        let headers = response.headers();
        for name in headers.keys() {
            // First value of a repeated header wins. Non-ASCII values are
            // dropped; required headers are checked later.
            if let Some(v) = headers.get(name).and_then(|v| v.to_str().ok()) {
                out.insert_header(name.as_str(), v);
            }
        }
        out.body = response.bytes().map_err(failed)?.to_vec();

        debug!("HTTP {} with {} body bytes", out.status, out.body.len());
        Ok(out)
    }
}
