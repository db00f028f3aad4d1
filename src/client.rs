//! Client entry point.
//!
//! [`RedocClient`] owns the credential, endpoint and transport. It holds no
//! document state: each [`RedocClient::convert`] is an independent
//! request/response cycle, and clones share one connection pool.

use crate::addenda::Addenda;
use crate::cfdi::Cfdi;
use crate::config::ClientConfig;
use crate::error::RedocError;
use crate::options::ConversionOptions;
use crate::output::ConversionResult;
use crate::protocol::request::ConversionRequest;
use crate::protocol::response::decode_response;
use crate::protocol::transport::{HttpTransport, Transport};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Client for the redoc.mx CFDI → PDF conversion service.
///
/// # Example
/// ```rust,no_run
/// use redoc_cfdi2pdf::{ConversionOptions, RedocClient};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RedocClient::new("my-api-key")?;
/// let pdf = client
///     .cfdi()
///     .from_file("factura.xml")
///     .to_pdf_with(&ConversionOptions::new().style_pdf("modern"))?;
/// std::fs::write("factura.pdf", pdf.payload())?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedocClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for RedocClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedocClient")
            .field("config", &self.config)
            .field("transport", &"<dyn Transport>")
            .finish()
    }
}

impl RedocClient {
    /// Client for the default endpoint with default timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, RedocError> {
        Self::from_config(ClientConfig::builder(api_key).build()?)
    }

    /// Client over HTTP using `config`.
    pub fn from_config(config: ClientConfig) -> Result<Self, RedocError> {
        let transport = HttpTransport::new(config.timeout_secs)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Client over a caller-supplied transport (proxies, tests).
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A new, empty CFDI handle bound to this client.
    pub fn cfdi(&self) -> Cfdi {
        Cfdi::new(self.clone())
    }

    /// A new, empty addenda builder.
    pub fn addenda(&self) -> Addenda {
        Addenda::new()
    }

    /// Convert raw CFDI bytes with the given effective options.
    ///
    /// One blocking round-trip; no retries.
    pub fn convert(
        &self,
        xml: &[u8],
        options: &ConversionOptions,
    ) -> Result<ConversionResult, RedocError> {
        let start = Instant::now();
        let request = ConversionRequest::new(&self.config, xml, options);
        debug!(
            "Sending {} byte CFDI (style: {:?}, addenda: {})",
            xml.len(),
            options.style_pdf,
            options.addenda.is_some()
        );

        let response = self.transport.send(&request)?;
        let result = decode_response(response)?;

        info!(
            "Converted CFDI: transaction {}, {} pages, {}ms server / {}ms total",
            result.transaction_id(),
            result.total_pages(),
            result.total_time_ms(),
            start.elapsed().as_millis()
        );
        Ok(result)
    }
}
