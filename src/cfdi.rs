//! CFDI handle: document source + optional addenda, converted via the client.

use crate::addenda::{Addenda, Substitutions};
use crate::client::RedocClient;
use crate::error::RedocError;
use crate::options::ConversionOptions;
use crate::output::ConversionResult;
use crate::source::DocumentSource;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
struct AddendaSetup {
    addenda: Addenda,
    substitutions: Option<Substitutions>,
}

/// A CFDI document ready to be converted to PDF.
///
/// Obtained from [`RedocClient::cfdi`]. Conversion needs `&mut self` because
/// file sources are loaded on first use and cached.
#[derive(Debug, Clone)]
pub struct Cfdi {
    client: RedocClient,
    source: DocumentSource,
    addenda: Option<AddendaSetup>,
}

impl Cfdi {
    pub fn new(client: RedocClient) -> Self {
        Self {
            client,
            source: DocumentSource::labelled("CFDI"),
            addenda: None,
        }
    }

    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source.set_from_path(path);
        self
    }

    pub fn from_string(mut self, xml: impl Into<String>) -> Self {
        self.source.set_from_string(xml);
        self
    }

    pub fn from_bytes(mut self, xml: impl Into<Vec<u8>>) -> Self {
        self.source.set_from_bytes(xml);
        self
    }

    pub fn set_from_file(&mut self, path: impl Into<PathBuf>) {
        self.source.set_from_path(path);
    }

    pub fn set_from_string(&mut self, xml: impl Into<String>) {
        self.source.set_from_string(xml);
    }

    pub fn set_from_bytes(&mut self, xml: impl Into<Vec<u8>>) {
        self.source.set_from_bytes(xml);
    }

    /// Attach an addenda without substitutions, replacing any previous one.
    pub fn set_addenda(&mut self, addenda: Addenda) {
        self.set_addenda_with(addenda, None);
    }

    /// Attach an addenda and its substitutions, replacing any previous setup.
    pub fn set_addenda_with(&mut self, addenda: Addenda, substitutions: Option<Substitutions>) {
        self.addenda = Some(AddendaSetup {
            addenda,
            substitutions,
        });
    }

    pub fn with_addenda(mut self, addenda: Addenda, substitutions: Option<Substitutions>) -> Self {
        self.set_addenda_with(addenda, substitutions);
        self
    }

    pub fn to_pdf(&mut self) -> Result<ConversionResult, RedocError> {
        self.to_pdf_with(&ConversionOptions::default())
    }

    /// Convert with `options`.
    ///
    /// A configured addenda is rendered and replaces `options.addenda` in the
    /// request; `options` itself is left untouched.
    pub fn to_pdf_with(
        &mut self,
        options: &ConversionOptions,
    ) -> Result<ConversionResult, RedocError> {
        let xml = self.source.resolve()?;
        let rendered = self
            .addenda
            .as_mut()
            .map(|setup| setup.addenda.render(setup.substitutions.as_ref()))
            .transpose()?;

        let effective = options.merged_with_addenda(rendered);
        self.client.convert(xml.as_bytes(), &effective)
    }

    /// Convert and write the PDF to `path` atomically.
    ///
    /// If the write fails the conversion already happened server-side; its
    /// transaction id is logged before the error is returned.
    pub fn to_pdf_file(
        &mut self,
        path: impl AsRef<Path>,
        options: &ConversionOptions,
    ) -> Result<ConversionResult, RedocError> {
        let path = path.as_ref();
        let result = self.to_pdf_with(options)?;
        if let Err(e) = result.save(path) {
            warn!(
                "Converted (transaction {}) but could not write {}",
                result.transaction_id(),
                path.display()
            );
            return Err(e);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::protocol::request::ConversionRequest;
    use crate::protocol::transport::{Transport, TransportResponse};
    use std::sync::Arc;

    struct Unreachable;

    struct Converts;

    impl Transport for Converts {
        fn send(&self, _request: &ConversionRequest) -> Result<TransportResponse, RedocError> {
            Ok(TransportResponse::new(200, b"%PDF-1.7".to_vec())
                .with_header("X-redoc-Transaction-Id", "tx-kept")
                .with_header("X-redoc-pdf-Total-Pages", "1")
                .with_header("x-redoc-process-total-time", "9")
                .with_header("X-redoc-xml-Metadata", "e30="))
        }
    }

    impl Transport for Unreachable {
        fn send(&self, _request: &ConversionRequest) -> Result<TransportResponse, RedocError> {
            panic!("no request expected");
        }
    }

    fn cfdi() -> Cfdi {
        let config = ClientConfig::builder("key").build().unwrap();
        RedocClient::with_transport(config, Arc::new(Unreachable)).cfdi()
    }

    #[test]
    fn missing_source_fails_before_sending() {
        let err = cfdi().to_pdf().unwrap_err();
        assert!(matches!(err, RedocError::NoSourceConfigured { what: "CFDI" }));
    }

    #[test]
    fn addenda_error_fails_before_sending() {
        let mut doc = cfdi()
            .from_string("<cfdi/>")
            .with_addenda(Addenda::new().from_file("/definitely/not/addenda.xml"), None);
        assert!(matches!(
            doc.to_pdf().unwrap_err(),
            RedocError::FileNotFound { .. }
        ));
    }

    #[test]
    fn unwritable_output_reports_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let config = ClientConfig::builder("key").build().unwrap();
        let mut doc = RedocClient::with_transport(config, Arc::new(Converts))
            .cfdi()
            .from_string("<cfdi/>");
        let err = doc
            .to_pdf_file(blocker.join("out.pdf"), &ConversionOptions::default())
            .unwrap_err();
        assert!(matches!(err, RedocError::OutputWriteFailed { .. }));
    }
}
