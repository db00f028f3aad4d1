//! Request assembly: document bytes + options → multipart parts and headers.
//!
//! The request is described as plain data so it can be inspected in tests and
//! handed to any [`crate::protocol::transport::Transport`]. The document is
//! always sent as a binary `xml` part, whether it was loaded as text or bytes.

use crate::config::ClientConfig;
use crate::options::ConversionOptions;
use std::fmt;

pub const XML_PART: &str = "xml";
pub const XML_FILENAME: &str = "document.xml";
pub const XML_CONTENT_TYPE: &str = "text/xml";
pub const STYLE_PDF_PART: &str = "style_pdf";
pub const ADDENDA_PART: &str = "addenda";

pub const API_KEY_HEADER: &str = "X-Redoc-Api-Key";
pub const ACCEPT_HEADER: &str = "Accept";
pub const ACCEPT_PDF: &str = "application/pdf";

/// Body of one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartBody {
    /// Binary file part with a filename and content type.
    File {
        filename: &'static str,
        content_type: &'static str,
        bytes: Vec<u8>,
    },
    /// Plain text field.
    Text(String),
}

/// One named multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: &'static str,
    pub body: PartBody,
}

/// A fully assembled conversion request.
#[derive(Clone)]
pub struct ConversionRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub parts: Vec<Part>,
}

impl fmt::Debug for ConversionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<&str> = self.headers.iter().map(|(name, _)| *name).collect();
        let parts: Vec<&str> = self.parts.iter().map(|p| p.name).collect();
        f.debug_struct("ConversionRequest")
            .field("url", &self.url)
            .field("headers", &headers)
            .field("parts", &parts)
            .finish()
    }
}

impl ConversionRequest {
    /// Build the POST for `xml` with the effective `options`.
    ///
    /// `style_pdf` and `addenda` parts are only added when set.
    pub fn new(config: &ClientConfig, xml: &[u8], options: &ConversionOptions) -> Self {
        let mut parts = vec![Part {
            name: XML_PART,
            body: PartBody::File {
                filename: XML_FILENAME,
                content_type: XML_CONTENT_TYPE,
                bytes: xml.to_vec(),
            },
        }];

        if let Some(ref style) = options.style_pdf {
            parts.push(Part {
                name: STYLE_PDF_PART,
                body: PartBody::Text(style.clone()),
            });
        }
        if let Some(ref addenda) = options.addenda {
            parts.push(Part {
                name: ADDENDA_PART,
                body: PartBody::Text(addenda.clone()),
            });
        }

        Self {
            url: config.base_url.clone(),
            headers: vec![
                (ACCEPT_HEADER, ACCEPT_PDF.to_string()),
                (API_KEY_HEADER, config.api_key.clone()),
            ],
            parts,
        }
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Value of a text part, if present.
    pub fn text_part(&self, name: &str) -> Option<&str> {
        match self.part(name).map(|p| &p.body) {
            Some(PartBody::Text(t)) => Some(t.as_str()),
            _ => None,
        }
    }

    /// Header value, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
