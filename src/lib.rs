//! # redoc-cfdi2pdf
//!
//! Convert CFDI documents (Mexican electronic invoice XML) to PDF through the
//! redoc.mx conversion service.
//!
//! The service does the rendering. This crate normalises the input (file path,
//! string or bytes), optionally attaches an addenda fragment with literal
//! placeholder substitutions, sends one multipart request and decodes the
//! answer: the PDF arrives as the body, while the transaction id, page count,
//! processing time and base64-wrapped JSON metadata arrive as headers.
//!
//! ## Flow
//!
//! ```text
//! Cfdi (source + addenda + options)
//!  │
//!  ├─ 1. Source    resolve path / string / bytes (paths read once, cached)
//!  ├─ 2. Addenda   render fragment, apply substitutions in order
//!  ├─ 3. Request   multipart: xml (+ style_pdf) (+ addenda), API key header
//!  ├─ 4. Transport blocking POST
//!  └─ 5. Response  body → PDF, headers → metadata  ⇒  ConversionResult
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use redoc_cfdi2pdf::{ConversionOptions, RedocClient, Substitutions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RedocClient::new(std::env::var("REDOC_API_KEY")?)?;
//!
//!     let mut substitutions = Substitutions::new();
//!     substitutions.insert("{{ORDEN}}".into(), "PO-1024".into());
//!
//!     let addenda = client.addenda().from_file("addenda.xml");
//!     let pdf = client
//!         .cfdi()
//!         .from_file("factura.xml")
//!         .with_addenda(addenda, Some(substitutions))
//!         .to_pdf_file("factura.pdf", &ConversionOptions::new().style_pdf("modern"))?;
//!
//!     eprintln!("{} pages, transaction {}", pdf.total_pages(), pdf.transaction_id());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `cfdi2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! redoc-cfdi2pdf = { version = "0.1", default-features = false }
//! ```
//!
//! ## Threading
//!
//! Every call blocks until the round-trip finishes. [`RedocClient`] is
//! `Send + Sync` and cheap to clone. [`Cfdi`] and [`Addenda`] cache loaded
//! files and need `&mut self` to convert, so each belongs to one owner at a time.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod addenda;
pub mod cfdi;
pub mod client;
pub mod config;
pub mod error;
pub mod options;
pub mod output;
pub mod protocol;
pub mod source;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use addenda::{apply_substitutions, Addenda, Substitutions};
pub use cfdi::Cfdi;
pub use client::RedocClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use error::RedocError;
pub use options::ConversionOptions;
pub use output::ConversionResult;
pub use protocol::request::ConversionRequest;
pub use protocol::transport::{HttpTransport, Transport, TransportResponse};
pub use source::{Content, ContentKind, DocumentSource};
