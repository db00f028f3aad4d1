//! Wire protocol for the redoc.mx conversion endpoint.
//!
//! Each submodule implements exactly one step of a conversion round-trip:
//!
//! ```text
//! request ──▶ transport ──▶ response
//! (multipart)  (HTTP POST)   (headers → ConversionResult)
//! ```
//!
//! 1. [`request`]: assemble the multipart parts and headers from the
//!    document bytes and effective options
//! 2. [`transport`]: send the request; the only stage with network I/O, and
//!    the seam tests replace with an in-memory implementation
//! 3. [`response`]: decode status, four custom headers (one base64 JSON) and
//!    the PDF body into an immutable result

pub mod request;
pub mod response;
pub mod transport;
