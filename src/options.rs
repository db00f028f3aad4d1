//! Conversion options sent with each request.
//!
//! Options are plain values. [`crate::cfdi::Cfdi`] never writes into the
//! caller's options; it builds the effective set per call with
//! [`ConversionOptions::merged_with_addenda`], where a rendered addenda
//! replaces any literal `addenda` the caller supplied.

use serde::{Deserialize, Serialize};

/// Named string parameters controlling remote rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// Rendering style selector, passed through as the `style_pdf` part.
    pub style_pdf: Option<String>,

    /// Addenda XML text, passed through as the `addenda` part.
    pub addenda: Option<String>,
}

impl ConversionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style_pdf(mut self, style: impl Into<String>) -> Self {
        self.style_pdf = Some(style.into());
        self
    }

    pub fn addenda(mut self, content: impl Into<String>) -> Self {
        self.addenda = Some(content.into());
        self
    }

    /// Effective options for one call: `self` with `addenda` overridden when
    /// a rendered addenda is present.
    pub fn merged_with_addenda(&self, rendered: Option<String>) -> Self {
        match rendered {
            Some(addenda) => Self {
                addenda: Some(addenda),
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}
