//! Addenda: a supplemental XML fragment sent alongside the CFDI.
//!
//! The fragment is loaded through a [`DocumentSource`] and can carry
//! placeholders that are replaced with literal find/replace before sending.
//! Substitutions run one pair at a time, in insertion order, each over the
//! output of the previous one. A later key therefore also matches text that an
//! earlier value introduced:
//!
//! ```rust
//! use redoc_cfdi2pdf::{apply_substitutions, Substitutions};
//!
//! let subs: Substitutions = [("X", "Y"), ("Y", "Z")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.to_string()))
//!     .collect();
//! assert_eq!(apply_substitutions("X", Some(&subs)), "Z");
//! ```

use crate::error::RedocError;
use crate::source::DocumentSource;
use indexmap::IndexMap;
use std::path::PathBuf;
use tracing::debug;

/// Ordered placeholder → value pairs.
pub type Substitutions = IndexMap<String, String>;

/// Builder for the addenda fragment.
#[derive(Debug, Clone)]
pub struct Addenda {
    source: DocumentSource,
}

impl Default for Addenda {
    fn default() -> Self {
        Self {
            source: DocumentSource::labelled("addenda"),
        }
    }
}

impl Addenda {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source.set_from_path(path);
        self
    }

    pub fn from_string(mut self, content: impl Into<String>) -> Self {
        self.source.set_from_string(content);
        self
    }

    pub fn set_from_file(&mut self, path: impl Into<PathBuf>) {
        self.source.set_from_path(path);
    }

    pub fn set_from_string(&mut self, content: impl Into<String>) {
        self.source.set_from_string(content);
    }

    /// Resolve the fragment and apply `substitutions`, if any.
    ///
    /// Buffers (file contents) are decoded as UTF-8. Source errors are
    /// returned unchanged.
    pub fn render(&mut self, substitutions: Option<&Substitutions>) -> Result<String, RedocError> {
        let text = self.source.resolve()?.to_text();
        let rendered = apply_substitutions(&text, substitutions);
        debug!("Rendered addenda: {} bytes", rendered.len());
        Ok(rendered)
    }
}

/// Replace every literal occurrence of each key with its value, pair by pair.
///
/// With `None` the content is returned unchanged.
pub fn apply_substitutions(content: &str, substitutions: Option<&Substitutions>) -> String {
    let Some(substitutions) = substitutions else {
        return content.to_string();
    };

    substitutions
        .iter()
        .fold(content.to_string(), |acc, (key, value)| acc.replace(key.as_str(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn subs(pairs: &[(&str, &str)]) -> Substitutions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn replaces_each_key() {
        let mut addenda = Addenda::new().from_string("A and B");
        let out = addenda.render(Some(&subs(&[("A", "1"), ("B", "2")]))).unwrap();
        assert_eq!(out, "1 and 2");
    }

    #[test]
    fn no_substitutions_is_identity() {
        let text = "<addenda folio=\"{{FOLIO}}\"/>";
        let mut addenda = Addenda::new().from_string(text);
        assert_eq!(addenda.render(None).unwrap(), text);
    }

    #[test]
    fn empty_substitutions_is_identity() {
        assert_eq!(apply_substitutions("abc", Some(&Substitutions::new())), "abc");
    }

    #[test]
    fn sequential_rewrite() {
        // Later keys see the output of earlier replacements.
        let out = apply_substitutions("X", Some(&subs(&[("X", "Y"), ("Y", "Z")])));
        assert_eq!(out, "Z");
    }

    #[test]
    fn insertion_order_matters() {
        let out = apply_substitutions("X", Some(&subs(&[("Y", "Z"), ("X", "Y")])));
        assert_eq!(out, "Y");
    }

    #[test]
    fn keys_are_literal_not_regex() {
        let out = apply_substitutions("a.c abc", Some(&subs(&[("a.c", "_")])));
        assert_eq!(out, "_ abc");
    }

    #[test]
    fn renders_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all("<Addenda total=\"{{TOTAL}}\" nota=\"añejo\"/>".as_bytes())
            .unwrap();

        let mut addenda = Addenda::new().from_file(f.path());
        let out = addenda
            .render(Some(&subs(&[("{{TOTAL}}", "100.00")])))
            .unwrap();
        assert_eq!(out, "<Addenda total=\"100.00\" nota=\"añejo\"/>");
    }

    #[test]
    fn missing_file_propagates() {
        let mut addenda = Addenda::new().from_file("/definitely/not/addenda.xml");
        assert!(matches!(
            addenda.render(None).unwrap_err(),
            RedocError::FileNotFound { .. }
        ));
    }

    #[test]
    fn unconfigured_names_addenda() {
        let mut addenda = Addenda::new();
        assert!(matches!(
            addenda.render(None).unwrap_err(),
            RedocError::NoSourceConfigured { what: "addenda" }
        ));
    }
}
