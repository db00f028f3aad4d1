//! Document sources: normalise a path, string or byte buffer into [`Content`].
//!
//! A [`DocumentSource`] holds at most one origin. When several `set_*` calls
//! compete, precedence decides which one survives:
//!
//! ```text
//! text  >  buffer (explicit bytes or an already-loaded path)  >  unread path
//! ```
//!
//! An incoming origin replaces the current one only if its precedence is equal
//! or higher. Paths are read lazily on the first [`DocumentSource::resolve`]
//! and the bytes are kept, so later resolutions never touch the filesystem.
//!
//! `resolve` takes `&mut self`: one owner per source. Share the resulting
//! bytes, not the source.

use crate::error::RedocError;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Whether resolved content came in as text or as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    String,
    Buffer,
}

/// Resolved content, borrowed from its [`DocumentSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> Content<'a> {
    pub fn kind(&self) -> ContentKind {
        match *self {
            Content::Text(_) => ContentKind::String,
            Content::Bytes(_) => ContentKind::Buffer,
        }
    }

    /// Raw bytes; text is already UTF-8.
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Content::Text(t) => t.as_bytes(),
            Content::Bytes(b) => b,
        }
    }

    /// Content as text. Invalid UTF-8 in buffers becomes U+FFFD.
    pub fn to_text(&self) -> Cow<'a, str> {
        match *self {
            Content::Text(t) => Cow::Borrowed(t),
            Content::Bytes(b) => String::from_utf8_lossy(b),
        }
    }
}

#[derive(Debug, Clone)]
enum Origin {
    Text(String),
    Bytes(Vec<u8>),
    Path {
        path: PathBuf,
        loaded: Option<Vec<u8>>,
    },
}

impl Origin {
    fn precedence(&self) -> u8 {
        match self {
            Origin::Text(_) => 3,
            Origin::Bytes(_) | Origin::Path { loaded: Some(_), .. } => 2,
            Origin::Path { loaded: None, .. } => 1,
        }
    }
}

/// Where a document comes from: a file path, a string or a byte buffer.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    what: &'static str,
    origin: Option<Origin>,
}

impl Default for DocumentSource {
    fn default() -> Self {
        Self::labelled("document")
    }
}

impl DocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty source whose errors name `what` (e.g. "CFDI", "addenda").
    pub(crate) fn labelled(what: &'static str) -> Self {
        Self { what, origin: None }
    }

    pub fn set_from_path(&mut self, path: impl Into<PathBuf>) {
        self.set(Origin::Path {
            path: path.into(),
            loaded: None,
        });
    }

    pub fn set_from_string(&mut self, text: impl Into<String>) {
        self.set(Origin::Text(text.into()));
    }

    pub fn set_from_bytes(&mut self, bytes: impl Into<Vec<u8>>) {
        self.set(Origin::Bytes(bytes.into()));
    }

    pub fn from_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.set_from_path(path);
        self
    }

    pub fn from_string(mut self, text: impl Into<String>) -> Self {
        self.set_from_string(text);
        self
    }

    pub fn from_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.set_from_bytes(bytes);
        self
    }

    fn set(&mut self, incoming: Origin) {
        if let Some(current) = &self.origin {
            if current.precedence() > incoming.precedence() {
                debug!(
                    "{} source: keeping existing content over lower-precedence origin",
                    self.what
                );
                return;
            }
        }
        self.origin = Some(incoming);
    }

    /// Resolve the source to its content, reading a path at most once.
    ///
    /// # Errors
    /// - [`RedocError::NoSourceConfigured`] if nothing was ever set
    /// - [`RedocError::FileNotFound`] if the path does not exist
    /// - [`RedocError::FileUnreadable`] if it exists but cannot be read
    pub fn resolve(&mut self) -> Result<Content<'_>, RedocError> {
        match &mut self.origin {
            None => Err(RedocError::NoSourceConfigured { what: self.what }),
            Some(Origin::Text(text)) => Ok(Content::Text(text)),
            Some(Origin::Bytes(bytes)) => Ok(Content::Bytes(bytes)),
            Some(Origin::Path { path, loaded }) => {
                if loaded.is_none() {
                    *loaded = Some(read_file(path)?);
                } else {
                    debug!("{} source: reusing loaded {}", self.what, path.display());
                }
                Ok(Content::Bytes(loaded.as_deref().unwrap_or_default()))
            }
        }
    }
}

/// Read a whole file, mapping I/O failures to input errors.
fn read_file(path: &Path) -> Result<Vec<u8>, RedocError> {
    if !path.exists() {
        return Err(RedocError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RedocError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => RedocError::FileUnreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    debug!("Loaded {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents).unwrap();
        f
    }

    #[test]
    fn bytes_resolve_unchanged() {
        let data = vec![0u8, 159, 146, 150, 255, b'<'];
        let mut src = DocumentSource::new().from_bytes(data.clone());
        let content = src.resolve().unwrap();
        assert_eq!(content.kind(), ContentKind::Buffer);
        assert_eq!(content.as_bytes(), data.as_slice());
    }

    #[test]
    fn string_resolves_as_text() {
        let mut src = DocumentSource::new().from_string("<cfdi/>");
        assert_eq!(src.resolve().unwrap(), Content::Text("<cfdi/>"));
    }

    #[test]
    fn path_is_read_once() {
        let file = temp_file(b"<cfdi:Comprobante/>");
        let mut src = DocumentSource::new().from_path(file.path());

        let first = src.resolve().unwrap().as_bytes().to_vec();
        assert_eq!(first, b"<cfdi:Comprobante/>");

        // A second read would now fail with FileNotFound.
        let path = file.path().to_path_buf();
        file.close().unwrap();
        assert!(!path.exists());

        let second = src.resolve().unwrap();
        assert_eq!(second.kind(), ContentKind::Buffer);
        assert_eq!(second.as_bytes(), first.as_slice());
    }

    #[test]
    fn empty_source_fails() {
        let mut src = DocumentSource::labelled("CFDI");
        let err = src.resolve().unwrap_err();
        assert!(matches!(err, RedocError::NoSourceConfigured { what: "CFDI" }));
    }

    #[test]
    fn missing_path_fails() {
        let mut src = DocumentSource::new().from_path("/definitely/not/a/real/cfdi.xml");
        assert!(matches!(
            src.resolve().unwrap_err(),
            RedocError::FileNotFound { .. }
        ));
    }

    #[test]
    fn directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let mut src = DocumentSource::new().from_path(dir.path());
        assert!(matches!(
            src.resolve().unwrap_err(),
            RedocError::FileUnreadable { .. }
        ));
    }

    #[test]
    fn string_wins_over_later_path() {
        let mut src = DocumentSource::new()
            .from_string("text")
            .from_path("/nowhere.xml");
        assert_eq!(src.resolve().unwrap(), Content::Text("text"));
    }

    #[test]
    fn string_wins_over_earlier_path() {
        let mut src = DocumentSource::new()
            .from_path("/nowhere.xml")
            .from_string("text");
        assert_eq!(src.resolve().unwrap(), Content::Text("text"));
    }

    #[test]
    fn loaded_buffer_wins_over_new_path() {
        let file = temp_file(b"first");
        let mut src = DocumentSource::new().from_path(file.path());
        src.resolve().unwrap();

        src.set_from_path("/nowhere.xml");
        assert_eq!(src.resolve().unwrap().as_bytes(), b"first");
    }

    #[test]
    fn unread_path_is_replaced() {
        let file = temp_file(b"second");
        let mut src = DocumentSource::new()
            .from_path("/nowhere.xml")
            .from_path(file.path());
        assert_eq!(src.resolve().unwrap().as_bytes(), b"second");
    }

    #[test]
    fn lossy_text_from_invalid_utf8() {
        let content = Content::Bytes(&[b'a', 0xff, b'b']);
        assert_eq!(content.to_text(), "a\u{FFFD}b");
    }
}
