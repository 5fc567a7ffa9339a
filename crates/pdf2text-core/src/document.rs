//! Document adapter traits: what the extractor needs from a PDF backend.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{ExtractError, Result};

/// Where a document comes from. Resolved once by the adapter.
pub enum Source {
    Path(PathBuf),
    Stream(Box<dyn Read + Send>),
    Bytes(Vec<u8>),
}

impl Source {
    pub fn stream<R: Read + Send + 'static>(reader: R) -> Self {
        Source::Stream(Box::new(reader))
    }

    /// Short description for log messages.
    pub fn describe(&self) -> String {
        match self {
            Source::Path(p) => p.display().to_string(),
            Source::Stream(_) => "<stream>".to_string(),
            Source::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Source::Stream(_) => f.write_str("Stream(..)"),
            Source::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
        }
    }
}

impl From<PathBuf> for Source {
    fn from(p: PathBuf) -> Self {
        Source::Path(p)
    }
}

impl From<&Path> for Source {
    fn from(p: &Path) -> Self {
        Source::Path(p.to_path_buf())
    }
}

impl From<Vec<u8>> for Source {
    fn from(b: Vec<u8>) -> Self {
        Source::Bytes(b)
    }
}

impl From<&[u8]> for Source {
    fn from(b: &[u8]) -> Self {
        Source::Bytes(b.to_vec())
    }
}

/// An opened document exposing decoded per-page content streams.
pub trait Document {
    fn page_count(&self) -> usize;

    /// Decoded content-stream bytes of page `index` (1-based).
    fn page_content(&self, index: usize) -> Result<Vec<u8>>;
}

/// Opens a [`Source`] into a [`Document`].
pub trait DocumentAdapter: Send + Sync {
    /// Human-readable name of this adapter.
    fn name(&self) -> &str;

    fn open(&self, source: Source) -> Result<Box<dyn Document>>;
}

/// A document whose pages are already available as content-stream bytes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocument {
    pages: Vec<Vec<u8>>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pages<I, P>(pages: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Vec<u8>>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push_page(&mut self, content: impl Into<Vec<u8>>) {
        self.pages.push(content.into());
    }
}

impl Document for InMemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_content(&self, index: usize) -> Result<Vec<u8>> {
        index
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .cloned()
            .ok_or_else(|| {
                ExtractError::DocumentOpen(format!(
                    "page {} out of range (document has {} pages)",
                    index,
                    self.pages.len()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_pages_are_one_based() {
        let doc = InMemoryDocument::from_pages(["first", "second"]);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page_content(1).unwrap(), b"first");
        assert_eq!(doc.page_content(2).unwrap(), b"second");
    }

    #[test]
    fn test_in_memory_out_of_range() {
        let mut doc = InMemoryDocument::new();
        doc.push_page(b"only".to_vec());
        assert!(matches!(
            doc.page_content(0),
            Err(ExtractError::DocumentOpen(_))
        ));
        assert!(doc.page_content(2).is_err());
    }

    #[test]
    fn test_source_conversions() {
        let s: Source = Path::new("/tmp/a.pdf").into();
        assert!(matches!(s, Source::Path(_)));
        assert_eq!(s.describe(), "/tmp/a.pdf");

        let s: Source = vec![1u8, 2, 3].into();
        assert_eq!(s.describe(), "<3 bytes>");

        let s = Source::stream(std::io::Cursor::new(vec![0u8; 4]));
        assert_eq!(format!("{:?}", s), "Stream(..)");
    }
}
