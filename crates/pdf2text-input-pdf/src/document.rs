//! `lopdf`-backed document adapter.

use std::io::Read;
use std::path::Path;

use flate2::read::ZlibDecoder;
use lopdf::{Object, ObjectId, Stream};

use pdf2text_core::document::{Document, DocumentAdapter, Source};
use pdf2text_core::error::{ExtractError, Result};

/// Opens PDF files, streams and buffers with `lopdf`.
pub struct PdfAdapter;

impl DocumentAdapter for PdfAdapter {
    fn name(&self) -> &str {
        "PDF Input"
    }

    fn open(&self, source: Source) -> Result<Box<dyn Document>> {
        let doc = match source {
            Source::Path(path) => PdfDocument::load(&path)?,
            Source::Stream(reader) => PdfDocument::from_lopdf(
                lopdf::Document::load_from(reader).map_err(load_error)?,
            )?,
            Source::Bytes(bytes) => PdfDocument::load_mem(&bytes)?,
        };
        Ok(Box::new(doc))
    }
}

/// A loaded PDF with its pages in ascending page-number order.
pub struct PdfDocument {
    doc: lopdf::Document,
    pages: Vec<ObjectId>,
}

impl PdfDocument {
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Reading PDF: {}", path.display());
        let doc = lopdf::Document::load(path).map_err(|e| {
            ExtractError::DocumentOpen(format!("Failed to load {}: {}", path.display(), e))
        })?;
        Self::from_lopdf(doc)
    }

    pub fn load_mem(bytes: &[u8]) -> Result<Self> {
        let doc = lopdf::Document::load_mem(bytes).map_err(load_error)?;
        Self::from_lopdf(doc)
    }

    /// Wrap an already parsed document. Encrypted documents are decrypted
    /// with the empty user password or rejected.
    pub fn from_lopdf(mut doc: lopdf::Document) -> Result<Self> {
        if doc.is_encrypted() {
            doc.decrypt("")
                .map_err(|e| ExtractError::DocumentOpen(format!("PDF is encrypted: {}", e)))?;
        }

        // get_pages() is keyed by 1-based page number, so values come out in order.
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        log::info!("PDF has {} pages", pages.len());

        Ok(Self { doc, pages })
    }

    fn content_stream(&self, index: usize, id: ObjectId) -> Result<Vec<u8>> {
        let stream = self
            .doc
            .get_object(id)
            .and_then(Object::as_stream)
            .map_err(|e| decode_error(index, e))?;

        if !stream.dict.has(b"Filter") {
            return Ok(stream.content.clone());
        }
        // lopdf logs a broken zlib body and carries on with whatever it inflated.
        if first_filter(stream) == Some(b"FlateDecode".as_slice()) {
            let mut sink = Vec::new();
            ZlibDecoder::new(stream.content.as_slice())
                .read_to_end(&mut sink)
                .map_err(|e| decode_error(index, e))?;
        }
        stream
            .decompressed_content()
            .map_err(|e| decode_error(index, e))
    }
}

impl Document for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_content(&self, index: usize) -> Result<Vec<u8>> {
        let page_id = index
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .copied()
            .ok_or_else(|| {
                ExtractError::DocumentOpen(format!(
                    "page {} out of range (document has {} pages)",
                    index,
                    self.pages.len()
                ))
            })?;

        // Streams of one page split on token boundaries.
        let mut content = Vec::new();
        for id in self.doc.get_page_contents(page_id) {
            content.extend(self.content_stream(index, id)?);
            content.push(b'\n');
        }
        Ok(content)
    }
}

fn first_filter(stream: &Stream) -> Option<&[u8]> {
    match stream.dict.get(b"Filter").ok()? {
        Object::Name(name) => Some(name.as_slice()),
        Object::Array(filters) => filters.first()?.as_name().ok(),
        _ => None,
    }
}

fn decode_error(index: usize, e: impl std::fmt::Display) -> ExtractError {
    ExtractError::DocumentOpen(format!("Failed to decode page {}: {}", index, e))
}

fn load_error(e: lopdf::Error) -> ExtractError {
    ExtractError::DocumentOpen(format!("Failed to load PDF: {}", e))
}
