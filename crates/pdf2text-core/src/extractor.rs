//! Extractor: opens a source through a document adapter and aggregates
//! its pages into a single text.

use log::info;

use crate::aggregator::{PageAggregator, ProgressReporter};
use crate::document::{Document, DocumentAdapter, Source};
use crate::error::{ExtractError, Result};
use crate::options::ExtractOptions;

pub struct Extractor {
    adapter: Box<dyn DocumentAdapter>,
    aggregator: PageAggregator,
}

impl Extractor {
    pub fn new(adapter: Box<dyn DocumentAdapter>, options: ExtractOptions) -> Result<Self> {
        Ok(Self {
            adapter,
            aggregator: PageAggregator::new(options)?,
        })
    }

    pub fn set_progress_reporter(&mut self, reporter: ProgressReporter) {
        self.aggregator.set_progress_reporter(reporter);
    }

    pub fn options(&self) -> &ExtractOptions {
        self.aggregator.options()
    }

    pub fn open(&self, source: Source) -> Result<Box<dyn Document>> {
        info!(
            "Opening {} with {}",
            source.describe(),
            self.adapter.name()
        );
        self.adapter.open(source)
    }

    /// Extract the joined text of all pages of `source`.
    pub fn extract_text(&self, source: Source) -> Result<String> {
        let doc = self.open(source)?;
        self.aggregator.extract(doc.as_ref())
    }

    /// Extract each page's text separately, in page order.
    pub fn extract_pages(&self, source: Source) -> Result<Vec<String>> {
        let doc = self.open(source)?;
        self.aggregator.extract_pages(doc.as_ref())
    }

    pub fn aggregator(&self) -> &PageAggregator {
        &self.aggregator
    }
}

/// Builder for an [`Extractor`].
pub struct ExtractorBuilder {
    adapter: Option<Box<dyn DocumentAdapter>>,
    options: ExtractOptions,
    progress_reporter: Option<ProgressReporter>,
}

impl ExtractorBuilder {
    pub fn new() -> Self {
        Self {
            adapter: None,
            options: ExtractOptions::default(),
            progress_reporter: None,
        }
    }

    pub fn adapter(mut self, adapter: Box<dyn DocumentAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    pub fn options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn progress_reporter(mut self, reporter: ProgressReporter) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    pub fn build(self) -> Result<Extractor> {
        let adapter = self
            .adapter
            .ok_or_else(|| ExtractError::Config("No document adapter specified".to_string()))?;

        let mut extractor = Extractor::new(adapter, self.options)?;
        if let Some(reporter) = self.progress_reporter {
            extractor.set_progress_reporter(reporter);
        }
        Ok(extractor)
    }
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::InMemoryDocument;
    use std::io::Read;
    use std::sync::{Arc, Mutex};

    /// Treats input bytes as content streams separated by form feeds.
    struct FormFeedAdapter;

    impl FormFeedAdapter {
        fn split(bytes: &[u8]) -> Box<dyn Document> {
            if bytes.is_empty() {
                return Box::new(InMemoryDocument::new());
            }
            Box::new(InMemoryDocument::from_pages(
                bytes.split(|&b| b == 0x0C).map(|p| p.to_vec()),
            ))
        }
    }

    impl DocumentAdapter for FormFeedAdapter {
        fn name(&self) -> &str {
            "Form Feed"
        }

        fn open(&self, source: Source) -> Result<Box<dyn Document>> {
            match source {
                Source::Bytes(bytes) => Ok(Self::split(&bytes)),
                Source::Stream(mut reader) => {
                    let mut bytes = Vec::new();
                    reader.read_to_end(&mut bytes)?;
                    Ok(Self::split(&bytes))
                }
                Source::Path(p) => Err(ExtractError::DocumentOpen(format!(
                    "{} is not supported",
                    p.display()
                ))),
            }
        }
    }

    #[test]
    fn test_builder_requires_adapter() {
        let err = ExtractorBuilder::new().build().err().unwrap();
        assert!(matches!(err, ExtractError::Config(_)));
    }

    #[test]
    fn test_builder_rejects_small_window() {
        let mut opts = ExtractOptions::default();
        opts.scan.window_size = 2;
        let result = ExtractorBuilder::new()
            .adapter(Box::new(FormFeedAdapter))
            .options(opts)
            .build();
        assert!(matches!(result, Err(ExtractError::Config(_))));
    }

    #[test]
    fn test_extract_text_from_bytes() {
        let extractor = ExtractorBuilder::new()
            .adapter(Box::new(FormFeedAdapter))
            .build()
            .unwrap();
        let text = extractor
            .extract_text(Source::Bytes(
                b"BT (Page 1) Tj ET\x0cBT (Page 2) Tj ET\x0cBT (Page 3) Tj ET".to_vec(),
            ))
            .unwrap();
        assert_eq!(text, "Page 1 \n\n\nPage 2 \n\n\nPage 3");
    }

    #[test]
    fn test_extract_text_from_stream() {
        let extractor = ExtractorBuilder::new()
            .adapter(Box::new(FormFeedAdapter))
            .build()
            .unwrap();
        let source = Source::stream(std::io::Cursor::new(b"BT (streamed) Tj ET".to_vec()));
        assert_eq!(extractor.extract_text(source).unwrap(), "streamed");
    }

    #[test]
    fn test_open_error_propagates() {
        let extractor = ExtractorBuilder::new()
            .adapter(Box::new(FormFeedAdapter))
            .build()
            .unwrap();
        let err = extractor
            .extract_text(Source::Path("/nope.pdf".into()))
            .unwrap_err();
        assert!(matches!(err, ExtractError::DocumentOpen(_)));
    }

    #[test]
    fn test_extract_pages_and_progress() {
        let progress = Arc::new(Mutex::new(Vec::new()));
        let progress_clone = progress.clone();

        let extractor = ExtractorBuilder::new()
            .adapter(Box::new(FormFeedAdapter))
            .progress_reporter(Box::new(move |done, total| {
                progress_clone.lock().unwrap().push((done, total));
            }))
            .build()
            .unwrap();

        let pages = extractor
            .extract_pages(Source::Bytes(b"BT (a) Tj ET\x0c\x0cBT (c) Tj ET".to_vec()))
            .unwrap();
        assert_eq!(pages, vec!["a \n", "", "c \n"]);
        assert_eq!(progress.lock().unwrap().last(), Some(&(3, 3)));
    }

    #[test]
    fn test_empty_document() {
        let extractor = ExtractorBuilder::new()
            .adapter(Box::new(FormFeedAdapter))
            .build()
            .unwrap();
        assert_eq!(extractor.extract_text(Source::Bytes(Vec::new())).unwrap(), "");
    }
}
