//! PDF input for pdf2text: loads documents with `lopdf` and feeds their
//! decoded page content streams to the content-stream scanner.

mod document;

pub use document::{PdfAdapter, PdfDocument};

use pdf2text_core::document::Source;
use pdf2text_core::error::Result;
use pdf2text_core::extractor::ExtractorBuilder;
use pdf2text_core::options::ExtractOptions;
use pdf2text_core::resolve::PathResolver;

/// Extract the text of every page of a PDF with default options.
pub fn extract_text(source: impl Into<Source>) -> Result<String> {
    extract_text_with(source, &ExtractOptions::default())
}

pub fn extract_text_with(source: impl Into<Source>, options: &ExtractOptions) -> Result<String> {
    ExtractorBuilder::new()
        .adapter(Box::new(PdfAdapter))
        .options(options.clone())
        .build()?
        .extract_text(source.into())
}

/// Resolve `user_path` with `resolver`, then extract its text.
pub fn extract_text_from_path(
    user_path: &str,
    resolver: &dyn PathResolver,
    options: &ExtractOptions,
) -> Result<String> {
    let path = resolver.resolve_absolute_path(user_path)?;
    extract_text_with(path, options)
}
