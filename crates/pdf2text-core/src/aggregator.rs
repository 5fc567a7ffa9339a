//! Page aggregator: scans every page of a document and joins the results.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, info};
use rayon::prelude::*;

use crate::document::Document;
use crate::error::Result;
use crate::options::ExtractOptions;
use crate::scanner::ContentScanner;

/// Progress callback, invoked with `(pages_done, pages_total)` after each page.
pub type ProgressReporter = Box<dyn Fn(usize, usize) + Send + Sync>;

pub struct PageAggregator {
    options: ExtractOptions,
    scanner: ContentScanner,
    progress_reporter: Option<ProgressReporter>,
}

impl PageAggregator {
    pub fn new(options: ExtractOptions) -> Result<Self> {
        let scanner = ContentScanner::new(options.scan.clone())?;
        Ok(Self {
            options,
            scanner,
            progress_reporter: None,
        })
    }

    pub fn set_progress_reporter(&mut self, reporter: ProgressReporter) {
        self.progress_reporter = Some(reporter);
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Text of every page, in page order, before joining.
    pub fn extract_pages(&self, doc: &dyn Document) -> Result<Vec<String>> {
        let total = doc.page_count();
        info!("Extracting text from {} pages", total);

        if self.options.parallel {
            return self.extract_pages_parallel(doc, total);
        }

        let mut pages = Vec::with_capacity(total);
        for index in 1..=total {
            let content = doc.page_content(index)?;
            let text = self.scanner.scan(&content);
            debug!(
                "Page {}: {} content bytes, {} bytes of text",
                index,
                content.len(),
                text.len()
            );
            pages.push(text);
            self.report_progress(index, total);
        }
        Ok(pages)
    }

    /// Content is fetched up front so the document needn't be `Sync`.
    fn extract_pages_parallel(&self, doc: &dyn Document, total: usize) -> Result<Vec<String>> {
        let contents = (1..=total)
            .map(|index| doc.page_content(index))
            .collect::<Result<Vec<_>>>()?;

        let done = AtomicUsize::new(0);
        let pages = contents
            .par_iter()
            .map(|content| {
                let text = self.scanner.scan(content);
                let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
                self.report_progress(finished, total);
                text
            })
            .collect();
        Ok(pages)
    }

    /// Scan all pages and join them with the page separator.
    pub fn extract(&self, doc: &dyn Document) -> Result<String> {
        let pages = self.extract_pages(doc)?;
        Ok(self.join_pages(&pages))
    }

    pub fn join_pages(&self, pages: &[String]) -> String {
        let mut text = String::new();
        for page in pages {
            // Empty pages keep their separator so page spacing stays regular.
            text.push_str(page);
            text.push_str(&self.options.page_separator);
        }

        if self.options.trim_final_result {
            text.trim().to_string()
        } else {
            text
        }
    }

    fn report_progress(&self, done: usize, total: usize) {
        if let Some(ref reporter) = self.progress_reporter {
            reporter(done, total);
        }
    }
}
