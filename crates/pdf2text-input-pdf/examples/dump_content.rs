/// Print each page's decoded content stream next to the text scanned from it.
///
/// Usage: cargo run --example dump_content -- file.pdf [max_pages]
use std::path::PathBuf;

use pdf2text_core::document::Document;
use pdf2text_core::scanner::ContentScanner;
use pdf2text_input_pdf::PdfDocument;

fn main() {
    let mut args = std::env::args().skip(1);
    let path = PathBuf::from(args.next().expect("usage: dump_content <file.pdf> [max_pages]"));
    let max_pages: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(4);

    let doc = PdfDocument::load(&path).expect("load PDF");
    let scanner = ContentScanner::default();

    for index in 1..=doc.page_count().min(max_pages) {
        println!("\n=== Page {} ===", index);
        let content = match doc.page_content(index) {
            Ok(c) => c,
            Err(e) => {
                println!("  (error: {})", e);
                continue;
            }
        };

        // Only the lines carrying text operators
        for line in String::from_utf8_lossy(&content).lines() {
            let trimmed = line.trim();
            if trimmed == "BT"
                || trimmed == "ET"
                || trimmed.ends_with("Tj")
                || trimmed.ends_with("Td")
                || trimmed.ends_with("TD")
                || trimmed.ends_with("T*")
            {
                println!("  {}", trimmed);
            }
        }

        println!("--- scanned ---");
        println!("{}", scanner.scan(&content));
    }
}
