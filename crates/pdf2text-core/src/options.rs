//! Extraction options shared by the scanner, the aggregator and the CLI.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// Default number of bytes kept in the scanner's lookback window.
pub const DEFAULT_WINDOW_SIZE: usize = 15;

/// Smallest window that can hold a two-byte operator with both delimiters.
pub const MIN_WINDOW_SIZE: usize = 4;

/// All options controlling a document extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Text appended after every page, including empty ones.
    pub page_separator: String,
    /// Trim leading and trailing whitespace from the joined document text.
    pub trim_final_result: bool,
    /// Scan pages on the rayon pool. Output order is unaffected.
    pub parallel: bool,

    #[serde(flatten)]
    pub scan: ScanOptions,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            page_separator: "\n\n".to_string(),
            trim_final_result: true,
            parallel: false,
            scan: ScanOptions::default(),
        }
    }
}

impl ExtractOptions {
    pub fn validate(&self) -> Result<()> {
        self.scan.validate()
    }
}

/// Options for the per-page content-stream scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    pub window_size: usize,
    /// Emitted for `ET`, `Td`, `TD`, `T*`, `'` and `"`.
    pub line_break: String,
    pub trim_lines: bool,
    pub trim_pages: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            line_break: "\n".to_string(),
            trim_lines: false,
            trim_pages: false,
        }
    }
}

impl ScanOptions {
    pub fn validate(&self) -> Result<()> {
        if self.window_size < MIN_WINDOW_SIZE {
            return Err(ExtractError::Config(format!(
                "window_size must be at least {}, got {}",
                MIN_WINDOW_SIZE, self.window_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.page_separator, "\n\n");
        assert!(opts.trim_final_result);
        assert!(!opts.parallel);
        assert_eq!(opts.scan.window_size, 15);
        assert_eq!(opts.scan.line_break, "\n");
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_window_too_small() {
        let mut opts = ExtractOptions::default();
        opts.scan.window_size = 3;
        let err = opts.validate().unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
        assert!(err.to_string().contains("window_size"));
    }

    #[test]
    fn test_toml_partial_config() {
        let opts: ExtractOptions = toml::from_str(
            "page_separator = \"\\n----\\n\"\nwindow_size = 32\ntrim_lines = true\n",
        )
        .unwrap();
        assert_eq!(opts.page_separator, "\n----\n");
        assert_eq!(opts.scan.window_size, 32);
        assert!(opts.scan.trim_lines);
        // Untouched fields keep their defaults
        assert!(opts.trim_final_result);
        assert_eq!(opts.scan.line_break, "\n");
    }

    #[test]
    fn test_toml_roundtrip_keeps_flat_layout() {
        let opts = ExtractOptions::default();
        let s = toml::to_string_pretty(&opts).unwrap();
        assert!(s.contains("window_size = 15"));
        assert!(!s.contains("[scan]"));
        let back: ExtractOptions = toml::from_str(&s).unwrap();
        assert_eq!(back, opts);
    }
}
