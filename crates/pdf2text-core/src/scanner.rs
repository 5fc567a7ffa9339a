//! Content-stream text scanner.
//!
//! Recovers plain text from a decoded page content stream in a single pass,
//! without tokenizing operands. Operators are recognized through a small
//! lookback window of the most recent bytes and must be bounded by
//! whitespace on both sides. Literal strings `( ... )` inside `BT`/`ET`
//! blocks are copied to the output; hex strings, nested parentheses and
//! escape codes beyond "take the next byte literally" are not decoded.

use std::collections::VecDeque;

use log::{debug, trace};

use crate::error::Result;
use crate::options::ScanOptions;

const BEGIN_TEXT: &[u8] = b"BT";
const END_TEXT: &[u8] = b"ET";

/// Operator groups tested in priority order while inside a text object.
/// At most one group fires per byte.
const MOVE_OPERATORS: &[&[u8]] = &[b"TD", b"Td"];
const NEXT_LINE_OPERATORS: &[&[u8]] = &[b"'", b"T*", b"\""];
const SHOW_OPERATORS: &[&[u8]] = &[b"Tj"];

fn is_delimiter(b: u8) -> bool {
    matches!(b, b' ' | b'\r' | b'\n')
}

fn is_printable(b: u8) -> bool {
    matches!(b, 0x20..=0x7E | 0x80..=0xFE)
}

/// Fixed-size history of the most recently scanned bytes, oldest first.
#[derive(Debug, Clone)]
pub struct LookbackWindow {
    slots: VecDeque<u8>,
}

impl LookbackWindow {
    /// Create a window of `size` slots, all holding a space.
    pub fn new(size: usize) -> Self {
        Self {
            slots: std::iter::repeat(b' ').take(size).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop the oldest byte and append `b` as the newest.
    pub fn push(&mut self, b: u8) {
        if self.slots.is_empty() {
            return;
        }
        self.slots.pop_front();
        self.slots.push_back(b);
    }

    /// Byte `n` positions back from the newest (0 is the newest).
    pub fn back(&self, n: usize) -> Option<u8> {
        let len = self.slots.len();
        if n < len {
            Some(self.slots[len - 1 - n])
        } else {
            None
        }
    }

    /// True when the window ends with `<delim> token <delim>`.
    ///
    /// The token occupies the slots just before the newest one, so a match is
    /// seen once the byte following the token has been pushed.
    pub fn matches(&self, token: &[u8]) -> bool {
        let n = token.len();
        if n == 0 || n + 2 > self.slots.len() {
            return false;
        }

        let bounded = self.back(0).is_some_and(is_delimiter)
            && self.back(n + 1).is_some_and(is_delimiter);

        bounded
            && token
                .iter()
                .enumerate()
                .all(|(i, &t)| self.back(n - i) == Some(t))
    }

    pub fn matches_any(&self, tokens: &[&[u8]]) -> bool {
        tokens.iter().any(|t| self.matches(t))
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.slots.iter().copied().collect()
    }
}

/// Per-page scanning state. Created fresh for every page.
#[derive(Debug)]
pub struct ScanState<'a> {
    options: &'a ScanOptions,
    window: LookbackWindow,
    in_text_object: bool,
    in_literal: bool,
    pending_escape: bool,
    out: String,
}

impl<'a> ScanState<'a> {
    pub fn new(options: &'a ScanOptions) -> Self {
        Self {
            options,
            window: LookbackWindow::new(options.window_size),
            in_text_object: false,
            in_literal: false,
            pending_escape: false,
            out: String::new(),
        }
    }

    pub fn in_text_object(&self) -> bool {
        self.in_text_object
    }

    pub fn in_literal(&self) -> bool {
        self.in_literal
    }

    /// Feed one byte of the content stream.
    pub fn push(&mut self, c: u8) {
        if self.in_text_object {
            // Operators are confirmed against the window as it was before `c`,
            // i.e. once their trailing delimiter is already in place.
            if !self.in_literal {
                self.apply_operators();
            }

            if !self.in_literal && self.window.matches(END_TEXT) {
                self.end_text_object();
            } else {
                self.literal_byte(c);
            }
        }

        self.window.push(c);

        if !self.in_text_object && self.window.matches(BEGIN_TEXT) {
            trace!("BT: entering text object");
            self.in_text_object = true;
        }
    }

    pub fn push_all(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push(b);
        }
    }

    /// Finish the page and return its text.
    ///
    /// An operator ending the stream has no following byte to confirm it, so
    /// up to two spaces are pushed: one confirms `... ET\n`, the second
    /// confirms `... ET` with no trailing delimiter. Nothing more is taken
    /// from an unterminated string.
    pub fn finish(mut self) -> String {
        for _ in 0..2 {
            if self.in_text_object && !self.in_literal {
                self.push(b' ');
            }
        }

        let mut text = self.out;
        let line_break = self.options.line_break.as_str();

        if self.options.trim_lines && !line_break.is_empty() {
            text = text
                .split(line_break)
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(line_break);
        }

        if self.options.trim_pages {
            text = text.trim().to_string();
        }

        text
    }

    fn apply_operators(&mut self) {
        if self.window.matches_any(MOVE_OPERATORS) || self.window.matches_any(NEXT_LINE_OPERATORS)
        {
            self.out.push_str(&self.options.line_break);
        } else if self.window.matches_any(SHOW_OPERATORS) {
            self.out.push(' ');
        }
    }

    fn end_text_object(&mut self) {
        trace!("ET: leaving text object");
        self.in_text_object = false;
        self.out.push_str(&self.options.line_break);
    }

    fn literal_byte(&mut self, c: u8) {
        if c == b'(' && !self.in_literal && !self.pending_escape {
            self.in_literal = true;
        } else if c == b')' && self.in_literal && !self.pending_escape {
            self.in_literal = false;
        } else if self.in_literal {
            if c == b'\\' && !self.pending_escape {
                self.pending_escape = true;
            } else {
                if is_printable(c) {
                    // Latin-1: the byte value is the code point.
                    self.out.push(char::from(c));
                }
                self.pending_escape = false;
            }
        }
    }
}

/// Reusable scanner configured with [`ScanOptions`].
#[derive(Debug, Clone, Default)]
pub struct ContentScanner {
    options: ScanOptions,
}

impl ContentScanner {
    pub fn new(options: ScanOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Scanner with default options and a custom window size.
    pub fn with_window_size(window_size: usize) -> Result<Self> {
        Self::new(ScanOptions {
            window_size,
            ..ScanOptions::default()
        })
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Start an incremental scan.
    pub fn state(&self) -> ScanState<'_> {
        ScanState::new(&self.options)
    }

    /// Scan one page's decoded content stream.
    pub fn scan(&self, bytes: &[u8]) -> String {
        let mut state = self.state();
        state.push_all(bytes);
        let text = state.finish();
        debug!(
            "Scanned {} content bytes into {} characters",
            bytes.len(),
            text.chars().count()
        );
        text
    }
}
