//! pdf2text — extract plain text from PDF files.
//!
//! Usage: `pdf2text [options] <input.pdf | ->`

use std::io::Write;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use pdf2text_core::document::Source;
use pdf2text_core::extractor::ExtractorBuilder;
use pdf2text_core::options::ExtractOptions;
use pdf2text_core::resolve::{PathResolver, RootResolver};
use pdf2text_input_pdf::PdfAdapter;

#[derive(Parser)]
#[command(name = "pdf2text", version, about = "Extract plain text from PDF files")]
struct Cli {
    /// Input PDF file, or `-` to read from stdin
    input: Option<String>,

    /// Write text to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Text placed after every page (\n, \r and \t are unescaped)
    #[arg(long)]
    page_separator: Option<String>,

    /// Keep leading and trailing whitespace of the final text
    #[arg(long)]
    no_trim: bool,

    /// Trim whitespace around every extracted line
    #[arg(long)]
    trim_lines: bool,

    /// Trim whitespace around every page's text
    #[arg(long)]
    trim_pages: bool,

    /// Size of the scanner's lookback window (default: 15)
    #[arg(long)]
    window_size: Option<usize>,

    /// Scan pages in parallel
    #[arg(long)]
    parallel: bool,

    /// Directory relative input paths are resolved against (default: cwd)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Print per-page text and the joined text as JSON
    #[arg(long)]
    json: bool,

    /// Dump effective merged config as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    pages: &'a [String],
    text: &'a str,
}

/// Load config from global and project-local TOML files.
/// The project-local file fully overrides the global one. Missing files are ignored.
fn load_config() -> ExtractOptions {
    let mut opts = ExtractOptions::default();

    let mut paths = Vec::new();
    // 1. Global config: ~/.config/pdf2text/config.toml
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("pdf2text").join("config.toml"));
    }
    // 2. Project-local config: ./.pdf2text.toml
    paths.push(PathBuf::from(".pdf2text.toml"));

    for path in paths {
        if let Ok(contents) = std::fs::read_to_string(&path) {
            match toml::from_str::<ExtractOptions>(&contents) {
                Ok(parsed) => {
                    log::debug!("Loaded config from {}", path.display());
                    opts = parsed;
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", path.display(), e);
                }
            }
        }
    }

    opts
}

/// Apply CLI flags on top of config-loaded options.
/// Only overrides when the CLI flag was explicitly provided.
fn apply_cli_overrides(opts: &mut ExtractOptions, cli: &Cli) {
    if let Some(ref sep) = cli.page_separator {
        opts.page_separator = unescape(sep);
    }

    if cli.no_trim {
        opts.trim_final_result = false;
    }

    if cli.trim_lines {
        opts.scan.trim_lines = true;
    }

    if cli.trim_pages {
        opts.scan.trim_pages = true;
    }

    if let Some(size) = cli.window_size {
        opts.scan.window_size = size;
    }

    if cli.parallel {
        opts.parallel = true;
    }
}

/// Interpret `\n`, `\r`, `\t` and `\\` in a command-line string.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Build options: config files → CLI overrides
    let mut options = load_config();
    apply_cli_overrides(&mut options, cli);

    if cli.dump_config {
        let s = toml::to_string_pretty(&options).context("Error serializing config")?;
        println!("{}", s);
        return Ok(());
    }

    let input = cli
        .input
        .as_deref()
        .context("No input file given. Usage: pdf2text <input.pdf | -> [options]")?;

    let source = if input == "-" {
        Source::stream(std::io::stdin())
    } else {
        let resolver = match cli.root {
            Some(ref root) => RootResolver::new(root),
            None => RootResolver::current_dir()?,
        };
        Source::Path(resolver.resolve_absolute_path(input)?)
    };

    let extractor = ExtractorBuilder::new()
        .adapter(Box::new(PdfAdapter))
        .options(options)
        .progress_reporter(Box::new(|done, total| {
            log::debug!("[{}/{}] pages scanned", done, total);
        }))
        .build()?;

    let text = if cli.json {
        let pages = extractor.extract_pages(source)?;
        let text = extractor.aggregator().join_pages(&pages);
        serde_json::to_string_pretty(&JsonOutput {
            pages: &pages,
            text: &text,
        })?
    } else {
        extractor
            .extract_text(source)
            .with_context(|| format!("Cannot extract text from {}", input))?
    };

    match cli.output {
        Some(ref path) => {
            std::fs::write(path, text.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Text written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("\\n\\n"), "\n\n");
        assert_eq!(unescape("a\\tb\\r\\n"), "a\tb\r\n");
        assert_eq!(unescape("\\\\n"), "\\n");
        assert_eq!(unescape("\\x"), "\\x");
        assert_eq!(unescape("end\\"), "end\\");
        assert_eq!(unescape("plain"), "plain");
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "pdf2text",
            "in.pdf",
            "--page-separator",
            "\\n---\\n",
            "--no-trim",
            "--trim-pages",
            "--window-size",
            "20",
            "--parallel",
        ]);
        let mut opts = ExtractOptions::default();
        apply_cli_overrides(&mut opts, &cli);

        assert_eq!(opts.page_separator, "\n---\n");
        assert!(!opts.trim_final_result);
        assert!(opts.scan.trim_pages);
        assert!(!opts.scan.trim_lines);
        assert_eq!(opts.scan.window_size, 20);
        assert!(opts.parallel);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::parse_from(["pdf2text", "in.pdf"]);
        let mut opts = ExtractOptions {
            page_separator: "|".to_string(),
            trim_final_result: false,
            ..ExtractOptions::default()
        };
        apply_cli_overrides(&mut opts, &cli);
        assert_eq!(opts.page_separator, "|");
        assert!(!opts.trim_final_result);
    }

    #[test]
    fn test_json_output_shape() {
        let pages = vec!["a \n".to_string(), String::new()];
        let json = serde_json::to_value(JsonOutput {
            pages: &pages,
            text: "a",
        })
        .unwrap();
        assert_eq!(json["pages"][0], "a \n");
        assert_eq!(json["text"], "a");
    }
}
