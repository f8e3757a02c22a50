//! Command-line interface for text placement extraction.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use textplace::TextPlacementReader;

/// Extract positioned text from PDF documents.
#[derive(Debug, Parser)]
#[command(name = "textplace", about, version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract text placements with bounding boxes
    Extract {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range START:END (0-indexed, END exclusive; omit END for
        /// the rest of the document)
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print a document summary (page count, placement count, fonts)
    Info {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One placement per line: page, box, text
    Text,
    /// JSON array of placement objects
    Json,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            ref file,
            ref pages,
            format,
        } => run_extract(file, pages.as_deref(), format),
        Commands::Info { ref file } => run_info(file),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

fn open(file: &PathBuf) -> Result<TextPlacementReader, i32> {
    TextPlacementReader::open(file).map_err(|err| {
        eprintln!("error: {err}");
        1
    })
}

fn run_extract(file: &PathBuf, pages: Option<&str>, format: OutputFormat) -> Result<(), i32> {
    let reader = open(file)?;
    let (start, end) = match pages {
        Some(spec) => parse_page_range(spec).ok_or_else(|| {
            eprintln!("error: invalid page range '{spec}' (expected START:END)");
            2
        })?,
        None => (0, -1),
    };

    match format {
        OutputFormat::Text => {
            for p in reader.pages(start, end) {
                println!(
                    "{}\t[{:.3} {:.3} {:.3} {:.3}]\t{}",
                    p.page, p.x, p.y, p.width, p.height, p.text
                );
            }
        }
        OutputFormat::Json => {
            let items: Vec<_> = reader.pages(start, end).collect();
            match serde_json::to_string_pretty(&items) {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    eprintln!("error: {err}");
                    return Err(1);
                }
            }
        }
    }

    for warning in reader.warnings() {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

fn run_info(file: &PathBuf) -> Result<(), i32> {
    let reader = open(file)?;
    match serde_json::to_string_pretty(&reader.summary_json()) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("error: {err}");
            return Err(1);
        }
    }
    Ok(())
}

/// Parse `START:END` (END optional or negative for end-of-document).
fn parse_page_range(spec: &str) -> Option<(usize, i64)> {
    match spec.split_once(':') {
        Some((start, "")) => Some((start.trim().parse().ok()?, -1)),
        Some((start, end)) => Some((start.trim().parse().ok()?, end.trim().parse().ok()?)),
        None => {
            let page: usize = spec.trim().parse().ok()?;
            Some((page, page as i64 + 1))
        }
    }
}
