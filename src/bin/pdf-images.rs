//! PDF image inventory CLI tool
//!
//! Lists every raster image embedded in a PDF, page by page.

use anyhow::{bail, Context};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use pdf_image_inventory::pdf::{scan_document, PdfDocument};
use pdf_image_inventory::report::{write_json, write_text};

/// PDF Images - List the images embedded in a PDF
#[derive(Parser)]
#[command(name = "pdf-images")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # List images page by page
    pdf-images scan.pdf

    # Machine-readable output
    pdf-images --json scan.pdf > images.json

    # Show which XObjects were skipped and why
    pdf-images -v scan.pdf")]
struct Cli {
    /// PDF file to inspect
    input: PathBuf,

    /// Print the inventory as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging (debug level; RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if !cli.input.exists() {
        bail!("Input file not found: {}", cli.input.display());
    }

    log::info!("Analyzing PDF: {}", cli.input.display());

    let document = PdfDocument::open(&cli.input)
        .with_context(|| format!("failed to read PDF {}", cli.input.display()))?;
    log::debug!("{:?}", document);

    let inventory = scan_document(&document).context("failed to extract images")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        write_json(&mut out, &inventory)?;
    } else {
        write_text(&mut out, &cli.input, &inventory)?;
    }
    out.flush()?;

    Ok(())
}
