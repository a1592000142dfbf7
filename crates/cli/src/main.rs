//! CLI tool that generates the ChatSVTR feature presentation.

use anyhow::{bail, Context, Result};
use clap::Parser;
use deck_core::{chatsvtr_deck, Deck, OUTPUT_FILENAME, SLIDE_COUNT};
use deck_pptx::{PptxParser, PptxWriter};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Generate the ChatSVTR feature presentation in the current directory.
#[derive(Parser, Debug)]
#[command(name = "create-ppt")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let deck = chatsvtr_deck();
    let output_path = Path::new(OUTPUT_FILENAME);

    write_deck(&deck, output_path)?;
    verify_deck(output_path)?;

    println!("PPT created successfully: {}", OUTPUT_FILENAME);
    println!("Total slides: {}", SLIDE_COUNT);

    if let Ok(location) = output_path.canonicalize() {
        log::info!("Location: {}", location.display());
    }

    Ok(())
}

/// Save the deck as a .pptx file.
fn write_deck(deck: &Deck, path: &Path) -> Result<()> {
    PptxWriter::new()
        .with_title("ChatSVTR 功能介绍")
        .with_creator("SVTR.AI")
        .with_application(env!("CARGO_BIN_NAME"))
        .save(deck, path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Read the saved file back and check that every slide made it.
fn verify_deck(path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let extracted = PptxParser::new()
        .parse(BufReader::new(file), filename)
        .with_context(|| format!("Failed to read back {}", path.display()))?;

    if extracted.slides.len() != SLIDE_COUNT {
        bail!(
            "{} contains {} slides, expected {}",
            path.display(),
            extracted.slides.len(),
            SLIDE_COUNT
        );
    }

    log::debug!(
        "Verified {} slides, {} lines of text",
        extracted.slides.len(),
        extracted.all_lines().len()
    );
    Ok(())
}
