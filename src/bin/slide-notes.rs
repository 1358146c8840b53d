//! Slide Notes CLI tool
//!
//! A command-line tool for turning slide decks into note-taking pages.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use slide_notes::options::{build_label, Emoji, NotesOptions, Rgb};
use slide_notes::pdf::{compose_with_progress, has_pdf_extension, SlideDeck};
use slide_notes::Error;

/// Slide Notes - Put several slides on each page with room for notes
#[derive(Parser)]
#[command(name = "slide-notes")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Default: 5 slides per page, 30% of the width for notes
    slide-notes lecture.pdf

    # 4 slides per page, 35% notes, custom output file
    slide-notes lecture.pdf -s 4 -n 0.35 -o notes.pdf

    # Header reads \"CS101 NOTES\", with borders around slides
    slide-notes lecture.pdf -l CS101 -b

    # Black separator, no page numbers
    slide-notes lecture.pdf --separator-color 0,0,0 --no-page-numbers")]
struct Cli {
    /// Input PDF file
    input: PathBuf,

    /// Output PDF file path (default: {input}_notes.pdf next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of slides per page (1-10)
    #[arg(short, long, default_value_t = 5, allow_negative_numbers = true)]
    slides: i64,

    /// Fraction of the page width reserved for notes, between 0 and 1
    #[arg(short = 'n', long, default_value_t = 0.3, allow_negative_numbers = true)]
    note_space: f64,

    /// Text placed before "NOTES" in the header
    #[arg(short, long)]
    label: Option<String>,

    /// Symbol placed before the label
    #[arg(long, value_enum)]
    emoji: Option<Emoji>,

    /// Draw borders around each slide
    #[arg(short, long)]
    borders: bool,

    /// Hide page numbers
    #[arg(long)]
    no_page_numbers: bool,

    /// Hide slide range indicators
    #[arg(long)]
    no_slide_numbers: bool,

    /// Hide the vertical line between slides and notes
    #[arg(long)]
    no_separator: bool,

    /// Separator color as "r,g,b" with values 0-1 (e.g. "0.5,0.5,0.5")
    #[arg(long)]
    separator_color: Option<String>,

    /// Overwrite an existing output file without asking
    #[arg(short, long)]
    yes: bool,

    /// Open the output file after creation
    #[arg(long)]
    open: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// How a successful run ended
enum Outcome {
    Written,
    Cancelled,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(Outcome::Written) => {}
        Ok(Outcome::Cancelled) => eprintln!("Cancelled"),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let input = cli.input;

    if !input.exists() {
        return Err(Error::FileNotFound(input).into());
    }
    if !has_pdf_extension(&input) {
        return Err(Error::NotPdf(input).into());
    }

    let separator_color = cli.separator_color.as_deref().and_then(parse_separator_color);

    // Negative counts are reported with the value the user typed
    let slides_per_page = usize::try_from(cli.slides)
        .map_err(|_| anyhow!("Slides per page must be between 1 and 10, got: {}", cli.slides))?;

    let options = NotesOptions {
        slides_per_page,
        note_space_ratio: cli.note_space,
        show_borders: cli.borders,
        label: build_label(cli.label.as_deref(), cli.emoji),
        show_page_numbers: !cli.no_page_numbers,
        show_slide_numbers: !cli.no_slide_numbers,
        show_separator: !cli.no_separator,
        separator_color,
    };
    options.validate()?;

    let output = cli.output.unwrap_or_else(|| default_output_path(&input));

    if output.exists() && !cli.yes && !confirm_overwrite(&output)? {
        return Ok(Outcome::Cancelled);
    }

    let deck = SlideDeck::open(&input)?;
    let total = deck.len();
    eprintln!("Processing {} slide{}...", total, if total == 1 { "" } else { "s" });

    let mut notes = compose_with_progress(deck, &options, |progress| {
        eprint!(
            "\r  Progress: {:.0}% ({}/{} slides)",
            progress.percent(),
            progress.slides_done,
            progress.total_slides
        );
    })?;
    eprintln!();

    notes.save(&output)?;

    let summary = notes.summary();
    eprintln!("Created: {}", output.display());
    eprintln!("  Original slides:  {}", summary.total_slides);
    eprintln!("  Output pages:     {}", summary.output_pages);
    eprintln!("  Slides per page:  {}", summary.slides_per_page);
    eprintln!(
        "  Note space:       {}% of page width",
        note_space_percent(summary.note_space_ratio)
    );
    eprintln!(
        "  Compression:      {} -> {} pages ({:.0}% reduction)",
        summary.total_slides,
        summary.output_pages,
        summary.reduction_percent()
    );

    if cli.open {
        open_file(&output).context("Failed to open the output file")?;
    }

    Ok(Outcome::Written)
}

/// `{stem}_notes.pdf` in the input's directory
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}_notes.pdf", stem))
}

/// Whole percent of the page width given to notes, truncated
fn note_space_percent(ratio: f64) -> u32 {
    (ratio * 100.0) as u32
}

/// Parse `--separator-color`, warning and falling back to the default on bad input
fn parse_separator_color(value: &str) -> Option<Rgb> {
    match value.parse::<Rgb>() {
        Ok(color) => Some(color),
        Err(e) => {
            warn!(
                "Invalid separator color {:?} ({}), using default gray. Format: '0.5,0.5,0.5' (values 0-1)",
                value, e
            );
            None
        }
    }
}

/// Ask on stdin whether to replace an existing output file
fn confirm_overwrite(path: &Path) -> anyhow::Result<bool> {
    eprint!("Output file already exists: {}\n   Overwrite? [y/N]: ", path.display());
    io::stderr().flush().context("Failed to write prompt")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Open a file with the system default application
fn open_file(path: &Path) -> io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}
