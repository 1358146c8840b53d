//! Layout options for a conversion run

use std::str::FromStr;

use crate::error::{Error, Result};

/// Smallest accepted number of slides per output page
pub const MIN_SLIDES_PER_PAGE: usize = 1;
/// Largest accepted number of slides per output page
pub const MAX_SLIDES_PER_PAGE: usize = 10;

/// RGB color with channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Uniform gray level
    pub const fn gray(level: f64) -> Self {
        Self::new(level, level, level)
    }
}

/// Default color of the separator line
pub const DEFAULT_SEPARATOR_COLOR: Rgb = Rgb::gray(0.6);

/// Why a separator color string was rejected
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ColorParseError {
    /// Not exactly three comma-separated components
    #[error("expected 3 components, got {0}")]
    ComponentCount(usize),
    /// A component is not a number
    #[error("not a number: {0:?}")]
    NotANumber(String),
    /// A component lies outside [0, 1]
    #[error("component {0} is outside 0-1")]
    OutOfRange(f64),
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Parse `"r,g,b"`, e.g. `"0.5,0.5,0.5"`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ColorParseError::ComponentCount(parts.len()));
        }

        let mut channels = [0.0; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            let value: f64 = part
                .parse()
                .map_err(|_| ColorParseError::NotANumber(part.to_string()))?;
            if !(0.0..=1.0).contains(&value) {
                return Err(ColorParseError::OutOfRange(value));
            }
            *slot = value;
        }

        Ok(Rgb::new(channels[0], channels[1], channels[2]))
    }
}

/// Symbol that can be prepended to the notes header
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Emoji {
    Brain,
    Rocket,
    Star,
    Fire,
    Book,
}

impl Emoji {
    pub fn symbol(&self) -> &'static str {
        match self {
            Emoji::Brain => "\u{1F9E0}",
            Emoji::Rocket => "\u{1F680}",
            Emoji::Star => "\u{2B50}",
            Emoji::Fire => "\u{1F525}",
            Emoji::Book => "\u{1F4DA}",
        }
    }
}

/// Combine an optional label with an optional emoji prefix
///
/// `("Biology", Book)` gives `"📚 Biology"`, an emoji alone gives just the symbol.
pub fn build_label(label: Option<&str>, emoji: Option<Emoji>) -> Option<String> {
    match (emoji, label) {
        (Some(emoji), Some(label)) => Some(format!("{} {}", emoji.symbol(), label)),
        (Some(emoji), None) => Some(emoji.symbol().to_string()),
        (None, label) => label.map(str::to_string),
    }
}

/// Options for converting a slide deck into notes pages
#[derive(Debug, Clone, PartialEq)]
pub struct NotesOptions {
    /// Number of slides stacked on one output page (1-10)
    pub slides_per_page: usize,
    /// Fraction of the page width reserved for notes, strictly between 0 and 1
    pub note_space_ratio: f64,
    /// Draw light-gray rectangles around each slot
    pub show_borders: bool,
    /// Text placed before "NOTES" in the header
    pub label: Option<String>,
    /// Draw "Page N" at the bottom right
    pub show_page_numbers: bool,
    /// Draw the slide range under the header
    pub show_slide_numbers: bool,
    /// Draw the vertical line between slides and notes
    pub show_separator: bool,
    /// Separator color, gray 0.6 when unset
    pub separator_color: Option<Rgb>,
}

impl Default for NotesOptions {
    fn default() -> Self {
        Self {
            slides_per_page: 5,
            note_space_ratio: 0.3,
            show_borders: false,
            label: None,
            show_page_numbers: true,
            show_slide_numbers: true,
            show_separator: true,
            separator_color: None,
        }
    }
}

impl NotesOptions {
    /// Check the numeric ranges
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SLIDES_PER_PAGE..=MAX_SLIDES_PER_PAGE).contains(&self.slides_per_page) {
            return Err(Error::SlidesPerPage(self.slides_per_page));
        }

        // NaN fails both comparisons
        if !(self.note_space_ratio > 0.0 && self.note_space_ratio < 1.0) {
            return Err(Error::NoteSpaceRatio(self.note_space_ratio));
        }

        Ok(())
    }

    /// Header text: "{label} NOTES" or "NOTES"
    pub fn header_text(&self) -> String {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => format!("{} NOTES", label),
            _ => "NOTES".to_string(),
        }
    }

    /// Separator color with the default applied
    pub fn separator_color(&self) -> Rgb {
        self.separator_color.unwrap_or(DEFAULT_SEPARATOR_COLOR)
    }
}
