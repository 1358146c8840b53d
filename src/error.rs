//! Error types for the slide-notes library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of a failure, used by callers to decide how to report it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source deck is missing, unreadable, or has no pages
    Input,
    /// A layout option is out of range
    Config,
    /// The output document could not be written
    Output,
}

/// Main error type for the slide-notes library
#[derive(Error, Debug)]
pub enum Error {
    /// Input file not found
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input does not carry a .pdf extension
    #[error("Input file must be a PDF: {}", .0.display())]
    NotPdf(PathBuf),

    /// Source PDF could not be parsed
    #[error("Failed to read PDF {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// A source page has no usable MediaBox, directly or inherited
    #[error("Slide {0} has no valid MediaBox")]
    MissingMediaBox(usize),

    /// Slides per page outside 1..=10
    #[error("Slides per page must be between 1 and 10, got: {0}")]
    SlidesPerPage(usize),

    /// Note space ratio outside (0, 1)
    #[error("Note space ratio must be between 0 and 1, got: {0}")]
    NoteSpaceRatio(f64),

    /// IO error while writing the output
    #[error("Failed to write output PDF {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FileNotFound(_)
            | Error::NotPdf(_)
            | Error::Unreadable { .. }
            | Error::EmptyPdf(_)
            | Error::MissingMediaBox(_) => ErrorKind::Input,
            Error::SlidesPerPage(_) | Error::NoteSpaceRatio(_) => ErrorKind::Config,
            Error::Write { .. } => ErrorKind::Output,
        }
    }
}
