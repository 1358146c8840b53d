//! PDF reading, composition and writing

pub mod compose;
pub mod deck;
pub mod overlay;
pub mod text;
pub mod write;

// Re-export commonly used items
pub use compose::{
    compose, compose_with_progress, convert, BatchProgress, ConversionSummary, NotesDocument,
    OutputPage,
};
pub use deck::{has_pdf_extension, SlideDeck, SourcePage};
