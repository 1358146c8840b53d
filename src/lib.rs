//! Slide Notes Library
//!
//! Reflows a slide-deck PDF into note-taking pages: several slides are scaled
//! and stacked down the left side of each US Letter page, and a column on the
//! right is left blank for handwritten notes. This library provides:
//! - Layout geometry for slots, slide placement and batching
//! - Validated layout options with documented defaults
//! - Composition of the output document with lopdf
//! - Atomic writing of the result
//!
//! # Example
//!
//! ```no_run
//! use slide_notes::options::NotesOptions;
//! use slide_notes::pdf::convert;
//! use std::path::Path;
//!
//! let options = NotesOptions {
//!     slides_per_page: 4,
//!     label: Some("CS101".to_string()),
//!     ..Default::default()
//! };
//!
//! let summary = convert(
//!     Path::new("lecture.pdf"),
//!     Path::new("lecture_notes.pdf"),
//!     &options,
//!     |_| {},
//! )
//! .expect("Failed to convert");
//!
//! println!("{} slides on {} pages", summary.total_slides, summary.output_pages);
//! ```

pub mod error;
pub mod layout;
pub mod options;
pub mod pdf;

// Re-export commonly used items
pub use error::{Error, ErrorKind, Result};
pub use options::NotesOptions;
