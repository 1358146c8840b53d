//! Slide composition: stack batches of slides onto notes pages
//!
//! Each source page is turned into a Form XObject inside the same document,
//! new Letter-size pages are built that draw the overlay and then the scaled
//! slides, and finally the old page tree is detached and pruned.

use std::path::Path;

use chrono::Local;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::layout::{batches, Batch, PageDimensions, PageGeometry, Placement};
use crate::options::NotesOptions;
use super::deck::{inherited_attribute, SlideDeck, SourcePage};
use super::overlay::overlay_content;
use super::text::{fmt_decimals, fmt_num, EncodedText, Font};

/// Value written to the Producer entry of the output's Info dictionary
const PRODUCER: &str = concat!("slide-notes ", env!("CARGO_PKG_VERSION"));

/// Progress after one batch has been placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Output pages completed so far
    pub pages_done: usize,
    /// Slides placed so far
    pub slides_done: usize,
    /// Slides in the whole deck
    pub total_slides: usize,
}

impl BatchProgress {
    pub fn percent(&self) -> f64 {
        self.slides_done as f64 / self.total_slides as f64 * 100.0
    }
}

/// Summary of one output page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPage {
    pub batch: Batch,
}

/// Figures reported after a conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionSummary {
    pub total_slides: usize,
    pub output_pages: usize,
    pub slides_per_page: usize,
    pub note_space_ratio: f64,
}

impl ConversionSummary {
    /// How much shorter the output is than the input, in percent
    pub fn reduction_percent(&self) -> f64 {
        (1.0 - self.output_pages as f64 / self.total_slides as f64) * 100.0
    }
}

/// The composed notes document, ready to be written
#[derive(Debug)]
pub struct NotesDocument {
    pub(crate) doc: Document,
    pages: Vec<OutputPage>,
    total_slides: usize,
    slides_per_page: usize,
    note_space_ratio: f64,
}

impl NotesDocument {
    /// Output pages in order
    pub fn pages(&self) -> &[OutputPage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of slides placed across all pages
    pub fn slides_placed(&self) -> usize {
        self.pages.iter().map(|page| page.batch.len).sum()
    }

    /// Underlying PDF document
    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn summary(&self) -> ConversionSummary {
        ConversionSummary {
            total_slides: self.total_slides,
            output_pages: self.pages.len(),
            slides_per_page: self.slides_per_page,
            note_space_ratio: self.note_space_ratio,
        }
    }
}

/// Compose `deck` into notes pages
///
/// # Example
///
/// ```no_run
/// use slide_notes::options::NotesOptions;
/// use slide_notes::pdf::{compose, SlideDeck};
/// use std::path::Path;
///
/// let deck = SlideDeck::open(Path::new("lecture.pdf")).expect("Failed to open deck");
/// let mut notes = compose(deck, &NotesOptions::default()).expect("Failed to compose");
/// notes.save(Path::new("lecture_notes.pdf")).expect("Failed to save");
/// ```
pub fn compose(deck: SlideDeck, options: &NotesOptions) -> Result<NotesDocument> {
    compose_with_progress(deck, options, |_| {})
}

/// Compose `deck`, calling `on_batch` after every output page
pub fn compose_with_progress<F>(
    deck: SlideDeck,
    options: &NotesOptions,
    mut on_batch: F,
) -> Result<NotesDocument>
where
    F: FnMut(&BatchProgress),
{
    options.validate()?;

    debug!("composing {}", deck.path().display());
    let title = deck.title().map(str::to_string);
    let author = deck.author().map(str::to_string);
    let (mut doc, slides) = deck.into_parts();
    let total_slides = slides.len();

    let geometry = PageGeometry::new(
        PageDimensions::letter(),
        options.slides_per_page,
        options.note_space_ratio,
    );

    let header = EncodedText::new(&options.header_text());
    if header.dropped > 0 {
        warn!(
            "{} character(s) in {:?} cannot be drawn with the standard fonts and were left out",
            header.dropped,
            options.header_text()
        );
    }

    let regular_font_id = doc.add_object(Font::Regular.dictionary());
    let bold_font_id = doc.add_object(Font::Bold.dictionary());
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    let mut output_pages = Vec::new();

    for batch in batches(total_slides, options.slides_per_page) {
        let mut content = overlay_content(&geometry, options, &header, &batch);
        let mut xobjects = Dictionary::new();

        for (slot, slide) in slides[batch.start..batch.end()].iter().enumerate() {
            let form_id = page_to_form(&mut doc, slide);
            let name = format!("Slide{}", slot);
            let placement = geometry.place(slot, slide.width(), slide.height());

            content.push_str(&place_form(&name, slide, &placement));
            xobjects.set(name, Object::Reference(form_id));
        }

        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let resources = dictionary! {
            "Font" => dictionary! {
                Font::Regular.resource_name() => regular_font_id,
                Font::Bold.resource_name() => bold_font_id,
            },
            "XObject" => xobjects,
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(geometry.page_width() as f32),
                Object::Real(geometry.page_height() as f32),
            ],
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(Object::Reference(page_id));
        output_pages.push(OutputPage { batch });

        debug!(
            "page {}: {} ({} slides)",
            batch.page_number(),
            batch.slide_range_label(),
            batch.len
        );

        on_batch(&BatchProgress {
            pages_done: batch.page_number(),
            slides_done: batch.end(),
            total_slides,
        });
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        }),
    );

    // A fresh catalog drops outlines, named destinations and anything else
    // that still points into the old page tree
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let info_id = doc.add_object(info_dictionary(title.as_deref(), author.as_deref()));
    doc.trailer.set("Info", Object::Reference(info_id));

    // Objects were decrypted on load and are written back in plaintext
    if doc.trailer.remove(b"Encrypt").is_some() {
        debug!("dropping source encryption dictionary");
    }
    doc.encryption_state = None;

    let pruned = doc.prune_objects();
    debug!("pruned {} unreachable objects", pruned.len());

    info!(
        "Composed {} slides onto {} pages",
        total_slides,
        output_pages.len()
    );

    Ok(NotesDocument {
        doc,
        pages: output_pages,
        total_slides,
        slides_per_page: options.slides_per_page,
        note_space_ratio: options.note_space_ratio,
    })
}

/// Open `input`, compose it, and write the result to `output`
///
/// Options are validated before the input is touched; the output file is only
/// created once the whole document has been serialised.
pub fn convert<F>(
    input: &Path,
    output: &Path,
    options: &NotesOptions,
    on_batch: F,
) -> Result<ConversionSummary>
where
    F: FnMut(&BatchProgress),
{
    options.validate()?;

    let deck = SlideDeck::open(input)?;
    let mut notes = compose_with_progress(deck, options, on_batch)?;
    notes.save(output)?;

    Ok(notes.summary())
}

/// Operators that draw the Form XObject `name` at `placement`
///
/// The translation compensates for a MediaBox whose lower-left corner is not
/// at the origin.
fn place_form(name: &str, slide: &SourcePage, placement: &Placement) -> String {
    let scale = placement.scale;
    let tx = placement.x - slide.media_box.x * scale;
    let ty = placement.y - slide.media_box.y * scale;

    format!(
        "q\n{s} 0 0 {s} {} {} cm\n/{} Do\nQ\n",
        fmt_num(tx),
        fmt_num(ty),
        name,
        s = fmt_decimals(scale, 6),
    )
}

/// Wrap a source page into a Form XObject and return its id
///
/// The page's content streams are decompressed and concatenated; its
/// resources, including inherited ones, are shared by reference or copied.
fn page_to_form(doc: &mut Document, slide: &SourcePage) -> ObjectId {
    let content = page_content(doc, slide.id);

    let resources = inherited_attribute(doc, slide.id, b"Resources")
        .cloned()
        .unwrap_or_else(|| Object::Dictionary(Dictionary::new()));

    let media_box = slide.media_box;
    let mut form = Dictionary::new();
    form.set("Type", Object::Name(b"XObject".to_vec()));
    form.set("Subtype", Object::Name(b"Form".to_vec()));
    form.set("FormType", Object::Integer(1));
    form.set(
        "BBox",
        Object::Array(vec![
            Object::Real(media_box.x as f32),
            Object::Real(media_box.y as f32),
            Object::Real((media_box.x + media_box.width) as f32),
            Object::Real((media_box.y + media_box.height) as f32),
        ]),
    );
    form.set("Resources", resources);

    doc.add_object(Stream::new(form, content))
}

/// Concatenated, decompressed content of a page
fn page_content(doc: &Document, page_id: ObjectId) -> Vec<u8> {
    let mut content = Vec::new();

    for content_id in doc.get_page_contents(page_id) {
        if let Ok(Object::Stream(stream)) = doc.get_object(content_id) {
            match stream.decompressed_content() {
                Ok(data) => content.extend_from_slice(&data),
                Err(e) => {
                    // Unfiltered streams also land here
                    if stream.dict.has(b"Filter") {
                        warn!("Could not decompress content stream {:?}: {}", content_id, e);
                    }
                    content.extend_from_slice(&stream.content);
                }
            }
            // Keep operators of adjacent streams apart
            content.push(b'\n');
        }
    }

    content
}

/// Info dictionary for the output
fn info_dictionary(title: Option<&str>, author: Option<&str>) -> Dictionary {
    let mut info = Dictionary::new();
    info.set("Producer", Object::string_literal(PRODUCER));
    info.set(
        "CreationDate",
        Object::string_literal(Local::now().format("D:%Y%m%d%H%M%S").to_string()),
    );

    if let Some(title) = title {
        info.set("Title", Object::string_literal(title));
    }
    if let Some(author) = author {
        info.set("Author", Object::string_literal(author));
    }

    info
}
