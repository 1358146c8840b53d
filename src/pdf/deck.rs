//! Source deck loading and page inspection

use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::layout::Rect;

/// Guard against malformed page trees whose /Parent chain loops
const MAX_TREE_DEPTH: usize = 64;

/// One slide of the source deck
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourcePage {
    /// Page object in the source document
    pub id: ObjectId,
    /// Page MediaBox, possibly inherited from the page tree
    pub media_box: Rect,
}

impl SourcePage {
    pub fn width(&self) -> f64 {
        self.media_box.width
    }

    pub fn height(&self) -> f64 {
        self.media_box.height
    }
}

/// A loaded slide deck
#[derive(Debug)]
pub struct SlideDeck {
    path: PathBuf,
    doc: Document,
    pages: Vec<SourcePage>,
    title: Option<String>,
    author: Option<String>,
}

impl SlideDeck {
    /// Load a deck from disk
    ///
    /// Fails with an input error when the file is missing, lacks a `.pdf`
    /// extension, cannot be parsed, or has no pages.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        if !has_pdf_extension(path) {
            return Err(Error::NotPdf(path.to_path_buf()));
        }

        let doc = Document::load(path).map_err(|source| Error::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_document(doc, path)
    }

    /// Wrap an already parsed document; `path` is only used in messages
    pub fn from_document(doc: Document, path: &Path) -> Result<Self> {
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

        if page_ids.is_empty() {
            return Err(Error::EmptyPdf(path.to_path_buf()));
        }

        let mut pages = Vec::with_capacity(page_ids.len());
        for (i, id) in page_ids.into_iter().enumerate() {
            let media_box = read_media_box(&doc, id).ok_or(Error::MissingMediaBox(i + 1))?;
            debug!(
                "slide {}: {}x{} pt at ({}, {})",
                i + 1,
                media_box.width,
                media_box.height,
                media_box.x,
                media_box.y
            );
            pages.push(SourcePage { id, media_box });
        }

        let (title, author) = read_info(&doc);

        info!("Loaded {} with {} slides", path.display(), pages.len());

        Ok(Self {
            path: path.to_path_buf(),
            doc,
            pages,
            title,
            author,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of slides
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always false for a successfully opened deck
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[SourcePage] {
        &self.pages
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub(crate) fn into_parts(self) -> (Document, Vec<SourcePage>) {
        (self.doc, self.pages)
    }
}

/// True when the path ends in `.pdf`, in any letter case
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Follow a reference, leaving direct objects untouched
pub(crate) fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Look up a page attribute, walking up /Parent for inheritable keys
/// (Resources, MediaBox, CropBox, Rotate)
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node_id = page_id;

    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(node_id).ok()?;

        if let Ok(value) = node.get(key) {
            return Some(value);
        }

        node_id = match node.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => *parent_id,
            _ => return None,
        };
    }

    None
}

/// Read the page's MediaBox as a normalised rectangle
fn read_media_box(doc: &Document, page_id: ObjectId) -> Option<Rect> {
    let media_box = inherited_attribute(doc, page_id, b"MediaBox")?;
    let values = resolve(doc, media_box)?.as_array().ok()?;

    if values.len() != 4 {
        return None;
    }

    let mut coords = [0.0f64; 4];
    for (slot, value) in coords.iter_mut().zip(values) {
        *slot = f64::from(resolve(doc, value)?.as_float().ok()?);
    }

    // Corners may be given in any order
    let (x0, x1) = (coords[0].min(coords[2]), coords[0].max(coords[2]));
    let (y0, y1) = (coords[1].min(coords[3]), coords[1].max(coords[3]));

    let width = x1 - x0;
    let height = y1 - y0;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    Some(Rect { x: x0, y: y0, width, height })
}

/// Extract Title and Author from the Info dictionary
fn read_info(doc: &Document) -> (Option<String>, Option<String>) {
    let mut title = None;
    let mut author = None;

    if let Ok(info) = doc.trailer.get(b"Info") {
        if let Some(Object::Dictionary(info_dict)) = resolve(doc, info) {
            title = info_string(info_dict.get(b"Title").ok());
            author = info_string(info_dict.get(b"Author").ok());
        }
    }

    (title, author)
}

fn info_string(object: Option<&Object>) -> Option<String> {
    let bytes = object?.as_str().ok()?;
    String::from_utf8(bytes.to_vec()).ok().filter(|s| !s.is_empty())
}
